use crate::shared::common::PaginationMeta;
use serde::{Deserialize, Serialize};

/// Ответ `POST /production-workflows/all`. `data` остаётся сырым JSON:
/// форма элементов зависит от запрошенной группировки
/// (см. `ProductionItems::from_json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionWorkflowListResponse {
    pub data: serde_json::Value,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInfo {
    pub issue_type: String,
    pub issues_count: u64,
}

/// Ответ `POST /production-workflows/get-issues`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionIssuesSummary {
    #[serde(default)]
    pub issues_count: u64,
    #[serde(default)]
    pub root_production_with_issues_count: u64,
    #[serde(default)]
    pub nested_production_with_issues_count: u64,
    #[serde(default)]
    pub main_productions_issues_info: Vec<IssueInfo>,
    #[serde(default)]
    pub nested_productions_issues_info: Vec<IssueInfo>,
}
