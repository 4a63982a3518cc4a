//! Тела запросов к `/production-workflows/*`.
//!
//! `GetProductionWorkflowsFilteredRequest` is also the shape of the saved
//! user filters document, so every field tolerates being absent.

use super::enums::{
    FilterCriterion, GroupBy, Priority, ProductionSortBy, ProductionStatus, ShowCompletedPeriod,
};
use crate::shared::common::{MinMax, SortOrder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitByKind {
    OrderKey,
    ProductId,
}

/// "Show more" drill-down restriction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitBy {
    pub by: LimitByKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowCompletedParams {
    #[serde(rename = "type")]
    pub kind: ShowCompletedPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
}

/// Per-criterion filter values. `None` means "no filter" and is not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionFilterPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_key: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_key: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_key: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_client: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_order_number: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_priority: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_order_number: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub involved_department: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_status: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_at: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_priority: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_template_name: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibility_department: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_configuration_name: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_assigned_to_production_tasks: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_workflow_estimated_time: Option<MinMax>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_by: Option<LimitBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_completed: Option<ShowCompletedParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_unknown_products: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionSortParams {
    #[serde(rename = "sortBy")]
    pub sort_by: ProductionSortBy,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipTake {
    pub skip: u64,
    pub take: u64,
}

/// Тело `POST /production-workflows/all` и `/get-issues`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetProductionWorkflowsFilteredRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_filters: Option<Vec<FilterCriterion>>,
    #[serde(default)]
    pub filters: ProductionFilterPayload,
    #[serde(default)]
    pub sort: ProductionSortParams,
    #[serde(default)]
    pub group_by: GroupBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_parent_items_if_subitems_match_filters: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_all_subitems: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<SkipTake>,
}

/// Тело `PUT /production-workflows/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionWorkflowUpdateBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// `Some(None)` снимает ответственного, `None` не трогает поле
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<Option<String>>,
}

/// Тело `PUT /production-workflows/responsible`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignResponsibleToProductionsBody {
    pub production_ids: Vec<String>,
    pub responsible_id: Option<String>,
}

/// Тело `PUT /orders/:id` для смены приоритета заказа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOrderPriorityBody {
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetChosenFiltersBody {
    pub chosen_filters: Vec<FilterCriterion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteManyProductionsBody {
    pub productions_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionWorkflowMultiLaunchItem {
    pub production_workflow_id: String,
}
