use super::enums::{Priority, ProductionIssue, ProductionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Производственный процесс (узел дерева производства)
///
/// Дочерние коллекции хранят `Arc`, чтобы при точечном обновлении дерева
/// нетронутые поддеревья переиспользовались без копирования.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionWorkflow {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: ProductionStatus,
    /// 0..=100
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deadline_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// `None` только у корневого производства
    #[serde(default)]
    pub main_root_id: Option<String>,
    #[serde(default)]
    pub parent_production_workflow_id: Option<String>,
    #[serde(default)]
    pub nested_workflows: Vec<Arc<ProductionWorkflow>>,
    #[serde(default, rename = "additionalComponents")]
    pub additional_components: Vec<Arc<ProductionWorkflow>>,
    #[serde(default)]
    pub responsible: Option<ProductionResponsible>,
    #[serde(default)]
    pub order: ProductionOrderSummary,
    #[serde(default)]
    pub variant: ProductionVariant,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub production_key: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub is_launch_in_progress: bool,
    #[serde(default, rename = "is_manual_assignmet_required")]
    pub is_manual_assignment_required: bool,
    #[serde(default)]
    pub is_any_task_time_limit_exceeded: bool,
    #[serde(default)]
    pub nested_production_component_has_issues: bool,
    #[serde(default)]
    pub issues: Vec<ProductionIssue>,
}

impl ProductionWorkflow {
    pub fn is_root(&self) -> bool {
        self.main_root_id.is_none()
    }

    pub fn has_nested(&self) -> bool {
        !self.nested_workflows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionResponsible {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionVariant {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrderClient {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// Краткая информация о заказе, встроенная в каждое производство
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrderSummary {
    pub id: String,
    #[serde(default)]
    pub order_key: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub client: Option<ProductionOrderClient>,
    #[serde(default)]
    pub external_system_name: Option<String>,
    #[serde(default)]
    pub external_order_number: Option<String>,
    #[serde(default)]
    pub marketplace_order_number: Option<String>,
    #[serde(default)]
    pub to_stock: Option<bool>,
}

/// A break in the root/parent linkage found by [`validate_ownership`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipViolation {
    pub production_id: String,
    pub reason: String,
}

/// Checks the ownership links of a forest of root productions: a root has no
/// `main_root_id`, every node below it points at that root and at its direct
/// parent. Additional components are checked with the same rules.
pub fn validate_ownership(roots: &[Arc<ProductionWorkflow>]) -> Vec<OwnershipViolation> {
    fn walk(
        node: &ProductionWorkflow,
        root_id: &str,
        parent_id: &str,
        out: &mut Vec<OwnershipViolation>,
    ) {
        if node.main_root_id.as_deref() != Some(root_id) {
            out.push(OwnershipViolation {
                production_id: node.id.clone(),
                reason: format!("main_root_id must be {}", root_id),
            });
        }
        if node.parent_production_workflow_id.as_deref() != Some(parent_id) {
            out.push(OwnershipViolation {
                production_id: node.id.clone(),
                reason: format!("parent_production_workflow_id must be {}", parent_id),
            });
        }
        for child in node.nested_workflows.iter().chain(&node.additional_components) {
            walk(child, root_id, &node.id, out);
        }
    }

    let mut violations = Vec::new();
    for root in roots {
        if root.main_root_id.is_some() {
            violations.push(OwnershipViolation {
                production_id: root.id.clone(),
                reason: "top-level production must not have main_root_id".to_string(),
            });
        }
        for child in root.nested_workflows.iter().chain(&root.additional_components) {
            walk(child, &root.id, &root.id, &mut violations);
        }
    }
    violations
}
