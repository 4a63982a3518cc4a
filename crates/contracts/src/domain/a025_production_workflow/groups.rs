use super::aggregate::ProductionWorkflow;
use super::enums::GroupBy;
use crate::shared::common::IdName;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Группа "по заказу"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionWorkflowOrderGroup {
    pub id: String,
    pub order_key: String,
    #[serde(default)]
    pub client: Option<IdName>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub external_order_number: Option<String>,
    #[serde(default)]
    pub marketplace_order_number: Option<String>,
    #[serde(default)]
    pub to_stock: Option<bool>,
    /// Может быть больше, чем загружено в `production_workflows` ("show more")
    #[serde(rename = "totalCount", default)]
    pub total_count: u64,
    #[serde(default)]
    pub production_workflows: Vec<Arc<ProductionWorkflow>>,
}

/// Группа "по продукту"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionWorkflowProductGroup {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(rename = "totalCount", default)]
    pub total_count: u64,
    #[serde(default)]
    pub production_workflows: Vec<Arc<ProductionWorkflow>>,
}

/// Materialized production list in the shape selected by `group_by`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductionItems {
    Plane(Vec<Arc<ProductionWorkflow>>),
    Order(Vec<ProductionWorkflowOrderGroup>),
    Product(Vec<ProductionWorkflowProductGroup>),
}

impl Default for ProductionItems {
    fn default() -> Self {
        ProductionItems::Plane(Vec::new())
    }
}

impl ProductionItems {
    /// Decodes the `data` array of a list response. The wire format is an
    /// untagged array, so the grouping that was requested decides the shape.
    pub fn from_json(group_by: GroupBy, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match group_by {
            GroupBy::None => ProductionItems::Plane(serde_json::from_value(data)?),
            GroupBy::Order => ProductionItems::Order(serde_json::from_value(data)?),
            GroupBy::Product => ProductionItems::Product(serde_json::from_value(data)?),
        })
    }

    pub fn empty(group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::None => ProductionItems::Plane(Vec::new()),
            GroupBy::Order => ProductionItems::Order(Vec::new()),
            GroupBy::Product => ProductionItems::Product(Vec::new()),
        }
    }

    pub fn group_by(&self) -> GroupBy {
        match self {
            ProductionItems::Plane(_) => GroupBy::None,
            ProductionItems::Order(_) => GroupBy::Order,
            ProductionItems::Product(_) => GroupBy::Product,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ProductionItems::Plane(items) => items.len(),
            ProductionItems::Order(groups) => groups.len(),
            ProductionItems::Product(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a further page. A page of another shape replaces the list.
    pub fn append(&mut self, more: ProductionItems) {
        match (self, more) {
            (ProductionItems::Plane(items), ProductionItems::Plane(more)) => items.extend(more),
            (ProductionItems::Order(groups), ProductionItems::Order(more)) => groups.extend(more),
            (ProductionItems::Product(groups), ProductionItems::Product(more)) => groups.extend(more),
            (this, more) => *this = more,
        }
    }

    /// Top-level productions: roots in plane view, group members otherwise.
    pub fn top_level(&self) -> Vec<&Arc<ProductionWorkflow>> {
        match self {
            ProductionItems::Plane(items) => items.iter().collect(),
            ProductionItems::Order(groups) => groups
                .iter()
                .flat_map(|group| group.production_workflows.iter())
                .collect(),
            ProductionItems::Product(groups) => groups
                .iter()
                .flat_map(|group| group.production_workflows.iter())
                .collect(),
        }
    }
}
