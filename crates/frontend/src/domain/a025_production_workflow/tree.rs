//! Операции над деревом производств
//!
//! Every function here is pure: the input forest is never modified, changed
//! nodes and their ancestors are rebuilt, every other subtree keeps its `Arc`.

use chrono::{DateTime, Utc};
use contracts::domain::a025_production_workflow::{
    Priority, ProductionItems, ProductionResponsible, ProductionStatus, ProductionWorkflow,
};
use std::sync::Arc;

/// Новый приоритет заказа; применяется ко всем производствам этого заказа
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPriorityPatch {
    pub order_id: String,
    pub priority: Priority,
}

/// Field-level change of a single production
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionPatch {
    pub title: Option<String>,
    pub status: Option<ProductionStatus>,
    pub priority: Option<Priority>,
    /// `Some(None)` снимает ответственного
    pub responsible: Option<Option<ProductionResponsible>>,
    pub deadline_at: Option<Option<DateTime<Utc>>>,
    pub is_launch_in_progress: Option<bool>,
    pub order: Option<OrderPriorityPatch>,
}

impl ProductionPatch {
    pub fn merge_into(&self, node: &mut ProductionWorkflow) {
        if let Some(title) = &self.title {
            node.title = title.clone();
        }
        if let Some(status) = self.status {
            node.status = status;
        }
        if let Some(priority) = self.priority {
            node.priority = priority;
        }
        if let Some(responsible) = &self.responsible {
            node.responsible = responsible.clone();
        }
        if let Some(deadline_at) = self.deadline_at {
            node.deadline_at = deadline_at;
        }
        if let Some(flag) = self.is_launch_in_progress {
            node.is_launch_in_progress = flag;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductionUpdate {
    /// Merge fields into the node with the given id, or cascade an order
    /// priority into every node of that order
    Patch(ProductionPatch),
    /// Replace the whole component (e.g. after its launch finished)
    Replace(Arc<ProductionWorkflow>),
}

pub struct UpdateArgs<'a> {
    /// Production id, or the order id for an order priority patch
    pub id: &'a str,
    pub value: &'a ProductionUpdate,
    pub items: &'a ProductionItems,
}

impl UpdateArgs<'_> {
    pub fn is_replace_component(&self) -> bool {
        matches!(self.value, ProductionUpdate::Replace(_))
    }
}

/// Finds the node by id and returns a new forest with it updated
///
/// Traversal: direct id match, then the order id (order priority cascade,
/// continuing into `nested_workflows`), then `nested_workflows`.
/// `additional_components` are not traversed.
pub fn update_production_recursively(args: UpdateArgs<'_>) -> ProductionItems {
    let UpdateArgs { id, value, items } = args;
    match items {
        ProductionItems::Plane(roots) => ProductionItems::Plane(update_forest(id, value, roots)),
        ProductionItems::Order(groups) => ProductionItems::Order(
            groups
                .iter()
                .map(|group| {
                    let mut group = group.clone();
                    group.production_workflows =
                        update_forest(id, value, &group.production_workflows);
                    group
                })
                .collect(),
        ),
        ProductionItems::Product(groups) => ProductionItems::Product(
            groups
                .iter()
                .map(|group| {
                    let mut group = group.clone();
                    group.production_workflows =
                        update_forest(id, value, &group.production_workflows);
                    group
                })
                .collect(),
        ),
    }
}

fn update_forest(
    id: &str,
    value: &ProductionUpdate,
    nodes: &[Arc<ProductionWorkflow>],
) -> Vec<Arc<ProductionWorkflow>> {
    nodes
        .iter()
        .map(|node| update_node(id, value, node).unwrap_or_else(|| node.clone()))
        .collect()
}

/// Like `update_forest`, `None` when nothing below changed
fn update_children(
    id: &str,
    value: &ProductionUpdate,
    nodes: &[Arc<ProductionWorkflow>],
) -> Option<Vec<Arc<ProductionWorkflow>>> {
    let mut changed = false;
    let updated: Vec<_> = nodes
        .iter()
        .map(|node| match update_node(id, value, node) {
            Some(new_node) => {
                changed = true;
                new_node
            }
            None => node.clone(),
        })
        .collect();
    changed.then_some(updated)
}

fn update_node(
    id: &str,
    value: &ProductionUpdate,
    node: &Arc<ProductionWorkflow>,
) -> Option<Arc<ProductionWorkflow>> {
    match value {
        ProductionUpdate::Replace(replacement) => {
            if node.id == id {
                return Some(replacement.clone());
            }
        }
        ProductionUpdate::Patch(patch) => match &patch.order {
            None if node.id == id => {
                let mut merged = ProductionWorkflow::clone(node);
                patch.merge_into(&mut merged);
                return Some(Arc::new(merged));
            }
            Some(order) if node.order.id == id => {
                let mut merged = ProductionWorkflow::clone(node);
                merged.order.priority = order.priority;
                if let Some(nested) = update_children(id, value, &node.nested_workflows) {
                    merged.nested_workflows = nested;
                }
                return Some(Arc::new(merged));
            }
            _ => {}
        },
    }

    let nested = update_children(id, value, &node.nested_workflows)?;
    let mut rebuilt = ProductionWorkflow::clone(node);
    rebuilt.nested_workflows = nested;
    Some(Arc::new(rebuilt))
}

/// Pre-order walk over `nested_workflows`; additional components are skipped
pub fn get_all_productions_on_the_screen(
    nodes: &[Arc<ProductionWorkflow>],
) -> Vec<Arc<ProductionWorkflow>> {
    fn walk(nodes: &[Arc<ProductionWorkflow>], out: &mut Vec<Arc<ProductionWorkflow>>) {
        for node in nodes {
            out.push(node.clone());
            walk(&node.nested_workflows, out);
        }
    }

    let mut out = Vec::new();
    walk(nodes, &mut out);
    out
}

/// Ungrouped list; the only view that supports select-all
pub fn check_is_plane_view(items: &ProductionItems) -> bool {
    matches!(items, ProductionItems::Plane(_))
}

/// Drops a top-level production; a group left without productions is dropped too
pub fn remove_production(items: &ProductionItems, id: &str) -> ProductionItems {
    let keep = |node: &&Arc<ProductionWorkflow>| node.id != id;
    match items {
        ProductionItems::Plane(roots) => {
            ProductionItems::Plane(roots.iter().filter(keep).cloned().collect())
        }
        ProductionItems::Order(groups) => ProductionItems::Order(
            groups
                .iter()
                .filter_map(|group| {
                    let mut group = group.clone();
                    group.production_workflows.retain(|node| node.id != id);
                    (!group.production_workflows.is_empty()).then_some(group)
                })
                .collect(),
        ),
        ProductionItems::Product(groups) => ProductionItems::Product(
            groups
                .iter()
                .filter_map(|group| {
                    let mut group = group.clone();
                    group.production_workflows.retain(|node| node.id != id);
                    (!group.production_workflows.is_empty()).then_some(group)
                })
                .collect(),
        ),
    }
}

/// Searches the whole forest, additional components included
pub fn find_production(items: &ProductionItems, id: &str) -> Option<Arc<ProductionWorkflow>> {
    fn find(nodes: &[Arc<ProductionWorkflow>], id: &str) -> Option<Arc<ProductionWorkflow>> {
        nodes.iter().find_map(|node| {
            if node.id == id {
                return Some(node.clone());
            }
            find(&node.nested_workflows, id).or_else(|| find(&node.additional_components, id))
        })
    }

    items
        .top_level()
        .into_iter()
        .find_map(|node| find(std::slice::from_ref(node), id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a025_production_workflow::groups::ProductionWorkflowOrderGroup;
    use contracts::domain::a025_production_workflow::ProductionOrderSummary;

    fn node(id: &str, order_id: &str, nested: Vec<Arc<ProductionWorkflow>>) -> Arc<ProductionWorkflow> {
        Arc::new(ProductionWorkflow {
            id: id.to_string(),
            title: id.to_uppercase(),
            order: ProductionOrderSummary {
                id: order_id.to_string(),
                ..Default::default()
            },
            nested_workflows: nested,
            ..Default::default()
        })
    }

    fn title_patch(title: &str) -> ProductionUpdate {
        ProductionUpdate::Patch(ProductionPatch {
            title: Some(title.to_string()),
            ..Default::default()
        })
    }

    /// r1 -> (a -> (a1), b), r2
    fn forest() -> Vec<Arc<ProductionWorkflow>> {
        let a1 = node("a1", "o1", vec![]);
        let a = node("a", "o1", vec![a1]);
        let b = node("b", "o1", vec![]);
        vec![node("r1", "o1", vec![a, b]), node("r2", "o2", vec![])]
    }

    fn plane(items: &ProductionItems) -> &Vec<Arc<ProductionWorkflow>> {
        match items {
            ProductionItems::Plane(roots) => roots,
            other => panic!("expected plane view, got {:?}", other.group_by()),
        }
    }

    #[test]
    fn test_update_deep_node_shares_untouched_subtrees() {
        let items = ProductionItems::Plane(forest());
        let value = title_patch("Renamed");
        let updated = update_production_recursively(UpdateArgs {
            id: "a1",
            value: &value,
            items: &items,
        });

        let before = plane(&items);
        let after = plane(&updated);
        assert_eq!(find_production(&updated, "a1").unwrap().title, "Renamed");
        // Предки пересобраны
        assert!(!Arc::ptr_eq(&before[0], &after[0]));
        assert!(!Arc::ptr_eq(&before[0].nested_workflows[0], &after[0].nested_workflows[0]));
        // Соседние поддеревья те же
        assert!(Arc::ptr_eq(&before[1], &after[1]));
        assert!(Arc::ptr_eq(&before[0].nested_workflows[1], &after[0].nested_workflows[1]));
        // Вход не изменён
        assert_eq!(find_production(&items, "a1").unwrap().title, "A1");
    }

    #[test]
    fn test_unknown_id_keeps_every_node() {
        let items = ProductionItems::Plane(forest());
        let value = title_patch("x");
        let updated = update_production_recursively(UpdateArgs {
            id: "missing",
            value: &value,
            items: &items,
        });
        for (before, after) in plane(&items).iter().zip(plane(&updated)) {
            assert!(Arc::ptr_eq(before, after));
        }
    }

    #[test]
    fn test_order_priority_cascades_through_nested() {
        let items = ProductionItems::Plane(forest());
        let value = ProductionUpdate::Patch(ProductionPatch {
            order: Some(OrderPriorityPatch {
                order_id: "o1".to_string(),
                priority: Priority::Highest,
            }),
            ..Default::default()
        });
        let updated = update_production_recursively(UpdateArgs {
            id: "o1",
            value: &value,
            items: &items,
        });
        for id in ["r1", "a", "a1", "b"] {
            assert_eq!(find_production(&updated, id).unwrap().order.priority, Priority::Highest);
        }
        assert_eq!(find_production(&updated, "r2").unwrap().order.priority, Priority::Medium);
        assert!(Arc::ptr_eq(&plane(&items)[1], &plane(&updated)[1]));
    }

    #[test]
    fn test_additional_components_are_not_traversed() {
        let mut root = ProductionWorkflow::clone(&node("r", "o", vec![]));
        root.additional_components = vec![node("extra", "o", vec![])];
        let items = ProductionItems::Plane(vec![Arc::new(root)]);
        let value = title_patch("changed");
        let updated = update_production_recursively(UpdateArgs {
            id: "extra",
            value: &value,
            items: &items,
        });
        assert_eq!(find_production(&updated, "extra").unwrap().title, "EXTRA");
    }

    #[test]
    fn test_replace_component_in_grouped_view() {
        let group = ProductionWorkflowOrderGroup {
            id: "g".to_string(),
            order_key: "ORD-1".to_string(),
            production_workflows: forest(),
            ..Default::default()
        };
        let items = ProductionItems::Order(vec![group]);
        let mut replacement = ProductionWorkflow::clone(&node("b", "o1", vec![]));
        replacement.status = ProductionStatus::InProgress;
        let value = ProductionUpdate::Replace(Arc::new(replacement));
        let args = UpdateArgs {
            id: "b",
            value: &value,
            items: &items,
        };
        assert!(args.is_replace_component());

        let updated = update_production_recursively(args);
        assert_eq!(find_production(&updated, "b").unwrap().status, ProductionStatus::InProgress);
        assert_eq!(updated.group_by(), items.group_by());
    }

    #[test]
    fn test_flatten_visits_each_nested_node_once() {
        let mut root = ProductionWorkflow::clone(&forest()[0]);
        root.additional_components = vec![node("extra", "o1", vec![])];
        let roots = vec![Arc::new(root), node("r2", "o2", vec![])];

        let ids: Vec<String> = get_all_productions_on_the_screen(&roots)
            .iter()
            .map(|n| n.id.clone())
            .collect();
        assert_eq!(ids, vec!["r1", "a", "a1", "b", "r2"]);
    }

    #[test]
    fn test_remove_production_drops_empty_groups() {
        let items = ProductionItems::Order(vec![
            ProductionWorkflowOrderGroup {
                id: "g1".to_string(),
                production_workflows: vec![node("x", "o", vec![])],
                ..Default::default()
            },
            ProductionWorkflowOrderGroup {
                id: "g2".to_string(),
                production_workflows: vec![node("y", "o", vec![]), node("z", "o", vec![])],
                ..Default::default()
            },
        ]);
        let left = remove_production(&items, "x");
        assert_eq!(left.len(), 1);
        let left = remove_production(&left, "y");
        assert_eq!(left.top_level().len(), 1);

        let plane = remove_production(&ProductionItems::Plane(forest()), "r2");
        assert_eq!(plane.len(), 1);
        assert!(check_is_plane_view(&plane));
        assert!(!check_is_plane_view(&items));
    }
}
