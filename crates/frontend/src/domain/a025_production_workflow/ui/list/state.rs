use contracts::domain::a025_production_workflow::{
    ProductionItems, ProductionStatus, ProductionWorkflow,
};
use contracts::system::users::User;
use leptos::prelude::*;
use std::sync::Arc;

use super::selection::SelectionState;
use crate::domain::a025_production_workflow::tree::{
    check_is_plane_view, get_all_productions_on_the_screen,
};

/// Индикатор массового запуска
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchingProgress {
    pub visible: bool,
    pub count: u64,
}

impl LaunchingProgress {
    pub fn show(&mut self, count: u64) {
        self.visible = true;
        self.count = count;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.count = 0;
    }
}

/// Строка таблицы: узел дерева с глубиной вложенности
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRow {
    pub production: Arc<ProductionWorkflow>,
    pub depth: usize,
    /// Top-level production the row belongs to
    pub root_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionListState {
    pub users: Vec<User>,
    pub production_items: ProductionItems,
    pub selection: SelectionState,
    /// Overlay: nodes shown as launching whatever their persisted status
    pub launching_production_ids: Vec<String>,
    pub assigning_responsible_to_production_ids: Vec<String>,
    pub opened_production_ids: Vec<String>,
    pub launching_progress: LaunchingProgress,
}

impl ProductionListState {
    pub fn is_launching(&self, id: &str) -> bool {
        self.launching_production_ids.iter().any(|launching| launching == id)
    }

    pub fn is_opened(&self, id: &str) -> bool {
        self.opened_production_ids.iter().any(|opened| opened == id)
    }

    pub fn is_assigning_responsible(&self, id: &str) -> bool {
        self.assigning_responsible_to_production_ids
            .iter()
            .any(|assigning| assigning == id)
    }

    /// Expands or collapses nested productions of a node
    pub fn toggle_opened(&mut self, id: &str) {
        if self.is_opened(id) {
            self.opened_production_ids.retain(|opened| opened != id);
        } else {
            self.opened_production_ids.push(id.to_string());
        }
    }

    /// Top-level rows plus the nested rows of every expanded node
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        fn walk(
            state: &ProductionListState,
            node: &Arc<ProductionWorkflow>,
            depth: usize,
            root_id: &str,
            rows: &mut Vec<VisibleRow>,
        ) {
            rows.push(VisibleRow {
                production: node.clone(),
                depth,
                root_id: root_id.to_string(),
            });
            if state.is_opened(&node.id) {
                for nested in &node.nested_workflows {
                    walk(state, nested, depth + 1, root_id, rows);
                }
            }
        }

        let mut rows = Vec::new();
        for root in self.production_items.top_level() {
            walk(self, root, 0, &root.id, &mut rows);
        }
        rows
    }

    pub fn add_launching_ids(&mut self, ids: &[String]) {
        for id in ids {
            if !self.is_launching(id) {
                self.launching_production_ids.push(id.clone());
            }
        }
    }

    pub fn remove_launching_ids(&mut self, ids: &[String]) {
        self.launching_production_ids.retain(|id| !ids.contains(id));
    }

    /// Selection is non-empty, nothing selected is launching, and every
    /// selected node is a top-level To_Do production of the plane view
    pub fn is_mass_launch_possible(&self) -> bool {
        let selected = &self.selection.selected;
        if selected.is_empty() || !check_is_plane_view(&self.production_items) {
            return false;
        }
        let roots = self.production_items.top_level();
        selected.iter().all(|node| {
            !self.is_launching(&node.id)
                && !node.is_launch_in_progress
                && node.status == ProductionStatus::ToDo
                && roots.iter().any(|root| root.id == node.id)
        })
    }

    /// Every selected node is a To_Do root whose additional components are
    /// all To_Do as well
    pub fn is_delete_enabled(&self) -> bool {
        let selected = &self.selection.selected;
        !selected.is_empty()
            && selected.iter().all(|node| {
                node.is_root()
                    && node.status == ProductionStatus::ToDo
                    && get_all_productions_on_the_screen(&node.additional_components)
                        .iter()
                        .all(|component| component.status == ProductionStatus::ToDo)
            })
    }
}

/// Create state signal
pub fn create_state() -> RwSignal<ProductionListState> {
    RwSignal::new(ProductionListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a025_production_workflow::ProductionWorkflowOrderGroup;

    fn node(id: &str, status: ProductionStatus) -> Arc<ProductionWorkflow> {
        Arc::new(ProductionWorkflow {
            id: id.to_string(),
            status,
            ..Default::default()
        })
    }

    fn state_with(roots: Vec<Arc<ProductionWorkflow>>) -> ProductionListState {
        ProductionListState {
            production_items: ProductionItems::Plane(roots),
            ..Default::default()
        }
    }

    #[test]
    fn test_mass_launch_requires_to_do_roots() {
        let a = node("a", ProductionStatus::ToDo);
        let b = node("b", ProductionStatus::ToDo);
        let mut state = state_with(vec![a.clone(), b.clone()]);
        assert!(!state.is_mass_launch_possible());

        state.selection.toggle_batch(&[a.clone(), b.clone()]);
        assert!(state.is_mass_launch_possible());

        state.add_launching_ids(&["b".to_string()]);
        assert!(!state.is_mass_launch_possible());
        state.remove_launching_ids(&["b".to_string()]);

        let stopped = node("c", ProductionStatus::Stopped);
        state.production_items = ProductionItems::Plane(vec![a, b, stopped.clone()]);
        state.selection.toggle_batch(&[stopped]);
        assert!(!state.is_mass_launch_possible());
    }

    #[test]
    fn test_mass_launch_rejects_nested_and_grouped() {
        let child = Arc::new(ProductionWorkflow {
            id: "child".to_string(),
            main_root_id: Some("root".to_string()),
            ..Default::default()
        });
        let root = Arc::new(ProductionWorkflow {
            id: "root".to_string(),
            nested_workflows: vec![child.clone()],
            ..Default::default()
        });
        let mut state = state_with(vec![root.clone()]);
        state.selection.toggle_one(&child, Some("root"));
        assert!(!state.is_mass_launch_possible());

        let mut grouped = ProductionListState {
            production_items: ProductionItems::Order(vec![ProductionWorkflowOrderGroup {
                production_workflows: vec![root.clone()],
                ..Default::default()
            }]),
            ..Default::default()
        };
        grouped.selection.toggle_batch(&[root]);
        assert!(!grouped.is_mass_launch_possible());
    }

    #[test]
    fn test_delete_checks_additional_components() {
        let done_component = node("extra", ProductionStatus::Done);
        let root = Arc::new(ProductionWorkflow {
            id: "root".to_string(),
            additional_components: vec![done_component],
            ..Default::default()
        });
        let plain = node("plain", ProductionStatus::ToDo);
        let mut state = state_with(vec![root.clone(), plain.clone()]);
        assert!(!state.is_delete_enabled());

        state.selection.toggle_batch(&[plain]);
        assert!(state.is_delete_enabled());
        state.selection.toggle_batch(&[root]);
        assert!(!state.is_delete_enabled());
    }

    #[test]
    fn test_toggle_opened() {
        let mut state = ProductionListState::default();
        state.toggle_opened("a");
        assert!(state.is_opened("a"));
        state.toggle_opened("a");
        assert!(!state.is_opened("a"));
    }

    #[test]
    fn test_visible_rows_follow_opened_ids() {
        let leaf = node("leaf", ProductionStatus::ToDo);
        let mid = Arc::new(ProductionWorkflow {
            id: "mid".to_string(),
            nested_workflows: vec![leaf],
            ..Default::default()
        });
        let root = Arc::new(ProductionWorkflow {
            id: "root".to_string(),
            nested_workflows: vec![mid],
            ..Default::default()
        });
        let mut state = state_with(vec![root, node("other", ProductionStatus::ToDo)]);

        let ids = |state: &ProductionListState| -> Vec<(String, usize)> {
            state
                .visible_rows()
                .into_iter()
                .map(|row| (row.production.id.clone(), row.depth))
                .collect()
        };
        assert_eq!(ids(&state), vec![("root".to_string(), 0), ("other".to_string(), 0)]);

        state.toggle_opened("root");
        state.toggle_opened("mid");
        let rows = state.visible_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].production.id, "leaf");
        assert_eq!(rows[2].depth, 2);
        assert_eq!(rows[2].root_id, "root");
    }

    #[test]
    fn test_assigning_overlay() {
        let mut state = ProductionListState::default();
        assert!(!state.is_assigning_responsible("a"));
        state.assigning_responsible_to_production_ids = vec!["a".to_string()];
        assert!(state.is_assigning_responsible("a"));
        assert!(!state.is_assigning_responsible("b"));
    }
}
