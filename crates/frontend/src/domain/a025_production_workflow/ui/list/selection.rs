use contracts::domain::a025_production_workflow::{ProductionItems, ProductionWorkflow};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::a025_production_workflow::tree::get_all_productions_on_the_screen;

/// Счётчик родителей выбранных производств (мультимножество)
///
/// Two selected siblings hold the same parent twice; deselecting one of them
/// removes a single occurrence only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentRefCount {
    counts: HashMap<String, usize>,
}

impl ParentRefCount {
    pub fn add(&mut self, parent_id: &str) {
        *self.counts.entry(parent_id.to_string()).or_insert(0) += 1;
    }

    /// Removes one occurrence; unknown ids are ignored
    pub fn remove_one(&mut self, parent_id: &str) {
        if let Some(count) = self.counts.get_mut(parent_id) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(parent_id);
            }
        }
    }

    pub fn count(&self, parent_id: &str) -> usize {
        self.counts.get(parent_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, parent_id: &str) -> bool {
        self.count(parent_id) > 0
    }

    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Множественный выбор производств
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub is_enable_multi_actions: bool,
    pub selected: Vec<Arc<ProductionWorkflow>>,
    pub parent_ids: ParentRefCount,
}

impl SelectionState {
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|node| node.id == id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().map(|node| node.id.clone()).collect()
    }

    /// Turning multi-actions off drops the whole selection
    pub fn toggle_multi_actions(&mut self, enabled: bool) {
        self.is_enable_multi_actions = enabled;
        if !enabled {
            self.clear();
        }
    }

    /// Batch toggle: every node of the batch flips its membership.
    /// Parent bookkeeping is not touched.
    pub fn toggle_batch(&mut self, batch: &[Arc<ProductionWorkflow>]) {
        for node in batch {
            if self.is_selected(&node.id) {
                self.selected.retain(|selected| selected.id != node.id);
            } else {
                self.selected.push(node.clone());
            }
        }
        self.is_enable_multi_actions = true;
    }

    /// Toggles one node. `parent_id` is the top-level production the
    /// checkbox belongs to.
    pub fn toggle_one(&mut self, node: &Arc<ProductionWorkflow>, parent_id: Option<&str>) {
        if self.is_selected(&node.id) {
            self.selected.retain(|selected| selected.id != node.id);
            if let Some(parent_id) = parent_id {
                self.parent_ids.remove_one(parent_id);
            }
        } else {
            self.selected.push(node.clone());
            if let Some(parent_id) = parent_id {
                self.parent_ids.add(parent_id);
            }
        }
        self.is_enable_multi_actions = true;
    }

    /// Clears a non-empty selection (or any selection with `reset_all`).
    /// Otherwise selects every node on screen, plane view only.
    ///
    /// Returns the ids that should be expanded: every selected node that has
    /// nested workflows. Empty when nothing was selected.
    pub fn select_or_deselect_all(&mut self, items: &ProductionItems, reset_all: bool) -> Vec<String> {
        if reset_all || !self.selected.is_empty() {
            self.clear();
            return Vec::new();
        }
        let ProductionItems::Plane(roots) = items else {
            return Vec::new();
        };

        let productions = get_all_productions_on_the_screen(roots);
        self.parent_ids.clear();
        for root in roots {
            self.parent_ids.add(&root.id);
        }
        let to_expand = productions
            .iter()
            .filter(|node| node.has_nested())
            .map(|node| node.id.clone())
            .collect();
        self.selected = productions;
        to_expand
    }

    fn clear(&mut self) {
        self.selected.clear();
        self.parent_ids.clear();
    }
}
