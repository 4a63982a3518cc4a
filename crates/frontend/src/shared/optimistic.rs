//! Оптимистичные изменения состояния с откатом
//!
//! A [`Transaction`] remembers one slice of a store, lets the caller publish
//! speculative changes to it and then either keeps them (`commit`) or puts the
//! remembered slice back untouched (`rollback`). Rollback restores the exact
//! snapshot, so `Arc`-shared subtrees come back with their original identity.

use leptos::prelude::*;

pub struct Transaction<S, T>
where
    S: Send + Sync + 'static,
    T: Clone,
{
    store: RwSignal<S>,
    lens: fn(&mut S) -> &mut T,
    /// `None` when the store was already disposed
    snapshot: Option<T>,
}

impl<S, T> Transaction<S, T>
where
    S: Send + Sync + 'static,
    T: Clone,
{
    pub fn begin(store: RwSignal<S>, lens: fn(&mut S) -> &mut T) -> Self {
        let snapshot = store.try_update_untracked(|state| lens(state).clone());
        Self {
            store,
            lens,
            snapshot,
        }
    }

    /// Mutates the slice and notifies subscribers
    pub fn apply(&self, change: impl FnOnce(&mut T)) {
        let lens = self.lens;
        self.store.update(|state| change(lens(state)));
    }

    pub fn commit(self) {}

    pub fn rollback(self) {
        let lens = self.lens;
        if let Some(snapshot) = self.snapshot {
            self.store.update(move |state| *lens(state) = snapshot);
        }
    }
}
