//! Selected-node tracking.
//!
//! The selection is held by node ID rather than row index: the flattened
//! sequence is rebuilt whenever expansion changes, so indices do not survive.

use crate::node::{NodeIndex, NodeStore};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Row of the selected node in `visible`, if it is shown.
    pub fn index_of(&self, store: &NodeStore, visible: &[NodeIndex]) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        visible
            .iter()
            .position(|&i| store.get(i).is_some_and(|e| e.id() == selected))
    }

    /// Make sure the selection points at a visible row.
    ///
    /// A hidden or missing selection falls back to the first visible node, or
    /// to nothing when no rows are visible.
    pub fn reconcile(&mut self, store: &NodeStore, visible: &[NodeIndex]) -> Option<usize> {
        if let Some(index) = self.index_of(store, visible) {
            return Some(index);
        }
        match visible.first().and_then(|&i| store.get(i)) {
            Some(first) => {
                self.selected = Some(first.id().to_string());
                Some(0)
            }
            None => {
                self.selected = None;
                None
            }
        }
    }

    /// Move one row down. Returns whether the selection changed.
    pub fn next(&mut self, store: &NodeStore, visible: &[NodeIndex], viewport: &mut Viewport) -> bool {
        self.step(store, visible, viewport, 1)
    }

    /// Move one row up. Returns whether the selection changed.
    pub fn previous(
        &mut self,
        store: &NodeStore,
        visible: &[NodeIndex],
        viewport: &mut Viewport,
    ) -> bool {
        self.step(store, visible, viewport, -1)
    }

    fn step(
        &mut self,
        store: &NodeStore,
        visible: &[NodeIndex],
        viewport: &mut Viewport,
        delta: isize,
    ) -> bool {
        let Some(current) = self.index_of(store, visible) else {
            let before = self.selected.clone();
            self.reconcile(store, visible);
            return self.selected != before;
        };
        let Some(target) = current.checked_add_signed(delta) else {
            return false;
        };
        let Some(entry) = visible.get(target).and_then(|&i| store.get(i)) else {
            return false;
        };
        self.selected = Some(entry.id().to_string());
        viewport.ensure_visible(target);
        true
    }
}
