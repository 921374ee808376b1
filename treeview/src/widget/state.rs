//! Tree view widget state.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::LOG_TARGET;
use crate::activation::{self, Activation};
use crate::config::Options;
use crate::error::{Result, TreeviewError};
use crate::flatten::flatten;
use crate::input::Debouncer;
use crate::node::{NodeIndex, NodeStore, TreeNode};
use crate::selection::Selection;
use crate::spinner::{BusySnapshot, SpinnerScheduler};
use crate::viewport::{ScrollIndicators, Viewport};

/// Smallest area the widget is useful in, as (width, height).
pub const MINIMUM_SIZE: (u16, u16) = (10, 3);

/// Shared state guarded by the widget lock.
#[derive(Debug)]
pub(super) struct TreeviewInner {
    pub store: NodeStore,
    /// Flattened visible nodes (rebuilt on expand/collapse).
    pub visible: Vec<NodeIndex>,
    pub selection: Selection,
    pub viewport: Viewport,
    /// Top-left corner of the last drawn area.
    pub origin: (u16, u16),
    pub click_debounce: Debouncer,
    pub key_debounce: Debouncer,
}

impl TreeviewInner {
    /// Re-flatten, re-clamp the viewport and re-validate the selection.
    ///
    /// Must follow every change to an expansion flag.
    pub fn refresh(&mut self) {
        self.visible = flatten(&self.store);
        self.viewport.set_total(self.visible.len());
        self.selection.reconcile(&self.store, &self.visible);
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.index_of(&self.store, &self.visible)
    }
}

/// An interactive, scrollable tree of expandable nodes.
///
/// Branch nodes expand and collapse when activated; leaf nodes run their
/// callback in the background and show a spinner until it returns.
///
/// # Example
///
/// ```ignore
/// let roots = vec![TreeNode::new("Root").children([
///     TreeNode::new("Build").on_activate(|| async { run_build().await }),
///     TreeNode::new("Docs"),
/// ])];
/// let tree = Treeview::new(roots, Options::default().truncate(true))?;
/// tree.draw(&mut buffer, Rect::from_size(40, 10))?;
/// ```
#[derive(Debug)]
pub struct Treeview {
    pub(super) options: Options,
    pub(super) inner: Arc<RwLock<TreeviewInner>>,
    pub(super) spinner: SpinnerScheduler,
    pub(super) runtime: Handle,
}

impl Treeview {
    /// Attach `roots` and start the spinner task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(roots: Vec<TreeNode>, options: Options) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| TreeviewError::NoRuntime)?;
        let options = options.normalized();
        let store = NodeStore::attach(roots, options.expand_roots)?;

        let mut inner = TreeviewInner {
            store,
            visible: Vec::new(),
            selection: Selection::new(),
            viewport: Viewport::new(),
            origin: (0, 0),
            click_debounce: Debouncer::new(options.debounce),
            key_debounce: Debouncer::new(options.debounce),
        };
        inner.refresh();

        let spinner = SpinnerScheduler::start(
            &runtime,
            options.spinner_frames.len(),
            options.spinner_interval,
            options.debug_logging,
        );

        debug_log!(
            options.debug_logging,
            "treeview created with {} nodes, {} visible",
            inner.store.len(),
            inner.visible.len()
        );

        Ok(Self {
            options,
            inner: Arc::new(RwLock::new(inner)),
            spinner,
            runtime,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn minimum_size(&self) -> (u16, u16) {
        MINIMUM_SIZE
    }

    pub(super) fn read(&self) -> Result<RwLockReadGuard<'_, TreeviewInner>> {
        self.inner.read().map_err(|_| TreeviewError::StatePoisoned)
    }

    pub(super) fn write(&self) -> Result<RwLockWriteGuard<'_, TreeviewInner>> {
        self.inner.write().map_err(|_| TreeviewError::StatePoisoned)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Label of the selected node.
    pub fn select(&self) -> Result<String> {
        let guard = self.read()?;
        guard
            .selection
            .selected_id()
            .and_then(|id| guard.store.lookup(id))
            .and_then(|index| guard.store.get(index))
            .map(|entry| entry.label().to_string())
            .ok_or(TreeviewError::NoSelection)
    }

    pub fn selected_id(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.selection.selected_id().map(str::to_string))
    }

    /// Select a visible node by ID, scrolling it into view.
    pub fn set_selected(&self, id: &str) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let inner = &mut *guard;
        let Some(position) = inner
            .visible
            .iter()
            .position(|&i| inner.store.get(i).is_some_and(|e| e.id() == id))
        else {
            return false;
        };
        inner.selection.set(id);
        inner.viewport.ensure_visible(position);
        true
    }

    /// Move the selection one row down.
    pub fn next(&self) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let inner = &mut *guard;
        inner
            .selection
            .next(&inner.store, &inner.visible, &mut inner.viewport)
    }

    /// Move the selection one row up.
    pub fn previous(&self) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let inner = &mut *guard;
        inner
            .selection
            .previous(&inner.store, &inner.visible, &mut inner.viewport)
    }

    // -------------------------------------------------------------------------
    // Expand/Collapse
    // -------------------------------------------------------------------------

    pub fn expand(&self, id: &str) -> bool {
        self.set_expanded(id, true)
    }

    pub fn collapse(&self, id: &str) -> bool {
        self.set_expanded(id, false)
    }

    fn set_expanded(&self, id: &str, expanded: bool) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let Some(index) = guard.store.lookup(id) else {
            return false;
        };
        let changed = guard.store.set_expanded(index, expanded);
        if changed {
            guard.refresh();
        }
        changed
    }

    /// Flip a branch's expansion, returning the new state.
    pub fn toggle(&self, id: &str) -> Option<bool> {
        let mut guard = self.inner.write().ok()?;
        let index = guard.store.lookup(id)?;
        let expanded = guard.store.toggle(index)?;
        guard.refresh();
        Some(expanded)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.inner
            .read()
            .ok()
            .and_then(|g| {
                let index = g.store.lookup(id)?;
                g.store.get(index).map(|e| e.is_expanded())
            })
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Select a visible node and activate it.
    pub fn activate(&self, id: &str) -> Option<Activation> {
        let mut guard = self.inner.write().ok()?;
        let position = guard
            .visible
            .iter()
            .position(|&i| guard.store.get(i).is_some_and(|e| e.id() == id))?;
        self.activate_row(&mut guard, position)
    }

    /// Activate the node at `row` of the flattened sequence.
    ///
    /// Branches toggle and re-flatten; leaves with a callback go busy and
    /// launch it.
    pub(super) fn activate_row(&self, inner: &mut TreeviewInner, row: usize) -> Option<Activation> {
        let index = *inner.visible.get(row)?;
        let entry = inner.store.get(index)?;
        let id = entry.id().to_string();
        let has_children = entry.has_children();
        let callback = entry.callback().cloned();
        inner.selection.set(id.clone());

        if has_children {
            let expanded = inner.store.toggle(index)?;
            inner.refresh();
            debug_log!(
                self.options.debug_logging,
                "toggled expansion for '{id}' to {expanded}"
            );
            return Some(Activation::Toggled { id, expanded });
        }

        let Some(callback) = callback else {
            return Some(Activation::Selected { id });
        };
        activation::launch(
            &self.runtime,
            id.clone(),
            callback,
            self.spinner.busy().clone(),
            self.options.debug_logging,
        );
        Some(Activation::Launched { id })
    }

    // -------------------------------------------------------------------------
    // Busy state
    // -------------------------------------------------------------------------

    pub fn is_busy(&self, id: &str) -> bool {
        self.spinner.busy().with_snapshot(|s| s.is_busy(id))
    }

    pub fn busy_frame(&self, id: &str) -> Option<usize> {
        self.spinner.busy().with_snapshot(|s| s.frame(id))
    }

    /// Receiver that changes whenever a node's busy state or frame does.
    pub fn subscribe(&self) -> watch::Receiver<BusySnapshot> {
        self.spinner.busy().subscribe()
    }

    /// Stop the spinner task. Calling it again is a harmless no-op.
    pub fn shutdown(&self) -> bool {
        let stopped = self.spinner.stop();
        if stopped {
            debug!(target: LOG_TARGET, "treeview shut down");
        }
        stopped
    }

    pub fn is_shut_down(&self) -> bool {
        self.spinner.is_stopped()
    }

    pub fn spinner_finished(&self) -> bool {
        self.spinner.is_finished()
    }

    // -------------------------------------------------------------------------
    // Visible rows and scrolling
    // -------------------------------------------------------------------------

    pub fn visible_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| {
                g.visible
                    .iter()
                    .filter_map(|&i| g.store.get(i))
                    .map(|e| e.id().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn visible_count(&self) -> usize {
        self.inner.read().map(|g| g.visible.len()).unwrap_or(0)
    }

    /// IDs from the root down to `id`, inclusive.
    pub fn node_path(&self, id: &str) -> Vec<String> {
        self.inner
            .read()
            .map(|g| match g.store.lookup(id) {
                Some(index) => g
                    .store
                    .path(index)
                    .into_iter()
                    .filter_map(|i| g.store.get(i))
                    .map(|e| e.id().to_string())
                    .collect(),
                None => Vec::new(),
            })
            .unwrap_or_default()
    }

    pub fn scroll_offset(&self) -> usize {
        self.inner.read().map(|g| g.viewport.offset()).unwrap_or(0)
    }

    /// Scroll by `delta` rows (positive is down) without moving the selection.
    pub fn scroll_by(&self, delta: isize) -> usize {
        let Ok(mut guard) = self.inner.write() else {
            return 0;
        };
        guard.viewport.scroll_by(delta);
        guard.viewport.offset()
    }

    pub fn scroll_indicators(&self) -> ScrollIndicators {
        self.inner
            .read()
            .map(|g| g.viewport.indicators())
            .unwrap_or_default()
    }

    /// Set the canvas dimensions without drawing.
    pub fn resize(&self, width: u16, height: u16) -> Result<()> {
        self.write()?.viewport.resize(width, height)
    }
}

impl Drop for Treeview {
    fn drop(&mut self) {
        self.spinner.stop();
    }
}
