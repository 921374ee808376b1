//! Error types for the tree view widget.

use thiserror::Error;

/// Boxed error returned by leaf callbacks and foreign render sinks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by a render sink.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A write targeted a cell outside the sink's area.
    #[error("cell ({x}, {y}) is outside the canvas")]
    OutOfBounds { x: u16, y: u16 },

    /// The backing sink failed.
    #[error("canvas backend error: {0}")]
    Backend(#[source] BoxError),
}

/// Errors surfaced by the widget's entry points.
#[derive(Debug, Error)]
pub enum TreeviewError {
    /// The canvas (or the requested target area) has no usable cells.
    #[error("canvas too small ({width}x{height})")]
    CanvasTooSmall { width: u16, height: u16 },

    /// Nothing is selected (empty tree, or every node hidden).
    #[error("no option selected")]
    NoSelection,

    /// Two nodes derived the same ID while attaching the forest.
    #[error("duplicate node id '{id}'")]
    DuplicateId { id: String },

    /// The widget was built outside a tokio runtime.
    #[error("treeview must be created inside a tokio runtime")]
    NoRuntime,

    /// A thread panicked while holding the widget lock.
    #[error("treeview state lock poisoned")]
    StatePoisoned,

    /// The render sink failed; passed through unchanged.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Result alias for widget operations.
pub type Result<T> = std::result::Result<T, TreeviewError>;
