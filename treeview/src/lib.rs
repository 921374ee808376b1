//! Interactive tree view for character-cell terminals.
//!
//! Renders a forest of expandable nodes into any [`Canvas`], keeps a scroll
//! window and a selection consistent as nodes expand and collapse, hit-tests
//! mouse clicks against the drawn rows, and runs leaf callbacks in the
//! background with a spinner in place of the node's icon.
//!
//! # Example
//!
//! ```ignore
//! use treeview::{Buffer, Options, Rect, TreeNode, Treeview};
//!
//! let roots = vec![TreeNode::new("Services").children([
//!     TreeNode::new("api").on_activate(|| async { restart("api").await }),
//!     TreeNode::new("worker").on_activate(|| async { restart("worker").await }),
//! ])];
//! let tree = Treeview::new(roots, Options::default())?;
//!
//! let mut buffer = Buffer::new(40, 10);
//! tree.draw(&mut buffer, Rect::from_size(40, 10))?;
//! ```

/// Log target used for every record emitted by this crate.
pub const LOG_TARGET: &str = "treeview";

/// `debug!` gated on the widget's debug-logging option.
macro_rules! debug_log {
    ($enabled:expr, $($arg:tt)+) => {
        if $enabled {
            log::debug!(target: $crate::LOG_TARGET, $($arg)+);
        }
    };
}

pub mod activation;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod error;
pub mod flatten;
pub mod input;
pub mod node;
pub mod selection;
pub mod spinner;
pub mod text;
pub mod viewport;
mod widget;

pub use activation::{Activation, CallbackPanicked};
pub use canvas::{Buffer, Canvas, Cell, Rect, Rgb};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Options;
pub use error::{BoxError, CanvasError, Result, TreeviewError};
pub use input::{InputOutcome, Key, MouseButton, MouseEvent};
pub use node::{Callback, CallbackResult, TreeNode};
pub use spinner::BusySnapshot;
pub use viewport::ScrollIndicators;
pub use widget::{MINIMUM_SIZE, Treeview};
