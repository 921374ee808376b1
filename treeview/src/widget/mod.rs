//! The tree view widget.
//!
//! [`Treeview`] owns the node store, the flattened visible rows, the
//! selection and the viewport behind one lock. Busy state for running leaf
//! callbacks lives in the spinner's channel and is only read here, after the
//! lock is taken.

mod events;
mod render;
mod state;

pub use state::{MINIMUM_SIZE, Treeview};
