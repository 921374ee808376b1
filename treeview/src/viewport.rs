//! Scroll offset and canvas dimensions.

use std::ops::Range;

use crate::error::{Result, TreeviewError};

/// Which scroll arrows should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollIndicators {
    pub up: bool,
    pub down: bool,
}

/// Window of `height` consecutive rows over the flattened tree.
///
/// Every mutation re-clamps the offset into `0..=max(0, total - height)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    width: u16,
    height: u16,
    total: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of rows in the flattened sequence.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Update the canvas dimensions.
    ///
    /// A zero dimension is rejected and leaves the viewport untouched.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(TreeviewError::CanvasTooSmall { width, height });
        }
        self.width = width;
        self.height = height;
        self.clamp();
        Ok(())
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.clamp();
    }

    pub fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.height as usize)
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
        self.clamp();
    }

    /// Move the window; positive deltas scroll down.
    pub fn scroll_by(&mut self, delta: isize) {
        self.offset = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.clamp();
    }

    /// Indices of the flattened sequence that fall inside the window.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total);
        let end = self
            .offset
            .saturating_add(self.height as usize)
            .min(self.total);
        start..end
    }

    pub fn indicators(&self) -> ScrollIndicators {
        ScrollIndicators {
            up: self.offset > 0,
            down: self.offset + (self.height as usize) < self.total,
        }
    }

    /// Shift the window by the least amount that brings `index` into view.
    pub fn ensure_visible(&mut self, index: usize) {
        let height = self.height as usize;
        if height == 0 {
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + height {
            self.offset = index + 1 - height;
        }
        self.clamp();
    }

    /// Map a row inside the window to a flattened index.
    pub fn index_at_row(&self, row: u16) -> Option<usize> {
        if row >= self.height {
            return None;
        }
        let index = self.offset + row as usize;
        (index < self.total).then_some(index)
    }
}
