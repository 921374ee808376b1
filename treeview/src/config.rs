//! Widget configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::canvas::Rgb;
use crate::clock::{Clock, SystemClock};

pub const DEFAULT_INDENTATION: u16 = 2;
pub const DEFAULT_EXPANDED_ICON: &str = "▼";
pub const DEFAULT_COLLAPSED_ICON: &str = "▶";
pub const DEFAULT_LEAF_ICON: &str = "→";
pub const DEFAULT_SCROLL_STEP: usize = 5;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
pub const DEFAULT_SPINNER_INTERVAL: Duration = Duration::from_millis(200);

/// Other spinner sets that render well:
/// `◰ ◳ ◲ ◱`, `◴ ◷ ◶ ◵`, `⣾ ⣽ ⣻ ⢿ ⡿ ⣟ ⣯ ⣷`, `← ↖ ↑ ↗ → ↘ ↓ ↙`.
pub fn default_spinner_frames() -> Vec<String> {
    ["◐", "◓", "◑", "◒"].iter().map(|s| s.to_string()).collect()
}

/// Construction-time options for a [`Treeview`](crate::Treeview).
#[derive(Debug, Clone)]
pub struct Options {
    /// Columns of indentation per tree level.
    pub indentation: u16,
    pub expanded_icon: String,
    pub collapsed_icon: String,
    pub leaf_icon: String,
    /// Frames shown in place of the icon while a leaf is busy.
    /// An empty list disables the spinner ticker.
    pub spinner_frames: Vec<String>,
    pub spinner_interval: Duration,
    pub label_color: Rgb,
    pub selected_fg: Rgb,
    pub selected_bg: Rgb,
    pub indicator_color: Rgb,
    /// Shorten labels that overflow the row instead of clipping them.
    pub truncate: bool,
    /// Emit per-event and per-draw diagnostics through `log`.
    pub debug_logging: bool,
    /// Rows moved per mouse wheel notch.
    pub scroll_step: usize,
    /// Window in which a repeated click or activate key is ignored.
    pub debounce: Duration,
    /// Start with every root node expanded.
    pub expand_roots: bool,
    pub clock: Arc<dyn Clock>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            indentation: DEFAULT_INDENTATION,
            expanded_icon: DEFAULT_EXPANDED_ICON.to_string(),
            collapsed_icon: DEFAULT_COLLAPSED_ICON.to_string(),
            leaf_icon: DEFAULT_LEAF_ICON.to_string(),
            spinner_frames: default_spinner_frames(),
            spinner_interval: DEFAULT_SPINNER_INTERVAL,
            label_color: Rgb::WHITE,
            selected_fg: Rgb::BLACK,
            selected_bg: Rgb::WHITE,
            indicator_color: Rgb::WHITE,
            truncate: false,
            debug_logging: false,
            scroll_step: DEFAULT_SCROLL_STEP,
            debounce: DEFAULT_DEBOUNCE,
            expand_roots: true,
            clock: Arc::new(SystemClock),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indentation(mut self, columns: u16) -> Self {
        self.indentation = columns;
        self
    }

    /// Set the expanded, collapsed and leaf icons at once.
    pub fn icons(
        mut self,
        expanded: impl Into<String>,
        collapsed: impl Into<String>,
        leaf: impl Into<String>,
    ) -> Self {
        self.expanded_icon = expanded.into();
        self.collapsed_icon = collapsed.into();
        self.leaf_icon = leaf.into();
        self
    }

    pub fn spinner_frames<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spinner_frames = frames.into_iter().map(Into::into).collect();
        self
    }

    pub fn spinner_interval(mut self, interval: Duration) -> Self {
        self.spinner_interval = interval;
        self
    }

    pub fn label_color(mut self, color: Rgb) -> Self {
        self.label_color = color;
        self
    }

    /// Color of the scroll indicator arrows.
    pub fn indicator_color(mut self, color: Rgb) -> Self {
        self.indicator_color = color;
        self
    }

    pub fn selected_colors(mut self, fg: Rgb, bg: Rgb) -> Self {
        self.selected_fg = fg;
        self.selected_bg = bg;
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    pub fn scroll_step(mut self, rows: usize) -> Self {
        self.scroll_step = rows;
        self
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn expand_roots(mut self, expand: bool) -> Self {
        self.expand_roots = expand;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace unusable values with their defaults.
    pub(crate) fn normalized(mut self) -> Self {
        if self.indentation == 0 {
            self.indentation = DEFAULT_INDENTATION;
        }
        if self.leaf_icon.is_empty() {
            self.leaf_icon = DEFAULT_LEAF_ICON.to_string();
        }
        if self.spinner_interval.is_zero() {
            self.spinner_interval = DEFAULT_SPINNER_INTERVAL;
        }
        self
    }
}
