//! Tree view rendering.

use crate::canvas::{Canvas, Cell, Rect};
use crate::config::Options;
use crate::error::{Result, TreeviewError};
use crate::node::NodeEntry;
use crate::spinner::BusySnapshot;
use crate::text::{char_width, truncate_to_width};

use super::state::Treeview;

/// One row as it is drawn: where it starts and the text after the indent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RowLayout {
    /// Columns from the left edge of the target to the icon.
    pub indent: usize,
    /// `icon + " " + label`, already truncated when truncation is on.
    pub text: String,
}

impl RowLayout {
    /// Lay out `entry` for a target `width` columns wide.
    pub fn new(options: &Options, entry: &NodeEntry, busy: &BusySnapshot, width: u16) -> Self {
        let indent = entry.level() * options.indentation as usize;
        let icon = row_icon(options, entry, busy);
        let mut text = format!("{icon} {}", entry.label());
        if options.truncate {
            text = truncate_to_width(&text, (width as usize).saturating_sub(indent));
        }
        Self { indent, text }
    }

    /// Columns actually covered once the row is clipped at `width`.
    pub fn span(&self, width: u16) -> usize {
        let available = (width as usize).saturating_sub(self.indent);
        let mut used = 0;
        for ch in self.text.chars() {
            let w = char_width(ch);
            if used + w > available {
                break;
            }
            used += w;
        }
        used
    }

    /// Whether column `x` (relative to the target) falls on the drawn text.
    pub fn hit(&self, x: u16, width: u16) -> bool {
        let x = x as usize;
        x >= self.indent && x < self.indent + self.span(width)
    }
}

fn row_icon<'a>(options: &'a Options, entry: &NodeEntry, busy: &BusySnapshot) -> &'a str {
    if let Some(frame) = busy.frame(entry.id())
        && let Some(glyph) = options.spinner_frames.get(frame)
    {
        return glyph;
    }
    if !entry.has_children() {
        &options.leaf_icon
    } else if entry.is_expanded() {
        &options.expanded_icon
    } else {
        &options.collapsed_icon
    }
}

impl Treeview {
    /// Draw the visible rows into `area` of `canvas`.
    ///
    /// The area is clipped to the canvas; nothing is written outside it. The
    /// clipped size becomes the viewport size used by scrolling and
    /// hit-testing until the next draw or [`resize`](Self::resize).
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, area: Rect) -> Result<()> {
        let bounds = canvas.area();
        let target = area.intersection(bounds);
        if target.is_empty() {
            return Err(TreeviewError::CanvasTooSmall {
                width: target.width,
                height: target.height,
            });
        }

        let mut guard = self.write()?;
        guard.viewport.resize(target.width, target.height)?;
        guard.origin = (target.x, target.y);
        let inner = &*guard;

        let busy = self.spinner.busy().with_snapshot(BusySnapshot::clone);

        if target == bounds {
            canvas.clear()?;
        } else {
            for y in target.y..target.bottom() {
                for x in target.x..target.right() {
                    canvas.set_cell(x, y, Cell::default())?;
                }
            }
        }

        let selected = inner.selected_index();
        let range = inner.viewport.visible_range();
        for (row, index) in range.clone().enumerate() {
            let Some(entry) = inner.visible.get(index).and_then(|&i| inner.store.get(i)) else {
                continue;
            };
            let layout = RowLayout::new(&self.options, entry, &busy, target.width);
            let (fg, bg) = if selected == Some(index) {
                (self.options.selected_fg, self.options.selected_bg)
            } else {
                (self.options.label_color, Cell::default().bg)
            };
            let y = target.y + row as u16;
            draw_text(canvas, target, layout.indent, y, &layout.text, fg, bg)?;
        }

        let indicators = inner.viewport.indicators();
        let arrow = Cell::new('↑').with_fg(self.options.indicator_color);
        if indicators.up {
            canvas.set_cell(target.x, target.y, arrow)?;
        }
        if indicators.down {
            canvas.set_cell(target.x, target.bottom() - 1, Cell { char: '↓', ..arrow })?;
        }

        debug_log!(
            self.options.debug_logging,
            "drew rows {}..{} of {} into {}x{} at ({}, {})",
            range.start,
            range.end,
            inner.visible.len(),
            target.width,
            target.height,
            target.x,
            target.y
        );
        Ok(())
    }
}

/// Write `text` starting `indent` columns into `target`, clipped at its right
/// edge. Zero-width characters are skipped.
fn draw_text<C: Canvas + ?Sized>(
    canvas: &mut C,
    target: Rect,
    indent: usize,
    y: u16,
    text: &str,
    fg: crate::canvas::Rgb,
    bg: crate::canvas::Rgb,
) -> Result<()> {
    let right = target.right() as usize;
    let mut x = target.x as usize + indent;
    for ch in text.chars() {
        let width = char_width(ch);
        if width == 0 {
            continue;
        }
        if x + width > right {
            break;
        }
        let cell = Cell::new(ch).with_fg(fg).with_bg(bg);
        canvas.set_cell(x as u16, y, cell)?;
        for pad in 1..width {
            let continuation = Cell {
                char: ' ',
                wide_continuation: true,
                ..cell
            };
            canvas.set_cell((x + pad) as u16, y, continuation)?;
        }
        x += width;
    }
    Ok(())
}
