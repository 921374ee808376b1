//! Event handling for the tree view.

use crate::error::Result;
use crate::input::{InputOutcome, Key, MouseButton, MouseEvent};
use crate::spinner::BusySnapshot;

use super::render::RowLayout;
use super::state::Treeview;

impl Treeview {
    /// Handle a mouse event at absolute screen coordinates.
    ///
    /// Coordinates are translated against the area of the last draw.
    pub fn handle_mouse(&self, event: MouseEvent) -> Result<InputOutcome> {
        match event.button {
            MouseButton::Left => self.handle_click(event.x, event.y),
            MouseButton::WheelUp => self.handle_wheel(-1),
            MouseButton::WheelDown => self.handle_wheel(1),
            MouseButton::Release | MouseButton::Other => Ok(InputOutcome::Ignored),
        }
    }

    fn handle_click(&self, x: u16, y: u16) -> Result<InputOutcome> {
        let now = self.options.clock.now();
        let mut guard = self.write()?;

        if !guard.click_debounce.accept(now) {
            debug_log!(self.options.debug_logging, "click at ({x}, {y}) debounced");
            return Ok(InputOutcome::Debounced);
        }

        let (origin_x, origin_y) = guard.origin;
        let (Some(rel_x), Some(rel_y)) = (x.checked_sub(origin_x), y.checked_sub(origin_y)) else {
            return Ok(InputOutcome::Ignored);
        };
        if rel_x >= guard.viewport.width() {
            return Ok(InputOutcome::Ignored);
        }
        let Some(row) = guard.viewport.index_at_row(rel_y) else {
            return Ok(InputOutcome::Ignored);
        };

        let busy = self.spinner.busy().with_snapshot(BusySnapshot::clone);
        let width = guard.viewport.width();
        let hit = guard
            .visible
            .get(row)
            .and_then(|&i| guard.store.get(i))
            .map(|entry| RowLayout::new(&self.options, entry, &busy, width))
            .is_some_and(|layout| layout.hit(rel_x, width));
        if !hit {
            debug_log!(
                self.options.debug_logging,
                "click at ({rel_x}, {rel_y}) missed row {row}"
            );
            return Ok(InputOutcome::Ignored);
        }

        debug_log!(self.options.debug_logging, "click hit row {row}");
        Ok(self
            .activate_row(&mut guard, row)
            .map_or(InputOutcome::Ignored, InputOutcome::Activated))
    }

    fn handle_wheel(&self, direction: isize) -> Result<InputOutcome> {
        let step = self.options.scroll_step as isize;
        let mut guard = self.write()?;
        guard.viewport.scroll_by(direction * step);
        let offset = guard.viewport.offset();
        debug_log!(self.options.debug_logging, "wheel scrolled to offset {offset}");
        Ok(InputOutcome::Scrolled { offset })
    }

    /// Handle a key press.
    ///
    /// Up/Down move the selection; Enter/Space activate the selected node.
    pub fn handle_key(&self, key: Key) -> Result<InputOutcome> {
        match key {
            Key::Up | Key::Down => {
                let mut guard = self.write()?;
                let inner = &mut *guard;
                let moved = if key == Key::Up {
                    inner
                        .selection
                        .previous(&inner.store, &inner.visible, &mut inner.viewport)
                } else {
                    inner
                        .selection
                        .next(&inner.store, &inner.visible, &mut inner.viewport)
                };
                match inner.selection.selected_id() {
                    Some(id) if moved => Ok(InputOutcome::SelectionMoved { id: id.to_string() }),
                    _ => Ok(InputOutcome::Ignored),
                }
            }
            Key::Enter | Key::Space => {
                let now = self.options.clock.now();
                let mut guard = self.write()?;
                if !guard.key_debounce.accept(now) {
                    debug_log!(self.options.debug_logging, "activate key debounced");
                    return Ok(InputOutcome::Debounced);
                }
                let inner = &mut *guard;
                let Some(row) = inner.selection.reconcile(&inner.store, &inner.visible) else {
                    return Ok(InputOutcome::Ignored);
                };
                Ok(self
                    .activate_row(inner, row)
                    .map_or(InputOutcome::Ignored, InputOutcome::Activated))
            }
            Key::Other => Ok(InputOutcome::Ignored),
        }
    }
}
