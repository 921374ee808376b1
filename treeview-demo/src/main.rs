//! Terminal demo for the tree view widget.
//!
//! Run with `cargo run -p treeview-demo`. Arrow keys move, Enter/Space or a
//! click activates, the wheel scrolls, `q` or Esc quits. Diagnostics go to
//! `treeview_debug.log`.

mod processes;
mod terminal;

use std::fs::File;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures::StreamExt;
use log::{debug, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use treeview::{Buffer, Canvas, Cell, InputOutcome, Options, Rect, Rgb, Treeview};

use crate::processes::{ProcessInfo, Selected};
use crate::terminal::Screen;

const TREE_BLUE: Rgb = Rgb::new(90, 150, 255);
const MUTED: Rgb = Rgb::new(140, 140, 140);
const HELP: &str = "↑/↓ move  Enter/Space/click activate  wheel scroll  q quit";

#[tokio::main]
async fn main() -> Result<(), treeview::BoxError> {
    let log_file = File::create("treeview_debug.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let selected = Selected::default();
    let options = Options::default()
        .label_color(TREE_BLUE)
        .truncate(true)
        .debug_logging(true);
    let tree = Treeview::new(processes::build(&selected), options)?;

    let mut screen = Screen::new()?;
    let mut events = EventStream::new();
    let mut busy = tree.subscribe();
    let mut metrics = tokio::time::interval(Duration::from_secs(1));

    info!("treeview demo started");
    loop {
        screen.render(|buffer| paint(&tree, &selected, buffer))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => {
                    if handle_event(&tree, event)? {
                        break;
                    }
                }
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            changed = busy.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = metrics.tick() => {
                if let Ok(mut current) = selected.lock()
                    && let Some(info) = current.as_mut()
                {
                    info.sample();
                }
            }
        }
    }

    tree.shutdown();
    info!("treeview demo stopped");
    Ok(())
}

/// Returns true when the demo should exit.
fn handle_event(tree: &Treeview, event: Event) -> treeview::Result<bool> {
    let outcome = match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            _ => tree.handle_key(key.into())?,
        },
        Event::Mouse(mouse) => tree.handle_mouse(mouse.into())?,
        _ => return Ok(false),
    };
    if let InputOutcome::Activated(activation) = &outcome {
        info!("activated '{}'", activation.id());
    } else {
        debug!("input outcome: {outcome:?}");
    }
    Ok(false)
}

fn paint(tree: &Treeview, selected: &Selected, buffer: &mut Buffer) -> Result<(), treeview::BoxError> {
    let area = buffer.area();
    let (min_width, min_height) = tree.minimum_size();
    if area.width < min_width || area.height < min_height + 1 {
        put_str(buffer, 0, 0, "terminal too small", MUTED)?;
        return Ok(());
    }

    let body_height = area.height - 1;
    let tree_width = (area.width * 3 / 5).max(min_width);
    tree.draw(buffer, Rect::new(0, 0, tree_width, body_height))?;

    let details_x = tree_width + 2;
    if details_x < area.width {
        let info = selected.lock().ok().and_then(|current| current.clone());
        paint_details(buffer, details_x, info.as_ref())?;
    }

    let status = match tree.select() {
        Ok(label) => format!("{label}  |  {HELP}"),
        Err(err) => format!("{err}  |  {HELP}"),
    };
    put_str(buffer, 0, area.height - 1, &status, MUTED)?;
    Ok(())
}

fn paint_details(buffer: &mut Buffer, x: u16, info: Option<&ProcessInfo>) -> Result<(), treeview::BoxError> {
    let Some(info) = info else {
        put_str(buffer, x, 0, "Activate a feature to inspect it.", MUTED)?;
        return Ok(());
    };

    let lines = [
        format!("Selected Node: {}", info.label),
        format!("PID:           {}", info.pid),
        format!("CPU Usage:     {}%", info.cpu),
        format!("Memory Usage:  {}%", info.memory),
    ];
    for (row, line) in lines.iter().enumerate() {
        put_str(buffer, x, row as u16, line, Rgb::WHITE)?;
    }

    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let spark: String = info
        .history
        .iter()
        .map(|&cpu| BARS[(cpu as usize * (BARS.len() - 1)) / 100])
        .collect();
    put_str(buffer, x, lines.len() as u16 + 1, &spark, TREE_BLUE)?;
    Ok(())
}

/// Write `text` on one row, clipped at the buffer's right edge.
fn put_str(buffer: &mut Buffer, x: u16, y: u16, text: &str, fg: Rgb) -> Result<(), treeview::BoxError> {
    let mut col = x as usize;
    for ch in text.chars() {
        let width = treeview::text::char_width(ch);
        if width == 0 {
            continue;
        }
        if col + width > buffer.width() as usize {
            break;
        }
        buffer.set_cell(col as u16, y, Cell::new(ch).with_fg(fg))?;
        col += width;
    }
    Ok(())
}
