//! Terminal setup, teardown and diffed output.

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use treeview::text::char_width;
use treeview::{Buffer, Canvas, Rgb};

/// Owns the terminal while the demo runs and restores it on drop or panic.
pub struct Screen {
    stdout: Stdout,
    current: Buffer,
    previous: Buffer,
}

impl Screen {
    pub fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            current: Buffer::new(width, height),
            previous: Buffer::new(width, height),
        })
    }

    /// Redraw the whole frame through `paint`, then write only changed cells.
    pub fn render<F>(&mut self, paint: F) -> Result<(), treeview::BoxError>
    where
        F: FnOnce(&mut Buffer) -> Result<(), treeview::BoxError>,
    {
        let (width, height) = terminal::size()?;
        if width != self.current.width() || height != self.current.height() {
            self.current = Buffer::new(width, height);
            self.previous = Buffer::new(width, height);
            execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
            // Force every cell out on the next flush.
            for y in 0..height {
                for x in 0..width {
                    self.previous.set_cell(x, y, treeview::Cell::new('\0'))?;
                }
            }
        }

        self.current.clear()?;
        paint(&mut self.current)?;
        self.flush_diff()?;
        std::mem::swap(&mut self.current, &mut self.previous);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_x = u16::MAX;
        let mut last_y = u16::MAX;
        let mut last_char_width: u16 = 1;
        let mut last_fg = Rgb::WHITE;
        let mut last_bg = Rgb::BLACK;

        queue!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(rgb(last_fg)),
            SetBackgroundColor(rgb(last_bg))
        )?;

        for (x, y, cell) in self.current.diff(&self.previous) {
            if cell.wide_continuation {
                continue;
            }

            if y != last_y || x != last_x.wrapping_add(last_char_width) {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }
            if cell.fg != last_fg {
                queue!(self.stdout, SetForegroundColor(rgb(cell.fg)))?;
                last_fg = cell.fg;
            }
            if cell.bg != last_bg {
                queue!(self.stdout, SetBackgroundColor(rgb(cell.bg)))?;
                last_bg = cell.bg;
            }

            write!(self.stdout, "{}", cell.char)?;

            last_x = x;
            last_y = y;
            last_char_width = char_width(cell.char).max(1) as u16;
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn rgb(color: Rgb) -> CtColor {
    CtColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show, DisableMouseCapture)?;
    Ok(())
}
