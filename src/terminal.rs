use crate::frame::Frame;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Raw-mode alternate screen that frames are presented to
pub struct Terminal {
    width: u16,
    height: u16,
}

impl Terminal {
    /// Enter raw mode and the alternate screen
    pub fn new() -> io::Result<Self> {
        let (width, height) = size()?;

        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;

        Ok(Self { width, height })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Re-query the terminal size. Returns true if it changed.
    pub fn refresh_size(&mut self) -> io::Result<bool> {
        let (width, height) = size()?;
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.clear_screen()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Draw the whole frame, switching color and weight only between runs
    pub fn present(&self, frame: &Frame) -> io::Result<()> {
        let mut out = stdout().lock();
        let mut color: Option<Color> = None;
        let mut bold = false;

        for (y, row) in frame.rows().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            for cell in row {
                if cell.bold != bold {
                    // Reset also drops the color
                    let attribute = if cell.bold { Attribute::Bold } else { Attribute::Reset };
                    queue!(out, SetAttribute(attribute))?;
                    bold = cell.bold;
                    if !bold {
                        color = None;
                    }
                }
                if cell.fg != color {
                    match cell.fg {
                        Some(fg) => queue!(out, SetForegroundColor(fg))?,
                        None => queue!(out, ResetColor)?,
                    }
                    color = cell.fg;
                }
                queue!(out, Print(cell.ch))?;
            }
        }

        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        out.flush()
    }

    /// Next pending key press, without blocking
    pub fn check_key(&self) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                // Windows reports releases too
                if key_event.kind != KeyEventKind::Release {
                    return Ok(Some((key_event.code, key_event.modifiers)));
                }
            }
        }
        Ok(None)
    }

    pub fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
