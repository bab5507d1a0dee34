use crossterm::style::Color;

/// A single cell in the frame buffer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

/// Off-screen character grid that animations draw into.
///
/// Coordinates outside the frame are silently dropped, so generators can plot
/// without bounds checks of their own.
#[derive(Clone, Debug)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Resize the buffer, discarding its contents
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = Cell { ch, fg, bold };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() rejects a zero chunk size
        self.cells.chunks(self.width.max(1))
    }

    /// Number of cells holding something other than a blank
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.ch != ' ').count()
    }

    /// Render the buffer as text with ANSI colors (for print mode)
    pub fn to_ansi_string(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 4);
        for row in self.rows() {
            for cell in row {
                if cell.ch == ' ' {
                    out.push(' ');
                    continue;
                }

                if cell.bold {
                    out.push_str("\x1b[1m");
                }

                if let Some(color) = cell.fg {
                    out.push_str(&ansi_foreground(color));
                }

                out.push(cell.ch);
                out.push_str("\x1b[0m");
            }
            out.push('\n');
        }
        out
    }
}

fn ansi_foreground(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("\x1b[38;2;{};{};{}m", r, g, b),
        Color::AnsiValue(v) => format!("\x1b[38;5;{}m", v),
        // Standard colors (0-7)
        Color::Black => "\x1b[30m".into(),
        Color::DarkRed => "\x1b[31m".into(),
        Color::DarkGreen => "\x1b[32m".into(),
        Color::DarkYellow => "\x1b[33m".into(),
        Color::DarkBlue => "\x1b[34m".into(),
        Color::DarkMagenta => "\x1b[35m".into(),
        Color::DarkCyan => "\x1b[36m".into(),
        Color::Grey => "\x1b[37m".into(),
        // Bright colors (8-15)
        Color::DarkGrey => "\x1b[90m".into(),
        Color::Red => "\x1b[91m".into(),
        Color::Green => "\x1b[92m".into(),
        Color::Yellow => "\x1b[93m".into(),
        Color::Blue => "\x1b[94m".into(),
        Color::Magenta => "\x1b[95m".into(),
        Color::Cyan => "\x1b[96m".into(),
        Color::White => "\x1b[97m".into(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut frame = Frame::new(4, 2);
        frame.set(-1, 0, 'x', None, false);
        frame.set(4, 0, 'x', None, false);
        frame.set(0, 2, 'x', None, false);
        assert_eq!(frame.filled(), 0);

        frame.set(3, 1, 'x', Some(Color::Red), true);
        assert_eq!(frame.get(3, 1).map(|c| c.ch), Some('x'));
    }

    #[test]
    fn set_str_clips_at_edge() {
        let mut frame = Frame::new(5, 1);
        frame.set_str(2, 0, "hello", None, false);
        assert_eq!(frame.filled(), 3);
        assert_eq!(frame.get(4, 0).map(|c| c.ch), Some('l'));
    }

    #[test]
    fn ansi_output_has_one_line_per_row() {
        let mut frame = Frame::new(3, 2);
        frame.set(1, 1, '#', Some(Color::Rgb { r: 1, g: 2, b: 3 }), false);
        let text = frame.to_ansi_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("\x1b[38;2;1;2;3m#"));
    }
}
