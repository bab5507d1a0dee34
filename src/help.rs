use crate::frame::Frame;
use crossterm::style::Color;

pub const KEY_HELP: &str = "\
termfuse
Up/Down     parameter 1
Left/Right  parameter 2
w/s         parameter 3
a/d         parameter 4
Tab/n p     next / previous entry
Space       pause
r           reset parameters
m           cycle mapping (fusions)
+/-         modulation strength
F1-F4 !@#$  save preset slot
1-4         load preset slot
?           toggle this help
q/Esc       quit";

/// Draw a centered box with `text` over whatever the frame already holds
pub fn render_help_overlay(frame: &mut Frame, text: &str) {
    if text.is_empty() {
        return;
    }

    let lines: Vec<&str> = text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4;
    let box_height = lines.len() + 2;

    let (width, height) = frame.size();
    let start_x = width.saturating_sub(box_width) / 2;
    let start_y = height.saturating_sub(box_height) / 2;

    let border = Some(Color::White);
    let text_color = Some(Color::Grey);

    let left = start_x as i32;
    let right = (start_x + box_width - 1) as i32;
    let top = start_y as i32;
    let bottom = (start_y + box_height - 1) as i32;

    frame.set(left, top, '┌', border, false);
    frame.set(right, top, '┐', border, false);
    frame.set(left, bottom, '└', border, false);
    frame.set(right, bottom, '┘', border, false);
    for x in left + 1..right {
        frame.set(x, top, '─', border, false);
        frame.set(x, bottom, '─', border, false);
    }

    for (i, line) in lines.iter().enumerate() {
        let y = top + 1 + i as i32;
        frame.set(left, y, '│', border, false);
        let padding = max_width.saturating_sub(line.chars().count());
        let padded = format!(" {}{} ", line, " ".repeat(padding));
        frame.set_str(left + 1, y, &padded, text_color, i == 0);
        frame.set(right, y, '│', border, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_centered_and_boxed() {
        let mut frame = Frame::new(20, 7);
        render_help_overlay(&mut frame, "abc\nde");
        // 7 wide, 4 tall box
        assert_eq!(frame.get(6, 1).map(|c| c.ch), Some('┌'));
        assert_eq!(frame.get(12, 4).map(|c| c.ch), Some('┘'));
        assert_eq!(frame.get(8, 2).map(|c| c.ch), Some('a'));
    }

    #[test]
    fn oversized_text_is_clipped() {
        let mut frame = Frame::new(5, 3);
        render_help_overlay(&mut frame, KEY_HELP);
        assert!(frame.filled() > 0);
    }
}
