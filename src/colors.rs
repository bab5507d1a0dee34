use crossterm::style::Color;

/// Color schemes addressable by the generators
pub const SCHEME_ICE: u8 = 2;
pub const SCHEME_PINK: u8 = 3;
pub const SCHEME_GOLD: u8 = 4;
pub const SCHEME_ELECTRIC: u8 = 5;
pub const SCHEME_NEON: u8 = 9;

/// Helper to create RGB colors
pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

/// Get color from scheme based on intensity (0-3)
pub fn scheme_color(scheme: u8, intensity: u8, bold: bool) -> (Color, bool) {
    match scheme {
        SCHEME_ICE => match intensity {
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Cyan, bold),
            _ => (Color::Cyan, true),
        },
        SCHEME_PINK => match intensity {
            0 => (Color::DarkMagenta, false),
            1 => (Color::Magenta, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(13), true),  // Bright magenta
        },
        SCHEME_GOLD => match intensity {
            0 => (Color::DarkYellow, false),
            1 => (Color::Yellow, false),
            2 => (Color::Yellow, bold),
            _ => (Color::AnsiValue(11), true),  // Bright yellow
        },
        SCHEME_ELECTRIC => match intensity {
            0 => (Color::DarkCyan, false),
            1 => (Color::Cyan, false),
            2 => (Color::Cyan, bold),
            _ => (Color::AnsiValue(14), true),  // Bright cyan
        },
        SCHEME_NEON => match intensity {
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Magenta, bold),
            _ => (Color::White, true),
        },
        _ => match intensity {  // Default: Green (matrix)
            0 => (Color::DarkGreen, false),
            1 => (Color::Green, false),
            2 => (Color::Green, true),
            _ => (Color::White, true),
        },
    }
}

/// Map a level in [0, 1] onto the four scheme intensities
pub fn level_color(scheme: u8, level: f64) -> (Color, bool) {
    let level = level.clamp(0.0, 1.0);
    let intensity = ((level * 4.0) as u8).min(3);
    scheme_color(scheme, intensity, level > 0.7)
}

/// Smooth cyclic RGB palette, `t` wraps at 1.0
///
/// Cosine palette: each channel is `0.5 + 0.5 * cos(τ(t + phase))`.
pub fn cyclic_palette(t: f64) -> Color {
    let tau = std::f64::consts::TAU;
    let channel = |phase: f64| -> u8 {
        let v = 0.5 + 0.5 * (tau * (t + phase)).cos();
        (v.clamp(0.0, 1.0) * 255.0) as u8
    };
    rgb(channel(0.0), channel(0.33), channel(0.67))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_color_saturates() {
        assert_eq!(level_color(SCHEME_ICE, 5.0), scheme_color(SCHEME_ICE, 3, true));
        assert_eq!(level_color(SCHEME_ICE, -1.0), scheme_color(SCHEME_ICE, 0, false));
    }

    #[test]
    fn cyclic_palette_wraps() {
        assert_eq!(cyclic_palette(0.25), cyclic_palette(1.25));
    }
}
