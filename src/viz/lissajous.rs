//! Lissajous curve with braille rendering
//!
//! Parametric curve: x = sin(a·s + δ), y = sin(b·s), where the phase δ
//! advances with time. A bright head runs along the curve and the rest of
//! the curve fades behind it.

use crate::anim::{Parameter, ParametricAnimation, Params};
use crate::colors::{level_color, SCHEME_ELECTRIC};
use crate::frame::Frame;
use super::GeneratorKind;
use std::f64::consts::{PI, TAU};

pub const FREQ_A: usize = 1;
pub const FREQ_B: usize = 2;
pub const PHASE_SPEED: usize = 3;
pub const SCALE: usize = 4;

// Braille constants (2x4 dot grid per character)
const BRAILLE_BASE: u32 = 0x2800;
const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

/// Curve samples per frame
const SAMPLES: usize = 1200;
/// How many times the parameter wraps around TAU per frame
const TURNS: f64 = 2.0;
/// Samples the head advances per second
const HEAD_RATE: f64 = 240.0;

pub struct Lissajous {
    params: Params,
}

impl Lissajous {
    pub fn new() -> Self {
        Self {
            params: Params::new([
                Parameter::new("freq_a", 3.0, 1.0, 8.0, 0.1),
                Parameter::new("freq_b", 2.0, 1.0, 8.0, 0.1),
                Parameter::new("phase_speed", 0.5, 0.0, 3.0, 0.05),
                Parameter::new("scale", 0.85, 0.2, 1.0, 0.05),
            ]),
        }
    }

    fn phase(&self, t: f64) -> f64 {
        t * self.params.value(PHASE_SPEED)
    }

    /// Point on the curve for parameter `s`, both coordinates in [-1, 1]
    pub fn point(&self, s: f64, t: f64) -> (f64, f64) {
        let a = self.params.value(FREQ_A);
        let b = self.params.value(FREQ_B);
        ((a * s + self.phase(t)).sin(), (b * s).sin())
    }
}

impl Default for Lissajous {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode 2x4 dot pattern to braille character
fn encode_braille(dots: &[[bool; DOTS_X]; DOTS_Y]) -> char {
    // Braille dot positions:
    // 0 3
    // 1 4
    // 2 5
    // 6 7
    const BITS: [[u32; DOTS_X]; DOTS_Y] = [[0, 3], [1, 4], [2, 5], [6, 7]];
    let mut code: u32 = 0;
    for (row, bits) in dots.iter().zip(BITS) {
        for (&on, bit) in row.iter().zip(bits) {
            if on {
                code |= 1 << bit;
            }
        }
    }
    char::from_u32(BRAILLE_BASE + code).unwrap_or(' ')
}

impl ParametricAnimation for Lissajous {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Lissajous
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    fn draw(&self, frame: &mut Frame, t: f64) {
        let (width, height) = frame.size();
        if width == 0 || height == 0 {
            return;
        }

        let grid_w = width * DOTS_X;
        let grid_h = height * DOTS_Y;
        let mut intensity = vec![0.0f64; grid_w * grid_h];

        let cx = grid_w as f64 / 2.0;
        let cy = grid_h as f64 / 2.0;
        // Braille dots are square-ish, so one radius serves both axes
        let radius = (cx.min(cy) * self.params.value(SCALE)).max(1.0);
        let head = (t * HEAD_RATE).rem_euclid(SAMPLES as f64);

        for i in 0..SAMPLES {
            let s = i as f64 / SAMPLES as f64 * TAU * TURNS;
            let (x, y) = self.point(s, t);
            let px = (cx + x * radius) as usize;
            let py = (cy + y * radius) as usize;
            if px >= grid_w || py >= grid_h {
                continue;
            }
            // Distance behind the head, wrapping around the sample ring
            let behind = (head - i as f64).rem_euclid(SAMPLES as f64) / SAMPLES as f64;
            let level = 0.25 + 0.75 * (1.0 - behind).powi(2);
            let cell = &mut intensity[py * grid_w + px];
            *cell = cell.max(level);
        }

        for char_y in 0..height {
            for char_x in 0..width {
                let mut dots = [[false; DOTS_X]; DOTS_Y];
                let mut max_intensity: f64 = 0.0;

                for (dy, row) in dots.iter_mut().enumerate() {
                    for (dx, dot) in row.iter_mut().enumerate() {
                        let gx = char_x * DOTS_X + dx;
                        let gy = char_y * DOTS_Y + dy;
                        let value = intensity[gy * grid_w + gx];
                        if value > 0.0 {
                            *dot = true;
                            max_intensity = max_intensity.max(value);
                        }
                    }
                }

                if max_intensity > 0.0 {
                    let (color, bold) = level_color(SCHEME_ELECTRIC, max_intensity);
                    frame.set(char_x as i32, char_y as i32, encode_braille(&dots), Some(color), bold);
                }
            }
        }
    }

    fn value_at(&self, x: f64, y: f64, t: f64) -> f64 {
        let a = self.params.value(FREQ_A);
        let b = self.params.value(FREQ_B);
        let u = (2.0 * x - 1.0) * PI;
        let v = (2.0 * y - 1.0) * PI;
        (a * u + self.phase(t)).sin() * (b * v).sin()
    }

    /// Sine of the current phase angle
    fn global_value(&self, t: f64) -> f64 {
        self.phase(t).sin()
    }

    fn provides_modulation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braille_encoding_sets_expected_bits() {
        let mut dots = [[false; DOTS_X]; DOTS_Y];
        assert_eq!(encode_braille(&dots), '\u{2800}');
        dots[0][0] = true;
        dots[3][1] = true;
        assert_eq!(encode_braille(&dots), char::from_u32(0x2800 + 1 + 128).unwrap());
    }

    #[test]
    fn draws_braille_cells() {
        let curve = Lissajous::new();
        let mut frame = Frame::new(40, 20);
        curve.draw(&mut frame, 0.5);
        assert!(frame.filled() > 20);
        let braille = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter_map(|(x, y)| frame.get(x, y))
            .filter(|c| ('\u{2800}'..='\u{28FF}').contains(&c.ch))
            .count();
        assert_eq!(braille, frame.filled());
    }

    #[test]
    fn global_value_follows_phase() {
        let mut curve = Lissajous::new();
        curve.params_mut().set(PHASE_SPEED, 1.0);
        assert!((curve.global_value(PI / 2.0) - 1.0).abs() < 1e-12);
        curve.params_mut().set(PHASE_SPEED, 0.0);
        assert_eq!(curve.global_value(123.0), 0.0);
    }
}
