//! Plasma effect (four interfering sine fields)

use crate::anim::{Parameter, ParametricAnimation, Params};
use crate::colors::{level_color, SCHEME_NEON};
use crate::frame::Frame;
use super::{cell_center, ramp_glyph, GeneratorKind, SinTable, DENSITY_RAMP};

pub const FREQ_X: usize = 1;
pub const FREQ_Y: usize = 2;
pub const SPEED: usize = 3;
pub const RADIAL_FREQ: usize = 4;

// Per-term time multipliers
const TIME_MULT_X: f64 = 1.0;
const TIME_MULT_Y: f64 = 1.5;
const TIME_MULT_DIAG: f64 = 0.5;

pub struct Plasma {
    params: Params,
    sin: SinTable,
}

impl Plasma {
    pub fn new() -> Self {
        Self {
            params: Params::new([
                Parameter::new("freq_x", 10.0, 1.0, 20.0, 0.5),
                Parameter::new("freq_y", 10.0, 1.0, 20.0, 0.5),
                Parameter::new("speed", 1.0, 0.1, 5.0, 0.1),
                Parameter::new("radial_freq", 10.0, 0.0, 20.0, 0.5),
            ]),
            sin: SinTable::new(),
        }
    }

    /// Mean of the four terms, always in [-1, 1]
    fn field(&self, fx: f64, fy: f64, t: f64) -> f64 {
        let freq_x = self.params.value(FREQ_X);
        let freq_y = self.params.value(FREQ_Y);
        let radial = self.params.value(RADIAL_FREQ);
        let time = t * self.params.value(SPEED);

        let v1 = self.sin.sin(fx * freq_x + time * TIME_MULT_X);
        let v2 = self.sin.sin(fy * freq_y + time * TIME_MULT_Y);
        let v3 = self.sin.sin((fx + fy) * (freq_x + freq_y) * 0.25 + time * TIME_MULT_DIAG);
        let dx = fx - 0.5;
        let dy = fy - 0.5;
        let v4 = self.sin.sin((dx * dx + dy * dy).sqrt() * radial - time * TIME_MULT_X);

        (v1 + v2 + v3 + v4) * 0.25
    }
}

impl Default for Plasma {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametricAnimation for Plasma {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Plasma
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    fn draw(&self, frame: &mut Frame, t: f64) {
        let (width, height) = frame.size();
        for y in 0..height {
            for x in 0..width {
                let (fx, fy) = cell_center(x, y, width, height);
                let normalized = (self.field(fx, fy, t) + 1.0) * 0.5;
                let (color, bold) = level_color(SCHEME_NEON, normalized);
                frame.set(x as i32, y as i32, ramp_glyph(&DENSITY_RAMP, normalized), Some(color), bold);
            }
        }
    }

    fn value_at(&self, x: f64, y: f64, t: f64) -> f64 {
        self.field(x, y, t)
    }

    /// Plasma value at the center of the field
    fn global_value(&self, t: f64) -> f64 {
        self.field(0.5, 0.5, t)
    }

    fn provides_modulation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_value_moves_with_time() {
        let plasma = Plasma::new();
        let samples: Vec<f64> = (0..20).map(|i| plasma.global_value(i as f64 * 0.3)).collect();
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(max - min > 0.2);
    }

    #[test]
    fn fills_every_cell_color() {
        let plasma = Plasma::new();
        let mut frame = Frame::new(30, 10);
        plasma.draw(&mut frame, 0.0);
        for y in 0..10 {
            for x in 0..30 {
                assert!(frame.get(x, y).and_then(|c| c.fg).is_some());
            }
        }
    }
}
