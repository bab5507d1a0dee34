//! Rotating multi-arm spiral

use crate::anim::{Parameter, ParametricAnimation, Params};
use crate::colors::{level_color, SCHEME_PINK};
use crate::frame::Frame;
use super::{ramp_glyph, GeneratorKind, CELL_ASPECT, DENSITY_RAMP};

pub const ARMS: usize = 1;
pub const ROTATION_SPEED: usize = 2;
pub const TIGHTNESS: usize = 3;
pub const THICKNESS: usize = 4;

/// Radial wavenumber at tightness 1.0
const WINDING: f64 = 12.0;

pub struct Spiral {
    params: Params,
}

impl Spiral {
    pub fn new() -> Self {
        Self {
            params: Params::new([
                Parameter::new("arms", 3.0, 1.0, 8.0, 1.0).integral(),
                Parameter::new("rotation_speed", 1.0, 0.1, 3.0, 0.1),
                Parameter::new("tightness", 1.0, 0.1, 3.0, 0.1),
                Parameter::new("thickness", 0.5, 0.1, 1.0, 0.05),
            ]),
        }
    }

    /// Spiral field at a point given relative to the center, aspect corrected
    fn field(&self, dx: f64, dy: f64, t: f64) -> f64 {
        let arms = self.params.value(ARMS);
        let r = (dx * dx + dy * dy).sqrt();
        let angle = dy.atan2(dx);
        (arms * angle + r * WINDING * self.params.value(TIGHTNESS) - t * self.params.value(ROTATION_SPEED)).sin()
    }
}

impl Default for Spiral {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametricAnimation for Spiral {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Spiral
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

        let thickness = self.params.value(THICKNESS);
        // Cutoff below which a cell is left blank
        let threshold = 1.0 - 2.0 * thickness;
        let unit = width as f64;
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;

        for y in 0..height {
            let dy = (y as f64 + 0.5 - cy) * CELL_ASPECT / unit;
            for x in 0..width {
                let dx = (x as f64 + 0.5 - cx) / unit;
                let value = self.field(dx, dy, t);
                if value < threshold {
                    continue;
                }
                let level = (value - threshold) / (1.0 - threshold).max(1e-6);
                // Fade out toward the rim
                let r = (dx * dx + dy * dy).sqrt();
                let level = level * (1.0 - r).clamp(0.25, 1.0);
                let (color, bold) = level_color(SCHEME_PINK, level);
                frame.set(x as i32, y as i32, ramp_glyph(&DENSITY_RAMP[1..], level), Some(color), bold);
            }
        }
    }

    fn value_at(&self, x: f64, y: f64, t: f64) -> f64 {
        self.field(x - 0.5, (y - 0.5) * CELL_ASPECT, t)
    }

    fn global_value(&self, t: f64) -> f64 {
        (t * self.params.value(ROTATION_SPEED)).sin()
    }

    fn provides_modulation(&self) -> bool {
        true
    }
}
