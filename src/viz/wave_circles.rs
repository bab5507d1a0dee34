//! Interfering circular waves from slowly orbiting emitters

use crate::anim::{Parameter, ParametricAnimation, Params};
use crate::colors::{level_color, SCHEME_ICE};
use crate::frame::Frame;
use super::{cell_center, ramp_glyph, GeneratorKind, SinTable, CELL_ASPECT, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use std::f64::consts::TAU;

pub const FREQUENCY: usize = 1;
pub const SPEED: usize = 2;
pub const SOURCES: usize = 3;
pub const DECAY: usize = 4;

const WAVE_CHARS: [char; 7] = [' ', '.', '-', '~', '^', '"', '*'];
/// Wavelengths per unit of normalized distance at frequency 1.0
const WAVES_PER_UNIT: f64 = 12.0;
const ORBIT_RADIUS: f64 = 0.22;
const ORBIT_RATE: f64 = 0.15;

pub struct WaveCircles {
    params: Params,
    sin: SinTable,
    /// Height of the frame in width units
    ratio: f64,
}

impl WaveCircles {
    pub fn new() -> Self {
        Self {
            params: Params::new([
                Parameter::new("frequency", 1.5, 0.5, 5.0, 0.1),
                Parameter::new("speed", 1.0, 0.1, 5.0, 0.1),
                Parameter::new("sources", 3.0, 1.0, 6.0, 1.0).integral(),
                Parameter::new("decay", 0.3, 0.0, 2.0, 0.05),
            ]),
            sin: SinTable::new(),
            ratio: aspect_ratio(DEFAULT_WIDTH, DEFAULT_HEIGHT),
        }
    }

    fn emitter(&self, index: usize, count: usize, t: f64) -> (f64, f64) {
        if count == 1 {
            return (0.5, 0.5);
        }
        let angle = index as f64 / count as f64 * TAU + t * ORBIT_RATE;
        (0.5 + ORBIT_RADIUS * angle.cos(), 0.5 + ORBIT_RADIUS * angle.sin())
    }

    /// Average of the emitter waves at normalized `(x, y)`; y is scaled by
    /// the frame ratio so rings stay round on screen
    fn field(&self, x: f64, y: f64, t: f64) -> f64 {
        let count = self.params.value(SOURCES) as usize;
        let k = self.params.value(FREQUENCY) * WAVES_PER_UNIT;
        let omega = self.params.value(SPEED) * 4.0;
        let decay = self.params.value(DECAY);

        let mut sum = 0.0;
        for i in 0..count {
            let (ex, ey) = self.emitter(i, count, t);
            let dx = x - ex;
            let dy = (y - ey) * self.ratio;
            let dist = (dx * dx + dy * dy).sqrt();
            sum += self.sin.sin(dist * k - t * omega) * (-decay * dist * 4.0).exp();
        }
        sum / count.max(1) as f64
    }
}

fn aspect_ratio(width: usize, height: usize) -> f64 {
    height as f64 * CELL_ASPECT / width.max(1) as f64
}

impl Default for WaveCircles {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametricAnimation for WaveCircles {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::WaveCircles
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.ratio = aspect_ratio(width, height);
    }

    fn draw(&self, frame: &mut Frame, t: f64) {
        let (width, height) = frame.size();
        for y in 0..height {
            for x in 0..width {
                let (fx, fy) = cell_center(x, y, width, height);
                let value = self.field(fx, fy, t);
                let level = (value + 1.0) * 0.5;
                let ch = ramp_glyph(&WAVE_CHARS, level);
                if ch != ' ' {
                    let (color, bold) = level_color(SCHEME_ICE, level);
                    frame.set(x as i32, y as i32, ch, Some(color), bold);
                }
            }
        }
    }

    fn value_at(&self, x: f64, y: f64, t: f64) -> f64 {
        self.field(x, y, t).clamp(-1.0, 1.0)
    }

    /// Wave height at the center of the pattern
    fn global_value(&self, t: f64) -> f64 {
        self.value_at(0.5, 0.5, t)
    }

    fn provides_modulation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_source_sits_at_center() {
        let mut circles = WaveCircles::new();
        circles.params_mut().set(SOURCES, 1.0);
        assert_eq!(circles.emitter(0, 1, 3.0), (0.5, 0.5));
    }

    #[test]
    fn decay_attenuates_far_field() {
        let mut circles = WaveCircles::new();
        circles.params_mut().set(SOURCES, 1.0);
        circles.params_mut().set(DECAY, 2.0);
        let far: f64 = (0..50).map(|i| circles.value_at(0.0, 0.0, i as f64 * 0.1).abs()).sum();
        circles.params_mut().set(DECAY, 0.0);
        let undamped: f64 = (0..50).map(|i| circles.value_at(0.0, 0.0, i as f64 * 0.1).abs()).sum();
        assert!(far < undamped);
    }
}
