//! Checkerboard tunnel flying toward the viewer

use crate::anim::{Parameter, ParametricAnimation, Params};
use crate::colors::{cyclic_palette, rgb};
use crate::frame::Frame;
use super::{GeneratorKind, CELL_ASPECT};
use crossterm::style::Color;
use std::f64::consts::TAU;

pub const DEPTH_SPEED: usize = 1;
pub const ROTATION_SPEED: usize = 2;
pub const TUNNEL_SIZE: usize = 3;
pub const COLOR_CYCLE_SPEED: usize = 4;

/// Distance floor, keeps 1/distance finite at the center
const MIN_DISTANCE: f64 = 0.05;
/// Extra twist per unit of depth
const TWIST: f64 = 0.1;
const SEGMENTS: f64 = 8.0;
/// Palette steps across depth rings
const RING_COLOR_STEP: f64 = 0.05;

const LIGHT_CHARS: [char; 4] = ['░', '▒', '▓', '█'];
const DARK_CHARS: [char; 4] = [' ', '.', ':', '+'];

/// One sample of the tunnel surface
struct Sample {
    depth: f64,
    checker: bool,
    /// 1.0 at the rim, fading toward the vanishing point
    shade: f64,
}

pub struct TunnelVision {
    params: Params,
}

impl TunnelVision {
    pub fn new() -> Self {
        Self {
            params: Params::new([
                Parameter::new("depth_speed", 1.0, 0.1, 5.0, 0.1),
                Parameter::new("rotation_speed", 0.5, -2.0, 2.0, 0.1),
                Parameter::new("tunnel_size", 1.0, 0.3, 3.0, 0.1),
                Parameter::new("color_cycle_speed", 1.0, 0.1, 3.0, 0.1),
            ]),
        }
    }

    /// Sample at an offset from the center in width units
    fn sample(&self, dx: f64, dy: f64, t: f64) -> Sample {
        let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
        let angle = dy.atan2(dx);

        let depth = self.params.value(TUNNEL_SIZE) / distance + t * self.params.value(DEPTH_SPEED);
        let rotated = angle + t * self.params.value(ROTATION_SPEED) + depth * TWIST;
        let segment = (rotated.rem_euclid(TAU) / TAU * SEGMENTS).floor();
        let checker = (depth.floor() as i64 + segment as i64).rem_euclid(2) == 0;

        Sample {
            depth,
            checker,
            shade: (distance * 2.0).clamp(0.0, 1.0),
        }
    }

    fn color(&self, sample: &Sample, t: f64) -> Color {
        let phase = t * self.params.value(COLOR_CYCLE_SPEED) * 0.1 + sample.depth.floor() * RING_COLOR_STEP;
        match cyclic_palette(phase) {
            Color::Rgb { r, g, b } => {
                let k = sample.shade;
                rgb((r as f64 * k) as u8, (g as f64 * k) as u8, (b as f64 * k) as u8)
            }
            other => other,
        }
    }
}

impl Default for TunnelVision {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametricAnimation for TunnelVision {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Tunnel
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    fn draw(&self, frame: &mut Frame, t: f64) {
        let (width, height) = frame.size();
        let unit = width.max(1) as f64;
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;

        for y in 0..height {
            let dy = (y as f64 + 0.5 - cy) * CELL_ASPECT / unit;
            for x in 0..width {
                let dx = (x as f64 + 0.5 - cx) / unit;
                let sample = self.sample(dx, dy, t);
                let level = ((sample.shade * LIGHT_CHARS.len() as f64) as usize).min(LIGHT_CHARS.len() - 1);
                let ch = if sample.checker { LIGHT_CHARS[level] } else { DARK_CHARS[level] };
                if ch != ' ' {
                    frame.set(x as i32, y as i32, ch, Some(self.color(&sample, t)), false);
                }
            }
        }
    }

    /// +shade on light tiles, -shade on dark ones
    fn value_at(&self, x: f64, y: f64, t: f64) -> f64 {
        let sample = self.sample(x - 0.5, (y - 0.5) * CELL_ASPECT, t);
        if sample.checker {
            sample.shade
        } else {
            -sample.shade
        }
    }

    fn global_value(&self, t: f64) -> f64 {
        (t * self.params.value(COLOR_CYCLE_SPEED)).sin()
    }

    fn provides_modulation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_finite() {
        let tunnel = TunnelVision::new();
        let sample = tunnel.sample(0.0, 0.0, 10.0);
        assert!(sample.depth.is_finite());
        assert!((tunnel.value_at(0.5, 0.5, 10.0)).abs() <= 1.0);
    }

    #[test]
    fn rotation_direction_follows_sign() {
        let mut tunnel = TunnelVision::new();
        let mut frame_a = Frame::new(40, 20);
        let mut frame_b = Frame::new(40, 20);
        tunnel.params_mut().set(ROTATION_SPEED, 2.0);
        tunnel.draw(&mut frame_a, 1.0);
        tunnel.params_mut().set(ROTATION_SPEED, -2.0);
        tunnel.draw(&mut frame_b, 1.0);
        let differs = (0..20).any(|y| (0..40).any(|x| frame_a.get(x, y).map(|c| c.ch) != frame_b.get(x, y).map(|c| c.ch)));
        assert!(differs);
    }
}
