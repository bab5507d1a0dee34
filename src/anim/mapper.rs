//! Value mapping from the normalized modulation range into parameter ranges

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Response curve used when mapping a modulation value into a range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMode {
    #[default]
    Linear,
    /// Eased toward both endpoints, slowest change near the extremes
    Quadratic,
    /// Sine easing, smoothest through the whole range
    Sine,
}

impl MappingMode {
    pub const ALL: [MappingMode; 3] = [MappingMode::Linear, MappingMode::Quadratic, MappingMode::Sine];

    pub fn next(self) -> Self {
        match self {
            MappingMode::Linear => MappingMode::Quadratic,
            MappingMode::Quadratic => MappingMode::Sine,
            MappingMode::Sine => MappingMode::Linear,
        }
    }

    /// Map `value` in [-1, 1] to `[out_min, out_max]`.
    /// Inputs outside [-1, 1] are clamped first.
    pub fn map(self, value: f64, out_min: f64, out_max: f64) -> f64 {
        let v = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
        let unit = match self {
            MappingMode::Linear => (v + 1.0) * 0.5,
            MappingMode::Quadratic => {
                let eased = 1.0 - (1.0 - v.abs()).powi(2);
                (v.signum() * eased + 1.0) * 0.5
            }
            MappingMode::Sine => ((v * FRAC_PI_2).sin() + 1.0) * 0.5,
        };
        // Pin the endpoints so they are exact rather than off by an ulp
        if v <= -1.0 {
            out_min
        } else if v >= 1.0 {
            out_max
        } else {
            out_min + unit * (out_max - out_min)
        }
    }
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MappingMode::Linear => "linear",
            MappingMode::Quadratic => "quadratic",
            MappingMode::Sine => "sine",
        };
        f.write_str(name)
    }
}

/// Map `value` in [-1, 1] to `[out_min, out_max]` with the given curve
pub fn map(value: f64, out_min: f64, out_max: f64, mode: MappingMode) -> f64 {
    mode.map(value, out_min, out_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn endpoints_are_exact_for_every_mode() {
        for mode in MappingMode::ALL {
            assert_eq!(map(-1.0, 2.0, 6.0, mode), 2.0, "{mode}");
            assert_eq!(map(1.0, 2.0, 6.0, mode), 6.0, "{mode}");
            assert_eq!(map(-1.0, 6.0, 2.0, mode), 6.0, "{mode} reversed");
        }
    }

    #[test]
    fn zero_maps_to_midpoint() {
        for mode in MappingMode::ALL {
            assert!((map(0.0, 0.5, 3.0, mode) - 1.75).abs() < EPS, "{mode}");
        }
    }

    #[test]
    fn linear_is_affine() {
        assert!((map(0.5, 0.0, 4.0, MappingMode::Linear) - 3.0).abs() < EPS);
        assert!((map(-0.5, 0.0, 4.0, MappingMode::Linear) - 1.0).abs() < EPS);
    }

    #[test]
    fn quadratic_slows_near_extremes() {
        let near_end = map(1.0, 0.0, 1.0, MappingMode::Quadratic) - map(0.9, 0.0, 1.0, MappingMode::Quadratic);
        let near_mid = map(0.1, 0.0, 1.0, MappingMode::Quadratic) - map(0.0, 0.0, 1.0, MappingMode::Quadratic);
        assert!(near_end < near_mid);
    }

    #[test]
    fn every_mode_is_monotonic() {
        for mode in MappingMode::ALL {
            let mut prev = f64::NEG_INFINITY;
            for i in 0..=200 {
                let v = -1.0 + i as f64 * 0.01;
                let out = map(v, -3.0, 3.0, mode);
                assert!(out >= prev, "{mode} decreased at {v}");
                prev = out;
            }
        }
    }

    #[test]
    fn out_of_range_inputs_clamp() {
        assert_eq!(map(7.0, 1.0, 2.0, MappingMode::Sine), 2.0);
        assert_eq!(map(f64::NEG_INFINITY, 1.0, 2.0, MappingMode::Linear), 1.0);
        assert!((map(f64::NAN, 1.0, 2.0, MappingMode::Linear) - 1.5).abs() < EPS);
    }

    #[test]
    fn cycles_through_modes() {
        assert_eq!(MappingMode::Sine.next(), MappingMode::Linear);
        assert_eq!(MappingMode::Linear.next().next(), MappingMode::Sine);
    }
}
