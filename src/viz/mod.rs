//! Generator catalog
//!
//! Each generator lives in its own module and implements
//! [`ParametricAnimation`](crate::anim::ParametricAnimation).

pub mod fluid;
pub mod lissajous;
pub mod mandelbrot;
pub mod plasma;
pub mod spiral;
pub mod swarm;
pub mod tunnel;
pub mod wave_circles;

use crate::anim::ParametricAnimation;
use mandelbrot::DeepZoomPolicy;
use std::f64::consts::TAU;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// Size generators assume before the first resize
pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 24;

/// Density ramp shared by the field-style generators
pub const DENSITY_RAMP: [char; 9] = [' ', '.', ':', ';', 'o', 'O', '0', '@', '#'];

/// The closed set of generators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    Lissajous,
    Spiral,
    WaveCircles,
    Plasma,
    Mandelbrot,
    Fluid,
    Swarm,
    Tunnel,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 8] = [
        GeneratorKind::Lissajous,
        GeneratorKind::Spiral,
        GeneratorKind::WaveCircles,
        GeneratorKind::Plasma,
        GeneratorKind::Mandelbrot,
        GeneratorKind::Fluid,
        GeneratorKind::Swarm,
        GeneratorKind::Tunnel,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GeneratorKind::Lissajous => "lissajous",
            GeneratorKind::Spiral => "spiral",
            GeneratorKind::WaveCircles => "circles",
            GeneratorKind::Plasma => "plasma",
            GeneratorKind::Mandelbrot => "mandelbrot",
            GeneratorKind::Fluid => "fluid",
            GeneratorKind::Swarm => "swarm",
            GeneratorKind::Tunnel => "tunnel",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GeneratorKind::Lissajous => "Lissajous",
            GeneratorKind::Spiral => "Spiral",
            GeneratorKind::WaveCircles => "Wave Circles",
            GeneratorKind::Plasma => "Plasma",
            GeneratorKind::Mandelbrot => "Mandelbrot Zoomer",
            GeneratorKind::Fluid => "Fluid Lattice",
            GeneratorKind::Swarm => "Particle Swarm",
            GeneratorKind::Tunnel => "Tunnel Vision",
        }
    }
}

/// Construct a generator with default parameters.
///
/// `seed` only matters for the stochastic generators; `deep_zoom` only for
/// the Mandelbrot zoomer.
pub fn build(kind: GeneratorKind, seed: Option<u64>, deep_zoom: Option<DeepZoomPolicy>) -> Box<dyn ParametricAnimation> {
    let seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });

    match kind {
        GeneratorKind::Lissajous => Box::new(lissajous::Lissajous::new()),
        GeneratorKind::Spiral => Box::new(spiral::Spiral::new()),
        GeneratorKind::WaveCircles => Box::new(wave_circles::WaveCircles::new()),
        GeneratorKind::Plasma => Box::new(plasma::Plasma::new()),
        GeneratorKind::Mandelbrot => {
            let mut zoomer = mandelbrot::MandelbrotZoomer::new();
            zoomer.set_policy(deep_zoom);
            Box::new(zoomer)
        }
        GeneratorKind::Fluid => Box::new(fluid::FluidLattice::with_seed(seed)),
        GeneratorKind::Swarm => Box::new(swarm::ParticleSwarm::with_seed(seed)),
        GeneratorKind::Tunnel => Box::new(tunnel::TunnelVision::new()),
    }
}

/// Sine lookup table for per-cell field evaluation
pub struct SinTable {
    table: Vec<f64>,
}

impl SinTable {
    const SIZE: usize = 1024;

    pub fn new() -> Self {
        Self {
            table: (0..Self::SIZE)
                .map(|i| ((i as f64 / Self::SIZE as f64) * TAU).sin())
                .collect(),
        }
    }

    /// Table sine, always within [-1, 1]
    #[inline]
    pub fn sin(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }
        let normalized = x.rem_euclid(TAU) / TAU;
        let idx = (normalized * Self::SIZE as f64) as usize;
        self.table[idx.min(Self::SIZE - 1)]
    }
}

impl Default for SinTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick a glyph from `ramp` for a level in [0, 1]
pub fn ramp_glyph(ramp: &[char], level: f64) -> char {
    let last = ramp.len() - 1;
    let idx = (level.clamp(0.0, 1.0) * last as f64).round() as usize;
    ramp[idx.min(last)]
}

/// Normalized coordinates of a cell center
pub fn cell_center(x: usize, y: usize, width: usize, height: usize) -> (f64, f64) {
    (
        (x as f64 + 0.5) / width.max(1) as f64,
        (y as f64 + 0.5) / height.max(1) as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sin_table_tracks_sin() {
        let table = SinTable::new();
        for i in 0..100 {
            let x = i as f64 * 0.37 - 15.0;
            assert!((table.sin(x) - x.sin()).abs() < 0.01, "x={x}");
        }
        assert_eq!(table.sin(f64::INFINITY), 0.0);
    }

    #[test]
    fn ramp_glyph_covers_ends() {
        assert_eq!(ramp_glyph(&DENSITY_RAMP, 0.0), ' ');
        assert_eq!(ramp_glyph(&DENSITY_RAMP, 1.0), '#');
        assert_eq!(ramp_glyph(&DENSITY_RAMP, 7.0), '#');
    }

    #[test]
    fn kinds_have_unique_ids() {
        let mut ids: Vec<_> = GeneratorKind::ALL.iter().map(|k| k.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), GeneratorKind::ALL.len());
    }
}
