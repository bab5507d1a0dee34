//! Fluid lattice: a damped 2D wave equation with random raindrops
//!
//! Two height grids ping-pong between steps. The new field is written over
//! the previous one in place (each cell only reads its own previous value),
//! then the buffers are swapped.

use crate::anim::{Parameter, ParametricAnimation, Params};
use crate::colors::{level_color, SCHEME_ICE};
use crate::frame::Frame;
use super::{ramp_glyph, GeneratorKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use rand::prelude::*;

pub const RAIN_RATE: usize = 1;
pub const WAVE_SPEED: usize = 2;
pub const DROP_STRENGTH: usize = 3;
pub const DAMPING: usize = 4;

/// Stability limit of the explicit 2D scheme (Courant number 1/√2)
const MAX_COURANT_SQ: f64 = 0.5;
/// Height that maps to a modulation value of 1.0, for samples and the mean alike
const HEIGHT_SCALE: f64 = 8.0;
/// Stride of the coarse sample used for the global value
const SAMPLE_STRIDE: usize = 4;
/// Levels below this render blank
const VISIBILITY: f64 = 0.02;

const RIPPLE_CHARS: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Row-major grid of heights
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[y * self.width + x]
    }

    fn add(&mut self, x: usize, y: usize, amount: f64) {
        self.cells[y * self.width + x] += amount;
    }

    /// Sum of squared heights
    pub fn energy(&self) -> f64 {
        self.cells.iter().map(|h| h * h).sum()
    }

    pub fn is_flat(&self) -> bool {
        self.cells.iter().all(|&h| h == 0.0)
    }
}

pub struct FluidLattice {
    params: Params,
    current: Grid,
    previous: Grid,
    rng: StdRng,
}

impl FluidLattice {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: Params::new([
                Parameter::new("rain_rate", 0.3, 0.0, 1.5, 0.05),
                Parameter::new("wave_speed", 0.5, 0.05, 1.0, 0.05),
                Parameter::new("drop_strength", 8.0, 3.0, 20.0, 1.0),
                Parameter::new("damping", 0.97, 0.85, 0.995, 0.005),
            ]),
            current: Grid::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            previous: Grid::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    fn has_interior(&self) -> bool {
        self.current.width >= 3 && self.current.height >= 3
    }

    /// Add `drop_strength` at an interior cell. Edge cells are ignored.
    pub fn inject_drop(&mut self, x: usize, y: usize) {
        let (w, h) = (self.current.width, self.current.height);
        if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
            return;
        }
        let strength = self.params.value(DROP_STRENGTH);
        self.current.add(x, y, strength);
    }

    /// One certain drop per whole unit of rain rate, the remainder is a chance
    fn rain(&mut self) {
        if !self.has_interior() {
            return;
        }
        let (w, h) = (self.current.width, self.current.height);
        let mut budget = self.params.value(RAIN_RATE);
        while budget > 0.0 {
            let chance = budget.min(1.0);
            if chance >= 1.0 || self.rng.gen_bool(chance) {
                let x = self.rng.gen_range(1..w - 1);
                let y = self.rng.gen_range(1..h - 1);
                self.inject_drop(x, y);
            }
            budget -= 1.0;
        }
    }

    /// Advance the wave equation by one step
    pub fn step(&mut self) {
        self.rain();
        if !self.has_interior() {
            return;
        }

        let speed = self.params.value(WAVE_SPEED);
        let c2 = (speed * speed).min(MAX_COURANT_SQ);
        let damping = self.params.value(DAMPING);
        let (w, h) = (self.current.width, self.current.height);

        let cur = &self.current.cells;
        let next = &mut self.previous.cells;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let i = y * w + x;
                let laplacian = cur[i - 1] + cur[i + 1] + cur[i - w] + cur[i + w] - 4.0 * cur[i];
                // `next` still holds the previous step here
                next[i] = (2.0 * cur[i] - next[i] + c2 * laplacian) * damping;
            }
        }

        std::mem::swap(&mut self.current, &mut self.previous);
    }

    fn normalized_height(&self, x: usize, y: usize) -> f64 {
        (self.current.get(x, y) / HEIGHT_SCALE).clamp(-1.0, 1.0)
    }
}

impl Default for FluidLattice {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametricAnimation for FluidLattice {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Fluid
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    fn resize(&mut self, width: usize, height: usize) {
        if width != self.current.width || height != self.current.height {
            self.current = Grid::new(width, height);
            self.previous = Grid::new(width, height);
        }
    }

    fn update(&mut self, _dt: f64) {
        self.step();
    }

    fn draw(&self, frame: &mut Frame, _t: f64) {
        let w = frame.width().min(self.current.width);
        let h = frame.height().min(self.current.height);
        for y in 0..h {
            for x in 0..w {
                let value = self.normalized_height(x, y);
                let level = value.abs();
                if level < VISIBILITY {
                    continue;
                }
                // Lift faint ripples onto the first visible glyph
                let glyph_level = VISIBILITY.max(level.sqrt());
                let ch = ramp_glyph(&RIPPLE_CHARS[1..], glyph_level);
                let (color, bold) = level_color(SCHEME_ICE, if value > 0.0 { glyph_level } else { glyph_level * 0.5 });
                frame.set(x as i32, y as i32, ch, Some(color), bold);
            }
        }
    }

    fn value_at(&self, x: f64, y: f64, _t: f64) -> f64 {
        let (w, h) = (self.current.width, self.current.height);
        if w == 0 || h == 0 {
            return 0.0;
        }
        let cx = ((x.clamp(0.0, 1.0) * w as f64) as usize).min(w - 1);
        let cy = ((y.clamp(0.0, 1.0) * h as f64) as usize).min(h - 1);
        self.normalized_height(cx, cy)
    }

    /// Mean absolute height over every 4th cell
    fn global_value(&self, _t: f64) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for h in self.current.cells.iter().step_by(SAMPLE_STRIDE) {
            sum += h.abs();
            count += 1;
        }
        if count == 0 {
            return 0.0;
        }
        (sum / count as f64 / HEIGHT_SCALE).clamp(-1.0, 1.0)
    }

    fn provides_modulation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm(seed: u64) -> FluidLattice {
        let mut fluid = FluidLattice::with_seed(seed);
        fluid.params_mut().set(RAIN_RATE, 0.0);
        fluid.resize(40, 20);
        fluid
    }

    #[test]
    fn no_rain_stays_flat() {
        let mut fluid = calm(1);
        for _ in 0..500 {
            fluid.update(0.033);
        }
        assert!(fluid.grid().is_flat());
        assert_eq!(fluid.global_value(0.0), 0.0);
    }

    #[test]
    fn edges_stay_pinned() {
        let mut fluid = calm(2);
        fluid.inject_drop(1, 1);
        fluid.inject_drop(0, 5);
        for _ in 0..50 {
            fluid.update(0.033);
        }
        let grid = fluid.grid();
        for x in 0..grid.width() {
            assert_eq!(grid.get(x, 0), 0.0);
            assert_eq!(grid.get(x, grid.height() - 1), 0.0);
        }
        for y in 0..grid.height() {
            assert_eq!(grid.get(0, y), 0.0);
            assert_eq!(grid.get(grid.width() - 1, y), 0.0);
        }
    }

    #[test]
    fn drop_spreads_to_neighbours() {
        let mut fluid = calm(3);
        fluid.inject_drop(20, 10);
        fluid.update(0.033);
        assert!(fluid.grid().get(21, 10) != 0.0);
        assert!(fluid.grid().get(20, 11) != 0.0);
    }

    #[test]
    fn global_value_uses_the_height_scale() {
        let mut fluid = FluidLattice::with_seed(7);
        fluid.params_mut().set(RAIN_RATE, 0.0);
        fluid.params_mut().set(DROP_STRENGTH, 8.0);
        fluid.resize(5, 3);
        // Cell 8 is one of the four sampled (0, 4, 8, 12)
        fluid.inject_drop(3, 1);

        assert_eq!(fluid.value_at(0.7, 0.5, 0.0), 1.0);
        assert!((fluid.global_value(0.0) - 0.25).abs() < 1e-12);

        fluid.inject_drop(3, 1);
        assert!((fluid.global_value(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn full_rain_always_drops() {
        let mut fluid = FluidLattice::with_seed(4);
        fluid.params_mut().set(RAIN_RATE, 1.0);
        fluid.rain();
        assert!(!fluid.grid().is_flat());
    }

    #[test]
    fn tiny_frames_do_not_panic() {
        let mut fluid = FluidLattice::with_seed(5);
        fluid.params_mut().set(RAIN_RATE, 1.5);
        fluid.resize(2, 1);
        fluid.update(0.033);
        let mut frame = Frame::new(2, 1);
        fluid.draw(&mut frame, 0.0);
        assert_eq!(fluid.value_at(0.5, 0.5, 0.0), 0.0);
    }

    #[test]
    fn ripples_render() {
        let mut fluid = calm(6);
        fluid.inject_drop(20, 10);
        for _ in 0..5 {
            fluid.update(0.033);
        }
        let mut frame = Frame::new(40, 20);
        fluid.draw(&mut frame, 0.0);
        assert!(frame.filled() > 4);
    }
}
