//! Mandelbrot zoomer with smooth escape-time coloring
//!
//! Each cell maps to `c = center + offset * (3.0 / zoom)` where the offset is
//! measured in frame widths, and `z = z² + c` is iterated from zero until
//! `|z|² > 256` or the iteration budget runs out.

use crate::anim::{Parameter, ParametricAnimation, Params};
use crate::colors::{cyclic_palette, rgb};
use crate::frame::Frame;
use super::{ramp_glyph, GeneratorKind, CELL_ASPECT, DEFAULT_HEIGHT, DEFAULT_WIDTH, DENSITY_RAMP};
use crossterm::style::Color;
use std::f64::consts::LN_2;
use tracing::debug;

pub const ZOOM: usize = 1;
pub const CENTER_X: usize = 2;
pub const CENTER_Y: usize = 3;
pub const MAX_ITERATIONS: usize = 4;

/// Squared bailout radius. Larger than the minimal 4.0 so the smooth
/// iteration count is accurate.
pub const BAILOUT_SQ: f64 = 256.0;
/// Width of the view in the complex plane at zoom 1.0
pub const VIEW_SPAN: f64 = 3.0;

pub const INSIDE_GLYPH: char = ' ';
pub const INSIDE_COLOR: Color = Color::Rgb { r: 6, g: 6, b: 10 };

/// How fast the palette drifts with time
const PALETTE_DRIFT: f64 = 0.02;
/// Palette cycles across the full iteration range
const PALETTE_CYCLES: f64 = 3.0;

/// Outcome of iterating one point
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Escape {
    /// Never escaped within the iteration budget
    Inside,
    /// Escaped at `iteration` (0-based), `smooth` is the continuous count
    Escaped { iteration: u32, smooth: f64 },
}

/// Iterate `z = z² + c` from zero
pub fn escape_time(cr: f64, ci: f64, max_iterations: u32) -> Escape {
    let (mut zr, mut zi) = (0.0f64, 0.0f64);
    for i in 0..max_iterations {
        let next_zi = 2.0 * zr * zi + ci;
        zr = zr * zr - zi * zi + cr;
        zi = next_zi;

        let mag_sq = zr * zr + zi * zi;
        if mag_sq > BAILOUT_SQ {
            // ν = log2(ln(|z|²) / 2)
            let nu = (mag_sq.ln() / 2.0).ln() / LN_2;
            return Escape::Escaped {
                iteration: i,
                smooth: i as f64 + 1.0 - nu,
            };
        }
    }
    Escape::Inside
}

/// Logarithmic rescale of a smooth count against the budget, in [0, 1]
pub fn color_level(smooth: f64, max_iterations: u32) -> f64 {
    let denom = (1.0 + max_iterations as f64).ln();
    if denom <= 0.0 {
        return 0.0;
    }
    ((1.0 + smooth.max(0.0)).ln() / denom).clamp(0.0, 1.0)
}

/// Raises the iteration budget once the view is zoomed in past a threshold.
///
/// Runs after `update`, never during `draw`, and only ever raises.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeepZoomPolicy {
    pub zoom_threshold: f64,
    pub base_iterations: f64,
    pub per_decade: f64,
}

impl Default for DeepZoomPolicy {
    fn default() -> Self {
        Self {
            zoom_threshold: 10.0,
            base_iterations: 50.0,
            per_decade: 100.0,
        }
    }
}

impl DeepZoomPolicy {
    /// Minimum iteration budget for a zoom level, if the policy applies
    pub fn required(&self, zoom: f64) -> Option<f64> {
        (zoom > self.zoom_threshold).then(|| self.base_iterations + self.per_decade * zoom.log10())
    }
}

pub struct MandelbrotZoomer {
    params: Params,
    policy: Option<DeepZoomPolicy>,
    width: usize,
    height: usize,
}

impl MandelbrotZoomer {
    pub fn new() -> Self {
        Self {
            params: Params::new([
                Parameter::new("zoom", 1.5, 0.1, 1000.0, 0.1).multiplicative(),
                Parameter::new("center_x", -0.5, -2.0, 1.0, 0.05),
                Parameter::new("center_y", 0.0, -1.5, 1.5, 0.05),
                Parameter::new("max_iterations", 50.0, 10.0, 1000.0, 10.0).integral(),
            ]),
            policy: Some(DeepZoomPolicy::default()),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// Replace or remove the deep-zoom iteration policy
    pub fn set_policy(&mut self, policy: Option<DeepZoomPolicy>) {
        self.policy = policy;
    }

    pub fn max_iterations(&self) -> u32 {
        self.params.value(MAX_ITERATIONS) as u32
    }

    /// Complex units per cell, horizontally
    fn cell_scale(&self, width: usize) -> f64 {
        VIEW_SPAN / self.params.value(ZOOM) / width.max(1) as f64
    }

    /// Complex coordinate of a (fractional) cell position
    pub fn cell_to_complex(&self, x: f64, y: f64, width: usize, height: usize) -> (f64, f64) {
        let scale = self.cell_scale(width);
        (
            self.params.value(CENTER_X) + (x - width as f64 / 2.0) * scale,
            self.params.value(CENTER_Y) + (y - height as f64 / 2.0) * scale * CELL_ASPECT,
        )
    }

    /// Cell containing a complex coordinate, if it is on screen
    pub fn cell_for_point(&self, re: f64, im: f64, width: usize, height: usize) -> Option<(usize, usize)> {
        let scale = self.cell_scale(width);
        let x = width as f64 / 2.0 + (re - self.params.value(CENTER_X)) / scale;
        let y = height as f64 / 2.0 + (im - self.params.value(CENTER_Y)) / (scale * CELL_ASPECT);
        if x < 0.0 || y < 0.0 || x >= width as f64 || y >= height as f64 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Escape result at the center of a cell
    pub fn classify(&self, x: usize, y: usize, width: usize, height: usize) -> Escape {
        let (cr, ci) = self.cell_to_complex(x as f64 + 0.5, y as f64 + 0.5, width, height);
        escape_time(cr, ci, self.max_iterations())
    }

    fn apply_policy(&mut self) {
        let Some(policy) = self.policy else {
            return;
        };
        let current = self.params.value(MAX_ITERATIONS);
        if let Some(required) = policy.required(self.params.value(ZOOM)) {
            if required > current {
                self.params.set(MAX_ITERATIONS, required);
                debug!(
                    from = current,
                    to = self.params.value(MAX_ITERATIONS),
                    "raised mandelbrot iteration budget"
                );
            }
        }
    }
}

impl Default for MandelbrotZoomer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametricAnimation for MandelbrotZoomer {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Mandelbrot
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    fn update(&mut self, _dt: f64) {
        self.apply_policy();
    }

    fn draw(&self, frame: &mut Frame, t: f64) {
        let (width, height) = frame.size();
        let max_iterations = self.max_iterations();

        for y in 0..height {
            for x in 0..width {
                match self.classify(x, y, width, height) {
                    Escape::Inside => {
                        frame.set(x as i32, y as i32, INSIDE_GLYPH, Some(INSIDE_COLOR), false);
                    }
                    Escape::Escaped { smooth, .. } => {
                        let level = color_level(smooth, max_iterations);
                        let color = cyclic_palette(level * PALETTE_CYCLES + t * PALETTE_DRIFT);
                        // Dim the outermost bands
                        let color = if level < 0.15 { dim(color) } else { color };
                        frame.set(x as i32, y as i32, ramp_glyph(&DENSITY_RAMP[1..], level), Some(color), level > 0.8);
                    }
                }
            }
        }
    }

    /// Escape level rescaled to [-1, 1]; points inside the set give 1.0
    fn value_at(&self, x: f64, y: f64, _t: f64) -> f64 {
        let (w, h) = (self.width.max(1), self.height.max(1));
        let (cr, ci) = self.cell_to_complex(x.clamp(0.0, 1.0) * w as f64, y.clamp(0.0, 1.0) * h as f64, w, h);
        let max_iterations = self.max_iterations();
        match escape_time(cr, ci, max_iterations) {
            Escape::Inside => 1.0,
            Escape::Escaped { smooth, .. } => color_level(smooth, max_iterations) * 2.0 - 1.0,
        }
    }

    /// Mean of a coarse 8x4 sample grid
    fn global_value(&self, t: f64) -> f64 {
        const COLS: usize = 8;
        const ROWS: usize = 4;
        let mut sum = 0.0;
        for row in 0..ROWS {
            for col in 0..COLS {
                let x = (col as f64 + 0.5) / COLS as f64;
                let y = (row as f64 + 0.5) / ROWS as f64;
                sum += self.value_at(x, y, t);
            }
        }
        (sum / (COLS * ROWS) as f64).clamp(-1.0, 1.0)
    }

    fn provides_modulation(&self) -> bool {
        true
    }
}

fn dim(color: Color) -> Color {
    match color {
        Color::Rgb { r, g, b } => rgb(r / 2, g / 2, b / 2),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        for max in [1, 10, 50, 1000] {
            assert_eq!(escape_time(0.0, 0.0, max), Escape::Inside);
        }
    }

    #[test]
    fn far_point_escapes_quickly() {
        match escape_time(3.0, 0.0, 1000) {
            Escape::Escaped { iteration, smooth } => {
                assert!(iteration <= 2, "escaped at {iteration}");
                assert!(smooth.is_finite());
            }
            Escape::Inside => panic!("c = 3 must escape"),
        }
    }

    #[test]
    fn smooth_count_is_continuous_across_points() {
        // Two nearby points outside the set should get nearby smooth counts
        let a = escape_time(0.40, 0.30, 200);
        let b = escape_time(0.401, 0.30, 200);
        match (a, b) {
            (Escape::Escaped { smooth: sa, .. }, Escape::Escaped { smooth: sb, .. }) => {
                assert!((sa - sb).abs() < 1.0, "{sa} vs {sb}");
            }
            other => panic!("expected both to escape: {other:?}"),
        }
    }

    #[test]
    fn color_level_is_bounded() {
        assert_eq!(color_level(-3.0, 50), 0.0);
        assert_eq!(color_level(1e9, 50), 1.0);
        let mid = color_level(10.0, 100);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn default_view_puts_origin_inside() {
        let zoomer = MandelbrotZoomer::new();
        let (w, h) = (80, 24);
        let mut frame = Frame::new(w, h);
        zoomer.draw(&mut frame, 0.0);

        let (x, y) = zoomer.cell_for_point(0.0, 0.0, w, h).expect("origin on screen");
        assert_eq!(zoomer.classify(x, y, w, h), Escape::Inside);
        let cell = frame.get(x, y).unwrap();
        assert_eq!(cell.fg, Some(INSIDE_COLOR));
        assert_eq!(cell.ch, INSIDE_GLYPH);
    }

    #[test]
    fn deep_zoom_raises_iterations_after_update() {
        let mut zoomer = MandelbrotZoomer::new();
        zoomer.params_mut().set(ZOOM, 500.0);
        assert_eq!(zoomer.max_iterations(), 50);
        zoomer.update(0.033);
        assert_eq!(zoomer.max_iterations(), (50.0 + 100.0 * 500f64.log10()).round() as u32);

        // Never lowers a budget the user raised further
        zoomer.params_mut().set(MAX_ITERATIONS, 900.0);
        zoomer.update(0.033);
        assert_eq!(zoomer.max_iterations(), 900);
    }

    #[test]
    fn policy_can_be_removed() {
        let mut zoomer = MandelbrotZoomer::new();
        zoomer.set_policy(None);
        zoomer.params_mut().set(ZOOM, 1000.0);
        zoomer.update(0.033);
        assert_eq!(zoomer.max_iterations(), 50);
    }

    #[test]
    fn shallow_zoom_leaves_budget_alone() {
        let mut zoomer = MandelbrotZoomer::new();
        zoomer.update(0.033);
        assert_eq!(zoomer.max_iterations(), 50);
    }
}
