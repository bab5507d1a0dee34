//! Parametric animation contract
//!
//! Every generator owns exactly four [`Parameter`]s, addressed 1..=4, and
//! exposes a modulation interface that composites sample to drive other
//! generators.

pub mod composite;
pub mod mapper;
pub mod registry;

use crate::frame::Frame;
use crate::viz::GeneratorKind;

pub const PARAM_COUNT: usize = 4;

/// How an adjustment delta combines with the current value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// `value + delta`
    Additive,
    /// `value * exp(delta)`, for ranges spanning several decades
    Multiplicative,
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    default: f64,
    step: f64,
    scale: Scale,
    integral: bool,
}

impl Parameter {
    pub fn new(name: &'static str, default: f64, min: f64, max: f64, step: f64) -> Self {
        assert!(min <= max, "parameter {name}: min {min} > max {max}");
        assert!(
            (min..=max).contains(&default),
            "parameter {name}: default {default} outside [{min}, {max}]"
        );
        Self {
            name,
            value: default,
            min,
            max,
            default,
            step,
            scale: Scale::Additive,
            integral: false,
        }
    }

    pub fn multiplicative(mut self) -> Self {
        assert!(self.min > 0.0, "parameter {}: multiplicative range must be positive", self.name);
        self.scale = Scale::Multiplicative;
        self
    }

    /// Round every write to a whole number
    pub fn integral(mut self) -> Self {
        self.integral = true;
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Delta for one input nudge
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Write a value, clamped into `[min, max]`. NaN is ignored.
    pub fn set(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        let value = if self.integral { value.round() } else { value };
        self.value = value.clamp(self.min, self.max);
    }

    pub fn adjust(&mut self, delta: f64) {
        let next = match self.scale {
            Scale::Additive => self.value + delta,
            Scale::Multiplicative => self.value * delta.exp(),
        };
        self.set(next);
    }

    pub fn reset(&mut self) {
        self.value = self.default;
    }
}

/// The four parameter slots of one generator
#[derive(Clone, Debug)]
pub struct Params {
    slots: [Parameter; PARAM_COUNT],
}

impl Params {
    pub fn new(slots: [Parameter; PARAM_COUNT]) -> Self {
        Self { slots }
    }

    fn slot(index: usize) -> Option<usize> {
        debug_assert!(
            (1..=PARAM_COUNT).contains(&index),
            "parameter index {index} outside 1..={PARAM_COUNT}"
        );
        (1..=PARAM_COUNT).contains(&index).then(|| index - 1)
    }

    /// Parameter at `index` (1-based)
    pub fn get(&self, index: usize) -> &Parameter {
        &self.slots[index.clamp(1, PARAM_COUNT) - 1]
    }

    /// Current value at `index` (1-based)
    pub fn value(&self, index: usize) -> f64 {
        self.get(index).value()
    }

    pub fn adjust(&mut self, index: usize, delta: f64) {
        if let Some(i) = Self::slot(index) {
            self.slots[i].adjust(delta);
        }
    }

    pub fn set(&mut self, index: usize, value: f64) {
        if let Some(i) = Self::slot(index) {
            self.slots[i].set(value);
        }
    }

    pub fn values(&self) -> [f64; PARAM_COUNT] {
        std::array::from_fn(|i| self.slots[i].value())
    }

    pub fn set_values(&mut self, values: [f64; PARAM_COUNT]) {
        for (slot, value) in self.slots.iter_mut().zip(values) {
            slot.set(value);
        }
    }

    /// Put every slot back to its default
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.slots.iter()
    }
}

/// A generator with four adjustable parameters and a modulation output.
///
/// `value_at` and `global_value` must stay within [-1, 1]. Generators that
/// keep the zero defaults must also keep `provides_modulation` false so they
/// are rejected as composite sources.
pub trait ParametricAnimation {
    fn kind(&self) -> GeneratorKind;

    fn params(&self) -> &Params;

    fn params_mut(&mut self) -> &mut Params;

    /// Clamped adjustment of parameter `index` (1..=4)
    fn adjust(&mut self, index: usize, delta: f64) {
        self.params_mut().adjust(index, delta);
    }

    fn get_params(&self) -> [f64; PARAM_COUNT] {
        self.params().values()
    }

    fn set_params(&mut self, values: [f64; PARAM_COUNT]) {
        self.params_mut().set_values(values);
    }

    /// Follow the frame size. Only generators with spatial state care.
    fn resize(&mut self, _width: usize, _height: usize) {}

    /// Advance simulation state by `dt` seconds
    fn update(&mut self, _dt: f64) {}

    fn draw(&self, frame: &mut Frame, t: f64);

    /// Modulation field sample at normalized coordinates `x, y` in [0, 1]
    fn value_at(&self, _x: f64, _y: f64, _t: f64) -> f64 {
        0.0
    }

    /// Scalar modulation summary
    fn global_value(&self, _t: f64) -> f64 {
        0.0
    }

    fn provides_modulation(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        self.kind().title()
    }
}
