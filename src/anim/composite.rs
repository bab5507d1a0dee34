//! Composite animations: one generator's modulation output drives another's
//! parameters.

use super::mapper::MappingMode;
use super::registry::GeneratorId;
use super::{ParametricAnimation, PARAM_COUNT};
use crate::viz::{lissajous, plasma, spiral};
use serde::{Deserialize, Serialize};

pub const MIN_STRENGTH: f64 = 0.0;
pub const MAX_STRENGTH: f64 = 2.0;

/// One target parameter slot fed by the composite
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binding {
    /// Target parameter index, 1..=4
    pub param: usize,
    pub out_min: f64,
    pub out_max: f64,
    /// Feed the negated modulation value
    pub inverted: bool,
}

/// Mutable part of a composite, as saved in presets
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeState {
    pub strength: f64,
    pub mapping: MappingMode,
}

#[derive(Clone, Debug)]
pub struct CompositeAnimation {
    id: &'static str,
    title: &'static str,
    source: GeneratorId,
    target: GeneratorId,
    strength: f64,
    mapping: MappingMode,
    bindings: Vec<Binding>,
}

impl CompositeAnimation {
    pub fn new(
        id: &'static str,
        title: &'static str,
        source: GeneratorId,
        target: GeneratorId,
        mapping: MappingMode,
    ) -> Self {
        Self {
            id,
            title,
            source,
            target,
            strength: 1.0,
            mapping,
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, param: usize, out_min: f64, out_max: f64) -> Self {
        self.bindings.push(Binding { param, out_min, out_max, inverted: false });
        self
    }

    pub fn bind_inverted(mut self, param: usize, out_min: f64, out_max: f64) -> Self {
        self.bindings.push(Binding { param, out_min, out_max, inverted: true });
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn source(&self) -> GeneratorId {
        self.source
    }

    pub fn target(&self) -> GeneratorId {
        self.target
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn set_strength(&mut self, strength: f64) {
        if !strength.is_nan() {
            self.strength = strength.clamp(MIN_STRENGTH, MAX_STRENGTH);
        }
    }

    pub fn mapping(&self) -> MappingMode {
        self.mapping
    }

    pub fn set_mapping(&mut self, mapping: MappingMode) {
        self.mapping = mapping;
    }

    pub fn state(&self) -> CompositeState {
        CompositeState {
            strength: self.strength,
            mapping: self.mapping,
        }
    }

    pub fn restore(&mut self, state: CompositeState) {
        self.set_strength(state.strength);
        self.mapping = state.mapping;
    }

    /// Structural checks that do not need the generators themselves
    pub(crate) fn check_shape(&self) -> Result<(), String> {
        if self.source == self.target {
            return Err(format!("{}: source and target are the same generator", self.id));
        }
        if self.bindings.is_empty() {
            return Err(format!("{}: no target parameters bound", self.id));
        }
        if let Some(b) = self.bindings.iter().find(|b| !(1..=PARAM_COUNT).contains(&b.param)) {
            return Err(format!("{}: parameter index {} outside 1..={PARAM_COUNT}", self.id, b.param));
        }
        Ok(())
    }

    /// Scale a raw source sample by strength, keeping it in [-1, 1]
    pub fn effective(&self, raw: f64) -> f64 {
        let v = raw * self.strength;
        if v.is_nan() {
            0.0
        } else {
            v.clamp(-1.0, 1.0)
        }
    }

    /// Write an already scaled modulation value into the target's bound slots.
    ///
    /// Goes through the target's clamped setter, never its `adjust`, so the
    /// written value always lies inside the parameter's own range.
    pub fn inject(&self, value: f64, target: &mut dyn ParametricAnimation) {
        let params = target.params_mut();
        for binding in &self.bindings {
            let v = if binding.inverted { -value } else { value };
            let mapped = self.mapping.map(v, binding.out_min, binding.out_max);
            params.set(binding.param, mapped);
        }
    }
}

/// Plasma drives the Lissajous frequencies, B inverted for contrast
pub fn plasma_lissajous(source: GeneratorId, target: GeneratorId) -> CompositeAnimation {
    CompositeAnimation::new("plasma-lissajous", "Plasma → Lissajous", source, target, MappingMode::Sine)
        .bind(lissajous::FREQ_A, 2.0, 6.0)
        .bind_inverted(lissajous::FREQ_B, 2.0, 6.0)
}

/// Wave energy of the fluid drives the spiral rotation speed
pub fn fluid_spiral(source: GeneratorId, target: GeneratorId) -> CompositeAnimation {
    CompositeAnimation::new("fluid-spiral", "Fluid → Spiral", source, target, MappingMode::Linear)
        .bind(spiral::ROTATION_SPEED, 0.5, 3.0)
}

/// The Lissajous phase drives the plasma frequencies
pub fn lissajous_plasma(source: GeneratorId, target: GeneratorId) -> CompositeAnimation {
    CompositeAnimation::new("lissajous-plasma", "Lissajous → Plasma", source, target, MappingMode::Sine)
        .bind(plasma::FREQ_X, 4.0, 16.0)
        .bind_inverted(plasma::FREQ_Y, 4.0, 16.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::lissajous::Lissajous;
    use crate::viz::plasma::Plasma;

    fn ids() -> (GeneratorId, GeneratorId) {
        (GeneratorId::new(0), GeneratorId::new(1))
    }

    #[test]
    fn strength_scales_and_saturates() {
        let (s, t) = ids();
        let mut c = plasma_lissajous(s, t);
        assert_eq!(c.effective(0.4), 0.4);
        c.set_strength(2.0);
        assert_eq!(c.effective(0.75), 1.0);
        c.set_strength(0.0);
        assert_eq!(c.effective(-0.9), 0.0);
        c.set_strength(9.0);
        assert_eq!(c.strength(), MAX_STRENGTH);
    }

    #[test]
    fn inverted_binding_mirrors_value() {
        let (s, t) = ids();
        let c = plasma_lissajous(s, t);
        let mut target = Lissajous::new();
        c.inject(1.0, &mut target);
        assert_eq!(target.params().value(lissajous::FREQ_A), 6.0);
        assert_eq!(target.params().value(lissajous::FREQ_B), 2.0);
    }

    #[test]
    fn injection_stays_inside_parameter_range() {
        let (s, t) = ids();
        let c = CompositeAnimation::new("wide", "Wide", s, t, MappingMode::Linear)
            .bind(plasma::FREQ_X, -100.0, 100.0);
        let mut target = Plasma::new();
        let (min, max) = {
            let p = target.params().get(plasma::FREQ_X);
            (p.min(), p.max())
        };
        c.inject(1.0, &mut target);
        assert_eq!(target.params().value(plasma::FREQ_X), max);
        c.inject(-1.0, &mut target);
        assert_eq!(target.params().value(plasma::FREQ_X), min);
    }

    #[test]
    fn shape_checks_reject_bad_wiring() {
        let (s, _) = ids();
        assert!(plasma_lissajous(s, s).check_shape().is_err());

        let (s, t) = ids();
        let unbound = CompositeAnimation::new("x", "X", s, t, MappingMode::Linear);
        assert!(unbound.check_shape().is_err());

        let bad_index = CompositeAnimation::new("x", "X", s, t, MappingMode::Linear).bind(5, 0.0, 1.0);
        assert!(bad_index.check_shape().is_err());
        assert!(fluid_spiral(s, t).check_shape().is_ok());
    }
}
