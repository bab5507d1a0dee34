//! Owned collection of generators and the selectable entries built on them

use super::composite::{self, CompositeAnimation};
use super::mapper::MappingMode;
use super::{Params, ParametricAnimation};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::viz::mandelbrot::DeepZoomPolicy;
use crate::viz::{self, GeneratorKind};
use tracing::debug;

/// Index of a generator inside its registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorId(usize);

impl GeneratorId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A selectable slot: a plain generator or a fusion of two
pub enum Entry {
    Single(GeneratorId),
    Fused(CompositeAnimation),
}

/// Construction options for [`Registry::standard`]
#[derive(Clone, Debug)]
pub struct RegistryOptions {
    pub seed: Option<u64>,
    /// `None` disables the Mandelbrot deep-zoom iteration policy
    pub deep_zoom: Option<DeepZoomPolicy>,
    pub composite_strength: Option<f64>,
    pub composite_mapping: Option<MappingMode>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            seed: None,
            deep_zoom: Some(DeepZoomPolicy::default()),
            composite_strength: None,
            composite_mapping: None,
        }
    }
}

#[derive(Default)]
pub struct Registry {
    generators: Vec<Box<dyn ParametricAnimation>>,
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All eight generators followed by the three fusions
    pub fn standard(options: &RegistryOptions) -> Result<Self> {
        let mut registry = Self::new();
        let mut ids = Vec::with_capacity(GeneratorKind::ALL.len());
        for (i, kind) in GeneratorKind::ALL.into_iter().enumerate() {
            let seed = options.seed.map(|s| s.wrapping_add(i as u64));
            let generator = viz::build(kind, seed, options.deep_zoom);
            ids.push((kind, registry.add_generator(generator)));
        }

        let id_of = |kind: GeneratorKind| {
            ids.iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, id)| *id)
                .ok_or_else(|| Error::Composite(format!("{} missing from registry", kind.id())))
        };

        let fusions = [
            composite::plasma_lissajous(id_of(GeneratorKind::Plasma)?, id_of(GeneratorKind::Lissajous)?),
            composite::fluid_spiral(id_of(GeneratorKind::Fluid)?, id_of(GeneratorKind::Spiral)?),
            composite::lissajous_plasma(id_of(GeneratorKind::Lissajous)?, id_of(GeneratorKind::Plasma)?),
        ];
        for mut fusion in fusions {
            if let Some(strength) = options.composite_strength {
                fusion.set_strength(strength);
            }
            if let Some(mapping) = options.composite_mapping {
                fusion.set_mapping(mapping);
            }
            registry.add_composite(fusion)?;
        }

        Ok(registry)
    }

    /// Take ownership of a generator and expose it as its own entry
    pub fn add_generator(&mut self, generator: Box<dyn ParametricAnimation>) -> GeneratorId {
        let id = GeneratorId(self.generators.len());
        self.generators.push(generator);
        self.entries.push(Entry::Single(id));
        id
    }

    /// Validate and append a composite entry. Returns the entry index.
    pub fn add_composite(&mut self, composite: CompositeAnimation) -> Result<usize> {
        composite.check_shape().map_err(Error::Composite)?;

        for id in [composite.source(), composite.target()] {
            if id.0 >= self.generators.len() {
                return Err(Error::Composite(format!(
                    "{}: generator {} is not registered",
                    composite.id(),
                    id.0
                )));
            }
        }

        let source = &self.generators[composite.source().0];
        if !source.provides_modulation() {
            return Err(Error::Composite(format!(
                "{}: {} has no modulation output",
                composite.id(),
                source.name()
            )));
        }

        debug!(
            composite = composite.id(),
            source = source.name(),
            target = self.generators[composite.target().0].name(),
            mapping = %composite.mapping(),
            strength = composite.strength(),
            "wired composite"
        );
        self.entries.push(Entry::Fused(composite));
        Ok(self.entries.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn generator(&self, id: GeneratorId) -> &dyn ParametricAnimation {
        self.generators[id.0].as_ref()
    }

    pub fn generator_mut(&mut self, id: GeneratorId) -> &mut dyn ParametricAnimation {
        self.generators[id.0].as_mut()
    }

    pub fn generators(&self) -> impl Iterator<Item = (GeneratorId, &dyn ParametricAnimation)> {
        self.generators
            .iter()
            .enumerate()
            .map(|(i, g)| (GeneratorId(i), &**g as &dyn ParametricAnimation))
    }

    pub fn composite(&self, index: usize) -> Option<&CompositeAnimation> {
        match self.entries.get(index) {
            Some(Entry::Fused(c)) => Some(c),
            _ => None,
        }
    }

    pub fn composite_mut(&mut self, index: usize) -> Option<&mut CompositeAnimation> {
        match self.entries.get_mut(index) {
            Some(Entry::Fused(c)) => Some(c),
            _ => None,
        }
    }

    /// Stable identifier of an entry, used by the CLI and presets
    pub fn entry_id(&self, index: usize) -> &'static str {
        match &self.entries[index] {
            Entry::Single(id) => self.generators[id.0].kind().id(),
            Entry::Fused(c) => c.id(),
        }
    }

    pub fn entry_title(&self, index: usize) -> &'static str {
        match &self.entries[index] {
            Entry::Single(id) => self.generators[id.0].name(),
            Entry::Fused(c) => c.title(),
        }
    }

    pub fn find(&self, id: &str) -> Option<usize> {
        (0..self.entries.len()).find(|&i| self.entry_id(i).eq_ignore_ascii_case(id))
    }

    /// Generator by kind id, e.g. `"plasma"`
    pub fn find_generator(&self, id: &str) -> Option<GeneratorId> {
        self.generators
            .iter()
            .position(|g| g.kind().id().eq_ignore_ascii_case(id))
            .map(GeneratorId)
    }

    /// The generator whose parameters an entry exposes (the target for composites)
    pub fn controlled(&self, index: usize) -> GeneratorId {
        match &self.entries[index] {
            Entry::Single(id) => *id,
            Entry::Fused(c) => c.target(),
        }
    }

    pub fn params(&self, index: usize) -> &Params {
        self.generators[self.controlled(index).0].params()
    }

    pub fn adjust(&mut self, index: usize, param: usize, delta: f64) {
        let id = self.controlled(index);
        self.generators[id.0].adjust(param, delta);
    }

    pub fn resize_all(&mut self, width: usize, height: usize) {
        for generator in &mut self.generators {
            generator.resize(width, height);
        }
    }

    /// Advance an entry. A composite steps its source, injects, then steps
    /// its target. Returns the modulation value for composites.
    pub fn update(&mut self, index: usize, dt: f64, t: f64) -> Option<f64> {
        match &self.entries[index] {
            Entry::Single(id) => {
                self.generators[id.0].update(dt);
                None
            }
            Entry::Fused(c) => {
                self.generators[c.source().0].update(dt);
                let value = c.effective(self.generators[c.source().0].global_value(t));
                let target = self.generators[c.target().0].as_mut();
                c.inject(value, target);
                target.update(dt);
                Some(value)
            }
        }
    }

    /// Draw an entry. A composite resamples its source and injects before
    /// the target draws.
    pub fn draw(&mut self, index: usize, frame: &mut Frame, t: f64) -> Option<f64> {
        match &self.entries[index] {
            Entry::Single(id) => {
                self.generators[id.0].draw(frame, t);
                None
            }
            Entry::Fused(c) => {
                let value = c.effective(self.generators[c.source().0].global_value(t));
                let target = self.generators[c.target().0].as_mut();
                c.inject(value, target);
                target.draw(frame, t);
                Some(value)
            }
        }
    }
}
