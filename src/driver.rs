//! Frame stepping, input events and the status readout

use crate::anim::registry::Registry;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::presets::Snapshot;
use crossterm::style::Color;
use tracing::{info, warn};

/// Strength change for one press of +/-
pub const STRENGTH_STEP: f64 = 0.1;

/// Longest frame time fed to the generators, so a stall does not explode them
const MAX_DT: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriverEvent {
    /// Raw delta for parameter `param` (1..=4) of the active entry
    Adjust { param: usize, delta: f64 },
    /// `direction` times the parameter's own step
    Nudge { param: usize, direction: f64 },
    NextEntry,
    PrevEntry,
    Select(usize),
    /// Put the active entry's parameters back to their defaults
    ResetParams,
    TogglePause,
    CycleMapping,
    Strength(f64),
}

pub struct AnimationDriver {
    registry: Registry,
    active: usize,
    time: f64,
    paused: bool,
    modulation: Option<f64>,
    size: (usize, usize),
    show_status: bool,
}

impl AnimationDriver {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            active: 0,
            time: 0.0,
            paused: false,
            modulation: None,
            size: (0, 0),
            show_status: true,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_id(&self) -> &'static str {
        self.registry.entry_id(self.active)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Modulation value of the last drawn frame, composites only
    pub fn modulation(&self) -> Option<f64> {
        self.modulation
    }

    pub fn set_status_visible(&mut self, visible: bool) {
        self.show_status = visible;
    }

    pub fn select_id(&mut self, id: &str) -> Result<()> {
        let index = self
            .registry
            .find(id)
            .ok_or_else(|| Error::UnknownEntry(id.to_string()))?;
        self.switch_to(index);
        Ok(())
    }

    fn switch_to(&mut self, index: usize) {
        if index >= self.registry.len() {
            return;
        }
        self.active = index;
        self.modulation = None;
        info!(entry = self.active_id(), "switched entry");
    }

    pub fn handle(&mut self, event: DriverEvent) {
        if self.registry.is_empty() {
            return;
        }
        let len = self.registry.len();

        match event {
            DriverEvent::Adjust { param, delta } => self.registry.adjust(self.active, param, delta),
            DriverEvent::Nudge { param, direction } => {
                let step = self.registry.params(self.active).get(param).step();
                self.registry.adjust(self.active, param, direction * step);
            }
            DriverEvent::NextEntry => self.switch_to((self.active + 1) % len),
            DriverEvent::PrevEntry => self.switch_to((self.active + len - 1) % len),
            DriverEvent::Select(index) => self.switch_to(index),
            DriverEvent::ResetParams => {
                let id = self.registry.controlled(self.active);
                self.registry.generator_mut(id).params_mut().reset();
            }
            DriverEvent::TogglePause => self.paused = !self.paused,
            DriverEvent::CycleMapping => {
                if let Some(composite) = self.registry.composite_mut(self.active) {
                    let mapping = composite.mapping().next();
                    composite.set_mapping(mapping);
                    info!(composite = composite.id(), %mapping, "mapping changed");
                }
            }
            DriverEvent::Strength(delta) => {
                if let Some(composite) = self.registry.composite_mut(self.active) {
                    composite.set_strength(composite.strength() + delta);
                }
            }
        }
    }

    /// Advance the active entry by `dt` seconds (unless paused) and draw it
    pub fn tick(&mut self, dt: f64, frame: &mut Frame) {
        frame.clear();
        if self.registry.is_empty() {
            return;
        }

        let size = frame.size();
        if size != self.size {
            self.registry.resize_all(size.0, size.1);
            self.size = size;
        }

        if !self.paused {
            let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
            self.time += dt;
            self.registry.update(self.active, dt, self.time);
        }

        self.modulation = self.registry.draw(self.active, frame, self.time);

        if self.show_status {
            self.draw_status(frame);
        }
    }

    pub fn status_line(&self) -> String {
        let mut parts = vec![self.registry.entry_title(self.active).to_string()];

        for p in self.registry.params(self.active).iter() {
            if p.is_integral() {
                parts.push(format!("{} {:.0}", p.name, p.value()));
            } else {
                parts.push(format!("{} {:.2}", p.name, p.value()));
            }
        }

        if let Some(composite) = self.registry.composite(self.active) {
            parts.push(format!("strength {:.1} {}", composite.strength(), composite.mapping()));
            if let Some(value) = self.modulation {
                parts.push(format!("mod {:+.2}", value));
            }
        }

        if self.paused {
            parts.push("paused".to_string());
        }

        parts.join(" │ ")
    }

    fn draw_status(&self, frame: &mut Frame) {
        let (width, height) = frame.size();
        if height == 0 {
            return;
        }
        let y = height as i32 - 1;
        for x in 0..width as i32 {
            frame.set(x, y, ' ', None, false);
        }
        frame.set_str(0, y, &self.status_line(), Some(Color::White), false);
    }

    /// Current parameters of every generator plus composite settings
    pub fn snapshot(&self) -> Snapshot {
        let params = self
            .registry
            .generators()
            .map(|(_, g)| (g.kind().id().to_string(), g.get_params()))
            .collect();
        let composites = (0..self.registry.len())
            .filter_map(|i| self.registry.composite(i))
            .map(|c| (c.id().to_string(), c.state()))
            .collect();

        Snapshot {
            active: self.active_id().to_string(),
            params,
            composites,
        }
    }

    /// Apply a snapshot. Values pass through the clamped setters; unknown
    /// ids are skipped.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        for (id, values) in &snapshot.params {
            match self.registry.find_generator(id) {
                Some(generator) => self.registry.generator_mut(generator).set_params(*values),
                None => warn!(generator = %id, "preset names an unknown generator"),
            }
        }

        for (id, state) in &snapshot.composites {
            match self.registry.find(id).and_then(|i| self.registry.composite_mut(i)) {
                Some(composite) => composite.restore(*state),
                None => warn!(composite = %id, "preset names an unknown composite"),
            }
        }

        if let Err(err) = self.select_id(&snapshot.active) {
            warn!(%err, "keeping current entry");
        }
    }
}
