//! Particle swarm with cohesion and separation (simplified boids)

use crate::anim::{Parameter, ParametricAnimation, Params};
use crate::colors::{level_color, SCHEME_GOLD};
use crate::frame::Frame;
use super::{GeneratorKind, CELL_ASPECT, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use rand::prelude::*;

pub const PARTICLE_COUNT: usize = 1;
pub const SPEED: usize = 2;
pub const COHESION: usize = 3;
pub const SEPARATION: usize = 4;

/// Size of the particle pool; particle_count only toggles `active`
pub const CAPACITY: usize = 100;
/// Neighbours closer than this push each other apart
const MIN_DISTANCE: f64 = 3.0;
const DISTANCE_EPSILON: f64 = 0.05;
const COHESION_GAIN: f64 = 0.02;
const SEPARATION_GAIN: f64 = 0.5;
const DRAG: f64 = 0.98;
/// Particles never slow below this fraction of the speed limit
const MIN_SPEED_FRACTION: f64 = 0.2;
/// Simulation steps are tuned for this frame time
const REFERENCE_DT: f64 = 1.0 / 30.0;

const HEADING_CHARS: [char; 8] = ['-', '\\', '|', '/', '-', '\\', '|', '/'];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub active: bool,
}

pub struct ParticleSwarm {
    params: Params,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    rng: StdRng,
}

impl ParticleSwarm {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut swarm = Self {
            params: Params::new([
                Parameter::new("particle_count", 40.0, 10.0, CAPACITY as f64, 5.0).integral(),
                Parameter::new("speed", 2.0, 0.5, 5.0, 0.1),
                Parameter::new("cohesion", 0.5, 0.0, 2.0, 0.1),
                Parameter::new("separation", 1.0, 0.0, 3.0, 0.1),
            ]),
            particles: Vec::with_capacity(CAPACITY),
            width: DEFAULT_WIDTH as f64,
            height: DEFAULT_HEIGHT as f64,
            rng: StdRng::seed_from_u64(seed),
        };
        swarm.scatter();
        swarm
    }

    /// Place the whole pool at random positions with small random velocities
    fn scatter(&mut self) {
        let speed = self.params.value(SPEED);
        self.particles.clear();
        for _ in 0..CAPACITY {
            let particle = Particle {
                x: self.rng.gen_range(0.0..self.width),
                y: self.rng.gen_range(0.0..self.height),
                vx: self.rng.gen_range(-0.5..0.5) * speed,
                vy: self.rng.gen_range(-0.5..0.5) * speed,
                active: false,
            };
            self.particles.push(particle);
        }
        self.sync_active();
    }

    fn sync_active(&mut self) {
        let count = self.params.value(PARTICLE_COUNT) as usize;
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.active = i < count;
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.active)
    }

    /// Mean distance over all pairs of active particles
    pub fn mean_pairwise_distance(&self) -> f64 {
        let active: Vec<&Particle> = self.active().collect();
        let mut total = 0.0;
        let mut pairs = 0usize;
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                total += ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                pairs += 1;
            }
        }
        if pairs == 0 {
            0.0
        } else {
            total / pairs as f64
        }
    }

    fn centroid(&self) -> Option<(f64, f64)> {
        let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
        for p in self.active() {
            sx += p.x;
            sy += p.y;
            n += 1;
        }
        (n > 0).then(|| (sx / n as f64, sy / n as f64))
    }

    /// One flocking step scaled by `scale` reference frames
    fn step(&mut self, scale: f64) {
        self.sync_active();
        let Some((cx, cy)) = self.centroid() else {
            return;
        };

        let speed = self.params.value(SPEED);
        let cohesion = self.params.value(COHESION) * COHESION_GAIN;
        let separation = self.params.value(SEPARATION) * SEPARATION_GAIN;

        // Forces from a snapshot so update order does not matter
        let snapshot: Vec<(f64, f64)> = self.active().map(|p| (p.x, p.y)).collect();

        for p in self.particles.iter_mut().filter(|p| p.active) {
            let mut fx = (cx - p.x) * cohesion;
            let mut fy = (cy - p.y) * cohesion;

            for &(ox, oy) in &snapshot {
                let dx = p.x - ox;
                let dy = p.y - oy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < MIN_DISTANCE {
                    // The particle itself sits at distance zero and adds nothing
                    let d = dist.max(DISTANCE_EPSILON);
                    fx += dx / (d * d) * separation;
                    fy += dy / (d * d) * separation;
                }
            }

            p.vx = (p.vx + fx * scale) * DRAG;
            p.vy = (p.vy + fy * scale) * DRAG;

            let magnitude = (p.vx * p.vx + p.vy * p.vy).sqrt();
            let min_speed = speed * MIN_SPEED_FRACTION;
            if magnitude > speed {
                p.vx *= speed / magnitude;
                p.vy *= speed / magnitude;
            } else if magnitude > DISTANCE_EPSILON && magnitude < min_speed {
                p.vx *= min_speed / magnitude;
                p.vy *= min_speed / magnitude;
            }

            // Vertical motion is halved so on-screen speed looks uniform
            p.x = wrap(p.x + p.vx * scale, self.width);
            p.y = wrap(p.y + p.vy * scale / CELL_ASPECT, self.height);
        }
    }
}

/// Toroidal wrap into `[0, extent)`
fn wrap(v: f64, extent: f64) -> f64 {
    let v = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if v >= extent {
        0.0
    } else {
        v
    }
}

impl Default for ParticleSwarm {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametricAnimation for ParticleSwarm {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Swarm
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    fn resize(&mut self, width: usize, height: usize) {
        let (w, h) = (width.max(1) as f64, height.max(1) as f64);
        if w == self.width && h == self.height {
            return;
        }
        let (sx, sy) = (w / self.width, h / self.height);
        for p in &mut self.particles {
            p.x = wrap(p.x * sx, w);
            p.y = wrap(p.y * sy, h);
        }
        self.width = w;
        self.height = h;
    }

    fn update(&mut self, dt: f64) {
        let scale = (dt / REFERENCE_DT).clamp(0.0, 4.0);
        self.step(scale);
    }

    fn draw(&self, frame: &mut Frame, _t: f64) {
        let speed = self.params.value(SPEED);
        for p in self.active() {
            let angle = p.vy.atan2(p.vx);
            let octant = ((angle / std::f64::consts::FRAC_PI_4).round() as i32).rem_euclid(8) as usize;
            let level = ((p.vx * p.vx + p.vy * p.vy).sqrt() / speed).clamp(0.0, 1.0);
            let (color, bold) = level_color(SCHEME_GOLD, 0.3 + 0.7 * level);
            frame.set(p.x as i32, p.y as i32, HEADING_CHARS[octant], Some(color), bold);
        }
    }
}
