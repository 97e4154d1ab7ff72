//! A small particle pool for the cosmetic bursts the round asks for.

use crate::color::Rgb;
use crate::effects::BurstKind;
use rand::Rng;

/// Hard cap so a long night cannot grow the pool without bound.
const MAX_PARTICLES: usize = 2_000;

// Stars appear anywhere in the upper sky.
const STAR_FIELD_W: f64 = 800.0;
const STAR_FIELD_H: f64 = 400.0;

const WIND_TINTS: [Rgb; 3] = [Rgb(255, 255, 255), Rgb(224, 224, 255), Rgb(173, 216, 230)];
const WIND_DOWN_TINTS: [Rgb; 2] = [Rgb(255, 255, 255), Rgb(224, 224, 255)];
const CONFETTI_TINTS: [Rgb; 6] = [
    Rgb(255, 82, 82),
    Rgb(33, 150, 243),
    Rgb(255, 235, 59),
    Rgb(76, 175, 80),
    Rgb(224, 64, 251),
    Rgb(255, 167, 38),
];
const EXPLOSION_TINTS: [Rgb; 5] = [
    Rgb(255, 159, 67),
    Rgb(238, 90, 36),
    Rgb(250, 130, 49),
    Rgb(252, 66, 123),
    Rgb(163, 203, 56),
];
const STAR_TINTS: [Rgb; 1] = [Rgb(255, 255, 230)];

/// Emission parameters for one burst kind. Angles in degrees, 0 = right,
/// 90 = down; speeds in units/s; lifetimes in ms.
struct Emitter {
    life: (f64, f64),
    speed: (f64, f64),
    angle: (f64, f64),
    gravity: f64,
    alpha: f64,
    /// Fade in instead of out.
    fade_in: bool,
    tints: &'static [Rgb],
}

fn emitter(kind: BurstKind) -> Emitter {
    match kind {
        BurstKind::WindBurst => Emitter {
            life: (300.0, 600.0),
            speed: (60.0, 120.0),
            angle: (140.0, 220.0),
            gravity: -15.0,
            alpha: 0.8,
            fade_in: false,
            tints: &WIND_TINTS,
        },
        BurstKind::WindUp => Emitter {
            life: (300.0, 500.0),
            speed: (50.0, 100.0),
            angle: (150.0, 210.0),
            gravity: -10.0,
            alpha: 0.7,
            fade_in: false,
            tints: &WIND_TINTS,
        },
        BurstKind::WindDown => Emitter {
            life: (200.0, 400.0),
            speed: (30.0, 60.0),
            angle: (160.0, 200.0),
            gravity: 0.0,
            alpha: 0.4,
            fade_in: false,
            tints: &WIND_DOWN_TINTS,
        },
        BurstKind::Confetti => Emitter {
            life: (2000.0, 2000.0),
            speed: (100.0, 200.0),
            angle: (0.0, 360.0),
            gravity: 300.0,
            alpha: 1.0,
            fade_in: false,
            tints: &CONFETTI_TINTS,
        },
        BurstKind::Explosion => Emitter {
            life: (800.0, 800.0),
            speed: (100.0, 300.0),
            angle: (0.0, 360.0),
            gravity: 300.0,
            alpha: 1.0,
            fade_in: false,
            tints: &EXPLOSION_TINTS,
        },
        BurstKind::Star => Emitter {
            life: (20_000.0, 20_000.0),
            speed: (0.0, 0.0),
            angle: (0.0, 0.0),
            gravity: 0.0,
            alpha: 0.8,
            fade_in: true,
            tints: &STAR_TINTS,
        },
    }
}

fn range<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: BurstKind,
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    gravity: f64,
    age: f64,
    life: f64,
    alpha: f64,
    fade_in: bool,
    pub color: Rgb,
}

impl Particle {
    /// Current opacity, 0..=1.
    pub fn opacity(&self) -> f64 {
        let t = (self.age / self.life).clamp(0.0, 1.0);
        if self.fade_in {
            self.alpha * t
        } else {
            self.alpha * (1.0 - t)
        }
    }
}

#[derive(Debug, Default)]
pub struct Particles {
    pool: Vec<Particle>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn burst<R: Rng>(&mut self, kind: BurstKind, x: f64, y: f64, count: u32, rng: &mut R) {
        let e = emitter(kind);
        for _ in 0..count {
            if self.pool.len() >= MAX_PARTICLES {
                return;
            }
            let (px, py) = if kind == BurstKind::Star {
                (rng.gen_range(0.0..STAR_FIELD_W), rng.gen_range(0.0..STAR_FIELD_H))
            } else {
                (x, y)
            };
            let angle = range(rng, e.angle).to_radians();
            let speed = range(rng, e.speed);
            self.pool.push(Particle {
                kind,
                x: px,
                y: py,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                gravity: e.gravity,
                age: 0.0,
                life: range(rng, e.life),
                alpha: e.alpha,
                fade_in: e.fade_in,
                color: e.tints[rng.gen_range(0..e.tints.len())],
            });
        }
    }

    /// Advances every particle by `dt_ms` and drops expired ones.
    pub fn update(&mut self, dt_ms: f64) {
        let dt = dt_ms / 1000.0;
        for p in &mut self.pool {
            p.age += dt_ms;
            p.vy += p.gravity * dt;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
        }
        self.pool.retain(|p| p.age < p.life);
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter()
    }
}
