//! Round state machine: gravity, collisions, scoring and obstacle flow.
//!
//! A [`Round`] owns all mutable game state. The front-end feeds it frame
//! ticks and the two discrete inputs, reads its state back for drawing, and
//! drains the [`Effect`]s it queues.

use crate::config::Tuning;
use crate::day_night::DayNight;
use crate::effects::{BurstKind, Effect, Sound};
use crate::spawner::{self, Obstacle, Rect, Spawner};
use log::{debug, info};
use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Most simulated time one tick may catch up on.
const MAX_BACKLOG_SECS: f64 = 0.25;

const WIND_INTERVAL_MS: f64 = 50.0;
const CONFETTI_EVERY: u32 = 5;
const BURST_PARTICLES: u32 = 50;
const FLAP_PARTICLES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Waiting for the first input.
    Idle,
    Running,
    Over,
    /// Frozen mid-round; only reachable from `Running`.
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailCause {
    Ground,
    Pipe,
}

impl fmt::Display for FailCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailCause::Ground => write!(f, "hit the ground"),
            FailCause::Pipe => write!(f, "hit a pipe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    /// Units per second, positive = down.
    pub vy: f64,
    pub alive: bool,
}

impl Bird {
    fn new(t: &Tuning) -> Self {
        Self {
            x: t.bird_x,
            y: t.bird_start_y,
            vy: 0.0,
            alive: true,
        }
    }

    /// Collision square, slightly inset from the nominal hitbox.
    pub fn hitbox(&self, t: &Tuning) -> Rect {
        let half = t.hitbox_size / 2.0;
        Rect {
            x: self.x - half + 2.0,
            y: self.y - half + 2.0,
            w: t.hitbox_size - 4.0,
            h: t.hitbox_size - 4.0,
        }
    }

    /// Nose angle in degrees, for drawing.
    pub fn tilt(&self) -> f64 {
        (self.vy * 0.1).clamp(-20.0, 20.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    tuning: Tuning,
    state: RoundState,
    bird: Bird,
    obstacles: Vec<Obstacle>,
    score: u32,
    /// Best score this session.
    best: u32,
    spawner: Spawner,
    day_night: DayNight,
    /// Simulated round time in ms; frozen outside `Running`.
    clock: f64,
    /// Unsimulated time carried between ticks, in seconds.
    backlog: f64,
    last_confetti: u32,
    last_wind: f64,
    effects: Vec<Effect>,
}

impl Round {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            state: RoundState::Idle,
            bird: Bird::new(&tuning),
            obstacles: Vec::new(),
            score: 0,
            best: 0,
            spawner: Spawner::new(&tuning),
            day_night: DayNight::new(&tuning),
            clock: 0.0,
            backlog: 0.0,
            last_confetti: 0,
            last_wind: 0.0,
            effects: Vec::new(),
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn day_night(&self) -> &DayNight {
        &self.day_night
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn drain_effects(&mut self) -> impl Iterator<Item = Effect> + '_ {
        self.effects.drain(..)
    }

    // ── Inputs ──────────────────────────────────────────────────────────────

    /// Space/Enter/Up: start, flap or restart depending on state.
    pub fn primary_input<R: Rng>(&mut self, rng: &mut R) {
        match self.state {
            RoundState::Idle => self.start(rng),
            RoundState::Running => self.flap(),
            RoundState::Over => self.restart(),
            RoundState::Paused => {}
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            RoundState::Running => {
                self.state = RoundState::Paused;
                info!("paused at score {}", self.score);
            }
            RoundState::Paused => {
                self.state = RoundState::Running;
                info!("resumed");
            }
            RoundState::Idle | RoundState::Over => {}
        }
    }

    fn start<R: Rng>(&mut self, rng: &mut R) {
        info!("round started");
        self.state = RoundState::Running;
        self.bird.alive = true;
        self.obstacles.clear();
        self.spawner.last_spawn = self.clock;
        let first = self.spawner.spawn(&self.tuning, self.clock, rng);
        self.obstacles.push(first);
        // The bird is released at rest; the next input is the first flap.
        self.bird.vy = 0.0;
    }

    fn flap(&mut self) {
        self.bird.vy = self.tuning.flap_velocity;
        self.effects.push(Effect::Burst {
            kind: BurstKind::WindBurst,
            x: self.bird.x - 15.0,
            y: self.bird.y + 2.0,
            count: FLAP_PARTICLES,
        });
    }

    /// Back to a fresh `Idle` round. Only the session best survives.
    pub fn restart(&mut self) {
        info!("restart after score {}", self.score);
        let best = self.best;
        let effects = std::mem::take(&mut self.effects);
        *self = Round {
            best,
            effects,
            ..Round::new(self.tuning.clone())
        };
    }

    /// Ends a running round. Any other state ignores it.
    pub fn fail(&mut self, cause: FailCause) {
        if self.state != RoundState::Running {
            return;
        }
        info!("round over: {cause} at score {}", self.score);
        self.state = RoundState::Over;
        self.bird.alive = false;
        self.best = self.best.max(self.score);
        self.backlog = 0.0;
        self.effects.push(Effect::Sound(Sound::Hit));
        self.effects.push(Effect::Burst {
            kind: BurstKind::Explosion,
            x: self.bird.x,
            y: self.bird.y,
            count: BURST_PARTICLES,
        });
    }

    // ── Simulation ──────────────────────────────────────────────────────────

    /// Advances by `dt` of wall time in fixed steps. No-op unless running.
    pub fn tick<R: Rng>(&mut self, dt: Duration, rng: &mut R) {
        if self.state != RoundState::Running {
            return;
        }
        let step = self.tuning.step_secs();
        // At very low step rates one step alone exceeds the stall cap.
        let cap = MAX_BACKLOG_SECS.max(step);
        self.backlog = (self.backlog + dt.as_secs_f64()).min(cap);
        while self.backlog >= step && self.state == RoundState::Running {
            self.backlog -= step;
            self.step(rng);
        }
    }

    /// One fixed simulation step.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        if self.state != RoundState::Running {
            return;
        }
        let dt = self.tuning.step_secs();
        self.clock += dt * 1000.0;

        if self.bird.alive {
            self.fall(dt);
            if self.bird.y + self.tuning.hitbox_size / 2.0 > self.tuning.grass_top - 2.0 {
                self.fail(FailCause::Ground);
                return;
            }
        }

        self.day_night.advance(self.score);

        for o in &mut self.obstacles {
            o.x -= self.tuning.pipe_speed * dt;
        }
        spawner::retire(&self.tuning, &mut self.obstacles);
        if self.collides() {
            self.fail(FailCause::Pipe);
            return;
        }

        self.score_passed();

        let rightmost = spawner::rightmost(&self.obstacles);
        if self.spawner.should_spawn(&self.tuning, self.clock, rightmost) {
            let o = self.spawner.spawn(&self.tuning, self.clock, rng);
            self.obstacles.push(o);
        }

        self.wind_trail();
    }

    fn fall(&mut self, dt: f64) {
        let t = &self.tuning;
        let bird = &mut self.bird;
        bird.vy = (bird.vy + t.gravity).min(t.max_fall_speed);
        bird.y += bird.vy * dt;

        // The top of the world is a wall, not a hazard.
        let half = t.hitbox_size / 2.0;
        if bird.y - half < 0.0 {
            bird.y = half;
            bird.vy = bird.vy.max(0.0);
        }
    }

    fn collides(&self) -> bool {
        let hitbox = self.bird.hitbox(&self.tuning);
        self.obstacles.iter().any(|o| {
            o.hit_rects(&self.tuning)
                .iter()
                .any(|r| r.intersects(&hitbox))
        })
    }

    fn score_passed(&mut self) {
        for o in &mut self.obstacles {
            if !o.scored && o.x < self.bird.x {
                o.scored = true;
                self.score += 1;
                debug!("passed pipe pair {}, score {}", o.id, self.score);
            }
        }

        if self.score > 0 && self.score % CONFETTI_EVERY == 0 && self.score != self.last_confetti {
            self.last_confetti = self.score;
            self.effects.push(Effect::Burst {
                kind: BurstKind::Confetti,
                x: self.bird.x,
                y: self.bird.y,
                count: BURST_PARTICLES,
            });
            self.effects.push(Effect::Sound(Sound::Celebration));
        }
    }

    fn wind_trail(&mut self) {
        let vy = self.bird.vy;
        if vy == 0.0 || self.clock <= self.last_wind + WIND_INTERVAL_MS {
            return;
        }
        self.last_wind = self.clock;
        let speed = (vy.abs() / 300.0).min(1.0);
        self.effects.push(Effect::Burst {
            kind: if vy < 0.0 {
                BurstKind::WindUp
            } else {
                BurstKind::WindDown
            },
            x: self.bird.x - 10.0,
            y: self.bird.y + 2.0,
            count: 3 + (speed * 3.0).floor() as u32,
        });
    }
}
