//! Obstacle generation: when to spawn a pipe pair and where to put its gap.

use crate::config::Tuning;
use log::debug;
use rand::Rng;

// Pattern offsets, measured from the band edges or the previous gap.
const VERY_OFFSET: f64 = 40.0;
const EXTREME_OFFSET: f64 = 30.0;
const EXTREME_SPREAD: f64 = 60.0;
const ALTERNATE_JUMP: f64 = 150.0;
const ALTERNATE_JITTER: f64 = 80.0;

/// Minimum visible height of either pipe.
const MIN_PIPE_HEIGHT: f64 = 10.0;
/// Rejection draws before a uniform pick gives up and uses a band edge.
const UNIFORM_ATTEMPTS: usize = 256;

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn expand(&self, by: f64) -> Rect {
        Rect {
            x: self.x - by,
            y: self.y - by,
            w: self.w + by * 2.0,
            h: self.h + by * 2.0,
        }
    }

    /// Touching edges count as overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 || other.w <= 0.0 || other.h <= 0.0 {
            return false;
        }
        !(self.right() < other.x
            || self.bottom() < other.y
            || self.x > other.right()
            || self.y > other.bottom())
    }
}

/// A top and bottom pipe sharing one gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u64,
    /// Horizontal center line. Scoring happens when this passes the bird.
    pub x: f64,
    pub gap_center: f64,
    pub gap_half: f64,
    /// Round clock (ms) at creation.
    pub created_at: f64,
    pub scored: bool,
}

impl Obstacle {
    pub fn gap_top(&self) -> f64 {
        self.gap_center - self.gap_half
    }

    pub fn gap_bottom(&self) -> f64 {
        self.gap_center + self.gap_half
    }

    pub fn top_rect(&self, t: &Tuning) -> Rect {
        Rect {
            x: self.x - t.pipe_width / 2.0,
            y: 0.0,
            w: t.pipe_width,
            h: self.gap_top().max(MIN_PIPE_HEIGHT),
        }
    }

    pub fn bottom_rect(&self, t: &Tuning) -> Rect {
        let top = self.gap_bottom();
        Rect {
            x: self.x - t.pipe_width / 2.0,
            y: top,
            w: t.pipe_width,
            h: (t.ground_line - top).max(MIN_PIPE_HEIGHT),
        }
    }

    /// Collision bounds of both pipes, grown by the collision buffer.
    pub fn hit_rects(&self, t: &Tuning) -> [Rect; 2] {
        [
            self.top_rect(t).expand(t.collision_buffer),
            self.bottom_rect(t).expand(t.collision_buffer),
        ]
    }

    pub fn is_offscreen(&self, t: &Tuning) -> bool {
        self.x < -t.pipe_width
    }
}

/// How a gap center is chosen. Every variant except `Uniform` is a
/// "pattern" that pushes the gap toward the band edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapStrategy {
    VeryHigh,
    VeryLow,
    /// Jump to the other side of the previous gap.
    Alternate,
    RandomExtreme,
    /// Uniform in the band, rejecting draws close to the previous gap.
    Uniform,
}

impl GapStrategy {
    pub const PATTERNS: [GapStrategy; 4] = [
        GapStrategy::VeryHigh,
        GapStrategy::VeryLow,
        GapStrategy::Alternate,
        GapStrategy::RandomExtreme,
    ];

    pub fn choose<R: Rng>(t: &Tuning, rng: &mut R) -> Self {
        if rng.gen_bool(t.pattern_chance) {
            Self::PATTERNS[rng.gen_range(0..Self::PATTERNS.len())]
        } else {
            GapStrategy::Uniform
        }
    }

    pub fn is_pattern(&self) -> bool {
        *self != GapStrategy::Uniform
    }

    /// Raw gap center for this strategy. Not clamped.
    pub fn pick<R: Rng>(&self, t: &Tuning, last_gap: f64, rng: &mut R) -> f64 {
        let (min, max) = (t.min_gap_y, t.max_gap_y);
        match self {
            GapStrategy::VeryHigh => min + VERY_OFFSET,
            GapStrategy::VeryLow => max - VERY_OFFSET,
            GapStrategy::Alternate => {
                let jitter = rng.gen_range(0.0..1.0) * ALTERNATE_JITTER;
                if last_gap < t.band_mid() {
                    max.min(last_gap + ALTERNATE_JUMP + jitter)
                } else {
                    min.max(last_gap - ALTERNATE_JUMP - jitter)
                }
            }
            GapStrategy::RandomExtreme => {
                let spread = rng.gen_range(0.0..1.0) * EXTREME_SPREAD;
                if rng.gen_bool(0.5) {
                    min + EXTREME_OFFSET + spread
                } else {
                    max - EXTREME_OFFSET - spread
                }
            }
            GapStrategy::Uniform => {
                let lo = min.ceil();
                let hi = max.floor();
                for _ in 0..UNIFORM_ATTEMPTS {
                    let y = rng.gen_range(lo as i64..=hi as i64) as f64;
                    if (y - last_gap).abs() >= t.min_gap_difference {
                        return y;
                    }
                }
                // Band too narrow around `last_gap`: take the farther edge.
                if hi - last_gap >= last_gap - lo { hi } else { lo }
            }
        }
    }
}

/// Spawn bookkeeping for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    pub last_gap: f64,
    /// Round clock (ms) of the last spawn.
    pub last_spawn: f64,
    next_id: u64,
}

impl Spawner {
    pub fn new(t: &Tuning) -> Self {
        Self {
            last_gap: t.band_mid(),
            last_spawn: 0.0,
            next_id: 1,
        }
    }

    /// Time-gated while the field is empty, distance-gated otherwise.
    pub fn should_spawn(&self, t: &Tuning, now: f64, rightmost: Option<f64>) -> bool {
        match rightmost {
            None => now - self.last_spawn > t.spawn_interval_ms,
            Some(x) => x < t.world_width - t.spawn_distance,
        }
    }

    pub fn spawn<R: Rng>(&mut self, t: &Tuning, now: f64, rng: &mut R) -> Obstacle {
        let strategy = GapStrategy::choose(t, rng);
        let gap = strategy
            .pick(t, self.last_gap, rng)
            .clamp(t.min_gap_y, t.max_gap_y);
        self.last_gap = gap;
        self.last_spawn = now;

        let id = self.next_id;
        self.next_id += 1;

        let half = t.pipe_gap / 2.0;
        debug!(
            "spawned pipe pair {id} at x={} gap {:.0}..{:.0} ({strategy:?}{})",
            t.world_width,
            gap - half,
            gap + half,
            if strategy.is_pattern() { " pattern" } else { "" }
        );

        Obstacle {
            id,
            x: t.world_width,
            gap_center: gap,
            gap_half: half,
            created_at: now,
            scored: false,
        }
    }
}

pub fn rightmost(obstacles: &[Obstacle]) -> Option<f64> {
    obstacles.iter().map(|o| o.x).reduce(f64::max)
}

/// Drops pairs that have scrolled fully past the left edge.
pub fn retire(t: &Tuning, obstacles: &mut Vec<Obstacle>) {
    obstacles.retain(|o| !o.is_offscreen(t));
}
