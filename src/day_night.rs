//! Score-driven day/night cycle.
//!
//! The phase runs over `[0, 1)`: 0 is noon, 0.5 is midnight. Every
//! `cycle_score` points the target swings half a cycle, day to night on
//! even cycles and night back to day on odd ones. The phase chases the
//! target at a fixed per-step rate.
//!
//! The second half of this module is a data table for the renderer: sky
//! tint, sun and moon placement, star density.

use crate::color::Rgb;
use crate::config::Tuning;
use rand::Rng;
use std::f64::consts::PI;

pub const DAY_SKY: Rgb = Rgb(77, 166, 255);
pub const NIGHT_SKY: Rgb = Rgb(10, 26, 42);
pub const DUSK_SKY: Rgb = Rgb(255, 127, 80);

/// Target phase for a score.
pub fn target_for_score(score: u32, cycle_score: u32) -> f64 {
    let progress = (score % cycle_score) as f64 / cycle_score as f64;
    let ramp = (progress - 0.25) / 0.5 * 0.5;

    if !is_night_cycle(score, cycle_score) {
        if progress < 0.25 {
            0.0
        } else if progress < 0.75 {
            ramp
        } else {
            0.5
        }
    } else if progress < 0.25 {
        0.5
    } else if progress < 0.75 {
        0.5 + ramp
    } else {
        0.0
    }
}

/// True during the night-to-day half of the cycle.
pub fn is_night_cycle(score: u32, cycle_score: u32) -> bool {
    (score / cycle_score) % 2 == 1
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayNight {
    phase: f64,
    target: f64,
    step: f64,
    cycle_score: u32,
}

impl DayNight {
    pub fn new(t: &Tuning) -> Self {
        Self {
            phase: 0.0,
            target: 0.0,
            step: t.day_night_step,
            cycle_score: t.day_night_cycle_score,
        }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// One simulation step toward the score's target.
    pub fn advance(&mut self, score: u32) {
        self.target = target_for_score(score, self.cycle_score);

        if self.phase != self.target {
            let distance = self.target - self.phase;
            // Slower near the target and across long swings.
            let easing = if distance.abs() < 0.1 || distance.abs() > 0.4 {
                0.5
            } else {
                1.0
            };

            if distance.abs() < self.step {
                self.phase = self.target;
            } else if distance > 0.0 {
                self.phase += self.step * easing;
            } else {
                self.phase -= self.step * easing;
            }

            // 0.99 -> 0.0 is a short hop, not a trip back through the night.
            if self.target == 0.0 && self.phase > 0.9 {
                self.phase = 0.0;
            }
            if self.target == 1.0 && self.phase < 0.1 {
                self.phase = 1.0;
            }
        }

        self.phase = wrap_unit(self.phase);
    }

    pub fn sky_tint(&self) -> SkyTint {
        sky_tint(self.phase)
    }

    pub fn celestial(&self) -> Celestial {
        celestial(self.phase)
    }
}

fn wrap_unit(v: f64) -> f64 {
    let w = v.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negatives.
    if w >= 1.0 { 0.0 } else { w }
}

// ── Presentation table ──────────────────────────────────────────────────────

/// Overlay drawn over the base sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyTint {
    pub color: Rgb,
    pub alpha: f64,
}

pub fn sky_tint(phase: f64) -> SkyTint {
    let p = phase;
    let (color, alpha) = if p < 0.2 {
        (Rgb::mix(DUSK_SKY, DAY_SKY, p / 0.2), 0.0)
    } else if p < 0.3 {
        (DAY_SKY, 0.0)
    } else if p < 0.4 {
        let t = (p - 0.3) / 0.1;
        (Rgb::mix(DAY_SKY, DUSK_SKY, t), t * 0.2)
    } else if p < 0.45 {
        let t = (p - 0.4) / 0.05;
        (Rgb::mix(DUSK_SKY, NIGHT_SKY, t), 0.2 + t * 0.4)
    } else if p < 0.65 {
        (NIGHT_SKY, 0.6)
    } else if p < 0.7 {
        let t = (p - 0.65) / 0.05;
        (Rgb::mix(NIGHT_SKY, DUSK_SKY, t), 0.6 - t * 0.4)
    } else if p < 0.8 {
        let t = (p - 0.7) / 0.1;
        (Rgb::mix(DUSK_SKY, DAY_SKY, t), 0.2 - t * 0.2)
    } else {
        (DAY_SKY, 0.0)
    };
    SkyTint { color, alpha }
}

pub fn is_night(phase: f64) -> bool {
    (0.25..0.75).contains(&phase)
}

/// Star visibility, 0..=1, peaking at midnight.
pub fn night_depth(phase: f64) -> f64 {
    if phase > 0.5 {
        (1.0 - (phase - 0.5) / 0.15).clamp(0.0, 1.0)
    } else {
        ((phase - 0.35) / 0.15).clamp(0.0, 1.0)
    }
}

// Arc the sun and moon travel on, in world units.
const ARC_CENTER_X: f64 = 400.0;
const ARC_CENTER_Y: f64 = 650.0;
const ARC_RADIUS: f64 = 450.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celestial {
    pub x: f64,
    pub y: f64,
    /// Larger near the zenith.
    pub scale: f64,
    pub sun_alpha: f64,
    pub moon_alpha: f64,
}

pub fn celestial(phase: f64) -> Celestial {
    let p = phase;
    let normalized = if is_night(p) {
        (p - 0.25) * 2.0
    } else if p < 0.25 {
        (p + 0.25) * 2.0
    } else {
        (p - 0.75) * 2.0
    };

    let angle = PI - normalized * PI;
    let x = ARC_CENTER_X + angle.cos() * ARC_RADIUS;
    let y = ARC_CENTER_Y - angle.sin() * ARC_RADIUS;
    let scale = 0.8 + 0.4 * ((y - ARC_CENTER_Y) / ARC_RADIUS).abs();

    let sun_alpha = if p < 0.2 {
        1.0
    } else if p < 0.8 {
        (1.0 - (p - 0.2) * 5.0).max(0.0)
    } else {
        ((p - 0.8) * 5.0).min(1.0)
    };

    let moon_alpha = if p >= 0.7 {
        (1.0 - (p - 0.7) * 5.0).max(0.0)
    } else if p >= 0.5 {
        1.0
    } else if p >= 0.3 {
        ((p - 0.3) * 5.0).min(1.0)
    } else {
        0.0
    };

    Celestial {
        x,
        y,
        scale,
        sun_alpha,
        moon_alpha,
    }
}

/// Paces star emission during deep night.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarClock {
    last: f64,
}

impl StarClock {
    pub fn reset(&mut self) {
        self.last = 0.0;
    }

    /// Number of stars to emit at `now` (ms), if any are due.
    pub fn due<R: Rng>(&mut self, now: f64, phase: f64, rng: &mut R) -> Option<u32> {
        let depth = night_depth(phase);
        if !is_night(phase) || depth <= 0.3 {
            return None;
        }
        if now <= self.last + 1000.0 / depth.max(0.3) {
            return None;
        }
        let max = (3.0 * depth).floor() as u32;
        if max == 0 {
            return None;
        }
        self.last = now;
        Some(rng.gen_range(1..=max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_target_day_to_night() {
        assert_eq!(target_for_score(0, 10), 0.0);
        assert_eq!(target_for_score(2, 10), 0.0);
        assert!(approx(target_for_score(3, 10), 0.05));
        assert!(approx(target_for_score(5, 10), 0.25));
        assert!(approx(target_for_score(7, 10), 0.45));
        assert_eq!(target_for_score(8, 10), 0.5);
        assert_eq!(target_for_score(9, 10), 0.5);
    }

    #[test]
    fn test_target_night_to_day() {
        assert_eq!(target_for_score(10, 10), 0.5);
        assert!(approx(target_for_score(15, 10), 0.75));
        assert!(approx(target_for_score(17, 10), 0.95));
        assert_eq!(target_for_score(18, 10), 0.0);
        assert_eq!(target_for_score(20, 10), 0.0);
    }

    #[test]
    fn test_cycle_parity_flips_every_ten() {
        assert!(!is_night_cycle(9, 10));
        assert!(is_night_cycle(10, 10));
        assert!(is_night_cycle(19, 10));
        assert!(!is_night_cycle(20, 10));
    }

    #[test]
    fn test_advance_eases_and_converges() {
        let mut dn = DayNight::new(&Tuning::default());
        dn.advance(10);
        // Long swing: half speed.
        assert!(approx(dn.phase(), 0.00125));
        for _ in 0..1_000 {
            dn.advance(10);
            assert!((0.0..1.0).contains(&dn.phase()));
        }
        assert_eq!(dn.phase(), 0.5);
    }

    #[test]
    fn test_advance_snaps_when_close() {
        let mut dn = DayNight::new(&Tuning::default());
        dn.phase = 0.499;
        dn.advance(10);
        assert_eq!(dn.phase(), 0.5);
    }

    #[test]
    fn test_wraps_to_noon_after_sunrise() {
        let mut dn = DayNight::new(&Tuning::default());
        dn.phase = 0.95;
        dn.advance(18);
        assert_eq!(dn.phase(), 0.0);
        assert_eq!(dn.target(), 0.0);
    }

    #[test]
    fn test_phase_never_leaves_unit_interval() {
        let mut dn = DayNight::new(&Tuning::default());
        for score in 0..60u32 {
            for _ in 0..200 {
                dn.advance(score);
                assert!((0.0..1.0).contains(&dn.phase()), "{}", dn.phase());
            }
        }
    }

    #[test]
    fn test_sky_tint_stops() {
        assert_eq!(sky_tint(0.25), SkyTint { color: DAY_SKY, alpha: 0.0 });
        assert_eq!(sky_tint(0.5), SkyTint { color: NIGHT_SKY, alpha: 0.6 });
        assert_eq!(sky_tint(0.6).alpha, 0.6);
        assert_eq!(sky_tint(0.9), SkyTint { color: DAY_SKY, alpha: 0.0 });
        assert_eq!(sky_tint(0.0).color, DUSK_SKY);
        assert!(approx(sky_tint(0.35).alpha, 0.1));
        assert!(approx(sky_tint(0.425).alpha, 0.4));
    }

    #[test]
    fn test_celestial_noon_and_midnight() {
        let noon = celestial(0.0);
        assert!(approx(noon.x, 400.0));
        assert!(approx(noon.y, 200.0));
        assert_eq!(noon.sun_alpha, 1.0);
        assert_eq!(noon.moon_alpha, 0.0);

        let midnight = celestial(0.5);
        assert!(approx(midnight.y, 200.0));
        assert_eq!(midnight.moon_alpha, 1.0);
        assert_eq!(midnight.sun_alpha, 0.0);
        assert!(approx(midnight.scale, 1.2));
    }

    #[test]
    fn test_sun_returns_at_dawn() {
        let late_night = celestial(0.6);
        assert_eq!(late_night.sun_alpha, 0.0);
        assert_eq!(late_night.moon_alpha, 1.0);

        let dawn = celestial(0.85);
        let morning = celestial(0.95);
        assert!(approx(dawn.sun_alpha, 0.25));
        assert!(approx(morning.sun_alpha, 0.75));
        // Rising toward the zenith, above the arc center.
        assert!(morning.y < dawn.y);
        assert!(dawn.y < ARC_CENTER_Y);
    }

    #[test]
    fn test_night_depth() {
        assert_eq!(night_depth(0.0), 0.0);
        assert_eq!(night_depth(0.5), 1.0);
        assert!(approx(night_depth(0.425), 0.5));
        assert_eq!(night_depth(0.7), 0.0);
    }

    #[test]
    fn test_stars_only_in_deep_night() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut clock = StarClock::default();
        assert_eq!(clock.due(5_000.0, 0.1, &mut rng), None);

        let n = clock.due(5_000.0, 0.5, &mut rng).unwrap();
        assert!((1..=3).contains(&n));
        // Paced to one burst per second at full depth.
        assert_eq!(clock.due(5_500.0, 0.5, &mut rng), None);
        assert!(clock.due(6_001.0, 0.5, &mut rng).is_some());
    }
}
