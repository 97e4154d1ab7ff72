//! Background motion that never touches the round: parallax scroll, the
//! animation frame counter, drifting clouds and distant birds.
//!
//! Clouds and birds only move while a round is running and are rebuilt
//! whenever a fresh round begins.

use crate::config::Tuning;
use crate::round::RoundState;
use rand::Rng;
use std::f64::consts::TAU;

const CLOUD_COUNT: usize = 3;
const FLYER_COUNT: usize = 4;

/// Cloud width in world units at scale 1.
pub const CLOUD_WIDTH: f64 = 160.0;
/// Distant bird wingspan in world units at scale 1.
pub const FLYER_WIDTH: f64 = 8.0;
/// Time per wing frame of a distant bird, in ms.
const FLYER_WING_MS: f64 = 300.0;

// Clouds keep to the top strip; birds fly below it.
const CLOUD_TOP: f64 = 30.0;
const CLOUD_SPREAD: f64 = 70.0;
const FLYER_TOP: f64 = 120.0;
const FLYER_SPREAD: f64 = 300.0;

/// Background drift relative to the pipes, per frame of motion.
const DRIFT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// Fraction of the pipe speed, per frame.
    speed: f64,
}

impl Cloud {
    fn new<R: Rng>(t: &Tuning, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..t.world_width),
            y: CLOUD_TOP + rng.gen_range(0.0..CLOUD_SPREAD),
            scale: rng.gen_range(0.4..0.7),
            speed: rng.gen_range(0.01..0.03),
        }
    }

    pub fn width(&self) -> f64 {
        CLOUD_WIDTH * self.scale
    }
}

/// A distant bird flying right on a gentle sine path.
#[derive(Debug, Clone, PartialEq)]
pub struct Flyer {
    pub x: f64,
    /// Center line of the sine path.
    pub base_y: f64,
    pub scale: f64,
    /// Higher birds are fainter.
    pub alpha: f64,
    speed: f64,
    amplitude: f64,
    /// Radians per ms.
    frequency: f64,
    offset: f64,
}

impl Flyer {
    fn new<R: Rng>(t: &Tuning, rng: &mut R) -> Self {
        let base_y = FLYER_TOP + rng.gen_range(0.0..FLYER_SPREAD);
        let depth = (FLYER_TOP + FLYER_SPREAD - base_y) / FLYER_SPREAD;
        Self {
            x: rng.gen_range(0.0..t.world_width),
            base_y,
            scale: rng.gen_range(1.0..2.5),
            alpha: 0.6 + 0.3 * depth,
            speed: 0.02 + 0.03 * (0.4 + 0.6 * depth),
            amplitude: rng.gen_range(3.0..11.0),
            frequency: rng.gen_range(0.0003..0.0009),
            offset: rng.gen_range(0.0..TAU),
        }
    }

    pub fn width(&self) -> f64 {
        FLYER_WIDTH * self.scale
    }

    /// Height at flight time `time_ms`.
    pub fn y(&self, time_ms: f64) -> f64 {
        self.base_y + (time_ms * self.frequency + self.offset).sin() * self.amplitude
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenery {
    /// World units scrolled so far.
    pub scroll: f64,
    pub frame: u64,
    /// Running time in ms; drives the birds' sine paths and wing beats.
    pub time_ms: f64,
    pub clouds: Vec<Cloud>,
    pub flyers: Vec<Flyer>,
}

impl Scenery {
    pub fn new<R: Rng>(t: &Tuning, rng: &mut R) -> Self {
        Self {
            scroll: 0.0,
            frame: 0,
            time_ms: 0.0,
            clouds: (0..CLOUD_COUNT).map(|_| Cloud::new(t, rng)).collect(),
            flyers: (0..FLYER_COUNT).map(|_| Flyer::new(t, rng)).collect(),
        }
    }

    /// Fresh clouds and birds for a new round. Scroll keeps going.
    pub fn reset<R: Rng>(&mut self, t: &Tuning, rng: &mut R) {
        self.time_ms = 0.0;
        self.clouds = (0..CLOUD_COUNT).map(|_| Cloud::new(t, rng)).collect();
        self.flyers = (0..FLYER_COUNT).map(|_| Flyer::new(t, rng)).collect();
    }

    pub fn advance<R: Rng>(&mut self, state: RoundState, dt_secs: f64, t: &Tuning, rng: &mut R) {
        match state {
            RoundState::Running => {
                self.frame += 1;
                self.scroll += t.pipe_speed * dt_secs;
                self.time_ms += dt_secs * 1000.0;
                self.drift(dt_secs, t, rng);
            }
            RoundState::Idle => {
                self.frame += 1;
                self.scroll += t.pipe_speed * 0.2 * dt_secs;
            }
            RoundState::Over => self.frame += 1,
            RoundState::Paused => {}
        }
    }

    fn drift<R: Rng>(&mut self, dt_secs: f64, t: &Tuning, rng: &mut R) {
        let push = t.pipe_speed * dt_secs * t.steps_per_second * DRIFT;

        for cloud in &mut self.clouds {
            cloud.x -= push * cloud.speed;
            if cloud.x < -cloud.width() / 2.0 {
                cloud.x = t.world_width + cloud.width() / 2.0;
                cloud.y = CLOUD_TOP + rng.gen_range(0.0..CLOUD_SPREAD);
            }
        }

        for flyer in &mut self.flyers {
            flyer.x += push * flyer.speed;
            if flyer.x > t.world_width + flyer.width() / 2.0 {
                flyer.x = -flyer.width() / 2.0;
                flyer.base_y = FLYER_TOP + rng.gen_range(0.0..FLYER_SPREAD);
                flyer.offset = rng.gen_range(0.0..TAU);
            }
        }
    }

    /// Wing frame of the distant birds: 0 up, 1 down.
    pub fn wing_frame(&self) -> u8 {
        ((self.time_ms / FLYER_WING_MS) as u64 % 2) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    #[test]
    fn test_new_scenery_layout() {
        let t = Tuning::default();
        let scenery = Scenery::new(&t, &mut create_test_rng());
        assert_eq!(scenery.clouds.len(), 3);
        assert_eq!(scenery.flyers.len(), 4);
        for c in &scenery.clouds {
            assert!((30.0..100.0).contains(&c.y));
            assert!((0.4..0.7).contains(&c.scale));
        }
        for f in &scenery.flyers {
            assert!((120.0..420.0).contains(&f.base_y));
            assert!((0.6..=0.9).contains(&f.alpha));
            assert!((f.y(1234.0) - f.base_y).abs() <= 11.0);
        }
    }

    #[test]
    fn test_scenery_freezes_when_paused() {
        let t = Tuning::default();
        let mut rng = create_test_rng();
        let mut scenery = Scenery::new(&t, &mut rng);
        scenery.advance(RoundState::Running, 0.5, &t, &mut rng);
        assert_eq!(scenery.scroll, 90.0);
        let snapshot = scenery.clone();
        scenery.advance(RoundState::Paused, 0.5, &t, &mut rng);
        assert_eq!(scenery, snapshot);
    }

    #[test]
    fn test_clouds_and_birds_wait_for_running() {
        let t = Tuning::default();
        let mut rng = create_test_rng();
        let mut scenery = Scenery::new(&t, &mut rng);
        let (clouds, flyers) = (scenery.clouds.clone(), scenery.flyers.clone());
        scenery.advance(RoundState::Idle, 1.0, &t, &mut rng);
        scenery.advance(RoundState::Over, 1.0, &t, &mut rng);
        assert_eq!(scenery.clouds, clouds);
        assert_eq!(scenery.flyers, flyers);
        assert_eq!(scenery.time_ms, 0.0);
    }

    #[test]
    fn test_clouds_drift_left_and_birds_right() {
        let t = Tuning::default();
        let mut rng = create_test_rng();
        let mut scenery = Scenery::new(&t, &mut rng);
        for c in &mut scenery.clouds {
            c.x = 400.0;
        }
        for f in &mut scenery.flyers {
            f.x = 400.0;
        }
        scenery.advance(RoundState::Running, 0.1, &t, &mut rng);
        // 0.1 s is six frames of 180 * 0.5 push.
        for c in &scenery.clouds {
            let moved = 400.0 - c.x;
            assert!(moved > 0.0);
            assert!((moved - 540.0 * c.speed).abs() < 1e-9);
        }
        assert!(scenery.flyers.iter().all(|f| f.x > 400.0));
    }

    #[test]
    fn test_cloud_wraps_to_right_edge() {
        let t = Tuning::default();
        let mut rng = create_test_rng();
        let mut scenery = Scenery::new(&t, &mut rng);
        let w = scenery.clouds[0].width();
        scenery.clouds[0].x = -w / 2.0;
        scenery.advance(RoundState::Running, 1.0 / 60.0, &t, &mut rng);
        let c = &scenery.clouds[0];
        assert_eq!(c.x, 800.0 + w / 2.0);
        assert!((30.0..100.0).contains(&c.y));
    }

    #[test]
    fn test_bird_wraps_to_left_edge_at_new_height() {
        let t = Tuning::default();
        let mut rng = create_test_rng();
        let mut scenery = Scenery::new(&t, &mut rng);
        let w = scenery.flyers[0].width();
        scenery.flyers[0].x = 800.0 + w / 2.0;
        scenery.advance(RoundState::Running, 1.0 / 60.0, &t, &mut rng);
        let f = &scenery.flyers[0];
        assert_eq!(f.x, -w / 2.0);
        assert!((120.0..420.0).contains(&f.base_y));
    }

    #[test]
    fn test_reset_rebuilds_backdrop() {
        let t = Tuning::default();
        let mut rng = create_test_rng();
        let mut scenery = Scenery::new(&t, &mut rng);
        for _ in 0..100 {
            scenery.advance(RoundState::Running, 0.05, &t, &mut rng);
        }
        let before = scenery.clone();
        scenery.reset(&t, &mut rng);
        assert_eq!(scenery.time_ms, 0.0);
        assert_eq!(scenery.scroll, before.scroll);
        assert_ne!(scenery.clouds, before.clouds);
        assert_eq!(scenery.flyers.len(), 4);
    }

    #[test]
    fn test_wing_frame_alternates() {
        let t = Tuning::default();
        let mut scenery = Scenery::new(&t, &mut create_test_rng());
        assert_eq!(scenery.wing_frame(), 0);
        scenery.time_ms = 450.0;
        assert_eq!(scenery.wing_frame(), 1);
        scenery.time_ms = 610.0;
        assert_eq!(scenery.wing_frame(), 0);
    }
}
