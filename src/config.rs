//! Game tuning and user configuration.
//!
//! Every gameplay constant lives in [`Tuning`]. The defaults reproduce the
//! classic 800x600 layout; a JSON file may override any subset of them.

use crate::error::{Error, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FLAPPY_DUSK_CONFIG";

const APP_DIR: &str = "flappy-dusk";

/// Gameplay constants, in world units (800x600 field) and seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world_width: f64,
    pub world_height: f64,

    pub bird_x: f64,
    pub bird_start_y: f64,
    /// Vertical velocity set by a flap (negative = up).
    pub flap_velocity: f64,
    /// Velocity added once per simulation step.
    pub gravity: f64,
    pub max_fall_speed: f64,
    pub hitbox_size: f64,

    pub pipe_width: f64,
    /// Full height of the passable opening.
    pub pipe_gap: f64,
    pub pipe_speed: f64,
    pub min_gap_y: f64,
    pub max_gap_y: f64,
    pub min_gap_difference: f64,
    pub pattern_chance: f64,
    pub spawn_distance: f64,
    pub spawn_interval_ms: f64,
    pub collision_buffer: f64,

    /// Top of the grass strip; the bird dies just above it.
    pub grass_top: f64,
    /// Where bottom pipes end.
    pub ground_line: f64,

    pub day_night_step: f64,
    pub day_night_cycle_score: u32,

    /// Fixed simulation rate.
    pub steps_per_second: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            bird_x: 200.0,
            bird_start_y: 300.0,
            flap_velocity: -380.0,
            gravity: 18.0,
            max_fall_speed: 450.0,
            hitbox_size: 28.0,
            pipe_width: 80.0,
            pipe_gap: 150.0,
            pipe_speed: 180.0,
            min_gap_y: 150.0,
            max_gap_y: 450.0,
            min_gap_difference: 100.0,
            pattern_chance: 0.3,
            spawn_distance: 300.0,
            spawn_interval_ms: 1300.0,
            collision_buffer: 4.0,
            grass_top: 510.0,
            ground_line: 570.0,
            day_night_step: 0.0025,
            day_night_cycle_score: 10,
            steps_per_second: 60.0,
        }
    }
}

impl Tuning {
    pub fn step_secs(&self) -> f64 {
        1.0 / self.steps_per_second
    }

    pub fn band_mid(&self) -> f64 {
        (self.min_gap_y + self.max_gap_y) / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("hitbox_size", self.hitbox_size),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("pipe_speed", self.pipe_speed),
            ("spawn_distance", self.spawn_distance),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("day_night_step", self.day_night_step),
            ("steps_per_second", self.steps_per_second),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidTuning(format!("{name} must be positive, got {v}")));
            }
        }
        if self.flap_velocity >= 0.0 {
            return Err(Error::InvalidTuning(format!(
                "flap_velocity must be negative (upward), got {}",
                self.flap_velocity
            )));
        }
        if self.min_gap_y >= self.max_gap_y {
            return Err(Error::InvalidTuning(format!(
                "gap band is empty: {}..={}",
                self.min_gap_y, self.max_gap_y
            )));
        }
        // Uniform sampling draws whole units and must always have somewhere
        // to land, wherever the previous gap sits in the band.
        if self.min_gap_difference * 2.0 > self.max_gap_y.floor() - self.min_gap_y.ceil() {
            return Err(Error::InvalidTuning(format!(
                "min_gap_difference {} too large for band {}..={}",
                self.min_gap_difference, self.min_gap_y, self.max_gap_y
            )));
        }
        if !(0.0..=1.0).contains(&self.pattern_chance) {
            return Err(Error::InvalidTuning(format!(
                "pattern_chance must be in 0..=1, got {}",
                self.pattern_chance
            )));
        }
        if self.day_night_cycle_score == 0 {
            return Err(Error::InvalidTuning("day_night_cycle_score must be > 0".into()));
        }
        if self.grass_top > self.world_height || self.ground_line > self.world_height {
            return Err(Error::InvalidTuning("ground lies below the world".into()));
        }
        Ok(())
    }
}

/// Top-level user configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    pub sound: bool,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    /// Log file; defaults to the platform cache directory.
    pub log_file: Option<PathBuf>,
    pub tuning: Tuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            sound: true,
            log_level: "info".to_string(),
            log_file: None,
            tuning: Tuning::default(),
        }
    }
}

impl Config {
    /// Loads the config from `$FLAPPY_DUSK_CONFIG` or the platform config
    /// directory. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        if let Some(p) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(p));
        }
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.json"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let cfg = Self::parse(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.tuning.validate()?;
        cfg.level_filter()?;
        Ok(cfg)
    }

    pub fn parse(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| Error::InvalidTuning(format!("unknown log_level {:?}", self.log_level)))
    }

    pub fn log_path(&self) -> PathBuf {
        if let Some(p) = &self.log_file {
            return p.clone();
        }
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(std::env::temp_dir)
            .join("flappy-dusk.log")
    }
}
