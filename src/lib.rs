//! Flappy Dusk: a terminal Flappy Bird with pattern-driven pipe gaps and a
//! day/night cycle that follows the score.
//!
//! The simulation ([`round`], [`spawner`], [`day_night`]) knows nothing about
//! terminals or sound; it queues [`effects::Effect`]s that the front-end
//! ([`render`], [`scenery`], [`particles`], [`audio`]) turns into pixels and samples.

pub mod audio;
pub mod color;
pub mod config;
pub mod day_night;
pub mod effects;
pub mod error;
pub mod logging;
pub mod particles;
pub mod pixels;
pub mod render;
pub mod round;
pub mod scenery;
pub mod spawner;

pub use config::{Config, Tuning};
pub use effects::{BurstKind, Effect, Sound};
pub use error::{Error, Result};
pub use round::{Bird, FailCause, Round, RoundState};
pub use spawner::{GapStrategy, Obstacle, Spawner};
