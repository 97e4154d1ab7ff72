//! Fire-and-forget requests from the round to the presentation layer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Hit,
    Celebration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    /// Puff behind the bird on a flap.
    WindBurst,
    /// Trail while rising.
    WindUp,
    /// Trail while falling.
    WindDown,
    /// Every fifth point.
    Confetti,
    /// Bird destroyed.
    Explosion,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Sound(Sound),
    /// `count` particles of `kind` at world position `(x, y)`.
    Burst {
        kind: BurstKind,
        x: f64,
        y: f64,
        count: u32,
    },
}
