//! Rules engine for a falling-block puzzle game with an obstacle block variant.
//!
//! - [`core`]: board, pieces, rotation and wall kicks
//! - [`engine`]: piece generation, locking and scoring, and the session state machine

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

/// Returned when a newly promoted piece overlaps the board at its spawn position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("new piece collides at spawn position")]
pub struct SpawnBlockedError;

/// Rejection of a session command.
///
/// Rejected commands leave the session unchanged, so callers may ignore them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum SessionError {
    #[display("session is not running")]
    NotRunning,
    #[display("{_0}")]
    Collision(PieceCollisionError),
}

impl From<PieceCollisionError> for SessionError {
    fn from(err: PieceCollisionError) -> Self {
        SessionError::Collision(err)
    }
}

/// Invalid session configuration value.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("obstacle probability must be within 0.0..=1.0, got {value}")]
    ObstacleProbability { value: f64 },
    #[display("gravity interval must be positive, got {value} ms")]
    GravityInterval { value: u64 },
    #[display("minimum gravity interval ({min} ms) exceeds base interval ({base} ms)")]
    GravityBounds { min: u64, base: u64 },
    #[display("gravity growth factor must be finite and at least 1.0, got {value}")]
    GravityGrowth { value: f64 },
}
