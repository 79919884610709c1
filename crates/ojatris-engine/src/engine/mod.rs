//! Game engine logic and state management.
//!
//! This module builds the game rules on top of the core data structures:
//!
//! - [`PieceGenerator`] - Random piece draw with the obstacle block, seeded by [`PieceSeed`]
//! - [`lock_piece`] - Merge, obstacle detonation, line clears and scoring
//! - [`GameField`] - Board plus the current/next piece pipeline
//! - [`GameStats`] - Score, level, lines and per-game counters
//! - [`GravityConfig`] / [`GravityTimer`] - Fall speed curve and the tick handle
//! - [`GameSession`] - Session state machine driven by [`SessionCommand`]s
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] and call [`GameSession::start`]
//! 2. Feed player commands with [`GameSession::apply`] and elapsed time with
//!    [`GameSession::advance`]
//! 3. A piece locks when gravity or a hard drop cannot move it further down
//! 4. Rows are cleared (or the board is wiped by an obstacle) and the next
//!    piece spawns
//! 5. Repeat until the next piece cannot spawn
//!
//! # Example
//!
//! ```
//! use ojatris_engine::{GameSession, PieceSeed, SessionCommand, SessionConfig};
//!
//! let seed = PieceSeed::from_bytes([7; 16]);
//! let mut session = GameSession::with_seed(SessionConfig::DEFAULT, seed).unwrap();
//! session.start();
//!
//! // Rejected commands leave the session unchanged
//! let _ = session.apply(SessionCommand::MoveLeft);
//! let _ = session.apply(SessionCommand::RotateClockwise);
//! session.apply(SessionCommand::HardDrop).unwrap();
//!
//! assert_eq!(session.stats().completed_pieces(), 1);
//! if session.state().is_game_over() {
//!     println!("final: {:?}", session.final_score());
//! }
//! ```

pub use self::{
    config::*, game_field::*, game_session::*, game_stats::*, gravity::*, lock::*,
    piece_generator::*, snapshot::*,
};

mod config;
mod game_field;
mod game_session;
mod game_stats;
mod gravity;
mod lock;
mod piece_generator;
mod snapshot;
