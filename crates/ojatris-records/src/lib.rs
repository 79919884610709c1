//! Score persistence for finished games.
//!
//! The engine reports a [`FinalScore`](ojatris_engine::FinalScore) when a game
//! ends; this crate turns it into a [`GameRecord`] and keeps:
//!
//! - [`PlayerHistory`]: the latest games of each player, newest first
//! - [`Leaderboard`]: each player's best score, ranked
//!
//! Storage goes through the [`RecordStore`] trait. [`MemoryStore`] is the
//! in-process implementation, and [`record_game_over`] writes to any store
//! without letting its failures reach the game.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use ojatris_engine::FinalScore;
//! use ojatris_records::{GameRecord, MemoryStore, PlayerId, record_game_over};
//!
//! let mut store = MemoryStore::new();
//! let final_score = FinalScore { score: 1200, level: 2, lines: 8 };
//! let record = GameRecord::from_final_score(PlayerId::from("42"), "alice", final_score, Utc::now());
//!
//! assert!(record_game_over(&mut store, &record));
//! assert_eq!(store.rank_of(&PlayerId::from("42")), Some(1));
//! ```

pub use self::{history::*, leaderboard::*, record::*, store::*};

mod history;
mod leaderboard;
mod record;
mod store;
