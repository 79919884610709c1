use std::collections::HashMap;

use crate::{
    history::PlayerHistory,
    leaderboard::{Leaderboard, RankedRecord},
    record::{GameRecord, PlayerId},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("record has an empty player id")]
    EmptyPlayerId,
    #[display("record store unavailable: {reason}")]
    Unavailable {
        #[error(not(source))]
        reason: String,
    },
}

/// Destination of finished games.
pub trait RecordStore {
    /// Adds a game to the player's history.
    fn append_history(&mut self, record: &GameRecord) -> Result<(), RecordError>;

    /// Offers a game to the leaderboard.
    ///
    /// Returns `true` when it became the player's new best score.
    fn submit_score(&mut self, record: &GameRecord) -> Result<bool, RecordError>;
}

/// Stores a finished game in both the history and the leaderboard.
///
/// Failures are reported on stderr and never returned: a broken store must
/// not affect the game. Returns `true` when the game set a new personal best.
pub fn record_game_over<S>(store: &mut S, record: &GameRecord) -> bool
where
    S: RecordStore + ?Sized,
{
    if let Err(err) = store.append_history(record) {
        eprintln!("Failed to save game history for {}: {err}", record.player);
    }
    match store.submit_score(record) {
        Ok(updated) => updated,
        Err(err) => {
            eprintln!("Failed to submit score for {}: {err}", record.player);
            false
        }
    }
}

/// In-process [`RecordStore`] keeping everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    histories: HashMap<PlayerId, PlayerHistory>,
    leaderboard: Leaderboard,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Returns up to `limit` leaderboard entries, highest score first.
    #[must_use]
    pub fn top_scores(&self, limit: usize) -> Vec<RankedRecord<'_>> {
        self.leaderboard.top(limit).collect()
    }

    #[must_use]
    pub fn rank_of(&self, player: &PlayerId) -> Option<usize> {
        self.leaderboard.rank_of(player)
    }

    #[must_use]
    pub fn high_score(&self, player: &PlayerId) -> Option<&GameRecord> {
        self.leaderboard.best(player)
    }

    /// Returns the player's recent games, newest first.
    #[must_use]
    pub fn history(&self, player: &PlayerId) -> Option<&PlayerHistory> {
        self.histories.get(player)
    }
}

fn check_player(record: &GameRecord) -> Result<(), RecordError> {
    if record.player.is_empty() {
        return Err(RecordError::EmptyPlayerId);
    }
    Ok(())
}

impl RecordStore for MemoryStore {
    fn append_history(&mut self, record: &GameRecord) -> Result<(), RecordError> {
        check_player(record)?;
        self.histories
            .entry(record.player.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn submit_score(&mut self, record: &GameRecord) -> Result<bool, RecordError> {
        check_player(record)?;
        Ok(self.leaderboard.submit(record))
    }
}
