use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap},
};

use serde::Serialize;

use crate::record::{GameRecord, PlayerId};

/// Number of entries returned by a leaderboard query unless asked otherwise.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// A leaderboard entry together with its 1-based rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedRecord<'a> {
    pub rank: usize,
    #[serde(flatten)]
    pub record: &'a GameRecord,
}

/// Best score per player, ordered by score.
///
/// A player's entry is replaced only by a strictly higher score. Players with
/// equal scores rank in the order their entries were submitted.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use ojatris_records::{GameRecord, Leaderboard, PlayerId};
///
/// let record = |player: &str, score| GameRecord {
///     player: PlayerId::from(player),
///     display_name: player.to_owned(),
///     score,
///     level: 1,
///     lines: 0,
///     recorded_at: Utc::now(),
/// };
///
/// let mut leaderboard = Leaderboard::new();
/// assert!(leaderboard.submit(&record("alice", 300)));
/// assert!(leaderboard.submit(&record("bob", 500)));
/// assert!(!leaderboard.submit(&record("alice", 200)));
///
/// assert_eq!(leaderboard.rank_of(&PlayerId::from("bob")), Some(1));
/// assert_eq!(leaderboard.rank_of(&PlayerId::from("alice")), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    best: HashMap<PlayerId, (u64, GameRecord)>,
    ranking: BTreeSet<(Reverse<u64>, u64, PlayerId)>,
    next_seq: u64,
}

impl Leaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `record` if it beats the player's best score.
    ///
    /// Returns `true` when the leaderboard was updated.
    pub fn submit(&mut self, record: &GameRecord) -> bool {
        if let Some((seq, best)) = self.best.get(&record.player) {
            if record.score <= best.score {
                return false;
            }
            self.ranking
                .remove(&(Reverse(best.score), *seq, record.player.clone()));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.ranking
            .insert((Reverse(record.score), seq, record.player.clone()));
        self.best
            .insert(record.player.clone(), (seq, record.clone()));
        true
    }

    /// Returns up to `limit` entries, highest score first.
    pub fn top(&self, limit: usize) -> impl Iterator<Item = RankedRecord<'_>> {
        self.ranking
            .iter()
            .take(limit)
            .enumerate()
            .filter_map(|(i, (_, _, player))| {
                let (_, record) = self.best.get(player)?;
                Some(RankedRecord { rank: i + 1, record })
            })
    }

    /// Returns the 1-based rank of `player`, or `None` if they have no entry.
    #[must_use]
    pub fn rank_of(&self, player: &PlayerId) -> Option<usize> {
        let (seq, best) = self.best.get(player)?;
        let key = (Reverse(best.score), *seq, player.clone());
        Some(self.ranking.range(..key).count() + 1)
    }

    /// Returns the best record of `player`.
    #[must_use]
    pub fn best(&self, player: &PlayerId) -> Option<&GameRecord> {
        self.best.get(player).map(|(_, record)| record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.best.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}
