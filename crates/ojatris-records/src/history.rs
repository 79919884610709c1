use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::record::GameRecord;

/// Number of games kept per player.
pub const HISTORY_LIMIT: usize = 10;

/// Most recent games of one player, newest first.
///
/// Older entries are dropped once [`HISTORY_LIMIT`] is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerHistory {
    entries: VecDeque<GameRecord>,
}

impl PlayerHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: GameRecord) {
        self.entries.push_front(record);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&GameRecord> {
        self.entries.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;
    use crate::record::PlayerId;

    fn record(score: u64) -> GameRecord {
        GameRecord {
            player: PlayerId::from("p"),
            display_name: "p".to_owned(),
            score,
            level: 1,
            lines: 0,
            recorded_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = PlayerHistory::new();
        history.push(record(1));
        history.push(record(2));
        let scores: Vec<_> = history.iter().map(|r| r.score).collect();
        assert_eq!(scores, [2, 1]);
        assert_eq!(history.latest().map(|r| r.score), Some(2));
    }

    #[test]
    fn test_capped_at_limit() {
        let mut history = PlayerHistory::new();
        for score in 0..15 {
            history.push(record(score));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        let scores: Vec<_> = history.iter().map(|r| r.score).collect();
        assert_eq!(scores, (5..15).rev().collect::<Vec<_>>());
    }
}
