use std::fmt;

use chrono::{DateTime, Utc};
use ojatris_engine::FinalScore;
use serde::{Deserialize, Serialize};

/// Stable identity of a player, used as the key for histories and the leaderboard.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::From,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final result of one game, as stored in histories and on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player: PlayerId,
    pub display_name: String,
    pub score: u64,
    pub level: u32,
    pub lines: u64,
    /// Timestamp when the game ended (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
}

impl GameRecord {
    /// Builds a record from the counters reported by a finished session.
    #[must_use]
    pub fn from_final_score(
        player: PlayerId,
        display_name: impl Into<String>,
        final_score: FinalScore,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            player,
            display_name: display_name.into(),
            score: final_score.score,
            level: final_score.level,
            lines: final_score.lines,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn test_record_serialization() {
        let recorded_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = GameRecord::from_final_score(
            PlayerId::from("1234"),
            "alice",
            FinalScore {
                score: 1500,
                level: 2,
                lines: 9,
            },
            recorded_at,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["player"], "1234");
        assert_eq!(value["display_name"], "alice");
        assert_eq!(value["score"], 1500);
        assert_eq!(value["recorded_at"], "2024-05-01T12:00:00Z");

        let deserialized: GameRecord = serde_json::from_value(value).unwrap();
        assert_eq!(deserialized, record);
    }
}
