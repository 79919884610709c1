use serde::{Deserialize, Serialize};

use super::lock::{ClearKind, LockResult};

/// Score needed per level.
pub const SCORE_PER_LEVEL: u64 = 1000;

/// Game statistics tracking score, level, lines and piece counts.
///
/// - **Score**: line clear points (scaled by level) plus obstacle detonation bonuses
/// - **Level**: starts at 1, `score / 1000 + 1`, and never decreases
/// - **Lines**: total rows removed by line clears
/// - **Counters**: locked pieces, line clears by size, obstacle detonations
///
/// # Example
///
/// ```
/// use ojatris_engine::{Board, GameStats, Piece, PieceKind, lock_piece};
///
/// let mut stats = GameStats::new();
/// let piece = Piece::new(PieceKind::O).simulate_drop_position(&Board::EMPTY);
/// let result = lock_piece(&Board::EMPTY, &piece, stats.level());
/// stats.apply_lock(&result);
///
/// assert_eq!(stats.score(), 0);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.completed_pieces(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    level: u32,
    total_cleared_lines: u64,
    completed_pieces: u64,
    line_cleared_counter: [u64; 5],
    detonations: u64,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            total_cleared_lines: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
            detonations: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Current level, always at least 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> u64 {
        self.total_cleared_lines
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    /// Returns a histogram of standard locks by lines cleared.
    ///
    /// Index `n` counts locks that cleared `n` lines; clears of more than
    /// four lines are counted in the last slot. Obstacle locks are counted
    /// separately by [`Self::detonations`].
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u64; 5] {
        &self.line_cleared_counter
    }

    /// Returns the number of obstacle pieces locked.
    #[must_use]
    pub const fn detonations(&self) -> u64 {
        self.detonations
    }

    /// Updates statistics after a piece lock.
    ///
    /// Returns `true` when the level went up.
    pub fn apply_lock(&mut self, result: &LockResult) -> bool {
        self.completed_pieces += 1;
        match result.clear {
            ClearKind::Lines(lines) => {
                self.total_cleared_lines += lines as u64;
                let slot = lines.min(self.line_cleared_counter.len() - 1);
                self.line_cleared_counter[slot] += 1;
            }
            ClearKind::Detonation { .. } => self.detonations += 1,
        }
        self.score = self.score.saturating_add(result.points);

        let level = level_for_score(self.score).max(self.level);
        let changed = level != self.level;
        self.level = level;
        changed
    }
}

/// Returns the level reached with `score` points.
#[must_use]
pub fn level_for_score(score: u64) -> u32 {
    u32::try_from(score / SCORE_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        board::Board,
        piece::{Piece, PieceKind},
    };

    fn lock_result(clear: ClearKind, points: u64) -> LockResult {
        LockResult {
            board: Board::EMPTY,
            locked: Piece::new(PieceKind::T),
            clear,
            points,
        }
    }

    #[test]
    fn test_initial_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.completed_pieces(), 0);
    }

    #[test]
    fn test_level_follows_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(999), 1);
        assert_eq!(level_for_score(1000), 2);
        assert_eq!(level_for_score(12_345), 13);
        assert_eq!(level_for_score(u64::MAX), u32::MAX);
    }

    #[test]
    fn test_apply_lock_accumulates() {
        let mut stats = GameStats::new();
        assert!(!stats.apply_lock(&lock_result(ClearKind::Lines(0), 0)));
        assert!(!stats.apply_lock(&lock_result(ClearKind::Lines(4), 800)));
        assert!(stats.apply_lock(&lock_result(ClearKind::Lines(2), 300)));

        assert_eq!(stats.score(), 1100);
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.total_cleared_lines(), 6);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_detonation_counts_without_lines() {
        let mut stats = GameStats::new();
        let changed = stats.apply_lock(&lock_result(
            ClearKind::Detonation { occupied_cells: 150 },
            1500,
        ));
        assert!(changed);
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.detonations(), 1);
        assert_eq!(stats.line_cleared_counter(), &[0; 5]);
    }

    #[test]
    fn test_level_jumps_several_steps() {
        let mut stats = GameStats::new();
        stats.apply_lock(&lock_result(ClearKind::Lines(4), 3200));
        assert_eq!(stats.level(), 4);
    }
}
