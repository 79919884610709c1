use serde::Serialize;

use crate::core::{board::Board, piece::Piece};

/// Points for clearing 0 to 4 lines at once, before the level multiplier.
pub const LINE_CLEAR_SCORES: [u64; 5] = [0, 100, 300, 500, 800];

/// Points per occupied cell when an obstacle piece detonates the board.
pub const OBSTACLE_CELL_BONUS: u64 = 10;

/// Returns the points for clearing `lines` rows at `level`.
///
/// More than four lines score like four.
///
/// # Example
///
/// ```
/// use ojatris_engine::line_clear_score;
///
/// assert_eq!(line_clear_score(1, 1), 100);
/// assert_eq!(line_clear_score(4, 3), 2400);
/// assert_eq!(line_clear_score(0, 9), 0);
/// ```
#[must_use]
pub fn line_clear_score(lines: usize, level: u32) -> u64 {
    let base = LINE_CLEAR_SCORES[lines.min(LINE_CLEAR_SCORES.len() - 1)];
    base * u64::from(level)
}

/// What a lock did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum ClearKind {
    /// A standard piece locked and `0..` complete rows were removed.
    Lines(usize),
    /// An obstacle piece locked and wiped the board.
    Detonation { occupied_cells: usize },
}

/// Result of locking one piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockResult {
    pub board: Board,
    pub locked: Piece,
    pub clear: ClearKind,
    pub points: u64,
}

impl LockResult {
    /// Rows removed by this lock. Always zero for a detonation.
    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        match self.clear {
            ClearKind::Lines(lines) => lines,
            ClearKind::Detonation { .. } => 0,
        }
    }
}

/// Merges `piece` into `board` and resolves the consequences.
///
/// - Obstacle piece: every occupied cell after the merge is worth
///   [`OBSTACLE_CELL_BONUS`] points and the board is emptied.
/// - Standard piece: complete rows without obstacle cells are removed and
///   scored with [`line_clear_score`].
///
/// The input board is left untouched.
///
/// # Example
///
/// ```
/// use ojatris_engine::{Board, ClearKind, Piece, PieceKind, lock_piece};
///
/// let piece = Piece::new(PieceKind::Obstacle).simulate_drop_position(&Board::EMPTY);
/// let result = lock_piece(&Board::EMPTY, &piece, 1);
/// assert_eq!(result.clear, ClearKind::Detonation { occupied_cells: 4 });
/// assert_eq!(result.points, 40);
/// assert!(result.board.is_empty());
/// ```
#[must_use]
pub fn lock_piece(board: &Board, piece: &Piece, level: u32) -> LockResult {
    let mut merged = board.clone();
    merged.fill_piece(piece);

    if piece.is_obstacle() {
        let occupied_cells = merged.occupied_count();
        return LockResult {
            board: Board::EMPTY,
            locked: *piece,
            clear: ClearKind::Detonation { occupied_cells },
            points: occupied_cells as u64 * OBSTACLE_CELL_BONUS,
        };
    }

    let lines = merged.clear_lines();
    LockResult {
        board: merged,
        locked: *piece,
        clear: ClearKind::Lines(lines),
        points: line_clear_score(lines, level),
    }
}
