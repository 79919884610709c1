use crate::{
    PieceCollisionError, SpawnBlockedError,
    core::{board::Board, piece::Piece},
};

use super::{
    lock::{LockResult, lock_piece},
    piece_generator::{PieceGenerator, PieceSource},
};

/// Board plus the current/next piece pipeline.
///
/// The field never holds a colliding falling piece except right after a
/// blocked spawn, which ends the game.
#[derive(Debug, Clone)]
pub struct GameField<S = PieceGenerator> {
    board: Board,
    falling_piece: Piece,
    next_piece: Piece,
    source: S,
}

impl Default for GameField {
    fn default() -> Self {
        Self::new(PieceGenerator::new())
    }
}

impl<S> GameField<S>
where
    S: PieceSource,
{
    /// Creates an empty field and draws the current and next pieces.
    #[must_use]
    pub fn new(mut source: S) -> Self {
        let falling_piece = source.next_piece();
        let next_piece = source.next_piece();
        Self {
            board: Board::EMPTY,
            falling_piece,
            next_piece,
            source,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> Piece {
        self.next_piece
    }

    /// Returns whether the falling piece overlaps the board.
    #[must_use]
    pub fn is_falling_piece_blocked(&self) -> bool {
        self.board.is_colliding(&self.falling_piece)
    }

    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.falling_piece.simulate_drop_position(&self.board)
    }

    /// Empties the board and draws a fresh current/next pair.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.falling_piece = self.source.next_piece();
        self.next_piece = self.source.next_piece();
    }

    /// Locks the falling piece where it is and brings in the next one.
    ///
    /// The next piece becomes the falling piece at its spawn position and a
    /// new next piece is drawn. The lock is always applied; the second
    /// element reports whether the new falling piece collides at spawn.
    pub fn lock_and_advance(
        &mut self,
        level: u32,
    ) -> (LockResult, Result<(), SpawnBlockedError>) {
        let result = lock_piece(&self.board, &self.falling_piece, level);
        self.board = result.board.clone();

        self.falling_piece = Piece::new(self.next_piece.kind());
        self.next_piece = self.source.next_piece();
        if self.is_falling_piece_blocked() {
            return (result, Err(SpawnBlockedError));
        }
        (result, Ok(()))
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
