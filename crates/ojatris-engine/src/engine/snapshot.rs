use serde::Serialize;

use crate::core::{
    board::Board,
    piece::{Piece, PieceKind, PiecePosition, PieceRotation, ShapeMatrix},
};

use super::game_session::SessionState;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub board: Board,
    /// Falling piece; absent before the first start and after game over.
    pub current: Option<PieceSnapshot>,
    /// Absent before the first start.
    pub next: Option<PieceSnapshot>,
    /// Landing position of the falling piece, absent whenever `current` is.
    pub ghost: Option<PiecePosition>,
    pub score: u64,
    pub level: u32,
    pub lines: u64,
    pub gravity_interval_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub color: &'static str,
    pub shape: ShapeMatrix,
    pub position: PiecePosition,
    pub rotation: PieceRotation,
}

impl From<Piece> for PieceSnapshot {
    fn from(piece: Piece) -> Self {
        Self {
            kind: piece.kind(),
            color: piece.kind().color(),
            shape: piece.shape(),
            position: piece.position(),
            rotation: piece.rotation(),
        }
    }
}

/// Final counters reported when a game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub score: u64,
    pub level: u32,
    pub lines: u64,
}
