use std::fmt;

use serde::{Deserialize, Serialize};

use super::piece::{Offset, Piece, PieceKind};

const WIDTH: usize = 10;
const HEIGHT: usize = 20;

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a locked piece of the given kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Returns whether the cell was left by an obstacle piece.
    #[must_use]
    pub fn is_obstacle(self) -> bool {
        self == Block::Piece(PieceKind::Obstacle)
    }

    /// `.` for empty cells, the piece kind character otherwise.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
        }
    }

    /// Inverse of [`Self::as_char`]. `#` is accepted as a filled cell and
    /// stored as an I-piece block.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Block::Empty),
            '#' => Some(Block::Piece(PieceKind::I)),
            _ => PieceKind::from_char(c).map(Block::Piece),
        }
    }
}

/// One row of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardRow {
    cells: [Block; WIDTH],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [Block::Empty; WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[Block; WIDTH] {
        &self.cells
    }

    /// Returns whether every cell is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }

    /// Returns whether any cell holds an obstacle block.
    #[must_use]
    pub fn contains_obstacle(&self) -> bool {
        self.cells.iter().any(|b| b.is_obstacle())
    }

    /// Full rows are cleared unless an obstacle block pins them in place.
    fn is_clearable(&self) -> bool {
        self.is_full() && !self.contains_obstacle()
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|b| !b.is_empty()).count()
    }
}

/// The playing field: a fixed 10×20 grid of [`Block`]s.
///
/// Row 0 is the top of the board and `x` grows to the right. The dimensions
/// never change; line clears shift rows down and insert empty rows at the top.
///
/// [`Board::collides`] is the single collision predicate used for movement,
/// rotation, spawning and game-over detection.
///
/// # Example
///
/// ```
/// use ojatris_engine::{Board, Offset, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::O);
/// assert!(!board.collides(&piece, Offset::ZERO));
/// assert!(board.collides(&piece, Offset::new(0, -1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [BoardRow; HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = WIDTH;
    pub const HEIGHT: usize = HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; HEIGHT],
    };

    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &BoardRow {
        &self.rows[y]
    }

    /// Returns the cell at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn block_at(&self, x: i32, y: i32) -> Option<Block> {
        let (x, y) = cell_index(x, y)?;
        Some(self.rows[y].cells[x])
    }

    /// Overwrites the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the board.
    pub fn set_block(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y].cells[x] = block;
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].is_full()
    }

    #[must_use]
    pub fn row_contains_obstacle(&self, y: usize) -> bool {
        self.rows[y].contains_obstacle()
    }

    /// Number of occupied cells on the whole board.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows().map(BoardRow::occupied_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Checks whether `piece`, shifted by `offset`, leaves the board or
    /// overlaps an occupied cell.
    #[must_use]
    pub fn collides(&self, piece: &Piece, offset: Offset) -> bool {
        piece
            .occupied_positions_at(offset)
            .any(|(x, y)| self.block_at(x, y).is_none_or(|b| !b.is_empty()))
    }

    /// Checks whether `piece` collides at its current position.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        self.collides(piece, Offset::ZERO)
    }

    /// Locks a piece onto the board, tagging its cells with the piece kind.
    ///
    /// Cells that fall outside the board are dropped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let block = Block::Piece(piece.kind());
        for (x, y) in piece.occupied_positions() {
            if let Some((x, y)) = cell_index(x, y) {
                self.rows[y].cells[x] = block;
            }
        }
    }

    /// Clears completed lines and returns the number of lines cleared.
    ///
    /// A line is completed when every cell is occupied and none of them is an
    /// obstacle block. Remaining rows shift down and empty rows fill the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..HEIGHT).rev() {
            if self.rows[y].is_clearable() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }

    /// Like [`Self::clear_lines`], but returns the result as a new board.
    ///
    /// When nothing is cleared the returned board equals `self`.
    #[must_use]
    pub fn clear_completed_rows(&self) -> (Self, usize) {
        let mut board = self.clone();
        let count = board.clear_lines();
        (board, count)
    }

    /// Creates a `Board` from ASCII art for testing.
    ///
    /// Each line is one row, top to bottom. `.` is empty, `#` is a filled
    /// cell, and piece characters (`I`, `T`, `X`, ...) are cells of that kind.
    /// Whitespace is ignored. When fewer than 20 rows are given they are
    /// aligned to the bottom of the board.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly 10 cells, if there are more than
    /// 20 rows, or on an unknown character.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= HEIGHT,
            "board must have at most {HEIGHT} rows, got {}",
            lines.len()
        );

        let mut board = Self::EMPTY;
        let top = HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<Block> = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| Block::from_char(c).unwrap_or_else(|| panic!("unknown cell '{c}'")))
                .collect();
            assert_eq!(
                cells.len(),
                WIDTH,
                "each row must have exactly {WIDTH} cells, got {} at row {i}",
                cells.len()
            );
            board.rows[top + i].cells.copy_from_slice(&cells);
        }
        board
    }
}

fn cell_index(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok().filter(|&x| x < WIDTH)?;
    let y = usize::try_from(y).ok().filter(|&y| y < HEIGHT)?;
    Some((x, y))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row.cells {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["..........", "....TT....", ...] (one string per row, top first)
        serializer.collect_seq(
            self.rows()
                .map(|row| row.cells.iter().map(|b| b.as_char()).collect::<String>()),
        )
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let lines = Vec::<String>::deserialize(deserializer)?;
        if lines.len() != HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {HEIGHT} rows, got {}",
                lines.len()
            )));
        }

        let mut board = Self::EMPTY;
        for (y, line) in lines.iter().enumerate() {
            let mut x = 0;
            for c in line.chars() {
                let block = Block::from_char(c).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid cell '{c}' at row {y}"))
                })?;
                if x >= WIDTH {
                    return Err(serde::de::Error::custom(format!(
                        "row {y} is longer than {WIDTH} cells"
                    )));
                }
                board.rows[y].cells[x] = block;
                x += 1;
            }
            if x != WIDTH {
                return Err(serde::de::Error::custom(format!(
                    "row {y} has {x} cells, expected {WIDTH}"
                )));
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PiecePosition;

    #[test]
    fn test_initial_board() {
        let board = Board::new();
        assert_eq!(board.rows().count(), HEIGHT);
        for y in 0..HEIGHT {
            assert_eq!(board.row(y).cells().len(), WIDTH);
            assert!(!board.is_row_full(y));
        }
        assert!(board.is_empty());
        assert_eq!(board.block_at(0, 0), Some(Block::Empty));
        assert_eq!(board.block_at(-1, 0), None);
        assert_eq!(board.block_at(0, 20), None);
    }

    #[test]
    fn test_set_and_check_cell() {
        let mut board = Board::EMPTY;
        board.set_block(3, 19, Block::Piece(PieceKind::T));
        assert_eq!(board.block_at(3, 19), Some(Block::Piece(PieceKind::T)));
        assert_eq!(board.occupied_count(), 1);

        board.set_block(4, 19, Block::Piece(PieceKind::Obstacle));
        assert!(board.row_contains_obstacle(19));
        assert!(!board.row_contains_obstacle(18));
    }

    #[test]
    fn test_collides_bounds() {
        let board = Board::EMPTY;
        let piece = Piece::new(PieceKind::O).with_position(PiecePosition::new(0, 0));
        assert!(!board.collides(&piece, Offset::ZERO));
        assert!(board.collides(&piece, Offset::new(-1, 0)));
        assert!(board.collides(&piece, Offset::new(0, -1)));
        assert!(!board.collides(&piece, Offset::new(8, 18)));
        assert!(board.collides(&piece, Offset::new(9, 0)));
        assert!(board.collides(&piece, Offset::new(0, 19)));
    }

    #[test]
    fn test_collides_only_checks_filled_cells() {
        // The I-piece's first matrix row is empty, so the anchor may sit one
        // row above the board.
        let board = Board::EMPTY;
        let piece = Piece::new(PieceKind::I).with_position(PiecePosition::new(0, -1));
        assert!(!board.is_colliding(&piece));
        assert!(board.collides(&piece, Offset::new(0, -1)));
    }

    #[test]
    fn test_collides_with_occupied_cell() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(PieceKind::O);
        let (x, y) = piece.occupied_positions().last().unwrap();
        board.set_block(x.try_into().unwrap(), y.try_into().unwrap(), Block::Piece(PieceKind::S));
        assert!(board.is_colliding(&piece));
        assert!(!board.collides(&piece, Offset::new(-2, 0)));
    }

    #[test]
    fn test_fill_piece_tags_cells() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(PieceKind::Obstacle).with_position(PiecePosition::new(4, 18));
        board.fill_piece(&piece);
        assert_eq!(board.occupied_count(), 4);
        assert!(board.row_contains_obstacle(18));
        assert!(board.row_contains_obstacle(19));
        assert_eq!(board.block_at(5, 19), Some(Block::Piece(PieceKind::Obstacle)));
    }

    #[test]
    fn test_clear_lines_basic() {
        let mut board = Board::from_ascii(
            "
            ....T.....
            ##########
            ",
        );
        assert!(board.is_row_full(19));

        let cleared = board.clear_lines();
        assert_eq!(cleared, 1);
        assert_eq!(board.block_at(4, 19), Some(Block::Piece(PieceKind::T)));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_clear_lines_multiple_non_adjacent() {
        let mut board = Board::from_ascii(
            "
            ##########
            #.........
            ##########
            .........#
            ##########
            ",
        );
        let cleared = board.clear_lines();
        assert_eq!(cleared, 3);
        assert_eq!(
            board,
            Board::from_ascii(
                "
                #.........
                .........#
                ",
            )
        );
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut board = Board::EMPTY;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                board.set_block(x, y, Block::Piece(PieceKind::L));
            }
        }
        assert_eq!(board.clear_lines(), HEIGHT);
        assert!(board.is_empty());
    }

    #[test]
    fn test_obstacle_row_is_never_cleared() {
        let board = Board::from_ascii(
            "
            ##########
            ####XX####
            ##########
            ",
        );
        let (cleared_board, cleared) = board.clear_completed_rows();
        assert_eq!(cleared, 2);
        assert_eq!(
            cleared_board,
            Board::from_ascii(
                "
                ####XX####
                ",
            )
        );
    }

    #[test]
    fn test_clear_completed_rows_without_full_rows_returns_equal_board() {
        let board = Board::from_ascii(
            "
            #########.
            ",
        );
        let (cleared_board, cleared) = board.clear_completed_rows();
        assert_eq!(cleared, 0);
        assert_eq!(cleared_board, board);
    }

    #[test]
    fn test_clear_completed_rows_is_idempotent() {
        let board = Board::from_ascii(
            "
            ..T.......
            ##########
            XX##...###
            ##########
            ",
        );
        let (once, first) = board.clear_completed_rows();
        let (twice, second) = once.clear_completed_rows();
        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_board_serialization() {
        let board = Board::from_ascii(
            "
            ....X.....
            IOSZJLTX..
            ",
        );
        let serialized = serde_json::to_value(&board).unwrap();
        let rows = serialized.as_array().unwrap();
        assert_eq!(rows.len(), HEIGHT);
        assert_eq!(rows[19], "IOSZJLTX..");
        assert_eq!(rows[0], "..........");

        let deserialized: Board = serde_json::from_value(serialized).unwrap();
        assert_eq!(deserialized, board);
    }

    #[test]
    fn test_board_deserialization_errors() {
        assert!(serde_json::from_str::<Board>("[]").is_err());

        let mut rows = vec![".........."; HEIGHT];
        rows[3] = "........";
        assert!(serde_json::from_value::<Board>(serde_json::json!(rows)).is_err());

        rows[3] = "....?.....";
        assert!(serde_json::from_value::<Board>(serde_json::json!(rows)).is_err());
    }

    #[test]
    fn test_display() {
        let board = Board::from_ascii("IIII......");
        let text = board.to_string();
        assert_eq!(text.lines().count(), HEIGHT);
        assert_eq!(text.lines().last(), Some("IIII......"));
    }
}
