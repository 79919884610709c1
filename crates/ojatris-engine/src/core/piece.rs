use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize, Serializer};

use super::{
    board::Board,
    kick_table::{KickTable, RotationTransition},
};

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const BOARD_CENTER_X: i32 = (Board::WIDTH / 2) as i32;

/// Spawn column of the obstacle piece.
const OBSTACLE_SPAWN_X: i32 = BOARD_CENTER_X - 1;

/// A falling piece with its shape, position and rotation state.
///
/// Pieces are immutable values: movement and rotation return new `Piece`
/// instances, and nothing is validated until the candidate is checked against
/// a [`Board`].
///
/// The shape matrix is carried alongside the rotation state. For standard
/// pieces the matrix always equals the spawn shape rotated clockwise
/// `rotation` times; the obstacle piece never rotates.
///
/// # Example
///
/// ```
/// use ojatris_engine::{Board, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.right();
/// assert!(!board.is_colliding(&moved));
///
/// let rotated = moved.super_rotated_clockwise(&board).unwrap();
/// assert_eq!(rotated.rotation().as_char(), 'R');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: ShapeMatrix,
    position: PiecePosition,
    rotation: PieceRotation,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "S#R@4,18")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.as_char(),
            self.position.x,
            self.position.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| {
            serde::de::Error::custom(format!("expected format 'kind#rotation@x,y', got '{s}'"))
        })?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '@' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing ',' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;

        let mut kind_chars = kind_str.chars();
        let (Some(kind_char), None) = (kind_chars.next(), kind_chars.next()) else {
            return Err(serde::de::Error::custom(format!(
                "piece kind must be single character, got '{kind_str}'"
            )));
        };
        let kind = PieceKind::from_char(kind_char)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid piece kind: {kind_char}")))?;

        let mut rotation_chars = rotation_str.chars();
        let rotation = match (rotation_chars.next(), rotation_chars.next()) {
            (Some(c), None) => PieceRotation::from_char(c),
            _ => None,
        }
        .ok_or_else(|| serde::de::Error::custom(format!("invalid rotation: {rotation_str}")))?;
        if kind.is_obstacle() && rotation != PieceRotation::SPAWN {
            return Err(serde::de::Error::custom("obstacle piece cannot be rotated"));
        }

        let x = x_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(Piece {
            kind,
            shape: kind.shape(rotation),
            position: PiecePosition::new(x, y),
            rotation,
        })
    }
}

impl Piece {
    /// Creates a piece at its spawn position with rotation state 0.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.spawn_shape(),
            position: kind.spawn_position(),
            rotation: PieceRotation::SPAWN,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> ShapeMatrix {
        self.shape
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn is_obstacle(&self) -> bool {
        self.kind.is_obstacle()
    }

    /// Returns the same piece moved to `position`.
    #[must_use]
    pub fn with_position(&self, position: PiecePosition) -> Self {
        Self { position, ..*self }
    }

    /// Returns the absolute board coordinates of every filled cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.occupied_positions_at(Offset::ZERO)
    }

    /// Like [`Self::occupied_positions`], but shifted by `offset`.
    pub fn occupied_positions_at(&self, offset: Offset) -> impl Iterator<Item = (i32, i32)> + '_ {
        let origin = self.position.shifted(offset);
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (origin.x + dx, origin.y + dy))
    }

    #[must_use]
    pub fn shifted(&self, offset: Offset) -> Self {
        self.with_position(self.position.shifted(offset))
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(Offset::LEFT)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(Offset::RIGHT)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(Offset::DOWN)
    }

    /// Rotates the shape 90° clockwise in place, without wall kicks.
    ///
    /// The obstacle piece is returned unchanged.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        if self.is_obstacle() {
            return *self;
        }
        Self {
            shape: self.shape.rotated_clockwise(),
            rotation: self.rotation.rotated_clockwise(),
            ..*self
        }
    }

    /// Rotates the shape 90° counterclockwise in place, without wall kicks.
    ///
    /// The obstacle piece is returned unchanged.
    #[must_use]
    pub fn rotated_counter_clockwise(&self) -> Self {
        if self.is_obstacle() {
            return *self;
        }
        Self {
            shape: self.shape.rotated_counter_clockwise(),
            rotation: self.rotation.rotated_counter_clockwise(),
            ..*self
        }
    }

    /// Rotates clockwise, resolving collisions with the piece's kick table.
    ///
    /// Returns `None` when every kick candidate collides, or when the piece is
    /// the obstacle.
    #[must_use]
    pub fn super_rotated_clockwise(&self, board: &Board) -> Option<Self> {
        super_rotation(board, self, self.rotated_clockwise())
    }

    /// Rotates counterclockwise, resolving collisions with the piece's kick table.
    ///
    /// Returns `None` when every kick candidate collides, or when the piece is
    /// the obstacle.
    #[must_use]
    pub fn super_rotated_counter_clockwise(&self, board: &Board) -> Option<Self> {
        super_rotation(board, self, self.rotated_counter_clockwise())
    }

    /// Returns the piece itself followed by every orientation reachable by
    /// repeated clockwise super rotations.
    #[must_use]
    pub fn super_rotations(&self, board: &Board) -> ArrayVec<Self, 4> {
        let mut rotations = ArrayVec::new();
        rotations.push(*self);
        if self.is_obstacle() {
            return rotations;
        }
        let mut prev = *self;
        for _ in 0..3 {
            let Some(piece) = prev.super_rotated_clockwise(board) else {
                break;
            };
            rotations.push(piece);
            prev = piece;
        }
        rotations
    }

    /// Returns the lowest position reachable by moving straight down.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while !board.collides(&dropped, Offset::DOWN) {
            dropped = dropped.down();
        }
        dropped
    }
}

/// Tries each kick offset for the `from -> to` transition in order.
///
/// The first candidate that does not collide wins. Pieces without a kick
/// table (the obstacle) cannot rotate at all.
fn super_rotation(board: &Board, from: &Piece, rotated: Piece) -> Option<Piece> {
    let table = from.kind.kick_table()?;
    let transition = RotationTransition::new(from.rotation, rotated.rotation);
    table
        .offsets(transition)
        .iter()
        .find(|offset| !board.collides(&rotated, **offset))
        .map(|offset| rotated.shifted(*offset))
}

/// Signed displacement applied to a piece position.
///
/// `dy` grows downward, matching board rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Self = Self::new(0, 0);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const DOWN: Self = Self::new(0, 1);

    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Top-left anchor of a piece's shape matrix on the board.
///
/// Coordinates are signed: wall kicks may move the anchor past the board edge
/// as long as every filled cell stays inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(self, offset: Offset) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy)
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `R`: 90° clockwise
/// - `2`: 180°
/// - `L`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);
    pub const RIGHT: Self = Self(1);
    pub const REVERSE: Self = Self(2);
    pub const LEFT: Self = Self(3);

    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_counter_clockwise(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    /// Number of clockwise quarter turns from the spawn orientation.
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self.0 {
            0 => '0',
            1 => 'R',
            2 => '2',
            _ => 'L',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::SPAWN),
            'R' => Some(Self::RIGHT),
            '2' => Some(Self::REVERSE),
            'L' => Some(Self::LEFT),
            _ => None,
        }
    }
}

/// Identity of a piece: one of the seven tetrominoes, or the obstacle block.
///
/// The obstacle is a fixed 2×2 block that never rotates. Locking it detonates
/// the board instead of clearing lines, and rows holding its cells resist
/// line clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::IsVariant)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
    /// Non-rotatable 2×2 obstacle block.
    Obstacle = 7,
}

/// Samples one of the seven standard kinds uniformly. Never yields the obstacle.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::STANDARD[rng.random_range(0..PieceKind::STANDARD.len())]
    }
}

impl PieceKind {
    /// Number of piece kinds, obstacle included.
    pub const LEN: usize = 8;

    /// The seven standard tetrominoes.
    pub const STANDARD: [Self; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the shape matrix at rotation state 0.
    #[must_use]
    pub const fn spawn_shape(self) -> ShapeMatrix {
        SPAWN_SHAPES[self as usize]
    }

    /// Returns the shape matrix for the given rotation state.
    #[must_use]
    pub const fn shape(self, rotation: PieceRotation) -> ShapeMatrix {
        let mut shape = self.spawn_shape();
        if matches!(self, PieceKind::Obstacle) {
            return shape;
        }
        let mut i = 0;
        while i < rotation.quarter_turns() {
            shape = shape.rotated_clockwise();
            i += 1;
        }
        shape
    }

    /// Returns the anchor at which a fresh piece of this kind appears.
    ///
    /// Standard pieces are centered horizontally on the board, the obstacle
    /// uses a fixed column. Both start at the top row.
    #[must_use]
    pub fn spawn_position(self) -> PiecePosition {
        let x = match self {
            PieceKind::Obstacle => OBSTACLE_SPAWN_X,
            _ => BOARD_CENTER_X - i32::from(self.spawn_shape().size) / 2,
        };
        PiecePosition::new(x, 0)
    }

    /// Returns the wall kick table used by this kind, or `None` if it cannot rotate.
    #[must_use]
    pub const fn kick_table(self) -> Option<&'static KickTable> {
        match self {
            PieceKind::I => Some(&KickTable::I),
            PieceKind::Obstacle => None,
            _ => Some(&KickTable::STANDARD),
        }
    }

    /// Display color as a `#rrggbb` string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            PieceKind::I => "#00f0f0",
            PieceKind::O => "#f0f000",
            PieceKind::S => "#00f000",
            PieceKind::Z => "#f00000",
            PieceKind::J => "#0000f0",
            PieceKind::L => "#f0a000",
            PieceKind::T => "#a000f0",
            PieceKind::Obstacle => "#808080",
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use ojatris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::Obstacle.as_char(), 'X');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
            PieceKind::Obstacle => 'X',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use ojatris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), Some(PieceKind::Obstacle));
    /// assert_eq!(PieceKind::from_char('?'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            'X' => Some(PieceKind::Obstacle),
            _ => None,
        }
    }
}

const MAX_SHAPE_SIZE: usize = 4;

/// Square 0/1 matrix describing which cells of a piece are filled.
///
/// Only the top-left `size × size` region is meaningful; rotation maps that
/// region onto itself, so the size never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Serialize for ShapeMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Rows of 0/1 cells, e.g. [[0,1,0],[1,1,1],[0,0,0]]
        serializer.collect_seq(self.rows().map(|row| {
            row.iter()
                .map(|&filled| u8::from(filled))
                .collect::<Vec<_>>()
        }))
    }
}

impl ShapeMatrix {
    const fn from_rows(size: u8, cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE]) -> Self {
        assert!(size as usize <= MAX_SHAPE_SIZE);
        Self { size, cells }
    }

    /// Side length of the matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        usize::from(self.size)
    }

    /// Returns whether the cell at column `x`, row `y` is filled.
    ///
    /// Cells outside the matrix are reported as empty.
    #[must_use]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.size() && y < self.size() && self.cells[y][x]
    }

    /// Iterates over the matrix rows, each trimmed to `size` cells.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.size()].iter().map(|row| &row[..self.size()])
    }

    /// Iterates over `(x, y)` of every filled cell, row by row.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.size).flat_map(move |y| {
            (0..self.size)
                .filter(move |&x| self.cells[usize::from(y)][usize::from(x)])
                .map(move |x| (i32::from(x), i32::from(y)))
        })
    }

    /// Number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.filled_cells().count()
    }

    /// Rotates the matrix 90° clockwise: `rotated[x][n-1-y] = shape[y][x]`.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        let n = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < n {
            let mut x = 0;
            while x < n {
                cells[x][n - 1 - y] = self.cells[y][x];
                x += 1;
            }
            y += 1;
        }
        Self::from_rows(self.size, cells)
    }

    /// Rotates the matrix 90° counterclockwise as three clockwise turns.
    #[must_use]
    pub const fn rotated_counter_clockwise(self) -> Self {
        self.rotated_clockwise()
            .rotated_clockwise()
            .rotated_clockwise()
    }
}

const SPAWN_SHAPES: [ShapeMatrix; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        ShapeMatrix::from_rows(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        ShapeMatrix::from_rows(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        ShapeMatrix::from_rows(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        ShapeMatrix::from_rows(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        ShapeMatrix::from_rows(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        ShapeMatrix::from_rows(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // T-piece
        ShapeMatrix::from_rows(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // Obstacle
        ShapeMatrix::from_rows(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceKind::S)
            .rotated_clockwise()
            .with_position(PiecePosition::new(4, 18));

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#R@4,18\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_serialization_negative_position() {
        let piece = Piece::new(PieceKind::I)
            .rotated_counter_clockwise()
            .with_position(PiecePosition::new(-1, 3));

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"I#L@-1,3\"");
        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        assert!(serde_json::from_str::<Piece>("\"S0@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#0#4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#0@4\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"Q#0@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#4@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#0@abc,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"X#R@4,0\"").is_err());
    }

    #[test]
    fn test_shape_sizes() {
        assert_eq!(PieceKind::I.spawn_shape().size(), 4);
        assert_eq!(PieceKind::O.spawn_shape().size(), 2);
        assert_eq!(PieceKind::Obstacle.spawn_shape().size(), 2);
        for kind in [PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L, PieceKind::T] {
            assert_eq!(kind.spawn_shape().size(), 3, "{kind:?}");
        }
        for kind in PieceKind::STANDARD {
            assert_eq!(kind.spawn_shape().filled_count(), 4, "{kind:?}");
        }
        assert_eq!(PieceKind::Obstacle.spawn_shape().filled_count(), 4);
    }

    #[test]
    fn test_rotate_clockwise_formula() {
        // T-piece:
        // .T.      .T.
        // TTT  ->  .TT
        // ...      .T.
        let rotated = PieceKind::T.spawn_shape().rotated_clockwise();
        let rows: Vec<Vec<bool>> = rotated.rows().map(<[bool]>::to_vec).collect();
        assert_eq!(
            rows,
            vec![
                vec![false, true, false],
                vec![false, true, true],
                vec![false, true, false],
            ]
        );
        assert!(rotated.is_filled(2, 1));
        assert!(!rotated.is_filled(0, 1));
        assert!(!rotated.is_filled(3, 1));
    }

    #[test]
    fn test_four_clockwise_rotations_restore_shape() {
        for kind in PieceKind::STANDARD {
            let piece = Piece::new(kind);
            let rotated = piece
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(rotated.shape(), piece.shape(), "{kind:?}");
            assert_eq!(rotated.rotation(), PieceRotation::SPAWN);
        }
    }

    #[test]
    fn test_counter_clockwise_matches_three_clockwise() {
        for kind in PieceKind::STANDARD {
            let shape = kind.spawn_shape();
            assert_eq!(
                shape.rotated_counter_clockwise(),
                shape.rotated_clockwise().rotated_clockwise().rotated_clockwise(),
            );
            let piece = Piece::new(kind).rotated_counter_clockwise();
            assert_eq!(piece.rotation(), PieceRotation::LEFT);
            assert_eq!(piece.shape(), kind.shape(PieceRotation::LEFT));
        }
    }

    #[test]
    fn test_obstacle_never_rotates() {
        let piece = Piece::new(PieceKind::Obstacle);
        assert_eq!(piece.rotated_clockwise(), piece);
        assert_eq!(piece.rotated_counter_clockwise(), piece);
        assert!(piece.rotated_clockwise().is_obstacle());
        assert_eq!(piece.super_rotated_clockwise(&Board::EMPTY), None);
        assert_eq!(piece.super_rotations(&Board::EMPTY).len(), 1);
    }

    #[test]
    fn test_spawn_positions() {
        assert_eq!(PieceKind::I.spawn_position(), PiecePosition::new(3, 0));
        assert_eq!(PieceKind::T.spawn_position(), PiecePosition::new(4, 0));
        assert_eq!(PieceKind::O.spawn_position(), PiecePosition::new(4, 0));
        assert_eq!(PieceKind::Obstacle.spawn_position(), PiecePosition::new(4, 0));
        for kind in PieceKind::STANDARD {
            assert_eq!(Piece::new(kind).rotation(), PieceRotation::SPAWN);
        }
    }

    #[test]
    fn test_wall_kick_moves_piece_off_the_wall() {
        // Vertical I hugging the left wall: rotation state R puts the cells
        // in column 2 of the matrix, so anchor x = -2 puts them in column 0.
        let board = Board::EMPTY;
        let piece = Piece::new(PieceKind::I)
            .rotated_clockwise()
            .with_position(PiecePosition::new(-2, 5));
        assert!(!board.is_colliding(&piece));

        // R -> 2 without kicks would leave cells at x = -2 and -1.
        assert!(board.is_colliding(&piece.rotated_clockwise()));

        let rotated = piece.super_rotated_clockwise(&board).unwrap();
        assert_eq!(rotated.rotation(), PieceRotation::REVERSE);
        assert!(!board.is_colliding(&rotated));
        // The I-table R->2 list is (0,0), (-1,0), (2,0): the third one fits.
        assert_eq!(rotated.position(), PiecePosition::new(0, 5));
    }

    #[test]
    fn test_standard_kicks_at_both_walls() {
        let board = Board::EMPTY;

        // T in state R hugging the left wall: cells in matrix columns 1 and 2.
        let piece = Piece::new(PieceKind::T)
            .rotated_clockwise()
            .with_position(PiecePosition::new(-1, 5));
        assert!(!board.is_colliding(&piece));
        assert!(board.is_colliding(&piece.rotated_clockwise()));
        // R->2 tries (0,0) then (1,0).
        let rotated = piece.super_rotated_clockwise(&board).unwrap();
        assert_eq!(rotated.rotation(), PieceRotation::REVERSE);
        assert_eq!(rotated.position(), PiecePosition::new(0, 5));

        // T in state L hugging the right wall: cells in matrix columns 0 and 1.
        let piece = Piece::new(PieceKind::T)
            .rotated_counter_clockwise()
            .with_position(PiecePosition::new(8, 5));
        assert!(!board.is_colliding(&piece));
        // L->2 tries (0,0) then (-1,0).
        let rotated = piece.super_rotated_counter_clockwise(&board).unwrap();
        assert_eq!(rotated.rotation(), PieceRotation::REVERSE);
        assert_eq!(rotated.position(), PiecePosition::new(7, 5));
    }

    #[test]
    fn test_standard_kick_can_lift_piece() {
        // J in state 0 resting on the floor of a well. The first three 0->R
        // candidates poke through the floor, so (0, -2) lifts the piece.
        let board = Board::from_ascii(
            "
            ##...#####
            ##...#####
            ",
        );
        let piece = Piece::new(PieceKind::J).with_position(PiecePosition::new(2, 18));
        assert!(!board.is_colliding(&piece));
        let rotated = piece.super_rotated_clockwise(&board).unwrap();
        assert_eq!(rotated.rotation(), PieceRotation::RIGHT);
        assert!(!board.is_colliding(&rotated));
        assert_eq!(rotated.position(), PiecePosition::new(2, 16));
    }

    #[test]
    fn test_rejected_rotation_keeps_state() {
        // T-piece buried in a one-wide shaft cannot rotate anywhere.
        let board = Board::from_ascii(
            "
            ##########
            ##########
            ####.#####
            ###...####
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ",
        );
        let piece = Piece::new(PieceKind::T).with_position(PiecePosition::new(3, 2));
        assert!(!board.is_colliding(&piece));
        assert_eq!(piece.super_rotated_clockwise(&board), None);
        assert_eq!(piece.super_rotated_counter_clockwise(&board), None);
    }

    #[test]
    fn test_simulate_drop_position() {
        let piece = Piece::new(PieceKind::O);
        let dropped = piece.simulate_drop_position(&Board::EMPTY);
        assert_eq!(dropped.position(), PiecePosition::new(4, 18));
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::STANDARD.into_iter().chain([PieceKind::Obstacle]) {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }
}
