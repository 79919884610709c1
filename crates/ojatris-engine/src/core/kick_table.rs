use super::piece::{Offset, PieceRotation};

/// Number of candidate offsets tried per rotation.
pub const KICK_TESTS: usize = 5;

const IN_PLACE: &[Offset] = &[Offset::ZERO];

/// A rotation state change, e.g. `0 -> R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationTransition {
    pub from: PieceRotation,
    pub to: PieceRotation,
}

impl RotationTransition {
    #[must_use]
    pub const fn new(from: PieceRotation, to: PieceRotation) -> Self {
        Self { from, to }
    }
}

/// Ordered kick candidates for one rotation transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KickEntry {
    pub transition: RotationTransition,
    pub offsets: [Offset; KICK_TESTS],
}

/// Wall kick lookup table in the style of the Super Rotation System.
///
/// Each entry maps a rotation transition to [`KICK_TESTS`] offsets, tried in
/// order until the rotated piece fits. Offsets are in board coordinates, so a
/// positive `dy` moves the piece down.
///
/// Transitions missing from the table fall back to a single in-place attempt.
///
/// # Example
///
/// ```
/// use ojatris_engine::{KickTable, Offset, PieceRotation, RotationTransition};
///
/// let transition = RotationTransition::new(PieceRotation::SPAWN, PieceRotation::RIGHT);
/// let offsets = KickTable::STANDARD.offsets(transition);
/// assert_eq!(offsets[0], Offset::ZERO);
/// assert_eq!(offsets[1], Offset::new(-1, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KickTable {
    entries: &'static [KickEntry],
}

impl KickTable {
    /// Table shared by the J, L, S, T, Z and O pieces.
    pub const STANDARD: Self = Self::new(&[
        kick(0, 1, [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]),
        kick(1, 0, [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]),
        kick(1, 2, [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]),
        kick(2, 1, [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]),
        kick(2, 3, [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)]),
        kick(3, 2, [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]),
        kick(3, 0, [(0, 0), (1, 0), (1, 1), (0, -2), (1, 2)]),
        kick(0, 3, [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]),
    ]);

    /// Table for the I piece.
    pub const I: Self = Self::new(&[
        kick(0, 1, [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]),
        kick(1, 0, [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)]),
        kick(1, 2, [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)]),
        kick(2, 1, [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)]),
        kick(2, 3, [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)]),
        kick(3, 2, [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]),
        kick(3, 0, [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)]),
        kick(0, 3, [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)]),
    ]);

    #[must_use]
    pub const fn new(entries: &'static [KickEntry]) -> Self {
        Self { entries }
    }

    /// Returns the candidate offsets for `transition`, in trial order.
    #[must_use]
    pub fn offsets(&self, transition: RotationTransition) -> &'static [Offset] {
        self.entries
            .iter()
            .find(|entry| entry.transition == transition)
            .map_or(IN_PLACE, |entry| &entry.offsets[..])
    }

    pub fn entries(&self) -> impl Iterator<Item = &'static KickEntry> {
        self.entries.iter()
    }
}

const fn kick(from: u8, to: u8, offsets: [(i32, i32); KICK_TESTS]) -> KickEntry {
    let mut kicks = [Offset::ZERO; KICK_TESTS];
    let mut i = 0;
    while i < KICK_TESTS {
        kicks[i] = Offset::new(offsets[i].0, offsets[i].1);
        i += 1;
    }
    KickEntry {
        transition: RotationTransition::new(rotation(from), rotation(to)),
        offsets: kicks,
    }
}

const fn rotation(quarter_turns: u8) -> PieceRotation {
    match quarter_turns {
        0 => PieceRotation::SPAWN,
        1 => PieceRotation::RIGHT,
        2 => PieceRotation::REVERSE,
        3 => PieceRotation::LEFT,
        _ => panic!("rotation state out of range"),
    }
}
