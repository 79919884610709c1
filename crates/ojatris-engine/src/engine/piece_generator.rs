use std::{fmt, fmt::Write as _, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    ConfigError,
    core::piece::{Piece, PieceKind},
};

/// Supplies the pieces of a game, one at a time.
///
/// Every piece is returned at its spawn position with rotation state 0. The
/// session keeps a two-piece pipeline (current and next) on top of a source.
pub trait PieceSource {
    fn next_piece(&mut self) -> Piece;
}

/// Random piece generator with an obstacle-block draw.
///
/// Each draw first rolls the obstacle probability (5% by default); on a miss
/// one of the seven standard kinds is picked uniformly. Draws are independent,
/// so the preview ("next") piece follows the same odds.
///
/// # Example
///
/// ```
/// use ojatris_engine::{PieceGenerator, PieceSource as _};
///
/// let mut generator = PieceGenerator::new();
/// let piece = generator.next_piece();
/// assert_eq!(piece.position().y(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    obstacle_probability: f64,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Probability of drawing the obstacle piece unless configured otherwise.
    pub const DEFAULT_OBSTACLE_PROBABILITY: f64 = 0.05;

    /// Creates a generator with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            obstacle_probability: Self::DEFAULT_OBSTACLE_PROBABILITY,
        }
    }

    /// Replaces the obstacle draw probability.
    ///
    /// The probability must lie in `0.0..=1.0`.
    pub fn with_obstacle_probability(mut self, probability: f64) -> Result<Self, ConfigError> {
        self.obstacle_probability = check_obstacle_probability(probability)?;
        Ok(self)
    }

    #[must_use]
    pub fn obstacle_probability(&self) -> f64 {
        self.obstacle_probability
    }

    /// Draws the next piece kind.
    pub fn next_kind(&mut self) -> PieceKind {
        if self.rng.random_bool(self.obstacle_probability) {
            PieceKind::Obstacle
        } else {
            self.rng.random()
        }
    }
}

/// Accepts probabilities in `0.0..=1.0`; NaN is rejected.
pub(crate) fn check_obstacle_probability(probability: f64) -> Result<f64, ConfigError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(ConfigError::ObstacleProbability { value: probability });
    }
    Ok(probability)
}

impl PieceSource for PieceGenerator {
    fn next_piece(&mut self) -> Piece {
        Piece::new(self.next_kind())
    }
}

/// Replays a fixed list of piece kinds, starting over when it runs out.
///
/// Useful for tests and scripted scenarios.
///
/// # Example
///
/// ```
/// use ojatris_engine::{PieceKind, PieceSequence, PieceSource as _};
///
/// let mut sequence = PieceSequence::new([PieceKind::I, PieceKind::Obstacle]);
/// assert_eq!(sequence.next_piece().kind(), PieceKind::I);
/// assert_eq!(sequence.next_piece().kind(), PieceKind::Obstacle);
/// assert_eq!(sequence.next_piece().kind(), PieceKind::I);
/// ```
#[derive(Debug, Clone)]
pub struct PieceSequence {
    kinds: Vec<PieceKind>,
    index: usize,
}

impl PieceSequence {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, index: 0 }
    }
}

impl PieceSource for PieceSequence {
    fn next_piece(&mut self) -> Piece {
        let kind = self.kinds[self.index];
        self.index = (self.index + 1) % self.kinds.len();
        Piece::new(kind)
    }
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator. The same seed always produces the same piece sequence, which
/// makes sessions reproducible for debugging and testing.
///
/// Seeds serialize and parse as 32-character hex strings.
///
/// # Example
///
/// ```
/// use ojatris_engine::{PieceGenerator, PieceSeed, PieceSource as _};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut first = PieceGenerator::with_seed(seed);
/// let mut second = PieceGenerator::with_seed(seed);
/// assert_eq!(first.next_piece(), second.next_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

/// Error returned when a seed is not a 32-character hex string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {input}")]
pub struct ParseSeedError {
    #[error(not(source))]
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                input: s.to_owned(),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError {
            input: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_deterministic_piece_generation() {
        let mut generator1 = PieceGenerator::with_seed(SEED);
        let mut generator2 = PieceGenerator::with_seed(SEED);
        for _ in 0..100 {
            assert_eq!(generator1.next_piece(), generator2.next_piece());
        }
    }

    #[test]
    fn test_pieces_spawn_at_spawn_position() {
        let mut generator = PieceGenerator::with_seed(SEED);
        for _ in 0..100 {
            let piece = generator.next_piece();
            assert_eq!(piece, Piece::new(piece.kind()));
        }
    }

    #[test]
    fn test_obstacle_probability_extremes() {
        let mut always = PieceGenerator::with_seed(SEED)
            .with_obstacle_probability(1.0)
            .unwrap();
        assert_eq!(always.obstacle_probability(), 1.0);
        assert!((0..50).all(|_| always.next_kind().is_obstacle()));

        let mut never = PieceGenerator::with_seed(SEED)
            .with_obstacle_probability(0.0)
            .unwrap();
        assert!((0..500).all(|_| !never.next_kind().is_obstacle()));
    }

    #[test]
    fn test_invalid_obstacle_probability() {
        assert!(matches!(
            PieceGenerator::new().with_obstacle_probability(1.5),
            Err(ConfigError::ObstacleProbability { .. })
        ));
        assert!(PieceGenerator::new().with_obstacle_probability(-0.1).is_err());
        assert!(PieceGenerator::new().with_obstacle_probability(f64::NAN).is_err());
        assert_eq!(
            PieceGenerator::new().obstacle_probability(),
            PieceGenerator::DEFAULT_OBSTACLE_PROBABILITY
        );
    }

    #[test]
    fn test_default_distribution_draws_every_kind() {
        let mut generator = PieceGenerator::with_seed(SEED);
        let mut seen = [0usize; PieceKind::LEN];
        for _ in 0..2000 {
            seen[generator.next_kind() as usize] += 1;
        }
        assert!(seen.iter().all(|&count| count > 0), "{seen:?}");
        // 5% of 2000 is 100; allow generous slack.
        let obstacles = seen[PieceKind::Obstacle as usize];
        assert!((40..=180).contains(&obstacles), "{obstacles}");
    }

    #[test]
    fn test_sequence_cycles() {
        let mut sequence = PieceSequence::new([PieceKind::T, PieceKind::O]);
        let kinds: Vec<_> = (0..5).map(|_| sequence.next_piece().kind()).collect();
        assert_eq!(
            kinds,
            [PieceKind::T, PieceKind::O, PieceKind::T, PieceKind::O, PieceKind::T]
        );
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_errors() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
            ] {
                let json = format!("\"{input}\"");
                let err = serde_json::from_str::<PieceSeed>(&json).unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{err}");
            }
        }

        #[test]
        fn test_same_seed_same_sequence_after_roundtrip() {
            let original: PieceSeed = rand::rng().random();
            let restored: PieceSeed =
                serde_json::from_str(&serde_json::to_string(&original).unwrap()).unwrap();

            let mut generator1 = PieceGenerator::with_seed(original);
            let mut generator2 = PieceGenerator::with_seed(restored);
            for _ in 0..20 {
                assert_eq!(generator1.next_kind(), generator2.next_kind());
            }
        }
    }
}
