use ojatris_engine::{Board, GameSession, PieceSource, SessionCommand};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Chance of soft dropping instead of hard dropping once a piece is in place.
const SOFT_DROP_PROBABILITY: f64 = 0.25;

/// Placement target for the current falling piece.
#[derive(Debug, Clone, Copy)]
struct Plan {
    piece_index: u64,
    remaining_turns: usize,
    target_x: i32,
    abandoned: bool,
}

/// Random input policy for headless games.
///
/// For every new piece it picks one of the reachable rotations and a target
/// column, then issues rotate and move commands toward that target before
/// dropping. A rejected command abandons the plan and the piece is hard dropped.
#[derive(Debug, Clone)]
pub(crate) struct RandomPolicy {
    rng: Pcg32,
    plan: Option<Plan>,
}

impl RandomPolicy {
    pub(crate) fn new<R>(rng: &mut R) -> Self
    where
        R: Rng,
    {
        Self {
            rng: Pcg32::from_rng(rng),
            plan: None,
        }
    }

    pub(crate) fn next_command<S>(&mut self, session: &GameSession<S>) -> SessionCommand
    where
        S: PieceSource,
    {
        let piece_index = session.stats().completed_pieces();
        if self.plan.is_none_or(|plan| plan.piece_index != piece_index) {
            self.plan = Some(self.make_plan(session, piece_index));
        }
        let Some(plan) = &mut self.plan else {
            return SessionCommand::HardDrop;
        };

        if plan.abandoned {
            return SessionCommand::HardDrop;
        }
        if plan.remaining_turns > 0 {
            plan.remaining_turns -= 1;
            return SessionCommand::RotateClockwise;
        }
        let x = session.falling_piece().position().x();
        match x.cmp(&plan.target_x) {
            std::cmp::Ordering::Less => SessionCommand::MoveRight,
            std::cmp::Ordering::Greater => SessionCommand::MoveLeft,
            std::cmp::Ordering::Equal if self.rng.random_bool(SOFT_DROP_PROBABILITY) => {
                SessionCommand::SoftDrop
            }
            std::cmp::Ordering::Equal => SessionCommand::HardDrop,
        }
    }

    /// Marks the last command as rejected by the session.
    pub(crate) fn reject(&mut self) {
        if let Some(plan) = &mut self.plan {
            plan.abandoned = true;
        }
    }

    fn make_plan<S>(&mut self, session: &GameSession<S>, piece_index: u64) -> Plan
    where
        S: PieceSource,
    {
        let piece = session.falling_piece();
        let rotations = piece.super_rotations(session.field().board()).len();
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let width = Board::WIDTH as i32;
        Plan {
            piece_index,
            remaining_turns: self.rng.random_range(0..rotations),
            target_x: self.rng.random_range(-1..width),
            abandoned: false,
        }
    }
}
