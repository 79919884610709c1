use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, PieceCollisionError, SessionError,
    core::piece::Piece,
};

use super::{
    config::SessionConfig,
    game_field::GameField,
    game_stats::GameStats,
    gravity::GravityTimer,
    lock::LockResult,
    piece_generator::{PieceGenerator, PieceSeed, PieceSource},
    snapshot::{FinalScore, PieceSnapshot, SessionSnapshot},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum SessionState {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Input accepted by [`GameSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionCommand {
    Start,
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateClockwise,
    RotateCounterClockwise,
    TogglePause,
}

/// One game from start to game over, restartable.
///
/// The session owns the board, the piece pipeline, the counters and the
/// gravity timer. Every operation takes `&mut self` and either applies fully
/// or returns an error without changing anything.
///
/// State transitions:
///
/// - `NotStarted` → `Running` on [`Self::start`]
/// - `Running` ↔ `Paused` on [`Self::pause`] / [`Self::resume`]
/// - `Running` → `GameOver` when a new piece cannot spawn
/// - any state → `Running` on [`Self::start`] (restart)
#[derive(Debug, Clone)]
pub struct GameSession<S = PieceGenerator> {
    config: SessionConfig,
    field: GameField<S>,
    stats: GameStats,
    state: SessionState,
    gravity: Option<GravityTimer>,
    timer_generation: u64,
    running_time: Duration,
}

impl GameSession {
    /// Creates a session with a randomly seeded piece generator.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let generator =
            PieceGenerator::new().with_obstacle_probability(config.obstacle_probability)?;
        Self::with_source(config, generator)
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    pub fn with_seed(config: SessionConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        let generator =
            PieceGenerator::with_seed(seed).with_obstacle_probability(config.obstacle_probability)?;
        Self::with_source(config, generator)
    }
}

impl<S> GameSession<S>
where
    S: PieceSource,
{
    /// Creates a session that draws pieces from `source`.
    ///
    /// `config.obstacle_probability` only affects the built-in generator; a
    /// custom source decides on its own which pieces to hand out.
    pub fn with_source(config: SessionConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            field: GameField::new(source),
            stats: GameStats::new(),
            state: SessionState::NotStarted,
            gravity: None,
            timer_generation: 0,
            running_time: Duration::ZERO,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn field(&self) -> &GameField<S> {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The active gravity timer, present only while running.
    #[must_use]
    pub fn gravity(&self) -> Option<&GravityTimer> {
        self.gravity.as_ref()
    }

    /// Time spent in the running state since the last start.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.running_time
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn next_piece(&self) -> Piece {
        self.field.next_piece()
    }

    /// Where the falling piece would land on a hard drop.
    #[must_use]
    pub fn drop_position(&self) -> Option<Piece> {
        self.has_live_piece()
            .then(|| self.field.simulate_drop_position())
    }

    /// Final counters, available once the game is over.
    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        self.state.is_game_over().then(|| FinalScore {
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let live = self.has_live_piece();
        let started = !self.state.is_not_started();
        SessionSnapshot {
            state: self.state,
            board: self.field.board().clone(),
            current: live.then(|| PieceSnapshot::from(self.field.falling_piece())),
            next: started.then(|| PieceSnapshot::from(self.field.next_piece())),
            ghost: self.drop_position().map(|piece| piece.position()),
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            gravity_interval_ms: duration_millis(self.config.gravity.interval(self.stats.level())),
        }
    }

    /// Starts a new game, discarding any game in progress.
    ///
    /// Goes straight to `GameOver` if the first piece cannot spawn.
    pub fn start(&mut self) {
        self.gravity = None;
        if !self.state.is_not_started() {
            self.field.reset();
        }
        self.stats = GameStats::new();
        self.running_time = Duration::ZERO;

        if self.field.is_falling_piece_blocked() {
            self.state = SessionState::GameOver;
            return;
        }
        self.state = SessionState::Running;
        self.arm_gravity();
    }

    /// Pauses a running session. No-op in any other state.
    pub fn pause(&mut self) {
        if self.state.is_running() {
            self.state = SessionState::Paused;
            self.gravity = None;
        }
    }

    /// Resumes a paused session. No-op in any other state.
    pub fn resume(&mut self) {
        if self.state.is_paused() {
            self.state = SessionState::Running;
            self.arm_gravity();
        }
    }

    pub fn toggle_pause(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            SessionState::NotStarted | SessionState::GameOver => {
                return Err(SessionError::NotRunning);
            }
        }
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), SessionError> {
        self.ensure_running()?;
        let piece = self.field.falling_piece().left();
        self.field.set_falling_piece(piece)?;
        Ok(())
    }

    pub fn try_move_right(&mut self) -> Result<(), SessionError> {
        self.ensure_running()?;
        let piece = self.field.falling_piece().right();
        self.field.set_falling_piece(piece)?;
        Ok(())
    }

    /// Moves the falling piece down one row. Never locks.
    pub fn try_soft_drop(&mut self) -> Result<(), SessionError> {
        self.ensure_running()?;
        let piece = self.field.falling_piece().down();
        self.field.set_falling_piece(piece)?;
        Ok(())
    }

    pub fn try_rotate_clockwise(&mut self) -> Result<(), SessionError> {
        self.ensure_running()?;
        let piece = self
            .field
            .falling_piece()
            .super_rotated_clockwise(self.field.board())
            .ok_or(PieceCollisionError)?;
        self.field.set_falling_piece(piece)?;
        Ok(())
    }

    pub fn try_rotate_counter_clockwise(&mut self) -> Result<(), SessionError> {
        self.ensure_running()?;
        let piece = self
            .field
            .falling_piece()
            .super_rotated_counter_clockwise(self.field.board())
            .ok_or(PieceCollisionError)?;
        self.field.set_falling_piece(piece)?;
        Ok(())
    }

    /// Drops the falling piece as far as it goes and locks it.
    pub fn hard_drop(&mut self) -> Result<LockResult, SessionError> {
        self.ensure_running()?;
        let piece = self.field.simulate_drop_position();
        self.field.set_falling_piece(piece)?;
        Ok(self.lock_falling_piece())
    }

    /// One gravity step: moves the piece down, or locks it where it is.
    pub fn tick(&mut self) -> Result<Option<LockResult>, SessionError> {
        self.ensure_running()?;
        let piece = self.field.falling_piece().down();
        if self.field.set_falling_piece(piece).is_ok() {
            return Ok(None);
        }
        Ok(Some(self.lock_falling_piece()))
    }

    /// Feeds `elapsed` time to the gravity timer and runs every due tick.
    ///
    /// Returns the number of ticks run. Stops early if the game ends, in which
    /// case only the time up to the final tick counts toward [`duration`].
    ///
    /// [`duration`]: Self::duration
    pub fn advance(&mut self, elapsed: Duration) -> Result<usize, SessionError> {
        self.ensure_running()?;
        if let Some(timer) = &mut self.gravity {
            timer.feed(elapsed);
        }
        let mut ticks = 0;
        loop {
            let Some(timer) = &mut self.gravity else {
                break;
            };
            if !timer.take_tick() {
                break;
            }
            let unspent = timer.elapsed();
            self.tick()?;
            ticks += 1;
            if !self.state.is_running() {
                let spent = elapsed.saturating_sub(unspent);
                self.running_time = self.running_time.saturating_add(spent);
                return Ok(ticks);
            }
        }
        self.running_time = self.running_time.saturating_add(elapsed);
        Ok(ticks)
    }

    pub fn apply(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        match command {
            SessionCommand::Start => self.start(),
            SessionCommand::MoveLeft => self.try_move_left()?,
            SessionCommand::MoveRight => self.try_move_right()?,
            SessionCommand::SoftDrop => self.try_soft_drop()?,
            SessionCommand::HardDrop => {
                self.hard_drop()?;
            }
            SessionCommand::RotateClockwise => self.try_rotate_clockwise()?,
            SessionCommand::RotateCounterClockwise => self.try_rotate_counter_clockwise()?,
            SessionCommand::TogglePause => self.toggle_pause()?,
        }
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if !self.state.is_running() {
            return Err(SessionError::NotRunning);
        }
        Ok(())
    }

    fn has_live_piece(&self) -> bool {
        self.state.is_running() || self.state.is_paused()
    }

    fn arm_gravity(&mut self) {
        self.timer_generation += 1;
        let interval = self.config.gravity.interval(self.stats.level());
        self.gravity = Some(GravityTimer::new(self.timer_generation, interval));
    }

    fn lock_falling_piece(&mut self) -> LockResult {
        let (result, spawn) = self.field.lock_and_advance(self.stats.level());
        let level_changed = self.stats.apply_lock(&result);

        if spawn.is_err() {
            self.state = SessionState::GameOver;
            self.gravity = None;
            return result;
        }
        if level_changed {
            self.timer_generation += 1;
            let interval = self.config.gravity.interval(self.stats.level());
            let generation = self.timer_generation;
            self.gravity = self
                .gravity
                .map(|timer| timer.replaced(generation, interval));
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut GameField<S> {
        &mut self.field
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
