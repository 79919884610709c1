use std::{path::PathBuf, time::Duration};

use anyhow::ensure;
use chrono::Utc;
use ojatris_engine::{
    FinalScore, GameSession, GameStats, PieceSeed, SessionConfig, SessionSnapshot,
};
use ojatris_records::{
    DEFAULT_TOP_LIMIT, GameRecord, MemoryStore, PlayerHistory, PlayerId, RankedRecord,
    record_game_over,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    policy::RandomPolicy,
    util::{self, Output},
};

const DEFAULT_GAMES: usize = 3;
const DEFAULT_MAX_STEPS: usize = 20_000;
const DEFAULT_STEP_MS: u64 = 100;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of games to play
    #[arg(long, default_value_t = DEFAULT_GAMES)]
    games: usize,
    /// Master seed (32 hex digits) for reproducible runs
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Player id; repeat to rotate games between several players
    #[arg(long = "player", default_value = "guest")]
    players: Vec<String>,
    /// Session config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of commands per game
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,
    /// Simulated time between two commands, in milliseconds
    #[arg(long, default_value_t = DEFAULT_STEP_MS)]
    step_ms: u64,
    /// Include the final snapshot of each game in the output
    #[arg(long)]
    snapshots: bool,
    /// Number of leaderboard entries to report
    #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
    top: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Default for AutoPlayArg {
    fn default() -> Self {
        Self {
            games: DEFAULT_GAMES,
            seed: None,
            players: vec!["guest".to_owned()],
            config: None,
            max_steps: DEFAULT_MAX_STEPS,
            step_ms: DEFAULT_STEP_MS,
            snapshots: false,
            top: DEFAULT_TOP_LIMIT,
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GameSummary {
    game: usize,
    player: PlayerId,
    seed: PieceSeed,
    steps: usize,
    duration_ms: u64,
    final_score: Option<FinalScore>,
    new_high_score: bool,
    stats: GameStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<SessionSnapshot>,
}

#[derive(Debug, Serialize)]
struct PlayerReport<'a> {
    player: &'a PlayerId,
    rank: Option<usize>,
    high_score: Option<u64>,
    history: Option<&'a PlayerHistory>,
}

#[derive(Debug, Serialize)]
struct AutoPlayReport<'a> {
    games: Vec<GameSummary>,
    leaderboard: Vec<RankedRecord<'a>>,
    players: Vec<PlayerReport<'a>>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    ensure!(!arg.players.is_empty(), "at least one player is required");
    let config = util::read_session_config(arg.config.as_ref())?;

    let mut rng = match arg.seed {
        Some(seed) => Pcg32::from_seed(seed.to_bytes()),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let step = Duration::from_millis(arg.step_ms);
    let mut store = MemoryStore::new();
    let mut games = Vec::with_capacity(arg.games);

    for game in 0..arg.games {
        let player = PlayerId::new(arg.players[game % arg.players.len()].as_str());
        let seed: PieceSeed = rng.random();
        let mut policy = RandomPolicy::new(&mut rng);

        eprintln!("Playing game {}/{} (player: {player}, seed: {seed})", game + 1, arg.games);
        let PlayedGame { session, steps } =
            play_game(config, seed, &mut policy, arg.max_steps, step)?;
        let stats = session.stats().clone();
        eprintln!(
            "  score: {}, level: {}, lines: {}, pieces: {}, detonations: {}",
            stats.score(),
            stats.level(),
            stats.total_cleared_lines(),
            stats.completed_pieces(),
            stats.detonations(),
        );

        let final_score = session.final_score();
        let new_high_score = match final_score {
            Some(final_score) => {
                let record = GameRecord::from_final_score(
                    player.clone(),
                    player.to_string(),
                    final_score,
                    Utc::now(),
                );
                record_game_over(&mut store, &record)
            }
            None => {
                eprintln!(
                    "  game did not end within {} steps; not recorded",
                    arg.max_steps
                );
                false
            }
        };

        games.push(GameSummary {
            game,
            player,
            seed,
            steps,
            duration_ms: u64::try_from(session.duration().as_millis()).unwrap_or(u64::MAX),
            final_score,
            new_high_score,
            stats,
            snapshot: arg.snapshots.then(|| session.snapshot()),
        });
    }

    let leaderboard = store.top_scores(arg.top);
    eprintln!("Leaderboard:");
    for entry in &leaderboard {
        eprintln!(
            "  {:>3}. {:<16} {:>8} (level {}, {} lines)",
            entry.rank,
            entry.record.display_name,
            entry.record.score,
            entry.record.level,
            entry.record.lines,
        );
    }

    let mut player_ids: Vec<PlayerId> = Vec::new();
    for id in &arg.players {
        let id = PlayerId::new(id.as_str());
        if !player_ids.contains(&id) {
            player_ids.push(id);
        }
    }
    let players = player_ids
        .iter()
        .map(|player| PlayerReport {
            player,
            rank: store.rank_of(player),
            high_score: store.high_score(player).map(|record| record.score),
            history: store.history(player),
        })
        .collect();

    let report = AutoPlayReport {
        games,
        leaderboard,
        players,
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}

/// A finished (or abandoned) headless game.
struct PlayedGame {
    session: GameSession,
    steps: usize,
}

fn play_game(
    config: SessionConfig,
    seed: PieceSeed,
    policy: &mut RandomPolicy,
    max_steps: usize,
    step: Duration,
) -> anyhow::Result<PlayedGame> {
    let mut session = GameSession::with_seed(config, seed)?;
    session.start();

    let mut steps = 0;
    while steps < max_steps && session.state().is_running() {
        let command = policy.next_command(&session);
        if session.apply(command).is_err() {
            policy.reject();
        }
        if session.state().is_running() {
            session.advance(step)?;
        }
        steps += 1;
    }
    Ok(PlayedGame { session, steps })
}
