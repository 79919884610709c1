use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, show_config::ShowConfigArg};

mod auto_play;
mod show_config;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play seeded games with a random input policy and print the results
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Print the effective session config as JSON
    ShowConfig(#[clap(flatten)] ShowConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::AutoPlay(AutoPlayArg::default())) {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::ShowConfig(arg) => show_config::run(&arg)?,
    }
    Ok(())
}
