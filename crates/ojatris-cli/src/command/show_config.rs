use std::path::PathBuf;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ShowConfigArg {
    /// Session config file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ShowConfigArg) -> anyhow::Result<()> {
    let ShowConfigArg { config, output } = arg;
    let config = util::read_session_config(config.as_ref())?;
    Output::save_json(&config, output.clone())?;
    Ok(())
}
