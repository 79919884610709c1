mod command;
mod policy;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
