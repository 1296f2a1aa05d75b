use clap::{Parser, Subcommand};

use self::{exhibition::MatchArg, inspect::InspectArg, process::ProcessArg, train::TrainArg};

mod exhibition;
mod inspect;
mod process;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug details (overridden by `RUST_LOG`)
    #[arg(long, short, global = true)]
    verbose: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Co-evolve red and blue controllers in the penalty duel
    Train(#[clap(flatten)] TrainArg),
    /// Print a saved controller's network
    Inspect(#[clap(flatten)] InspectArg),
    /// Run one forward pass of a saved controller
    Process(#[clap(flatten)] ProcessArg),
    /// Play an exhibition duel between two saved controllers
    #[command(name = "match")]
    Match(#[clap(flatten)] MatchArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    crate::logging::init(args.verbose);
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
        Mode::Process(arg) => process::run(&arg)?,
        Mode::Match(arg) => exhibition::run(&arg)?,
    }
    Ok(())
}
