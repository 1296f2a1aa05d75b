use std::path::PathBuf;

use anyhow::Context;
use neuroevo_training::{EvoRng, Role};
use rand::SeedableRng as _;

use crate::{
    arena::{Arena, ArenaParams},
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct MatchArg {
    /// Striker controller file
    red: PathBuf,
    /// Keeper controller file
    blue: PathBuf,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Seed of the ball placements and sensor noise
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

pub(crate) fn run(arg: &MatchArg) -> anyhow::Result<()> {
    let red = util::read_controller_file(&arg.red)?;
    let blue = util::read_controller_file(&arg.blue)?;
    let players = [(&red, Role::Red, &arg.red), (&blue, Role::Blue, &arg.blue)];
    for (controller, role, path) in players {
        if controller.role != role {
            tracing::warn!(
                path = %path.display(),
                saved_as = %controller.role,
                playing_as = %role,
                "controller plays a role it was not trained for"
            );
        }
    }

    let arena = Arena::new(ArenaParams::default()).context("Invalid arena parameters")?;
    let mut rng = EvoRng::seed_from_u64(arg.seed);
    let (mut red_total, mut blue_total) = (0.0, 0.0);
    for game in 0..arg.games {
        let score = arena.play(&red.network, Some(&blue.network), &mut rng);
        red_total += score.red_score();
        blue_total += score.blue_score();
        tracing::info!(
            game,
            goals = score.goals,
            saves = score.saves,
            misses = score.misses,
            timeouts = score.timeouts,
            "game finished"
        );
    }
    tracing::info!(red = red_total, blue = blue_total, "match finished");
    Ok(())
}
