use std::{fs, path::PathBuf, thread};

use anyhow::{Context, anyhow};
use chrono::Utc;
use neuroevo_network::NeuralNetwork;
use neuroevo_training::{
    EvoRng, GenerationReport, MatchMode, MetaHeuristic, OptimizerConfig, PopulationSeeds, Role,
};
use rand::{Rng as _, SeedableRng as _};
use serde::Serialize;

use crate::{
    arena::{Arena, ArenaParams, DuelScore},
    model::controller::Controller,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Optimizer configuration file (JSON); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed of the run's random number generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Override the configured population size
    #[arg(long)]
    population_size: Option<usize>,
    /// Override the configured number of generations
    #[arg(long)]
    generations: Option<usize>,
    /// Override the configured match mode (versus or solo)
    #[arg(long)]
    mode: Option<MatchMode>,
    /// Directory of controller files seeding the red population
    #[arg(long)]
    seed_red: Option<PathBuf>,
    /// Directory of controller files seeding the blue population
    #[arg(long)]
    seed_blue: Option<PathBuf>,
    /// Forget the best-overall controllers before every generation, since fitness
    /// values of different generations come from different ball placements
    #[arg(long)]
    reset_best: bool,
    /// Output directory
    #[arg(long, default_value = "trained")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct TrainingStats<'a> {
    seed: u64,
    config: &'a OptimizerConfig,
    generations: &'a [GenerationReport],
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let mut config = match &arg.config {
        Some(path) => util::read_json_file("optimizer config", path)?,
        None => OptimizerConfig::default(),
    };
    if let Some(population_size) = arg.population_size {
        config.population_size = population_size;
    }
    if let Some(generations) = arg.generations {
        config.number_of_generations = generations;
    }
    if let Some(mode) = arg.mode {
        config.match_mode = mode;
    }

    let seeds = PopulationSeeds {
        red: load_seeds(arg.seed_red.as_ref())?,
        blue: load_seeds(arg.seed_blue.as_ref())?,
    };
    let arena = Arena::new(ArenaParams::default()).context("Invalid arena parameters")?;

    let mut optimizer =
        MetaHeuristic::new(config, arg.seed).context("Invalid optimizer configuration")?;
    if !Arena::fits(optimizer.topology()) {
        tracing::warn!(
            topology = %optimizer.topology(),
            "topology does not match the arena's 3 sensors and 2 actions"
        );
    }
    optimizer
        .init_population(&seeds)
        .context("Failed to initialize populations")?;

    tracing::info!(
        seed = arg.seed,
        population_size = optimizer.config().population_size,
        generations = optimizer.number_of_generations(),
        mode = ?optimizer.config().match_mode,
        "training started"
    );
    loop {
        if arg.reset_best && optimizer.generation() > 0 {
            optimizer.reset_best_overall();
        }
        evaluate_generation(&mut optimizer, &arena)?;
        if optimizer
            .step()
            .context("Failed to advance the generation")?
            .is_finished()
        {
            break;
        }
    }

    save_results(&optimizer, arg)
}

fn load_seeds(dir: Option<&PathBuf>) -> anyhow::Result<Vec<NeuralNetwork>> {
    let Some(dir) = dir else {
        return Ok(vec![]);
    };
    let controllers = util::read_controller_dir(dir)?;
    tracing::info!(count = controllers.len(), dir = %dir.display(), "loaded seed controllers");
    Ok(controllers.into_iter().map(|c| c.network).collect())
}

fn phenotypes(optimizer: &mut MetaHeuristic, role: Role) -> Vec<NeuralNetwork> {
    optimizer
        .population_mut(role)
        .iter_mut()
        .map(|ind| ind.phenotype().clone())
        .collect()
}

/// Plays every scheduled game, one thread per game, and records the scores in
/// schedule order.
fn evaluate_generation(optimizer: &mut MetaHeuristic, arena: &Arena) -> anyhow::Result<()> {
    let schedule = optimizer.evaluation_schedule();
    let strikers = phenotypes(optimizer, Role::Red);
    let keepers = phenotypes(optimizer, Role::Blue);
    let game_seeds = schedule
        .iter()
        .map(|_| optimizer.rng_mut().random::<u64>())
        .collect::<Vec<_>>();

    let scores = thread::scope(|s| {
        let handles = schedule
            .iter()
            .zip(&game_seeds)
            .map(|(matchup, &seed)| {
                let striker = &strikers[matchup.red];
                let keeper = matchup.blue.map(|index| &keepers[index]);
                s.spawn(move || arena.play(striker, keeper, &mut EvoRng::seed_from_u64(seed)))
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<DuelScore>, _>>()
    })
    .map_err(|_| anyhow!("A game thread panicked"))?;

    for (matchup, score) in schedule.iter().zip(&scores) {
        tracing::debug!(
            round = matchup.round,
            red = matchup.red,
            blue = ?matchup.blue,
            goals = score.goals,
            saves = score.saves,
            "game finished"
        );
        let blue_score = matchup.blue.map(|_| score.blue_score());
        optimizer
            .record_match(matchup, score.red_score(), blue_score)
            .context("Failed to record game scores")?;
    }
    Ok(())
}

fn save_results(optimizer: &MetaHeuristic, arg: &TrainArg) -> anyhow::Result<()> {
    fs::create_dir_all(&arg.output).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            arg.output.display()
        )
    })?;

    let trained_at = Utc::now();
    for role in Role::ALL {
        let Some(best) = optimizer.overall_best(role) else {
            tracing::info!(%role, "population was not evaluated, no controller saved");
            continue;
        };
        let controller = Controller::from_best(role, best, trained_at);
        let path = arg.output.join(format!("best-{role}.json"));
        Output::save_json(&controller, Some(path.clone()))?;
        tracing::info!(
            %role,
            id = %best.id(),
            fitness = controller.fitness,
            path = %path.display(),
            "controller saved"
        );
    }

    let stats = TrainingStats {
        seed: arg.seed,
        config: optimizer.config(),
        generations: optimizer.history(),
    };
    let path = arg.output.join("stats.json");
    Output::save_json(&stats, Some(path.clone()))?;
    tracing::info!(path = %path.display(), "training stats saved");
    Ok(())
}
