//! Population lifecycle for two co-evolving roles.
//!
//! [`MetaHeuristic`] owns both populations, the RNG and the best-of records, and moves
//! through a small state machine:
//!
//! ```text
//! Uninitialized --init_population--> Initialized --step--> ... --step--> Finished
//! ```
//!
//! Between two steps the orchestrator evaluates every individual of both populations
//! (see [`EvaluationSchedule`]) and reports scores with
//! [`record_match`](MetaHeuristic::record_match) or
//! [`record_evaluation`](MetaHeuristic::record_evaluation). [`step`](MetaHeuristic::step)
//! refuses to run while any evaluation is pending.
//!
//! # Generation Step
//!
//! 1. Update the generation-best and best-overall records of each population (strictly
//!    greater fitness only, ties keep the incumbent).
//! 2. Advance the generation counter; on reaching the configured number of generations
//!    the run is finished and the populations are left as they are.
//! 3. Build the next populations:
//!    - **Genetic**: tournament-select survivors, cross adjacent pairs `(0, 1), (2, 3), ...`,
//!      mutate everyone, and with elitism put a clone of the best-overall at index 0.
//!    - **Hill climber**: mutated clones of the best-overall individual.
//!
//! The red and blue populations never exchange genetic material. In
//! [solo](MatchMode::Solo) runs only red is evaluated and bred; blue keeps its initial
//! individuals and is left out of the reports.
//!
//! # Reproducibility
//!
//! All random decisions are drawn from the optimizer's own [`EvoRng`], seeded on
//! construction. The orchestrator borrows the same generator through
//! [`rng_mut`](MetaHeuristic::rng_mut) for its own decisions (pairings, scenarios), so a
//! whole run replays bit for bit from a single seed.

use std::num::NonZeroUsize;

use neuroevo_network::{NeuralNetwork, Topology};
use rand::SeedableRng as _;

use crate::{
    AlgorithmConfig, BestRecord, BoxedSelectionMethod, ConfigError, EvaluationError,
    EvaluationSchedule, EvoRng, FitnessStats, GenerationReport, Individual, IndividualId,
    InitError, MatchMode, Matchup, OptimizerConfig, PopulationParams, PopulationReport, Role,
    SearchStrategy, SelectionMethod, StepError, TopologyMismatchError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum OptimizerState {
    Uninitialized,
    Initialized,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// A new generation is ready to be evaluated.
    Advanced,
    /// The last generation was reached; nothing was bred.
    Finished,
}

/// Networks used to seed a population instead of random genotypes.
///
/// Seeds are reused cyclically. The first `len` individuals are exact copies of the
/// seeds; the rest are mutated copies.
#[derive(Debug, Clone, Default)]
pub struct PopulationSeeds {
    pub red: Vec<NeuralNetwork>,
    pub blue: Vec<NeuralNetwork>,
}

impl PopulationSeeds {
    fn get(&self, role: Role) -> &[NeuralNetwork] {
        match role {
            Role::Red => &self.red,
            Role::Blue => &self.blue,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Population {
    individuals: Vec<Individual>,
    generation_best: Option<BestRecord>,
    overall_best: Option<BestRecord>,
    average_fitness: f32,
}

impl Population {
    fn update_records(&mut self, generation: usize) -> Option<PopulationReport> {
        let stats = FitnessStats::new(self.individuals.iter().map(Individual::fitness))?;
        self.average_fitness = stats.mean;

        let mut best_index = 0;
        for (index, ind) in self.individuals.iter().enumerate().skip(1) {
            if ind.fitness() > self.individuals[best_index].fitness() {
                best_index = index;
            }
        }
        let generation_best = BestRecord::new(
            IndividualId {
                generation,
                index: best_index,
            },
            self.individuals[best_index].clone(),
        );

        let improves = self
            .overall_best
            .as_ref()
            .is_none_or(|best| generation_best.fitness() > best.fitness());
        if improves {
            self.overall_best = Some(generation_best.clone());
        }
        let overall_best = self.overall_best.as_ref().map(BestRecord::summary)?;

        let report = PopulationReport {
            average_fitness: stats.mean,
            stats,
            generation_best: generation_best.summary(),
            overall_best,
        };
        self.generation_best = Some(generation_best);
        Some(report)
    }
}

/// Evolutionary optimizer coordinating a red and a blue population.
#[derive(Debug)]
pub struct MetaHeuristic {
    config: OptimizerConfig,
    topology: Topology,
    evaluations: NonZeroUsize,
    rng: EvoRng,
    state: OptimizerState,
    generation: usize,
    selection: Option<BoxedSelectionMethod>,
    red: Population,
    blue: Population,
    history: Vec<GenerationReport>,
}

impl MetaHeuristic {
    /// Validates `config` and creates an optimizer whose RNG is seeded with `seed`.
    pub fn new(config: OptimizerConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, EvoRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: OptimizerConfig, rng: EvoRng) -> Result<Self, ConfigError> {
        let topology = config.validate()?;
        let requested = config.evaluations_per_individual;
        let clamped = requested.min(config.population_size);
        if clamped < requested {
            tracing::warn!(
                requested,
                population_size = config.population_size,
                "evaluations per individual clamped to population size"
            );
        }
        let evaluations = NonZeroUsize::new(clamped).ok_or(ConfigError::ZeroEvaluations)?;
        Ok(Self {
            config,
            topology,
            evaluations,
            rng,
            state: OptimizerState::Uninitialized,
            generation: 0,
            selection: None,
            red: Population::default(),
            blue: Population::default(),
            history: vec![],
        })
    }

    /// Builds both populations, randomly or from seed networks, and the selection
    /// strategy.
    pub fn init_population(&mut self, seeds: &PopulationSeeds) -> Result<(), InitError> {
        if !self.state.is_uninitialized() {
            return Err(InitError::AlreadyInitialized);
        }
        let strategy = self.config.algorithm.strategy();

        for role in Role::ALL {
            let role_seeds = seeds.get(role);
            for (index, seed) in role_seeds.iter().enumerate() {
                if seed.topology() != &self.topology {
                    return Err(InitError::SeedTopology {
                        role,
                        index,
                        source: TopologyMismatchError {
                            expected: self.topology.clone(),
                            actual: seed.topology().clone(),
                        },
                    });
                }
            }

            let params = *self.config.params(role);
            let mut individuals = Vec::with_capacity(self.config.population_size);
            for i in 0..self.config.population_size {
                let mut ind = Individual::new(
                    self.topology.clone(),
                    self.evaluations,
                    strategy,
                    self.config.mutation,
                );
                if role_seeds.is_empty() {
                    ind.initialize(&mut self.rng);
                } else {
                    let seed = &role_seeds[i % role_seeds.len()];
                    ind.initialize_from(seed)
                        .map_err(|source| InitError::SeedTopology {
                            role,
                            index: i % role_seeds.len(),
                            source,
                        })?;
                    if i >= role_seeds.len() {
                        ind.mutate(params.mutation_probability, &mut self.rng);
                    }
                }
                individuals.push(ind);
            }
            tracing::debug!(
                %role,
                seeds = role_seeds.len(),
                size = individuals.len(),
                "population initialized"
            );
            self.population_state_mut(role).individuals = individuals;
        }

        if let AlgorithmConfig::Genetic {
            tournament_size,
            selection,
        } = self.config.algorithm
        {
            self.selection = Some(selection.build(tournament_size).map_err(InitError::Config)?);
        }
        self.state = OptimizerState::Initialized;
        Ok(())
    }

    /// Runs one generation transition.
    pub fn step(&mut self) -> Result<StepOutcome, StepError> {
        match self.state {
            OptimizerState::Uninitialized => return Err(StepError::NotInitialized),
            OptimizerState::Finished => return Err(StepError::Finished),
            OptimizerState::Initialized => {}
        }
        for &role in self.config.active_roles() {
            if let Some(index) = self
                .population(role)
                .iter()
                .position(|ind| !ind.is_evaluated())
            {
                return Err(StepError::PendingEvaluations { role, index });
            }
        }

        self.update_report();
        self.generation += 1;
        if self.generation >= self.config.number_of_generations {
            self.state = OptimizerState::Finished;
            tracing::info!(generation = self.generation, "run finished");
            return Ok(StepOutcome::Finished);
        }

        let Self {
            config,
            rng,
            selection,
            red,
            blue,
            ..
        } = self;
        for (role, population) in [(Role::Red, red), (Role::Blue, blue)] {
            if !config.active_roles().contains(&role) {
                continue;
            }
            let params = *config.params(role);
            let next = match config.algorithm.strategy() {
                SearchStrategy::Genetic => {
                    let selection = selection.as_deref().ok_or(StepError::NotInitialized)?;
                    breed_genetic(population, &params, selection, config.population_size, rng)?
                }
                SearchStrategy::HillClimber => {
                    breed_hill_climber(population, &params, config.population_size, rng)
                }
            };
            population.individuals = next;
        }
        Ok(StepOutcome::Advanced)
    }

    /// Refreshes the best-of records and the average fitness of both populations and
    /// records the generation's report.
    ///
    /// Called by [`step`](Self::step); calling it again for the same generation replaces
    /// that generation's report instead of adding one.
    pub fn update_report(&mut self) -> Option<&GenerationReport> {
        let generation = self.generation;
        let red = self.red.update_records(generation)?;
        let blue = match self.config.match_mode {
            MatchMode::Versus => Some(self.blue.update_records(generation)?),
            MatchMode::Solo => None,
        };
        let report = GenerationReport {
            generation,
            red,
            blue,
        };
        tracing::info!(
            generation,
            red_average = report.red.average_fitness,
            red_best = report.red.generation_best.fitness,
            blue_average = report.blue.map(|b| b.average_fitness),
            blue_best = report.blue.map(|b| b.generation_best.fitness),
            "generation evaluated"
        );

        if self
            .history
            .last()
            .is_some_and(|last| last.generation == generation)
        {
            self.history.pop();
        }
        self.history.push(report);
        self.history.last()
    }

    /// Forgets the best-overall records of both populations.
    ///
    /// Used when the evaluation scenario changes between generations and earlier
    /// fitness values are no longer comparable.
    pub fn reset_best_overall(&mut self) {
        self.red.overall_best = None;
        self.blue.overall_best = None;
    }

    /// Records one evaluation score for the individual at `index`.
    pub fn record_evaluation(
        &mut self,
        role: Role,
        index: usize,
        score: f32,
    ) -> Result<(), EvaluationError> {
        self.individual_mut(role, index)?.set_evaluation(score)
    }

    /// Records the scores of a finished game.
    ///
    /// Individuals that already completed their evaluations are skipped.
    pub fn record_match(
        &mut self,
        matchup: &Matchup,
        red_score: f32,
        blue_score: Option<f32>,
    ) -> Result<(), EvaluationError> {
        let mut pending = vec![(Role::Red, matchup.red, red_score)];
        if let (Some(index), Some(score)) = (matchup.blue, blue_score) {
            pending.push((Role::Blue, index, score));
        }
        for (role, index, score) in pending {
            let ind = self.individual_mut(role, index)?;
            if ind.is_evaluated() {
                tracing::debug!(%role, index, "individual already evaluated, score ignored");
                continue;
            }
            ind.set_evaluation(score)?;
        }
        Ok(())
    }

    /// Plans the games needed to evaluate the current populations.
    pub fn evaluation_schedule(&mut self) -> EvaluationSchedule {
        let size = self.config.population_size;
        let rounds = self.evaluations.get();
        match self.config.match_mode {
            MatchMode::Versus => EvaluationSchedule::versus(size, rounds, &mut self.rng),
            MatchMode::Solo => EvaluationSchedule::solo(size, rounds),
        }
    }

    #[must_use]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[must_use]
    pub fn state(&self) -> OptimizerState {
        self.state
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn number_of_generations(&self) -> usize {
        self.config.number_of_generations
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Evaluation rounds per individual after clamping to the population size.
    #[must_use]
    pub fn evaluations_per_individual(&self) -> usize {
        self.evaluations.get()
    }

    #[must_use]
    pub fn population(&self, role: Role) -> &[Individual] {
        &self.population_state(role).individuals
    }

    pub fn population_mut(&mut self, role: Role) -> &mut [Individual] {
        &mut self.population_state_mut(role).individuals
    }

    pub fn individual_mut(
        &mut self,
        role: Role,
        index: usize,
    ) -> Result<&mut Individual, EvaluationError> {
        let population = &mut self.population_state_mut(role).individuals;
        let population_size = population.len();
        population
            .get_mut(index)
            .ok_or(EvaluationError::IndexOutOfRange {
                role,
                index,
                population_size,
            })
    }

    /// Mean fitness of the population at the last report.
    #[must_use]
    pub fn population_average_fitness(&self, role: Role) -> f32 {
        self.population_state(role).average_fitness
    }

    #[must_use]
    pub fn generation_best(&self, role: Role) -> Option<&BestRecord> {
        self.population_state(role).generation_best.as_ref()
    }

    #[must_use]
    pub fn overall_best(&self, role: Role) -> Option<&BestRecord> {
        self.population_state(role).overall_best.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[GenerationReport] {
        &self.history
    }

    pub fn rng_mut(&mut self) -> &mut EvoRng {
        &mut self.rng
    }

    fn population_state(&self, role: Role) -> &Population {
        match role {
            Role::Red => &self.red,
            Role::Blue => &self.blue,
        }
    }

    fn population_state_mut(&mut self, role: Role) -> &mut Population {
        match role {
            Role::Red => &mut self.red,
            Role::Blue => &mut self.blue,
        }
    }
}

fn breed_genetic(
    population: &Population,
    params: &PopulationParams,
    selection: &dyn SelectionMethod,
    size: usize,
    rng: &mut EvoRng,
) -> Result<Vec<Individual>, StepError> {
    let mut next = selection
        .select(&population.individuals, size, rng)
        .map_err(StepError::Selection)?;

    for pair in next.chunks_exact_mut(2) {
        if let [first, second] = pair {
            first.crossover(second, params.crossover_probability, rng);
        }
    }
    for ind in &mut next {
        ind.mutate(params.mutation_probability, rng);
    }
    if params.elitist
        && let Some(best) = &population.overall_best
        && let Some(slot) = next.first_mut()
    {
        *slot = best.individual().fresh_clone();
    }
    Ok(next)
}

fn breed_hill_climber(
    population: &Population,
    params: &PopulationParams,
    size: usize,
    rng: &mut EvoRng,
) -> Vec<Individual> {
    let parent = match &population.overall_best {
        Some(best) => best.individual(),
        None => &population.individuals[0],
    };
    (0..size)
        .map(|_| {
            let mut child = parent.fresh_clone();
            child.mutate(params.mutation_probability, rng);
            child
        })
        .collect()
}
