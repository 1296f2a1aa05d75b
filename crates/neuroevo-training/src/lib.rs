//! Co-evolution of neural network controllers for two competing populations.
//!
//! This crate evolves the weights of fixed-topology [`NeuralNetwork`](neuroevo_network::NeuralNetwork)
//! controllers. Two populations, [`Role::Red`] and [`Role::Blue`], are evolved side by
//! side; in versus mode every game pits a red controller against a blue one, so each
//! population is the other's fitness landscape.
//!
//! # How Training Works
//!
//! 1. **Initialize** - [`MetaHeuristic::init_population`] fills both populations with
//!    random genotypes or copies of seed networks
//! 2. **Schedule** - [`MetaHeuristic::evaluation_schedule`] plans the games of one
//!    generation
//! 3. **Evaluate** - the caller runs the games and reports scores with
//!    [`MetaHeuristic::record_match`]; fitness is the mean over all rounds
//! 4. **Step** - [`MetaHeuristic::step`] updates the best-of records and breeds the next
//!    generation
//! 5. **Repeat** - until [`MetaHeuristic::is_finished`]
//!
//! # Architecture
//!
//! ```text
//! OptimizerConfig
//!     ↓ validated by
//! MetaHeuristic ── owns ──> EvoRng, SelectionMethod
//!     ↓ owns (red, blue)
//! Individual (genes + fitness)
//!     ↓ decodes to
//! NeuralNetwork (phenotype)
//!     ↓ played by the caller, scored back into
//! Individual::set_evaluation
//! ```
//!
//! # Search Strategies
//!
//! - **Genetic** - tournament selection, single-point crossover of adjacent survivor
//!   pairs, per-gene mutation, optional elitism
//! - **Hill climber** - every generation is mutated clones of the best-so-far individual
//!
//! # Example
//!
//! ```
//! use neuroevo_training::{MetaHeuristic, OptimizerConfig, PopulationSeeds, StepOutcome};
//!
//! let config = OptimizerConfig {
//!     topology: vec![2, 1],
//!     population_size: 4,
//!     number_of_generations: 3,
//!     evaluations_per_individual: 1,
//!     ..OptimizerConfig::default()
//! };
//! let mut optimizer = MetaHeuristic::new(config, 42).unwrap();
//! optimizer.init_population(&PopulationSeeds::default()).unwrap();
//!
//! loop {
//!     for matchup in &optimizer.evaluation_schedule() {
//!         optimizer.record_match(matchup, 1.0, Some(0.0)).unwrap();
//!     }
//!     if optimizer.step().unwrap() == StepOutcome::Finished {
//!         break;
//!     }
//! }
//! assert_eq!(optimizer.history().len(), 3);
//! ```

pub use self::{
    config::*, error::*, individual::*, optimizer::*, report::*, schedule::*, selection::*,
};

/// Random number generator used throughout a run.
///
/// A small, fast, seedable generator; a run seeded with the same value replays
/// identically.
pub type EvoRng = rand_pcg::Pcg64Mcg;

mod config;
mod error;
pub mod genes;
mod individual;
mod optimizer;
mod report;
mod schedule;
mod selection;
