use neuroevo_network::{Topology, TopologyError};

use crate::Role;

/// Invalid optimizer configuration. Always fatal, never retried.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("invalid topology: {_0}")]
    #[from]
    Topology(TopologyError),
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display("genetic algorithm pairs survivors, population size {population_size} must be even")]
    OddPopulation { population_size: usize },
    #[display("number of generations must be positive")]
    ZeroGenerations,
    #[display("number of evaluations per individual must be positive")]
    ZeroEvaluations,
    #[display("tournament size must be positive")]
    ZeroTournamentSize,
    #[display("tournament size {tournament_size} exceeds population size {population_size}")]
    TournamentTooLarge {
        tournament_size: usize,
        population_size: usize,
    },
    #[display("{role} {parameter} must be within [0, 1], got {value}")]
    InvalidProbability {
        role: Role,
        parameter: &'static str,
        value: f32,
    },
}

/// A network does not have the topology of the individual it should seed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("network topology {actual} does not match individual topology {expected}")]
pub struct TopologyMismatchError {
    pub expected: Topology,
    pub actual: Topology,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InitError {
    #[display("populations are already initialized")]
    AlreadyInitialized,
    #[display("{role} seed {index}: {source}")]
    SeedTopology {
        role: Role,
        index: usize,
        source: TopologyMismatchError,
    },
    #[display("{_0}")]
    Config(ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvaluationError {
    /// More scores were reported than configured before the individual was re-armed.
    #[display("individual already has all {required} evaluations")]
    AlreadyEvaluated { required: usize },
    #[display("no {role} individual at index {index} (population size {population_size})")]
    IndexOutOfRange {
        role: Role,
        index: usize,
        population_size: usize,
    },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StepError {
    #[display("populations are not initialized")]
    NotInitialized,
    #[display("run already reached its last generation")]
    Finished,
    #[display("{role} individual {index} has not completed its evaluations")]
    PendingEvaluations { role: Role, index: usize },
    #[display("selection failed: {_0}")]
    Selection(ConfigError),
}
