//! Optimizer configuration.
//!
//! The configuration is plain data (serde, JSON-friendly) and is validated once when
//! a [`MetaHeuristic`](crate::MetaHeuristic) is created. Every field has a default, so
//! a configuration file only needs to name what it changes:
//!
//! ```
//! use neuroevo_training::{AlgorithmConfig, OptimizerConfig};
//!
//! let config: OptimizerConfig = serde_json::from_str(
//!     r#"{
//!         "topology": [3, 8, 2],
//!         "population_size": 20,
//!         "algorithm": { "kind": "genetic", "tournament_size": 4 },
//!         "red": { "mutation_probability": 0.1 }
//!     }"#,
//! )
//! .unwrap();
//! assert_eq!(config.population_size, 20);
//! assert!(matches!(config.algorithm, AlgorithmConfig::Genetic { tournament_size: 4, .. }));
//! assert!(config.red.elitist);
//! config.validate().unwrap();
//! ```

use neuroevo_network::Topology;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, MatchMode, MutationKind, SearchStrategy, SelectionKind};

/// One of the two co-evolving populations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[display("red")]
    Red,
    #[display("blue")]
    Blue,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Red, Role::Blue];
}

const DEFAULT_TOPOLOGY: [usize; 3] = [3, 6, 2];
const DEFAULT_POPULATION_SIZE: usize = 30;
const DEFAULT_GENERATIONS: usize = 100;
const DEFAULT_EVALUATIONS: usize = 3;
const DEFAULT_TOURNAMENT_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Layer sizes shared by every controller of both populations.
    pub topology: Vec<usize>,
    pub population_size: usize,
    /// The run is finished once this many generations have been stepped.
    pub number_of_generations: usize,
    /// Evaluation rounds averaged into each individual's fitness.
    pub evaluations_per_individual: usize,
    pub mutation: MutationKind,
    pub algorithm: AlgorithmConfig,
    /// In solo runs only red plays; the blue population is kept as initialized.
    pub match_mode: MatchMode,
    pub red: PopulationParams,
    pub blue: PopulationParams,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            topology: DEFAULT_TOPOLOGY.to_vec(),
            population_size: DEFAULT_POPULATION_SIZE,
            number_of_generations: DEFAULT_GENERATIONS,
            evaluations_per_individual: DEFAULT_EVALUATIONS,
            mutation: MutationKind::default(),
            algorithm: AlgorithmConfig::default(),
            match_mode: MatchMode::default(),
            red: PopulationParams::default(),
            blue: PopulationParams::default(),
        }
    }
}

impl OptimizerConfig {
    #[must_use]
    pub fn params(&self, role: Role) -> &PopulationParams {
        match role {
            Role::Red => &self.red,
            Role::Blue => &self.blue,
        }
    }

    /// Roles that are evaluated and bred in this run.
    #[must_use]
    pub fn active_roles(&self) -> &'static [Role] {
        match self.match_mode {
            MatchMode::Versus => &Role::ALL,
            MatchMode::Solo => &[Role::Red],
        }
    }

    /// Checks the configuration and returns the validated topology.
    pub fn validate(&self) -> Result<Topology, ConfigError> {
        let topology = Topology::new(&self.topology)?;
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.number_of_generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.evaluations_per_individual == 0 {
            return Err(ConfigError::ZeroEvaluations);
        }
        if let AlgorithmConfig::Genetic {
            tournament_size, ..
        } = self.algorithm
        {
            if self.population_size % 2 != 0 {
                return Err(ConfigError::OddPopulation {
                    population_size: self.population_size,
                });
            }
            if tournament_size == 0 {
                return Err(ConfigError::ZeroTournamentSize);
            }
            if tournament_size > self.population_size {
                return Err(ConfigError::TournamentTooLarge {
                    tournament_size,
                    population_size: self.population_size,
                });
            }
        }
        for role in Role::ALL {
            self.params(role).validate(role)?;
        }
        Ok(topology)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlgorithmConfig {
    /// Generational GA: select, pair-wise crossover, mutate, optional elitism.
    Genetic {
        tournament_size: usize,
        #[serde(default)]
        selection: SelectionKind,
    },
    /// Every generation is rebuilt from mutated clones of the best-so-far individual.
    HillClimber,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self::Genetic {
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
            selection: SelectionKind::default(),
        }
    }
}

impl AlgorithmConfig {
    #[must_use]
    pub fn strategy(&self) -> SearchStrategy {
        match self {
            Self::Genetic { .. } => SearchStrategy::Genetic,
            Self::HillClimber => SearchStrategy::HillClimber,
        }
    }
}

/// Per-population evolution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    /// Per-gene mutation probability.
    pub mutation_probability: f32,
    /// Probability that a survivor pair is recombined (genetic algorithm only).
    pub crossover_probability: f32,
    /// Keep a clone of the best-overall individual at index 0 of every new generation
    /// (genetic algorithm only).
    pub elitist: bool,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            mutation_probability: 0.05,
            crossover_probability: 0.9,
            elitist: true,
        }
    }
}

impl PopulationParams {
    fn validate(&self, role: Role) -> Result<(), ConfigError> {
        for (parameter, value) in [
            ("mutation probability", self.mutation_probability),
            ("crossover probability", self.crossover_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability {
                    role,
                    parameter,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use neuroevo_network::TopologyError;

    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = OptimizerConfig::default();
        let topology = config.validate().unwrap();
        assert_eq!(topology.layers(), DEFAULT_TOPOLOGY);
    }

    #[test]
    fn test_rejects_bad_topology() {
        let config = OptimizerConfig {
            topology: vec![4],
            ..OptimizerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Topology(TopologyError::TooFewLayers { len: 1 }))
        );
    }

    #[test]
    fn test_rejects_zero_counts() {
        let zero_evaluations = OptimizerConfig {
            evaluations_per_individual: 0,
            ..OptimizerConfig::default()
        };
        assert_eq!(zero_evaluations.validate(), Err(ConfigError::ZeroEvaluations));

        let zero_population = OptimizerConfig {
            population_size: 0,
            ..OptimizerConfig::default()
        };
        assert_eq!(zero_population.validate(), Err(ConfigError::EmptyPopulation));

        let zero_generations = OptimizerConfig {
            number_of_generations: 0,
            ..OptimizerConfig::default()
        };
        assert_eq!(zero_generations.validate(), Err(ConfigError::ZeroGenerations));
    }

    #[test]
    fn test_genetic_needs_even_population() {
        let config = OptimizerConfig {
            population_size: 7,
            ..OptimizerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OddPopulation { population_size: 7 })
        );

        let hill_climber = OptimizerConfig {
            population_size: 7,
            algorithm: AlgorithmConfig::HillClimber,
            ..OptimizerConfig::default()
        };
        assert!(hill_climber.validate().is_ok());
    }

    #[test]
    fn test_tournament_must_fit_population() {
        let config = OptimizerConfig {
            population_size: 4,
            algorithm: AlgorithmConfig::Genetic {
                tournament_size: 5,
                selection: SelectionKind::Tournament,
            },
            ..OptimizerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TournamentTooLarge {
                tournament_size: 5,
                population_size: 4
            })
        );
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let config = OptimizerConfig {
            blue: PopulationParams {
                crossover_probability: 1.5,
                ..PopulationParams::default()
            },
            ..OptimizerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidProbability {
                role: Role::Blue,
                parameter: "crossover probability",
                value: 1.5
            })
        );
    }

    #[test]
    fn test_hill_climber_from_json() {
        let config: OptimizerConfig =
            serde_json::from_str(r#"{ "algorithm": { "kind": "hill_climber" }, "mutation": "random" }"#)
                .unwrap();
        assert_eq!(config.algorithm, AlgorithmConfig::HillClimber);
        assert_eq!(config.algorithm.strategy(), SearchStrategy::HillClimber);
        assert_eq!(config.mutation, MutationKind::Random);
        assert_eq!(config.population_size, DEFAULT_POPULATION_SIZE);
    }

    #[test]
    fn test_solo_runs_only_red() {
        let config: OptimizerConfig = serde_json::from_str(r#"{ "match_mode": "solo" }"#).unwrap();
        assert_eq!(config.active_roles(), [Role::Red]);
        assert_eq!(OptimizerConfig::default().active_roles(), Role::ALL);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Red.to_string(), "red");
        assert_eq!(Role::Blue.to_string(), "blue");
    }
}
