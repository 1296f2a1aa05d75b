//! Survivor selection strategies.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Individual};

/// Picks survivors from a scored population.
///
/// Implementations return `count` independent [fresh clones](Individual::fresh_clone),
/// possibly repeating the same parent, biased toward higher fitness.
pub trait SelectionMethod: fmt::Debug + Send + Sync {
    fn select(
        &self,
        population: &[Individual],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, ConfigError>;
}

pub type BoxedSelectionMethod = Box<dyn SelectionMethod>;

/// Selection strategy named in the optimizer configuration.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    #[default]
    Tournament,
}

impl SelectionKind {
    pub fn build(self, tournament_size: usize) -> Result<BoxedSelectionMethod, ConfigError> {
        match self {
            Self::Tournament => Ok(Box::new(TournamentSelection::new(tournament_size)?)),
        }
    }
}

/// Tournament selection with replacement.
///
/// Each survivor is the fittest of `tournament_size` individuals drawn uniformly with
/// replacement. Ties keep the first drawn individual.
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    pub fn new(tournament_size: usize) -> Result<Self, ConfigError> {
        if tournament_size == 0 {
            return Err(ConfigError::ZeroTournamentSize);
        }
        Ok(Self { tournament_size })
    }

    #[must_use]
    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    fn tournament<'a>(&self, population: &'a [Individual], rng: &mut dyn RngCore) -> &'a Individual {
        let mut best = &population[rng.random_range(0..population.len())];
        for _ in 1..self.tournament_size {
            let candidate = &population[rng.random_range(0..population.len())];
            if candidate.fitness() > best.fitness() {
                best = candidate;
            }
        }
        best
    }
}

impl SelectionMethod for TournamentSelection {
    fn select(
        &self,
        population: &[Individual],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, ConfigError> {
        if population.len() < self.tournament_size {
            return Err(ConfigError::TournamentTooLarge {
                tournament_size: self.tournament_size,
                population_size: population.len(),
            });
        }
        Ok((0..count)
            .map(|_| self.tournament(population, rng).fresh_clone())
            .collect())
    }
}
