//! Evaluation plans: which individuals meet in which game.
//!
//! A versus round pairs every red individual with exactly one blue individual, so
//! after `rounds` rounds every individual of both populations has played `rounds`
//! games, which is what [`Individual::set_evaluation`](crate::Individual::set_evaluation)
//! needs to complete its fitness. Red indices are reshuffled each round so a red
//! individual meets different opponents; blue indices stay in order.

use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

/// Whether games are played by both populations or by red alone.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Versus,
    Solo,
}

/// One game of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub round: usize,
    pub red: usize,
    /// `None` in solo games.
    pub blue: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSchedule {
    matchups: Vec<Matchup>,
}

impl EvaluationSchedule {
    /// Plans `rounds` versus rounds over populations of `population_size`.
    pub fn versus<R>(population_size: usize, rounds: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut matchups = Vec::with_capacity(population_size * rounds);
        for round in 0..rounds {
            let mut reds = (0..population_size).collect::<Vec<_>>();
            reds.shuffle(rng);
            matchups.extend(reds.into_iter().enumerate().map(|(blue, red)| Matchup {
                round,
                red,
                blue: Some(blue),
            }));
        }
        Self { matchups }
    }

    /// Plans `rounds` solo rounds, every red individual once per round, in order.
    #[must_use]
    pub fn solo(population_size: usize, rounds: usize) -> Self {
        let matchups = (0..rounds)
            .flat_map(|round| {
                (0..population_size).map(move |red| Matchup {
                    round,
                    red,
                    blue: None,
                })
            })
            .collect();
        Self { matchups }
    }

    #[must_use]
    pub fn matchups(&self) -> &[Matchup] {
        &self.matchups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matchups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Matchup> {
        self.matchups.iter()
    }
}

impl<'a> IntoIterator for &'a EvaluationSchedule {
    type Item = &'a Matchup;
    type IntoIter = std::slice::Iter<'a, Matchup>;

    fn into_iter(self) -> Self::IntoIter {
        self.matchups.iter()
    }
}
