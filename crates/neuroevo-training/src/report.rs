//! Per-generation telemetry for the orchestrator.

use serde::{Deserialize, Serialize};

use crate::Individual;

/// Where an individual was seen: its generation and index in that population.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("gen {generation} #{index}")]
pub struct IndividualId {
    pub generation: usize,
    pub index: usize,
}

/// An owned snapshot of a best individual, independent from the live population.
#[derive(Debug, Clone)]
pub struct BestRecord {
    id: IndividualId,
    individual: Individual,
}

impl BestRecord {
    pub(crate) fn new(id: IndividualId, individual: Individual) -> Self {
        Self { id, individual }
    }

    #[must_use]
    pub fn id(&self) -> IndividualId {
        self.id
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.individual.fitness()
    }

    #[must_use]
    pub fn individual(&self) -> &Individual {
        &self.individual
    }

    #[must_use]
    pub fn summary(&self) -> BestSummary {
        BestSummary {
            id: self.id,
            fitness: self.fitness(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestSummary {
    pub id: IndividualId,
    pub fitness: f32,
}

/// Summary statistics of a population's fitness values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Population standard deviation.
    pub std_dev: f32,
}

impl FitnessStats {
    /// Returns `None` for an empty set of values.
    ///
    /// ```
    /// # use neuroevo_training::FitnessStats;
    /// let stats = FitnessStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(stats.min, 2.0);
    /// assert_eq!(stats.max, 9.0);
    /// assert_eq!(stats.mean, 5.0);
    /// assert_eq!(stats.std_dev, 2.0);
    /// assert!(FitnessStats::new([]).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let min = values.iter().copied().reduce(f32::min)?;
        let max = values.iter().copied().reduce(f32::max)?;
        #[expect(clippy::cast_precision_loss)]
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

/// Fitness summary of one population at the end of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationReport {
    pub average_fitness: f32,
    pub stats: FitnessStats,
    pub generation_best: BestSummary,
    pub overall_best: BestSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub red: PopulationReport,
    /// `None` in solo runs.
    pub blue: Option<PopulationReport>,
}
