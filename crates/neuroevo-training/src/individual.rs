//! Candidate controllers: a genotype plus fitness bookkeeping.
//!
//! An [`Individual`] owns a flat gene vector that maps one-to-one onto the weights of
//! a [`NeuralNetwork`] with the population's [`Topology`]. The search strategy the
//! individual belongs to is a tag ([`SearchStrategy`]) and the genetic operators in
//! [`genes`](crate::genes) are dispatched on it, together with the configured
//! [`MutationKind`].
//!
//! # Fitness
//!
//! Fitness is the arithmetic mean of a fixed number of evaluation rounds. Scores may
//! arrive in any order from concurrently running simulations; once the configured
//! number of scores has been recorded the individual is marked evaluated and its
//! fitness is stable until it is re-armed with [`Individual::reset_evaluations`].
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use neuroevo_network::Topology;
//! use neuroevo_training::{Individual, MutationKind, SearchStrategy};
//!
//! let topology = Topology::new(&[2, 1]).unwrap();
//! let evaluations = NonZeroUsize::new(2).unwrap();
//! let mut individual =
//!     Individual::new(topology, evaluations, SearchStrategy::Genetic, MutationKind::Gaussian);
//!
//! individual.set_evaluation(3.0).unwrap();
//! assert!(!individual.is_evaluated());
//! individual.set_evaluation(5.0).unwrap();
//! assert!(individual.is_evaluated());
//! assert_eq!(individual.fitness(), 4.0);
//! ```

use std::{fmt, num::NonZeroUsize};

use neuroevo_network::{NeuralNetwork, Topology};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{EvaluationError, TopologyMismatchError, genes};

/// How genes are perturbed by [`Individual::mutate`].
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// Replace the gene by a fresh uniform value in `[-1, 1]`.
    Random,
    /// Add zero-mean Gaussian noise with the strategy's standard deviation.
    #[default]
    Gaussian,
}

/// The search strategy an individual belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum SearchStrategy {
    /// Generational genetic algorithm: wide Gaussian steps, single-point crossover.
    Genetic,
    /// Local search: narrow Gaussian steps, no crossover.
    HillClimber,
}

impl SearchStrategy {
    /// Standard deviation of the Gaussian mutation noise.
    #[must_use]
    pub const fn gaussian_sigma(self) -> f32 {
        match self {
            Self::Genetic => 0.5,
            Self::HillClimber => 0.2,
        }
    }
}

/// One candidate solution.
///
/// The derived [`Clone`] is a full snapshot (fitness, evaluation state and all);
/// [`Individual::fresh_clone`] is the copy used to breed the next generation.
#[derive(Debug, Clone)]
pub struct Individual {
    genes: Vec<f32>,
    topology: Topology,
    strategy: SearchStrategy,
    mutation: MutationKind,
    required_evaluations: NonZeroUsize,
    pending_scores: Vec<f32>,
    fitness: f32,
    evaluated: bool,
    phenotype: Option<NeuralNetwork>,
}

impl Individual {
    /// Creates an individual with all genes set to zero.
    #[must_use]
    pub fn new(
        topology: Topology,
        required_evaluations: NonZeroUsize,
        strategy: SearchStrategy,
        mutation: MutationKind,
    ) -> Self {
        Self {
            genes: vec![0.0; topology.genotype_len()],
            topology,
            strategy,
            mutation,
            required_evaluations,
            pending_scores: Vec::with_capacity(required_evaluations.get()),
            fitness: 0.0,
            evaluated: false,
            phenotype: None,
        }
    }

    /// Fills the genotype with values drawn uniformly from `[-1, 1]`.
    pub fn initialize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.genes = genes::random(rng, self.topology.genotype_len());
        self.phenotype = None;
    }

    /// Seeds the genotype from an existing network's weights.
    pub fn initialize_from(&mut self, network: &NeuralNetwork) -> Result<(), TopologyMismatchError> {
        if network.topology() != &self.topology {
            return Err(TopologyMismatchError {
                expected: self.topology.clone(),
                actual: network.topology().clone(),
            });
        }
        self.genes.copy_from_slice(network.weights());
        self.phenotype = None;
        Ok(())
    }

    /// Mutates each gene independently with probability `probability`.
    pub fn mutate<R>(&mut self, probability: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self.mutation {
            MutationKind::Random => genes::mutate_reset(&mut self.genes, probability, rng),
            MutationKind::Gaussian => genes::mutate_gaussian(
                &mut self.genes,
                probability,
                self.strategy.gaussian_sigma(),
                rng,
            ),
        }
        self.phenotype = None;
    }

    /// Recombines with `partner` with probability `probability`.
    ///
    /// For the genetic strategy this is a single-point crossover that overwrites
    /// *both* individuals with the two children. Hill climbers never recombine.
    pub fn crossover<R>(&mut self, partner: &mut Individual, probability: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self.strategy {
            SearchStrategy::Genetic => {
                if genes::single_point_crossover(&mut self.genes, &mut partner.genes, probability, rng)
                {
                    self.phenotype = None;
                    partner.phenotype = None;
                }
            }
            SearchStrategy::HillClimber => {}
        }
    }

    /// Returns an independent copy for breeding.
    ///
    /// The genotype is duplicated and the last fitness is carried over, but the copy is
    /// not evaluated and has no pending scores.
    #[must_use]
    pub fn fresh_clone(&self) -> Self {
        Self {
            genes: self.genes.clone(),
            topology: self.topology.clone(),
            strategy: self.strategy,
            mutation: self.mutation,
            required_evaluations: self.required_evaluations,
            pending_scores: Vec::with_capacity(self.required_evaluations.get()),
            fitness: self.fitness,
            evaluated: false,
            phenotype: None,
        }
    }

    /// Records the score of one evaluation round.
    ///
    /// When the configured number of scores is reached, fitness becomes their mean and
    /// the individual is marked evaluated. Reporting another score before
    /// [`reset_evaluations`](Self::reset_evaluations) is rejected.
    pub fn set_evaluation(&mut self, score: f32) -> Result<(), EvaluationError> {
        if self.evaluated {
            return Err(EvaluationError::AlreadyEvaluated {
                required: self.required_evaluations.get(),
            });
        }
        self.pending_scores.push(score);
        if self.pending_scores.len() == self.required_evaluations.get() {
            #[expect(clippy::cast_precision_loss)]
            let n = self.pending_scores.len() as f32;
            self.fitness = self.pending_scores.iter().sum::<f32>() / n;
            self.evaluated = true;
            self.pending_scores.clear();
        }
        Ok(())
    }

    /// Discards pending scores and marks the individual as not evaluated.
    ///
    /// The last fitness is kept until the next full round completes.
    pub fn reset_evaluations(&mut self) {
        self.pending_scores.clear();
        self.evaluated = false;
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    #[must_use]
    pub fn pending_evaluations(&self) -> usize {
        self.pending_scores.len()
    }

    #[must_use]
    pub fn required_evaluations(&self) -> NonZeroUsize {
        self.required_evaluations
    }

    #[must_use]
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    #[must_use]
    pub fn mutation(&self) -> MutationKind {
        self.mutation
    }

    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[must_use]
    pub fn genes(&self) -> &[f32] {
        &self.genes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    #[must_use]
    pub fn gene(&self, index: usize) -> f32 {
        self.genes[index]
    }

    pub fn set_gene(&mut self, index: usize, value: f32) {
        self.genes[index] = value;
        self.phenotype = None;
    }

    /// Returns the network for the current genotype, rebuilding it if stale.
    pub fn phenotype(&mut self) -> &NeuralNetwork {
        let network = match self.phenotype.take() {
            Some(network) => network,
            None => self.to_network(),
        };
        self.phenotype.insert(network)
    }

    /// Returns the cached network, if one was built since the last genotype change.
    #[must_use]
    pub fn cached_phenotype(&self) -> Option<&NeuralNetwork> {
        self.phenotype.as_ref()
    }

    /// Builds a network from the current genotype without touching the cache.
    #[must_use]
    pub fn to_network(&self) -> NeuralNetwork {
        NeuralNetwork::from_linear(self.topology.clone(), &self.genes)
            .expect("genotype length always matches the topology")
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{} individual] fitness {}", self.strategy, self.fitness)?;
        writeln!(f, "genes: {:?}", self.genes)?;
        writeln!(f, "network {}:", self.topology)?;
        match &self.phenotype {
            Some(network) => write!(f, "{network}"),
            None => write!(f, "{}", self.to_network()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;
    use crate::EvoRng;

    fn individual(strategy: SearchStrategy, mutation: MutationKind, evaluations: usize) -> Individual {
        let topology = Topology::new(&[3, 4, 2]).unwrap();
        Individual::new(
            topology,
            NonZeroUsize::new(evaluations).unwrap(),
            strategy,
            mutation,
        )
    }

    #[test]
    fn test_fitness_is_mean_of_scores() {
        let mut ind = individual(SearchStrategy::Genetic, MutationKind::Gaussian, 3);
        ind.set_evaluation(1.0).unwrap();
        ind.set_evaluation(2.0).unwrap();
        assert!(!ind.is_evaluated());
        assert_eq!(ind.pending_evaluations(), 2);
        ind.set_evaluation(6.0).unwrap();
        assert!(ind.is_evaluated());
        assert_eq!(ind.pending_evaluations(), 0);
        assert_eq!(ind.fitness(), 3.0);
    }

    #[test]
    fn test_over_evaluation_is_rejected() {
        let mut ind = individual(SearchStrategy::Genetic, MutationKind::Gaussian, 1);
        ind.set_evaluation(4.0).unwrap();
        assert_eq!(
            ind.set_evaluation(100.0),
            Err(EvaluationError::AlreadyEvaluated { required: 1 })
        );
        assert_eq!(ind.fitness(), 4.0);

        ind.reset_evaluations();
        ind.set_evaluation(8.0).unwrap();
        assert_eq!(ind.fitness(), 8.0);
    }

    #[test]
    fn test_fresh_clone_resets_evaluation_state() {
        let mut rng = EvoRng::seed_from_u64(0);
        let mut ind = individual(SearchStrategy::Genetic, MutationKind::Gaussian, 2);
        ind.initialize(&mut rng);
        ind.set_evaluation(1.0).unwrap();
        ind.set_evaluation(3.0).unwrap();

        let mut clone = ind.fresh_clone();
        assert_eq!(clone.genes(), ind.genes());
        assert_eq!(clone.fitness(), 2.0);
        assert!(!clone.is_evaluated());
        assert_eq!(clone.pending_evaluations(), 0);

        clone.set_gene(0, 42.0);
        assert_ne!(ind.gene(0), 42.0);
    }

    #[test]
    fn test_initialize_from_network_roundtrip() {
        let mut rng = EvoRng::seed_from_u64(1);
        let mut ind = individual(SearchStrategy::HillClimber, MutationKind::Random, 1);
        let network = NeuralNetwork::random(ind.topology().clone(), &mut rng);
        ind.initialize_from(&network).unwrap();
        assert_eq!(ind.genes(), network.weights());
        assert_eq!(ind.to_network(), network);
    }

    #[test]
    fn test_initialize_from_rejects_other_topology() {
        let mut ind = individual(SearchStrategy::Genetic, MutationKind::Gaussian, 1);
        // same gene count, different shape
        let other = NeuralNetwork::zeroed(Topology::new(&[4, 2, 6]).unwrap());
        assert_eq!(other.weights().len(), ind.len());
        assert!(ind.initialize_from(&other).is_err());
    }

    #[test]
    fn test_mutation_invalidates_phenotype() {
        let mut rng = EvoRng::seed_from_u64(2);
        let mut ind = individual(SearchStrategy::Genetic, MutationKind::Gaussian, 1);
        ind.initialize(&mut rng);
        let before = ind.phenotype().clone();
        assert!(ind.cached_phenotype().is_some());

        ind.mutate(1.0, &mut rng);
        assert!(ind.cached_phenotype().is_none());
        assert_ne!(ind.phenotype(), &before);
        let weights = ind.phenotype().weights().to_vec();
        assert_eq!(weights, ind.genes());
    }

    #[test]
    fn test_genetic_crossover_overwrites_both_parents() {
        let mut rng = EvoRng::seed_from_u64(3);
        let mut a = individual(SearchStrategy::Genetic, MutationKind::Gaussian, 1);
        let mut b = individual(SearchStrategy::Genetic, MutationKind::Gaussian, 1);
        for i in 0..a.len() {
            a.set_gene(i, 1.0);
            b.set_gene(i, -1.0);
        }
        a.phenotype();
        b.phenotype();

        a.crossover(&mut b, 1.0, &mut rng);
        assert_eq!(a.gene(0), -1.0);
        assert_eq!(b.gene(0), 1.0);
        assert_eq!(a.gene(a.len() - 1), 1.0);
        assert_eq!(b.gene(b.len() - 1), -1.0);
        assert!(a.cached_phenotype().is_none());
        assert!(b.cached_phenotype().is_none());
    }

    #[test]
    fn test_hill_climber_crossover_is_noop() {
        let mut rng = EvoRng::seed_from_u64(4);
        let mut a = individual(SearchStrategy::HillClimber, MutationKind::Gaussian, 1);
        let mut b = individual(SearchStrategy::HillClimber, MutationKind::Gaussian, 1);
        a.initialize(&mut rng);
        b.initialize(&mut rng);
        let (ga, gb) = (a.genes().to_vec(), b.genes().to_vec());
        a.crossover(&mut b, 1.0, &mut rng);
        assert_eq!(a.genes(), ga);
        assert_eq!(b.genes(), gb);
    }

    #[test]
    fn test_hill_climber_steps_are_narrower() {
        let spread = |strategy| {
            let mut rng = EvoRng::seed_from_u64(5);
            let mut ind = individual(strategy, MutationKind::Gaussian, 1);
            ind.mutate(1.0, &mut rng);
            ind.genes().iter().map(|g| g.abs()).sum::<f32>()
        };
        // identical draws scaled by 0.2 versus 0.5
        let genetic = spread(SearchStrategy::Genetic);
        let hill = spread(SearchStrategy::HillClimber);
        assert!((hill / genetic - 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_mutation_kind_from_str() {
        assert_eq!("gaussian".parse::<MutationKind>().unwrap(), MutationKind::Gaussian);
        assert_eq!("Random".parse::<MutationKind>().unwrap(), MutationKind::Random);
    }

    #[test]
    fn test_display_lists_genes_and_network() {
        let ind = individual(SearchStrategy::Genetic, MutationKind::Gaussian, 1);
        let text = ind.to_string();
        assert!(text.starts_with("[Genetic individual]"));
        assert!(text.contains("layer 1 neuron 3:"));
    }
}
