//! Property-based tests for fitness bookkeeping, selection and the generation loop.

use std::num::NonZeroUsize;

use neuroevo_network::Topology;
use neuroevo_training::{
    AlgorithmConfig, EvoRng, Individual, MetaHeuristic, MutationKind,
    OptimizerConfig, PopulationParams, PopulationSeeds, Role, SearchStrategy, SelectionKind,
    SelectionMethod as _, TournamentSelection,
};
use proptest::prelude::*;
use rand::SeedableRng as _;

fn individual(evaluations: usize) -> Individual {
    Individual::new(
        Topology::new(&[2, 2]).unwrap(),
        NonZeroUsize::new(evaluations).unwrap(),
        SearchStrategy::Genetic,
        MutationKind::Gaussian,
    )
}

proptest! {
    #[test]
    fn fitness_is_mean_of_scores(scores in prop::collection::vec(-100.0f32..100.0, 1..10)) {
        let mut ind = individual(scores.len());
        for (i, &score) in scores.iter().enumerate() {
            prop_assert!(!ind.is_evaluated());
            prop_assert_eq!(ind.pending_evaluations(), i);
            ind.set_evaluation(score).unwrap();
        }
        prop_assert!(ind.is_evaluated());
        #[expect(clippy::cast_precision_loss)]
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        prop_assert!((ind.fitness() - mean).abs() < 1e-3);
        prop_assert!(ind.set_evaluation(0.0).is_err());
    }

    #[test]
    fn tournament_survivors_are_fresh_copies_of_parents(
        fitness in prop::collection::vec(-10.0f32..10.0, 2..12),
        tournament_size in 1usize..4,
        seed: u64,
    ) {
        prop_assume!(tournament_size <= fitness.len());
        let population = fitness
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let mut ind = individual(1);
                #[expect(clippy::cast_precision_loss)]
                let marker = i as f32;
                ind.set_gene(0, marker);
                ind.set_evaluation(f).unwrap();
                ind
            })
            .collect::<Vec<_>>();

        let selection = TournamentSelection::new(tournament_size).unwrap();
        let mut rng = EvoRng::seed_from_u64(seed);
        let survivors = selection.select(&population, population.len(), &mut rng).unwrap();
        prop_assert_eq!(survivors.len(), population.len());
        for survivor in &survivors {
            prop_assert!(!survivor.is_evaluated());
            prop_assert!(population.iter().any(|p| p.genes() == survivor.genes()));
        }
    }

    #[test]
    fn elitist_best_never_regresses(seed: u64, mutation_probability in 0.0f32..0.5) {
        let params = PopulationParams {
            mutation_probability,
            ..PopulationParams::default()
        };
        let config = OptimizerConfig {
            topology: vec![2, 2, 1],
            population_size: 8,
            number_of_generations: 6,
            evaluations_per_individual: 1,
            algorithm: AlgorithmConfig::Genetic {
                tournament_size: 2,
                selection: SelectionKind::Tournament,
            },
            red: params,
            blue: params,
            ..OptimizerConfig::default()
        };
        let mut optimizer = MetaHeuristic::new(config, seed).unwrap();
        optimizer.init_population(&PopulationSeeds::default()).unwrap();

        while !optimizer.is_finished() {
            for matchup in &optimizer.evaluation_schedule() {
                let red = optimizer.population(Role::Red)[matchup.red].gene(0);
                let blue = matchup.blue.map(|i| -optimizer.population(Role::Blue)[i].gene(0));
                optimizer.record_match(matchup, red, blue).unwrap();
            }
            optimizer.step().unwrap();
        }

        for role in Role::ALL {
            let overall = optimizer
                .history()
                .iter()
                .filter_map(|report| match role {
                    Role::Red => Some(report.red),
                    Role::Blue => report.blue,
                })
                .map(|population| population.overall_best.fitness)
                .collect::<Vec<_>>();
            prop_assert!(overall.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
