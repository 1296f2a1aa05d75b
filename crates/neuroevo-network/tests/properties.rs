//! Property-based tests for the genotype/phenotype mapping and the forward pass.

use neuroevo_network::{NeuralNetwork, Topology};
use proptest::prelude::*;

/// Topologies paired with a genotype of exactly the right length.
fn topology_and_genes(
    max_layers: usize,
    max_neurons: usize,
    gene_range: f32,
) -> impl Strategy<Value = (Topology, Vec<f32>)> {
    prop::collection::vec(1..=max_neurons, 2..=max_layers).prop_flat_map(move |layers| {
        let topology = Topology::new(&layers).unwrap();
        let len = topology.genotype_len();
        (
            Just(topology),
            prop::collection::vec(-gene_range..gene_range, len),
        )
    })
}

proptest! {
    #[test]
    fn linear_mapping_roundtrip((topology, genes) in topology_and_genes(5, 6, 10.0)) {
        let network = NeuralNetwork::from_linear(topology, &genes).unwrap();
        prop_assert_eq!(network.to_linear(), genes);
    }

    #[test]
    fn wrong_length_genotype_is_rejected(
        (topology, mut genes) in topology_and_genes(4, 5, 1.0),
        extra in 1usize..4,
    ) {
        genes.extend(std::iter::repeat_n(0.0, extra));
        prop_assert!(NeuralNetwork::from_linear(topology, &genes).is_err());
    }

    #[test]
    fn output_has_output_layer_len_and_tanh_range(
        (topology, genes) in topology_and_genes(4, 3, 0.5),
        seed_inputs in prop::collection::vec(-1.0f32..1.0, 3),
    ) {
        let input = seed_inputs[..topology.input_len()].to_vec();
        let network = NeuralNetwork::from_linear(topology.clone(), &genes).unwrap();
        let output = network.process(&input);
        prop_assert_eq!(output.len(), topology.output_len());
        for v in output {
            prop_assert!(-1.0 < v && v < 1.0, "{v} outside (-1, 1)");
        }
    }

    #[test]
    fn saturating_output_stays_inside_open_range(
        (topology, genes) in topology_and_genes(4, 3, 100.0),
        seed_inputs in prop::collection::vec(-1000.0f32..1000.0, 3),
    ) {
        let input = &seed_inputs[..topology.input_len()];
        let network = NeuralNetwork::from_linear(topology, &genes).unwrap();
        for v in network.process(input) {
            prop_assert!(-1.0 < v && v < 1.0, "{v} outside (-1, 1)");
        }
    }

    #[test]
    fn mismatched_input_yields_empty_output(
        (topology, genes) in topology_and_genes(4, 4, 1.0),
        len in 0usize..8,
    ) {
        prop_assume!(len != topology.input_len());
        let network = NeuralNetwork::from_linear(topology, &genes).unwrap();
        prop_assert!(network.process(&vec![0.5; len]).is_empty());
    }

    #[test]
    fn forward_pass_is_deterministic(
        (topology, genes) in topology_and_genes(4, 4, 1.0),
        inputs in prop::collection::vec(-5.0f32..5.0, 4),
    ) {
        let input = &inputs[..topology.input_len()];
        let network = NeuralNetwork::from_linear(topology, &genes).unwrap();
        prop_assert_eq!(network.process(input), network.process(input));
    }
}
