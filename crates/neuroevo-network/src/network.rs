use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{GenotypeLengthError, InputLengthError, NetworkRecordError, Topology};

const LEAKY_SLOPE: f32 = 0.01;
/// Largest `f32` below `1.0`. `tanh` rounds to `±1.0` for large pre-activations.
const OUTPUT_BOUND: f32 = 1.0 - f32::EPSILON / 2.0;

/// A fully connected feed-forward network with a flat weight encoding.
///
/// The forward pass is a pure function of the weights and the input; the network
/// keeps no state between calls.
///
/// The serialized form is the topology plus the flat weight buffer:
///
/// ```json
/// { "topology": [2, 2, 1], "weights": [0.5, 0.5, 0.5, 0.5, 0.5, 0.5] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkRecord", into = "NetworkRecord")]
pub struct NeuralNetwork {
    topology: Topology,
    weights: Vec<f32>,
}

impl NeuralNetwork {
    /// Creates a network with every weight set to zero.
    #[must_use]
    pub fn zeroed(topology: Topology) -> Self {
        let weights = vec![0.0; topology.genotype_len()];
        Self { topology, weights }
    }

    /// Creates a network with weights drawn uniformly from `[-0.5, 0.5)`.
    pub fn random<R>(topology: Topology, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = (0..topology.genotype_len())
            .map(|_| rng.random_range(-0.5..0.5))
            .collect();
        Self { topology, weights }
    }

    /// Creates a network from a flat weight buffer in the fixed index order.
    pub fn from_linear(topology: Topology, genes: &[f32]) -> Result<Self, GenotypeLengthError> {
        let mut network = Self::zeroed(topology);
        network.map_from_linear(genes)?;
        Ok(network)
    }

    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Overwrites every weight from a flat buffer in the fixed index order.
    ///
    /// On a length mismatch the weights are left untouched.
    pub fn map_from_linear(&mut self, genes: &[f32]) -> Result<(), GenotypeLengthError> {
        if genes.len() != self.weights.len() {
            return Err(GenotypeLengthError {
                expected: self.weights.len(),
                actual: genes.len(),
            });
        }
        self.weights.copy_from_slice(genes);
        Ok(())
    }

    /// Returns the weights flattened in the fixed index order.
    #[must_use]
    pub fn to_linear(&self) -> Vec<f32> {
        self.weights.clone()
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Returns `w[layer][from][to]`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range for the topology.
    #[must_use]
    pub fn weight(&self, layer: usize, from: usize, to: usize) -> f32 {
        let (rows, cols) = self
            .topology
            .transitions()
            .nth(layer)
            .expect("layer index out of range");
        assert!(from < rows && to < cols, "neuron index out of range");
        self.layer_weights(layer)[from * cols + to]
    }

    fn layer_weights(&self, layer: usize) -> &[f32] {
        let mut offset = 0;
        for (i, (from, to)) in self.topology.transitions().enumerate() {
            if i == layer {
                return &self.weights[offset..offset + from * to];
            }
            offset += from * to;
        }
        &[]
    }

    /// Runs a forward pass.
    ///
    /// Returns an empty vector when the input length does not match the input
    /// layer; callers treat that as "skip this step".
    #[must_use]
    pub fn process(&self, input: &[f32]) -> Vec<f32> {
        self.try_process(input).unwrap_or_else(|e| {
            tracing::debug!("skipping forward pass: {e}");
            vec![]
        })
    }

    /// Runs a forward pass, reporting an input length mismatch as an error.
    pub fn try_process(&self, input: &[f32]) -> Result<Vec<f32>, InputLengthError> {
        let expected = self.topology.input_len();
        if input.len() != expected {
            return Err(InputLengthError {
                expected,
                actual: input.len(),
            });
        }

        let last_layer = self.topology.layer_count() - 2;
        let mut activations = input.to_vec();
        let mut offset = 0;
        for (layer, (from, to)) in self.topology.transitions().enumerate() {
            let weights = &self.weights[offset..offset + from * to];
            offset += from * to;

            let mut outputs = vec![0.0; to];
            for (x, row) in activations.iter().zip(weights.chunks_exact(to)) {
                for (out, w) in outputs.iter_mut().zip(row) {
                    *out += x * w;
                }
            }
            if layer < last_layer {
                for out in &mut outputs {
                    *out = f32::max(LEAKY_SLOPE * *out, *out);
                }
            }
            activations = outputs;
        }

        for out in &mut activations {
            *out = out.tanh().clamp(-OUTPUT_BOUND, OUTPUT_BOUND);
        }
        Ok(activations)
    }
}

impl fmt::Display for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (layer, (_, to)) in self.topology.transitions().enumerate() {
            for (from, row) in self.layer_weights(layer).chunks_exact(to).enumerate() {
                write!(f, "layer {layer} neuron {from}:")?;
                for w in row {
                    write!(f, " {w}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Persisted form of a network: the topology and the flat weight buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub topology: Vec<usize>,
    pub weights: Vec<f32>,
}

impl TryFrom<NetworkRecord> for NeuralNetwork {
    type Error = NetworkRecordError;

    fn try_from(record: NetworkRecord) -> Result<Self, Self::Error> {
        let topology = Topology::new(&record.topology)?;
        Ok(Self::from_linear(topology, &record.weights)?)
    }
}

impl From<NeuralNetwork> for NetworkRecord {
    fn from(network: NeuralNetwork) -> Self {
        Self {
            topology: network.topology.into(),
            weights: network.weights,
        }
    }
}
