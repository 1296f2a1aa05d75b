//! Fixed-topology feed-forward networks used as evolved controllers.
//!
//! A [`NeuralNetwork`] is the phenotype of an evolved individual: a fully connected
//! network whose only parameters are its connection weights. The weights are stored
//! as a single flat buffer in a fixed traversal order so that a genotype (a flat list
//! of genes) maps onto the network without any translation table.
//!
//! # Weight Order
//!
//! For every layer transition `i`, for every source neuron `j`, for every destination
//! neuron `k`, the weight `w[i][j][k]` is stored contiguously:
//!
//! ```text
//! topology [2, 2, 1]
//!
//! index:   0      1      2      3      4      5
//! weight:  w0,0,0 w0,0,1 w0,1,0 w0,1,1 w1,0,0 w1,1,0
//! ```
//!
//! The same order is used by [`NeuralNetwork::map_from_linear`],
//! [`NeuralNetwork::to_linear`] and the persisted form, so a controller saved by one
//! run can seed the genotype of another.
//!
//! # Forward Pass
//!
//! Hidden layers use a leaky rectifier `max(0.01x, x)`; the output layer is squashed
//! with `tanh` and kept strictly inside `(-1, 1)`, also where `tanh` saturates in `f32`.
//!
//! # Example
//!
//! ```
//! use neuroevo_network::{NeuralNetwork, Topology};
//!
//! let topology = Topology::new(&[2, 2, 1]).unwrap();
//! let network = NeuralNetwork::from_linear(topology, &[0.5; 6]).unwrap();
//! let output = network.process(&[1.0, 1.0]);
//! assert_eq!(output.len(), 1);
//! assert!((output[0] - 1.0_f32.tanh()).abs() < 1e-6);
//! ```

pub use self::{error::*, network::*, topology::*};

mod error;
mod network;
mod topology;
