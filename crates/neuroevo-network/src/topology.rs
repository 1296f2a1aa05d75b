use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::TopologyError;

/// Layer sizes of a feed-forward network, input layer first.
///
/// A topology is validated once on construction (at least two layers, no empty
/// layer) and is immutable afterwards. Clones share the same buffer, so every
/// individual of a population can hold the topology of the optimizer that created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology(Arc<[usize]>);

impl Topology {
    /// Creates a topology from layer sizes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use neuroevo_network::{Topology, TopologyError};
    /// let topology = Topology::new(&[3, 4, 2]).unwrap();
    /// assert_eq!(topology.genotype_len(), 3 * 4 + 4 * 2);
    ///
    /// assert_eq!(Topology::new(&[3]), Err(TopologyError::TooFewLayers { len: 1 }));
    /// assert_eq!(Topology::new(&[3, 0, 2]), Err(TopologyError::EmptyLayer { index: 1 }));
    /// ```
    pub fn new(layers: &[usize]) -> Result<Self, TopologyError> {
        if layers.len() < 2 {
            return Err(TopologyError::TooFewLayers { len: layers.len() });
        }
        if let Some(index) = layers.iter().position(|&n| n == 0) {
            return Err(TopologyError::EmptyLayer { index });
        }
        Ok(Self(layers.into()))
    }

    #[must_use]
    pub fn layers(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.0[0]
    }

    #[must_use]
    pub fn output_len(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Returns `(source, destination)` neuron counts of every layer transition.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// Number of weights (and therefore genes) needed for this topology.
    #[must_use]
    pub fn genotype_len(&self) -> usize {
        self.transitions().map(|(from, to)| from * to).sum()
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = TopologyError;

    fn try_from(layers: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(&layers)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Self {
        topology.0.to_vec()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.layers())
    }
}
