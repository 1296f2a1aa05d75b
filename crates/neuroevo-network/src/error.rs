#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TopologyError {
    #[display("topology needs at least 2 layers, got {len}")]
    TooFewLayers { len: usize },
    #[display("layer {index} of the topology has no neurons")]
    EmptyLayer { index: usize },
}

/// A flat weight buffer does not fit the topology it is mapped onto.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("genotype has {actual} genes but the topology expects {expected}")]
pub struct GenotypeLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// The input vector does not match the number of neurons in the input layer.
///
/// This is recoverable: callers treat it as "no action this tick".
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("input has {actual} values but the input layer has {expected} neurons")]
pub struct InputLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// A persisted network record could not be turned back into a network.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum NetworkRecordError {
    #[display("invalid topology: {_0}")]
    Topology(TopologyError),
    #[display("invalid weights: {_0}")]
    Weights(GenotypeLengthError),
}
