use chrono::{DateTime, Utc};
use neuroevo_network::NeuralNetwork;
use neuroevo_training::{BestRecord, Role};
use serde::{Deserialize, Serialize};

/// A trained controller as saved by `train` and loaded by the other commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controller {
    pub role: Role,
    /// Generation the individual was evaluated in.
    pub generation: usize,
    pub fitness: f32,
    pub trained_at: DateTime<Utc>,
    pub network: NeuralNetwork,
}

impl Controller {
    pub fn from_best(role: Role, best: &BestRecord, trained_at: DateTime<Utc>) -> Self {
        Self {
            role,
            generation: best.id().generation,
            fitness: best.fitness(),
            trained_at,
            network: best.individual().to_network(),
        }
    }
}
