use crate::core::models::topology::Topology;
use std::error::Error;
use thiserror::Error;

/// The interface an energy model exposes to the search machinery.
///
/// Implementors own whatever scratch buffers they need for evaluation; callers pass a
/// borrowed coordinate slice and must not assume anything about internal state between
/// calls. Evaluation errors are propagated to the caller unmodified.
pub trait Potential {
    /// The error type for out-of-domain coordinates or backend failures.
    type Error: Error + Send + Sync + 'static;

    /// The parsed covalent topology the potential was built from.
    fn topology(&self) -> &Topology;

    /// Evaluates the potential energy of a conformation.
    fn energy(&self, coords: &[f64]) -> Result<f64, Self::Error>;

    /// Evaluates the energy together with its gradient (same length as `coords`).
    fn energy_gradient(&self, coords: &[f64]) -> Result<(f64, Vec<f64>), Self::Error>;

    /// Central-difference gradient, used to validate `energy_gradient`.
    ///
    /// Costs `2 * coords.len()` energy evaluations.
    fn numerical_gradient(&self, coords: &[f64], eps: f64) -> Result<Vec<f64>, Self::Error> {
        let mut displaced = coords.to_vec();
        let mut gradient = Vec::with_capacity(coords.len());
        for i in 0..coords.len() {
            displaced[i] = coords[i] + eps;
            let forward = self.energy(&displaced)?;
            displaced[i] = coords[i] - eps;
            let backward = self.energy(&displaced)?;
            displaced[i] = coords[i];
            gradient.push((forward - backward) / (2.0 * eps));
        }
        Ok(gradient)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("No energy model is attached to this structure")]
pub struct NoEnergyModel;

/// A structure that carries a topology but no energy model.
///
/// Indexing, validity checking and job spawning only need the topology; this lets them run
/// from a parameter file alone. Every energy call fails with [`NoEnergyModel`].
#[derive(Debug, Clone)]
pub struct TopologyOnly {
    topology: Topology,
}

impl TopologyOnly {
    pub fn new(topology: Topology) -> Self {
        Self { topology }
    }
}

impl Potential for TopologyOnly {
    type Error = NoEnergyModel;

    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn energy(&self, _coords: &[f64]) -> Result<f64, NoEnergyModel> {
        Err(NoEnergyModel)
    }

    fn energy_gradient(&self, _coords: &[f64]) -> Result<(f64, Vec<f64>), NoEnergyModel> {
        Err(NoEnergyModel)
    }
}
