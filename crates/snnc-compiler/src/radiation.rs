//! Fault injection: marks neurons dead before simulation
//!
//! A dead neuron keeps its state frozen and never emits a spike, so its
//! outgoing synapses are silent too.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snnc_ir::{keys, NeuronId, SnnGraph};

use crate::config::{validate_probability, RadiationConfig};
use crate::passes::Pass;
use crate::{CompilerError, Result, StructuralError};

/// Chooses which neurons of a graph die
pub trait FaultPlacement {
    /// Placement name for logs
    fn name(&self) -> &'static str;
    /// Neurons to kill
    fn select(&self, graph: &SnnGraph) -> Result<BTreeSet<NeuronId>>;
}

/// Kills exactly the named neurons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitPlacement {
    neurons: Vec<NeuronId>,
}

impl ExplicitPlacement {
    /// Placement over the given neurons
    pub fn new(neurons: Vec<NeuronId>) -> Self {
        Self { neurons }
    }
}

impl FaultPlacement for ExplicitPlacement {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn select(&self, graph: &SnnGraph) -> Result<BTreeSet<NeuronId>> {
        self.neurons
            .iter()
            .map(|id| {
                if graph.contains(id) {
                    Ok(*id)
                } else {
                    Err(CompilerError::from(StructuralError::UnknownNeuron(id.to_string())))
                }
            })
            .collect()
    }
}

/// Each neuron dies independently with `probability`.
/// Draws happen in neuron id order, so a seed fixes the placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomNeuronDeath {
    probability: f64,
    seed: u64,
}

impl RandomNeuronDeath {
    /// `probability` must lie in [0, 1]
    pub fn new(probability: f64, seed: u64) -> Result<Self> {
        validate_probability(probability)?;
        Ok(Self { probability, seed })
    }
}

impl FaultPlacement for RandomNeuronDeath {
    fn name(&self) -> &'static str {
        "neuron_death"
    }

    fn select(&self, graph: &SnnGraph) -> Result<BTreeSet<NeuronId>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok(graph
            .neuron_ids()
            .into_iter()
            .filter(|_| rng.gen_bool(self.probability))
            .collect())
    }
}

/// Applies a fault placement, writing `rad_death` onto every neuron
pub struct RadiationPass {
    placement: Box<dyn FaultPlacement>,
}

impl RadiationPass {
    /// Pass over an arbitrary placement
    pub fn new(placement: Box<dyn FaultPlacement>) -> Self {
        Self { placement }
    }

    /// Pass for a validated radiation configuration; `seed` drives random placement
    pub fn from_config(config: &RadiationConfig, seed: u64) -> Result<Self> {
        let placement: Box<dyn FaultPlacement> = match config {
            RadiationConfig::NeuronDeath { probability } => Box::new(RandomNeuronDeath::new(*probability, seed)?),
            RadiationConfig::Explicit { neurons } => Box::new(ExplicitPlacement::new(neurons.clone())),
        };
        Ok(Self::new(placement))
    }
}

impl Pass for RadiationPass {
    fn name(&self) -> &'static str {
        "radiation"
    }

    fn apply(&self, mut graph: SnnGraph) -> Result<SnnGraph> {
        if graph.neurons().any(|(_, attrs)| attrs.contains_key(keys::RAD_DEATH)) {
            return Err(StructuralError::AlreadyIrradiated.into());
        }

        let dead = self.placement.select(&graph)?;
        for (id, attrs) in graph.neurons_mut() {
            attrs.insert(keys::RAD_DEATH.into(), dead.contains(id).into());
        }

        if dead.is_empty() {
            log::warn!("Fault placement '{}' killed no neurons", self.placement.name());
        } else {
            log::info!(
                "Fault placement '{}' killed {} of {} neurons",
                self.placement.name(),
                dead.len(),
                graph.neuron_count()
            );
            log::debug!("dead neurons: {:?}", dead.iter().map(ToString::to_string).collect::<Vec<_>>());
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{input_graph, AlgProps};
    use crate::mdsa;
    use snnc_ir::AttributeValue;

    fn compiled() -> SnnGraph {
        mdsa::compile(&input_graph(3, 0).unwrap(), &AlgProps::from_seed(3, 2), 1).unwrap()
    }

    fn dead_set(g: &SnnGraph) -> Vec<NeuronId> {
        g.neurons()
            .filter(|(_, attrs)| attrs[keys::RAD_DEATH] == AttributeValue::Bool(true))
            .map(|(id, _)| *id)
            .collect()
    }

    #[test]
    fn explicit_marks_every_neuron() {
        let pass = RadiationPass::new(Box::new(ExplicitPlacement::new(vec![NeuronId::counter(1, 1)])));
        let g = pass.apply(compiled()).unwrap();
        assert!(g.neurons().all(|(_, attrs)| attrs.contains_key(keys::RAD_DEATH)));
        assert_eq!(dead_set(&g), vec![NeuronId::counter(1, 1)]);
    }

    #[test]
    fn explicit_unknown_neuron_is_structural() {
        let pass = RadiationPass::new(Box::new(ExplicitPlacement::new(vec![NeuronId::counter(9, 0)])));
        let err = pass.apply(compiled()).unwrap_err();
        assert_eq!(err, CompilerError::Structural(StructuralError::UnknownNeuron("counter_9_0".into())));
    }

    #[test]
    fn random_placement_is_seeded() {
        let pass = |seed| RadiationPass::from_config(&RadiationConfig::NeuronDeath { probability: 0.3 }, seed).unwrap();
        let a = pass(7).apply(compiled()).unwrap();
        let b = pass(7).apply(compiled()).unwrap();
        assert_eq!(dead_set(&a), dead_set(&b));
    }

    #[test]
    fn probability_extremes() {
        let none = RadiationPass::new(Box::new(RandomNeuronDeath::new(0.0, 1).unwrap()));
        assert!(dead_set(&none.apply(compiled()).unwrap()).is_empty());

        let all = RadiationPass::new(Box::new(RandomNeuronDeath::new(1.0, 1).unwrap()));
        let g = all.apply(compiled()).unwrap();
        assert_eq!(dead_set(&g).len(), g.neuron_count());

        assert!(RandomNeuronDeath::new(1.5, 1).is_err());
        assert!(RandomNeuronDeath::new(-0.1, 1).is_err());
    }

    #[test]
    fn single_fault_round() {
        let pass = RadiationPass::new(Box::new(ExplicitPlacement::new(vec![])));
        let g = pass.apply(compiled()).unwrap();
        assert_eq!(pass.apply(g).unwrap_err(), CompilerError::Structural(StructuralError::AlreadyIrradiated));
    }
}
