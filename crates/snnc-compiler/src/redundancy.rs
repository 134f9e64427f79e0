//! Redundancy adaptation: `red_` twins for counter neurons

use snnc_ir::{keys, AttributeValue, NeuronId, SnnGraph, Synapse};

use crate::config::validate_redundancy_level;
use crate::passes::Pass;
use crate::{CompilerError, Result};

/// Gives counter neurons a redundant twin with identical parameters and
/// identical upstream wiring. Twins have no outgoing synapses; they only
/// serve readout when their primary died.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedundancyPass {
    level: f64,
}

impl RedundancyPass {
    /// Level in `(0, 1]`: the fraction of counter neurons that get a twin
    pub fn new(level: f64) -> Result<Self> {
        validate_redundancy_level(level)?;
        Ok(Self { level })
    }

    /// Configured level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Counters that receive a twin: a prefix of the primaries in id order
    pub fn targets(&self, graph: &SnnGraph) -> Vec<NeuronId> {
        let counters: Vec<NeuronId> = graph
            .neuron_ids()
            .into_iter()
            .filter(|id| id.is_counter() && !id.redundant)
            .collect();
        let take = (self.level * counters.len() as f64).ceil() as usize;
        counters.into_iter().take(take).collect()
    }
}

impl Pass for RedundancyPass {
    fn name(&self) -> &'static str {
        "redundancy"
    }

    fn apply(&self, mut graph: SnnGraph) -> Result<SnnGraph> {
        if graph.neurons().any(|(id, _)| id.redundant) {
            return Err(CompilerError::config(
                "graph already carries redundant neurons; only one backup per neuron is supported",
            ));
        }

        let targets = self.targets(&graph);
        let mut copied = 0;
        for primary in &targets {
            let twin = primary.twin();
            let mut attrs = graph
                .neuron(primary)
                .cloned()
                .ok_or_else(|| CompilerError::config(format!("redundancy target {} vanished", primary)))?;
            attrs.insert(keys::IS_REDUNDANT.into(), AttributeValue::Bool(true));
            graph.add_neuron(twin, attrs)?;

            let upstream: Vec<Synapse> = graph
                .incoming(primary)
                .map(|s| Synapse { pre: s.pre, post: twin, attrs: s.attrs.clone() })
                .collect();
            copied += upstream.len();
            for synapse in upstream {
                graph.connect_synapse(synapse)?;
            }
        }

        log::info!(
            "Redundancy level {}: {} twin counters, {} copied synapses",
            self.level,
            targets.len(),
            copied
        );
        Ok(graph)
    }
}
