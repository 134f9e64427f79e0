//! SNN network implementation

use crate::{
    error::*,
    neuron::{LIFNeuron, LIFParams, NeuronState},
    NeuronId,
};
use std::collections::{HashMap, HashSet};

/// Synaptic connection in the network
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synapse {
    /// Pre-synaptic neuron ID
    pub pre: NeuronId,
    /// Post-synaptic neuron ID
    pub post: NeuronId,
    /// Synaptic weight
    pub weight: f64,
}

/// Spiking neural network with synchronous, one-step synaptic delay
#[derive(Debug, Clone)]
pub struct SnnNetwork {
    neurons: Vec<LIFNeuron>,
    index: HashMap<NeuronId, usize>,
    synapses: Vec<Synapse>,
    pairs: HashSet<(NeuronId, NeuronId)>,
    // (pre index, post index, weight), parallel to `synapses`
    wiring: Vec<(usize, usize, f64)>,
    current_step: u64,
}

impl SnnNetwork {
    /// Create a new empty network
    pub fn new() -> Self {
        Self {
            neurons: Vec::new(),
            index: HashMap::new(),
            synapses: Vec::new(),
            pairs: HashSet::new(),
            wiring: Vec::new(),
            current_step: 0,
        }
    }

    /// Add a neuron with specific parameters and initial state
    pub fn add_neuron(&mut self, id: NeuronId, params: LIFParams, state: NeuronState) -> Result<()> {
        if self.index.contains_key(&id) {
            return Err(RuntimeError::invalid_config(format!(
                "Neuron {} already exists",
                id.raw()
            )));
        }
        let neuron = LIFNeuron::new(id, params, state)?;
        self.index.insert(id, self.neurons.len());
        self.neurons.push(neuron);
        Ok(())
    }

    /// Add a synaptic connection
    pub fn add_synapse(&mut self, pre: NeuronId, post: NeuronId, weight: f64) -> Result<()> {
        let pre_idx = self.slot(pre)?;
        let post_idx = self.slot(post)?;

        if !weight.is_finite() {
            return Err(RuntimeError::invalid_parameter(
                "weight",
                weight.to_string(),
                "finite",
            ));
        }
        if !self.pairs.insert((pre, post)) {
            return Err(RuntimeError::invalid_config(format!(
                "Synapse from {} to {} already exists",
                pre.raw(),
                post.raw()
            )));
        }

        self.synapses.push(Synapse { pre, post, weight });
        self.wiring.push((pre_idx, post_idx, weight));
        Ok(())
    }

    fn slot(&self, id: NeuronId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(RuntimeError::NeuronNotFound { neuron_id: id.raw() })
    }

    /// Get neuron count
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Get synapse count
    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Steps taken since construction or the last reset
    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    /// Step the network forward by one time step.
    ///
    /// Input is gathered from every neuron's spike flag of the previous step
    /// before any neuron is updated, so no update observes another neuron's
    /// new state. Returns the neurons that fired.
    pub fn step(&mut self) -> Vec<NeuronId> {
        let mut input = vec![0.0; self.neurons.len()];
        for &(pre, post, weight) in &self.wiring {
            if self.neurons[pre].state.emits() {
                input[post] += weight;
            }
        }

        let mut fired = Vec::new();
        for (neuron, current) in self.neurons.iter_mut().zip(input) {
            if neuron.update(current) {
                fired.push(neuron.id());
            }
        }

        self.current_step += 1;
        fired
    }

    /// Get a neuron's state
    pub fn state(&self, id: NeuronId) -> Result<&NeuronState> {
        Ok(&self.neurons[self.slot(id)?].state)
    }

    /// Get a neuron's parameters
    pub fn params(&self, id: NeuronId) -> Result<&LIFParams> {
        Ok(&self.neurons[self.slot(id)?].params)
    }

    /// Get synaptic weight
    pub fn get_weight(&self, pre: NeuronId, post: NeuronId) -> Result<f64> {
        self.synapses
            .iter()
            .find(|s| s.pre == pre && s.post == post)
            .map(|s| s.weight)
            .ok_or_else(|| {
                RuntimeError::network_topology(format!(
                    "No synapse from {} to {}",
                    pre.raw(),
                    post.raw()
                ))
            })
    }

    /// All neuron IDs in insertion order
    pub fn neuron_ids(&self) -> Vec<NeuronId> {
        self.neurons.iter().map(LIFNeuron::id).collect()
    }

    /// States in insertion order
    pub fn states(&self) -> impl Iterator<Item = (NeuronId, &NeuronState)> {
        self.neurons.iter().map(|n| (n.id(), &n.state))
    }

    /// All synapse connections
    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    /// Reset every neuron to its initial state and the step counter to zero
    pub fn reset(&mut self) {
        self.current_step = 0;
        for neuron in &mut self.neurons {
            neuron.reset();
        }
    }
}

impl Default for SnnNetwork {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing SNN networks
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    neurons: Vec<(NeuronId, LIFParams, NeuronState)>,
    synapses: Vec<(NeuronId, NeuronId, f64)>,
}

impl NetworkBuilder {
    /// Create a new network builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a neuron with default parameters, at rest
    pub fn add_neuron(self, id: NeuronId) -> Self {
        self.add_neuron_with_params(id, LIFParams::default())
    }

    /// Add a neuron with specific parameters, at rest
    pub fn add_neuron_with_params(self, id: NeuronId, params: LIFParams) -> Self {
        self.add_neuron_with_state(id, params, NeuronState::default())
    }

    /// Add a neuron with specific parameters and initial state
    pub fn add_neuron_with_state(mut self, id: NeuronId, params: LIFParams, state: NeuronState) -> Self {
        self.neurons.push((id, params, state));
        self
    }

    /// Add a range of default neurons
    pub fn add_neurons(mut self, start: u32, count: u32) -> Self {
        for i in start..(start + count) {
            self.neurons.push((NeuronId::new(i), LIFParams::default(), NeuronState::default()));
        }
        self
    }

    /// Add a synapse
    pub fn add_synapse(mut self, pre: NeuronId, post: NeuronId, weight: f64) -> Self {
        self.synapses.push((pre, post, weight));
        self
    }

    /// Build the network; duplicate neurons or synapses are rejected
    pub fn build(self) -> Result<SnnNetwork> {
        let mut network = SnnNetwork::new();

        for (id, params, state) in self.neurons {
            network.add_neuron(id, params, state)?;
        }

        for (pre, post, weight) in self.synapses {
            network.add_synapse(pre, post, weight)?;
        }

        log::debug!(
            "Built network: {} neurons, {} synapses",
            network.neuron_count(),
            network.synapse_count()
        );
        Ok(network)
    }
}
