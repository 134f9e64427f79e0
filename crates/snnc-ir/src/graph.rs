//! The attributed SNN graph shared by every pipeline stage

use std::collections::BTreeMap;

use crate::{keys, AttributeValue, Attrs, IrError, NeuronId, Result};

/// Directed synapse with its attribute bag
#[derive(Debug, Clone, PartialEq)]
pub struct Synapse {
    /// Pre-synaptic neuron
    pub pre: NeuronId,
    /// Post-synaptic neuron
    pub post: NeuronId,
    /// Synapse attributes (`weight` at minimum once compiled)
    pub attrs: Attrs,
}

impl Synapse {
    /// Synapse with an integral weight and nothing else
    pub fn weighted(pre: NeuronId, post: NeuronId, weight: i64) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert(keys::WEIGHT.to_string(), AttributeValue::Int(weight));
        Self { pre, post, attrs }
    }

    /// Typed weight lookup
    pub fn weight(&self) -> Option<&AttributeValue> {
        self.attrs.get(keys::WEIGHT)
    }
}

/// Directed graph of neurons and synapses with typed attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnnGraph {
    /// Graph-level attributes (algorithm, m_val, sim_duration, ..)
    pub attrs: Attrs,
    /// Time the stored neuron state belongs to
    pub timestep: u64,
    neurons: BTreeMap<NeuronId, Attrs>,
    synapses: Vec<Synapse>,
    completed_stages: Vec<u8>,
}

impl SnnGraph {
    /// Empty graph at t = 0 with no completed stages
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style graph attribute
    pub fn with_attr(mut self, key: impl Into<String>, val: impl Into<AttributeValue>) -> Self {
        self.attrs.insert(key.into(), val.into());
        self
    }

    /// Graph-level attribute lookup
    pub fn graph_attr(&self, key: &str) -> Option<&AttributeValue> {
        self.attrs.get(key)
    }

    /// Insert a neuron; a second neuron with the same id is rejected
    pub fn add_neuron(&mut self, id: NeuronId, attrs: Attrs) -> Result<()> {
        if self.neurons.contains_key(&id) {
            return Err(IrError::DuplicateNeuron(id));
        }
        self.neurons.insert(id, attrs);
        Ok(())
    }

    /// True when the neuron exists
    pub fn contains(&self, id: &NeuronId) -> bool {
        self.neurons.contains_key(id)
    }

    /// Attribute bag of a neuron
    pub fn neuron(&self, id: &NeuronId) -> Option<&Attrs> {
        self.neurons.get(id)
    }

    /// Mutable attribute bag of a neuron
    pub fn neuron_mut(&mut self, id: &NeuronId) -> Option<&mut Attrs> {
        self.neurons.get_mut(id)
    }

    /// Set one attribute on an existing neuron
    pub fn set_neuron_attr(&mut self, id: &NeuronId, key: &str, val: impl Into<AttributeValue>) -> Result<()> {
        let attrs = self.neurons.get_mut(id).ok_or(IrError::UnknownNeuron(*id))?;
        attrs.insert(key.to_string(), val.into());
        Ok(())
    }

    /// Neurons in id order
    pub fn neurons(&self) -> impl Iterator<Item = (&NeuronId, &Attrs)> {
        self.neurons.iter()
    }

    /// Mutable neurons in id order
    pub fn neurons_mut(&mut self) -> impl Iterator<Item = (&NeuronId, &mut Attrs)> {
        self.neurons.iter_mut()
    }

    /// Neuron ids in id order
    pub fn neuron_ids(&self) -> Vec<NeuronId> {
        self.neurons.keys().copied().collect()
    }

    /// Number of neurons
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Add a weighted synapse between existing neurons.
    /// Rejects unknown endpoints and a second synapse on the same ordered pair.
    pub fn connect(&mut self, pre: NeuronId, post: NeuronId, weight: i64) -> Result<()> {
        self.connect_synapse(Synapse::weighted(pre, post, weight))
    }

    /// Checked insertion of a fully attributed synapse
    pub fn connect_synapse(&mut self, synapse: Synapse) -> Result<()> {
        for end in [synapse.pre, synapse.post] {
            if !self.neurons.contains_key(&end) {
                return Err(IrError::UnknownNeuron(end));
            }
        }
        if self.has_synapse(&synapse.pre, &synapse.post) {
            return Err(IrError::DuplicateSynapse { pre: synapse.pre, post: synapse.post });
        }
        self.synapses.push(synapse);
        Ok(())
    }

    /// Unchecked insertion, used when importing graphs that still need verification
    pub fn push_edge(&mut self, synapse: Synapse) {
        self.synapses.push(synapse);
    }

    /// True when at least one synapse `pre -> post` exists
    pub fn has_synapse(&self, pre: &NeuronId, post: &NeuronId) -> bool {
        self.synapses.iter().any(|s| s.pre == *pre && s.post == *post)
    }

    /// All synapses in insertion order
    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    /// Number of synapses
    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Synapses ending in `post`
    pub fn incoming<'a>(&'a self, post: &'a NeuronId) -> impl Iterator<Item = &'a Synapse> + 'a {
        self.synapses.iter().filter(move |s| s.post == *post)
    }

    /// Stage indices this graph has passed through
    pub fn completed_stages(&self) -> &[u8] {
        &self.completed_stages
    }

    /// Record that `stage` finished. Marking the last stage again is a no-op;
    /// marking an earlier stage is an error.
    pub fn mark_stage_completed(&mut self, stage: u8) -> Result<()> {
        match self.completed_stages.last() {
            Some(&last) if last == stage => Ok(()),
            Some(&last) if last > stage => Err(IrError::StageOrder {
                stage,
                completed: self.completed_stages.clone(),
            }),
            _ => {
                self.completed_stages.push(stage);
                Ok(())
            }
        }
    }

    /// Raw stage list used by the parser; ordering is checked by the verifier
    pub(crate) fn set_completed_stages(&mut self, stages: Vec<u8>) {
        self.completed_stages = stages;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_plain() -> SnnGraph {
        let mut g = SnnGraph::new();
        g.add_neuron(NeuronId::plain(0), Attrs::new()).unwrap();
        g.add_neuron(NeuronId::plain(1), Attrs::new()).unwrap();
        g
    }

    #[test]
    fn connect_rejects_duplicates() {
        let mut g = two_plain();
        g.connect(NeuronId::plain(0), NeuronId::plain(1), 1).unwrap();
        let err = g.connect(NeuronId::plain(0), NeuronId::plain(1), 2).unwrap_err();
        assert!(matches!(err, IrError::DuplicateSynapse { .. }));
        // The reverse direction is a different synapse
        g.connect(NeuronId::plain(1), NeuronId::plain(0), 1).unwrap();
        assert_eq!(g.synapse_count(), 2);
    }

    #[test]
    fn connect_rejects_unknown_endpoint() {
        let mut g = two_plain();
        let err = g.connect(NeuronId::plain(0), NeuronId::plain(9), 1).unwrap_err();
        assert_eq!(err, IrError::UnknownNeuron(NeuronId::plain(9)));
    }

    #[test]
    fn push_edge_is_unchecked() {
        let mut g = two_plain();
        g.push_edge(Synapse::weighted(NeuronId::plain(0), NeuronId::plain(1), 1));
        g.push_edge(Synapse::weighted(NeuronId::plain(0), NeuronId::plain(1), 1));
        assert_eq!(g.synapse_count(), 2);
    }

    #[test]
    fn duplicate_neuron_rejected() {
        let mut g = two_plain();
        assert!(g.add_neuron(NeuronId::plain(0), Attrs::new()).is_err());
    }

    #[test]
    fn stage_markers_stay_increasing() {
        let mut g = SnnGraph::new();
        g.mark_stage_completed(1).unwrap();
        g.mark_stage_completed(1).unwrap();
        g.mark_stage_completed(2).unwrap();
        g.mark_stage_completed(4).unwrap();
        assert_eq!(g.completed_stages(), &[1, 2, 4]);
        assert!(matches!(g.mark_stage_completed(2), Err(IrError::StageOrder { .. })));
    }

    #[test]
    fn incoming_filters_by_post() {
        let mut g = two_plain();
        g.add_neuron(NeuronId::plain(2), Attrs::new()).unwrap();
        g.connect(NeuronId::plain(0), NeuronId::plain(2), 1).unwrap();
        g.connect(NeuronId::plain(1), NeuronId::plain(2), -3).unwrap();
        g.connect(NeuronId::plain(0), NeuronId::plain(1), 1).unwrap();
        let post = NeuronId::plain(2);
        let pres: Vec<_> = g.incoming(&post).map(|s| s.pre).collect();
        assert_eq!(pres, vec![NeuronId::plain(0), NeuronId::plain(1)]);
    }
}
