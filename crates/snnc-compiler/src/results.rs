//! Readout of simulated counters and comparison with the reference algorithm

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use snnc_ir::{keys, AttributeValue, NeuronId, SnnGraph};

use crate::{mdsa, CompilerError, Result, StructuralError};

/// The four SNN graphs a run can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GraphVariant {
    /// Compiled algorithm
    SnnAlgo,
    /// Compiled algorithm with redundancy
    AdaptedSnn,
    /// Compiled algorithm after fault injection
    RadSnnAlgo,
    /// Redundant network after fault injection
    RadAdaptedSnn,
}

impl GraphVariant {
    /// All variants in pipeline order
    pub const ALL: [GraphVariant; 4] = [Self::SnnAlgo, Self::AdaptedSnn, Self::RadSnnAlgo, Self::RadAdaptedSnn];

    /// Name of the graph
    pub fn graph_name(self) -> &'static str {
        match self {
            Self::SnnAlgo => "snn_algo_graph",
            Self::AdaptedSnn => "adapted_snn_graph",
            Self::RadSnnAlgo => "rad_snn_algo_graph",
            Self::RadAdaptedSnn => "rad_adapted_snn_graph",
        }
    }

    /// Key of this variant in the result payload
    pub fn result_key(self) -> &'static str {
        match self {
            Self::SnnAlgo => "snn_algo_result",
            Self::AdaptedSnn => "adapted_snn_algo_result",
            Self::RadSnnAlgo => "rad_snn_algo_graph",
            Self::RadAdaptedSnn => "rad_adapted_snn_graph",
        }
    }

    /// Carries redundant twins
    pub fn is_adapted(self) -> bool {
        matches!(self, Self::AdaptedSnn | Self::RadAdaptedSnn)
    }

    /// Went through fault injection
    pub fn is_irradiated(self) -> bool {
        matches!(self, Self::RadSnnAlgo | Self::RadAdaptedSnn)
    }
}

impl Display for GraphVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.graph_name())
    }
}

impl FromStr for GraphVariant {
    type Err = CompilerError;

    /// Accepts graph names and result keys
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.graph_name() == s || v.result_key() == s)
            .ok_or_else(|| CompilerError::readout(format!("unknown graph variant '{}'", s)))
    }
}

impl Serialize for GraphVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.result_key())
    }
}

/// Counts read from one simulated graph and whether they match the reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantResult {
    /// Final count per `counter_{i}_{m_val}`
    pub counts: BTreeMap<NeuronId, i64>,
    /// Every count equals the reference count
    pub passed: bool,
}

/// Results of every simulated variant, built once per run
pub type ResultPayload = BTreeMap<GraphVariant, VariantResult>;

/// True when the graph went through fault injection.
/// A graph where only some neurons carry `rad_death` is malformed.
pub fn graph_has_dead_neurons(graph: &SnnGraph) -> Result<bool> {
    let marked = graph.neurons().filter(|(_, attrs)| attrs.contains_key(keys::RAD_DEATH)).count();
    if marked == 0 {
        return Ok(false);
    }
    if let Some((id, _)) = graph.neurons().find(|(_, attrs)| !attrs.contains_key(keys::RAD_DEATH)) {
        return Err(StructuralError::InconsistentRadDeath {
            marked,
            total: graph.neuron_count(),
            unmarked: id.to_string(),
        }
        .into());
    }
    Ok(true)
}

/// True when `counter` was killed by fault injection
pub fn counter_neuron_died(graph: &SnnGraph, counter: &NeuronId) -> Result<bool> {
    if !graph_has_dead_neurons(graph)? {
        return Ok(false);
    }
    let attrs = graph
        .neuron(counter)
        .ok_or_else(|| StructuralError::UnknownNeuron(counter.to_string()))?;
    Ok(attrs.get(keys::RAD_DEATH).and_then(AttributeValue::as_bool).unwrap_or(false))
}

/// Final count of every `counter_{i}_{m_val}`, keyed by the primary id.
///
/// With `redundant`, a dead primary is read through its `red_` twin when one
/// exists; otherwise the dead neuron's frozen value is reported. Partial
/// `rad_death` marking is rejected either way.
pub fn read_counts(graph: &SnnGraph, input_size: usize, m_val: usize, redundant: bool) -> Result<BTreeMap<NeuronId, i64>> {
    graph_has_dead_neurons(graph)?;
    let mut counts = BTreeMap::new();
    for node in 0..input_size {
        let primary = NeuronId::counter(node, m_val);
        let source = if redundant && counter_neuron_died(graph, &primary)? && graph.contains(&primary.twin()) {
            log::debug!("{} died, reading {}", primary, primary.twin());
            primary.twin()
        } else {
            primary
        };
        counts.insert(primary, read_count(graph, &source)?);
    }
    Ok(counts)
}

fn read_count(graph: &SnnGraph, id: &NeuronId) -> Result<i64> {
    let attrs = graph
        .neuron(id)
        .ok_or_else(|| CompilerError::readout(format!("no counter neuron {}", id)))?;
    let u = attrs
        .get(keys::U)
        .and_then(AttributeValue::as_float)
        .ok_or_else(|| CompilerError::readout(format!("{} has no float current 'u'", id)))?;
    if u < 0.0 || u.fract() != 0.0 || !u.is_finite() {
        return Err(CompilerError::readout(format!("{} current {} is not a count", id, u)));
    }
    Ok(u as i64)
}

fn graph_int(graph: &SnnGraph, key: &str) -> Result<usize> {
    graph
        .graph_attr(key)
        .and_then(AttributeValue::as_int)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| CompilerError::readout(format!("graph attribute '{}' missing or not a count", key)))
}

/// Read a simulated graph and compare it with the expected counts
pub fn compare(graph: &SnnGraph, expected: &BTreeMap<NeuronId, i64>, redundant: bool) -> Result<VariantResult> {
    match graph.graph_attr(keys::ALGORITHM).and_then(AttributeValue::as_text) {
        Some(mdsa::ALGORITHM_NAME) => {}
        Some(other) => return Err(CompilerError::readout(format!("no readout for algorithm '{}'", other))),
        None => return Err(CompilerError::readout("graph does not name its algorithm")),
    }
    let input_size = graph_int(graph, keys::INPUT_SIZE)?;
    let m_val = graph_int(graph, keys::M_VAL)?;

    let counts = read_counts(graph, input_size, m_val, redundant)?;
    let passed = counts == *expected;
    if !passed {
        log::debug!("counts {:?} differ from expected {:?}", counts, expected);
    }
    Ok(VariantResult { counts, passed })
}
