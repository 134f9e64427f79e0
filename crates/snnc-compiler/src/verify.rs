//! Structural verification of attributed graphs and lowering to the runtime
//!
//! Lowering is only reachable through [`verify_and_lower`], so the runtime
//! never sees a graph that failed verification.

use std::collections::HashSet;

use snnc_ir::{keys, AttributeValue, Attrs, NeuronId, SnnGraph};
use snnc_runtime::{LIFParams, NetworkBuilder, NeuronId as RuntimeId, NeuronState, SnnNetwork};

use crate::{Result, StructuralError};

/// Float attributes every neuron must carry
pub const REQUIRED_FLOATS: [&str; 6] = [keys::BIAS, keys::DU, keys::DV, keys::VTH, keys::U, keys::V];

/// Verify that `graph` is well formed and that its stored state belongs to timestep `t`.
///
/// Checks, failing on the first defect:
/// - the stored timestep equals `t` and `completed_stages` is strictly increasing
/// - every neuron has finite Float `bias, du, dv, vth, u, v` and Bool `is_redundant`
/// - `spikes` and `rad_death` are Bool where present, `rad_death` on all neurons or none
/// - every synapse joins existing neurons with an Int `weight`, at most one per ordered pair
pub fn verify_graph(graph: &SnnGraph, t: u64) -> Result<()> {
    if graph.timestep != t {
        return Err(StructuralError::Timestep { expected: t, found: graph.timestep }.into());
    }
    let stages = graph.completed_stages();
    if stages.windows(2).any(|w| w[0] >= w[1]) {
        return Err(StructuralError::StageOrder(stages.to_vec()).into());
    }

    let mut marked = 0;
    let mut unmarked = None;
    for (id, attrs) in graph.neurons() {
        for key in REQUIRED_FLOATS {
            let value = require(id, attrs, key)?;
            match value {
                AttributeValue::Float(f) if f.is_finite() => {}
                AttributeValue::Float(f) => return Err(bad_attr(id, key, "finite float", &f.to_string())),
                other => return Err(bad_attr(id, key, "float", other.kind_name())),
            }
        }
        expect_bool(id, require(id, attrs, keys::IS_REDUNDANT)?, keys::IS_REDUNDANT)?;
        if let Some(value) = attrs.get(keys::SPIKES) {
            expect_bool(id, value, keys::SPIKES)?;
        }
        match attrs.get(keys::RAD_DEATH) {
            Some(value) => {
                expect_bool(id, value, keys::RAD_DEATH)?;
                marked += 1;
            }
            None => {
                unmarked.get_or_insert(*id);
            }
        }
    }
    if marked > 0 {
        if let Some(id) = unmarked {
            return Err(StructuralError::InconsistentRadDeath {
                marked,
                total: graph.neuron_count(),
                unmarked: id.to_string(),
            }
            .into());
        }
    }

    let mut pairs = HashSet::new();
    for syn in graph.synapses() {
        let element = format!("{} -> {}", syn.pre, syn.post);
        for end in [syn.pre, syn.post] {
            if !graph.contains(&end) {
                return Err(StructuralError::UnknownEndpoint { element, neuron: end.to_string() }.into());
            }
        }
        match syn.weight() {
            Some(AttributeValue::Int(_)) => {}
            Some(other) => {
                return Err(StructuralError::BadAttr {
                    element,
                    key: keys::WEIGHT.into(),
                    expected: "int".into(),
                    found: other.kind_name().into(),
                }
                .into())
            }
            None => return Err(StructuralError::MissingAttr { element, key: keys::WEIGHT.into() }.into()),
        }
        if !pairs.insert((syn.pre, syn.post)) {
            return Err(StructuralError::DuplicateEdge { element }.into());
        }
    }

    log::debug!(
        "verified graph at t={}: {} neurons, {} synapses",
        t,
        graph.neuron_count(),
        graph.synapse_count()
    );
    Ok(())
}

fn require<'a>(id: &NeuronId, attrs: &'a Attrs, key: &str) -> Result<&'a AttributeValue> {
    attrs.get(key).ok_or_else(|| {
        StructuralError::MissingAttr { element: id.to_string(), key: key.to_string() }.into()
    })
}

fn expect_bool(id: &NeuronId, value: &AttributeValue, key: &str) -> Result<bool> {
    value.as_bool().ok_or_else(|| bad_attr(id, key, "bool", value.kind_name()))
}

fn bad_attr(id: &NeuronId, key: &str, expected: &str, found: &str) -> crate::CompilerError {
    StructuralError::BadAttr {
        element: id.to_string(),
        key: key.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
    .into()
}

/// Runtime network built from a verified graph.
/// Runtime id `k` is the `k`-th neuron of the graph in id order.
#[derive(Debug, Clone)]
pub struct LoweredNetwork {
    /// Runnable network
    pub network: SnnNetwork,
    /// Graph neuron for each runtime id
    pub ids: Vec<NeuronId>,
}

impl LoweredNetwork {
    /// Graph neuron behind a runtime id
    pub fn graph_id(&self, id: RuntimeId) -> Option<NeuronId> {
        self.ids.get(id.raw() as usize).copied()
    }
}

/// Verify at timestep `t`, then build the runtime network
pub fn verify_and_lower(graph: &SnnGraph, t: u64) -> Result<LoweredNetwork> {
    verify_graph(graph, t)?;
    lower(graph)
}

// Only called on verified graphs, so attribute lookups cannot miss.
fn lower(graph: &SnnGraph) -> Result<LoweredNetwork> {
    let float = |attrs: &Attrs, key: &str| attrs.get(key).and_then(AttributeValue::as_float).unwrap_or_default();
    let flag = |attrs: &Attrs, key: &str| attrs.get(key).and_then(AttributeValue::as_bool).unwrap_or(false);

    let ids = graph.neuron_ids();
    let mut builder = NetworkBuilder::new();
    for (k, (_, attrs)) in graph.neurons().enumerate() {
        let params = LIFParams::new(
            float(attrs, keys::BIAS),
            float(attrs, keys::DU),
            float(attrs, keys::DV),
            float(attrs, keys::VTH),
        )?;
        let mut state = NeuronState::new(float(attrs, keys::U), float(attrs, keys::V));
        state.spiked = flag(attrs, keys::SPIKES);
        state.dead = flag(attrs, keys::RAD_DEATH);
        builder = builder.add_neuron_with_state(RuntimeId::new(k as u32), params, state);
    }

    let slot = |id: &NeuronId| ids.binary_search(id).map(|k| RuntimeId::new(k as u32));
    for syn in graph.synapses() {
        let weight = syn.weight().and_then(AttributeValue::as_int).unwrap_or_default();
        if let (Ok(pre), Ok(post)) = (slot(&syn.pre), slot(&syn.post)) {
            builder = builder.add_synapse(pre, post, weight as f64);
        }
    }

    let network = builder.build()?;
    Ok(LoweredNetwork { network, ids })
}
