//! Simulation stage: verify, lower, advance, write state back

use snnc_ir::{keys, AttributeValue, SnnGraph};
use snnc_runtime::{NeuronId as RuntimeId, SimulationEngine, SimulationParams, SimulationResult};

use crate::verify::verify_and_lower;
use crate::{Result, STAGE_SIMULATED};

/// Advance `graph` by `steps` from the state it stores.
///
/// The graph is verified at its own timestep first; nothing is simulated if
/// that fails. Final `u`, `v` and `spikes` are written back, the timestep moves
/// forward by `steps` and stage 2 is recorded. Spike ids in the returned log
/// index the graph's neurons in id order.
pub fn simulate_graph(mut graph: SnnGraph, steps: u64) -> Result<(SnnGraph, SimulationResult)> {
    let lowered = verify_and_lower(&graph, graph.timestep)?;
    let params = SimulationParams::new(steps)?;
    let mut engine = SimulationEngine::new(lowered.network, params)?;

    log::debug!(
        "simulating {} neurons from t={} for {} steps",
        lowered.ids.len(),
        graph.timestep,
        steps
    );
    engine.advance(steps);
    let (network, result) = engine.into_parts();

    for (k, id) in lowered.ids.iter().enumerate() {
        let state = network.state(RuntimeId::new(k as u32))?;
        graph.set_neuron_attr(id, keys::U, AttributeValue::Float(state.u))?;
        graph.set_neuron_attr(id, keys::V, AttributeValue::Float(state.v))?;
        graph.set_neuron_attr(id, keys::SPIKES, AttributeValue::Bool(state.spiked))?;
    }
    graph.timestep += steps;
    graph.mark_stage_completed(STAGE_SIMULATED)?;

    log::info!(
        "Simulated to t={}: {} spikes over {} neurons",
        graph.timestep,
        result.total_spikes,
        network.neuron_count()
    );
    Ok((graph, result))
}
