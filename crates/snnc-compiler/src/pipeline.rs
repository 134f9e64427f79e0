//! Stage pipeline from a run configuration to a result payload
//!
//! Stage 1 builds every graph variant, stage 2 simulates each of them for
//! the compiled duration and stage 4 compares the readout with the
//! reference algorithm.

use std::collections::BTreeMap;

use snnc_ir::{keys, AttributeValue, NeuronId, SnnGraph};
use snnc_runtime::SimulationResult;

use crate::config::{AdaptationConfig, AlgorithmConfig, RunConfig};
use crate::input::{input_graph, AlgProps, InputGraph};
use crate::passes::PassManager;
use crate::radiation::RadiationPass;
use crate::redundancy::RedundancyPass;
use crate::results::{compare, GraphVariant, ResultPayload};
use crate::simulate::simulate_graph;
use crate::{compile_algorithm, reference, CompilerError, Result, STAGE_COMPARED};

/// Stage 1 output: the input graph and every configured SNN variant
#[derive(Debug, Clone)]
pub struct BuiltGraphs {
    /// Catalogue graph the run is about
    pub input_graph: InputGraph,
    /// Seeded per-node properties
    pub props: AlgProps,
    /// Validated algorithm selection
    pub algorithm: AlgorithmConfig,
    /// Compiled variants, none simulated yet
    pub graphs: BTreeMap<GraphVariant, SnnGraph>,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// Catalogue graph the run is about
    pub input_graph: InputGraph,
    /// Reference counts
    pub expected: BTreeMap<NeuronId, i64>,
    /// Simulated and compared graphs
    pub graphs: BTreeMap<GraphVariant, SnnGraph>,
    /// Spike logs per variant
    pub simulations: BTreeMap<GraphVariant, SimulationResult>,
    /// Readout and verdict per variant
    pub results: ResultPayload,
}

impl ExperimentOutcome {
    /// True when every simulated variant matched the reference
    pub fn all_passed(&self) -> bool {
        self.results.values().all(|r| r.passed)
    }
}

/// Stage 1: catalogue lookup, compilation, adaptation and fault injection.
/// Each variant is derived from its own copy; the compiled graph stays untouched.
pub fn build_graphs(config: &RunConfig) -> Result<BuiltGraphs> {
    let algorithm = config.algorithm()?;
    let adaptation = config.adaptation()?;
    let radiation = config.radiation()?;

    let input = input_graph(config.graph_size, config.graph_nr)?;
    let props = AlgProps::from_seed(input.node_count(), config.seed);
    let compiled = compile_algorithm(&input, &algorithm, &props)?;

    let mut graphs = BTreeMap::new();
    if let Some(AdaptationConfig::Redundancy { level }) = adaptation {
        let mut passes = PassManager::new();
        passes.add(Box::new(RedundancyPass::new(level)?));
        graphs.insert(GraphVariant::AdaptedSnn, passes.run(compiled.clone())?);
    }
    if let Some(radiation) = &radiation {
        let mut passes = PassManager::new();
        passes.add(Box::new(RadiationPass::from_config(radiation, config.seed)?));
        graphs.insert(GraphVariant::RadSnnAlgo, passes.run(compiled.clone())?);
        if let Some(adapted) = graphs.get(&GraphVariant::AdaptedSnn) {
            let irradiated = passes.run(adapted.clone())?;
            graphs.insert(GraphVariant::RadAdaptedSnn, irradiated);
        }
    }
    graphs.insert(GraphVariant::SnnAlgo, compiled);

    log::info!(
        "Stage 1 done for graph {}/{}: {:?}",
        config.graph_size,
        config.graph_nr,
        graphs.keys().map(|v| v.graph_name()).collect::<Vec<_>>()
    );
    Ok(BuiltGraphs { input_graph: input, props, algorithm, graphs })
}

fn sim_duration(graph: &SnnGraph) -> Result<u64> {
    graph
        .graph_attr(keys::SIM_DURATION)
        .and_then(AttributeValue::as_int)
        .and_then(|d| u64::try_from(d).ok())
        .ok_or_else(|| CompilerError::config("compiled graph lacks a 'sim_duration'"))
}

/// Run every stage for one configuration
pub fn run_experiment(config: &RunConfig) -> Result<ExperimentOutcome> {
    let BuiltGraphs { input_graph, props, algorithm, graphs: built } = build_graphs(config)?;

    let mut simulations = BTreeMap::new();
    let mut graphs = BTreeMap::new();
    for (variant, graph) in built {
        let steps = sim_duration(&graph)?;
        let (graph, result) = simulate_graph(graph, steps)?;
        simulations.insert(variant, result);
        graphs.insert(variant, graph);
    }
    log::info!("Stage 2 done: {} graphs simulated", graphs.len());

    let expected = match algorithm {
        AlgorithmConfig::Mdsa { m_val } => reference::mdsa_counts(&input_graph, &props, m_val)?,
    };
    let mut results = ResultPayload::new();
    for (variant, graph) in graphs.iter_mut() {
        let result = compare(graph, &expected, variant.is_adapted())?;
        graph.mark_stage_completed(STAGE_COMPARED)?;
        log::info!(
            "{}: {}",
            variant.result_key(),
            if result.passed { "passed" } else { "FAILED" }
        );
        results.insert(*variant, result);
    }

    Ok(ExperimentOutcome { input_graph, expected, graphs, simulations, results })
}
