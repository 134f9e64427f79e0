#![doc = "Graph-algorithm to SNN compiler: registry, compilation, adaptation, verification, simulation and comparison.\n\nPublic responsibilities:\n- Algorithm registry and schema introspection (list_algorithms)\n- Compilation (compile_algorithm): input graph + algorithm settings -> attributed SNN graph\n- Passes (passes, redundancy, radiation): redundancy adaptation and fault injection as owned graph transforms\n- Verification (verify_graph) gating lowering to the runtime engine (verify_and_lower)\n- Simulation stage (simulate_graph): verify -> lower -> advance -> write state back\n- Readout and comparison against the reference algorithm (results)\n- Stage pipeline (run_experiment) from a RunConfig to a result payload\n\nStage markers written by this crate: 1 = graph built (compiled, adapted, irradiated), 2 = simulated, 4 = results compared.\n"]
#![deny(missing_docs)]

use snnc_ir::{IrError, SnnGraph};
use snnc_runtime::RuntimeError;

pub mod config;
pub mod input;
pub mod mdsa;
pub mod passes;
pub mod pipeline;
pub mod radiation;
pub mod redundancy;
pub mod reference;
pub mod results;
pub mod simulate;
pub mod verify;

pub use config::{AdaptationConfig, AlgorithmConfig, RadiationConfig, RunConfig};
pub use input::{input_graph, AlgProps, InputGraph};
pub use passes::{Pass, PassManager};
pub use pipeline::{build_graphs, run_experiment, BuiltGraphs, ExperimentOutcome};
pub use radiation::{ExplicitPlacement, FaultPlacement, RadiationPass, RandomNeuronDeath};
pub use redundancy::RedundancyPass;
pub use results::{compare, counter_neuron_died, graph_has_dead_neurons, read_counts, GraphVariant, ResultPayload, VariantResult};
pub use simulate::simulate_graph;
pub use verify::{verify_and_lower, verify_graph, LoweredNetwork};

/// Stage index: graph built
pub const STAGE_BUILT: u8 = 1;
/// Stage index: graph simulated
pub const STAGE_SIMULATED: u8 = 2;
/// Stage index: results compared
pub const STAGE_COMPARED: u8 = 4;

/// Compiler error type
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    /// Unsupported or malformed run settings; fatal for the run
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Reason
        reason: String,
    },

    /// Malformed graph, raised before simulation
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    /// Unknown result variant or unreadable neuron state
    #[error("Readout error: {reason}")]
    Readout {
        /// Reason
        reason: String,
    },

    /// IR layer error
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Runtime layer error during lowering/simulation
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl CompilerError {
    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Configuration { reason: reason.into() }
    }

    /// Create a readout error
    pub fn readout(reason: impl Into<String>) -> Self {
        Self::Readout { reason: reason.into() }
    }
}

/// Structural defects found in an attributed graph.
/// `element` is a neuron name or `pre -> post` for synapses.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    /// Required attribute missing
    #[error("{element}: missing attribute '{key}'")]
    MissingAttr {
        /// Offending element
        element: String,
        /// Attribute key
        key: String,
    },

    /// Attribute present with the wrong type or value
    #[error("{element}: attribute '{key}' expected {expected}, found {found}")]
    BadAttr {
        /// Offending element
        element: String,
        /// Attribute key
        key: String,
        /// Expected type/value
        expected: String,
        /// Actual type/value
        found: String,
    },

    /// Synapse endpoint that is not a neuron of the graph
    #[error("{element}: unknown endpoint '{neuron}'")]
    UnknownEndpoint {
        /// Offending synapse
        element: String,
        /// Missing neuron
        neuron: String,
    },

    /// Neuron named by a fault placement or readout that does not exist
    #[error("unknown neuron '{0}'")]
    UnknownNeuron(String),

    /// Second synapse on an ordered pair
    #[error("{element}: duplicate synapse")]
    DuplicateEdge {
        /// Offending synapse
        element: String,
    },

    /// `rad_death` on some neurons but not all
    #[error("rad_death present on {marked} of {total} neurons (e.g. '{unmarked}' lacks it)")]
    InconsistentRadDeath {
        /// Neurons carrying the marker
        marked: usize,
        /// All neurons
        total: usize,
        /// An unmarked neuron
        unmarked: String,
    },

    /// Fault injection on a graph that was already irradiated
    #[error("graph already carries rad_death; only one fault round is supported")]
    AlreadyIrradiated,

    /// Neuron state belongs to a different timestep than requested
    #[error("graph state is at t={found}, expected t={expected}")]
    Timestep {
        /// Requested timestep
        expected: u64,
        /// Stored timestep
        found: u64,
    },

    /// `completed_stages` not strictly increasing
    #[error("completed stages {0:?} are not strictly increasing")]
    StageOrder(Vec<u8>),
}

/// Result alias for compiler operations
pub type Result<T> = std::result::Result<T, CompilerError>;

/// Kind of an algorithm parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Non-negative integer
    UnsignedInt,
    /// Real number
    Float,
}

impl ParamKind {
    /// Human-readable kind name for CLI/docs
    pub fn name(self) -> &'static str {
        match self {
            ParamKind::UnsignedInt => "unsigned int",
            ParamKind::Float => "float",
        }
    }
}

/// Parameter specification (name, kind, required)
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Parameter key
    pub name: &'static str,
    /// Expected kind
    pub kind: ParamKind,
    /// Required parameter (true) or optional (false)
    pub required: bool,
    /// Short doc string
    pub doc: &'static str,
}

/// Algorithm specification in the registry
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmSpec {
    /// Name used in run configurations
    pub name: &'static str,
    /// Parameter specs
    pub params: &'static [ParamSpec],
    /// Short doc string
    pub doc: &'static str,
}

/// Static registry of compilable algorithms
static ALGORITHMS: &[AlgorithmSpec] = &[AlgorithmSpec {
    name: mdsa::ALGORITHM_NAME,
    params: &[ParamSpec {
        name: "m_val",
        kind: ParamKind::UnsignedInt,
        required: true,
        doc: "Approximation rounds after the initial degree round",
    }],
    doc: "Minimum dominating set approximation (Alipour et al.)",
}];

/// List algorithm specifications for CLI introspection
pub fn list_algorithms() -> &'static [AlgorithmSpec] {
    ALGORITHMS
}

/// Compile an input graph for the configured algorithm. The result carries stage 1.
pub fn compile_algorithm(input: &InputGraph, algorithm: &AlgorithmConfig, props: &AlgProps) -> Result<SnnGraph> {
    match algorithm {
        AlgorithmConfig::Mdsa { m_val } => mdsa::compile(input, props, *m_val),
    }
}
