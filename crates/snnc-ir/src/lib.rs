#![doc = "Attributed SNN graph interchange form\n\nEvery stage of the pipeline (compile, adapt, irradiate, simulate, compare) hands the\nnext one an `SnnGraph`: neurons and synapses carrying typed attribute bags, plus the\ngraph-level attributes and stage markers.\n\nTextual form (one item per line):\n- `snn.graph @t<timestep> stages [1, 2] { key = value, .. }`\n- `  neuron <name> { key = value, .. }`\n- `  synapse <pre> -> <post> { key = value, .. }`\n\nThe printer is canonical: `parse_text(&g.to_text())` yields `g` again.\n"]
#![warn(missing_docs)]

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub mod graph;
pub mod id;
mod text;

pub use graph::{SnnGraph, Synapse};
pub use id::{NeuronId, NeuronRole, REDUNDANT_PREFIX};
pub use text::parse_text;

/// IR-wide result type
pub type Result<T> = std::result::Result<T, IrError>;

/// IR errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum IrError {
    /// Neuron name that does not decode into a `NeuronId`
    #[error("bad neuron name '{0}'")]
    BadNeuronName(String),

    /// Neuron inserted twice
    #[error("neuron '{0}' already exists")]
    DuplicateNeuron(NeuronId),

    /// Neuron referenced but not present
    #[error("unknown neuron '{0}'")]
    UnknownNeuron(NeuronId),

    /// Second synapse between the same ordered pair
    #[error("duplicate synapse {pre} -> {post}")]
    DuplicateSynapse {
        /// Pre-synaptic neuron
        pre: NeuronId,
        /// Post-synaptic neuron
        post: NeuronId,
    },

    /// Stage marker lower than the last completed stage
    #[error("stage {stage} cannot follow completed stages {completed:?}")]
    StageOrder {
        /// Stage being marked
        stage: u8,
        /// Stages already completed
        completed: Vec<u8>,
    },

    /// Malformed textual graph
    #[error("parse error on line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        reason: String,
    },
}

/// Typed attribute attached to a graph, neuron or synapse
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Boolean flag
    Bool(bool),
    /// Integral value (synaptic weights, counts, indices)
    Int(i64),
    /// Real value (neuron parameters and state)
    Float(f64),
    /// Free text
    Text(String),
}

impl AttributeValue {
    /// Short type name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int(_) => "int",
            AttributeValue::Float(_) => "float",
            AttributeValue::Text(_) => "text",
        }
    }

    /// Boolean payload, if this is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float payload, if this is a `Float`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text payload, if this is a `Text`
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => {
                // Always keep a decimal point so the parser reads it back as Float
                let s = v.to_string();
                if s.contains('.') || !v.is_finite() {
                    f.write_str(&s)
                } else {
                    write!(f, "{}.0", s)
                }
            }
            AttributeValue::Text(s) => write!(f, "\"{}\"", s.escape_debug()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// Attribute bag keyed by attribute name
pub type Attrs = BTreeMap<String, AttributeValue>;

/// Well-known attribute keys
pub mod keys {
    /// Constant input current added every step
    pub const BIAS: &str = "bias";
    /// Current leak factor
    pub const DU: &str = "du";
    /// Voltage leak factor
    pub const DV: &str = "dv";
    /// Firing threshold
    pub const VTH: &str = "vth";
    /// Synaptic current (state)
    pub const U: &str = "u";
    /// Membrane voltage (state)
    pub const V: &str = "v";
    /// Spiked on the last step (state)
    pub const SPIKES: &str = "spikes";
    /// Redundant twin marker
    pub const IS_REDUNDANT: &str = "is_redundant";
    /// Radiation-induced death marker
    pub const RAD_DEATH: &str = "rad_death";
    /// Synaptic weight
    pub const WEIGHT: &str = "weight";

    /// Graph-level: algorithm name
    pub const ALGORITHM: &str = "algorithm";
    /// Graph-level: approximation rounds
    pub const M_VAL: &str = "m_val";
    /// Graph-level: node count of the input graph
    pub const INPUT_SIZE: &str = "input_size";
    /// Graph-level: steps needed before readout
    pub const SIM_DURATION: &str = "sim_duration";
    /// Graph-level: selector inhibition strength
    pub const INHIBITION: &str = "inhibition";
}
