//! Discrete-time LIF runtime for compiled spiking networks
//!
//! Neurons are addressed by dense numeric ids. Every step updates all
//! neurons synchronously from the previous step's spikes; there is no
//! wall-clock time, plasticity or stochastic input.

#![deny(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod error;
pub mod network;
pub mod neuron;
pub mod simulation;

// Re-export essential types
pub use error::{Result, RuntimeError};
pub use network::{NetworkBuilder, SnnNetwork, Synapse};
pub use neuron::{LIFNeuron, LIFParams, NeuronState};
pub use simulation::{run_fixed_steps, SimulationEngine, SimulationParams, SimulationResult};

/// Numeric neuron handle inside a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeuronId(u32);

impl NeuronId {
    /// Wrap a raw id
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw id
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A spike emitted by `neuron_id` at the end of step `step` (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spike {
    /// Emitting neuron
    pub neuron_id: NeuronId,
    /// Step the spike was produced on
    pub step: u64,
}
