//! Discrete-time LIF neuron model
//!
//! Per step, with `input` the weighted sum of the previous step's spikes:
//!
//! ```text
//! u' = u * (1 - du) + input + bias
//! v' = v * (1 - dv) + u'
//! spike iff v' >= vth, then v' = 0
//! ```

use crate::{error::*, NeuronId};

/// Parameters of a discrete LIF neuron
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LIFParams {
    /// Constant current added each step
    pub bias: f64,
    /// Current leak factor
    pub du: f64,
    /// Voltage leak factor
    pub dv: f64,
    /// Firing threshold
    pub vth: f64,
}

impl Default for LIFParams {
    fn default() -> Self {
        Self {
            bias: 0.0,
            du: 0.0,
            dv: 1.0,
            vth: 1.0,
        }
    }
}

impl LIFParams {
    /// Create new LIF parameters with validation
    pub fn new(bias: f64, du: f64, dv: f64, vth: f64) -> Result<Self> {
        for (name, value) in [("bias", bias), ("du", du), ("dv", dv), ("vth", vth)] {
            if !value.is_finite() {
                return Err(RuntimeError::invalid_parameter(name, value.to_string(), "finite"));
            }
        }
        Ok(Self { bias, du, dv, vth })
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        Self::new(self.bias, self.du, self.dv, self.vth)?;
        Ok(())
    }
}

/// Dynamic state of a neuron
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeuronState {
    /// Synaptic current
    pub u: f64,
    /// Membrane voltage
    pub v: f64,
    /// Spiked on the last step
    pub spiked: bool,
    /// Permanently failed: frozen state, never spikes
    pub dead: bool,
}

impl Default for NeuronState {
    fn default() -> Self {
        Self {
            u: 0.0,
            v: 0.0,
            spiked: false,
            dead: false,
        }
    }
}

impl NeuronState {
    /// Live neuron with the given current and voltage
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v, ..Default::default() }
    }

    /// Mark as dead
    pub fn killed(mut self) -> Self {
        self.dead = true;
        self
    }

    /// Whether this neuron's last spike reaches its targets
    pub fn emits(&self) -> bool {
        self.spiked && !self.dead
    }
}

/// Leaky integrate-and-fire neuron
#[derive(Debug, Clone)]
pub struct LIFNeuron {
    id: NeuronId,
    /// Neuron parameters
    pub params: LIFParams,
    /// Current state
    pub state: NeuronState,
    initial: NeuronState,
}

impl LIFNeuron {
    /// Create a neuron starting from `state`
    pub fn new(id: NeuronId, params: LIFParams, state: NeuronState) -> Result<Self> {
        params.validate()?;
        if !state.u.is_finite() || !state.v.is_finite() {
            return Err(RuntimeError::invalid_parameter(
                "state",
                format!("u={}, v={}", state.u, state.v),
                "finite",
            ));
        }
        Ok(Self { id, params, state, initial: state })
    }

    /// Advance one step given the summed synaptic input; returns true on a spike
    pub fn update(&mut self, input: f64) -> bool {
        if self.state.dead {
            self.state.spiked = false;
            return false;
        }

        let p = &self.params;
        let u = self.state.u * (1.0 - p.du) + input + p.bias;
        let mut v = self.state.v * (1.0 - p.dv) + u;
        let spiked = v >= p.vth;
        if spiked {
            v = 0.0;
        }

        self.state.u = u;
        self.state.v = v;
        self.state.spiked = spiked;
        spiked
    }

    /// Restore the state the neuron was created with
    pub fn reset(&mut self) {
        self.state = self.initial;
    }

    /// Neuron ID
    pub fn id(&self) -> NeuronId {
        self.id
    }
}
