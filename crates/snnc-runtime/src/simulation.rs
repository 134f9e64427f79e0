//! Simulation engine for SNN networks

use crate::{error::*, network::SnnNetwork, NeuronId, Spike};

/// Simulation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    /// Number of discrete steps a full run executes
    pub steps: u64,
    /// Record spikes from these neurons (None = all)
    pub record_neurons: Option<Vec<NeuronId>>,
    /// Maximum spikes to record (prevents memory issues)
    pub max_recorded_spikes: Option<usize>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            steps: 1,
            record_neurons: None,
            max_recorded_spikes: Some(1_000_000),
        }
    }
}

impl SimulationParams {
    /// Create new simulation parameters with validation
    pub fn new(steps: u64) -> Result<Self> {
        if steps == 0 {
            return Err(RuntimeError::invalid_parameter("steps", steps.to_string(), "> 0"));
        }
        Ok(Self {
            steps,
            ..Default::default()
        })
    }

    /// Set neurons to record
    pub fn with_recorded_neurons(mut self, neurons: Vec<NeuronId>) -> Self {
        self.record_neurons = Some(neurons);
        self
    }

    /// Set maximum spike recording limit
    pub fn with_spike_limit(mut self, limit: usize) -> Self {
        self.max_recorded_spikes = Some(limit);
        self
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        Self::new(self.steps)?;
        Ok(())
    }
}

/// Simulation results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResult {
    /// All recorded spikes
    pub spikes: Vec<Spike>,
    /// Number of steps executed
    pub steps_executed: u64,
    /// Total spike count (recorded or not)
    pub total_spikes: usize,
}

impl SimulationResult {
    /// Get spikes for a specific neuron
    pub fn spikes_for_neuron(&self, neuron_id: NeuronId) -> Vec<&Spike> {
        self.spikes.iter().filter(|spike| spike.neuron_id == neuron_id).collect()
    }

    /// Export spikes to simple format (step, neuron_id)
    pub fn export_spikes(&self) -> Vec<(u64, u32)> {
        self.spikes.iter().map(|spike| (spike.step, spike.neuron_id.raw())).collect()
    }
}

/// Simulation engine
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    network: SnnNetwork,
    params: SimulationParams,
    results: SimulationResult,
}

impl SimulationEngine {
    /// Create a new simulation engine
    pub fn new(network: SnnNetwork, params: SimulationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            network,
            params,
            results: SimulationResult::default(),
        })
    }

    /// Run the complete simulation from the network's initial state
    pub fn run(&mut self) -> Result<SimulationResult> {
        log::info!(
            "Starting simulation: {} steps over {} neurons",
            self.params.steps,
            self.network.neuron_count()
        );

        self.network.reset();
        self.results = SimulationResult::default();
        self.advance(self.params.steps);

        log::info!(
            "Simulation completed: {} spikes in {} steps",
            self.results.total_spikes,
            self.results.steps_executed
        );
        Ok(self.results.clone())
    }

    /// Continue from the current state for `steps` more steps.
    /// `advance(a)` then `advance(b)` ends in the same state as `advance(a + b)`.
    pub fn advance(&mut self, steps: u64) {
        let progress_every = (steps / 10).max(1);
        for i in 0..steps {
            let fired = self.network.step();
            let step = self.network.current_step();
            self.results.total_spikes += fired.len();
            self.record_spikes(step, fired);

            if i % progress_every == 0 {
                log::debug!("Simulation step {} ({} of {})", step, i + 1, steps);
            }
        }
        self.results.steps_executed += steps;
    }

    /// Record spikes from network step
    fn record_spikes(&mut self, step: u64, fired: Vec<NeuronId>) {
        for neuron_id in fired {
            if let Some(max_spikes) = self.params.max_recorded_spikes {
                if self.results.spikes.len() >= max_spikes {
                    log::warn!("Spike recording limit reached: {}", max_spikes);
                    return;
                }
            }
            let should_record = match &self.params.record_neurons {
                Some(recorded) => recorded.contains(&neuron_id),
                None => true,
            };
            if should_record {
                self.results.spikes.push(Spike { neuron_id, step });
            }
        }
    }

    /// Get reference to network
    pub fn network(&self) -> &SnnNetwork {
        &self.network
    }

    /// Get simulation parameters
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Get current results
    pub fn results(&self) -> &SimulationResult {
        &self.results
    }

    /// Consume the engine, returning the evolved network and accumulated results
    pub fn into_parts(self) -> (SnnNetwork, SimulationResult) {
        (self.network, self.results)
    }
}

/// Run a network for a fixed number of steps from its initial state
pub fn run_fixed_steps(network: SnnNetwork, steps: u64) -> Result<SimulationResult> {
    let params = SimulationParams::new(steps)?.with_spike_limit(1_000_000);
    let mut engine = SimulationEngine::new(network, params)?;
    engine.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use crate::neuron::LIFParams;

    fn oscillator() -> SnnNetwork {
        // Two neurons exciting each other; neuron 0 is driven by its bias
        NetworkBuilder::new()
            .add_neuron_with_params(NeuronId::new(0), LIFParams::new(1.0, 0.0, 1.0, 2.0).unwrap())
            .add_neuron_with_params(NeuronId::new(1), LIFParams::new(0.0, 1.0, 1.0, 1.0).unwrap())
            .add_synapse(NeuronId::new(0), NeuronId::new(1), 1.0)
            .add_synapse(NeuronId::new(1), NeuronId::new(0), -1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_simulation_params_validation() {
        assert!(SimulationParams::new(0).is_err());
        assert!(SimulationParams::new(5).is_ok());
        assert!(SimulationParams::default().validate().is_ok());
    }

    #[test]
    fn test_run_counts_steps_and_spikes() {
        let res = run_fixed_steps(oscillator(), 6).unwrap();
        assert_eq!(res.steps_executed, 6);
        assert_eq!(res.total_spikes, res.spikes.len());
        // Neuron 0 crosses 2.0 at step 2, neuron 1 answers on step 3
        assert_eq!(res.spikes_for_neuron(NeuronId::new(0))[0].step, 2);
        assert_eq!(res.spikes_for_neuron(NeuronId::new(1))[0].step, 3);
    }

    #[test]
    fn test_run_resets_before_each_run() {
        let params = SimulationParams::new(6).unwrap();
        let mut engine = SimulationEngine::new(oscillator(), params).unwrap();
        let first = engine.run().unwrap();
        let second = engine.run().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_advance_split_matches_single_run() {
        let params = SimulationParams::new(10).unwrap();
        let mut split = SimulationEngine::new(oscillator(), params.clone()).unwrap();
        split.advance(4);
        split.advance(6);

        let mut whole = SimulationEngine::new(oscillator(), params).unwrap();
        whole.advance(10);

        let (a, ra) = split.into_parts();
        let (b, rb) = whole.into_parts();
        assert_eq!(a.states().collect::<Vec<_>>(), b.states().collect::<Vec<_>>());
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_recording_filter_and_limit() {
        let params = SimulationParams::new(20)
            .unwrap()
            .with_recorded_neurons(vec![NeuronId::new(1)])
            .with_spike_limit(2);
        let mut engine = SimulationEngine::new(oscillator(), params).unwrap();
        let res = engine.run().unwrap();
        assert!(res.spikes.len() <= 2);
        assert!(res.spikes.iter().all(|s| s.neuron_id == NeuronId::new(1)));
        assert!(res.total_spikes >= res.spikes.len());
    }

    #[test]
    fn test_determinism_reproducibility() {
        let res1 = run_fixed_steps(oscillator(), 25).unwrap();
        let res2 = run_fixed_steps(oscillator(), 25).unwrap();
        assert_eq!(res1.export_spikes(), res2.export_spikes());
    }
}
