//! Continuing a simulation must match running it in one go.

use proptest::prelude::*;
use snnc_runtime::{LIFParams, NetworkBuilder, NeuronId, SimulationEngine, SimulationParams, SnnNetwork};

fn arb_network() -> impl Strategy<Value = SnnNetwork> {
    let neuron = (-2i32..4, 0u8..3, 0u8..3, 1i32..6);
    (
        prop::collection::vec(neuron, 1..8),
        prop::collection::vec((0u32..8, 0u32..8, -3i32..4), 0..20),
    )
        .prop_map(|(neurons, edges)| {
            let n = neurons.len() as u32;
            let mut builder = NetworkBuilder::new();
            for (i, (bias, du, dv, vth)) in neurons.into_iter().enumerate() {
                // Leak factors from {0, 0.5, 1}
                let params = LIFParams::new(bias as f64, du as f64 / 2.0, dv as f64 / 2.0, vth as f64)
                    .expect("finite params");
                builder = builder.add_neuron_with_params(NeuronId::new(i as u32), params);
            }
            let mut seen = std::collections::HashSet::new();
            for (pre, post, w) in edges {
                let (pre, post) = (pre % n, post % n);
                if seen.insert((pre, post)) {
                    builder = builder.add_synapse(NeuronId::new(pre), NeuronId::new(post), w as f64);
                }
            }
            builder.build().expect("valid network")
        })
}

proptest! {
    #[test]
    fn advance_is_additive(net in arb_network(), a in 0u64..15, b in 0u64..15) {
        let params = SimulationParams::new(1).unwrap();

        let mut split = SimulationEngine::new(net.clone(), params.clone()).unwrap();
        split.advance(a);
        split.advance(b);

        let mut whole = SimulationEngine::new(net, params).unwrap();
        whole.advance(a + b);

        let split_states: Vec<_> = split.network().states().map(|(id, s)| (id, *s)).collect();
        let whole_states: Vec<_> = whole.network().states().map(|(id, s)| (id, *s)).collect();
        prop_assert_eq!(split_states, whole_states);
        prop_assert_eq!(split.results(), whole.results());
        prop_assert_eq!(split.network().current_step(), a + b);
    }
}
