//! Whole-run checks from a RunConfig to the result payload

use serde_json::json;
use snnc_compiler::config::{EXPLICIT, NEURON_DEATH};
use snnc_compiler::{run_experiment, CompilerError, GraphVariant, RunConfig};
use snnc_ir::NeuronId;

#[test]
fn two_node_graph_passes() {
    for m_val in [0, 1] {
        let outcome = run_experiment(&RunConfig::mdsa(m_val, 2, 0, 42)).expect("run");
        let result = &outcome.results[&GraphVariant::SnnAlgo];
        assert!(result.passed, "m_val={}: {:?}", m_val, result);
        // One node collects both marks
        let mut counts: Vec<i64> = result.counts.values().copied().collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![0, 2]);
    }
}

#[test]
fn every_catalogue_graph_matches_reference() {
    for size in 1..=6 {
        let mut nr = 0;
        while let Ok(outcome) = run_experiment(&RunConfig::mdsa(2, size, nr, size as u64 * 7 + nr as u64)) {
            assert!(outcome.all_passed(), "size {} nr {}", size, nr);
            nr += 1;
        }
        assert!(nr > 0, "no graphs for size {}", size);
    }
}

#[test]
fn adapted_variants_match_reference() {
    let config = RunConfig::mdsa(1, 5, 1, 3)
        .with_redundancy(1.0)
        .with_radiation(NEURON_DEATH, json!(0.0));
    let outcome = run_experiment(&config).expect("run");
    assert_eq!(outcome.results.len(), 4);
    assert!(outcome.all_passed());
}

#[test]
fn explicit_fault_on_counter_needs_redundancy() {
    let config = RunConfig::mdsa(0, 4, 0, 1)
        .with_redundancy(1.0)
        .with_radiation(EXPLICIT, json!(["counter_2_0"]));
    let outcome = run_experiment(&config).expect("run");
    let rad = &outcome.results[&GraphVariant::RadSnnAlgo];
    assert!(!rad.passed);
    assert_eq!(rad.counts[&NeuronId::counter(2, 0)], 0);

    let rad_adapted = &outcome.results[&GraphVariant::RadAdaptedSnn];
    assert!(rad_adapted.passed);
    assert_eq!(rad_adapted.counts[&NeuronId::counter(2, 0)], 4);
}

#[test]
fn runs_are_deterministic() {
    let config = RunConfig::mdsa(2, 6, 1, 99)
        .with_redundancy(0.5)
        .with_radiation(NEURON_DEATH, json!(0.05));
    let a = run_experiment(&config).expect("run");
    let b = run_experiment(&config).expect("run");
    assert_eq!(a.results, b.results);
    assert_eq!(a.graphs, b.graphs);
}

#[test]
fn configuration_errors() {
    let cases = [
        RunConfig::mdsa(1, 4, 0, 1).with_redundancy(0.0),
        RunConfig::mdsa(1, 4, 0, 1).with_redundancy(1.5),
        RunConfig::mdsa(1, 4, 3, 1),
        RunConfig::mdsa(1, 4, 0, 1).with_radiation("cosmic_rays", json!(1)),
    ];
    for config in &cases {
        let err = run_experiment(config).unwrap_err();
        assert!(matches!(err, CompilerError::Configuration { .. }), "{:?}: {}", config, err);
    }

    let mut config = RunConfig::mdsa(1, 4, 0, 1);
    config.algorithm.get_mut("MDSA").expect("mdsa entry").insert("m_val".into(), json!(1.5));
    assert!(matches!(run_experiment(&config), Err(CompilerError::Configuration { .. })));
}

#[test]
fn explicit_fault_on_unknown_neuron_is_structural() {
    let config = RunConfig::mdsa(0, 2, 0, 1).with_radiation(EXPLICIT, json!(["counter_5_0"]));
    assert!(matches!(run_experiment(&config), Err(CompilerError::Structural(_))));
}
