use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).expect("write config");
    path
}

const FULL_RUN: &str = r#"
seed = 8
graph_size = 4
graph_nr = 0

[algorithm.MDSA]
m_val = 1

[adaptation]
redundancy = 1.0

[radiation]
explicit = ["counter_2_1"]
"#;

#[test]
fn run_prints_result_payload() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = write_config(&tmp, "run.toml", FULL_RUN);
    let out = tmp.path().join("out/results.json");

    let assert = Command::cargo_bin("snnc")?
        .arg("run")
        .arg(&config)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"snn_algo_result\""))
        .stdout(predicate::str::contains("\"adapted_snn_algo_result\""));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let payload: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(payload["rad_adapted_snn_graph"]["passed"], serde_json::json!(true));
    assert_eq!(payload["rad_adapted_snn_graph"]["counts"]["counter_2_1"], serde_json::json!(4));
    assert_eq!(payload["rad_snn_algo_graph"]["passed"], serde_json::json!(false));

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    assert_eq!(written, payload);
    Ok(())
}

#[test]
fn strict_run_fails_on_mismatch() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = write_config(&tmp, "run.toml", FULL_RUN);
    Command::cargo_bin("snnc")?
        .args(["run", "--strict"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rad_snn_algo_graph"));
    Ok(())
}

#[test]
fn run_accepts_json_config() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = write_config(
        &tmp,
        "run.json",
        r#"{"algorithm": {"MDSA": {"m_val": 0}}, "seed": 1, "graph_size": 2, "graph_nr": 0}"#,
    );
    Command::cargo_bin("snnc")?
        .arg("run")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"passed\": true"));
    Ok(())
}

#[test]
fn zero_redundancy_is_rejected() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = write_config(
        &tmp,
        "run.toml",
        "seed = 1\ngraph_size = 2\ngraph_nr = 0\n[algorithm.MDSA]\nm_val = 0\n[adaptation]\nredundancy = 0\n",
    );
    Command::cargo_bin("snnc")?
        .arg("run")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
    Ok(())
}

#[test]
fn inspect_then_verify_roundtrip() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = write_config(&tmp, "run.toml", FULL_RUN);

    for stage in ["1", "2"] {
        let assert = Command::cargo_bin("snnc")?
            .args(["inspect", "--graph", "rad_adapted_snn_graph", "--stage", stage])
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("snn.graph @t"))
            .stdout(predicate::str::contains("neuron red_counter_2_1"));

        let graph_file = tmp.path().join(format!("stage{}.snn", stage));
        std::fs::write(&graph_file, &assert.get_output().stdout)?;
        Command::cargo_bin("snnc")?
            .arg("verify")
            .arg(&graph_file)
            .assert()
            .success()
            .stdout(predicate::str::contains("Verification OK"));
    }
    Ok(())
}

#[test]
fn inspect_unknown_graph_fails() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = write_config(&tmp, "run.toml", FULL_RUN);
    Command::cargo_bin("snnc")?
        .args(["inspect", "--graph", "snn_graph"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Readout error"));
    Ok(())
}

#[test]
fn verify_reports_missing_attribute() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let graph = tmp.path().join("broken.snn");
    std::fs::write(
        &graph,
        "snn.graph @t0 stages [1] {}\n  neuron 0 { bias = 0.0, du = 0.0, dv = 1.0, u = 0.0, v = 0.0, is_redundant = false }\n",
    )?;
    Command::cargo_bin("snnc")?
        .arg("verify")
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing attribute 'vth'"));
    Ok(())
}

#[test]
fn algorithms_lists_mdsa() -> Result<(), Box<dyn Error>> {
    Command::cargo_bin("snnc")?
        .args(["algorithms", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MDSA"))
        .stdout(predicate::str::contains("m_val: unsigned int"));
    Ok(())
}
