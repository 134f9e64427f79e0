//! Run configuration and its validated, typed views
//!
//! Settings arrive as loosely typed maps (deserialized from TOML or JSON);
//! the typed views are where non-integer `m_val`, unknown names and
//! out-of-range levels become configuration errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use snnc_ir::NeuronId;

use crate::{mdsa, CompilerError, Result};

/// Settings of one named algorithm / adaptation / radiation entry
pub type Settings = BTreeMap<String, Value>;

/// One experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Algorithm name -> settings (exactly one entry)
    pub algorithm: BTreeMap<String, Settings>,
    /// Adaptation name -> level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptation: Option<BTreeMap<String, Value>>,
    /// Radiation model name -> setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiation: Option<BTreeMap<String, Value>>,
    /// Seed for algorithm properties and random fault placement
    pub seed: u64,
    /// Node count of the input graph
    pub graph_size: usize,
    /// Index into the catalogue for `graph_size`
    pub graph_nr: usize,
}

/// Validated algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmConfig {
    /// Minimum dominating set approximation
    Mdsa {
        /// Approximation rounds
        m_val: usize,
    },
}

/// Validated adaptation selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdaptationConfig {
    /// Twin counter neurons; level in (0, 1]
    Redundancy {
        /// Fraction of counter neurons that get a twin
        level: f64,
    },
}

/// Validated radiation model
#[derive(Debug, Clone, PartialEq)]
pub enum RadiationConfig {
    /// Each neuron dies independently with `probability`
    NeuronDeath {
        /// Per-neuron death probability in [0, 1]
        probability: f64,
    },
    /// The named neurons die
    Explicit {
        /// Neurons to kill
        neurons: Vec<NeuronId>,
    },
}

/// Adaptation key for redundancy
pub const REDUNDANCY: &str = "redundancy";
/// Radiation key for random neuron death
pub const NEURON_DEATH: &str = "neuron_death";
/// Radiation key for explicit placement
pub const EXPLICIT: &str = "explicit";

impl RunConfig {
    /// Minimal MDSA configuration
    pub fn mdsa(m_val: usize, graph_size: usize, graph_nr: usize, seed: u64) -> Self {
        let mut settings = Settings::new();
        settings.insert("m_val".into(), Value::from(m_val as u64));
        let mut algorithm = BTreeMap::new();
        algorithm.insert(mdsa::ALGORITHM_NAME.to_string(), settings);
        Self {
            algorithm,
            adaptation: None,
            radiation: None,
            seed,
            graph_size,
            graph_nr,
        }
    }

    /// Builder-style redundancy adaptation
    pub fn with_redundancy(mut self, level: f64) -> Self {
        let mut adaptation = BTreeMap::new();
        adaptation.insert(REDUNDANCY.to_string(), Value::from(level));
        self.adaptation = Some(adaptation);
        self
    }

    /// Builder-style radiation entry
    pub fn with_radiation(mut self, name: &str, setting: Value) -> Self {
        let mut radiation = BTreeMap::new();
        radiation.insert(name.to_string(), setting);
        self.radiation = Some(radiation);
        self
    }

    /// The single configured algorithm
    pub fn algorithm(&self) -> Result<AlgorithmConfig> {
        let mut entries = self.algorithm.iter();
        let (name, settings) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            (None, _) => return Err(CompilerError::config("no algorithm configured")),
            (Some(_), Some(_)) => {
                let names: Vec<&str> = self.algorithm.keys().map(String::as_str).collect();
                return Err(CompilerError::config(format!(
                    "expected exactly one algorithm, got {:?}",
                    names
                )));
            }
        };

        match name.as_str() {
            mdsa::ALGORITHM_NAME => {
                let m_val = settings
                    .get("m_val")
                    .ok_or_else(|| CompilerError::config("MDSA requires 'm_val'"))?;
                let m_val = m_val.as_u64().ok_or_else(|| {
                    CompilerError::config(format!("m_val must be a non-negative integer, got {}", m_val))
                })?;
                let m_val = usize::try_from(m_val)
                    .map_err(|_| CompilerError::config(format!("m_val {} out of range", m_val)))?;
                if let Some(extra) = settings.keys().find(|k| k.as_str() != "m_val") {
                    return Err(CompilerError::config(format!("unknown MDSA setting '{}'", extra)));
                }
                Ok(AlgorithmConfig::Mdsa { m_val })
            }
            other => Err(CompilerError::config(format!("unsupported algorithm '{}'", other))),
        }
    }

    /// The configured adaptation; an absent or empty map means none
    pub fn adaptation(&self) -> Result<Option<AdaptationConfig>> {
        let Some((name, value)) = single_entry(self.adaptation.as_ref(), "adaptation")? else {
            return Ok(None);
        };
        match name {
            REDUNDANCY => {
                let level = value.as_f64().ok_or_else(|| {
                    CompilerError::config(format!("redundancy level must be a number, got {}", value))
                })?;
                validate_redundancy_level(level)?;
                Ok(Some(AdaptationConfig::Redundancy { level }))
            }
            other => Err(CompilerError::config(format!("unsupported adaptation '{}'", other))),
        }
    }

    /// The configured radiation model; an absent or empty map means none
    pub fn radiation(&self) -> Result<Option<RadiationConfig>> {
        let Some((name, value)) = single_entry(self.radiation.as_ref(), "radiation")? else {
            return Ok(None);
        };
        match name {
            NEURON_DEATH => {
                let probability = value.as_f64().ok_or_else(|| {
                    CompilerError::config(format!("neuron_death probability must be a number, got {}", value))
                })?;
                validate_probability(probability)?;
                Ok(Some(RadiationConfig::NeuronDeath { probability }))
            }
            EXPLICIT => {
                let names = value.as_array().ok_or_else(|| {
                    CompilerError::config(format!("explicit radiation expects a list of neuron names, got {}", value))
                })?;
                let neurons = names
                    .iter()
                    .map(|n| {
                        let s = n
                            .as_str()
                            .ok_or_else(|| CompilerError::config(format!("neuron name must be a string, got {}", n)))?;
                        s.parse::<NeuronId>()
                            .map_err(|e| CompilerError::config(e.to_string()))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(RadiationConfig::Explicit { neurons }))
            }
            other => Err(CompilerError::config(format!("unsupported radiation model '{}'", other))),
        }
    }

    /// Validate every typed view at once
    pub fn validate(&self) -> Result<()> {
        self.algorithm()?;
        self.adaptation()?;
        self.radiation()?;
        Ok(())
    }
}

fn single_entry<'a>(map: Option<&'a BTreeMap<String, Value>>, what: &str) -> Result<Option<(&'a str, &'a Value)>> {
    let Some(map) = map else {
        return Ok(None);
    };
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (None, _) => Ok(None),
        (Some((name, value)), None) => Ok(Some((name.as_str(), value))),
        (Some(_), Some(_)) => Err(CompilerError::config(format!(
            "expected at most one {}, got {:?}",
            what,
            map.keys().collect::<Vec<_>>()
        ))),
    }
}

/// Redundancy levels must lie in (0, 1]
pub fn validate_redundancy_level(level: f64) -> Result<()> {
    if !level.is_finite() || level <= 0.0 {
        return Err(CompilerError::config(format!(
            "redundancy level {} must be > 0: a requested adaptation has to add neurons",
            level
        )));
    }
    if level > 1.0 {
        return Err(CompilerError::config(format!(
            "redundancy level {} above 1 not supported",
            level
        )));
    }
    Ok(())
}

/// Probabilities must lie in [0, 1]
pub fn validate_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(CompilerError::config(format!("probability {} outside [0, 1]", p)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mdsa_view() {
        let cfg = RunConfig::mdsa(2, 4, 0, 7);
        assert_eq!(cfg.algorithm().unwrap(), AlgorithmConfig::Mdsa { m_val: 2 });
        assert_eq!(cfg.adaptation().unwrap(), None);
        assert_eq!(cfg.radiation().unwrap(), None);
    }

    #[test]
    fn non_integer_m_val_rejected() {
        for bad in [json!(1.5), json!(-1), json!("1"), json!(true)] {
            let mut cfg = RunConfig::mdsa(0, 2, 0, 0);
            cfg.algorithm.get_mut("MDSA").unwrap().insert("m_val".into(), bad.clone());
            assert!(
                matches!(cfg.algorithm(), Err(CompilerError::Configuration { .. })),
                "accepted m_val {}",
                bad
            );
        }
    }

    #[test]
    fn unsupported_or_multiple_algorithms_rejected() {
        let mut cfg = RunConfig::mdsa(0, 2, 0, 0);
        cfg.algorithm.insert("Other".into(), Settings::new());
        let err = cfg.algorithm().unwrap_err();
        assert!(err.to_string().contains("exactly one algorithm"));

        let mut cfg = RunConfig::mdsa(0, 2, 0, 0);
        let settings = cfg.algorithm.remove("MDSA").unwrap();
        cfg.algorithm.insert("MIS".into(), settings);
        assert!(cfg.algorithm().unwrap_err().to_string().contains("unsupported algorithm 'MIS'"));

        cfg.algorithm.clear();
        assert!(cfg.algorithm().is_err());
    }

    #[test]
    fn redundancy_level_bounds() {
        let cfg = RunConfig::mdsa(0, 2, 0, 0);
        assert!(matches!(cfg.clone().with_redundancy(0.0).adaptation(), Err(CompilerError::Configuration { .. })));
        let err = cfg.clone().with_redundancy(1.5).adaptation().unwrap_err();
        assert!(err.to_string().contains("above 1 not supported"));
        assert_eq!(
            cfg.clone().with_redundancy(1.0).adaptation().unwrap(),
            Some(AdaptationConfig::Redundancy { level: 1.0 })
        );
        assert!(cfg.clone().with_redundancy(0.5).adaptation().is_ok());
    }

    #[test]
    fn non_numeric_redundancy_rejected() {
        let mut cfg = RunConfig::mdsa(0, 2, 0, 0);
        let mut adaptation = BTreeMap::new();
        adaptation.insert(REDUNDANCY.to_string(), json!("full"));
        cfg.adaptation = Some(adaptation);
        assert!(cfg.adaptation().is_err());
    }

    #[test]
    fn radiation_views() {
        let cfg = RunConfig::mdsa(0, 2, 0, 0).with_radiation(NEURON_DEATH, json!(0.25));
        assert_eq!(cfg.radiation().unwrap(), Some(RadiationConfig::NeuronDeath { probability: 0.25 }));

        let cfg = RunConfig::mdsa(0, 2, 0, 0).with_radiation(NEURON_DEATH, json!(1.25));
        assert!(cfg.radiation().is_err());

        let cfg = RunConfig::mdsa(0, 2, 0, 0).with_radiation(EXPLICIT, json!(["counter_1_0", "clock_0"]));
        assert_eq!(
            cfg.radiation().unwrap(),
            Some(RadiationConfig::Explicit { neurons: vec![NeuronId::counter(1, 0), NeuronId::clock(0)] })
        );

        let cfg = RunConfig::mdsa(0, 2, 0, 0).with_radiation("cosmic_rays", json!(1));
        assert!(cfg.radiation().is_err());
    }

    #[test]
    fn loads_from_toml() {
        let text = r#"
            seed = 5
            graph_size = 4
            graph_nr = 0

            [algorithm.MDSA]
            m_val = 1

            [adaptation]
            redundancy = 1.0
        "#;
        let cfg: RunConfig = toml::from_str(text).unwrap();
        assert_eq!(cfg.algorithm().unwrap(), AlgorithmConfig::Mdsa { m_val: 1 });
        assert_eq!(cfg.adaptation().unwrap(), Some(AdaptationConfig::Redundancy { level: 1.0 }));
        assert!(cfg.radiation.is_none());
        assert!(cfg.validate().is_ok());
    }
}
