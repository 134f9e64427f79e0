//! Structured neuron identifiers.
//!
//! Every neuron in a compiled graph is addressed by its role in the algorithm
//! (counter, rank, selector, clock) plus the node/round indices it belongs to.
//! The display name is derived from the structure and `FromStr` is its exact
//! inverse, so readout never has to pattern-match on strings.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::IrError;

/// Prefix carried by the display name of a redundant twin
pub const REDUNDANT_PREFIX: &str = "red_";

/// Role a neuron plays in the compiled network
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NeuronRole {
    /// Accumulates the number of marks `node` received in `round`
    Counter {
        /// Input graph node
        node: usize,
        /// Approximation round
        round: usize,
    },
    /// Fires once the clock has counted past the node's weight
    Rank {
        /// Input graph node
        node: usize,
        /// Approximation round
        round: usize,
    },
    /// Winner-take-all gate: `node` marks `candidate`
    Selector {
        /// Node doing the marking
        node: usize,
        /// Neighbour being marked
        candidate: usize,
        /// Approximation round
        round: usize,
    },
    /// Shared per-round timer
    Clock {
        /// Approximation round
        round: usize,
    },
    /// Hand-built neuron without an algorithm role
    Plain {
        /// Free index
        index: usize,
    },
}

/// Neuron identifier: a role plus the redundancy flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeuronId {
    /// Role of the neuron
    pub role: NeuronRole,
    /// True for the `red_` twin created by redundancy adaptation
    pub redundant: bool,
}

impl NeuronId {
    /// Primary neuron with the given role
    pub const fn new(role: NeuronRole) -> Self {
        Self { role, redundant: false }
    }

    /// `counter_{node}_{round}`
    pub const fn counter(node: usize, round: usize) -> Self {
        Self::new(NeuronRole::Counter { node, round })
    }

    /// `rank_{node}_{round}`
    pub const fn rank(node: usize, round: usize) -> Self {
        Self::new(NeuronRole::Rank { node, round })
    }

    /// `select_{node}_{candidate}_{round}`
    pub const fn selector(node: usize, candidate: usize, round: usize) -> Self {
        Self::new(NeuronRole::Selector { node, candidate, round })
    }

    /// `clock_{round}`
    pub const fn clock(round: usize) -> Self {
        Self::new(NeuronRole::Clock { round })
    }

    /// Bare numeric neuron
    pub const fn plain(index: usize) -> Self {
        Self::new(NeuronRole::Plain { index })
    }

    /// The redundant twin of this neuron
    pub const fn twin(self) -> Self {
        Self { role: self.role, redundant: true }
    }

    /// The primary this neuron belongs to (itself when not redundant)
    pub const fn primary(self) -> Self {
        Self { role: self.role, redundant: false }
    }

    /// True for counter neurons, primary or twin
    pub fn is_counter(&self) -> bool {
        matches!(self.role, NeuronRole::Counter { .. })
    }
}

impl Display for NeuronId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.redundant {
            f.write_str(REDUNDANT_PREFIX)?;
        }
        match self.role {
            NeuronRole::Counter { node, round } => write!(f, "counter_{}_{}", node, round),
            NeuronRole::Rank { node, round } => write!(f, "rank_{}_{}", node, round),
            NeuronRole::Selector { node, candidate, round } => {
                write!(f, "select_{}_{}_{}", node, candidate, round)
            }
            NeuronRole::Clock { round } => write!(f, "clock_{}", round),
            NeuronRole::Plain { index } => write!(f, "{}", index),
        }
    }
}

impl FromStr for NeuronId {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || IrError::BadNeuronName(s.to_string());
        let (redundant, body) = match s.strip_prefix(REDUNDANT_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let mut parts = body.split('_');
        let head = parts.next().ok_or_else(bad)?;
        let nums = parts
            .map(|p| {
                if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(bad());
                }
                p.parse::<usize>().map_err(|_| bad())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let role = match (head, nums.as_slice()) {
            ("counter", &[node, round]) => NeuronRole::Counter { node, round },
            ("rank", &[node, round]) => NeuronRole::Rank { node, round },
            ("select", &[node, candidate, round]) => NeuronRole::Selector { node, candidate, round },
            ("clock", &[round]) => NeuronRole::Clock { round },
            (digits, &[]) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                NeuronRole::Plain { index: digits.parse().map_err(|_| bad())? }
            }
            _ => return Err(bad()),
        };
        Ok(Self { role, redundant })
    }
}

impl Serialize for NeuronId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NeuronId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(NeuronId::counter(2, 3).to_string(), "counter_2_3");
        assert_eq!(NeuronId::counter(2, 3).twin().to_string(), "red_counter_2_3");
        assert_eq!(NeuronId::rank(0, 1).to_string(), "rank_0_1");
        assert_eq!(NeuronId::selector(4, 1, 0).to_string(), "select_4_1_0");
        assert_eq!(NeuronId::clock(7).to_string(), "clock_7");
        assert_eq!(NeuronId::plain(12).to_string(), "12");
    }

    #[test]
    fn parse_names() {
        assert_eq!("red_counter_2_3".parse::<NeuronId>().unwrap(), NeuronId::counter(2, 3).twin());
        assert_eq!("select_0_1_2".parse::<NeuronId>().unwrap(), NeuronId::selector(0, 1, 2));
        assert_eq!("0".parse::<NeuronId>().unwrap(), NeuronId::plain(0));
    }

    #[test]
    fn reject_malformed_names() {
        for bad in ["", "red_", "counter_1", "counter_1_2_3", "clock_", "rank_a_1", "spike_1_1", "counter_-1_0"] {
            assert!(bad.parse::<NeuronId>().is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn twin_and_primary() {
        let id = NeuronId::counter(1, 0);
        assert!(id.twin().redundant);
        assert_eq!(id.twin().primary(), id);
        assert!(id.is_counter());
        assert!(!NeuronId::clock(0).is_counter());
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&NeuronId::counter(2, 3).twin()).unwrap();
        assert_eq!(json, "\"red_counter_2_3\"");
        let back: NeuronId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NeuronId::counter(2, 3).twin());
    }
}
