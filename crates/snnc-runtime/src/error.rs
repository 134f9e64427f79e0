//! Error types for the SNN runtime

use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors that can occur while building or driving a network
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Invalid network configuration
    #[error("Invalid network configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for invalid configuration
        reason: String,
    },

    /// Neuron not found
    #[error("Neuron {neuron_id} not found")]
    NeuronNotFound {
        /// Neuron ID that was not found
        neuron_id: u32,
    },

    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Network topology error
    #[error("Network topology error: {reason}")]
    NetworkTopology {
        /// Reason for topology error
        reason: String,
    },
}

impl RuntimeError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }

    /// Create a network topology error
    pub fn network_topology(reason: impl Into<String>) -> Self {
        Self::NetworkTopology {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = RuntimeError::invalid_config("no neurons");
        assert!(matches!(err, RuntimeError::InvalidConfiguration { .. }));

        let err = RuntimeError::invalid_parameter("vth", "NaN", "finite");
        assert!(matches!(err, RuntimeError::InvalidParameter { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = RuntimeError::NeuronNotFound { neuron_id: 42 };
        assert!(err.to_string().contains("Neuron 42 not found"));

        let err = RuntimeError::invalid_parameter("du", "inf", "finite");
        assert_eq!(err.to_string(), "Invalid parameter du: inf (expected finite)");
    }
}
