use std::time::Duration;

/// Invalid experiment input. Raised before any computation, never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("node count must be at least 2, got {0}")]
    TooFewNodes(usize),

    #[error("probability `{name}` must lie in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("diffusion coefficient must be finite and > 0, got {0}")]
    DiffusionCoefficient(f64),

    #[error("invalid parameter `{name}`: {reason}")]
    Parameter { name: &'static str, reason: String },

    #[error("state dimension {actual} does not match node count {expected}")]
    Dimension { expected: usize, actual: usize },
}

impl ConfigurationError {
    pub fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Parameter { name, reason: reason.into() }
    }
}

/// Integration failure. `Unstable` is recovered by the driver with a smaller step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("step {dt:.3e} violates stability bound: stiffness {stiffness:.3e} * dt > {limit}")]
    Unstable { stiffness: f64, dt: f64, limit: f64 },

    #[error("non-finite state after step {step}")]
    NonFinite { step: usize },

    #[error("wall-clock budget {budget:?} exhausted after step {step}")]
    TimedOut { budget: Duration, step: usize },
}

/// No closed form exists for this resistance field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("closed-form reference unavailable: {reason}")]
pub struct ReferenceUnavailable {
    pub reason: &'static str,
}
