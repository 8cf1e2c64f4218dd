use crate::{ConfigurationError, State, Time};
use std::time::Duration;

/// Time grid for one integration: `n_steps` steps of `horizon / n_steps`,
/// recording every `save_stride`-th state.
#[derive(Clone, Debug, PartialEq)]
pub struct StepSpec {
    pub horizon: Time,
    pub n_steps: usize,
    pub save_stride: usize,
    pub wall_budget: Option<Duration>,
}

impl StepSpec {
    pub fn new(horizon: Time, n_steps: usize) -> Self {
        Self { horizon, n_steps, save_stride: 1, wall_budget: None }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.save_stride = stride.max(1);
        self
    }

    pub fn with_wall_budget(mut self, budget: Duration) -> Self {
        self.wall_budget = Some(budget);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(ConfigurationError::parameter(
                "horizon",
                format!("must be finite and > 0, got {}", self.horizon),
            ));
        }
        if self.n_steps == 0 {
            return Err(ConfigurationError::parameter("n_steps", "must be at least 1"));
        }
        if self.save_stride == 0 || self.n_steps % self.save_stride != 0 {
            return Err(ConfigurationError::parameter(
                "save_stride",
                format!("{} does not divide {} steps", self.save_stride, self.n_steps),
            ));
        }
        Ok(())
    }

    pub fn dt(&self) -> f64 {
        self.horizon / self.n_steps as f64
    }

    /// Same sample times, half the step size.
    pub fn refined(&self) -> Self {
        Self {
            n_steps: self.n_steps * 2,
            save_stride: self.save_stride * 2,
            ..self.clone()
        }
    }

    pub fn saved_samples(&self) -> usize {
        self.n_steps / self.save_stride.max(1) + 1
    }

    /// Times at which states are recorded.
    pub fn sample_times(&self) -> Vec<Time> {
        let dt = self.dt();
        (0..self.saved_samples())
            .map(|k| (k * self.save_stride) as f64 * dt)
            .collect()
    }
}

/// Ordered `(t, ρ(t))` samples of one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    pub times: Vec<Time>,
    pub states: Vec<State>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, t: Time, state: State) {
        self.times.push(t);
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn initial_state(&self) -> Option<&State> {
        self.states.first()
    }

    pub fn final_state(&self) -> Option<&State> {
        self.states.last()
    }

    /// `Σᵢρᵢ(t)` per sample
    pub fn totals(&self) -> Vec<f64> {
        self.states.iter().map(State::total).collect()
    }

    pub fn entropies(&self) -> Vec<f64> {
        self.states.iter().map(State::shannon_entropy).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.states.iter().all(State::is_finite)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Time, &State)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_spec() {
        let spec = StepSpec::new(5.0, 200);
        assert_eq!(spec.dt(), 0.025);
        assert_eq!(spec.saved_samples(), 201);
        let last = spec.sample_times().last().copied().unwrap_or(0.0);
        assert!((last - 5.0).abs() < 1e-12);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_refined_keeps_sample_times() {
        let spec = StepSpec::new(2.0, 50).with_stride(5);
        let fine = spec.refined();
        assert_eq!(fine.dt(), spec.dt() / 2.0);
        assert_eq!(fine.saved_samples(), spec.saved_samples());
        for (a, b) in spec.sample_times().iter().zip(fine.sample_times()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_specs() {
        assert!(StepSpec::new(0.0, 10).validate().is_err());
        assert!(StepSpec::new(1.0, 0).validate().is_err());
        assert!(StepSpec::new(1.0, 10).with_stride(3).validate().is_err());
    }
}
