use crate::{Drift, OdeIntegrator, SimulationError, State, StepSpec, Trajectory};
use std::time::Instant;

/// Steps between wall-clock checks.
const BUDGET_CHECK_INTERVAL: usize = 64;

/// Fixed-step driver pairing an integrator with a right-hand side.
pub struct Solver<I, D>
where
    I: OdeIntegrator,
    D: Drift,
{
    pub integrator: I,
    pub drift: D,
}

impl<I, D> Solver<I, D>
where
    I: OdeIntegrator,
    D: Drift,
{
    pub fn new(integrator: I, drift: D) -> Self {
        Self { integrator, drift }
    }

    /// Reject `dt` when `stiffness·dt` exceeds the scheme's real-axis bound.
    pub fn check_stability(&self, dt: f64) -> Result<(), SimulationError> {
        let stiffness = self.drift.stiffness();
        let limit = self.integrator.stability_limit();
        if stiffness * dt > limit {
            tracing::debug!(
                integrator = self.integrator.name(),
                stiffness,
                dt,
                limit,
                "step size outside stability region"
            );
            return Err(SimulationError::Unstable { stiffness, dt, limit });
        }
        Ok(())
    }

    /// Integrate from `x0` over `spec`, returning `saved_samples()` states.
    pub fn solve(&self, x0: State, spec: &StepSpec) -> Result<Trajectory, SimulationError> {
        let dt = spec.dt();
        self.check_stability(dt)?;

        let stride = spec.save_stride.max(1);
        let started = Instant::now();
        let mut path = Trajectory::with_capacity(spec.saved_samples());
        let mut x = x0;
        path.push(0.0, x.clone());

        for step in 0..spec.n_steps {
            let t = step as f64 * dt;
            x = self.integrator.step(t, &x, dt, &self.drift);

            let done = step + 1;
            if !x.is_finite() {
                return Err(SimulationError::NonFinite { step: done });
            }
            if done % stride == 0 {
                path.push(done as f64 * dt, x.clone());
            }

            if let Some(budget) = spec.wall_budget {
                let checkpoint = done % BUDGET_CHECK_INTERVAL == 0 || done == spec.n_steps;
                if checkpoint && started.elapsed() > budget {
                    return Err(SimulationError::TimedOut { budget, step: done });
                }
            }
        }

        Ok(path)
    }
}
