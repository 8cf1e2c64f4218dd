use super::OdeIntegrator;
use crate::{State, Time};
use crate::drift::Drift;

#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl OdeIntegrator for ForwardEuler {
    fn step(&self, t: Time, x: &State, dt: f64, drift: &impl Drift) -> State {
        // X_{t+dt} = X_t + μ(t, X_t)*dt
        let mu = drift.mu(t, x);
        State(&x.0 + &mu.0 * dt)
    }

    fn stability_limit(&self) -> f64 {
        2.0
    }

    fn name(&self) -> &'static str {
        "forward_euler"
    }
}
