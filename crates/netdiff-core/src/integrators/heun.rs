use super::OdeIntegrator;
use crate::{State, Time};
use crate::drift::Drift;

/// Heun's method (explicit trapezoidal rule), second order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Heun;

impl OdeIntegrator for Heun {
    fn step(&self, t: Time, x: &State, dt: f64, drift: &impl Drift) -> State {
        // Predictor step
        let mu0 = drift.mu(t, x);
        let x_tilde = State(&x.0 + &mu0.0 * dt);

        // Corrector averages both slopes
        let mu1 = drift.mu(t + dt, &x_tilde);
        State(&x.0 + (&mu0.0 + &mu1.0) * (0.5 * dt))
    }

    fn stability_limit(&self) -> f64 {
        2.0
    }

    fn name(&self) -> &'static str {
        "heun"
    }
}
