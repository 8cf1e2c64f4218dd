use super::OdeIntegrator;
use crate::{State, Time};
use crate::drift::Drift;

/// Classical fourth-order Runge–Kutta.
#[derive(Clone, Copy, Debug, Default)]
pub struct RungeKutta4;

/// Real-axis stability boundary of RK4, root of `|1 + z + z²/2 + z³/6 + z⁴/24| = 1`.
pub const RK4_REAL_AXIS_LIMIT: f64 = 2.7852935634052813;

impl OdeIntegrator for RungeKutta4 {
    fn step(&self, t: Time, x: &State, dt: f64, drift: &impl Drift) -> State {
        let half = 0.5 * dt;
        let k1 = drift.mu(t, x);
        let k2 = drift.mu(t + half, &State(&x.0 + &k1.0 * half));
        let k3 = drift.mu(t + half, &State(&x.0 + &k2.0 * half));
        let k4 = drift.mu(t + dt, &State(&x.0 + &k3.0 * dt));

        let slope = &k1.0 + &k2.0 * 2.0 + &k3.0 * 2.0 + &k4.0;
        State(&x.0 + slope * (dt / 6.0))
    }

    fn stability_limit(&self) -> f64 {
        RK4_REAL_AXIS_LIMIT
    }

    fn name(&self) -> &'static str {
        "rk4"
    }
}
