pub mod forward_euler;
pub mod heun;
pub mod runge_kutta4;

use crate::{State, Time};
use crate::drift::Drift;

pub use forward_euler::ForwardEuler;
pub use heun::Heun;
pub use runge_kutta4::RungeKutta4;

/// Explicit one-step scheme for `dx/dt = mu(t, x)`.
pub trait OdeIntegrator: Send + Sync {
    fn step(&self, t: Time, x: &State, dt: f64, drift: &impl Drift) -> State;

    /// Largest `|λ|·dt` on the negative real axis for which the scheme is stable.
    fn stability_limit(&self) -> f64;

    fn name(&self) -> &'static str;
}
