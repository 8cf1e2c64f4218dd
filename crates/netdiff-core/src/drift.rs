use crate::{ConfigurationError, Laplacian, ResistanceField, State, Time};
use nalgebra::DMatrix;

/// Right-hand side of an autonomous ODE `dx/dt = mu(t, x)`.
pub trait Drift: Send + Sync {
    fn mu(&self, t: Time, x: &State) -> State;

    /// Bound on the magnitude of the Jacobian's eigenvalues.
    fn stiffness(&self) -> f64;
}

/// `dρ/dt = -D·L·ρ - R(ρ)`
#[derive(Clone, Debug)]
pub struct LaplacianDiffusion {
    operator: DMatrix<f64>, // D·L
    coefficient: f64,
    lambda_max: f64,
    resistance: ResistanceField,
}

impl LaplacianDiffusion {
    /// `lambda_max` is the largest eigenvalue of `laplacian` (or an upper bound on it).
    pub fn new(
        laplacian: &Laplacian,
        coefficient: f64,
        lambda_max: f64,
        resistance: ResistanceField,
    ) -> Result<Self, ConfigurationError> {
        if !(coefficient.is_finite() && coefficient > 0.0) {
            return Err(ConfigurationError::DiffusionCoefficient(coefficient));
        }
        if let ResistanceField::PerNode(rates) = &resistance {
            if rates.len() != laplacian.dim() {
                return Err(ConfigurationError::Dimension {
                    expected: laplacian.dim(),
                    actual: rates.len(),
                });
            }
        }
        Ok(Self {
            operator: laplacian.matrix() * coefficient,
            coefficient,
            lambda_max,
            resistance,
        })
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn resistance(&self) -> &ResistanceField {
        &self.resistance
    }

    pub fn dim(&self) -> usize {
        self.operator.nrows()
    }
}

impl Drift for LaplacianDiffusion {
    fn mu(&self, _t: Time, x: &State) -> State {
        let decay = self.resistance.apply(x);
        State(-(&self.operator * &x.0) - decay.0)
    }

    fn stiffness(&self) -> f64 {
        self.coefficient * self.lambda_max + self.resistance.max_rate()
    }
}
