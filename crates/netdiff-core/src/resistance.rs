use crate::{ConfigurationError, State};
use nalgebra::DVector;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Resistance field family, as drawn from a configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResistanceKind {
    Zero,
    /// `R(ρ) = r·ρ` on every node.
    Uniform { rate: f64 },
    /// `R_i(ρ) = r_i·ρ_i` with `r_i ~ U[low, high)` fixed for the run.
    RandomPerNode { low: f64, high: f64 },
    /// `r_i` rising linearly from `low` at node 0 to `high` at node n-1.
    Gradient { low: f64, high: f64 },
    /// Nonlinear Michaelis–Menten decay `R(ρ) = r·ρ / (K + ρ)`.
    Saturating { rate: f64, half_saturation: f64 },
}

impl ResistanceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResistanceKind::Zero => "zero",
            ResistanceKind::Uniform { .. } => "uniform",
            ResistanceKind::RandomPerNode { .. } => "random-per-node",
            ResistanceKind::Gradient { .. } => "gradient",
            ResistanceKind::Saturating { .. } => "saturating",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            ResistanceKind::Zero => Ok(()),
            ResistanceKind::Uniform { rate } => check_rate("rate", rate),
            ResistanceKind::RandomPerNode { low, high } | ResistanceKind::Gradient { low, high } => {
                check_rate("low", low)?;
                check_rate("high", high)?;
                if low > high {
                    return Err(ConfigurationError::parameter(
                        "resistance",
                        format!("rate band [{}, {}] is reversed", low, high),
                    ));
                }
                Ok(())
            }
            ResistanceKind::Saturating { rate, half_saturation } => {
                check_rate("rate", rate)?;
                if !(half_saturation.is_finite() && half_saturation > 0.0) {
                    return Err(ConfigurationError::parameter(
                        "half_saturation",
                        format!("must be finite and > 0, got {}", half_saturation),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Fix the field for an `n`-node run.
    pub fn materialize<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<ResistanceField, ConfigurationError> {
        self.validate()?;
        let field = match *self {
            ResistanceKind::Zero => ResistanceField::Zero,
            ResistanceKind::Uniform { rate } if rate == 0.0 => ResistanceField::Zero,
            ResistanceKind::Uniform { rate } => ResistanceField::Uniform(rate),
            ResistanceKind::RandomPerNode { low, high } => {
                let rates = if low == high {
                    DVector::from_element(n, low)
                } else {
                    let dist = Uniform::new(low, high);
                    DVector::from_iterator(n, (0..n).map(|_| dist.sample(rng)))
                };
                ResistanceField::PerNode(rates)
            }
            ResistanceKind::Gradient { low, high } => {
                let span = (n.max(2) - 1) as f64;
                let rates = DVector::from_iterator(
                    n,
                    (0..n).map(|i| low + (high - low) * i as f64 / span),
                );
                ResistanceField::PerNode(rates)
            }
            ResistanceKind::Saturating { rate, half_saturation } => {
                ResistanceField::Saturating { rate, half_saturation }
            }
        };
        Ok(field)
    }
}

fn check_rate(name: &'static str, rate: f64) -> Result<(), ConfigurationError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::parameter(name, format!("decay rate must be finite and >= 0, got {}", rate)))
    }
}

/// Materialized resistance, immutable for one run.
#[derive(Clone, Debug, PartialEq)]
pub enum ResistanceField {
    Zero,
    Uniform(f64),
    PerNode(DVector<f64>),
    Saturating { rate: f64, half_saturation: f64 },
}

impl ResistanceField {
    pub fn apply(&self, x: &State) -> State {
        match self {
            ResistanceField::Zero => State::zeros(x.dim()),
            ResistanceField::Uniform(r) => State(&x.0 * *r),
            ResistanceField::PerNode(rates) => State(x.0.component_mul(rates)),
            ResistanceField::Saturating { rate, half_saturation } => State(x.0.map(|v| {
                let v = v.max(0.0);
                rate * v / (half_saturation + v)
            })),
        }
    }

    /// Per-node decay rates when `R(ρ) = diag(r)·ρ`; `None` for nonlinear fields.
    pub fn linear_rates(&self, n: usize) -> Option<DVector<f64>> {
        match self {
            ResistanceField::Zero => Some(DVector::zeros(n)),
            ResistanceField::Uniform(r) => Some(DVector::from_element(n, *r)),
            ResistanceField::PerNode(rates) => Some(rates.clone()),
            ResistanceField::Saturating { .. } => None,
        }
    }

    /// Common rate when every node decays alike.
    pub fn uniform_rate(&self) -> Option<f64> {
        match self {
            ResistanceField::Zero => Some(0.0),
            ResistanceField::Uniform(r) => Some(*r),
            _ => None,
        }
    }

    /// Lipschitz constant of `R`, used in the stability bound.
    pub fn max_rate(&self) -> f64 {
        match self {
            ResistanceField::Zero => 0.0,
            ResistanceField::Uniform(r) => *r,
            ResistanceField::PerNode(rates) => rates.iter().copied().fold(0.0, f64::max),
            ResistanceField::Saturating { rate, half_saturation } => rate / half_saturation,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.max_rate() == 0.0
    }

    pub fn is_linear(&self) -> bool {
        !matches!(self, ResistanceField::Saturating { .. })
    }
}
