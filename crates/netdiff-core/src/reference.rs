use crate::{Laplacian, ReferenceUnavailable, ResistanceField, Spectrum, State, Time, Trajectory};
use nalgebra::{DMatrix, DVector};

/// Closed-form solution `ρ(t) = V·exp(-Λt)·Vᵀ·ρ₀` of the linear system
/// `dρ/dt = -(D·L + diag(r))·ρ`.
#[derive(Clone, Debug)]
pub struct SpectralReference {
    rates: DVector<f64>,       // eigenvalues of D·L + diag(r)
    eigenvectors: DMatrix<f64>,
}

impl SpectralReference {
    /// `spectrum` must be the spectrum of `laplacian`. Uniform decay reuses it
    /// with a shift; per-node decay needs a fresh decomposition.
    pub fn new(
        laplacian: &Laplacian,
        spectrum: &Spectrum,
        coefficient: f64,
        resistance: &ResistanceField,
    ) -> Result<Self, ReferenceUnavailable> {
        if let Some(r) = resistance.uniform_rate() {
            return Ok(Self {
                rates: spectrum.eigenvalues.map(|l| coefficient * l + r),
                eigenvectors: spectrum.eigenvectors.clone(),
            });
        }

        let decay = resistance
            .linear_rates(laplacian.dim())
            .ok_or(ReferenceUnavailable { reason: "nonlinear resistance field" })?;
        let operator = laplacian.matrix() * coefficient + DMatrix::from_diagonal(&decay);
        let shifted = Spectrum::of_symmetric(operator);
        Ok(Self {
            rates: shifted.eigenvalues,
            eigenvectors: shifted.eigenvectors,
        })
    }

    /// Modal decay rates, ascending.
    pub fn rates(&self) -> &DVector<f64> {
        &self.rates
    }

    pub fn project(&self, x0: &State) -> Projection<'_> {
        Projection {
            reference: self,
            coefficients: self.eigenvectors.tr_mul(&x0.0),
        }
    }

    pub fn evaluate(&self, x0: &State, t: Time) -> State {
        self.project(x0).at(t)
    }

    pub fn trajectory(&self, x0: &State, times: &[Time]) -> Trajectory {
        let projection = self.project(x0);
        let mut path = Trajectory::with_capacity(times.len());
        for &t in times {
            path.push(t, projection.at(t));
        }
        path
    }
}

/// Initial state expressed in the eigenbasis, reusable for any `t`.
pub struct Projection<'a> {
    reference: &'a SpectralReference,
    coefficients: DVector<f64>,
}

impl Projection<'_> {
    pub fn at(&self, t: Time) -> State {
        let weighted = self
            .coefficients
            .zip_map(&self.reference.rates, |c, rate| c * (-rate * t).exp());
        State(&self.reference.eigenvectors * weighted)
    }
}
