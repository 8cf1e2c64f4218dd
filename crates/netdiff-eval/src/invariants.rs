use netdiff_core::Trajectory;
use serde::{Deserialize, Serialize};

/// Absolute tolerance on `|Σρ(t) − Σρ(0)|`.
pub const CONSERVATION_TOL: f64 = 1e-6;

/// Entropy may fall by at most this much between samples and still count as non-decreasing.
pub const ENTROPY_STEP_TOL: f64 = 1e-10;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConservationCheck {
    pub max_drift: f64,
    pub conserved: bool,
}

/// Largest deviation of the total from its initial value, over all samples.
pub fn check_conservation(path: &Trajectory, tol: f64) -> ConservationCheck {
    let totals = path.totals();
    let initial = totals.first().copied().unwrap_or(0.0);
    let max_drift = totals
        .iter()
        .map(|t| (t - initial).abs())
        .fold(0.0, f64::max);
    let finite = totals.iter().all(|t| t.is_finite());

    ConservationCheck {
        max_drift: if finite { max_drift } else { f64::INFINITY },
        conserved: finite && max_drift <= tol,
    }
}

/// Fraction of sampling intervals over which Shannon entropy did not decrease.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntropyCheck {
    pub monotonic_steps: usize,
    pub total_steps: usize,
    pub fraction: f64,
}

impl EntropyCheck {
    pub fn monotonic(&self) -> bool {
        self.monotonic_steps == self.total_steps
    }
}

pub fn check_entropy(path: &Trajectory, tol: f64) -> EntropyCheck {
    let entropies = path.entropies();
    let total_steps = entropies.len().saturating_sub(1);
    let monotonic_steps = entropies
        .windows(2)
        .filter(|w| w[1] >= w[0] - tol)
        .count();

    EntropyCheck {
        monotonic_steps,
        total_steps,
        fraction: if total_steps == 0 { 1.0 } else { monotonic_steps as f64 / total_steps as f64 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netdiff_core::State;

    fn path(rows: &[&[f64]]) -> Trajectory {
        let mut p = Trajectory::new();
        for (i, r) in rows.iter().enumerate() {
            p.push(i as f64, State::new(r.to_vec()));
        }
        p
    }

    #[test]
    fn test_conservation() {
        let ok = path(&[&[1.0, 0.0], &[0.7, 0.3], &[0.5, 0.5 + 1e-9]]);
        let check = check_conservation(&ok, CONSERVATION_TOL);
        assert!(check.conserved);
        assert!(check.max_drift < 1e-8);

        let leaky = path(&[&[1.0, 0.0], &[0.7, 0.2]]);
        assert!(!check_conservation(&leaky, CONSERVATION_TOL).conserved);
    }

    #[test]
    fn test_entropy_fraction() {
        // spreading, spreading, then re-concentrating
        let p = path(&[&[1.0, 0.0], &[0.8, 0.2], &[0.5, 0.5], &[0.9, 0.1]]);
        let check = check_entropy(&p, ENTROPY_STEP_TOL);
        assert_eq!(check.total_steps, 3);
        assert_eq!(check.monotonic_steps, 2);
        assert!((check.fraction - 2.0 / 3.0).abs() < 1e-15);
        assert!(!check.monotonic());
    }

    #[test]
    fn test_entropy_single_sample() {
        let check = check_entropy(&path(&[&[1.0, 2.0]]), ENTROPY_STEP_TOL);
        assert_eq!(check.total_steps, 0);
        assert!(check.monotonic());
        assert_eq!(check.fraction, 1.0);
    }
}
