use netdiff_core::Trajectory;

/// Per-sample mean square below which the reference counts as constant.
const DEGENERATE_VARIANCE: f64 = 1e-24;

/// Per-sample mean square residual accepted as a perfect fit for a constant reference.
const RESIDUAL_TOL: f64 = 1e-12;

/// Coefficient of determination `1 − SS_res/SS_tot` over every node of every
/// sample, with `SS_tot` taken about the mean of the reference.
///
/// Returns 0 for mismatched shapes or non-finite input. A constant
/// reference yields 1 when the residuals are negligible and 0 otherwise.
pub fn r_squared(simulated: &Trajectory, reference: &Trajectory) -> f64 {
    if simulated.len() != reference.len() || simulated.is_empty() {
        return 0.0;
    }
    if simulated
        .states
        .iter()
        .zip(&reference.states)
        .any(|(s, r)| s.dim() != r.dim())
    {
        return 0.0;
    }

    let count: usize = reference.states.iter().map(|r| r.dim()).sum();
    if count == 0 {
        return 0.0;
    }

    let mean = reference.states.iter().map(|r| r.sum()).sum::<f64>() / count as f64;
    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for (s, r) in simulated.states.iter().zip(&reference.states) {
        for (a, b) in s.iter().zip(r.iter()) {
            ss_tot += (b - mean).powi(2);
            ss_res += (a - b).powi(2);
        }
    }

    if !(ss_tot.is_finite() && ss_res.is_finite()) {
        return 0.0;
    }
    if ss_tot <= DEGENERATE_VARIANCE * count as f64 {
        return if ss_res <= RESIDUAL_TOL * count as f64 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
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
    fn test_perfect_fit() {
        let a = path(&[&[1.0, 0.0], &[0.6, 0.4], &[0.5, 0.5]]);
        assert_eq!(r_squared(&a, &a), 1.0);
    }

    #[test]
    fn test_known_value() {
        // reference mean 2, SS_tot = 2, SS_res = 0.5
        let reference = path(&[&[1.0], &[2.0], &[3.0]]);
        let simulated = path(&[&[1.5], &[2.0], &[2.5]]);
        assert!((r_squared(&simulated, &reference) - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_constant_reference() {
        let reference = path(&[&[0.5, 0.5], &[0.5, 0.5]]);
        let close = path(&[&[0.5, 0.5], &[0.5, 0.5 + 1e-9]]);
        let far = path(&[&[0.5, 0.5], &[0.4, 0.6]]);
        assert_eq!(r_squared(&close, &reference), 1.0);
        assert_eq!(r_squared(&far, &reference), 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let reference = path(&[&[1.0], &[2.0]]);
        assert_eq!(r_squared(&path(&[&[1.0]]), &reference), 0.0);
        assert_eq!(r_squared(&path(&[&[1.0], &[f64::NAN]]), &reference), 0.0);
        assert_eq!(r_squared(&Trajectory::new(), &Trajectory::new()), 0.0);
    }
}
