use nalgebra::DVector;
use serde::{Serialize, Deserialize};

pub type Time = f64;

/// Per-node information density.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State(pub DVector<f64>);

impl State {
    pub fn new(values: Vec<f64>) -> Self {
        State(DVector::from_vec(values))
    }

    pub fn zeros(n: usize) -> Self {
        State(DVector::zeros(n))
    }

    /// Unit mass on a single node.
    pub fn point_mass(n: usize, node: usize) -> Self {
        let mut x = Self::zeros(n);
        if node < n {
            x.0[node] = 1.0;
        }
        x
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn total(&self) -> f64 {
        self.0.sum()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Shannon entropy of the state normalised to a probability vector.
    ///
    /// Non-positive entries contribute nothing; a state with no positive
    /// mass has entropy 0.
    pub fn shannon_entropy(&self) -> f64 {
        let total: f64 = self.0.iter().filter(|v| **v > 0.0).sum();
        if total <= 0.0 || !total.is_finite() {
            return 0.0;
        }
        self.0
            .iter()
            .filter(|v| **v > 0.0)
            .map(|v| {
                let p = v / total;
                -p * p.ln()
            })
            .sum()
    }
}

impl std::ops::Deref for State {
    type Target = DVector<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for State {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<DVector<f64>> for State {
    fn from(v: DVector<f64>) -> Self {
        State(v)
    }
}

impl From<Vec<f64>> for State {
    fn from(v: Vec<f64>) -> Self {
        State::new(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_bounds() {
        let uniform = State::new(vec![2.0; 8]);
        assert!((uniform.shannon_entropy() - (8.0f64).ln()).abs() < 1e-12);

        let peaked = State::point_mass(8, 3);
        assert_eq!(peaked.shannon_entropy(), 0.0);
        assert_eq!(State::zeros(4).shannon_entropy(), 0.0);
    }

    #[test]
    fn test_total() {
        let x = State::new(vec![0.25, 0.5, 0.25]);
        assert!((x.total() - 1.0).abs() < 1e-15);
        assert!(x.is_finite());
        assert!(!State::new(vec![1.0, f64::NAN]).is_finite());
    }
}
