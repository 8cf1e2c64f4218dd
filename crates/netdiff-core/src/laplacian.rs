use crate::{Graph, ZERO_EIGENVALUE_TOL};
use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// Weighted graph Laplacian `L = D - A`.
#[derive(Clone, Debug)]
pub struct Laplacian {
    matrix: DMatrix<f64>,
}

impl Laplacian {
    pub fn from_graph(graph: &Graph) -> Self {
        let n = graph.num_nodes();
        let mut matrix = DMatrix::zeros(n, n);
        for e in graph.edges() {
            matrix[(e.u, e.v)] -= e.w;
            matrix[(e.v, e.u)] -= e.w;
            matrix[(e.u, e.u)] += e.w;
            matrix[(e.v, e.v)] += e.w;
        }
        Self { matrix }
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.matrix * x
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.matrix.row_iter().map(|r| r.sum()).collect()
    }

    /// Gershgorin bound on the largest eigenvalue (twice the max degree).
    pub fn gershgorin_bound(&self) -> f64 {
        self.matrix
            .diagonal()
            .iter()
            .fold(0.0_f64, |acc, d| acc.max(2.0 * d))
    }

    pub fn spectrum(&self) -> Spectrum {
        Spectrum::of_symmetric(self.matrix.clone())
    }
}

/// Eigendecomposition of a symmetric matrix, eigenvalues ascending.
#[derive(Clone, Debug)]
pub struct Spectrum {
    pub eigenvalues: DVector<f64>,
    /// Column `i` is the unit eigenvector for `eigenvalues[i]`.
    pub eigenvectors: DMatrix<f64>,
}

impl Spectrum {
    pub fn of_symmetric(matrix: DMatrix<f64>) -> Self {
        let eigen = SymmetricEigen::new(matrix);
        let n = eigen.eigenvalues.len();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let eigenvalues = DVector::from_iterator(n, order.iter().map(|&i| eigen.eigenvalues[i]));
        let mut eigenvectors = DMatrix::zeros(n, n);
        for (dst, &src) in order.iter().enumerate() {
            eigenvectors.set_column(dst, &eigen.eigenvectors.column(src));
        }

        Self { eigenvalues, eigenvectors }
    }

    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    pub fn smallest(&self) -> f64 {
        self.eigenvalues.get(0).copied().unwrap_or(0.0)
    }

    pub fn largest(&self) -> f64 {
        self.eigenvalues.iter().last().copied().unwrap_or(0.0)
    }

    /// Second-smallest eigenvalue.
    pub fn algebraic_connectivity(&self) -> f64 {
        self.eigenvalues.get(1).copied().unwrap_or(0.0)
    }

    /// Smallest eigenvalue above the zero tolerance.
    pub fn smallest_nonzero(&self) -> Option<f64> {
        self.eigenvalues
            .iter()
            .copied()
            .find(|&l| l > ZERO_EIGENVALUE_TOL)
    }

    /// Null-space dimension; equals the number of connected components for a Laplacian.
    pub fn null_space_dim(&self) -> usize {
        self.eigenvalues
            .iter()
            .filter(|l| l.abs() <= ZERO_EIGENVALUE_TOL)
            .count()
    }
}
