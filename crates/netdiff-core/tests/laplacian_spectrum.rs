use netdiff_core::{EdgeWeights, Laplacian, SeedStream, Topology};
use approx::assert_abs_diff_eq;

fn families(n: usize) -> Vec<Topology> {
    vec![
        Topology::chain(),
        Topology::ring(),
        Topology::SmallWorld { k: 4, p: 0.2 },
        Topology::ScaleFree { m: 2 },
        Topology::random_with_mean_degree(n, 4.0).unwrap(),
        Topology::Complete,
    ]
}

#[test]
fn row_sums_zero_and_smallest_eigenvalue_zero() {
    for &n in &[10usize, 20, 50] {
        for weights in [EdgeWeights::Unit, EdgeWeights::Uniform { low: 0.8, high: 1.2 }] {
            for topology in families(n) {
                let mut seeds = SeedStream::for_run(42, n as u64);
                let graph = topology.generate(n, weights, seeds.rng()).unwrap();
                let laplacian = Laplacian::from_graph(&graph);

                for s in laplacian.row_sums() {
                    assert_abs_diff_eq!(s, 0.0, epsilon = 1e-12);
                }

                let m = laplacian.matrix();
                assert_abs_diff_eq!((m - m.transpose()).norm(), 0.0, epsilon = 1e-15);

                let spectrum = laplacian.spectrum();
                assert_abs_diff_eq!(spectrum.smallest(), 0.0, epsilon = 1e-9);
                assert!(spectrum.eigenvalues.iter().all(|&l| l > -1e-9), "{:?} not PSD", topology);
                assert_eq!(spectrum.null_space_dim(), graph.components().len(), "{:?}", topology);
                assert!(spectrum.largest() <= laplacian.gershgorin_bound() + 1e-9);
            }
        }
    }
}

#[test]
fn complete_graph_algebraic_connectivity_is_n() {
    for &n in &[2usize, 5, 10, 50, 100] {
        let mut seeds = SeedStream::new(0);
        let graph = Topology::Complete.generate(n, EdgeWeights::Unit, seeds.rng()).unwrap();
        let spectrum = Laplacian::from_graph(&graph).spectrum();
        assert_abs_diff_eq!(spectrum.algebraic_connectivity(), n as f64, epsilon = 1e-9);
        assert_abs_diff_eq!(spectrum.largest(), n as f64, epsilon = 1e-9);
    }
}

#[test]
fn pentagon_gap_is_three_minus_phi() {
    let phi = (1.0 + 5.0f64.sqrt()) / 2.0;
    let expected = 2.0 * (1.0 - 72.0f64.to_radians().cos());
    assert_abs_diff_eq!(expected, 3.0 - phi, epsilon = 1e-12);

    let mut seeds = SeedStream::new(0);
    let pentagon = Topology::ring().generate(5, EdgeWeights::Unit, seeds.rng()).unwrap();
    let spectrum = Laplacian::from_graph(&pentagon).spectrum();

    let gap = spectrum.smallest_nonzero().unwrap();
    assert_abs_diff_eq!(gap, expected, epsilon = 1e-9);
    assert_abs_diff_eq!(gap, 3.0 - phi, epsilon = 1e-9);
    // Upper pair: 2(1 - cos 144°) = φ + 2
    assert_abs_diff_eq!(spectrum.largest(), phi + 2.0, epsilon = 1e-9);
}

#[test]
fn ring_spectrum_matches_cosine_formula() {
    let n = 12;
    let mut seeds = SeedStream::new(0);
    let ring = Topology::ring().generate(n, EdgeWeights::Unit, seeds.rng()).unwrap();
    let spectrum = Laplacian::from_graph(&ring).spectrum();

    let mut expected: Vec<f64> = (0..n)
        .map(|k| 2.0 - 2.0 * (2.0 * std::f64::consts::PI * k as f64 / n as f64).cos())
        .collect();
    expected.sort_by(|a, b| a.total_cmp(b));
    for (got, want) in spectrum.eigenvalues.iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
    }
}
