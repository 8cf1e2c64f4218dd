use approx::assert_relative_eq;
use netdiff_core::{
    EdgeWeights, Laplacian, LaplacianDiffusion, ResistanceKind, RungeKutta4, SeedStream, Solver,
    SpectralReference, State, StepSpec, Topology,
};
use netdiff_eval::{evaluate, r_squared};
use rand::Rng;

#[test]
fn closed_form_reproduces_integrator_for_linear_resistance() {
    let n = 20;
    let topologies = [
        Topology::ring(),
        Topology::SmallWorld { k: 4, p: 0.2 },
        Topology::ScaleFree { m: 2 },
        Topology::random_with_mean_degree(n, 4.0).unwrap(),
        Topology::Complete,
    ];
    let fields = [
        ResistanceKind::Zero,
        ResistanceKind::Uniform { rate: 0.1 },
        ResistanceKind::RandomPerNode { low: 0.0, high: 0.3 },
        ResistanceKind::Gradient { low: 0.05, high: 0.5 },
    ];

    for (i, topology) in topologies.iter().enumerate() {
        for (j, kind) in fields.iter().enumerate() {
            let mut seeds = SeedStream::for_run(99, (i * 10 + j) as u64);
            let graph = topology.generate(n, EdgeWeights::Unit, seeds.rng()).unwrap();
            let field = kind.materialize(n, seeds.rng()).unwrap();
            let x0 = State::new((0..n).map(|_| seeds.rng().gen::<f64>()).collect());

            let laplacian = Laplacian::from_graph(&graph);
            let spectrum = laplacian.spectrum();
            let coefficient = 0.7;
            let reference = SpectralReference::new(&laplacian, &spectrum, coefficient, &field).unwrap();
            let system = LaplacianDiffusion::new(&laplacian, coefficient, spectrum.largest(), field.clone()).unwrap();

            let spec = StepSpec::new(4.0, 400).with_stride(4);
            let path = Solver::new(RungeKutta4, system).solve(x0.clone(), &spec).unwrap();
            let exact = reference.trajectory(&x0, &path.times);

            let r2 = r_squared(&path, &exact);
            assert!(r2 >= 0.9999, "{:?} / {:?}: R² = {}", topology, kind, r2);

            let eval = evaluate(&path, Some(&exact), &field);
            assert_eq!(eval.r_squared, Some(r2));
            if field.is_zero() {
                assert!(eval.conservation.unwrap().conserved);
                assert!(eval.entropy.is_none());
            } else {
                assert!(eval.conservation.is_none());
                assert!(eval.entropy.is_some());
            }
        }
    }
}

#[test]
fn chain_point_mass_fits_closed_form() {
    let n = 10;
    let mut seeds = SeedStream::new(0);
    let chain = Topology::chain().generate(n, EdgeWeights::Unit, seeds.rng()).unwrap();
    let laplacian = Laplacian::from_graph(&chain);
    let spectrum = laplacian.spectrum();
    let field = ResistanceKind::Zero.materialize(n, seeds.rng()).unwrap();
    let x0 = State::point_mass(n, 0);

    let system = LaplacianDiffusion::new(&laplacian, 1.0, spectrum.largest(), field.clone()).unwrap();
    let path = Solver::new(RungeKutta4, system)
        .solve(x0.clone(), &StepSpec::new(5.0, 200))
        .unwrap();
    let exact = SpectralReference::new(&laplacian, &spectrum, 1.0, &field)
        .unwrap()
        .trajectory(&x0, &path.times);

    let eval = evaluate(&path, Some(&exact), &field);
    let r2 = eval.r_squared.unwrap();
    assert!(r2 >= 0.9999, "chain R² = {}", r2);
    assert!(eval.conservation.unwrap().conserved);
}

#[test]
fn complete_graph_uniform_resistance_entropy_scenario() {
    let n = 50;
    let mut seeds = SeedStream::new(2024);
    let graph = Topology::Complete.generate(n, EdgeWeights::Unit, seeds.rng()).unwrap();
    let field = ResistanceKind::Uniform { rate: 0.1 }.materialize(n, seeds.rng()).unwrap();
    let x0 = State::new((0..n).map(|_| seeds.rng().gen::<f64>()).collect());

    let laplacian = Laplacian::from_graph(&graph);
    let spectrum = laplacian.spectrum();
    let system = LaplacianDiffusion::new(&laplacian, 1.0, spectrum.largest(), field.clone()).unwrap();
    // D·λ_max·dt = 50 · 0.01 = 0.5
    let path = Solver::new(RungeKutta4, system)
        .solve(x0, &StepSpec::new(1.0, 100))
        .unwrap();

    let eval = evaluate(&path, None, &field);
    assert!(eval.r_squared.is_none());
    let entropy = eval.entropy.unwrap();
    assert_eq!(entropy.total_steps, 100);
    assert!(entropy.fraction >= 0.95, "monotonic fraction {}", entropy.fraction);
    assert_relative_eq!(entropy.fraction, entropy.monotonic_steps as f64 / 100.0);
}
