use netdiff_core::{
    EdgeWeights, Laplacian, LaplacianDiffusion, ResistanceKind, RungeKutta4, SeedStream, Solver,
    State, StepSpec, Topology, Trajectory,
};
use rand::Rng;

fn run(global_seed: u64, run_id: u64) -> (Vec<(usize, usize)>, Trajectory) {
    let n = 25;
    let mut seeds = SeedStream::for_run(global_seed, run_id);
    let graph = Topology::SmallWorld { k: 4, p: 0.3 }
        .generate(n, EdgeWeights::Uniform { low: 0.5, high: 1.5 }, seeds.rng())
        .unwrap();
    let field = ResistanceKind::RandomPerNode { low: 0.0, high: 0.2 }
        .materialize(n, seeds.rng())
        .unwrap();
    let x0 = State::new((0..n).map(|_| seeds.rng().gen::<f64>()).collect());

    let laplacian = Laplacian::from_graph(&graph);
    let lambda_max = laplacian.spectrum().largest();
    let system = LaplacianDiffusion::new(&laplacian, 0.8, lambda_max, field).unwrap();
    let path = Solver::new(RungeKutta4, system)
        .solve(x0, &StepSpec::new(3.0, 300).with_stride(10))
        .unwrap();

    let edges = graph.edges().iter().map(|e| (e.u, e.v)).collect();
    (edges, path)
}

#[test]
fn same_seed_same_graph_and_trajectory() {
    let (edges_a, path_a) = run(42, 17);
    let (edges_b, path_b) = run(42, 17);
    assert_eq!(edges_a, edges_b);
    assert_eq!(path_a, path_b);
}

#[test]
fn different_runs_differ() {
    let (edges_a, _) = run(42, 17);
    let (edges_b, _) = run(42, 18);
    assert_ne!(edges_a, edges_b);
}
