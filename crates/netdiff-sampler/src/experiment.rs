use crate::config::{ExperimentConfig, IntegratorKind};
use netdiff_core::{
    ConfigurationError, ForwardEuler, GraphMetrics, Heun, Laplacian, LaplacianDiffusion,
    OdeIntegrator, RungeKutta4, SeedStream, SimulationError, Solver, SpectralReference, State,
    StepSpec, Trajectory,
};
use netdiff_eval::{evaluate, ConservationCheck, EntropyCheck};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    Completed,
    Unstable,
    NonFinite,
    TimedOut,
}

impl RunStatus {
    pub fn is_failure(&self) -> bool {
        !matches!(self, RunStatus::Completed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Unstable => "unstable",
            RunStatus::NonFinite => "non-finite",
            RunStatus::TimedOut => "timed-out",
        }
    }
}

impl From<&SimulationError> for RunStatus {
    fn from(err: &SimulationError) -> Self {
        match err {
            SimulationError::Unstable { .. } => RunStatus::Unstable,
            SimulationError::NonFinite { .. } => RunStatus::NonFinite,
            SimulationError::TimedOut { .. } => RunStatus::TimedOut,
        }
    }
}

/// Outcome of one experiment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: u64,
    pub config: ExperimentConfig,
    pub status: RunStatus,
    /// `None` when the resistance has no closed form; `Some(0.0)` for failed runs.
    pub r_squared: Option<f64>,
    pub conservation: Option<ConservationCheck>,
    pub entropy: Option<EntropyCheck>,
    pub components: usize,
    pub graph: GraphMetrics,
    pub lambda_max: f64,
    pub retried: bool,
    pub elapsed_secs: f64,
}

impl RunRecord {
    pub fn is_disconnected(&self) -> bool {
        self.components > 1
    }

    pub fn reference_unavailable(&self) -> bool {
        self.status == RunStatus::Completed && self.r_squared.is_none()
    }

    pub fn passes(&self, threshold: f64) -> bool {
        self.r_squared.map_or(false, |r2| r2 >= threshold)
    }
}

/// Run one configuration end to end: graph, solve, closed form, evaluation.
///
/// Configuration problems abort with no record. Simulation failures still
/// produce a record so they show up in the report.
pub fn run_experiment(config: &ExperimentConfig, id: u64) -> Result<RunRecord, ConfigurationError> {
    let span = tracing::debug_span!("run", id, n = config.n, topology = %config.topology.kind());
    let _enter = span.enter();

    config.validate()?;
    let started = Instant::now();
    let mut seeds = SeedStream::new(config.seed);
    let rng = seeds.rng();

    let graph = config.topology.generate(config.n, config.weights, rng)?;
    let metrics = GraphMetrics::of(&graph);
    tracing::debug!(
        edges = metrics.edges,
        density = metrics.density,
        clustering = metrics.average_clustering,
        efficiency = metrics.global_efficiency,
        components = metrics.components,
        "graph generated"
    );

    let field = config.resistance.materialize(config.n, rng)?;
    let x0 = config.initial.realize(config.n, rng)?;

    let laplacian = Laplacian::from_graph(&graph);
    let spectrum = laplacian.spectrum();
    let lambda_max = spectrum.largest();
    let drift = LaplacianDiffusion::new(&laplacian, config.diffusion, lambda_max, field.clone())?;

    let spec = config.step_spec();
    let (outcome, retried) = match config.integrator {
        IntegratorKind::ForwardEuler => integrate(ForwardEuler, drift, x0.clone(), &spec),
        IntegratorKind::Heun => integrate(Heun, drift, x0.clone(), &spec),
        IntegratorKind::Rk4 => integrate(RungeKutta4, drift, x0.clone(), &spec),
    };

    let mut record = RunRecord {
        id,
        config: config.clone(),
        status: RunStatus::Completed,
        r_squared: Some(0.0),
        conservation: None,
        entropy: None,
        components: metrics.components,
        graph: metrics,
        lambda_max,
        retried,
        elapsed_secs: 0.0,
    };

    match outcome {
        Ok(path) => {
            let reference = match SpectralReference::new(&laplacian, &spectrum, config.diffusion, &field) {
                Ok(model) => Some(model.trajectory(&x0, &path.times)),
                Err(err) => {
                    tracing::debug!(%err, resistance = config.resistance.label(), "no closed form");
                    None
                }
            };
            let evaluation = evaluate(&path, reference.as_ref(), &field);
            record.r_squared = evaluation.r_squared;
            record.conservation = evaluation.conservation;
            record.entropy = evaluation.entropy;
        }
        Err(err) => {
            tracing::warn!(id, %err, "run failed");
            record.status = RunStatus::from(&err);
        }
    }

    record.elapsed_secs = started.elapsed().as_secs_f64();
    Ok(record)
}

/// Solve, retrying once at half the step size if the first attempt is unstable.
fn integrate<I>(
    integrator: I,
    drift: LaplacianDiffusion,
    x0: State,
    spec: &StepSpec,
) -> (Result<Trajectory, SimulationError>, bool)
where
    I: OdeIntegrator,
{
    let solver = Solver::new(integrator, drift);
    match solver.solve(x0.clone(), spec) {
        Err(SimulationError::Unstable { stiffness, dt, limit }) => {
            let fine = spec.refined();
            tracing::warn!(
                integrator = solver.integrator.name(),
                stiffness,
                dt,
                limit,
                retry_dt = fine.dt(),
                "unstable step size, retrying with halved step"
            );
            (solver.solve(x0, &fine), true)
        }
        other => (other, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialCondition;
    use netdiff_core::{EdgeWeights, ResistanceKind, Topology};

    fn base_config() -> ExperimentConfig {
        ExperimentConfig {
            topology: Topology::ring(),
            n: 12,
            diffusion: 0.5,
            resistance: ResistanceKind::Zero,
            weights: EdgeWeights::Unit,
            initial: InitialCondition::Random,
            horizon: 2.0,
            n_steps: 200,
            integrator: IntegratorKind::Rk4,
            wall_budget_ms: None,
            seed: 9,
        }
    }

    #[test]
    fn test_zero_resistance_run() {
        let record = run_experiment(&base_config(), 0).unwrap();
        assert_eq!(record.status, RunStatus::Completed);
        assert!(!record.retried);
        assert!(record.passes(0.9999));
        assert!(record.conservation.map_or(false, |c| c.conserved));
        assert!(record.entropy.is_none());
        assert_eq!(record.components, 1);
    }

    #[test]
    fn test_saturating_has_no_reference() {
        let config = ExperimentConfig {
            resistance: ResistanceKind::Saturating { rate: 0.1, half_saturation: 1.0 },
            ..base_config()
        };
        let record = run_experiment(&config, 3).unwrap();
        assert!(record.reference_unavailable());
        assert!(record.entropy.is_some());
    }

    #[test]
    fn test_status_from_error() {
        let non_finite = RunStatus::from(&SimulationError::NonFinite { step: 1 });
        assert_eq!(non_finite, RunStatus::NonFinite);
        assert!(non_finite.is_failure());
        let budget = std::time::Duration::ZERO;
        assert_eq!(RunStatus::from(&SimulationError::TimedOut { budget, step: 3 }), RunStatus::TimedOut);
        assert!(!RunStatus::Completed.is_failure());
    }

    #[test]
    fn test_single_node_rejected() {
        let config = ExperimentConfig { n: 1, ..base_config() };
        assert_eq!(run_experiment(&config, 0), Err(ConfigurationError::TooFewNodes(1)));
    }
}
