use netdiff_core::{
    ConfigurationError, EdgeWeights, ResistanceKind, SeedStream, State, StepSpec, Topology,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time-stepping scheme for a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegratorKind {
    ForwardEuler,
    Heun,
    #[default]
    Rk4,
}

impl IntegratorKind {
    pub fn label(&self) -> &'static str {
        match self {
            IntegratorKind::ForwardEuler => "forward_euler",
            IntegratorKind::Heun => "heun",
            IntegratorKind::Rk4 => "rk4",
        }
    }
}

/// Initial information density.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InitialCondition {
    /// Independent `U[0, 1)` per node.
    #[default]
    Random,
    PointMass { node: usize },
    Explicit { values: Vec<f64> },
}

impl InitialCondition {
    pub fn validate(&self, n: usize) -> Result<(), ConfigurationError> {
        match self {
            InitialCondition::Random => Ok(()),
            InitialCondition::PointMass { node } if *node < n => Ok(()),
            InitialCondition::PointMass { node } => Err(ConfigurationError::parameter(
                "initial",
                format!("point mass at node {} outside {} nodes", node, n),
            )),
            InitialCondition::Explicit { values } => {
                if values.len() != n {
                    return Err(ConfigurationError::Dimension { expected: n, actual: values.len() });
                }
                if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(ConfigurationError::parameter(
                        "initial",
                        "explicit densities must be finite and non-negative",
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn realize<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<State, ConfigurationError> {
        self.validate(n)?;
        Ok(match self {
            InitialCondition::Random => State::new((0..n).map(|_| rng.gen::<f64>()).collect()),
            InitialCondition::PointMass { node } => State::point_mass(n, *node),
            InitialCondition::Explicit { values } => State::new(values.clone()),
        })
    }
}

/// Everything that determines one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub topology: Topology,
    pub n: usize,
    pub diffusion: f64,
    pub resistance: ResistanceKind,
    #[serde(default)]
    pub weights: EdgeWeights,
    #[serde(default)]
    pub initial: InitialCondition,
    pub horizon: f64,
    pub n_steps: usize,
    #[serde(default)]
    pub integrator: IntegratorKind,
    #[serde(default)]
    pub wall_budget_ms: Option<u64>,
    pub seed: u64,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.topology.validate(self.n)?;
        if !(self.diffusion.is_finite() && self.diffusion > 0.0) {
            return Err(ConfigurationError::DiffusionCoefficient(self.diffusion));
        }
        self.resistance.validate()?;
        self.weights.validate()?;
        self.initial.validate(self.n)?;
        self.step_spec().validate()
    }

    pub fn step_spec(&self) -> StepSpec {
        let spec = StepSpec::new(self.horizon, self.n_steps);
        match self.wall_budget_ms {
            Some(ms) => spec.with_wall_budget(Duration::from_millis(ms)),
            None => spec,
        }
    }
}

/// Topology family before the node count is known.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TopologyFamily {
    Lattice { periodic: bool },
    SmallWorld { k: usize, p: f64 },
    ScaleFree { m: usize },
    /// Erdős–Rényi with `p = mean_degree / (n - 1)`.
    Random { mean_degree: f64 },
    Complete,
}

impl TopologyFamily {
    /// Parameter checks that do not depend on the node count.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            TopologyFamily::Lattice { .. } | TopologyFamily::Complete => Ok(()),
            TopologyFamily::SmallWorld { k, p } => {
                if !(0.0..=1.0).contains(&p) {
                    return Err(ConfigurationError::Probability { name: "p", value: p });
                }
                if k < 2 {
                    return Err(ConfigurationError::parameter("k", format!("small-world degree must be >= 2, got {}", k)));
                }
                Ok(())
            }
            TopologyFamily::ScaleFree { m } if m < 1 => {
                Err(ConfigurationError::parameter("m", "attachment count must be >= 1"))
            }
            TopologyFamily::ScaleFree { .. } => Ok(()),
            TopologyFamily::Random { mean_degree } if mean_degree.is_finite() && mean_degree >= 0.0 => Ok(()),
            TopologyFamily::Random { mean_degree } => Err(ConfigurationError::parameter(
                "mean_degree",
                format!("must be finite and >= 0, got {}", mean_degree),
            )),
        }
    }

    /// Concrete topology on `n` nodes. Degree parameters too large for `n`
    /// are clamped: `k` to the largest even value below `n`, `m` to `n - 1`
    /// and the edge probability to 1.
    pub fn instantiate(&self, n: usize) -> Result<Topology, ConfigurationError> {
        if n < 2 {
            return Err(ConfigurationError::TooFewNodes(n));
        }
        self.validate()?;
        let topology = match *self {
            TopologyFamily::Lattice { periodic } => Topology::Lattice { periodic },
            TopologyFamily::SmallWorld { k, p } if k >= n => Topology::SmallWorld { k: (n - 1) & !1, p },
            TopologyFamily::SmallWorld { k, p } => Topology::SmallWorld { k, p },
            TopologyFamily::ScaleFree { m } => Topology::ScaleFree { m: m.min(n - 1) },
            TopologyFamily::Random { mean_degree } => Topology::Random {
                p: (mean_degree / (n - 1) as f64).min(1.0),
            },
            TopologyFamily::Complete => Topology::Complete,
        };
        topology.validate(n)?;
        Ok(topology)
    }
}

/// Inclusive-exclusive range for uniform draws.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub low: f64,
    pub high: f64,
}

impl UniformRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.low == self.high {
            self.low
        } else {
            rng.gen_range(self.low..self.high)
        }
    }
}

/// Sampling distribution over experiment configurations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSpace {
    pub node_counts: Vec<usize>,
    pub topologies: Vec<TopologyFamily>,
    pub diffusion: UniformRange,
    pub resistances: Vec<ResistanceKind>,
    pub weights: EdgeWeights,
    pub initial: InitialCondition,
    pub horizon: f64,
    pub n_steps: usize,
    pub integrator: IntegratorKind,
    pub wall_budget_ms: Option<u64>,
    pub success_threshold: f64,
}

impl Default for ConfigSpace {
    fn default() -> Self {
        Self {
            node_counts: vec![10, 20, 50, 100],
            topologies: vec![
                TopologyFamily::Lattice { periodic: true },
                TopologyFamily::SmallWorld { k: 4, p: 0.1 },
                TopologyFamily::ScaleFree { m: 2 },
                TopologyFamily::Random { mean_degree: 4.0 },
                TopologyFamily::Complete,
            ],
            diffusion: UniformRange { low: 0.1, high: 2.0 },
            resistances: vec![
                ResistanceKind::Zero,
                ResistanceKind::Uniform { rate: 0.1 },
                ResistanceKind::RandomPerNode { low: 0.0, high: 0.2 },
                ResistanceKind::Gradient { low: 0.0, high: 0.2 },
                ResistanceKind::Saturating { rate: 0.1, half_saturation: 1.0 },
            ],
            weights: EdgeWeights::Unit,
            initial: InitialCondition::Random,
            horizon: 5.0,
            n_steps: 500,
            integrator: IntegratorKind::Rk4,
            wall_budget_ms: None,
            success_threshold: 0.9999,
        }
    }
}

impl ConfigSpace {
    /// Check every combination the space can produce.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.node_counts.is_empty() {
            return Err(ConfigurationError::parameter("node_counts", "at least one node count required"));
        }
        if self.topologies.is_empty() {
            return Err(ConfigurationError::parameter("topologies", "at least one family required"));
        }
        if self.resistances.is_empty() {
            return Err(ConfigurationError::parameter("resistances", "at least one resistance kind required"));
        }
        let UniformRange { low, high } = self.diffusion;
        if !(low.is_finite() && high.is_finite() && low > 0.0 && low <= high) {
            return Err(ConfigurationError::DiffusionCoefficient(low.min(high)));
        }
        if !(0.0..=1.0).contains(&self.success_threshold) {
            return Err(ConfigurationError::Probability {
                name: "success_threshold",
                value: self.success_threshold,
            });
        }

        for family in &self.topologies {
            family.validate()?;
        }
        for &n in &self.node_counts {
            if n < 2 {
                return Err(ConfigurationError::TooFewNodes(n));
            }
            if self.families_for(n).is_empty() {
                return Err(ConfigurationError::parameter(
                    "topologies",
                    format!("no configured family can be built on {} nodes", n),
                ));
            }
            self.initial.validate(n)?;
        }
        for r in &self.resistances {
            r.validate()?;
        }
        self.weights.validate()?;
        StepSpec::new(self.horizon, self.n_steps).validate()
    }

    /// Families that can be built on `n` nodes, in configured order.
    pub fn families_for(&self, n: usize) -> Vec<Topology> {
        self.topologies
            .iter()
            .filter_map(|family| family.instantiate(n).ok())
            .collect()
    }

    /// Draw configuration `run_id` from this space under `global_seed`.
    pub fn sample(&self, global_seed: u64, run_id: u64) -> Result<ExperimentConfig, ConfigurationError> {
        let mut seeds = SeedStream::for_run(global_seed, run_id);
        let rng = seeds.rng();

        let n = *self
            .node_counts
            .choose(rng)
            .ok_or_else(|| ConfigurationError::parameter("node_counts", "empty"))?;
        let topology = self
            .families_for(n)
            .choose(rng)
            .cloned()
            .ok_or_else(|| ConfigurationError::parameter("topologies", format!("none valid for {} nodes", n)))?;
        let diffusion = self.diffusion.sample(rng);
        let resistance = self
            .resistances
            .choose(rng)
            .ok_or_else(|| ConfigurationError::parameter("resistances", "empty"))?
            .clone();

        Ok(ExperimentConfig {
            topology,
            n,
            diffusion,
            resistance,
            weights: self.weights,
            initial: self.initial.clone(),
            horizon: self.horizon,
            n_steps: self.n_steps,
            integrator: self.integrator,
            wall_budget_ms: self.wall_budget_ms,
            seed: rng.gen(),
        })
    }
}
