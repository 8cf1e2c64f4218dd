use crate::{load_space, write_report, ReportDocument, RunManifest, SpectrumSummary, SummaryTable};
use clap::{Args, Parser, Subcommand, ValueEnum};
use netdiff_sampler::{ConfigSpace, Driver, IntegratorKind, TopologyFamily};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netdiff")]
#[command(about = "Graph diffusion validator")]
#[command(long_about = "Samples random graph diffusion experiments, integrates them numerically \
and scores each trajectory against the closed-form spectral solution")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub sweep: SweepArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the Laplacian spectrum of one generated graph
    Spectrum {
        /// Topology family
        #[arg(long, value_enum)]
        topology: TopologyArg,

        /// Number of nodes
        #[arg(short = 'n', long = "nodes")]
        n: usize,

        /// Random seed for stochastic families
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

/// Sweep options; each one given overrides the space file and built-in defaults.
#[derive(Args, Clone, Debug)]
pub struct SweepArgs {
    /// Number of experiments
    #[arg(long, default_value = "1000")]
    pub runs: usize,

    /// Comma-separated node counts [default: 10,20,50,100]
    #[arg(long, value_delimiter = ',')]
    pub node_counts: Option<Vec<usize>>,

    /// R² needed for a run to count as a success [default: 0.9999]
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Global random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Integration horizon T [default: 5]
    #[arg(long)]
    pub horizon: Option<f64>,

    /// Integration steps N [default: 500]
    #[arg(long)]
    pub steps: Option<usize>,

    /// Time-stepping scheme [default: rk4]
    #[arg(long, value_enum)]
    pub integrator: Option<IntegratorArg>,

    /// Per-run wall-clock budget in milliseconds
    #[arg(long)]
    pub budget_ms: Option<u64>,

    /// Run experiments one after another instead of on the thread pool
    #[arg(long)]
    pub sequential: bool,

    /// JSON configuration space (missing fields take defaults)
    #[arg(long)]
    pub space_file: Option<PathBuf>,

    /// Write a JSON report with a reproducibility manifest
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Include every run record in the JSON report
    #[arg(long)]
    pub records: bool,
}

impl SweepArgs {
    /// Layer command-line overrides on top of `base`.
    pub fn apply(&self, mut space: ConfigSpace) -> ConfigSpace {
        if let Some(counts) = &self.node_counts {
            space.node_counts = counts.clone();
        }
        if let Some(threshold) = self.threshold {
            space.success_threshold = threshold;
        }
        if let Some(horizon) = self.horizon {
            space.horizon = horizon;
        }
        if let Some(steps) = self.steps {
            space.n_steps = steps;
        }
        if let Some(integrator) = self.integrator {
            space.integrator = integrator.into();
        }
        if self.budget_ms.is_some() {
            space.wall_budget_ms = self.budget_ms;
        }
        space
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TopologyArg {
    /// Open chain
    #[value(name = "lattice")]
    Lattice,
    #[value(name = "ring")]
    Ring,
    /// Watts–Strogatz, k = 4, p = 0.1
    #[value(name = "small-world")]
    SmallWorld,
    /// Barabási–Albert, m = 2
    #[value(name = "scale-free")]
    ScaleFree,
    /// Erdős–Rényi with mean degree 4
    #[value(name = "random")]
    Random,
    #[value(name = "complete")]
    Complete,
}

impl From<TopologyArg> for TopologyFamily {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::Lattice => TopologyFamily::Lattice { periodic: false },
            TopologyArg::Ring => TopologyFamily::Lattice { periodic: true },
            TopologyArg::SmallWorld => TopologyFamily::SmallWorld { k: 4, p: 0.1 },
            TopologyArg::ScaleFree => TopologyFamily::ScaleFree { m: 2 },
            TopologyArg::Random => TopologyFamily::Random { mean_degree: 4.0 },
            TopologyArg::Complete => TopologyFamily::Complete,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IntegratorArg {
    #[value(name = "euler")]
    Euler,
    #[value(name = "heun")]
    Heun,
    #[value(name = "rk4")]
    Rk4,
}

impl From<IntegratorArg> for IntegratorKind {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Euler => IntegratorKind::ForwardEuler,
            IntegratorArg::Heun => IntegratorKind::Heun,
            IntegratorArg::Rk4 => IntegratorKind::Rk4,
        }
    }
}

pub async fn run_sweep_command(args: SweepArgs) -> anyhow::Result<()> {
    let base = match &args.space_file {
        Some(path) => load_space(path).await?,
        None => ConfigSpace::default(),
    };
    let space = args.apply(base);

    let mut driver = Driver::new(space.clone(), args.runs, args.seed);
    if args.sequential {
        driver = driver.sequential();
    }
    let report = driver.run()?;

    println!("{}", SummaryTable(&report));

    if let Some(out) = &args.out {
        let report = if args.records { report } else { report.without_records() };
        let manifest = RunManifest::new(args.seed, args.runs, !args.sequential);
        let document = ReportDocument { manifest, space, report };
        write_report(out, &document).await?;
        println!("Wrote report to {}", out.display());
    }

    Ok(())
}

pub async fn run_spectrum_command(topology: TopologyArg, n: usize, seed: u64) -> anyhow::Result<()> {
    let summary = SpectrumSummary::compute(topology.into(), n, seed)?;
    println!("{}", summary);
    Ok(())
}
