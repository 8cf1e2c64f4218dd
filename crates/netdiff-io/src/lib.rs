use netdiff_core::{
    ConfigurationError, EdgeWeights, GraphMetrics, Laplacian, SeedStream, TopologyKind,
};
use netdiff_sampler::{ConfigSpace, Report, TopologyFamily};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

pub mod cli;
pub use cli::*;

/// Provenance recorded alongside every JSON report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub seed: u64,
    pub runs: usize,
    pub parallel: bool,
    pub commit_hash: Option<String>,
    pub rust_version: String,
    pub version: String,
}

impl RunManifest {
    pub fn new(seed: u64, runs: usize, parallel: bool) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            seed,
            runs,
            parallel,
            commit_hash: get_git_commit(),
            rust_version: get_rust_version(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Everything needed to reproduce and audit a sweep.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportDocument {
    pub manifest: RunManifest,
    pub space: ConfigSpace,
    pub report: Report,
}

impl ReportDocument {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&json)?)
    }
}

pub async fn write_report(path: &Path, document: &ReportDocument) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    tokio::fs::write(path, json).await?;
    tracing::info!(path = %path.display(), run_id = %document.manifest.run_id, "report written");
    Ok(())
}

/// Read a configuration space; fields left out keep their defaults.
pub async fn load_space(path: &Path) -> anyhow::Result<ConfigSpace> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read space file {}: {}", path.display(), e))?;
    let space: ConfigSpace = serde_json::from_str(&json)?;
    space.validate()?;
    Ok(space)
}

/// Human-readable sweep summary, one row per topology.
pub struct SummaryTable<'a>(pub &'a Report);

fn percent(rate: Option<f64>) -> String {
    rate.map_or_else(|| "-".to_string(), |r| format!("{:.1}%", 100.0 * r))
}

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Graph Diffusion Validation")?;
        writeln!(f, "==========================")?;
        writeln!(
            f,
            "{:<12} {:>6} {:>10} {:>8} {:>13} {:>9} {:>12}",
            "topology", "runs", "mean R²", "pass", "conservation", "entropy", "disconnected"
        )?;
        for (kind, row) in &report.by_topology {
            let pass = (row.runs > 0).then(|| row.successes as f64 / row.runs as f64);
            writeln!(
                f,
                "{:<12} {:>6} {:>10.6} {:>8} {:>13} {:>9} {:>12}",
                kind.label(),
                row.runs,
                row.r_squared.mean,
                percent(pass),
                percent(row.conservation.rate()),
                percent(row.entropy.rate()),
                row.disconnected,
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Successes: {} / {} ({}) at R² >= {}",
            report.successes,
            report.total_runs,
            percent((report.total_runs > 0).then(|| report.success_rate())),
            report.success_threshold
        )?;
        let r2 = &report.r_squared;
        writeln!(
            f,
            "R²: mean {:.6}  median {:.6}  min {:.6}  max {:.6}  std {:.2e}",
            r2.mean, r2.median, r2.min, r2.max, r2.std
        )?;
        writeln!(
            f,
            "Conservation: {}  Entropy monotonic: {} (mean fraction {})",
            percent(report.conservation.rate()),
            percent(report.entropy.rate()),
            percent(report.mean_entropy_fraction)
        )?;
        writeln!(
            f,
            "Disconnected graphs: {}  No closed form: {}  Retried: {}",
            report.disconnected, report.reference_unavailable, report.retried
        )?;
        if !report.failures.is_empty() {
            let causes: Vec<String> = report
                .failures
                .iter()
                .map(|(status, count)| format!("{} {}", status.label(), count))
                .collect();
            writeln!(f, "Failures: {}", causes.join(", "))?;
        }
        write!(
            f,
            "Wall clock: {:.2}s ({:.2}ms per run)",
            report.wall_clock_secs,
            1e3 * report.mean_run_secs
        )
    }
}

/// Laplacian spectrum of a single generated graph.
#[derive(Clone, Debug, Serialize)]
pub struct SpectrumSummary {
    pub kind: TopologyKind,
    pub eigenvalues: Vec<f64>,
    pub algebraic_connectivity: f64,
    pub largest: f64,
    pub null_space_dim: usize,
    pub metrics: GraphMetrics,
}

impl SpectrumSummary {
    pub fn compute(family: TopologyFamily, n: usize, seed: u64) -> Result<Self, ConfigurationError> {
        let topology = family.instantiate(n)?;
        let mut seeds = SeedStream::new(seed);
        let graph = topology.generate(n, EdgeWeights::Unit, seeds.rng())?;
        let spectrum = Laplacian::from_graph(&graph).spectrum();

        Ok(Self {
            kind: topology.kind(),
            eigenvalues: spectrum.eigenvalues.iter().copied().collect(),
            algebraic_connectivity: spectrum.algebraic_connectivity(),
            largest: spectrum.largest(),
            null_space_dim: spectrum.null_space_dim(),
            metrics: GraphMetrics::of(&graph),
        })
    }
}

impl fmt::Display for SpectrumSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} graph: {} nodes, {} edges, {} component(s)",
            self.kind, self.metrics.nodes, self.metrics.edges, self.metrics.components
        )?;
        for (i, l) in self.eigenvalues.iter().enumerate() {
            writeln!(f, "  λ{:<4} {:>14.10}", i, l)?;
        }
        writeln!(f, "Algebraic connectivity: {:.10}", self.algebraic_connectivity)?;
        writeln!(f, "Largest eigenvalue:     {:.10}", self.largest)?;
        write!(f, "Zero eigenvalues:       {}", self.null_space_dim)
    }
}

/// Get git commit hash for reproducibility
fn get_git_commit() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
}

fn get_rust_version() -> String {
    std::process::Command::new("rustc")
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
