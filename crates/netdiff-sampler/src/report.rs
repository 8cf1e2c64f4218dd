use crate::experiment::{RunRecord, RunStatus};
use netdiff_core::TopologyKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Records collected so far. `merge` is associative, so partial tallies from
/// parallel workers combine in any grouping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tally {
    records: Vec<RunRecord>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn merge(mut self, other: Tally) -> Tally {
        self.records.extend(other.records);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Summarise, ordering records by run id.
    pub fn finish(mut self, threshold: f64, wall_clock: Duration) -> Report {
        self.records.sort_by_key(|r| r.id);
        Report::from_records(self.records, threshold, wall_clock)
    }
}

/// Descriptive statistics of a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl SummaryStats {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            0.5 * (sorted[count / 2 - 1] + sorted[count / 2])
        };
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            mean,
            median,
            min: sorted[0],
            max: sorted[count - 1],
            std: var.sqrt(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRate {
    pub passed: usize,
    pub checked: usize,
}

impl PassRate {
    fn record(&mut self, passed: bool) {
        self.checked += 1;
        if passed {
            self.passed += 1;
        }
    }

    /// `None` when nothing was checked.
    pub fn rate(&self) -> Option<f64> {
        (self.checked > 0).then(|| self.passed as f64 / self.checked as f64)
    }
}

/// Per-topology slice of the report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KindSummary {
    pub runs: usize,
    pub successes: usize,
    pub r_squared: SummaryStats,
    pub conservation: PassRate,
    pub entropy: PassRate,
    pub disconnected: usize,
}

/// Aggregate outcome of a sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_runs: usize,
    pub successes: usize,
    pub success_threshold: f64,
    /// Over runs that produced an R² (failures count as 0).
    pub r_squared: SummaryStats,
    pub by_topology: BTreeMap<TopologyKind, KindSummary>,
    pub conservation: PassRate,
    pub entropy: PassRate,
    pub mean_entropy_fraction: Option<f64>,
    pub disconnected: usize,
    pub reference_unavailable: usize,
    pub failures: BTreeMap<RunStatus, usize>,
    pub retried: usize,
    pub wall_clock_secs: f64,
    pub mean_run_secs: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub records: Vec<RunRecord>,
}

impl Report {
    fn from_records(records: Vec<RunRecord>, threshold: f64, wall_clock: Duration) -> Self {
        let mut by_topology: BTreeMap<TopologyKind, (KindSummary, Vec<f64>)> = BTreeMap::new();
        let mut failures = BTreeMap::new();
        let mut conservation = PassRate::default();
        let mut entropy = PassRate::default();
        let mut fractions = Vec::new();
        let mut fits = Vec::new();

        for record in &records {
            let (kind, kind_fits) = by_topology.entry(record.config.topology.kind()).or_default();
            kind.runs += 1;

            if let Some(r2) = record.r_squared {
                fits.push(r2);
                kind_fits.push(r2);
            }
            if record.passes(threshold) {
                kind.successes += 1;
            }
            if let Some(check) = record.conservation {
                conservation.record(check.conserved);
                kind.conservation.record(check.conserved);
            }
            if let Some(check) = record.entropy {
                entropy.record(check.monotonic());
                kind.entropy.record(check.monotonic());
                fractions.push(check.fraction);
            }
            if record.is_disconnected() {
                kind.disconnected += 1;
            }
            if record.status.is_failure() {
                *failures.entry(record.status).or_insert(0) += 1;
            }
        }

        let by_topology = by_topology
            .into_iter()
            .map(|(k, (mut summary, kind_fits))| {
                summary.r_squared = SummaryStats::of(&kind_fits);
                (k, summary)
            })
            .collect::<BTreeMap<_, _>>();

        let total_runs = records.len();
        let wall_clock_secs = wall_clock.as_secs_f64();

        Self {
            total_runs,
            successes: records.iter().filter(|r| r.passes(threshold)).count(),
            success_threshold: threshold,
            r_squared: SummaryStats::of(&fits),
            by_topology,
            conservation,
            entropy,
            mean_entropy_fraction: (!fractions.is_empty())
                .then(|| fractions.iter().sum::<f64>() / fractions.len() as f64),
            disconnected: records.iter().filter(|r| r.is_disconnected()).count(),
            reference_unavailable: records.iter().filter(|r| r.reference_unavailable()).count(),
            failures,
            retried: records.iter().filter(|r| r.retried).count(),
            wall_clock_secs,
            mean_run_secs: if total_runs > 0 {
                records.iter().map(|r| r.elapsed_secs).sum::<f64>() / total_runs as f64
            } else {
                0.0
            },
            records,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_runs as f64
        }
    }

    /// Drop per-run records, keeping only the aggregates.
    pub fn without_records(mut self) -> Self {
        self.records.clear();
        self
    }

    /// Aggregates with timing zeroed, for comparing two executions of the same sweep.
    pub fn timing_free(&self) -> Self {
        let mut copy = self.clone();
        copy.wall_clock_secs = 0.0;
        copy.mean_run_secs = 0.0;
        for r in &mut copy.records {
            r.elapsed_secs = 0.0;
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_stats() {
        let s = SummaryStats::of(&[3.0, 1.0, 2.0, 4.0]);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.std - 1.25_f64.sqrt()).abs() < 1e-12);

        assert_eq!(SummaryStats::of(&[]), SummaryStats::default());
        assert_eq!(SummaryStats::of(&[0.5, 0.1, 0.9]).median, 0.5);
    }

    #[test]
    fn test_pass_rate() {
        let mut p = PassRate::default();
        assert_eq!(p.rate(), None);
        p.record(true);
        p.record(false);
        assert_eq!(p.rate(), Some(0.5));
    }

    #[test]
    fn test_empty_tally() {
        let report = Tally::new().finish(0.9999, Duration::ZERO);
        assert_eq!(report.total_runs, 0);
        assert_eq!(report.success_rate(), 0.0);
        assert_eq!(report.mean_entropy_fraction, None);
    }
}
