use crate::Graph;
use serde::{Deserialize, Serialize};

/// Structural summary of a generated graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub mean_degree: f64,
    pub average_clustering: f64,
    /// Mean of inverse hop distances over ordered node pairs (0 for unreachable pairs).
    pub global_efficiency: f64,
    pub components: usize,
}

impl GraphMetrics {
    pub fn of(graph: &Graph) -> Self {
        let n = graph.num_nodes();
        let m = graph.num_edges();
        let pairs = (n * n.saturating_sub(1)) as f64;

        Self {
            nodes: n,
            edges: m,
            density: if pairs > 0.0 { 2.0 * m as f64 / pairs } else { 0.0 },
            mean_degree: if n > 0 { 2.0 * m as f64 / n as f64 } else { 0.0 },
            average_clustering: average_clustering(graph),
            global_efficiency: global_efficiency(graph),
            components: graph.components().len(),
        }
    }
}

/// Unweighted local clustering averaged over all nodes; nodes of degree < 2 count as 0.
pub fn average_clustering(graph: &Graph) -> f64 {
    let n = graph.num_nodes();
    if n == 0 {
        return 0.0;
    }
    let mut marked = vec![false; n];
    let mut total = 0.0;

    for u in 0..n {
        let nbrs = graph.neighbors(u);
        let k = nbrs.len();
        if k < 2 {
            continue;
        }
        for &(a, _) in nbrs {
            marked[a] = true;
        }
        // each triangle through u is seen from both of its other corners
        let mut closed = 0usize;
        for &(a, _) in nbrs {
            closed += graph.neighbors(a).iter().filter(|&&(b, _)| marked[b]).count();
        }
        for &(a, _) in nbrs {
            marked[a] = false;
        }
        total += closed as f64 / (k * (k - 1)) as f64;
    }
    total / n as f64
}

pub fn global_efficiency(graph: &Graph) -> f64 {
    let n = graph.num_nodes();
    if n < 2 {
        return 0.0;
    }
    let total: f64 = (0..n)
        .map(|s| {
            graph
                .hop_distances(s)
                .iter()
                .filter_map(|d| *d)
                .filter(|&d| d > 0)
                .map(|d| 1.0 / d as f64)
                .sum::<f64>()
        })
        .sum();
    total / (n * (n - 1)) as f64
}
