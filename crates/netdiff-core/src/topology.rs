use crate::{ConfigurationError, Edge, Graph};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Graph family with its generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Topology {
    /// Path `0 - 1 - ... - n-1`, closed into a ring when `periodic`.
    Lattice { periodic: bool },
    /// Watts–Strogatz: ring of degree `k`, each edge rewired with probability `p`.
    SmallWorld { k: usize, p: f64 },
    /// Barabási–Albert preferential attachment, `m` edges per new node.
    ScaleFree { m: usize },
    /// Erdős–Rényi G(n, p).
    Random { p: f64 },
    Complete,
}

/// Family label used for grouping results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyKind {
    Lattice,
    SmallWorld,
    ScaleFree,
    Random,
    Complete,
}

impl TopologyKind {
    pub const ALL: [TopologyKind; 5] = [
        TopologyKind::Lattice,
        TopologyKind::SmallWorld,
        TopologyKind::ScaleFree,
        TopologyKind::Random,
        TopologyKind::Complete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TopologyKind::Lattice => "lattice",
            TopologyKind::SmallWorld => "small-world",
            TopologyKind::ScaleFree => "scale-free",
            TopologyKind::Random => "random",
            TopologyKind::Complete => "complete",
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Edge conductances assigned after the structure is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EdgeWeights {
    #[default]
    Unit,
    Uniform { low: f64, high: f64 },
}

impl EdgeWeights {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            EdgeWeights::Unit => Ok(()),
            EdgeWeights::Uniform { low, high } => {
                if low.is_finite() && high.is_finite() && low > 0.0 && low < high {
                    Ok(())
                } else {
                    Err(ConfigurationError::parameter(
                        "weights",
                        format!("uniform band must satisfy 0 < low < high, got [{}, {})", low, high),
                    ))
                }
            }
        }
    }
}

impl Topology {
    pub fn ring() -> Self {
        Topology::Lattice { periodic: true }
    }

    pub fn chain() -> Self {
        Topology::Lattice { periodic: false }
    }

    /// Erdős–Rényi with `p` chosen so the expected mean degree is `mean_degree`.
    pub fn random_with_mean_degree(n: usize, mean_degree: f64) -> Result<Self, ConfigurationError> {
        if n < 2 {
            return Err(ConfigurationError::TooFewNodes(n));
        }
        let p = mean_degree / (n - 1) as f64;
        check_probability("p", p)?;
        Ok(Topology::Random { p })
    }

    pub fn kind(&self) -> TopologyKind {
        match self {
            Topology::Lattice { .. } => TopologyKind::Lattice,
            Topology::SmallWorld { .. } => TopologyKind::SmallWorld,
            Topology::ScaleFree { .. } => TopologyKind::ScaleFree,
            Topology::Random { .. } => TopologyKind::Random,
            Topology::Complete => TopologyKind::Complete,
        }
    }

    pub fn validate(&self, n: usize) -> Result<(), ConfigurationError> {
        if n < 2 {
            return Err(ConfigurationError::TooFewNodes(n));
        }
        match *self {
            Topology::Lattice { .. } | Topology::Complete => Ok(()),
            Topology::SmallWorld { k, p } => {
                check_probability("p", p)?;
                if k < 2 || k >= n {
                    return Err(ConfigurationError::parameter(
                        "k",
                        format!("small-world degree must satisfy 2 <= k < n = {}, got {}", n, k),
                    ));
                }
                Ok(())
            }
            Topology::ScaleFree { m } => {
                if m < 1 || m >= n {
                    return Err(ConfigurationError::parameter(
                        "m",
                        format!("attachment count must satisfy 1 <= m < n = {}, got {}", n, m),
                    ));
                }
                Ok(())
            }
            Topology::Random { p } => check_probability("p", p),
        }
    }

    /// Draw a graph on `n` nodes from this family.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        n: usize,
        weights: EdgeWeights,
        rng: &mut R,
    ) -> Result<Graph, ConfigurationError> {
        self.validate(n)?;
        weights.validate()?;

        let pairs = match *self {
            Topology::Lattice { periodic } => lattice(n, periodic),
            Topology::SmallWorld { k, p } => watts_strogatz(n, k, p, rng),
            Topology::ScaleFree { m } => barabasi_albert(n, m, rng),
            Topology::Random { p } => erdos_renyi(n, p, rng),
            Topology::Complete => complete(n),
        };

        let edges = match weights {
            EdgeWeights::Unit => pairs.into_iter().map(|(u, v)| Edge::unit(u, v)).collect(),
            EdgeWeights::Uniform { low, high } => {
                let dist = Uniform::new(low, high);
                pairs
                    .into_iter()
                    .map(|(u, v)| Edge::new(u, v, dist.sample(rng)))
                    .collect()
            }
        };

        Graph::from_edges(n, edges)
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::Probability { name, value })
    }
}

fn lattice(n: usize, periodic: bool) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = (0..n - 1).map(|i| (i, i + 1)).collect();
    if periodic && n > 2 {
        pairs.push((0, n - 1));
    }
    pairs
}

fn complete(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect()
}

fn erdos_renyi<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            if rng.gen::<f64>() < p {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn ordered(u: usize, v: usize) -> (usize, usize) {
    if u < v { (u, v) } else { (v, u) }
}

fn watts_strogatz<R: Rng + ?Sized>(n: usize, k: usize, p: f64, rng: &mut R) -> Vec<(usize, usize)> {
    let half = k / 2;
    let mut edges = BTreeSet::new();
    let mut adj = vec![BTreeSet::new(); n];

    for j in 1..=half {
        for i in 0..n {
            let v = (i + j) % n;
            edges.insert(ordered(i, v));
            adj[i].insert(v);
            adj[v].insert(i);
        }
    }

    // Rewire in the same order the ring was laid down.
    for j in 1..=half {
        for u in 0..n {
            let v = (u + j) % n;
            if !edges.contains(&ordered(u, v)) || rng.gen::<f64>() >= p {
                continue;
            }
            let candidates: Vec<usize> = (0..n)
                .filter(|&w| w != u && !adj[u].contains(&w))
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let w = candidates[rng.gen_range(0..candidates.len())];

            edges.remove(&ordered(u, v));
            adj[u].remove(&v);
            adj[v].remove(&u);

            edges.insert(ordered(u, w));
            adj[u].insert(w);
            adj[w].insert(u);
        }
    }

    edges.into_iter().collect()
}

fn barabasi_albert<R: Rng + ?Sized>(n: usize, m: usize, rng: &mut R) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity((n - m) * m);
    let mut targets: Vec<usize> = (0..m).collect();
    // Each node appears once per incident edge, so uniform draws are degree-weighted.
    let mut repeated: Vec<usize> = Vec::with_capacity(2 * (n - m) * m);

    for source in m..n {
        for &t in &targets {
            pairs.push(ordered(source, t));
        }
        repeated.extend(targets.iter().copied());
        repeated.extend(std::iter::repeat(source).take(m));

        if source + 1 == n {
            break;
        }
        let mut chosen = BTreeSet::new();
        while chosen.len() < m {
            chosen.insert(repeated[rng.gen_range(0..repeated.len())]);
        }
        targets = chosen.into_iter().collect();
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeedStream;

    fn build(t: Topology, n: usize) -> Graph {
        let mut s = SeedStream::new(11);
        t.generate(n, EdgeWeights::Unit, s.rng()).unwrap()
    }

    #[test]
    fn test_lattice_edges() {
        assert_eq!(build(Topology::chain(), 10).num_edges(), 9);
        assert_eq!(build(Topology::ring(), 10).num_edges(), 10);
        assert_eq!(build(Topology::ring(), 2).num_edges(), 1);
    }

    #[test]
    fn test_complete_edges() {
        let g = build(Topology::Complete, 12);
        assert_eq!(g.num_edges(), 12 * 11 / 2);
        assert!((0..12).all(|u| g.degree(u) == 11.0));
    }

    #[test]
    fn test_small_world_preserves_edge_count() {
        let g = build(Topology::SmallWorld { k: 4, p: 0.3 }, 30);
        assert_eq!(g.num_nodes(), 30);
        assert_eq!(g.num_edges(), 30 * 2);

        let unrewired = build(Topology::SmallWorld { k: 4, p: 0.0 }, 30);
        assert!((0..30).all(|u| unrewired.degree(u) == 4.0));
    }

    #[test]
    fn test_scale_free_edge_count() {
        let (n, m) = (40, 2);
        let g = build(Topology::ScaleFree { m }, n);
        assert_eq!(g.num_edges(), (n - m) * m);
        assert!(g.is_connected());
    }

    #[test]
    fn test_random_extremes() {
        assert_eq!(build(Topology::Random { p: 0.0 }, 15).num_edges(), 0);
        assert_eq!(build(Topology::Random { p: 1.0 }, 15).num_edges(), 105);
    }

    #[test]
    fn test_mean_degree_probability() {
        let t = Topology::random_with_mean_degree(21, 4.0).unwrap();
        assert_eq!(t, Topology::Random { p: 0.2 });
        assert!(Topology::random_with_mean_degree(5, 10.0).is_err());
    }

    #[test]
    fn test_invalid_configurations() {
        let mut s = SeedStream::new(1);
        let w = EdgeWeights::Unit;
        assert_eq!(
            Topology::Complete.generate(1, w, s.rng()).unwrap_err(),
            ConfigurationError::TooFewNodes(1)
        );
        assert!(Topology::Random { p: 1.5 }.generate(10, w, s.rng()).is_err());
        assert!(Topology::SmallWorld { k: 10, p: 0.1 }.generate(10, w, s.rng()).is_err());
        assert!(Topology::ScaleFree { m: 0 }.generate(10, w, s.rng()).is_err());
        let bad = EdgeWeights::Uniform { low: 1.0, high: 0.5 };
        assert!(Topology::Complete.generate(4, bad, s.rng()).is_err());
    }

    #[test]
    fn test_weighted_edges_in_band() {
        let mut s = SeedStream::new(5);
        let w = EdgeWeights::Uniform { low: 0.8, high: 1.2 };
        let g = Topology::Complete.generate(8, w, s.rng()).unwrap();
        assert!(g.edges().iter().all(|e| e.w >= 0.8 && e.w < 1.2));
    }

    #[test]
    fn test_unit_weights_by_default() {
        assert_eq!(EdgeWeights::default(), EdgeWeights::Unit);
    }
}
