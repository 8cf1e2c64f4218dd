use crate::ConfigurationError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Undirected weighted edge, stored with `u < v`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub w: f64, // conductance
}

impl Edge {
    pub fn new(u: usize, v: usize, w: f64) -> Self {
        let (u, v) = if u <= v { (u, v) } else { (v, u) };
        Self { u, v, w }
    }

    pub fn unit(u: usize, v: usize) -> Self {
        Self::new(u, v, 1.0)
    }
}

/// Simple undirected graph: no self loops, no parallel edges.
#[derive(Clone, Debug)]
pub struct Graph {
    n: usize,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, f64)>>, // cached adjacency lists
}

impl Graph {
    /// Build a graph on `n` nodes, rejecting self loops, duplicate edges,
    /// out-of-range endpoints and non-positive weights.
    pub fn from_edges(n: usize, edges: Vec<Edge>) -> Result<Self, ConfigurationError> {
        if n < 2 {
            return Err(ConfigurationError::TooFewNodes(n));
        }
        let edges: Vec<Edge> = edges.into_iter().map(|e| Edge::new(e.u, e.v, e.w)).collect();

        let mut seen = BTreeSet::new();
        for e in &edges {
            if e.v >= n {
                return Err(ConfigurationError::parameter(
                    "edge",
                    format!("endpoint {} out of range for {} nodes", e.v, n),
                ));
            }
            if e.u == e.v {
                return Err(ConfigurationError::parameter("edge", format!("self loop at node {}", e.u)));
            }
            if !(e.w.is_finite() && e.w > 0.0) {
                return Err(ConfigurationError::parameter(
                    "edge",
                    format!("weight {} on ({}, {}) must be finite and > 0", e.w, e.u, e.v),
                ));
            }
            if !seen.insert((e.u, e.v)) {
                return Err(ConfigurationError::parameter(
                    "edge",
                    format!("duplicate edge ({}, {})", e.u, e.v),
                ));
            }
        }

        let mut g = Self { n, edges, adjacency: Vec::new() };
        g.build_adjacency();
        Ok(g)
    }

    pub fn num_nodes(&self) -> usize {
        self.n
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn build_adjacency(&mut self) {
        let mut adj = vec![Vec::new(); self.n];
        for e in &self.edges {
            adj[e.u].push((e.v, e.w));
            adj[e.v].push((e.u, e.w));
        }
        self.adjacency = adj;
    }

    /// Neighbours of `u` with edge weights
    pub fn neighbors(&self, u: usize) -> &[(usize, f64)] {
        self.adjacency.get(u).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).iter().any(|&(x, _)| x == v)
    }

    /// Weighted degree (sum of incident conductances)
    pub fn degree(&self, u: usize) -> f64 {
        self.neighbors(u).iter().map(|&(_, w)| w).sum()
    }

    pub fn degrees(&self) -> Vec<f64> {
        (0..self.n).map(|u| self.degree(u)).collect()
    }

    pub fn adjacency_matrix(&self) -> DMatrix<f64> {
        let mut a = DMatrix::zeros(self.n, self.n);
        for e in &self.edges {
            a[(e.u, e.v)] = e.w;
            a[(e.v, e.u)] = e.w;
        }
        a
    }

    /// Connected components, each listed in ascending node order.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut label = vec![usize::MAX; self.n];
        let mut out = Vec::new();

        for start in 0..self.n {
            if label[start] != usize::MAX {
                continue;
            }
            let id = out.len();
            let mut members = vec![start];
            let mut queue = VecDeque::from([start]);
            label[start] = id;

            while let Some(u) = queue.pop_front() {
                for &(v, _) in self.neighbors(u) {
                    if label[v] == usize::MAX {
                        label[v] = id;
                        members.push(v);
                        queue.push_back(v);
                    }
                }
            }
            members.sort_unstable();
            out.push(members);
        }
        out
    }

    pub fn is_connected(&self) -> bool {
        self.components().len() == 1
    }

    /// Unweighted hop distances from `source`; `None` for unreachable nodes.
    pub fn hop_distances(&self, source: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.n];
        if source >= self.n {
            return dist;
        }
        dist[source] = Some(0);
        let mut queue = VecDeque::from([source]);
        while let Some(u) = queue.pop_front() {
            let du = dist[u].unwrap_or(0);
            for &(v, _) in self.neighbors(u) {
                if dist[v].is_none() {
                    dist[v] = Some(du + 1);
                    queue.push_back(v);
                }
            }
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path3() -> Graph {
        Graph::from_edges(3, vec![Edge::unit(0, 1), Edge::unit(2, 1)]).unwrap()
    }

    #[test]
    fn test_edge_normalised() {
        let e = Edge::new(4, 1, 0.5);
        assert_eq!((e.u, e.v), (1, 4));
    }

    #[test]
    fn test_neighbors_and_degree() {
        let g = path3();
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.neighbors(1).len(), 2);
        assert_eq!(g.degree(0), 1.0);
        assert!(g.has_edge(2, 1));
        assert!(!g.has_edge(0, 2));
    }

    #[test]
    fn test_rejects_invalid_edges() {
        assert!(Graph::from_edges(1, vec![]).is_err());
        assert!(Graph::from_edges(3, vec![Edge::unit(1, 1)]).is_err());
        assert!(Graph::from_edges(3, vec![Edge::unit(0, 3)]).is_err());
        assert!(Graph::from_edges(3, vec![Edge::unit(0, 1), Edge::unit(1, 0)]).is_err());
        assert!(Graph::from_edges(3, vec![Edge::new(0, 1, 0.0)]).is_err());
    }

    #[test]
    fn test_components() {
        let g = Graph::from_edges(5, vec![Edge::unit(0, 1), Edge::unit(3, 4)]).unwrap();
        let comps = g.components();
        assert_eq!(comps, vec![vec![0, 1], vec![2], vec![3, 4]]);
        assert!(!g.is_connected());
        assert!(path3().is_connected());
    }

    #[test]
    fn test_hop_distances() {
        let d = path3().hop_distances(0);
        assert_eq!(d, vec![Some(0), Some(1), Some(2)]);
    }
}
