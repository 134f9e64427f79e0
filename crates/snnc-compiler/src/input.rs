//! Input graphs and per-node algorithm properties

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{CompilerError, Result};

/// Undirected simple graph on nodes `0..n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputGraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl InputGraph {
    /// Build from an edge list; self-loops and out-of-range endpoints are rejected,
    /// repeated edges collapse.
    pub fn new(node_count: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut adjacency = vec![BTreeSet::new(); node_count];
        for &(a, b) in edges {
            if a >= node_count || b >= node_count {
                return Err(CompilerError::config(format!(
                    "edge ({}, {}) outside node range 0..{}",
                    a, b, node_count
                )));
            }
            if a == b {
                return Err(CompilerError::config(format!("self-loop on node {}", a)));
            }
            adjacency[a].insert(b);
            adjacency[b].insert(a);
        }
        Ok(Self { adjacency })
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Neighbours of `node` in ascending order
    pub fn neighbours(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[node].iter().copied()
    }

    /// Degree of `node`
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// `node` plus its neighbours, ascending
    pub fn closed_neighbourhood(&self, node: usize) -> Vec<usize> {
        let mut nodes: Vec<usize> = self.neighbours(node).collect();
        nodes.push(node);
        nodes.sort_unstable();
        nodes
    }

    /// Edges as `(a, b)` with `a < b`, ascending
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, nbrs)| nbrs.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
            .collect()
    }

    /// True when no three nodes are pairwise adjacent
    pub fn is_triangle_free(&self) -> bool {
        self.edges().iter().all(|&(a, b)| self.adjacency[a].is_disjoint(&self.adjacency[b]))
    }
}

fn path(n: usize) -> Vec<(usize, usize)> {
    (1..n).map(|i| (i - 1, i)).collect()
}

fn cycle(n: usize) -> Vec<(usize, usize)> {
    let mut edges = path(n);
    edges.push((n - 1, 0));
    edges
}

fn star(n: usize) -> Vec<(usize, usize)> {
    (1..n).map(|i| (0, i)).collect()
}

/// Edge lists of the built-in triangle-free graphs for `size`
fn catalogue_edges(size: usize) -> Vec<Vec<(usize, usize)>> {
    match size {
        1 => vec![vec![]],
        2 => vec![vec![(0, 1)]],
        3 => vec![path(3), vec![(0, 1)]],
        4 => vec![vec![(0, 2), (1, 2), (2, 3)], path(4), cycle(4)],
        5 => vec![path(5), star(5), vec![(0, 1), (1, 2), (1, 3), (3, 4)]],
        6 => {
            let k33 = (0..3).flat_map(|a| (3..6).map(move |b| (a, b))).collect();
            vec![path(6), cycle(6), k33]
        }
        _ => vec![],
    }
}

/// Number of catalogue graphs for `size`
pub fn catalogue_len(size: usize) -> usize {
    catalogue_edges(size).len()
}

/// Catalogue graph `graph_nr` of size `graph_size`
pub fn input_graph(graph_size: usize, graph_nr: usize) -> Result<InputGraph> {
    let mut graphs = catalogue_edges(graph_size);
    if graphs.is_empty() {
        return Err(CompilerError::config(format!(
            "no input graphs of size {} (supported sizes 1..=6)",
            graph_size
        )));
    }
    if graph_nr >= graphs.len() {
        return Err(CompilerError::config(format!(
            "for input_graph of size {}, expected graph_nr in 0..{}, got {}",
            graph_size,
            graphs.len(),
            graph_nr
        )));
    }
    InputGraph::new(graph_size, &graphs.swap_remove(graph_nr))
}

/// Seeded per-node properties shared by the compiler and the reference algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgProps {
    rand_ranks: Vec<usize>,
}

impl AlgProps {
    /// Explicit tie-break ranks; they must be a permutation of `0..n`
    pub fn new(rand_ranks: Vec<usize>) -> Result<Self> {
        let n = rand_ranks.len();
        let mut seen = vec![false; n];
        for &rank in &rand_ranks {
            if rank >= n || seen[rank] {
                return Err(CompilerError::config(format!(
                    "rand_ranks {:?} is not a permutation of 0..{}",
                    rand_ranks, n
                )));
            }
            seen[rank] = true;
        }
        Ok(Self { rand_ranks })
    }

    /// Seeded permutation of `0..n`
    pub fn from_seed(node_count: usize, seed: u64) -> Self {
        let mut rand_ranks: Vec<usize> = (0..node_count).collect();
        rand_ranks.shuffle(&mut StdRng::seed_from_u64(seed));
        Self { rand_ranks }
    }

    /// Distinct tie-break value `r_i < n` per node
    pub fn rand_ranks(&self) -> &[usize] {
        &self.rand_ranks
    }

    /// Fails unless there is exactly one rank per node of `input`
    pub fn check_covers(&self, input: &InputGraph) -> Result<()> {
        if self.rand_ranks.len() != input.node_count() {
            return Err(CompilerError::config(format!(
                "{} rand_ranks for an input graph of {} nodes",
                self.rand_ranks.len(),
                input.node_count()
            )));
        }
        Ok(())
    }
}
