use std::collections::VecDeque;

use tracing::{debug, warn};

use super::traits::ShortestPathSearch;
use super::types::PathCandidate;
use crate::model::{Arc, NodeIndex, PathTree, WeightFunction};

/// Bellman-Ford search. Tolerates negative arc weights and detects negative
/// cycles reachable from the start node.
pub struct BellmanFord<'a, L, W> {
    graph: &'a [Vec<Arc<L>>],
    weight: W,
    tree: PathTree,
    dist: Vec<f64>,
    negative_cycle_nodes: Vec<NodeIndex>,
    rounds: usize,
    dirty: bool,
}

impl<'a, L, W> BellmanFord<'a, L, W>
where
    W: WeightFunction<L>,
{
    pub fn new(graph: &'a [Vec<Arc<L>>], weight: W) -> Self {
        let order = graph.len();
        Self {
            graph,
            weight,
            tree: PathTree::new(order),
            dist: vec![f64::INFINITY; order],
            negative_cycle_nodes: Vec::new(),
            rounds: 0,
            dirty: false,
        }
    }

    pub fn reset(&mut self) {
        self.tree.reset();
        self.dist.fill(f64::INFINITY);
        self.negative_cycle_nodes.clear();
        self.rounds = 0;
        self.dirty = false;
    }

    /// Path tree of the last successful run. Undefined after a run that
    /// found a negative cycle.
    pub fn tree(&self) -> &PathTree {
        &self.tree
    }

    pub fn dist(&self) -> &[f64] {
        &self.dist
    }

    pub fn distance(&self, node: NodeIndex) -> Option<f64> {
        self.tree.is_reached(node).then(|| self.dist[node])
    }

    pub fn path_to(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.tree.path_to(node)
    }

    /// Relaxation rounds performed by the last run.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// After a failed run: nodes on a negative cycle or reachable from one,
    /// ascending. Empty otherwise.
    pub fn negative_cycle_nodes(&self) -> &[NodeIndex] {
        &self.negative_cycle_nodes
    }

    /// Computes shortest paths from `start` to every reachable node.
    /// Returns `false` if a negative cycle is reachable from `start`.
    pub fn run(&mut self, start: NodeIndex) -> bool {
        if self.dirty {
            self.reset();
        }
        self.dirty = true;

        self.tree.start(start);
        self.dist[start] = 0.0;

        let mut converged = false;
        for _ in 1..self.graph.len() {
            self.rounds += 1;
            if !self.relax_round() {
                converged = true;
                break;
            }
        }

        if !converged {
            let seeds = self.relaxable_arc_ends();
            if !seeds.is_empty() {
                self.negative_cycle_nodes = self.reachable_from(seeds);
                warn!(
                    "bellman-ford: negative cycle reachable from {start}, {} nodes affected",
                    self.negative_cycle_nodes.len()
                );
                return false;
            }
        }

        self.tree.recompute_lengths();
        debug!(
            "bellman-ford run: start={start} rounds={} reached={}",
            self.rounds,
            self.tree.reached_count()
        );
        true
    }

    /// Number of reached nodes, or `None` on a negative cycle.
    pub fn all_paths(&mut self, start: NodeIndex) -> Option<usize> {
        self.run(start).then(|| self.tree.reached_count())
    }

    pub fn single_path(&mut self, start: NodeIndex, end: NodeIndex) -> bool {
        self.run(start) && self.tree.is_reached(end)
    }

    fn relax_round(&mut self) -> bool {
        let graph = self.graph;
        let mut changed = false;
        for (u, arcs) in graph.iter().enumerate() {
            let base = self.dist[u];
            if !base.is_finite() {
                continue;
            }
            let len = self.tree.len(u) + 1;
            for arc in arcs {
                let candidate = base + self.weight.weight(&arc.label);
                if candidate < self.dist[arc.to] {
                    self.dist[arc.to] = candidate;
                    self.tree.link(arc.to, u, len);
                    changed = true;
                }
            }
        }
        changed
    }

    fn relaxable_arc_ends(&self) -> Vec<NodeIndex> {
        let mut seeds = Vec::new();
        for (u, arcs) in self.graph.iter().enumerate() {
            let base = self.dist[u];
            if !base.is_finite() {
                continue;
            }
            for arc in arcs {
                if base + self.weight.weight(&arc.label) < self.dist[arc.to] {
                    seeds.push(u);
                    seeds.push(arc.to);
                }
            }
        }
        seeds
    }

    fn reachable_from(&self, seeds: Vec<NodeIndex>) -> Vec<NodeIndex> {
        let mut seen = vec![false; self.graph.len()];
        let mut queue: VecDeque<NodeIndex> = seeds.into();
        while let Some(node) = queue.pop_front() {
            if seen[node] {
                continue;
            }
            seen[node] = true;
            queue.extend(self.graph[node].iter().map(|arc| arc.to));
        }
        seen.iter()
            .enumerate()
            .filter_map(|(node, hit)| hit.then_some(node))
            .collect()
    }
}

impl<L, W> ShortestPathSearch for BellmanFord<'_, L, W>
where
    W: WeightFunction<L>,
{
    fn name(&self) -> &'static str {
        "bellman_ford"
    }

    fn single_path(&mut self, start: NodeIndex, end: NodeIndex) -> bool {
        BellmanFord::single_path(self, start, end)
    }

    fn reset(&mut self) {
        BellmanFord::reset(self)
    }

    fn tree(&self) -> &PathTree {
        &self.tree
    }

    fn dist(&self) -> &[f64] {
        &self.dist
    }

    /// Every reached node is settled by a successful run.
    fn expanded(&self) -> usize {
        self.tree.reached_count()
    }
}

/// One-shot Bellman-Ford search. `None` if `end` is unreachable or a
/// negative cycle is reachable from `start`.
pub fn bellman_ford_path<L, W>(
    graph: &[Vec<Arc<L>>],
    weight: W,
    start: NodeIndex,
    end: NodeIndex,
) -> Option<PathCandidate>
where
    W: WeightFunction<L>,
{
    let mut search = BellmanFord::new(graph, weight);
    if !search.single_path(start, end) {
        return None;
    }
    Some(PathCandidate {
        nodes: search.path_to(end),
        cost: search.dist[end],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AdjacencyList;

    fn weight(label: &f64) -> f64 {
        *label
    }

    fn graph_from(order: usize, arcs: &[(usize, usize, f64)]) -> AdjacencyList<f64> {
        let mut graph = vec![Vec::new(); order];
        for &(from, to, w) in arcs {
            graph[from].push(Arc::new(to, w));
        }
        graph
    }

    #[test]
    fn handles_negative_edges_without_cycle() {
        let graph = graph_from(3, &[(0, 1, 1.0), (0, 2, 10.0), (1, 2, -2.0)]);
        let mut search = BellmanFord::new(&graph, weight);
        assert!(search.run(0));
        assert_eq!(search.distance(2), Some(-1.0));
        assert_eq!(search.path_to(2), vec![0, 1, 2]);
        assert!(search.negative_cycle_nodes().is_empty());
    }

    #[test]
    fn four_node_example_from_each_start() {
        let graph = graph_from(
            4,
            &[
                (0, 2, -1.0),
                (1, 3, -2.0),
                (2, 1, 4.0),
                (2, 3, 3.0),
                (3, 0, 2.0),
            ],
        );
        let expected = [
            [0.0, 3.0, -1.0, 1.0],
            [0.0, 0.0, -1.0, -2.0],
            [4.0, 4.0, 0.0, 2.0],
            [2.0, 5.0, 1.0, 0.0],
        ];
        let mut search = BellmanFord::new(&graph, weight);
        for (start, row) in expected.iter().enumerate() {
            assert_eq!(search.all_paths(start), Some(4));
            for (node, d) in row.iter().enumerate() {
                assert_eq!(search.distance(node), Some(*d), "{start}->{node}");
                let path = search.path_to(node);
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&node));
                assert_eq!(path.len(), search.tree().len(node));
            }
        }
    }

    #[test]
    fn marks_negative_cycle_reachable_nodes() {
        let graph = graph_from(
            5,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 1, -3.0), (2, 3, 1.0), (4, 0, 1.0)],
        );
        let mut search = BellmanFord::new(&graph, weight);
        assert!(!search.run(0));
        assert_eq!(search.negative_cycle_nodes(), &[1, 2, 3]);
        assert_eq!(search.all_paths(0), None);
        assert!(!search.single_path(0, 3));
    }

    #[test]
    fn unreachable_cycle_does_not_fail() {
        let graph = graph_from(4, &[(0, 1, 2.0), (2, 3, -1.0), (3, 2, -1.0)]);
        let mut search = BellmanFord::new(&graph, weight);
        assert_eq!(search.all_paths(0), Some(2));
        assert_eq!(search.distance(2), None);
        assert!(search.path_to(3).is_empty());
    }

    #[test]
    fn negative_self_loop_on_single_node() {
        let graph = graph_from(1, &[(0, 0, -1.0)]);
        let mut search = BellmanFord::new(&graph, weight);
        assert!(!search.run(0));
        assert_eq!(search.negative_cycle_nodes(), &[0]);
    }

    #[test]
    fn stops_early_once_converged() {
        let graph = graph_from(5, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let mut search = BellmanFord::new(&graph, weight);
        assert!(search.single_path(0, 2));
        assert!(search.rounds() < 4);
        assert_eq!(search.path_to(2), vec![0, 1, 2]);

        let found = bellman_ford_path(&graph, weight, 0, 2).expect("path");
        assert_eq!(found.cost, 2.0);
        assert!(bellman_ford_path(&graph, weight, 2, 0).is_none());
    }
}
