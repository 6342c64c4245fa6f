use tracing::debug;

use super::frontier::IndexedFrontier;
use super::traits::ShortestPathSearch;
use super::types::{PathCandidate, SearchState};
use crate::model::{Arc, NodeIndex, PathTree, WeightFunction};

/// Dijkstra's algorithm over a borrowed adjacency list.
///
/// Weights must be non-negative. Negative weights are not detected and give
/// non-optimal results.
pub struct Dijkstra<'a, L, W> {
    graph: &'a [Vec<Arc<L>>],
    weight: W,
    tree: PathTree,
    dist: Vec<f64>,
    state: Vec<SearchState>,
    frontier: IndexedFrontier,
    expanded: usize,
    dirty: bool,
}

impl<'a, L, W> Dijkstra<'a, L, W>
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
            state: vec![SearchState::Unvisited; order],
            frontier: IndexedFrontier::new(order),
            expanded: 0,
            dirty: false,
        }
    }

    pub fn reset(&mut self) {
        self.tree.reset();
        self.dist.fill(f64::INFINITY);
        self.state.fill(SearchState::Unvisited);
        self.frontier.clear();
        self.expanded = 0;
        self.dirty = false;
    }

    pub fn tree(&self) -> &PathTree {
        &self.tree
    }

    /// Distances indexed by node; `f64::INFINITY` for unreached nodes.
    /// Entries of nodes still open are tentative.
    pub fn dist(&self) -> &[f64] {
        &self.dist
    }

    pub fn distance(&self, node: NodeIndex) -> Option<f64> {
        self.tree.is_reached(node).then(|| self.dist[node])
    }

    pub fn path_to(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.tree.path_to(node)
    }

    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Finds a shortest path from `start` to `end`, stopping as soon as
    /// `end` is closed.
    pub fn single_path(&mut self, start: NodeIndex, end: NodeIndex) -> bool {
        self.begin(start);
        let found = self.search(start, Some(end));
        debug!(
            "dijkstra single path: start={start} end={end} found={found} expanded={}",
            self.expanded
        );
        found
    }

    /// Computes shortest paths from `start` to every reachable node.
    /// Returns the number of reached nodes, `start` included.
    pub fn all_paths(&mut self, start: NodeIndex) -> usize {
        self.begin(start);
        self.search(start, None);
        debug!(
            "dijkstra all paths: start={start} reached={} max_len={}",
            self.expanded,
            self.tree.max_len()
        );
        self.expanded
    }

    fn begin(&mut self, start: NodeIndex) {
        if self.dirty {
            self.reset();
        }
        self.dirty = true;
        self.tree.start(start);
        self.dist[start] = 0.0;
        self.state[start] = SearchState::Closed;
        self.expanded = 1;
    }

    fn search(&mut self, start: NodeIndex, end: Option<NodeIndex>) -> bool {
        let mut current = start;
        loop {
            if end == Some(current) {
                return true;
            }
            self.relax_from(current);
            let Some((next, _)) = self.frontier.pop_min() else {
                return false;
            };
            self.state[next] = SearchState::Closed;
            self.expanded += 1;
            current = next;
        }
    }

    fn relax_from(&mut self, u: NodeIndex) {
        let graph = self.graph;
        let base = self.dist[u];
        let len = self.tree.len(u) + 1;

        for arc in &graph[u] {
            let v = arc.to;
            let candidate = base + self.weight.weight(&arc.label);
            match self.state[v] {
                SearchState::Closed => {}
                SearchState::Open => {
                    let best = self.dist[v];
                    if candidate < best || (candidate == best && len < self.tree.len(v)) {
                        self.dist[v] = candidate;
                        self.tree.link(v, u, len);
                        self.frontier.fix(v, candidate);
                    }
                }
                SearchState::Unvisited => {
                    self.state[v] = SearchState::Open;
                    self.dist[v] = candidate;
                    self.tree.link(v, u, len);
                    self.frontier.push(v, candidate);
                }
            }
        }
    }
}

impl<L, W> ShortestPathSearch for Dijkstra<'_, L, W>
where
    W: WeightFunction<L>,
{
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn single_path(&mut self, start: NodeIndex, end: NodeIndex) -> bool {
        Dijkstra::single_path(self, start, end)
    }

    fn reset(&mut self) {
        Dijkstra::reset(self)
    }

    fn tree(&self) -> &PathTree {
        &self.tree
    }

    fn dist(&self) -> &[f64] {
        &self.dist
    }

    fn expanded(&self) -> usize {
        self.expanded
    }
}

/// One-shot Dijkstra search between two nodes.
pub fn dijkstra_path<L, W>(
    graph: &[Vec<Arc<L>>],
    weight: W,
    start: NodeIndex,
    end: NodeIndex,
) -> Option<PathCandidate>
where
    W: WeightFunction<L>,
{
    let mut search = Dijkstra::new(graph, weight);
    if !search.single_path(start, end) {
        return None;
    }
    Some(PathCandidate {
        nodes: search.path_to(end),
        cost: search.dist[end],
    })
}
