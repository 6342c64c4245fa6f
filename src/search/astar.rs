//! Heuristic-guided searches toward a single target.
//!
//! [`AStarA`] only needs an admissible heuristic and reopens done nodes when
//! a strictly shorter route to them turns up. [`AStarM`] assumes a monotonic
//! heuristic and never looks at a closed node again. Both stop as soon as the
//! target leaves the open set.
//!
//! With an inadmissible heuristic both still terminate and return a path,
//! just not necessarily a shortest one.

use tracing::debug;

use super::frontier::IndexedFrontier;
use super::traits::{HeuristicSearch, ShortestPathSearch};
use super::types::{PathCandidate, ReachState, SearchState};
use crate::model::{Arc, Heuristic, NodeIndex, PathTree, WeightFunction};

/// Algorithm A, which is A* when the heuristic is admissible.
pub struct AStarA<'a, L, W> {
    graph: &'a [Vec<Arc<L>>],
    weight: W,
    tree: PathTree,
    dist: Vec<f64>,
    estimate: Vec<f64>,
    state: Vec<ReachState>,
    frontier: IndexedFrontier,
    expanded: usize,
    reopened: usize,
    dirty: bool,
}

impl<'a, L, W> AStarA<'a, L, W>
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
            estimate: vec![0.0; order],
            state: vec![ReachState::Unreached; order],
            frontier: IndexedFrontier::new(order),
            expanded: 0,
            reopened: 0,
            dirty: false,
        }
    }

    pub fn reset(&mut self) {
        self.tree.reset();
        self.dist.fill(f64::INFINITY);
        self.estimate.fill(0.0);
        self.state.fill(ReachState::Unreached);
        self.frontier.clear();
        self.expanded = 0;
        self.reopened = 0;
        self.dirty = false;
    }

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

    /// Times a node was closed in the last search, counting re-closings.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Times a done node went back into the open set in the last search.
    pub fn reopened(&self) -> usize {
        self.reopened
    }

    /// Searches from `start` to `end`. `heuristic` estimates the remaining
    /// distance to `end`.
    pub fn single_path<H>(&mut self, start: NodeIndex, end: NodeIndex, heuristic: &H) -> bool
    where
        H: Heuristic,
    {
        if self.dirty {
            self.reset();
        }
        self.dirty = true;

        let est = heuristic.estimate(start);
        self.tree.start(start);
        self.dist[start] = 0.0;
        self.estimate[start] = est;
        self.state[start] = ReachState::Reached;
        self.frontier.push(start, est);

        let mut found = false;
        while let Some((u, _)) = self.frontier.pop_min() {
            self.state[u] = ReachState::Done;
            self.expanded += 1;
            if u == end {
                found = true;
                break;
            }
            self.relax_from(u, heuristic);
        }

        if self.reopened > 0 {
            debug!("algorithm a reopened {} nodes", self.reopened);
            self.tree.recompute_lengths();
        }
        debug!(
            "algorithm a single path: start={start} end={end} found={found} expanded={}",
            self.expanded
        );
        found
    }

    fn relax_from<H>(&mut self, u: NodeIndex, heuristic: &H)
    where
        H: Heuristic,
    {
        let graph = self.graph;
        let base = self.dist[u];
        let len = self.tree.len(u) + 1;

        for arc in &graph[u] {
            let v = arc.to;
            let candidate = base + self.weight.weight(&arc.label);
            match self.state[v] {
                ReachState::Unreached => {
                    let est = heuristic.estimate(v);
                    self.estimate[v] = est;
                    self.state[v] = ReachState::Reached;
                    self.dist[v] = candidate;
                    self.tree.link(v, u, len);
                    self.frontier.push(v, candidate + est);
                }
                ReachState::Reached => {
                    let best = self.dist[v];
                    if candidate < best || (candidate == best && len < self.tree.len(v)) {
                        self.dist[v] = candidate;
                        self.tree.link(v, u, len);
                        self.frontier.fix(v, candidate + self.estimate[v]);
                    }
                }
                ReachState::Done => {
                    if candidate < self.dist[v] {
                        self.state[v] = ReachState::Reached;
                        self.dist[v] = candidate;
                        self.tree.link(v, u, len);
                        self.frontier.push(v, candidate + self.estimate[v]);
                        self.reopened += 1;
                    }
                }
            }
        }
    }
}

/// A* specialised for monotonic (consistent) heuristics: closed nodes are
/// final and never re-examined.
pub struct AStarM<'a, L, W> {
    graph: &'a [Vec<Arc<L>>],
    weight: W,
    tree: PathTree,
    dist: Vec<f64>,
    estimate: Vec<f64>,
    state: Vec<SearchState>,
    frontier: IndexedFrontier,
    expanded: usize,
    dirty: bool,
}

impl<'a, L, W> AStarM<'a, L, W>
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
            estimate: vec![0.0; order],
            state: vec![SearchState::Unvisited; order],
            frontier: IndexedFrontier::new(order),
            expanded: 0,
            dirty: false,
        }
    }

    pub fn reset(&mut self) {
        self.tree.reset();
        self.dist.fill(f64::INFINITY);
        self.estimate.fill(0.0);
        self.state.fill(SearchState::Unvisited);
        self.frontier.clear();
        self.expanded = 0;
        self.dirty = false;
    }

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

    pub fn expanded(&self) -> usize {
        self.expanded
    }

    pub fn single_path<H>(&mut self, start: NodeIndex, end: NodeIndex, heuristic: &H) -> bool
    where
        H: Heuristic,
    {
        if self.dirty {
            self.reset();
        }
        self.dirty = true;

        let est = heuristic.estimate(start);
        self.tree.start(start);
        self.dist[start] = 0.0;
        self.estimate[start] = est;
        self.state[start] = SearchState::Open;
        self.frontier.push(start, est);

        let mut found = false;
        while let Some((u, _)) = self.frontier.pop_min() {
            self.state[u] = SearchState::Closed;
            self.expanded += 1;
            if u == end {
                found = true;
                break;
            }
            self.relax_from(u, heuristic);
        }

        debug!(
            "a* monotonic single path: start={start} end={end} found={found} expanded={}",
            self.expanded
        );
        found
    }

    fn relax_from<H>(&mut self, u: NodeIndex, heuristic: &H)
    where
        H: Heuristic,
    {
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
                        self.frontier.fix(v, candidate + self.estimate[v]);
                    }
                }
                SearchState::Unvisited => {
                    let est = heuristic.estimate(v);
                    self.estimate[v] = est;
                    self.state[v] = SearchState::Open;
                    self.dist[v] = candidate;
                    self.tree.link(v, u, len);
                    self.frontier.push(v, candidate + est);
                }
            }
        }
    }
}

macro_rules! impl_heuristic_search {
    ($search:ident, $name:literal) => {
        impl<L, W> HeuristicSearch for $search<'_, L, W>
        where
            W: WeightFunction<L>,
        {
            fn name(&self) -> &'static str {
                $name
            }

            fn single_path_with<H: Heuristic>(
                &mut self,
                start: NodeIndex,
                end: NodeIndex,
                heuristic: &H,
            ) -> bool {
                self.single_path(start, end, heuristic)
            }

            fn reset(&mut self) {
                $search::reset(self)
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
    };
}

impl_heuristic_search!(AStarA, "astar_a");
impl_heuristic_search!(AStarM, "astar_m");

/// Binds a heuristic search to the heuristic of one target so it can be
/// driven through [`ShortestPathSearch`]. The heuristic must be relative to
/// the `end` later passed to `single_path`.
pub struct Guided<S, H> {
    search: S,
    heuristic: H,
}

impl<S, H> Guided<S, H>
where
    S: HeuristicSearch,
    H: Heuristic,
{
    pub fn new(search: S, heuristic: H) -> Self {
        Self { search, heuristic }
    }

    pub fn into_inner(self) -> S {
        self.search
    }
}

impl<S, H> ShortestPathSearch for Guided<S, H>
where
    S: HeuristicSearch,
    H: Heuristic,
{
    fn name(&self) -> &'static str {
        self.search.name()
    }

    fn single_path(&mut self, start: NodeIndex, end: NodeIndex) -> bool {
        self.search.single_path_with(start, end, &self.heuristic)
    }

    fn reset(&mut self) {
        self.search.reset()
    }

    fn tree(&self) -> &PathTree {
        self.search.tree()
    }

    fn dist(&self) -> &[f64] {
        self.search.dist()
    }

    fn expanded(&self) -> usize {
        self.search.expanded()
    }
}

fn candidate_from<S: HeuristicSearch>(search: &S, end: NodeIndex) -> PathCandidate {
    PathCandidate {
        nodes: search.tree().path_to(end),
        cost: search.dist()[end],
    }
}

/// One-shot Algorithm A search.
pub fn astar_a_path<L, W, H>(
    graph: &[Vec<Arc<L>>],
    weight: W,
    heuristic: &H,
    start: NodeIndex,
    end: NodeIndex,
) -> Option<PathCandidate>
where
    W: WeightFunction<L>,
    H: Heuristic,
{
    let mut search = AStarA::new(graph, weight);
    search
        .single_path(start, end, heuristic)
        .then(|| candidate_from(&search, end))
}

/// One-shot A* search with a monotonic heuristic.
pub fn astar_m_path<L, W, H>(
    graph: &[Vec<Arc<L>>],
    weight: W,
    heuristic: &H,
    start: NodeIndex,
    end: NodeIndex,
) -> Option<PathCandidate>
where
    W: WeightFunction<L>,
    H: Heuristic,
{
    let mut search = AStarM::new(graph, weight);
    search
        .single_path(start, end, heuristic)
        .then(|| candidate_from(&search, end))
}
