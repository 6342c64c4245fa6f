use thiserror::Error;

use crate::model::NodeIndex;

/// A decoded path and its total weight.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCandidate {
    pub nodes: Vec<NodeIndex>,
    pub cost: f64,
}

/// Node status for searches that never reopen a closed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SearchState {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Node status for Algorithm A, where a done node may be reached again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ReachState {
    #[default]
    Unreached,
    Reached,
    Done,
}

/// Counterexample found by the heuristic checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeuristicViolation {
    #[error(
        "heuristic overestimates at node {node}: estimate {estimate} exceeds distance {distance} to target {target}"
    )]
    Overestimate {
        node: NodeIndex,
        target: NodeIndex,
        estimate: f64,
        distance: f64,
    },
    #[error(
        "heuristic is not monotonic on arc {from}->{to}: {from_estimate} > {weight} + {to_estimate}"
    )]
    NotMonotonic {
        from: NodeIndex,
        to: NodeIndex,
        weight: f64,
        from_estimate: f64,
        to_estimate: f64,
    },
}
