use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use super::config::{Algorithm, QueryConfig};
use crate::model::{AdjacencyList, Heuristic, NodeIndex};
use crate::search::{
    check_admissible, check_monotonic, AStarA, AStarM, BellmanFord, Dijkstra, Guided,
    ShortestPathSearch,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathReport {
    pub node: NodeIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub distance: f64,
    pub path: Vec<NodeIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicReport {
    pub admissible: bool,
    pub monotonic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admissible_violation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monotonic_violation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    pub algorithm: Algorithm,
    pub source: NodeIndex,
    pub target: Option<NodeIndex>,
    pub found: bool,
    pub negative_cycle: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub negative_cycle_nodes: Vec<NodeIndex>,
    pub expanded: usize,
    pub max_len: usize,
    pub paths: Vec<PathReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<HeuristicReport>,
}

fn arc_weight(weight: &f64) -> f64 {
    *weight
}

/// Runs the query's search and collects the resulting paths: the target's
/// path in single-path mode, every reached node's path otherwise.
pub fn run_query(cfg: &QueryConfig) -> Result<QueryReport> {
    let graph = cfg.graph();
    let heuristic = |node: NodeIndex| cfg.heuristic[node];

    let heuristic_report = match cfg.target {
        Some(target) if cfg.validate_heuristic && cfg.algorithm.is_heuristic() => {
            Some(check_heuristic(&graph, &heuristic, target))
        }
        _ => None,
    };

    let mut report = match cfg.algorithm {
        Algorithm::BellmanFord => run_bellman_ford(cfg, &graph),
        Algorithm::Dijkstra => {
            let mut search = Dijkstra::new(&graph, arc_weight);
            match cfg.target {
                Some(target) => single_report(cfg, &mut search, target),
                None => {
                    search.all_paths(cfg.source);
                    all_paths_report(cfg, &search, true)
                }
            }
        }
        Algorithm::AstarA => {
            let target = cfg.target.context("astar_a needs a target")?;
            let mut search = Guided::new(AStarA::new(&graph, arc_weight), heuristic);
            single_report(cfg, &mut search, target)
        }
        Algorithm::AstarM => {
            let target = cfg.target.context("astar_m needs a target")?;
            let mut search = Guided::new(AStarM::new(&graph, arc_weight), heuristic);
            single_report(cfg, &mut search, target)
        }
    };
    report.heuristic = heuristic_report;

    info!(
        "query done: algorithm={} source={} target={:?} found={} expanded={}",
        report.algorithm, report.source, report.target, report.found, report.expanded
    );
    Ok(report)
}

fn check_heuristic<H>(
    graph: &AdjacencyList<f64>,
    heuristic: &H,
    target: NodeIndex,
) -> HeuristicReport
where
    H: Heuristic,
{
    let admissible = check_admissible(graph, arc_weight, heuristic, target).err();
    let monotonic = check_monotonic(graph, arc_weight, heuristic).err();
    debug!(
        "heuristic check: admissible={} monotonic={}",
        admissible.is_none(),
        monotonic.is_none()
    );
    HeuristicReport {
        admissible: admissible.is_none(),
        monotonic: monotonic.is_none(),
        admissible_violation: admissible.map(|err| err.to_string()),
        monotonic_violation: monotonic.map(|err| err.to_string()),
    }
}

fn run_bellman_ford(cfg: &QueryConfig, graph: &AdjacencyList<f64>) -> QueryReport {
    let mut search = BellmanFord::new(graph, arc_weight);
    if !search.run(cfg.source) {
        return QueryReport {
            algorithm: cfg.algorithm,
            source: cfg.source,
            target: cfg.target,
            found: false,
            negative_cycle: true,
            negative_cycle_nodes: search.negative_cycle_nodes().to_vec(),
            expanded: 0,
            max_len: 0,
            paths: Vec::new(),
            heuristic: None,
        };
    }
    match cfg.target {
        Some(target) => {
            let found = search.tree().is_reached(target);
            let paths = found
                .then(|| path_report(cfg, &search, target))
                .into_iter()
                .collect();
            base_report(cfg, &search, found, paths)
        }
        None => all_paths_report(cfg, &search, true),
    }
}

fn single_report<S>(cfg: &QueryConfig, search: &mut S, target: NodeIndex) -> QueryReport
where
    S: ShortestPathSearch,
{
    let found = search.single_path(cfg.source, target);
    let paths = found
        .then(|| path_report(cfg, search, target))
        .into_iter()
        .collect();
    base_report(cfg, search, found, paths)
}

fn all_paths_report<S>(cfg: &QueryConfig, search: &S, found: bool) -> QueryReport
where
    S: ShortestPathSearch,
{
    let paths = (0..cfg.nodes)
        .filter(|node| search.tree().is_reached(*node))
        .map(|node| path_report(cfg, search, node))
        .collect();
    base_report(cfg, search, found, paths)
}

fn base_report<S>(
    cfg: &QueryConfig,
    search: &S,
    found: bool,
    paths: Vec<PathReport>,
) -> QueryReport
where
    S: ShortestPathSearch,
{
    QueryReport {
        algorithm: cfg.algorithm,
        source: cfg.source,
        target: cfg.target,
        found,
        negative_cycle: false,
        negative_cycle_nodes: Vec::new(),
        expanded: search.expanded(),
        max_len: search.tree().max_len(),
        paths,
        heuristic: None,
    }
}

fn path_report<S>(cfg: &QueryConfig, search: &S, node: NodeIndex) -> PathReport
where
    S: ShortestPathSearch + ?Sized,
{
    let path = search.path_to(node);
    let path_names = cfg.names.as_ref().map(|names| {
        path.iter()
            .map(|n| names[*n].clone())
            .collect::<Vec<_>>()
    });
    PathReport {
        node,
        name: cfg.node_name(node).map(str::to_string),
        distance: search.dist()[node],
        path,
        path_names,
    }
}
