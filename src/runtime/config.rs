use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{bounds_ok, AdjacencyList, Arc, NodeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Dijkstra,
    AstarA,
    AstarM,
    BellmanFord,
}

impl Algorithm {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "dijkstra" => Ok(Self::Dijkstra),
            "astar_a" | "algorithm_a" | "astar" => Ok(Self::AstarA),
            "astar_m" | "astar_monotonic" => Ok(Self::AstarM),
            "bellman_ford" | "bellmanford" => Ok(Self::BellmanFord),
            other => bail!("unknown algorithm: {other}"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dijkstra => "dijkstra",
            Self::AstarA => "astar_a",
            Self::AstarM => "astar_m",
            Self::BellmanFord => "bellman_ford",
        }
    }

    pub fn is_heuristic(&self) -> bool {
        matches!(self, Self::AstarA | Self::AstarM)
    }

    pub fn allows_negative_weights(&self) -> bool {
        matches!(self, Self::BellmanFord)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcConfig {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub weight: f64,
}

/// A validated search query.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub algorithm: Algorithm,
    pub nodes: usize,
    pub names: Option<Vec<String>>,
    pub source: NodeIndex,
    pub target: Option<NodeIndex>,
    pub arcs: Vec<ArcConfig>,
    /// Per-node estimates of the distance to `target`; zeros unless given.
    pub heuristic: Vec<f64>,
    pub validate_heuristic: bool,
}

impl QueryConfig {
    /// Adjacency list with each arc's weight as its label, arcs kept in file
    /// order.
    pub fn graph(&self) -> AdjacencyList<f64> {
        let mut graph: AdjacencyList<f64> = vec![Vec::new(); self.nodes];
        for arc in &self.arcs {
            graph[arc.from].push(Arc::new(arc.to, arc.weight));
        }
        graph
    }

    pub fn node_name(&self, node: NodeIndex) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(node))
            .map(String::as_str)
    }
}

/// A node given either by index or by one of the configured names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNode {
    Index(usize),
    Name(String),
}

#[derive(Debug, Deserialize)]
struct RawArc {
    from: RawNode,
    to: RawNode,
    weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawQueryConfig {
    algorithm: Option<String>,
    nodes: Option<usize>,
    names: Option<Vec<String>>,
    source: RawNode,
    target: Option<RawNode>,
    #[serde(default)]
    arcs: Vec<RawArc>,
    heuristic: Option<Vec<f64>>,
    validate_heuristic: Option<bool>,
}

pub fn load_query_config(path: &Path) -> Result<QueryConfig> {
    let raw_text = fs::read_to_string(path)
        .with_context(|| format!("failed to read query file {}", path.display()))?;
    parse_query_config(&raw_text)
        .with_context(|| format!("invalid query file {}", path.display()))
}

pub fn parse_query_config(text: &str) -> Result<QueryConfig> {
    let raw_cfg: RawQueryConfig =
        serde_yaml::from_str(text).context("failed to parse query yaml")?;

    let algorithm = match raw_cfg.algorithm.as_deref() {
        Some(raw) => Algorithm::parse(raw)?,
        None => Algorithm::Dijkstra,
    };

    let names = raw_cfg.names;
    if let Some(names) = &names {
        for (idx, name) in names.iter().enumerate() {
            ensure!(
                !names[..idx].contains(name),
                "duplicate node name: {name}"
            );
        }
    }

    let resolve = |node: &RawNode| -> Result<NodeIndex> {
        match node {
            RawNode::Index(idx) => Ok(*idx),
            RawNode::Name(name) => names
                .as_ref()
                .and_then(|names| names.iter().position(|n| n == name))
                .with_context(|| format!("unknown node name: {name}")),
        }
    };

    let source = resolve(&raw_cfg.source)?;
    let target = raw_cfg.target.as_ref().map(&resolve).transpose()?;
    let arcs = raw_cfg
        .arcs
        .iter()
        .map(|arc| {
            Ok(ArcConfig {
                from: resolve(&arc.from)?,
                to: resolve(&arc.to)?,
                weight: arc.weight.unwrap_or(1.0),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let inferred = arcs
        .iter()
        .flat_map(|arc| [arc.from, arc.to])
        .chain(std::iter::once(source))
        .chain(target)
        .max()
        .map_or(0, |max| max + 1);
    let nodes = raw_cfg
        .nodes
        .or_else(|| names.as_ref().map(Vec::len))
        .unwrap_or(inferred);

    if let Some(names) = &names {
        ensure!(
            names.len() == nodes,
            "names lists {} nodes but the graph has {nodes}",
            names.len()
        );
    }
    ensure!(source < nodes, "source {source} out of range 0..{nodes}");
    if let Some(target) = target {
        ensure!(target < nodes, "target {target} out of range 0..{nodes}");
    }
    if algorithm.is_heuristic() && target.is_none() {
        bail!("{algorithm} needs a target");
    }
    let validate_heuristic = raw_cfg.validate_heuristic.unwrap_or(false);
    // the checks measure true distances with dijkstra
    ensure!(
        !validate_heuristic || algorithm.is_heuristic(),
        "validate_heuristic only applies to astar_a and astar_m, not {algorithm}"
    );

    for arc in &arcs {
        ensure!(
            arc.weight.is_finite(),
            "arc {}->{} has non-finite weight {}",
            arc.from,
            arc.to,
            arc.weight
        );
        if !algorithm.allows_negative_weights() {
            ensure!(
                arc.weight >= 0.0,
                "arc {}->{} has negative weight {}; {algorithm} needs non-negative weights",
                arc.from,
                arc.to,
                arc.weight
            );
        }
    }

    let heuristic = raw_cfg.heuristic.unwrap_or_else(|| vec![0.0; nodes]);
    ensure!(
        heuristic.len() == nodes,
        "heuristic has {} estimates for {nodes} nodes",
        heuristic.len()
    );

    for (idx, arc) in arcs.iter().enumerate() {
        ensure!(
            arc.from < nodes,
            "arc {idx} starts at node {}, outside 0..{nodes}",
            arc.from
        );
    }

    let cfg = QueryConfig {
        algorithm,
        nodes,
        names,
        source,
        target,
        arcs,
        heuristic,
        validate_heuristic,
    };

    if let Some((from, pos)) = bounds_ok(&cfg.graph()) {
        bail!("arc {pos} of node {from} points outside 0..{nodes}");
    }
    Ok(cfg)
}
