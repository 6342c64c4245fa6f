use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use pathsearch::model::{arc_count, AdjacencyList, Arc, NodeIndex};
use pathsearch::runtime::logging::init_logging;
use pathsearch::search::{AStarA, AStarM, BellmanFord, Dijkstra, Guided, ShortestPathSearch};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "search_bench")]
#[command(about = "Benchmark shortest-path searches on random geometric graphs")]
struct Args {
    #[arg(long, default_value_t = 200)]
    nodes: usize,
    #[arg(long, default_value_t = 0.03)]
    density: f64,
    #[arg(long, default_value_t = 3)]
    seeds: usize,
    #[arg(long, default_value_t = 1)]
    start_seed: u64,
    #[arg(long, default_value_t = 8)]
    iterations: usize,
    #[arg(long, default_value = "WARN")]
    log_level: String,
    #[arg(long)]
    output_json: Option<PathBuf>,
}

const TOLERANCE: f64 = 1e-6;

/// SplitMix64, seeded per graph so runs are reproducible.
struct SeededRng(u64);

impl SeededRng {
    fn unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        (z >> 11) as f64 / (1_u64 << 53) as f64
    }

    fn between(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.unit()
    }
}

#[derive(Debug, Serialize)]
struct SearchRun {
    algorithm: &'static str,
    runtime_ms: f64,
    found: bool,
    distance: Option<f64>,
    expanded: usize,
    path_len: usize,
}

#[derive(Debug, Serialize)]
struct SeedRun {
    seed: u64,
    nodes: usize,
    arcs: usize,
    source: NodeIndex,
    target: NodeIndex,
    agree: bool,
    algorithms: Vec<SearchRun>,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    algorithm: &'static str,
    runs: usize,
    runtime_ms: f64,
    mean_expanded: f64,
}

#[derive(Debug, Clone, Copy)]
struct Point {
    x: f64,
    y: f64,
}

impl Point {
    fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

fn arc_weight(weight: &f64) -> f64 {
    *weight
}

/// Points in a 100x100 square joined by a bidirectional ring plus random
/// arcs. Every arc costs at least the straight-line distance between its
/// ends, so the distance to the target is a monotonic heuristic.
fn generate_graph(seed: u64, nodes: usize, density: f64) -> (AdjacencyList<f64>, Vec<Point>) {
    let mut rng = SeededRng(seed);
    let points: Vec<Point> = (0..nodes)
        .map(|_| Point {
            x: rng.between(0.0, 100.0),
            y: rng.between(0.0, 100.0),
        })
        .collect();
    let mut graph: AdjacencyList<f64> = vec![Vec::new(); nodes];

    let connect = |graph: &mut AdjacencyList<f64>, rng: &mut SeededRng, u: usize, v: usize| {
        let w = points[u].distance(&points[v]) * rng.between(1.0, 1.5);
        graph[u].push(Arc::new(v, w));
    };

    if nodes >= 2 {
        for u in 0..nodes {
            let v = (u + 1) % nodes;
            connect(&mut graph, &mut rng, u, v);
            connect(&mut graph, &mut rng, v, u);
        }
    }

    let p = density.clamp(0.0, 1.0);
    for u in 0..nodes {
        for v in 0..nodes {
            if u == v || graph[u].iter().any(|arc| arc.to == v) {
                continue;
            }
            if rng.unit() < p {
                connect(&mut graph, &mut rng, u, v);
            }
        }
    }

    (graph, points)
}

/// Node with the largest finite distance from `source`.
fn farthest_node(graph: &AdjacencyList<f64>, source: NodeIndex) -> NodeIndex {
    let mut search = Dijkstra::new(graph, arc_weight);
    search.all_paths(source);
    (0..graph.len())
        .filter_map(|node| search.distance(node).map(|d| (node, d)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(source, |(node, _)| node)
}

fn bench_search<S>(
    search: &mut S,
    source: NodeIndex,
    target: NodeIndex,
    iterations: usize,
) -> SearchRun
where
    S: ShortestPathSearch,
{
    let iterations = iterations.max(1);
    let mut found = false;
    let started = Instant::now();
    for _ in 0..iterations {
        found = search.single_path(source, target);
    }
    SearchRun {
        algorithm: search.name(),
        runtime_ms: started.elapsed().as_secs_f64() * 1000.0 / iterations as f64,
        found,
        distance: search.distance(target),
        expanded: search.expanded(),
        path_len: search.tree().len(target),
    }
}

/// Per-engine means over every seed, in the order the engines ran.
fn summarize(seed_runs: &[SeedRun]) -> Vec<Summary> {
    let mut summaries: Vec<Summary> = Vec::new();
    for run in seed_runs.iter().flat_map(|seed| &seed.algorithms) {
        let idx = match summaries.iter().position(|s| s.algorithm == run.algorithm) {
            Some(idx) => idx,
            None => {
                summaries.push(Summary {
                    algorithm: run.algorithm,
                    ..Summary::default()
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[idx];
        summary.runs += 1;
        summary.runtime_ms += run.runtime_ms;
        summary.mean_expanded += run.expanded as f64;
    }
    for summary in &mut summaries {
        let n = summary.runs.max(1) as f64;
        summary.runtime_ms /= n;
        summary.mean_expanded /= n;
    }
    summaries
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;
    let mut seed_runs = Vec::new();

    for idx in 0..args.seeds.max(1) {
        let seed = args.start_seed + idx as u64;
        let (graph, points) = generate_graph(seed, args.nodes.max(2), args.density);
        let source = 0;
        let target = farthest_node(&graph, source);
        let heuristic = |node: NodeIndex| points[node].distance(&points[target]);

        let algorithms = vec![
            bench_search(
                &mut Dijkstra::new(&graph, arc_weight),
                source,
                target,
                args.iterations,
            ),
            bench_search(
                &mut Guided::new(AStarA::new(&graph, arc_weight), heuristic),
                source,
                target,
                args.iterations,
            ),
            bench_search(
                &mut Guided::new(AStarM::new(&graph, arc_weight), heuristic),
                source,
                target,
                args.iterations,
            ),
            bench_search(
                &mut BellmanFord::new(&graph, arc_weight),
                source,
                target,
                args.iterations,
            ),
        ];

        let reference = algorithms[0].distance;
        let agree = algorithms.iter().all(|run| match (reference, run.distance) {
            (Some(a), Some(b)) => (a - b).abs() <= TOLERANCE,
            (None, None) => true,
            _ => false,
        });
        if !agree {
            warn!("seed {seed}: searches disagree on distance {source}->{target}");
        }

        seed_runs.push(SeedRun {
            seed,
            nodes: graph.len(),
            arcs: arc_count(&graph),
            source,
            target,
            agree,
            algorithms,
        });
    }

    let summaries = summarize(&seed_runs);
    println!("algorithm\truntime_ms\tmean_expanded");
    for summary in &summaries {
        println!(
            "{}\t{:.4}\t{:.1}",
            summary.algorithm, summary.runtime_ms, summary.mean_expanded
        );
    }

    let mismatches = seed_runs.iter().filter(|run| !run.agree).count();
    let payload = json!({
        "config": {
            "nodes": args.nodes,
            "density": args.density,
            "seeds": args.seeds,
            "start_seed": args.start_seed,
            "iterations": args.iterations,
        },
        "mismatches": mismatches,
        "runs": seed_runs,
        "summary": summaries,
    });

    if let Some(path) = args.output_json {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(&payload)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    Ok(())
}
