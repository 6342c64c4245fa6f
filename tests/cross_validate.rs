use pathsearch::model::{path_weight, AdjacencyList, Arc, NodeIndex};
use pathsearch::search::{check_admissible, check_monotonic, AStarA, AStarM, BellmanFord, Dijkstra};

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn weight(label: &f64) -> f64 {
    *label
}

/// Random digraph with integer weights in `min_w..=max_w`, so sums are exact.
fn random_graph(
    rng: &mut Lcg,
    order: usize,
    arcs: usize,
    min_w: i64,
    max_w: i64,
) -> AdjacencyList<f64> {
    let mut graph: AdjacencyList<f64> = vec![Vec::new(); order];
    let span = (max_w - min_w + 1) as u64;
    for _ in 0..arcs {
        let from = rng.below(order as u64) as usize;
        let to = rng.below(order as u64) as usize;
        let w = (min_w + rng.below(span) as i64) as f64;
        graph[from].push(Arc::new(to, w));
    }
    graph
}

/// Minimum weight over all simple paths from `start`, by exhaustive DFS.
fn brute_force(graph: &AdjacencyList<f64>, start: NodeIndex) -> Vec<Option<f64>> {
    fn walk(
        graph: &AdjacencyList<f64>,
        node: NodeIndex,
        acc: f64,
        on_path: &mut Vec<bool>,
        best: &mut Vec<Option<f64>>,
    ) {
        if best[node].map_or(true, |b| acc < b) {
            best[node] = Some(acc);
        }
        on_path[node] = true;
        for arc in &graph[node] {
            if !on_path[arc.to] {
                walk(graph, arc.to, acc + arc.label, on_path, best);
            }
        }
        on_path[node] = false;
    }

    let mut best = vec![None; graph.len()];
    let mut on_path = vec![false; graph.len()];
    walk(graph, start, 0.0, &mut on_path, &mut best);
    best
}

fn floyd_warshall(graph: &AdjacencyList<f64>) -> Vec<Vec<f64>> {
    let n = graph.len();
    let mut d = vec![vec![f64::INFINITY; n]; n];
    for (u, row) in d.iter_mut().enumerate() {
        row[u] = 0.0;
        for arc in &graph[u] {
            row[arc.to] = row[arc.to].min(arc.label);
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let via = d[i][k] + d[k][j];
                if via < d[i][j] {
                    d[i][j] = via;
                }
            }
        }
    }
    d
}

fn assert_decoded_path(
    graph: &AdjacencyList<f64>,
    path: &[NodeIndex],
    start: NodeIndex,
    end: NodeIndex,
    len: usize,
    distance: f64,
) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&end));
    assert_eq!(path.len(), len);
    let total = path_weight(graph, &weight, path).expect("consecutive nodes joined by arcs");
    assert!((total - distance).abs() < 1e-9, "{path:?}: {total} vs {distance}");
}

#[test]
fn dijkstra_matches_brute_force_on_small_graphs() {
    let mut rng = Lcg(7);
    for _ in 0..60 {
        let order = 2 + rng.below(5) as usize;
        let graph = random_graph(&mut rng, order, order * 2, 0, 9);
        let mut search = Dijkstra::new(&graph, weight);

        for start in 0..order {
            let expected = brute_force(&graph, start);
            for end in 0..order {
                let found = search.single_path(start, end);
                assert_eq!(found, expected[end].is_some(), "{start}->{end}");
                if let Some(d) = expected[end] {
                    assert_eq!(search.distance(end), Some(d));
                    let path = search.path_to(end);
                    assert_decoded_path(&graph, &path, start, end, search.tree().len(end), d);
                } else {
                    assert!(search.path_to(end).is_empty());
                }
            }
        }
    }
}

#[test]
fn astar_variants_match_dijkstra() {
    let mut rng = Lcg(11);
    for _ in 0..40 {
        let order = 3 + rng.below(8) as usize;
        let graph = random_graph(&mut rng, order, order * 3, 0, 20);
        let mut dijkstra = Dijkstra::new(&graph, weight);
        let mut astar_a = AStarA::new(&graph, weight);
        let mut astar_m = AStarM::new(&graph, weight);
        let exact = floyd_warshall(&graph);

        for end in 0..order {
            // nodes that cannot reach `end` only lead to nodes that cannot
            // either, so a shared large estimate keeps both properties
            let to_end: Vec<f64> = exact
                .iter()
                .map(|row| if row[end].is_finite() { row[end] } else { 1.0e6 })
                .collect();
            // uniformly scaled exact distances stay monotonic
            let monotonic = |n: NodeIndex| 0.75 * to_end[n];
            // per-node scaling keeps admissibility but breaks consistency
            let factors: Vec<f64> = (0..order).map(|_| rng.below(101) as f64 / 100.0).collect();
            let admissible = |n: NodeIndex| factors[n] * to_end[n];

            assert_eq!(check_monotonic(&graph, weight, &monotonic), Ok(()));
            assert_eq!(check_admissible(&graph, weight, &admissible, end), Ok(()));

            for start in 0..order {
                let found = dijkstra.single_path(start, end);
                let expected = dijkstra.distance(end);

                assert_eq!(astar_a.single_path(start, end, &admissible), found);
                assert_eq!(astar_m.single_path(start, end, &monotonic), found);
                if let Some(d) = expected {
                    let a = astar_a.distance(end).expect("reached");
                    let m = astar_m.distance(end).expect("reached");
                    assert!((a - d).abs() < 1e-9, "A {start}->{end}: {a} vs {d}");
                    assert!((m - d).abs() < 1e-9, "M {start}->{end}: {m} vs {d}");
                    assert_decoded_path(
                        &graph,
                        &astar_a.path_to(end),
                        start,
                        end,
                        astar_a.tree().len(end),
                        a,
                    );
                    assert_decoded_path(
                        &graph,
                        &astar_m.path_to(end),
                        start,
                        end,
                        astar_m.tree().len(end),
                        m,
                    );
                }
                // closed at most once
                assert!(astar_m.expanded() <= astar_m.tree().reached_count());
            }
        }
    }
}

#[test]
fn bellman_ford_matches_dijkstra_without_negative_weights() {
    let mut rng = Lcg(23);
    for _ in 0..40 {
        let order = 2 + rng.below(10) as usize;
        let graph = random_graph(&mut rng, order, order * 3, 0, 15);
        let mut dijkstra = Dijkstra::new(&graph, weight);
        let mut bellman_ford = BellmanFord::new(&graph, weight);

        for start in 0..order {
            let reached = dijkstra.all_paths(start);
            assert_eq!(bellman_ford.all_paths(start), Some(reached));
            for node in 0..order {
                assert_eq!(bellman_ford.distance(node), dijkstra.distance(node));
                if let Some(d) = bellman_ford.distance(node) {
                    assert_decoded_path(
                        &graph,
                        &bellman_ford.path_to(node),
                        start,
                        node,
                        bellman_ford.tree().len(node),
                        d,
                    );
                }
            }
        }
    }
}

#[test]
fn bellman_ford_negative_weights_match_floyd_warshall() {
    let mut graph: AdjacencyList<f64> = vec![Vec::new(); 4];
    for (from, to, w) in [(0, 2, -1.0), (1, 3, -2.0), (2, 1, 4.0), (2, 3, 3.0), (3, 0, 2.0)] {
        graph[from].push(Arc::new(to, w));
    }
    let exact = floyd_warshall(&graph);
    let mut search = BellmanFord::new(&graph, weight);
    for start in 0..4 {
        assert!(search.run(start));
        for node in 0..4 {
            assert_eq!(search.distance(node), Some(exact[start][node]));
            let path = search.path_to(node);
            assert_decoded_path(
                &graph,
                &path,
                start,
                node,
                search.tree().len(node),
                exact[start][node],
            );
        }
    }
}

#[test]
fn bellman_ford_detects_planted_negative_cycles() {
    let mut rng = Lcg(31);
    for _ in 0..30 {
        let order = 4 + rng.below(6) as usize;
        let mut graph = random_graph(&mut rng, order, order * 2, 0, 9);
        // chain 0 -> 1 -> 2 reaches a cycle 2 -> 3 -> 2 of total weight -1
        graph[0].push(Arc::new(1, 1.0));
        graph[1].push(Arc::new(2, 1.0));
        graph[2].push(Arc::new(3, 4.0));
        graph[3].push(Arc::new(2, -5.0));

        let mut search = BellmanFord::new(&graph, weight);
        assert!(!search.run(0));
        assert!(search.negative_cycle_nodes().contains(&2));
        assert!(search.negative_cycle_nodes().contains(&3));
        assert_eq!(search.all_paths(1), None);

        // the same arcs with the negative one made non-negative
        for arcs in graph.iter_mut() {
            for arc in arcs.iter_mut() {
                arc.label = arc.label.abs();
            }
        }
        let mut search = BellmanFord::new(&graph, weight);
        assert!(search.run(0));
        let mut dijkstra = Dijkstra::new(&graph, weight);
        dijkstra.all_paths(0);
        assert_eq!(search.dist(), dijkstra.dist());
    }
}
