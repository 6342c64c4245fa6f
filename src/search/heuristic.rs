//! Checks for the heuristic contracts the A* variants rely on. Each is
//! linear in the graph size and meant for tests and diagnostics; the
//! searches themselves never call them.

use super::dijkstra::Dijkstra;
use super::types::HeuristicViolation;
use crate::model::{transpose, Arc, Heuristic, NodeIndex, WeightFunction};

const EPS: f64 = 1e-9;

/// Verifies that `heuristic` never overestimates the distance to `end`.
///
/// True distances come from a Dijkstra search from `end` over the reversed
/// graph. Nodes that cannot reach `end` accept any estimate.
pub fn check_admissible<L, W, H>(
    graph: &[Vec<Arc<L>>],
    weight: W,
    heuristic: &H,
    end: NodeIndex,
) -> Result<(), HeuristicViolation>
where
    L: Clone,
    W: WeightFunction<L>,
    H: Heuristic,
{
    let reversed = transpose(graph);
    let mut search = Dijkstra::new(&reversed, weight);
    search.all_paths(end);

    for node in 0..graph.len() {
        let Some(distance) = search.distance(node) else {
            continue;
        };
        let estimate = heuristic.estimate(node);
        if estimate > distance + EPS {
            return Err(HeuristicViolation::Overestimate {
                node,
                target: end,
                estimate,
                distance,
            });
        }
    }
    Ok(())
}

/// Verifies `h(a) <= weight(a, b) + h(b)` for every arc `a -> b`.
pub fn check_monotonic<L, W, H>(
    graph: &[Vec<Arc<L>>],
    weight: W,
    heuristic: &H,
) -> Result<(), HeuristicViolation>
where
    W: WeightFunction<L>,
    H: Heuristic,
{
    for (from, arcs) in graph.iter().enumerate() {
        let from_estimate = heuristic.estimate(from);
        for arc in arcs {
            let w = weight.weight(&arc.label);
            let to_estimate = heuristic.estimate(arc.to);
            if from_estimate > w + to_estimate + EPS {
                return Err(HeuristicViolation::NotMonotonic {
                    from,
                    to: arc.to,
                    weight: w,
                    from_estimate,
                    to_estimate,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AdjacencyList;

    fn weight(label: &f64) -> f64 {
        *label
    }

    fn diamond() -> AdjacencyList<f64> {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3, node 4 cannot reach 3
        vec![
            vec![Arc::new(1, 1.0), Arc::new(2, 4.0)],
            vec![Arc::new(3, 5.0)],
            vec![Arc::new(3, 1.0)],
            vec![],
            vec![Arc::new(0, 1.0)],
        ]
    }

    #[test]
    fn zero_heuristic_passes_both_checks() {
        let graph = diamond();
        let h = |_: NodeIndex| 0.0;
        assert_eq!(check_admissible(&graph, weight, &h, 3), Ok(()));
        assert_eq!(check_monotonic(&graph, weight, &h), Ok(()));
    }

    #[test]
    fn exact_distances_are_admissible_and_monotonic() {
        let graph = diamond();
        let exact = [5.0, 5.0, 1.0, 0.0, 6.0];
        let h = |n: NodeIndex| exact[n];
        assert_eq!(check_admissible(&graph, weight, &h, 3), Ok(()));
        assert_eq!(check_monotonic(&graph, weight, &h), Ok(()));
    }

    #[test]
    fn overestimate_is_reported() {
        let graph = diamond();
        let h = |n: NodeIndex| if n == 2 { 3.0 } else { 0.0 };
        let err = check_admissible(&graph, weight, &h, 3).unwrap_err();
        assert_eq!(
            err,
            HeuristicViolation::Overestimate {
                node: 2,
                target: 3,
                estimate: 3.0,
                distance: 1.0,
            }
        );
        assert!(err.to_string().contains("node 2"));
    }

    #[test]
    fn admissible_but_not_monotonic() {
        let graph = diamond();
        // h(0) = 5 is exact, yet it exceeds 4 + h(2) on the arc 0 -> 2
        let estimates = [5.0, 5.0, 0.0, 0.0, 0.0];
        let h = |n: NodeIndex| estimates[n];
        assert_eq!(check_admissible(&graph, weight, &h, 3), Ok(()));
        let err = check_monotonic(&graph, weight, &h).unwrap_err();
        assert!(matches!(
            err,
            HeuristicViolation::NotMonotonic { from: 0, to: 2, .. }
        ));
    }

    #[test]
    fn nodes_that_cannot_reach_target_are_ignored() {
        let graph: AdjacencyList<f64> = vec![vec![], vec![Arc::new(0, 1.0)]];
        let h = |n: NodeIndex| if n == 0 { 100.0 } else { 0.0 };
        // node 0 cannot reach 1
        assert_eq!(check_admissible(&graph, weight, &h, 1), Ok(()));
    }
}
