use crate::model::{Heuristic, NodeIndex, PathTree};

/// Common surface of the search engines, used where the engine is chosen
/// at runtime.
pub trait ShortestPathSearch {
    fn name(&self) -> &'static str;

    /// Searches for a path from `start` to `end`; `true` if one was found.
    fn single_path(&mut self, start: NodeIndex, end: NodeIndex) -> bool;

    fn reset(&mut self);

    fn tree(&self) -> &PathTree;

    fn dist(&self) -> &[f64];

    /// Nodes closed by the last search.
    fn expanded(&self) -> usize;

    fn distance(&self, node: NodeIndex) -> Option<f64> {
        self.tree()
            .is_reached(node)
            .then(|| self.dist()[node])
    }

    fn path_to(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.tree().path_to(node)
    }
}

/// Searches that need a heuristic for the target at call time.
pub trait HeuristicSearch {
    fn name(&self) -> &'static str;

    fn single_path_with<H: Heuristic>(
        &mut self,
        start: NodeIndex,
        end: NodeIndex,
        heuristic: &H,
    ) -> bool;

    fn reset(&mut self);

    fn tree(&self) -> &PathTree;

    fn dist(&self) -> &[f64];

    fn expanded(&self) -> usize;
}
