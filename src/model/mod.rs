pub mod graph;
pub mod path_tree;

pub use graph::{
    arc_count, bounds_ok, path_weight, transpose, AdjacencyList, Arc, Heuristic, NodeIndex,
    WeightFunction,
};
pub use path_tree::{PathEnd, PathTree};
