//! Shortest-path searches over graphs given as adjacency lists of dense
//! integer node indices.
//!
//! [`search::Dijkstra`] handles non-negative weights, [`search::AStarA`] and
//! [`search::AStarM`] add a heuristic toward one target, and
//! [`search::BellmanFord`] accepts negative weights and reports negative
//! cycles. Every engine records its result in a [`model::PathTree`].

pub mod model;
pub mod runtime;
pub mod search;

pub use model::{Arc, Heuristic, NodeIndex, PathEnd, PathTree, WeightFunction};
pub use search::{AStarA, AStarM, BellmanFord, Dijkstra, PathCandidate, ShortestPathSearch};
