mod astar;
mod bellman_ford;
mod dijkstra;
mod frontier;
mod heuristic;
mod traits;
mod types;

pub use astar::{astar_a_path, astar_m_path, AStarA, AStarM, Guided};
pub use bellman_ford::{bellman_ford_path, BellmanFord};
pub use dijkstra::{dijkstra_path, Dijkstra};
pub use frontier::IndexedFrontier;
pub use heuristic::{check_admissible, check_monotonic};
pub use traits::{HeuristicSearch, ShortestPathSearch};
pub use types::{HeuristicViolation, PathCandidate};
