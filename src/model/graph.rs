/// Dense node identifier, used directly as an index into per-node arrays.
pub type NodeIndex = usize;

/// Directed half-edge. The label is opaque to the search engines and only
/// handed to the weight function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc<L> {
    pub to: NodeIndex,
    pub label: L,
}

impl<L> Arc<L> {
    pub fn new(to: NodeIndex, label: L) -> Self {
        Self { to, label }
    }
}

/// Owned adjacency list. Engines borrow it as `&[Vec<Arc<L>>]`.
pub type AdjacencyList<L> = Vec<Vec<Arc<L>>>;

pub trait WeightFunction<L> {
    fn weight(&self, label: &L) -> f64;
}

impl<L, F> WeightFunction<L> for F
where
    F: Fn(&L) -> f64,
{
    fn weight(&self, label: &L) -> f64 {
        self(label)
    }
}

/// Estimate of the remaining distance from a node to one fixed target.
pub trait Heuristic {
    fn estimate(&self, node: NodeIndex) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(NodeIndex) -> f64,
{
    fn estimate(&self, node: NodeIndex) -> f64 {
        self(node)
    }
}

/// Returns the first arc whose target is out of range, as
/// `(from node, arc position)`, or `None` if every arc is in bounds.
pub fn bounds_ok<L>(graph: &[Vec<Arc<L>>]) -> Option<(NodeIndex, usize)> {
    let order = graph.len();
    graph.iter().enumerate().find_map(|(from, arcs)| {
        arcs.iter()
            .position(|arc| arc.to >= order)
            .map(|pos| (from, pos))
    })
}

pub fn arc_count<L>(graph: &[Vec<Arc<L>>]) -> usize {
    graph.iter().map(Vec::len).sum()
}

/// Reverses every arc, keeping labels.
pub fn transpose<L: Clone>(graph: &[Vec<Arc<L>>]) -> AdjacencyList<L> {
    let mut reversed: AdjacencyList<L> = vec![Vec::new(); graph.len()];
    for (from, arcs) in graph.iter().enumerate() {
        for arc in arcs {
            reversed[arc.to].push(Arc::new(from, arc.label.clone()));
        }
    }
    reversed
}

/// Sums arc weights along `path`, taking the cheapest arc where a pair of
/// consecutive nodes is joined by parallel arcs. `None` if some step has no arc.
pub fn path_weight<L, W>(graph: &[Vec<Arc<L>>], weight: &W, path: &[NodeIndex]) -> Option<f64>
where
    W: WeightFunction<L>,
{
    let mut total = 0.0;
    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let step = graph
            .get(from)?
            .iter()
            .filter(|arc| arc.to == to)
            .map(|arc| weight.weight(&arc.label))
            .min_by(|a, b| a.total_cmp(b))?;
        total += step;
    }
    Some(total)
}
