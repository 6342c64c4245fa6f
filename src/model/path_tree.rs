use super::graph::NodeIndex;

/// One entry of a path tree.
///
/// `len == 0` marks a node no search has reached. A start node has
/// `from == None` and `len == 1`. Otherwise `from` is the predecessor on the
/// recorded path and `len` counts the nodes from the start to this node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathEnd {
    pub from: Option<NodeIndex>,
    pub len: usize,
}

impl PathEnd {
    pub fn is_reached(&self) -> bool {
        self.len > 0
    }
}

/// Shortest-path tree (or forest) produced by a search.
///
/// Only the owning search writes to it; callers decode paths with
/// [`PathTree::path_to`].
#[derive(Debug, Clone, Default)]
pub struct PathTree {
    paths: Vec<PathEnd>,
    max_len: usize,
}

impl PathTree {
    pub fn new(order: usize) -> Self {
        Self {
            paths: vec![PathEnd::default(); order],
            max_len: 0,
        }
    }

    pub fn order(&self) -> usize {
        self.paths.len()
    }

    pub fn get(&self, node: NodeIndex) -> PathEnd {
        self.paths[node]
    }

    pub fn len(&self, node: NodeIndex) -> usize {
        self.paths[node].len
    }

    pub fn is_reached(&self, node: NodeIndex) -> bool {
        self.paths[node].is_reached()
    }

    /// Longest path length recorded since the last reset.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn reached_count(&self) -> usize {
        self.paths.iter().filter(|end| end.is_reached()).count()
    }

    /// Decodes the path from its start node to `end`. Empty if `end` is
    /// unreached.
    pub fn path_to(&self, end: NodeIndex) -> Vec<NodeIndex> {
        let mut path = Vec::new();
        self.path_to_into(end, &mut path);
        path
    }

    /// Same as [`PathTree::path_to`] but reuses `buf`.
    pub fn path_to_into(&self, end: NodeIndex, buf: &mut Vec<NodeIndex>) {
        buf.clear();
        let len = self.paths[end].len;
        if len == 0 {
            return;
        }
        buf.resize(len, end);

        let mut node = end;
        for i in (0..len).rev() {
            buf[i] = node;
            let entry = self.paths[node];
            if entry.len == 1 {
                break;
            }
            match entry.from {
                Some(prev) => node = prev,
                None => break,
            }
        }
    }

    /// Start node of the path ending at `node`.
    pub fn root(&self, node: NodeIndex) -> Option<NodeIndex> {
        let mut entry = self.paths[node];
        if entry.len == 0 {
            return None;
        }
        let mut current = node;
        for _ in 1..entry.len {
            match entry.from {
                Some(prev) => {
                    current = prev;
                    entry = self.paths[prev];
                }
                None => break,
            }
        }
        Some(current)
    }

    pub fn reset(&mut self) {
        self.paths.fill(PathEnd::default());
        self.max_len = 0;
    }

    pub(crate) fn start(&mut self, node: NodeIndex) {
        self.paths[node] = PathEnd { from: None, len: 1 };
        self.max_len = self.max_len.max(1);
    }

    pub(crate) fn link(&mut self, node: NodeIndex, from: NodeIndex, len: usize) {
        self.paths[node] = PathEnd {
            from: Some(from),
            len,
        };
        self.max_len = self.max_len.max(len);
    }

    /// Rebuilds `len` for every reached node from its `from` chain.
    ///
    /// Relaxations that improve a node after its descendants were linked
    /// leave those descendants with stale lengths.
    pub(crate) fn recompute_lengths(&mut self) {
        let order = self.paths.len();
        let mut fixed = vec![false; order];
        let mut chain = Vec::new();
        self.max_len = 0;

        for node in 0..order {
            if fixed[node] || !self.paths[node].is_reached() {
                continue;
            }
            chain.clear();
            let mut current = node;
            let mut len = loop {
                if fixed[current] {
                    break self.paths[current].len;
                }
                chain.push(current);
                match self.paths[current].from {
                    Some(prev) if chain.len() <= order => current = prev,
                    _ => break 0,
                }
            };
            for &n in chain.iter().rev() {
                len += 1;
                self.paths[n].len = len;
                fixed[n] = true;
                self.max_len = self.max_len.max(len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_tree() -> PathTree {
        // 2 -> 0 -> 3, node 1 unreached
        let mut tree = PathTree::new(4);
        tree.start(2);
        tree.link(0, 2, 2);
        tree.link(3, 0, 3);
        tree
    }

    #[test]
    fn path_to_walks_back_to_start() {
        let tree = chain_tree();
        assert_eq!(tree.path_to(3), vec![2, 0, 3]);
        assert_eq!(tree.path_to(2), vec![2]);
        assert!(tree.path_to(1).is_empty());
        assert_eq!(tree.max_len(), 3);
        assert_eq!(tree.reached_count(), 3);
        assert_eq!(tree.root(3), Some(2));
        assert_eq!(tree.root(1), None);
        assert_eq!(
            tree.get(3),
            PathEnd {
                from: Some(0),
                len: 3
            }
        );
        assert!(!tree.get(1).is_reached());
    }

    #[test]
    fn path_to_into_reuses_buffer() {
        let tree = chain_tree();
        let mut buf = vec![9, 9, 9, 9, 9];
        tree.path_to_into(0, &mut buf);
        assert_eq!(buf, vec![2, 0]);
        tree.path_to_into(1, &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn recompute_lengths_repairs_stale_descendants() {
        let mut tree = PathTree::new(5);
        tree.start(0);
        tree.link(1, 0, 2);
        tree.link(2, 1, 3);
        tree.link(3, 2, 4);
        // 2 re-linked directly to the start; 3 still claims length 4
        tree.link(2, 0, 2);
        tree.recompute_lengths();

        assert_eq!(tree.len(3), 3);
        assert_eq!(tree.path_to(3), vec![0, 2, 3]);
        assert_eq!(tree.max_len(), 3);
        assert!(!tree.is_reached(4));
    }

    #[test]
    fn reset_clears_everything() {
        let mut tree = chain_tree();
        tree.reset();
        assert_eq!(tree.reached_count(), 0);
        assert_eq!(tree.max_len(), 0);
        assert_eq!(tree.order(), 4);
    }
}
