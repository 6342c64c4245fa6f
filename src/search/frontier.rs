use std::cmp::Ordering;

use crate::model::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    node: NodeIndex,
    key: f64,
}

impl QueueEntry {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Binary min-heap of open nodes keyed by `f64`, with an inverse map from
/// node to heap slot so a queued key can be changed in O(log n).
///
/// Equal keys pop in ascending node order.
#[derive(Debug, Default, Clone)]
pub struct IndexedFrontier {
    heap: Vec<QueueEntry>,
    position: Vec<Option<usize>>,
}

impl IndexedFrontier {
    pub fn new(order: usize) -> Self {
        Self {
            heap: Vec::with_capacity(order),
            position: vec![None; order],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.position[node].is_some()
    }

    pub fn key(&self, node: NodeIndex) -> Option<f64> {
        self.position[node].map(|slot| self.heap[slot].key)
    }

    /// Queues `node`, which must not already be queued.
    pub fn push(&mut self, node: NodeIndex, key: f64) {
        debug_assert!(!self.contains(node), "node {node} already queued");
        let slot = self.heap.len();
        self.heap.push(QueueEntry { node, key });
        self.position[node] = Some(slot);
        self.sift_up(slot);
    }

    pub fn pop_min(&mut self) -> Option<(NodeIndex, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.position[entry.node] = None;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((entry.node, entry.key))
    }

    /// Replaces the key of a queued node and restores heap order.
    /// Returns `false` if `node` is not queued.
    pub fn fix(&mut self, node: NodeIndex, key: f64) -> bool {
        let Some(slot) = self.position[node] else {
            return false;
        };
        let old = self.heap[slot].key;
        self.heap[slot].key = key;
        if key.total_cmp(&old).is_lt() {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
        true
    }

    pub fn clear(&mut self) {
        for entry in self.heap.drain(..) {
            self.position[entry.node] = None;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a].node] = Some(a);
        self.position[self.heap[b].node] = Some(b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].cmp_key(&self.heap[parent]).is_ge() {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.heap[right].cmp_key(&self.heap[left]).is_lt() {
                child = right;
            }
            if self.heap[child].cmp_key(&self.heap[slot]).is_ge() {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }
}
