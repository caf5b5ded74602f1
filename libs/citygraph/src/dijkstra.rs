use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;

use crate::utils::VertexVec;
use crate::{Arc, Vertex, Weight};

/// Priority queue used to pick the next vertex to settle.
///
/// Both variants settle vertices in increasing `(distance, vertex id)` order
/// and therefore produce the same labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueueKind {
    /// O((V+E) log V), lazy deletion of stale entries
    #[default]
    BinaryHeap,
    /// O(V²), for small graphs
    LinearScan,
}

pub(crate) struct Labels<W> {
    dist: VertexVec<W>,
    pred: VertexVec<Option<Vertex>>,
}

impl<W: Weight> Labels<W> {
    fn new(num_nodes: usize, source: Vertex) -> Self {
        let mut dist = vertex_vec![W::max_value(); num_nodes];
        dist[source] = W::zero();
        Self {
            dist,
            pred: vertex_vec![None; num_nodes],
        }
    }

    #[inline(always)]
    pub(crate) fn distance(&self, v: Vertex) -> W {
        self.dist[v]
    }

    /// Distances saturate at `W::max_value()`, so a path too long to be
    /// represented stays unreachable instead of overflowing.
    #[inline(always)]
    fn relax(&mut self, from: Vertex, arc: &Arc<W>) -> bool {
        let candidate = self.dist[from].saturating_add(&arc.w);
        if candidate < self.dist[arc.to] {
            self.dist[arc.to] = candidate;
            self.pred[arc.to] = Some(from);
            true
        } else {
            false
        }
    }

    /// Walks the predecessor chain back from `target`.
    ///
    /// The walk is bounded by `|V| + 1` steps; a longer chain can only come
    /// from a corrupted (cyclic) predecessor array and is reported as no path.
    pub(crate) fn reconstruct(&self, source: Vertex, target: Vertex) -> Option<Vec<Vertex>> {
        if self.dist[target] == W::max_value() {
            return None;
        }
        let bound = self.dist.len() + 1;
        let mut path = vec![target];
        let mut current = target;
        while current != source {
            if path.len() > bound {
                return None;
            }
            current = self.pred[current]?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    #[cfg(test)]
    pub(crate) fn corrupt_predecessor(&mut self, v: Vertex, pred: Vertex) {
        self.pred[v] = Some(pred);
    }
}

pub(crate) fn with_binary_heap<W: Weight>(
    adjacency: &VertexVec<Vec<Arc<W>>>,
    source: Vertex,
) -> Labels<W> {
    let mut labels = Labels::new(adjacency.len(), source);
    let mut queue = BinaryHeap::new();
    queue.push(Reverse((W::zero(), source)));

    while let Some(Reverse((d, from))) = queue.pop() {
        if d > labels.dist[from] {
            // stale entry
            continue;
        }
        for arc in adjacency[from].iter() {
            if labels.relax(from, arc) {
                queue.push(Reverse((labels.dist[arc.to], arc.to)));
            }
        }
    }
    labels
}

pub(crate) fn with_linear_scan<W: Weight>(
    adjacency: &VertexVec<Vec<Arc<W>>>,
    source: Vertex,
) -> Labels<W> {
    let num_nodes = adjacency.len();
    let mut labels = Labels::new(num_nodes, source);
    let mut settled = FixedBitSet::with_capacity(num_nodes);

    for _ in 0..num_nodes {
        let mut next: Option<Vertex> = None;
        for v in 0..num_nodes as Vertex {
            if settled.contains(v as usize) || labels.dist[v] == W::max_value() {
                continue;
            }
            match next {
                Some(best) if labels.dist[best] <= labels.dist[v] => {}
                _ => next = Some(v),
            }
        }
        let Some(from) = next else {
            // everything reachable is settled
            break;
        };
        settled.insert(from as usize);
        for arc in adjacency[from].iter() {
            labels.relax(from, arc);
        }
    }
    labels
}
