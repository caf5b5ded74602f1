//! Weighted, undirected city graph with Dijkstra shortest paths.
//!
//! Cities are addressed by name; internally every city gets a dense
//! [`Vertex`] id in insertion order. Queries against unknown or disconnected
//! cities never fail, they answer [`ShortestPath::Unreachable`].

use std::fmt::Debug;

use ahash::AHashMap;
use num_traits::{Bounded, SaturatingAdd, Zero};
use thiserror::Error;

#[macro_use]
mod utils;
mod dijkstra;

#[cfg(test)]
mod tests;

pub use dijkstra::QueueKind;
use utils::VertexVec;

pub type Vertex = u32;

/// Edge and path weight. `max_value()` stands for "no path" and is never a
/// valid edge weight.
// trait aliases are experimental (rust-lang/rfcs#1733)
pub trait Weight: Zero + Bounded + SaturatingAdd + Copy + Ord + Debug {}

impl<W> Weight for W where W: Zero + Bounded + SaturatingAdd + Copy + Ord + Debug {}

#[derive(Clone, Debug)]
pub struct Arc<W> {
    pub to: Vertex,
    pub w: W,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge {from} - {to} has a negative weight")]
    NegativeWeight { from: String, to: String },
    #[error("edge {from} - {to} has an infinite weight")]
    InfiniteWeight { from: String, to: String },
}

/// Result of a single origin/destination query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortestPath<W> {
    Found {
        /// cities from origin to destination, both inclusive
        path: Vec<String>,
        weight: W,
        /// cumulative weight at each city of `path`
        arrivals: Vec<W>,
    },
    Unreachable,
}

impl<W: Weight> ShortestPath<W> {
    /// Total weight, `W::max_value()` when there is no path.
    pub fn weight(&self) -> W {
        match self {
            Self::Found { weight, .. } => *weight,
            Self::Unreachable => W::max_value(),
        }
    }

    pub fn path(&self) -> Option<&[String]> {
        match self {
            Self::Found { path, .. } => Some(path),
            Self::Unreachable => None,
        }
    }

    pub fn arrivals(&self) -> Option<&[W]> {
        match self {
            Self::Found { arrivals, .. } => Some(arrivals),
            Self::Unreachable => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// The contract every graph backing has to fulfil.
pub trait ShortestPathProvider<W: Weight> {
    /// Inserts or overwrites the bidirectional edge `a - b`.
    fn add_edge(&mut self, a: &str, b: &str, w: W) -> Result<(), GraphError>;

    fn shortest_path(&self, origin: &str, destination: &str) -> ShortestPath<W>;
}

/// Adjacency-list graph.
#[derive(Clone, Debug)]
pub struct CityGraph<W> {
    names: VertexVec<String>,
    index: AHashMap<String, Vertex>,
    adjacency: VertexVec<Vec<Arc<W>>>,
    num_edges: usize,
    queue: QueueKind,
}

impl<W: Weight> Default for CityGraph<W> {
    fn default() -> Self {
        Self::with_queue(QueueKind::BinaryHeap)
    }
}

impl<W: Weight> CityGraph<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queue(queue: QueueKind) -> Self {
        Self {
            names: VertexVec::default(),
            index: AHashMap::new(),
            adjacency: VertexVec::default(),
            num_edges: 0,
            queue,
        }
    }

    pub fn queue(&self) -> QueueKind {
        self.queue
    }

    pub fn set_queue(&mut self, queue: QueueKind) {
        self.queue = queue;
    }

    pub fn num_cities(&self) -> usize {
        self.names.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn contains(&self, city: &str) -> bool {
        self.index.contains_key(city)
    }

    /// Cities in insertion order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Neighbours of `city` with the connecting edge weight, empty for
    /// unknown cities.
    pub fn neighbours(&self, city: &str) -> Vec<(&str, W)> {
        match self.index.get(city) {
            Some(&v) => self.adjacency[v]
                .iter()
                .map(|arc| (self.names[arc.to].as_str(), arc.w))
                .collect(),
            None => vec![],
        }
    }

    /// Weight of the direct edge `a - b`, if any.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<W> {
        let from = *self.index.get(a)?;
        let to = *self.index.get(b)?;
        self.adjacency[from]
            .iter()
            .find(|arc| arc.to == to)
            .map(|arc| arc.w)
    }

    fn vertex_or_insert(&mut self, city: &str) -> Vertex {
        if let Some(&v) = self.index.get(city) {
            return v;
        }
        let v = self.names.push(city.to_string());
        self.adjacency.push(vec![]);
        self.index.insert(city.to_string(), v);
        v
    }

    fn upsert_arc(&mut self, from: Vertex, to: Vertex, w: W) -> bool {
        match self.adjacency[from].iter_mut().find(|arc| arc.to == to) {
            Some(arc) => {
                arc.w = w;
                false
            }
            None => {
                self.adjacency[from].push(Arc { to, w });
                true
            }
        }
    }
}

impl<W: Weight> ShortestPathProvider<W> for CityGraph<W> {
    fn add_edge(&mut self, a: &str, b: &str, w: W) -> Result<(), GraphError> {
        if w < W::zero() {
            return Err(GraphError::NegativeWeight {
                from: a.to_string(),
                to: b.to_string(),
            });
        }
        if w == W::max_value() {
            return Err(GraphError::InfiniteWeight {
                from: a.to_string(),
                to: b.to_string(),
            });
        }
        let from = self.vertex_or_insert(a);
        let to = self.vertex_or_insert(b);
        if from == to {
            return Ok(());
        }
        // last write wins, in both directions
        let inserted = self.upsert_arc(from, to, w);
        self.upsert_arc(to, from, w);
        if inserted {
            self.num_edges += 1;
        }
        Ok(())
    }

    fn shortest_path(&self, origin: &str, destination: &str) -> ShortestPath<W> {
        let (Some(&source), Some(&target)) = (self.index.get(origin), self.index.get(destination))
        else {
            return ShortestPath::Unreachable;
        };
        if source == target {
            return ShortestPath::Found {
                path: vec![origin.to_string()],
                weight: W::zero(),
                arrivals: vec![W::zero()],
            };
        }

        let labels = match self.queue {
            QueueKind::BinaryHeap => dijkstra::with_binary_heap(&self.adjacency, source),
            QueueKind::LinearScan => dijkstra::with_linear_scan(&self.adjacency, source),
        };

        match labels.reconstruct(source, target) {
            Some(vertices) => {
                let arrivals = vertices.iter().map(|&v| labels.distance(v)).collect();
                ShortestPath::Found {
                    path: vertices
                        .into_iter()
                        .map(|v| self.names[v].clone())
                        .collect(),
                    weight: labels.distance(target),
                    arrivals,
                }
            }
            None => ShortestPath::Unreachable,
        }
    }
}
