use std::ops::{Index, IndexMut};

use crate::Vertex;

/// Wrapper around Vec<T> indexed by [`Vertex`] for readability
#[derive(Clone, Debug)]
pub struct VertexVec<T> {
    data: Vec<T>,
}

impl<T: Clone> VertexVec<T> {
    pub fn with_default(size: usize, default: T) -> Self {
        Self {
            data: vec![default; size],
        }
    }
}

impl<T> VertexVec<T> {
    pub fn push(&mut self, value: T) -> Vertex {
        self.data.push(value);
        (self.data.len() - 1) as Vertex
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for VertexVec<T> {
    fn default() -> Self {
        Self { data: vec![] }
    }
}

impl<T> Index<Vertex> for VertexVec<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Vertex) -> &Self::Output {
        &self.data[index as usize]
    }
}

impl<T> IndexMut<Vertex> for VertexVec<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Vertex) -> &mut Self::Output {
        &mut self.data[index as usize]
    }
}

macro_rules! vertex_vec {
    [$default:expr; $size:expr] => {
        $crate::utils::VertexVec::with_default($size as usize, $default)
    };
}
