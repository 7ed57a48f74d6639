//! Render step
//!
//! Runs after the tick, reading the field's petals; never mutates them.
//! `VertexBatch` produces a CPU-side triangle list; the host uploads it as
//! interleaved floats (`FLOATS_PER_VERTEX` per vertex).

pub mod shapes;
pub mod vertex;

pub use vertex::{FLOATS_PER_VERTEX, Vertex};

use crate::sim::Petal;

/// A swappable render target for the petal field
pub trait PetalRenderer {
    fn render(&mut self, petals: &[Petal]);
}

/// Triangle list for the current frame, rebuilt on each render
#[derive(Debug, Default, Clone)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw bytes for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Flattened floats (x, y, r, g, b, a per vertex)
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl PetalRenderer for VertexBatch {
    fn render(&mut self, petals: &[Petal]) {
        self.vertices.clear();
        let needed: usize = petals.iter().map(shapes::vertices_per_petal).sum();
        self.vertices.reserve(needed);
        // Spawn order: later petals draw on top, matching hit-test priority
        for petal in petals {
            shapes::petal_vertices(petal, &mut self.vertices);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PetalColor, PetalId, PetalSpec};
    use glam::Vec2;

    #[test]
    fn test_batch_rebuilds_each_frame() {
        let sakura = PetalSpec::common(PetalColor::Sakura, 1);
        let petals = vec![
            Petal::at(PetalId(1), Vec2::new(10.0, 10.0), sakura),
            Petal::at(PetalId(2), Vec2::new(50.0, 10.0), PetalSpec::rare(5)),
        ];
        let mut batch = VertexBatch::new();
        batch.render(&petals);
        let expected = shapes::PETAL_SEGMENTS * 3 * 3;
        assert_eq!(batch.len(), expected);
        assert_eq!(batch.as_floats().len(), expected * FLOATS_PER_VERTEX);
        assert_eq!(batch.as_bytes().len(), expected * 24);

        batch.render(&petals[..1]);
        assert_eq!(batch.len(), shapes::PETAL_SEGMENTS * 3);

        batch.render(&[]);
        assert!(batch.is_empty());
    }
}
