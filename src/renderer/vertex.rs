//! Vertex types for 2D petal rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::PetalColor;

/// Floats per vertex in the interleaved buffer: x, y, r, g, b, a
pub const FLOATS_PER_VERTEX: usize = 6;

/// 2D vertex in viewport pixels with straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Petal tints
pub mod colors {
    use super::PetalColor;

    pub const SAKURA: [f32; 4] = [1.0, 0.75, 0.82, 1.0];
    pub const BLOSSOM: [f32; 4] = [1.0, 0.88, 0.92, 1.0];
    pub const PLUM: [f32; 4] = [0.78, 0.36, 0.58, 1.0];
    pub const LEAF: [f32; 4] = [0.55, 0.8, 0.45, 1.0];
    pub const MAPLE: [f32; 4] = [0.9, 0.3, 0.15, 1.0];
    pub const AMBER: [f32; 4] = [0.95, 0.65, 0.2, 1.0];
    pub const FROST: [f32; 4] = [0.8, 0.9, 1.0, 1.0];
    pub const GOLD: [f32; 4] = [1.0, 0.84, 0.25, 1.0];
    pub const IRIS: [f32; 4] = [0.62, 0.45, 0.95, 1.0];

    pub fn for_petal(color: PetalColor) -> [f32; 4] {
        match color {
            PetalColor::Sakura => SAKURA,
            PetalColor::Blossom => BLOSSOM,
            PetalColor::Plum => PLUM,
            PetalColor::Leaf => LEAF,
            PetalColor::Maple => MAPLE,
            PetalColor::Amber => AMBER,
            PetalColor::Frost => FROST,
            PetalColor::Gold => GOLD,
            PetalColor::Iris => IRIS,
        }
    }
}
