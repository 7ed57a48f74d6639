//! Shape generation for petals

use std::f32::consts::TAU;

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::consts::PETAL_RADIUS;
use crate::sim::Petal;

/// Triangles in one petal ellipse
pub const PETAL_SEGMENTS: usize = 8;
/// Petals are drawn as ellipses this much longer than wide
const PETAL_ASPECT: f32 = 0.6;
/// Halo radius multiplier for rare petals
const GLOW_SCALE: f32 = 1.6;
const GLOW_ALPHA: f32 = 0.35;

/// Draw scale: petals shrink to half size over the collection flight
pub fn draw_scale(petal: &Petal) -> f32 {
    let progress = petal.collection_progress().unwrap_or(0.0);
    petal.scale * (1.0 - 0.5 * progress)
}

/// Triangle fan (as a list) for a rotated ellipse
fn ellipse(center: Vec2, radius: Vec2, rotation: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let rot = Vec2::from_angle(rotation);
    let point = |i: usize| {
        let theta = i as f32 / PETAL_SEGMENTS as f32 * TAU;
        let local = Vec2::new(theta.cos() * radius.x, theta.sin() * radius.y);
        center + rot.rotate(local)
    };
    for i in 0..PETAL_SEGMENTS {
        let a = point(i);
        let b = point(i + 1);
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

/// Append the vertices for one petal (plus halo if rare)
pub fn petal_vertices(petal: &Petal, out: &mut Vec<Vertex>) {
    let r = PETAL_RADIUS * draw_scale(petal);
    let radius = Vec2::new(r, r * PETAL_ASPECT);

    if petal.is_rare() {
        let mut glow = colors::for_petal(petal.color);
        glow[3] = GLOW_ALPHA * petal.opacity;
        ellipse(petal.pos, radius * GLOW_SCALE, petal.rotation, glow, out);
    }

    let mut color = colors::for_petal(petal.color);
    color[3] *= petal.opacity;
    ellipse(petal.pos, radius, petal.rotation, color, out);
}

/// Vertex count for one petal
pub fn vertices_per_petal(petal: &Petal) -> usize {
    let fans = if petal.is_rare() { 2 } else { 1 };
    fans * PETAL_SEGMENTS * 3
}
