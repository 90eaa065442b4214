//=========================================================================
// Vertex Data
//=========================================================================
//
// Position/color/uv vertices and the shape builders the game draws with.
// All builders append triangle lists (3 vertices per triangle).
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::math::Aabb2;

//=== Rgba8 ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0, 255);
    pub const GREEN: Self = Self::new(0, 255, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== Vertex ==============================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec2,
    pub color: Rgba8,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec2, color: Rgba8, uv: Vec2) -> Self {
        Self { position, color, uv }
    }
}

//=== Shape Builders ======================================================

/// Number of wedges used by [`add_verts_for_disc2d`].
pub const DISC_SIDES: usize = 32;

/// Two triangles covering `bounds`, mapped to `uvs`.
pub fn add_verts_for_aabb2d(verts: &mut Vec<Vertex>, bounds: Aabb2, color: Rgba8, uvs: Aabb2) {
    let (mins, maxs) = (bounds.mins, bounds.maxs);
    let bl = Vertex::new(mins, color, uvs.mins);
    let br = Vertex::new(Vec2::new(maxs.x, mins.y), color, Vec2::new(uvs.maxs.x, uvs.mins.y));
    let tr = Vertex::new(maxs, color, uvs.maxs);
    let tl = Vertex::new(Vec2::new(mins.x, maxs.y), color, Vec2::new(uvs.mins.x, uvs.maxs.y));

    verts.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
}

/// Filled disc as a fan of [`DISC_SIDES`] wedges.
pub fn add_verts_for_disc2d(verts: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Rgba8) {
    let step = std::f32::consts::TAU / DISC_SIDES as f32;
    verts.reserve(DISC_SIDES * 3);

    for side in 0..DISC_SIDES {
        let start = center + Vec2::from_angle(step * side as f32) * radius;
        let end = center + Vec2::from_angle(step * (side + 1) as f32) * radius;
        verts.push(Vertex::new(center, color, Vec2::ZERO));
        verts.push(Vertex::new(start, color, Vec2::ZERO));
        verts.push(Vertex::new(end, color, Vec2::ZERO));
    }
}

/// Line from `start` to `end` as a quad `thickness` wide.
///
/// Degenerate segments (start == end) add nothing.
pub fn add_verts_for_line_segment2d(
    verts: &mut Vec<Vertex>,
    start: Vec2,
    end: Vec2,
    thickness: f32,
    color: Rgba8,
) {
    let direction = end - start;
    if direction.length() <= f32::EPSILON {
        return;
    }

    let half = thickness * 0.5;
    let forward = direction.normalize_or_zero() * half;
    let left = forward.perp();

    let sl = start - forward + left;
    let sr = start - forward - left;
    let el = end + forward + left;
    let er = end + forward - left;

    for position in [sr, er, el, sr, el, sl] {
        verts.push(Vertex::new(position, color, Vec2::ZERO));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_is_two_triangles_spanning_bounds() {
        let mut verts = Vec::new();
        let bounds = Aabb2::new(Vec2::new(0.0, 0.0), Vec2::new(1600.0, 800.0));

        add_verts_for_aabb2d(&mut verts, bounds, Rgba8::WHITE, Aabb2::ZERO_TO_ONE);

        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].position, bounds.mins);
        assert_eq!(verts[2].position, bounds.maxs);
        assert_eq!(verts[2].uv, Vec2::ONE);
    }

    #[test]
    fn disc_vertices_lie_on_radius() {
        let mut verts = Vec::new();
        let center = Vec2::new(800.0, 400.0);

        add_verts_for_disc2d(&mut verts, center, 300.0, Rgba8::YELLOW);

        assert_eq!(verts.len(), DISC_SIDES * 3);
        for wedge in verts.chunks(3) {
            assert_eq!(wedge[0].position, center);
            assert!(((wedge[1].position - center).length() - 300.0).abs() < 0.01);
        }
    }

    #[test]
    fn line_segment_has_requested_thickness() {
        let mut verts = Vec::new();

        add_verts_for_line_segment2d(
            &mut verts,
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            2.0,
            Rgba8::GREEN,
        );

        assert_eq!(verts.len(), 6);
        let ys: Vec<f32> = verts.iter().map(|v| v.position.y).collect();
        let max = ys.iter().cloned().fold(f32::MIN, f32::max);
        let min = ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((max - min - 2.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_line_adds_nothing() {
        let mut verts = Vec::new();
        let p = Vec2::new(5.0, 5.0);
        add_verts_for_line_segment2d(&mut verts, p, p, 3.0, Rgba8::GREEN);
        assert!(verts.is_empty());
    }
}
