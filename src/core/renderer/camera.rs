//=========================================================================
// Camera
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::math::Aabb2;

//=== Camera ==============================================================

/// Orthographic 2D camera.
///
/// `bounds` is the world-space rectangle the camera sees; `viewport` is the
/// normalized (0..1) part of the render target it draws into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    bounds: Aabb2,
    viewport: Aabb2,
}

impl Camera {
    pub fn orthographic(bottom_left: Vec2, top_right: Vec2) -> Self {
        Self {
            bounds: Aabb2::new(bottom_left, top_right),
            viewport: Aabb2::ZERO_TO_ONE,
        }
    }

    /// Restricts drawing to part of the target.
    ///
    /// # Panics
    ///
    /// Panics if `viewport` is inverted or reaches outside `0..=1`.
    pub fn with_viewport(mut self, viewport: Aabb2) -> Self {
        assert!(
            viewport.mins.x >= 0.0
                && viewport.mins.y >= 0.0
                && viewport.maxs.x <= 1.0
                && viewport.maxs.y <= 1.0
                && viewport.mins.x < viewport.maxs.x
                && viewport.mins.y < viewport.maxs.y,
            "Viewport must be a non-empty rectangle within 0..1, got {:?}",
            viewport
        );
        self.viewport = viewport;
        self
    }

    pub fn set_ortho_view(&mut self, bottom_left: Vec2, top_right: Vec2) {
        self.bounds = Aabb2::new(bottom_left, top_right);
    }

    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    pub fn viewport(&self) -> Aabb2 {
        self.viewport
    }

    /// Maps a world point to normalized 0..1 camera coordinates.
    pub fn world_to_normalized(&self, point: Vec2) -> Vec2 {
        let size = self.bounds.dimensions();
        Vec2::new(
            (point.x - self.bounds.mins.x) / size.x,
            (point.y - self.bounds.mins.y) / size.y,
        )
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_to_normalized_maps_corners() {
        let camera = Camera::orthographic(Vec2::ZERO, Vec2::new(1600.0, 800.0));

        assert_eq!(camera.world_to_normalized(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(camera.world_to_normalized(Vec2::new(800.0, 400.0)), Vec2::new(0.5, 0.5));
        assert_eq!(camera.viewport(), Aabb2::ZERO_TO_ONE);
    }

    #[test]
    #[should_panic(expected = "Viewport must be")]
    fn with_viewport_rejects_out_of_range() {
        let _ = Camera::orthographic(Vec2::ZERO, Vec2::ONE)
            .with_viewport(Aabb2::new(Vec2::ZERO, Vec2::new(2.0, 1.0)));
    }
}
