//=========================================================================
// Math Primitives
//=========================================================================
//
// Box and folding helpers on top of `glam` vectors, shared by windows,
// cameras and vertex helpers.
//
// Screen space is y-up with (0,0) at the bottom-left for cameras and
// vertex data; window positions use the platform's desktop convention
// (pixels, top-left origin).
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{IVec2, Vec2};

//=== Aabb2 ===============================================================

/// Axis-aligned 2D box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb2 {
    pub mins: Vec2,
    pub maxs: Vec2,
}

impl Aabb2 {
    pub const ZERO_TO_ONE: Self = Self {
        mins: Vec2::ZERO,
        maxs: Vec2::ONE,
    };

    pub const fn new(mins: Vec2, maxs: Vec2) -> Self {
        Self { mins, maxs }
    }

    pub fn dimensions(&self) -> Vec2 {
        self.maxs - self.mins
    }

    pub fn center(&self) -> Vec2 {
        (self.mins + self.maxs) * 0.5
    }
}

//=== Helpers =============================================================

/// True when either component is zero or negative (e.g. minimized window).
pub fn is_degenerate(dimensions: IVec2) -> bool {
    dimensions.x <= 0 || dimensions.y <= 0
}

/// Folds `value` into `[0, range]`, bouncing back and forth as it grows.
///
/// A non-positive `range` disables folding and returns `value` unchanged.
pub fn ping_pong(value: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return value;
    }
    let period = 2.0 * range;
    let folded = value.rem_euclid(period);
    if folded <= range {
        folded
    } else {
        period - folded
    }
}

/// Reduces `value` to one `ping_pong` period, keeping `ping_pong(value, range)`
/// unchanged. A non-positive `range` returns `value` as is.
pub fn wrap_ping_pong_period(value: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return value;
    }
    value.rem_euclid(2.0 * range)
}

//=========================================================================
// Unit Tests
//=========================================================================
