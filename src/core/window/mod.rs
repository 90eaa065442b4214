//=========================================================================
// Windows
//=========================================================================
//
// Per-window state owned by the app.
//
// A `Window` couples a platform handle with the renderer-facing state
// (swap chain presence, pending resize, pending present) and the drift
// motion that moves it across the desktop.
//
// Flag lifecycle per frame:
//   WindowResized event   → needs_resize = true
//   reconcile_resizes()   → ok: needs_resize = false, needs_update = true
//   drift / manual offset → position changed: needs_update = true
//   present()             → ok: needs_update = false
//
//=========================================================================

//=== Module Declarations =================================================

mod collection;

//=== Public API ==========================================================

pub use collection::WindowCollection;

//=== External Dependencies ===============================================

use std::fmt;

use glam::{IVec2, Vec2};

//=== Internal Dependencies ===============================================

use crate::core::math::Aabb2;
use crate::core::renderer::WindowSurface;

//=== WindowHandle ========================================================

/// Opaque, process-unique window identifier assigned by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== DisplayContext ======================================================

/// Drawing context of one window.
///
/// Not `Clone`: the only way to give it back is
/// [`Platform::release_display_context`](crate::core::platform_bridge::Platform::release_display_context),
/// which consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct DisplayContext {
    handle: WindowHandle,
    token: u64,
}

impl DisplayContext {
    /// Platforms mint contexts; `token` is whatever they need to recognise it.
    pub fn new(handle: WindowHandle, token: u64) -> Self {
        Self { handle, token }
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

//=== Window ==============================================================

#[derive(Debug)]
pub struct Window {
    handle: WindowHandle,
    title: String,
    display_context: Option<DisplayContext>,
    client_dimensions: IVec2,

    //--- Motion -----------------------------------------------------------
    origin: Vec2,
    drift_velocity: Vec2,
    drift_offset: Vec2,
    position: Vec2,

    //--- Render Sync ------------------------------------------------------
    has_swap_chain: bool,
    needs_resize: bool,
    needs_update: bool,
    position_dirty: bool,
    resize_failures: u32,
}

impl Window {
    pub(crate) fn new(
        handle: WindowHandle,
        title: String,
        origin: Vec2,
        client_dimensions: IVec2,
        drift_velocity: Vec2,
    ) -> Self {
        Self {
            handle,
            title,
            display_context: None,
            client_dimensions,
            origin,
            drift_velocity,
            drift_offset: Vec2::ZERO,
            position: origin,
            has_swap_chain: false,
            needs_resize: false,
            needs_update: true,
            position_dirty: false,
            resize_failures: 0,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn client_dimensions(&self) -> IVec2 {
        self.client_dimensions
    }

    /// Where the window starts before any offset.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Current on-screen position of the window (desktop pixels).
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn drift_velocity(&self) -> Vec2 {
        self.drift_velocity
    }

    /// Unfolded distance drifted so far.
    pub fn drift_offset(&self) -> Vec2 {
        self.drift_offset
    }

    pub fn has_display_context(&self) -> bool {
        self.display_context.is_some()
    }

    pub fn has_swap_chain(&self) -> bool {
        self.has_swap_chain
    }

    pub fn needs_resize(&self) -> bool {
        self.needs_resize
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// The part of the shared screen image this window shows.
    pub fn viewport(&self) -> Aabb2 {
        Aabb2::new(self.position, self.position + self.client_dimensions.as_vec2())
    }

    pub fn surface(&self) -> WindowSurface {
        WindowSurface {
            handle: self.handle,
            client_dimensions: self.client_dimensions,
        }
    }

    //--- Crate-Internal Mutation ------------------------------------------

    pub(crate) fn set_display_context(&mut self, context: DisplayContext) {
        self.display_context = Some(context);
    }

    pub(crate) fn take_display_context(&mut self) -> Option<DisplayContext> {
        self.display_context.take()
    }

    pub(crate) fn set_has_swap_chain(&mut self, has_swap_chain: bool) {
        self.has_swap_chain = has_swap_chain;
    }

    /// Recomputes the on-screen position; flags the window if it moved.
    fn place(&mut self, manual_offset: Vec2, drift_range: f32) {
        let folded = Vec2::new(
            crate::core::math::ping_pong(self.drift_offset.x, drift_range),
            crate::core::math::ping_pong(self.drift_offset.y, drift_range),
        );
        let position = self.origin + manual_offset + folded;

        if position != self.position {
            self.position = position;
            self.needs_update = true;
            self.position_dirty = true;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
