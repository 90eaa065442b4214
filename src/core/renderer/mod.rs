//=========================================================================
// Renderer
//=========================================================================
//
// Renderer collaborator contract.
//
// Architecture:
//   App ──► Renderer (trait)
//             ├─ per-window swap chains (create / resize / present / destroy)
//             ├─ camera-scoped immediate drawing (state, bindings, vertex arrays)
//             └─ path-keyed resource caches (textures, shaders, fonts)
//
// Frame contract:
//   begin_frame() → [begin_camera() → draws → end_camera()]*
//                 → resize_window_swap_chain()* → render_viewport_to_window()*
//                 → end_frame()
//
//=========================================================================

//=== Module Declarations =================================================

mod camera;
pub mod debug_draw;
mod headless;
mod vertex;

//=== Public API ==========================================================

pub use camera::Camera;
pub use debug_draw::DebugRenderSystem;
pub use headless::{FrameStats, HeadlessRenderer};
pub use vertex::{
    add_verts_for_aabb2d, add_verts_for_disc2d, add_verts_for_line_segment2d, Rgba8, Vertex,
    DISC_SIDES,
};

//=== External Dependencies ===============================================

use glam::{IVec2, Vec2};

//=== Internal Dependencies ===============================================

use crate::core::error::RenderError;
use crate::core::math::Aabb2;
use crate::core::window::WindowHandle;

//=== Resource Identifiers ================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub(crate) u32);

//=== Render State ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    #[default]
    Alpha,
    Additive,
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RasterizerMode {
    #[default]
    SolidCullNone,
    SolidCullBack,
    Wireframe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerMode {
    #[default]
    PointClamp,
    BilinearClamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthMode {
    #[default]
    Disabled,
    ReadWriteLessEqual,
}

/// Pipeline state applied to subsequent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderState {
    pub blend: BlendMode,
    pub rasterizer: RasterizerMode,
    pub sampler: SamplerMode,
    pub depth: DepthMode,
}

/// Per-draw model transform and tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConstants {
    pub translation: Vec2,
    pub scale: f32,
    pub tint: Rgba8,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: 1.0,
            tint: Rgba8::WHITE,
        }
    }
}

//=== WindowSurface =======================================================

/// What the renderer needs to know about a window's drawable area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSurface {
    pub handle: WindowHandle,
    pub client_dimensions: IVec2,
}

//=== Renderer ============================================================

pub trait Renderer {
    //--- Lifecycle --------------------------------------------------------

    fn startup(&mut self) -> Result<(), RenderError>;
    fn shutdown(&mut self);
    fn begin_frame(&mut self);
    fn end_frame(&mut self);

    //--- Window Swap Chains -----------------------------------------------

    fn create_window_swap_chain(&mut self, surface: &WindowSurface) -> Result<(), RenderError>;

    /// Resizes an existing swap chain to `surface.client_dimensions`.
    ///
    /// On error the previous swap chain is left intact.
    fn resize_window_swap_chain(&mut self, surface: &WindowSurface) -> Result<(), RenderError>;

    /// Releases the swap chain. Unknown handles are ignored.
    fn destroy_window_swap_chain(&mut self, handle: WindowHandle);

    /// Copies `viewport` (screen space) of this frame's image to the window and presents it.
    fn render_viewport_to_window(
        &mut self,
        handle: WindowHandle,
        viewport: Aabb2,
    ) -> Result<(), RenderError>;

    //--- Drawing ----------------------------------------------------------

    fn begin_camera(&mut self, camera: &Camera);
    fn end_camera(&mut self, camera: &Camera);
    fn clear_screen(&mut self, color: Rgba8);
    fn set_render_state(&mut self, state: RenderState);
    fn set_model_constants(&mut self, constants: ModelConstants);
    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn bind_shader(&mut self, shader: Option<ShaderId>);
    fn draw_vertex_array(&mut self, verts: &[Vertex]);

    //--- Resources (cached per path) --------------------------------------

    fn create_or_get_texture_from_file(&mut self, path: &str) -> Result<TextureId, RenderError>;
    fn create_or_get_shader_from_file(&mut self, path: &str) -> Result<ShaderId, RenderError>;
    fn create_or_get_bitmap_font_from_file(&mut self, path: &str) -> Result<FontId, RenderError>;
}
