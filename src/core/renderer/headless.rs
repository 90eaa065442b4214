//=========================================================================
// Headless Renderer
//=========================================================================
//
// `Renderer` that keeps the full bookkeeping of a real backend (swap chains
// per window, camera scoping, bound state, resource caches, frame stats)
// without touching a GPU. Draw submissions are validated and counted.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use glam::IVec2;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{
    Camera, FontId, ModelConstants, RenderState, Renderer, Rgba8, ShaderId, TextureId, Vertex,
    WindowSurface,
};
use crate::core::error::RenderError;
use crate::core::math::{is_degenerate, Aabb2};
use crate::core::window::WindowHandle;

//=== FrameStats ==========================================================

/// Work submitted during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub clears: u32,
    pub draw_calls: u32,
    pub vertices: usize,
    pub swap_chain_resizes: u32,
    /// Windows presented this frame, in order, with the viewport each received.
    pub presented: Vec<(WindowHandle, Aabb2)>,
}

//=== PathCache ===========================================================

/// Path → id cache shared by the three resource kinds.
#[derive(Default)]
struct PathCache {
    paths: Vec<String>,
    ids: HashMap<String, u32>,
}

impl PathCache {
    fn create_or_get(&mut self, kind: &str, path: &str) -> Result<u32, RenderError> {
        if path.is_empty() {
            return Err(RenderError::ResourceLoad {
                path: String::new(),
                reason: format!("empty {} path", kind),
            });
        }
        if let Some(&id) = self.ids.get(path) {
            return Ok(id);
        }

        let id = self.paths.len() as u32;
        self.paths.push(path.to_string());
        self.ids.insert(path.to_string(), id);
        debug!(target: "renderer", "Loaded {} '{}'", kind, path);
        Ok(id)
    }

    fn len(&self) -> usize {
        self.paths.len()
    }

    fn clear(&mut self) {
        self.paths.clear();
        self.ids.clear();
    }
}

//=== HeadlessRenderer ====================================================

#[derive(Default)]
pub struct HeadlessRenderer {
    started: bool,
    swap_chains: HashMap<WindowHandle, IVec2>,

    //--- Bound State ------------------------------------------------------
    active_camera: Option<Camera>,
    render_state: RenderState,
    model_constants: ModelConstants,
    bound_texture: Option<TextureId>,
    bound_shader: Option<ShaderId>,
    clear_color: Option<Rgba8>,

    //--- Resources --------------------------------------------------------
    textures: PathCache,
    shaders: PathCache,
    fonts: PathCache,

    //--- Stats ------------------------------------------------------------
    frame: FrameStats,
    last_frame: FrameStats,
    frames_completed: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Inspection -------------------------------------------------------

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn swap_chain_dimensions(&self, handle: WindowHandle) -> Option<IVec2> {
        self.swap_chains.get(&handle).copied()
    }

    pub fn swap_chain_count(&self) -> usize {
        self.swap_chains.len()
    }

    /// Stats of the frame in progress.
    pub fn current_frame(&self) -> &FrameStats {
        &self.frame
    }

    /// Stats of the most recently completed frame.
    pub fn last_frame(&self) -> &FrameStats {
        &self.last_frame
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    pub fn bound_texture(&self) -> Option<TextureId> {
        self.bound_texture
    }

    pub fn model_constants(&self) -> ModelConstants {
        self.model_constants
    }

    pub fn last_clear_color(&self) -> Option<Rgba8> {
        self.clear_color
    }

    fn require_started(&self) -> Result<(), RenderError> {
        if self.started {
            Ok(())
        } else {
            Err(RenderError::NotStarted)
        }
    }
}

impl Renderer for HeadlessRenderer {
    //--- Lifecycle --------------------------------------------------------

    fn startup(&mut self) -> Result<(), RenderError> {
        self.started = true;
        info!(target: "renderer", "Headless renderer started");
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        if !self.swap_chains.is_empty() {
            warn!(
                target: "renderer",
                "Renderer shut down with {} live swap chains",
                self.swap_chains.len()
            );
        }
        self.swap_chains.clear();
        self.textures.clear();
        self.shaders.clear();
        self.fonts.clear();
        self.active_camera = None;
        self.started = false;
        info!(target: "renderer", "Headless renderer shut down after {} frames", self.frames_completed);
    }

    fn begin_frame(&mut self) {
        self.frame = FrameStats::default();
    }

    fn end_frame(&mut self) {
        if self.active_camera.is_some() {
            warn!(target: "renderer", "Frame ended inside begin_camera/end_camera");
            self.active_camera = None;
        }
        self.last_frame = std::mem::take(&mut self.frame);
        self.frames_completed += 1;
    }

    //--- Window Swap Chains -----------------------------------------------

    fn create_window_swap_chain(&mut self, surface: &WindowSurface) -> Result<(), RenderError> {
        self.require_started()?;
        let dims = surface.client_dimensions;
        if is_degenerate(dims) {
            return Err(RenderError::InvalidDimensions {
                handle: surface.handle,
                width: dims.x,
                height: dims.y,
            });
        }

        if self.swap_chains.insert(surface.handle, dims).is_some() {
            debug!(target: "renderer", "Replaced swap chain for window {}", surface.handle);
        }
        Ok(())
    }

    fn resize_window_swap_chain(&mut self, surface: &WindowSurface) -> Result<(), RenderError> {
        self.require_started()?;
        let dims = surface.client_dimensions;
        let Some(current) = self.swap_chains.get_mut(&surface.handle) else {
            return Err(RenderError::SwapChainMissing(surface.handle));
        };
        if is_degenerate(dims) {
            return Err(RenderError::InvalidDimensions {
                handle: surface.handle,
                width: dims.x,
                height: dims.y,
            });
        }

        *current = dims;
        self.frame.swap_chain_resizes += 1;
        Ok(())
    }

    fn destroy_window_swap_chain(&mut self, handle: WindowHandle) {
        self.swap_chains.remove(&handle);
    }

    fn render_viewport_to_window(
        &mut self,
        handle: WindowHandle,
        viewport: Aabb2,
    ) -> Result<(), RenderError> {
        self.require_started()?;
        if !self.swap_chains.contains_key(&handle) {
            return Err(RenderError::SwapChainMissing(handle));
        }
        self.frame.presented.push((handle, viewport));
        Ok(())
    }

    //--- Drawing ----------------------------------------------------------

    fn begin_camera(&mut self, camera: &Camera) {
        if self.active_camera.is_some() {
            warn!(target: "renderer", "begin_camera called while another camera is active");
        }
        self.active_camera = Some(*camera);
    }

    fn end_camera(&mut self, camera: &Camera) {
        match self.active_camera.take() {
            Some(active) if active == *camera => {}
            Some(_) => warn!(target: "renderer", "end_camera called with a different camera"),
            None => warn!(target: "renderer", "end_camera called without begin_camera"),
        }
    }

    fn clear_screen(&mut self, color: Rgba8) {
        self.clear_color = Some(color);
        self.frame.clears += 1;
    }

    fn set_render_state(&mut self, state: RenderState) {
        self.render_state = state;
    }

    fn set_model_constants(&mut self, constants: ModelConstants) {
        self.model_constants = constants;
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.bound_texture = texture;
    }

    fn bind_shader(&mut self, shader: Option<ShaderId>) {
        self.bound_shader = shader;
    }

    fn draw_vertex_array(&mut self, verts: &[Vertex]) {
        if self.active_camera.is_none() {
            warn!(target: "renderer", "Dropped draw of {} vertices outside a camera", verts.len());
            return;
        }
        if verts.is_empty() {
            return;
        }
        if verts.len() % 3 != 0 {
            warn!(target: "renderer", "Vertex count {} is not a triangle list", verts.len());
        }
        self.frame.draw_calls += 1;
        self.frame.vertices += verts.len();
    }

    //--- Resources --------------------------------------------------------

    fn create_or_get_texture_from_file(&mut self, path: &str) -> Result<TextureId, RenderError> {
        self.require_started()?;
        self.textures.create_or_get("texture", path).map(TextureId)
    }

    fn create_or_get_shader_from_file(&mut self, path: &str) -> Result<ShaderId, RenderError> {
        self.require_started()?;
        self.shaders.create_or_get("shader", path).map(ShaderId)
    }

    fn create_or_get_bitmap_font_from_file(&mut self, path: &str) -> Result<FontId, RenderError> {
        self.require_started()?;
        self.fonts.create_or_get("font", path).map(FontId)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
