//=========================================================================
// Debug Render System
//=========================================================================
//
// Per-frame screen-space text overlay.
//
// Callers add text during Update/Render; `render_screen` draws the list
// through a camera; `end_frame` empties it. Text never survives a frame.
//
// Glyphs come from a 16×16 bitmap font sheet (`<font>.png`) indexed by
// byte value.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{
    add_verts_for_aabb2d, Camera, FontId, ModelConstants, RenderState, Renderer, Rgba8,
    TextureId, Vertex,
};
use crate::core::error::RenderError;
use crate::core::math::Aabb2;

//=== Constants ===========================================================

/// Default bitmap font used for debug text.
pub const DEBUG_FONT_PATH: &str = "Data/Fonts/SquirrelFixedFont";

const GLYPHS_PER_ROW: u32 = 16;

/// Glyph width relative to cell height.
const GLYPH_ASPECT: f32 = 0.7;

//=== ScreenText ==========================================================

/// One line (or block) of text queued for this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenText {
    pub text: String,
    /// Anchor point in screen space.
    pub position: Vec2,
    /// Cell height in screen units.
    pub height: f32,
    /// 0..1 per axis: which part of the text box sits on `position`.
    pub alignment: Vec2,
    pub color: Rgba8,
}

//=== DebugRenderSystem ===================================================

pub struct DebugRenderSystem {
    font_path: String,
    font: Option<(FontId, TextureId)>,
    screen_texts: Vec<ScreenText>,
    verts: Vec<Vertex>,
}

impl DebugRenderSystem {
    pub fn new() -> Self {
        Self::with_font(DEBUG_FONT_PATH)
    }

    pub fn with_font(font_path: impl Into<String>) -> Self {
        Self {
            font_path: font_path.into(),
            font: None,
            screen_texts: Vec::new(),
            verts: Vec::new(),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Loads the debug font through `renderer`.
    pub fn startup(&mut self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        let font = renderer.create_or_get_bitmap_font_from_file(&self.font_path)?;
        let sheet = renderer.create_or_get_texture_from_file(&format!("{}.png", self.font_path))?;
        self.font = Some((font, sheet));
        debug!(target: "renderer", "Debug render system started ({})", self.font_path);
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.font = None;
        self.screen_texts.clear();
    }

    pub fn begin_frame(&mut self) {}

    pub fn end_frame(&mut self) {
        self.screen_texts.clear();
    }

    //--- Submission -------------------------------------------------------

    pub fn add_screen_text(
        &mut self,
        text: impl Into<String>,
        position: Vec2,
        height: f32,
        alignment: Vec2,
        color: Rgba8,
    ) {
        self.screen_texts.push(ScreenText {
            text: text.into(),
            position,
            height,
            alignment,
            color,
        });
    }

    pub fn screen_texts(&self) -> &[ScreenText] {
        &self.screen_texts
    }

    //--- Rendering --------------------------------------------------------

    /// Draws every queued text through `camera`.
    pub fn render_screen(&mut self, renderer: &mut dyn Renderer, camera: &Camera) {
        if self.screen_texts.is_empty() {
            return;
        }
        let Some((_, sheet)) = self.font else {
            warn!(target: "renderer", "Debug text dropped: debug render system not started");
            return;
        };

        self.verts.clear();
        for entry in &self.screen_texts {
            add_verts_for_text(&mut self.verts, entry);
        }

        renderer.begin_camera(camera);
        renderer.set_render_state(RenderState::default());
        renderer.set_model_constants(ModelConstants::default());
        renderer.bind_shader(None);
        renderer.bind_texture(Some(sheet));
        renderer.draw_vertex_array(&self.verts);
        renderer.end_camera(camera);
    }
}

impl Default for DebugRenderSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=== Glyph Layout ========================================================

/// Appends one quad per non-newline character. Lines stack downward.
fn add_verts_for_text(verts: &mut Vec<Vertex>, entry: &ScreenText) {
    let cell = Vec2::new(entry.height * GLYPH_ASPECT, entry.height);
    let lines: Vec<&str> = entry.text.split('\n').collect();
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let block = Vec2::new(cell.x * widest as f32, cell.y * lines.len() as f32);
    let top_left = Vec2::new(
        entry.position.x - block.x * entry.alignment.x,
        entry.position.y + block.y * (1.0 - entry.alignment.y),
    );

    for (row, line) in lines.iter().enumerate() {
        let baseline = top_left.y - cell.y * (row + 1) as f32;
        for (column, ch) in line.chars().enumerate() {
            let mins = Vec2::new(top_left.x + cell.x * column as f32, baseline);
            let bounds = Aabb2::new(mins, mins + cell);
            add_verts_for_aabb2d(verts, bounds, entry.color, glyph_uvs(ch));
        }
    }
}

fn glyph_uvs(ch: char) -> Aabb2 {
    let index = if ch.is_ascii() { ch as u32 } else { '?' as u32 };
    let size = 1.0 / GLYPHS_PER_ROW as f32;
    let column = (index % GLYPHS_PER_ROW) as f32;
    let row = (index / GLYPHS_PER_ROW) as f32;

    // Sheet row 0 is at the top; v grows upward
    let mins = Vec2::new(column * size, 1.0 - (row + 1.0) * size);
    Aabb2::new(mins, mins + Vec2::new(size, size))
}

//=========================================================================
// Unit Tests
//=========================================================================
