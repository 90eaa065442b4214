//=========================================================================
// Test Doubles
//=========================================================================
//
// Scripted platform and journaling renderer/audio wrappers shared by the
// unit tests.
//
// Every double writes to a shared `Journal`, so a test can assert the
// relative order of calls across collaborators (startup order, display
// contexts released before the platform shuts down, ...).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use crossbeam_channel::Sender;
use glam::{IVec2, Vec2};

//=== Internal Dependencies ===============================================

use crate::core::audio::{
    AudioSystem, HeadlessAudio, PlaybackId, SoundDimension, SoundId, SoundPlayback,
};
use crate::core::clock::Clock;
use crate::core::context::AppContext;
use crate::core::error::{AudioError, PlatformError, RenderError};
use crate::core::event_system::EventSystem;
use crate::core::input::InputSystem;
use crate::core::math::Aabb2;
use crate::core::platform_bridge::{send_event, Platform, PlatformEvent, WindowRequest};
use crate::core::quit::QuitSignal;
use crate::core::renderer::{
    Camera, DebugRenderSystem, FontId, HeadlessRenderer, ModelConstants, RenderState, Renderer,
    Rgba8, ShaderId, TextureId, Vertex, WindowSurface,
};
use crate::core::window::{DisplayContext, WindowCollection, WindowHandle};

//=== Journal =============================================================

/// Ordered log of collaborator calls.
#[derive(Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub(crate) fn record(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    /// Index of the first entry equal to `entry`.
    pub(crate) fn position(&self, entry: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == entry)
    }

    pub(crate) fn count_prefix(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

//=== MockPlatform ========================================================

/// State shared between a [`MockPlatform`] and the test driving it.
#[derive(Default)]
pub(crate) struct MockPlatformState {
    /// One entry per `pump_messages` call, sent after pending creations.
    pub(crate) script: RefCell<VecDeque<Vec<PlatformEvent>>>,
    pub(crate) requests: RefCell<Vec<WindowRequest>>,
    pub(crate) moves: RefCell<Vec<(WindowHandle, Vec2)>>,
    pub(crate) outstanding_contexts: RefCell<HashSet<WindowHandle>>,
    pub(crate) fail_startup: Cell<bool>,
    pub(crate) fail_display_contexts: Cell<bool>,
}

impl MockPlatformState {
    pub(crate) fn push_frame(&self, events: Vec<PlatformEvent>) {
        self.script.borrow_mut().push_back(events);
    }
}

/// `Platform` that creates windows instantly and replays scripted events.
pub(crate) struct MockPlatform {
    shared: Rc<MockPlatformState>,
    journal: Journal,
    sender: Option<Sender<PlatformEvent>>,
    pending: Vec<PlatformEvent>,
    next_handle: u64,
    next_token: u64,
}

impl MockPlatform {
    pub(crate) fn new() -> Self {
        Self::with_journal(Journal::default())
    }

    pub(crate) fn with_journal(journal: Journal) -> Self {
        Self {
            shared: Rc::new(MockPlatformState::default()),
            journal,
            sender: None,
            pending: Vec::new(),
            next_handle: 1,
            next_token: 100,
        }
    }

    pub(crate) fn shared(&self) -> Rc<MockPlatformState> {
        self.shared.clone()
    }
}

impl Platform for MockPlatform {
    fn startup(&mut self, sender: Sender<PlatformEvent>) -> Result<(), PlatformError> {
        self.journal.record("platform.startup");
        if self.shared.fail_startup.get() {
            return Err(PlatformError::EventLoopCreation("scripted failure".into()));
        }
        self.sender = Some(sender);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.journal.record("platform.shutdown");
        self.sender = None;
    }

    fn pump_messages(&mut self) {
        let Some(sender) = &self.sender else {
            return;
        };
        for event in self.pending.drain(..) {
            send_event(sender, event);
        }
        let scripted = self.shared.script.borrow_mut().pop_front();
        for event in scripted.into_iter().flatten() {
            send_event(sender, event);
        }
    }

    fn request_window(&mut self, request: WindowRequest) -> Result<WindowHandle, PlatformError> {
        if self.sender.is_none() {
            return Err(PlatformError::NotStarted);
        }
        let handle = WindowHandle::new(self.next_handle);
        self.next_handle += 1;

        self.pending.push(PlatformEvent::WindowCreated {
            handle,
            title: request.title.clone(),
            position: request.position,
            client_dimensions: request.client_dimensions,
        });
        self.shared.requests.borrow_mut().push(request);
        Ok(handle)
    }

    fn destroy_window(&mut self, handle: WindowHandle) {
        self.journal.record(format!("platform.destroy_window {}", handle));
    }

    fn acquire_display_context(
        &mut self,
        handle: WindowHandle,
    ) -> Result<DisplayContext, PlatformError> {
        if self.shared.fail_display_contexts.get() {
            return Err(PlatformError::UnknownWindow(handle));
        }
        self.next_token += 1;
        self.shared.outstanding_contexts.borrow_mut().insert(handle);
        Ok(DisplayContext::new(handle, self.next_token))
    }

    fn release_display_context(&mut self, context: DisplayContext) {
        self.journal.record(format!("platform.release_dc {}", context.handle()));
        self.shared.outstanding_contexts.borrow_mut().remove(&context.handle());
    }

    fn set_window_position(&mut self, handle: WindowHandle, position: Vec2) {
        self.shared.moves.borrow_mut().push((handle, position));
    }
}

//=== RecordingRenderer ===================================================

/// Journals lifecycle and swap-chain calls, delegates to a shared
/// [`HeadlessRenderer`], and can be told to fail resizes per window.
pub(crate) struct RecordingRenderer {
    pub(crate) inner: Rc<RefCell<HeadlessRenderer>>,
    pub(crate) fail_resize: Rc<RefCell<HashSet<WindowHandle>>>,
    pub(crate) fail_startup: bool,
    journal: Journal,
}

impl RecordingRenderer {
    pub(crate) fn new(journal: Journal) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HeadlessRenderer::new())),
            fail_resize: Rc::new(RefCell::new(HashSet::new())),
            fail_startup: false,
            journal,
        }
    }
}

impl Renderer for RecordingRenderer {
    fn startup(&mut self) -> Result<(), RenderError> {
        self.journal.record("renderer.startup");
        if self.fail_startup {
            return Err(RenderError::DeviceCreation("scripted failure".into()));
        }
        self.inner.borrow_mut().startup()
    }

    fn shutdown(&mut self) {
        self.journal.record("renderer.shutdown");
        self.inner.borrow_mut().shutdown();
    }

    fn begin_frame(&mut self) {
        self.inner.borrow_mut().begin_frame();
    }

    fn end_frame(&mut self) {
        self.inner.borrow_mut().end_frame();
    }

    fn create_window_swap_chain(&mut self, surface: &WindowSurface) -> Result<(), RenderError> {
        self.journal.record(format!("renderer.create_swap_chain {}", surface.handle));
        self.inner.borrow_mut().create_window_swap_chain(surface)
    }

    fn resize_window_swap_chain(&mut self, surface: &WindowSurface) -> Result<(), RenderError> {
        self.journal.record(format!("renderer.resize_swap_chain {}", surface.handle));
        if self.fail_resize.borrow().contains(&surface.handle) {
            return Err(RenderError::InvalidDimensions {
                handle: surface.handle,
                width: surface.client_dimensions.x,
                height: surface.client_dimensions.y,
            });
        }
        self.inner.borrow_mut().resize_window_swap_chain(surface)
    }

    fn destroy_window_swap_chain(&mut self, handle: WindowHandle) {
        self.journal.record(format!("renderer.destroy_swap_chain {}", handle));
        self.inner.borrow_mut().destroy_window_swap_chain(handle);
    }

    fn render_viewport_to_window(
        &mut self,
        handle: WindowHandle,
        viewport: Aabb2,
    ) -> Result<(), RenderError> {
        self.inner.borrow_mut().render_viewport_to_window(handle, viewport)
    }

    fn begin_camera(&mut self, camera: &Camera) {
        self.inner.borrow_mut().begin_camera(camera);
    }

    fn end_camera(&mut self, camera: &Camera) {
        self.inner.borrow_mut().end_camera(camera);
    }

    fn clear_screen(&mut self, color: Rgba8) {
        self.inner.borrow_mut().clear_screen(color);
    }

    fn set_render_state(&mut self, state: RenderState) {
        self.inner.borrow_mut().set_render_state(state);
    }

    fn set_model_constants(&mut self, constants: ModelConstants) {
        self.inner.borrow_mut().set_model_constants(constants);
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.inner.borrow_mut().bind_texture(texture);
    }

    fn bind_shader(&mut self, shader: Option<ShaderId>) {
        self.inner.borrow_mut().bind_shader(shader);
    }

    fn draw_vertex_array(&mut self, verts: &[Vertex]) {
        self.inner.borrow_mut().draw_vertex_array(verts);
    }

    fn create_or_get_texture_from_file(&mut self, path: &str) -> Result<TextureId, RenderError> {
        self.inner.borrow_mut().create_or_get_texture_from_file(path)
    }

    fn create_or_get_shader_from_file(&mut self, path: &str) -> Result<ShaderId, RenderError> {
        self.inner.borrow_mut().create_or_get_shader_from_file(path)
    }

    fn create_or_get_bitmap_font_from_file(&mut self, path: &str) -> Result<FontId, RenderError> {
        self.inner.borrow_mut().create_or_get_bitmap_font_from_file(path)
    }
}

//=== RecordingAudio ======================================================

pub(crate) struct RecordingAudio {
    pub(crate) inner: Rc<RefCell<HeadlessAudio>>,
    journal: Journal,
}

impl RecordingAudio {
    pub(crate) fn new(journal: Journal) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HeadlessAudio::new())),
            journal,
        }
    }
}

impl AudioSystem for RecordingAudio {
    fn startup(&mut self) -> Result<(), AudioError> {
        self.journal.record("audio.startup");
        self.inner.borrow_mut().startup()
    }

    fn shutdown(&mut self) {
        self.journal.record("audio.shutdown");
        self.inner.borrow_mut().shutdown();
    }

    fn begin_frame(&mut self) {
        self.inner.borrow_mut().begin_frame();
    }

    fn end_frame(&mut self) {
        self.inner.borrow_mut().end_frame();
    }

    fn create_or_get_sound(
        &mut self,
        path: &str,
        dimension: SoundDimension,
    ) -> Result<SoundId, AudioError> {
        self.inner.borrow_mut().create_or_get_sound(path, dimension)
    }

    fn start_sound(
        &mut self,
        sound: SoundId,
        playback: SoundPlayback,
    ) -> Result<PlaybackId, AudioError> {
        self.journal.record("audio.start_sound");
        self.inner.borrow_mut().start_sound(sound, playback)
    }

    fn stop_sound(&mut self, playback: PlaybackId) {
        self.inner.borrow_mut().stop_sound(playback);
    }
}

//=== TestContext =========================================================

/// Started `AppContext` over headless collaborators, with handles to inspect them.
pub(crate) struct TestContext {
    pub(crate) ctx: AppContext,
    pub(crate) renderer: Rc<RefCell<HeadlessRenderer>>,
    pub(crate) audio: Rc<RefCell<HeadlessAudio>>,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let journal = Journal::default();
        let mut renderer = RecordingRenderer::new(journal.clone());
        let mut audio = RecordingAudio::new(journal);
        let renderer_state = renderer.inner.clone();
        let audio_state = audio.inner.clone();

        renderer.startup().expect("headless renderer starts");
        audio.startup().expect("headless audio starts");
        let mut debug_render = DebugRenderSystem::new();
        debug_render.startup(&mut renderer).expect("debug font loads");

        Self {
            ctx: AppContext {
                events: EventSystem::new(),
                input: InputSystem::new(),
                renderer: Box::new(renderer),
                debug_render,
                audio: Box::new(audio),
                windows: WindowCollection::new(40.0, 120.0),
                system_clock: Clock::new(),
                quit: QuitSignal::new(),
            },
            renderer: renderer_state,
            audio: audio_state,
        }
    }
}

/// Convenience for scripting a resize.
pub(crate) fn resized(id: u64, width: i32, height: i32) -> PlatformEvent {
    PlatformEvent::WindowResized {
        handle: WindowHandle::new(id),
        client_dimensions: IVec2::new(width, height),
    }
}
