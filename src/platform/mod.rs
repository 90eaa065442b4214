//=========================================================================
// Platform Subsystem
//
// Winit backend for `core::platform_bridge::Platform`.
//
// Architecture:
// ```text
//  App (frame loop)                      WinitPlatform
//  ┌────────────────────┐   pump_messages()   ┌──────────────────────────┐
//  │ BeginFrame         │ ──────────────────► │ EventLoop::pump_app_events│
//  │                    │                     │   ↓                      │
//  │                    │                     │ PlatformState            │
//  │                    │                     │   ├─ create requested    │
//  │                    │                     │   │  windows             │
//  │                    │                     │   ├─ InputProcessor      │
//  │                    │                     │   │   ↓                  │
//  │                    │                     │   └─ InputBuffer         │
//  │                    │                     │   ↓ (about_to_wait)      │
//  │ EventCollector ◄───┼──── bounded channel ┼── PlatformEvent          │
//  └────────────────────┘                     └──────────────────────────┘
// ```
//
// Everything runs on the main thread. The event loop is pumped with a zero
// timeout once per frame instead of owning the thread, so the app keeps
// control of frame pacing and shutdown order.
//
// Sizes and positions cross the bridge in logical pixels, so a window's
// viewport into the shared screen does not depend on its monitor's DPI.
//
// Windows can only be created from inside winit callbacks: `request_window`
// reserves a handle and queues the request; the window is created during
// the next pump and announced with `PlatformEvent::WindowCreated`.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use std::collections::HashMap;
use std::time::Duration;

use crossbeam_channel::Sender;
use glam::{IVec2, Vec2};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalPosition, LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::error::PlatformError;
use crate::core::platform_bridge::{send_event, Platform, PlatformEvent, WindowRequest};
use crate::core::window::{DisplayContext, WindowHandle};
use input_buffer::InputBuffer;
use input_processor::{BufferedInput, InputProcessor};

//=== ContextLedger =======================================================

/// Tracks which windows' display contexts are handed out.
#[derive(Default)]
struct ContextLedger {
    outstanding: HashMap<WindowHandle, u64>,
    next_token: u64,
}

impl ContextLedger {
    fn acquire(&mut self, handle: WindowHandle) -> Result<DisplayContext, PlatformError> {
        if self.outstanding.contains_key(&handle) {
            return Err(PlatformError::ContextInUse(handle));
        }
        self.next_token += 1;
        self.outstanding.insert(handle, self.next_token);
        Ok(DisplayContext::new(handle, self.next_token))
    }

    /// Returns `false` for contexts this ledger did not hand out.
    fn release(&mut self, context: DisplayContext) -> bool {
        match self.outstanding.get(&context.handle()) {
            Some(&token) if token == context.token() => {
                self.outstanding.remove(&context.handle());
                true
            }
            _ => false,
        }
    }

    fn outstanding(&self) -> usize {
        self.outstanding.len()
    }
}

//=== PlatformState =======================================================

/// The part of the platform winit calls back into.
struct PlatformState {
    sender: Option<Sender<PlatformEvent>>,

    //--- Windows ----------------------------------------------------------
    windows: HashMap<WindowHandle, Window>,
    ids: HashMap<WindowId, WindowHandle>,
    pending: Vec<(WindowHandle, WindowRequest)>,
    next_handle: u64,
    contexts: ContextLedger,

    //--- Input ------------------------------------------------------------
    buffer: InputBuffer,
    input_processor: InputProcessor,
}

impl PlatformState {
    fn new() -> Self {
        Self {
            sender: None,
            windows: HashMap::new(),
            ids: HashMap::new(),
            pending: Vec::new(),
            next_handle: 1,
            contexts: ContextLedger::default(),
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
        }
    }

    fn send(&self, event: PlatformEvent) {
        if let Some(sender) = &self.sender {
            send_event(sender, event);
        }
    }

    /// Reserves a handle; the window is created on the next pump.
    fn reserve(&mut self, request: WindowRequest) -> WindowHandle {
        let handle = WindowHandle::new(self.next_handle);
        self.next_handle += 1;
        debug!(target: "platform", "Window {} '{}' requested", handle, request.title);
        self.pending.push((handle, request));
        handle
    }

    fn create_pending_windows(&mut self, event_loop: &ActiveEventLoop) {
        for (handle, request) in std::mem::take(&mut self.pending) {
            let attributes = Window::default_attributes()
                .with_title(request.title.clone())
                .with_inner_size(LogicalSize::new(
                    request.client_dimensions.x,
                    request.client_dimensions.y,
                ))
                .with_position(LogicalPosition::new(request.position.x, request.position.y));

            match event_loop.create_window(attributes) {
                Ok(window) => {
                    let client_dimensions =
                        logical_dimensions(window.inner_size(), window.scale_factor());
                    info!(
                        target: "platform",
                        "Window {} created: {}x{} @ {}x DPI",
                        handle,
                        client_dimensions.x,
                        client_dimensions.y,
                        window.scale_factor()
                    );
                    self.ids.insert(window.id(), handle);
                    self.windows.insert(handle, window);
                    self.send(PlatformEvent::WindowCreated {
                        handle,
                        title: request.title,
                        position: request.position,
                        client_dimensions,
                    });
                }
                Err(e) => {
                    error!(target: "platform", "Window {} creation failed: {}", handle, e);
                    self.send(PlatformEvent::WindowCreationFailed {
                        handle,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    /// Sends buffered input as one `Inputs` event. Empty buffers are not sent.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete.len(),
                continuous.len()
            );
            self.send(PlatformEvent::Inputs { discrete, continuous });
        }
    }

    fn destroy(&mut self, handle: WindowHandle) {
        if let Some(window) = self.windows.remove(&handle) {
            self.ids.remove(&window.id());
            debug!(target: "platform", "Window {} destroyed", handle);
        }
        self.pending.retain(|(pending, _)| *pending != handle);
    }
}

/// Client size in the logical units windows are requested and moved in.
fn logical_dimensions(size: PhysicalSize<u32>, scale_factor: f64) -> IVec2 {
    let logical = size.to_logical::<f64>(scale_factor);
    IVec2::new(logical.width.round() as i32, logical.height.round() as i32)
}

//=== Winit Integration ===================================================

impl ApplicationHandler for PlatformState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending_windows(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(&handle) = self.ids.get(&window_id) else {
            trace!(target: "platform", "Event for unknown window ignored");
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window {} close requested", handle);
                self.send(PlatformEvent::CloseRequested { handle });
            }

            WindowEvent::Resized(size) => {
                let scale_factor = self.windows.get(&handle).map_or(1.0, |w| w.scale_factor());
                let client_dimensions = logical_dimensions(*size, scale_factor);
                debug!(
                    target: "platform",
                    "Window {} resized to {}x{} ({}x{} physical)",
                    handle,
                    client_dimensions.x,
                    client_dimensions.y,
                    size.width,
                    size.height
                );
                self.send(PlatformEvent::WindowResized { handle, client_dimensions });
            }

            WindowEvent::Focused(false) => {
                debug!(target: "platform", "Window {} lost focus", handle);
                self.send(PlatformEvent::FocusLost { handle });
            }

            _ => match self.input_processor.translate(&event) {
                Some(BufferedInput::Discrete(input)) => self.buffer.push_discrete(input),
                Some(BufferedInput::Continuous(input)) => self.buffer.push_continuous(input),
                None => {}
            },
        }
    }

    /// End of one pump: new windows appear and input goes out as a batch.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.pending.is_empty() {
            self.create_pending_windows(event_loop);
        }
        self.flush_input_buffer();
    }
}

//=== WinitPlatform =======================================================

/// OS windows through winit, pumped from the app's frame loop.
pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    state: PlatformState,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            state: PlatformState::new(),
        }
    }

    pub fn window_count(&self) -> usize {
        self.state.windows.len()
    }
}

impl Default for WinitPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for WinitPlatform {
    fn startup(&mut self, sender: Sender<PlatformEvent>) -> Result<(), PlatformError> {
        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        self.event_loop = Some(event_loop);
        self.state.sender = Some(sender);
        info!(target: "platform", "Platform subsystem started");
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.event_loop.is_none() && self.state.windows.is_empty() {
            return;
        }
        if self.state.contexts.outstanding() > 0 {
            warn!(
                target: "platform",
                "{} display contexts still acquired at shutdown",
                self.state.contexts.outstanding()
            );
        }

        let handles: Vec<WindowHandle> = self.state.windows.keys().copied().collect();
        for handle in handles {
            self.state.destroy(handle);
        }
        self.state.pending.clear();
        self.state.sender = None;
        self.event_loop = None;
        info!(target: "platform", "Platform subsystem shut down");
    }

    fn pump_messages(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state) {
            info!(target: "platform", "Event loop exited with code {}", code);
            self.state.send(PlatformEvent::LoopExited);
            self.event_loop = None;
        }
    }

    fn request_window(&mut self, request: WindowRequest) -> Result<WindowHandle, PlatformError> {
        if self.event_loop.is_none() {
            return Err(PlatformError::NotStarted);
        }
        Ok(self.state.reserve(request))
    }

    fn destroy_window(&mut self, handle: WindowHandle) {
        self.state.destroy(handle);
    }

    fn acquire_display_context(
        &mut self,
        handle: WindowHandle,
    ) -> Result<DisplayContext, PlatformError> {
        if !self.state.windows.contains_key(&handle) {
            return Err(PlatformError::UnknownWindow(handle));
        }
        self.state.contexts.acquire(handle)
    }

    fn release_display_context(&mut self, context: DisplayContext) {
        let handle = context.handle();
        if !self.state.contexts.release(context) {
            warn!(target: "platform", "Released a display context window {} never handed out", handle);
        }
    }

    fn set_window_position(&mut self, handle: WindowHandle, position: Vec2) {
        match self.state.windows.get(&handle) {
            Some(window) => window.set_outer_position(LogicalPosition::new(position.x, position.y)),
            None => trace!(target: "platform", "Move of unknown window {} ignored", handle),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
