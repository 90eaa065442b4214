//=========================================================================
// App
//=========================================================================
//
// Owns every subsystem and drives the frame loop.
//
// Lifecycle:
// ```text
//   startup:   Events → Input → Platform → Renderer → DebugRender → Audio → Game
//              then request the startup windows and pump once
//   frame:     BeginFrame → Update → Render → EndFrame
//   shutdown:  per-window release, then the started stages in reverse
// ```
//
// Only stages that started successfully are recorded, so a failed startup
// still tears down exactly what it brought up.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::builder::{AppConfig, TimeSource};
use crate::core::audio::AudioSystem;
use crate::core::clock::Clock;
use crate::core::context::AppContext;
use crate::core::error::AppError;
use crate::core::event_system::{
    EventArgs, EventSystem, SubscriptionId, EVENT_CLOSE_BUTTON_CLICKED, EVENT_QUIT,
    EVENT_WINDOW_SIZE_CHANGED,
};
use crate::core::game::Game;
use crate::core::input::{InputSystem, KeyCode};
use crate::core::platform_bridge::{
    EventCollector, Platform, PlatformEvent, TickControl, WindowRequest,
};
use crate::core::quit::{QuitReason, QuitSignal};
use crate::core::renderer::{DebugRenderSystem, Renderer, Rgba8};
use crate::core::window::WindowCollection;

//=== Stage ===============================================================

/// Subsystems in startup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Events,
    Input,
    Platform,
    Renderer,
    DebugRender,
    Audio,
    Game,
}

//=== LoopState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Quitting,
}

//=== App =================================================================

/// The application: subsystems, windows and the game.
///
/// Create with [`AppBuilder`](super::AppBuilder), then call [`App::run`].
/// Dropping a started app shuts it down.
pub struct App {
    config: AppConfig,
    platform: Box<dyn Platform>,
    ctx: AppContext,
    game: Option<Game>,
    collector: Option<EventCollector>,
    started: Vec<Stage>,
    subscriptions: Vec<SubscriptionId>,
    windows_requested: usize,
}

impl App {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        config: AppConfig,
        platform: Box<dyn Platform>,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioSystem>,
    ) -> Self {
        let ctx = AppContext {
            events: EventSystem::new(),
            input: InputSystem::new(),
            renderer,
            debug_render: DebugRenderSystem::new(),
            audio,
            windows: WindowCollection::new(config.drift_speed, config.drift_range),
            system_clock: Clock::with_max_delta(config.max_delta_seconds),
            quit: QuitSignal::new(),
        };

        Self {
            config,
            platform,
            ctx,
            game: None,
            collector: None,
            started: Vec::with_capacity(7),
            subscriptions: Vec::new(),
            windows_requested: 0,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    /// The game, once startup has reached it.
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn is_started(&self) -> bool {
        !self.started.is_empty()
    }

    pub fn loop_state(&self) -> LoopState {
        if self.ctx.quit.is_requested() {
            LoopState::Quitting
        } else {
            LoopState::Running
        }
    }

    //--- Execution --------------------------------------------------------

    /// Starts up, runs frames until quit is requested, then shuts down.
    ///
    /// A startup failure tears down whatever had started and is returned.
    pub fn run(&mut self) -> Result<(), AppError> {
        if let Err(e) = self.startup() {
            error!(target: "app", "Startup failed: {}", e);
            if !matches!(e, AppError::AlreadyStarted) {
                self.shutdown();
            }
            return Err(e);
        }

        self.run_main_loop();
        self.shutdown();
        Ok(())
    }

    //--- Lifecycle --------------------------------------------------------

    /// Starts every subsystem in dependency order and opens the startup
    /// windows.
    ///
    /// On error the stages started so far stay recorded; call
    /// [`shutdown`](Self::shutdown) to release them.
    pub fn startup(&mut self) -> Result<(), AppError> {
        if self.is_started() {
            return Err(AppError::AlreadyStarted);
        }
        info!(target: "app", "Starting '{}'", self.config.title);

        self.ctx.events.startup();
        self.subscribe_quit_handlers();
        self.started.push(Stage::Events);

        self.ctx.input.startup();
        self.started.push(Stage::Input);

        let (tx, rx) = bounded(self.config.channel_capacity);
        self.platform.startup(tx)?;
        self.collector = Some(EventCollector::new(rx));
        self.started.push(Stage::Platform);

        self.ctx.renderer.startup()?;
        self.started.push(Stage::Renderer);

        self.ctx.debug_render.startup(self.ctx.renderer.as_mut())?;
        self.started.push(Stage::DebugRender);

        self.ctx.audio.startup()?;
        self.started.push(Stage::Audio);

        self.game = Some(Game::new(&mut self.ctx.events, self.config.screen_size));
        self.started.push(Stage::Game);

        self.request_windows(self.config.startup_window_count);
        self.platform.pump_messages();
        self.process_platform_events();

        info!(
            target: "app",
            "Startup complete ({} of {} windows open)",
            self.ctx.windows.len(),
            self.config.startup_window_count
        );
        Ok(())
    }

    /// Releases every window, then shuts the started stages down in reverse.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if !self.is_started() {
            return;
        }
        info!(target: "app", "Shutting down");

        self.release_windows();

        while let Some(stage) = self.started.pop() {
            match stage {
                Stage::Game => {
                    if let Some(mut game) = self.game.take() {
                        game.shutdown(&mut self.ctx.events);
                    }
                }
                Stage::Audio => self.ctx.audio.shutdown(),
                Stage::DebugRender => self.ctx.debug_render.shutdown(),
                Stage::Renderer => self.ctx.renderer.shutdown(),
                Stage::Platform => {
                    self.platform.shutdown();
                    self.collector = None;
                }
                Stage::Input => self.ctx.input.shutdown(),
                Stage::Events => {
                    for id in self.subscriptions.drain(..) {
                        self.ctx.events.unsubscribe(id);
                    }
                    self.ctx.events.shutdown();
                }
            }
            debug!(target: "app", "{:?} shut down", stage);
        }

        info!(target: "app", "Shutdown complete");
    }

    fn subscribe_quit_handlers(&mut self) {
        let quit = self.ctx.quit.clone();
        let close = self.ctx.events.subscribe(EVENT_CLOSE_BUTTON_CLICKED, move |_| {
            quit.request(QuitReason::CloseButton);
            true
        });

        let quit = self.ctx.quit.clone();
        let command = self.ctx.events.subscribe(EVENT_QUIT, move |_| {
            quit.request(QuitReason::Command);
            true
        });

        self.subscriptions.extend([close, command]);
    }

    fn release_windows(&mut self) {
        for mut window in self.ctx.windows.drain() {
            let handle = window.handle();
            if let Some(context) = window.take_display_context() {
                self.platform.release_display_context(context);
            }
            if window.has_swap_chain() {
                self.ctx.renderer.destroy_window_swap_chain(handle);
            }
            self.platform.destroy_window(handle);
        }
    }

    //--- Frame Loop -------------------------------------------------------

    /// Runs frames until quit is requested.
    ///
    /// The quit flag is only checked between frames, so the frame that
    /// requests it always finishes.
    pub fn run_main_loop(&mut self) {
        info!(target: "app", "Entering main loop");

        while self.loop_state() == LoopState::Running {
            let frame_start = Instant::now();
            self.run_frame();
            self.pace_frame(frame_start);
        }

        info!(
            target: "app",
            "Main loop exited ({:?}) after {} frames",
            self.ctx.quit.reason(),
            self.ctx.system_clock.frame_count()
        );
    }

    pub fn run_frame(&mut self) {
        self.begin_frame();
        self.update();
        self.render();
        self.end_frame();
    }

    fn begin_frame(&mut self) {
        self.ctx.input.begin_frame();
        self.platform.pump_messages();
        self.process_platform_events();
        self.ctx.input.finalize_frame();

        self.ctx.renderer.begin_frame();
        self.ctx.debug_render.begin_frame();
        self.ctx.audio.begin_frame();
    }

    fn update(&mut self) {
        match self.config.time_source {
            TimeSource::Realtime => self.ctx.system_clock.tick_realtime(),
            TimeSource::Manual(delta) => self
                .ctx
                .system_clock
                .advance(delta.min(self.config.max_delta_seconds)),
        }

        if self.ctx.input.was_key_just_pressed(KeyCode::KeyN) {
            self.request_windows(self.config.interactive_window_count);
        }

        let delta = self.ctx.system_clock.delta_seconds() as f32;
        self.ctx.windows.update_drift(delta * self.config.drift_scale);

        if let Some(game) = self.game.as_mut() {
            game.update(&mut self.ctx);
        }

        for (handle, position) in self.ctx.windows.take_moved() {
            self.platform.set_window_position(handle, position);
        }
    }

    fn render(&mut self) {
        self.ctx.renderer.clear_screen(Rgba8::BLACK);

        if let Some(game) = self.game.as_ref() {
            game.render(&mut self.ctx);
        }

        self.ctx.windows.reconcile_resizes(self.ctx.renderer.as_mut());
        self.ctx.windows.present(self.ctx.renderer.as_mut());
    }

    fn end_frame(&mut self) {
        self.ctx.renderer.end_frame();
        self.ctx.debug_render.end_frame();
        self.ctx.audio.end_frame();
    }

    fn pace_frame(&self, frame_start: Instant) {
        let Some(fps) = self.config.max_fps else {
            return;
        };
        let budget = Duration::from_secs_f64(1.0 / fps);
        let elapsed = frame_start.elapsed();
        if elapsed < budget {
            std::thread::sleep(budget - elapsed);
        }
    }

    //--- Platform Events --------------------------------------------------

    fn process_platform_events(&mut self) {
        let Some(collector) = self.collector.as_mut() else {
            return;
        };

        if collector.collect_frame() == TickControl::Exit {
            self.ctx.quit.request(QuitReason::PlatformLost);
        }
        for batch in collector.batches() {
            self.ctx.input.process_events(batch);
        }
        let window_events = collector.take_window_events();

        for event in window_events {
            self.handle_window_event(event);
        }
    }

    fn handle_window_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::WindowCreated {
                handle,
                title,
                position,
                client_dimensions,
            } => {
                self.ctx.windows.add_window(
                    handle,
                    title,
                    position,
                    client_dimensions,
                    self.platform.as_mut(),
                    self.ctx.renderer.as_mut(),
                );
            }
            PlatformEvent::WindowCreationFailed { handle, reason } => {
                warn!(target: "app", "Window {} was not created: {}", handle, reason);
            }
            PlatformEvent::WindowResized {
                handle,
                client_dimensions,
            } => {
                if !self.ctx.windows.mark_resized(handle, client_dimensions) {
                    debug!(target: "app", "Resize for unknown window {} ignored", handle);
                    return;
                }
                let mut args = EventArgs::new()
                    .with_value("newWidth", client_dimensions.x)
                    .with_value("newHeight", client_dimensions.y);
                self.ctx.events.fire_event(EVENT_WINDOW_SIZE_CHANGED, &mut args);
            }
            PlatformEvent::CloseRequested { handle } => {
                info!(target: "app", "Close requested for window {}", handle);
                let mut args = EventArgs::new().with_value("window", handle.raw());
                self.ctx.events.fire_event(EVENT_CLOSE_BUTTON_CLICKED, &mut args);
            }
            PlatformEvent::FocusLost { handle } => {
                debug!(target: "app", "Window {} lost focus, releasing held input", handle);
                self.ctx.input.release_all();
            }
            PlatformEvent::Inputs { .. } | PlatformEvent::LoopExited => {}
        }
    }

    fn request_windows(&mut self, count: usize) {
        for _ in 0..count {
            let index = self.windows_requested;
            self.windows_requested += 1;

            let request = WindowRequest {
                title: format!("{} ({})", self.config.title, index + 1),
                position: self.config.window_origin(index),
                client_dimensions: self.config.window_size,
            };
            match self.platform.request_window(request) {
                Ok(handle) => debug!(target: "app", "Requested window {}", handle),
                Err(e) => warn!(target: "app", "Window request {} failed: {}", index + 1, e),
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
