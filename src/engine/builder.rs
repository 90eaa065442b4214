//=========================================================================
// App Builder
//=========================================================================
//
// Fluent configuration for an [`App`].
//
// ```text
//     AppBuilder ──build()──> App ──run()──> [frame loop]
//         │
//         ├─ with_startup_window_count()
//         ├─ with_drift_speed() / with_drift_scale() / with_drift_range()
//         ├─ with_time_source() / with_max_fps()
//         └─ with_platform() / with_renderer() / with_audio()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{IVec2, Vec2};
use log::info;

//=== Internal Dependencies ===============================================

use super::app::App;
use crate::core::audio::{AudioSystem, HeadlessAudio};
use crate::core::platform_bridge::Platform;
use crate::core::renderer::{HeadlessRenderer, Renderer};
use crate::platform::WinitPlatform;

//=== TimeSource ==========================================================

/// Where the system clock gets its per-frame delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeSource {
    /// Wall time between frames, clamped to `max_delta_seconds`.
    Realtime,
    /// Fixed delta in seconds every frame.
    Manual(f64),
}

//=== AppConfig ===========================================================

/// Tunables for an [`App`].
///
/// # Default Values
///
/// - **Title**: `"FirstMultipleWindows"`
/// - **Screen size**: 1600 x 800
/// - **Startup windows**: 3
/// - **Windows per `N` press**: 2
/// - **Window size**: 400 x 300
/// - **Window origins**: (100,100), (600,200), (300,400), then cascading by 40 px
/// - **Drift**: 40 px/s, scaled by 1.5, wandering 120 px per axis
/// - **Max delta**: 0.1 s
/// - **Channel capacity**: 256 events
/// - **Time source**: realtime
/// - **Max FPS**: uncapped
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub screen_size: Vec2,
    pub startup_window_count: usize,
    pub interactive_window_count: usize,
    pub window_size: IVec2,
    pub window_layout: Vec<Vec2>,
    pub window_cascade: f32,
    pub drift_speed: f32,
    pub drift_scale: f32,
    pub drift_range: f32,
    pub max_delta_seconds: f64,
    pub channel_capacity: usize,
    pub time_source: TimeSource,
    pub max_fps: Option<f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "FirstMultipleWindows".to_string(),
            screen_size: Vec2::new(1600.0, 800.0),
            startup_window_count: 3,
            interactive_window_count: 2,
            window_size: IVec2::new(400, 300),
            window_layout: vec![
                Vec2::new(100.0, 100.0),
                Vec2::new(600.0, 200.0),
                Vec2::new(300.0, 400.0),
            ],
            window_cascade: 40.0,
            drift_speed: 40.0,
            drift_scale: 1.5,
            drift_range: 120.0,
            max_delta_seconds: 0.1,
            channel_capacity: 256,
            time_source: TimeSource::Realtime,
            max_fps: None,
        }
    }
}

impl AppConfig {
    /// Desktop origin of the `index`-th window ever requested.
    ///
    /// The first windows use the layout table; later ones cascade from its
    /// last entry.
    pub fn window_origin(&self, index: usize) -> Vec2 {
        let Some(last) = self.window_layout.last().copied() else {
            let step = self.window_cascade * index as f32;
            return Vec2::new(step, step);
        };

        match self.window_layout.get(index) {
            Some(origin) => *origin,
            None => {
                let extra = (index + 1 - self.window_layout.len()) as f32;
                last + Vec2::new(self.window_cascade, self.window_cascade) * extra
            }
        }
    }
}

//=== AppBuilder ==========================================================

/// Builder for configuring and constructing an [`App`].
///
/// Collaborators default to the winit platform with the headless renderer
/// and audio backends.
///
/// # Examples
///
/// ```no_run
/// use multiwin::AppBuilder;
///
/// let mut app = AppBuilder::new()
///     .with_startup_window_count(4)
///     .with_drift_speed(60.0)
///     .build();
///
/// if let Err(e) = app.run() {
///     eprintln!("{e}");
/// }
/// ```
pub struct AppBuilder {
    config: AppConfig,
    platform: Option<Box<dyn Platform>>,
    renderer: Option<Box<dyn Renderer>>,
    audio: Option<Box<dyn AudioSystem>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            platform: None,
            renderer: None,
            audio: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Size of the virtual screen the game draws into.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn with_screen_size(mut self, width: f32, height: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "Screen size must be positive, got {}x{}",
            width,
            height
        );
        self.config.screen_size = Vec2::new(width, height);
        self
    }

    /// Number of windows requested during startup.
    ///
    /// Default: 3
    pub fn with_startup_window_count(mut self, count: usize) -> Self {
        self.config.startup_window_count = count;
        self
    }

    /// Number of windows requested each time `N` is pressed.
    ///
    /// Default: 2
    pub fn with_interactive_window_count(mut self, count: usize) -> Self {
        self.config.interactive_window_count = count;
        self
    }

    /// Client size of every window.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.config.window_size = IVec2::new(width, height);
        self
    }

    /// Drift speed in pixels per scaled second.
    ///
    /// Default: 40.0
    ///
    /// # Panics
    ///
    /// Panics if `speed < 0.0`.
    pub fn with_drift_speed(mut self, speed: f32) -> Self {
        assert!(speed >= 0.0, "Drift speed must not be negative, got {}", speed);
        self.config.drift_speed = speed;
        self
    }

    /// Multiplier applied to the frame delta before drifting.
    ///
    /// Default: 1.5
    ///
    /// # Panics
    ///
    /// Panics if `scale < 0.0`.
    pub fn with_drift_scale(mut self, scale: f32) -> Self {
        assert!(scale >= 0.0, "Drift scale must not be negative, got {}", scale);
        self.config.drift_scale = scale;
        self
    }

    /// How far a window wanders from its origin on each axis.
    ///
    /// # Panics
    ///
    /// Panics if `range < 0.0`.
    pub fn with_drift_range(mut self, range: f32) -> Self {
        assert!(range >= 0.0, "Drift range must not be negative, got {}", range);
        self.config.drift_range = range;
        self
    }

    /// Upper bound on a realtime frame delta.
    ///
    /// # Panics
    ///
    /// Panics if `seconds <= 0.0`.
    pub fn with_max_delta_seconds(mut self, seconds: f64) -> Self {
        assert!(seconds > 0.0, "Max delta must be positive, got {}", seconds);
        self.config.max_delta_seconds = seconds;
        self
    }

    /// Sets the channel capacity for platform → app communication.
    ///
    /// Events beyond the capacity are dropped with a warning.
    ///
    /// Default: 256
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// # Panics
    ///
    /// Panics on a manual delta that is negative.
    pub fn with_time_source(mut self, source: TimeSource) -> Self {
        if let TimeSource::Manual(delta) = source {
            assert!(delta >= 0.0, "Manual delta must not be negative, got {}", delta);
        }
        self.config.time_source = source;
        self
    }

    /// Caps the frame rate by sleeping out the rest of each frame.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_max_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "Max FPS must be positive, got {}", fps);
        self.config.max_fps = Some(fps);
        self
    }

    //--- Collaborators ----------------------------------------------------

    pub fn with_platform(mut self, platform: Box<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSystem>) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Builds the app. Nothing is started until [`App::startup`] or
    /// [`App::run`].
    pub fn build(self) -> App {
        info!(
            target: "app",
            "Building app '{}' ({} startup windows, channel: {})",
            self.config.title,
            self.config.startup_window_count,
            self.config.channel_capacity
        );

        let platform = self.platform.unwrap_or_else(|| Box::new(WinitPlatform::new()));
        let renderer = self.renderer.unwrap_or_else(|| Box::new(HeadlessRenderer::new()));
        let audio = self.audio.unwrap_or_else(|| Box::new(HeadlessAudio::new()));

        App::new(self.config, platform, renderer, audio)
    }

    #[cfg(test)]
    pub(crate) fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = AppBuilder::new();
        let config = builder.config();

        assert_eq!(config.title, "FirstMultipleWindows");
        assert_eq!(config.screen_size, Vec2::new(1600.0, 800.0));
        assert_eq!(config.startup_window_count, 3);
        assert_eq!(config.interactive_window_count, 2);
        assert_eq!(config.drift_scale, 1.5);
        assert_eq!(config.channel_capacity, 256);
        assert_eq!(config.time_source, TimeSource::Realtime);
        assert!(config.max_fps.is_none());
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let builder = AppBuilder::new()
            .with_startup_window_count(5)
            .with_drift_speed(80.0)
            .with_channel_capacity(64)
            .with_time_source(TimeSource::Manual(0.02));

        let config = builder.config();
        assert_eq!(config.startup_window_count, 5);
        assert_eq!(config.drift_speed, 80.0);
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.time_source, TimeSource::Manual(0.02));
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        AppBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_window_size_panics_on_zero_height() {
        AppBuilder::new().with_window_size(400, 0);
    }

    #[test]
    #[should_panic(expected = "Max FPS must be positive")]
    fn builder_with_max_fps_panics_on_negative() {
        AppBuilder::new().with_max_fps(-30.0);
    }

    #[test]
    #[should_panic(expected = "Manual delta must not be negative")]
    fn builder_rejects_negative_manual_delta() {
        AppBuilder::new().with_time_source(TimeSource::Manual(-1.0));
    }

    #[test]
    fn window_origins_follow_layout_then_cascade() {
        let config = AppConfig::default();

        assert_eq!(config.window_origin(0), Vec2::new(100.0, 100.0));
        assert_eq!(config.window_origin(2), Vec2::new(300.0, 400.0));
        assert_eq!(config.window_origin(3), Vec2::new(340.0, 440.0));
        assert_eq!(config.window_origin(4), Vec2::new(380.0, 480.0));
    }

    #[test]
    fn window_origins_without_layout_cascade_from_zero() {
        let config = AppConfig {
            window_layout: Vec::new(),
            ..AppConfig::default()
        };
        assert_eq!(config.window_origin(2), Vec2::new(80.0, 80.0));
    }
}
