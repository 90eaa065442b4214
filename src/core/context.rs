//=========================================================================
// App Context
//=========================================================================
//
// Shared subsystems handed to the game each frame.
//
// The app owns one `AppContext`; the game receives `&mut AppContext` in
// update and render instead of reaching for process-wide singletons.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::audio::AudioSystem;
use crate::core::clock::Clock;
use crate::core::event_system::EventSystem;
use crate::core::input::InputSystem;
use crate::core::quit::QuitSignal;
use crate::core::renderer::{DebugRenderSystem, Renderer};
use crate::core::window::WindowCollection;

//=== AppContext ==========================================================

pub struct AppContext {
    pub events: EventSystem,
    pub input: InputSystem,
    pub renderer: Box<dyn Renderer>,
    pub debug_render: DebugRenderSystem,
    pub audio: Box<dyn AudioSystem>,
    pub windows: WindowCollection,

    /// Root clock. Advanced once per frame by the app.
    pub system_clock: Clock,

    pub quit: QuitSignal,
}
