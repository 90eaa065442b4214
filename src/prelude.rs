//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use multiwin::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// App facade
pub use crate::engine::{App, AppBuilder, AppConfig, TimeSource};

// Context and errors
pub use crate::core::context::AppContext;
pub use crate::core::error::AppError;
pub use crate::core::quit::{QuitReason, QuitSignal};

// Collaborators
pub use crate::core::audio::AudioSystem;
pub use crate::core::platform_bridge::Platform;
pub use crate::core::renderer::Renderer;

// Events and input
pub use crate::core::event_system::{EventArgs, EventSystem};
pub use crate::core::input::{KeyCode, Modifiers, MouseButton};

// Game
pub use crate::core::game::{Game, GameState};
