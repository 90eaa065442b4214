//=========================================================================
// Core
//
// Platform-independent subsystems driven by the app's frame loop.
//
// Layering (leaves first):
// ```text
//  math, clock, error, quit
//    ↓
//  event_system, input, audio, renderer
//    ↓
//  window (needs platform_bridge + renderer)
//    ↓
//  context (AppContext bundles the above)
//    ↓
//  game (reads/writes AppContext each frame)
// ```
//
// Nothing in `core` talks to the OS; the winit backend lives in
// `crate::platform` behind `platform_bridge::Platform`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod audio;
pub mod clock;
pub mod context;
pub mod error;
pub mod event_system;
pub mod game;
pub mod input;
pub mod math;
pub mod platform_bridge;
pub mod quit;
pub mod renderer;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;
