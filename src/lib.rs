//=========================================================================
// Multiwin Library Root
//
// A small real-time app that renders one virtual screen and shows it
// through several drifting OS windows, with an attract/game state machine
// on top.
//
// Responsibilities:
// - Expose the app facade (`App`, `AppBuilder`)
// - Expose the platform-independent subsystems under `core`
// - Keep the winit backend (`platform`) behind the `Platform` trait
//
// Typical usage:
// ```no_run
// use multiwin::AppBuilder;
//
// fn main() {
//     let mut app = AppBuilder::new().build();
//     let _ = app.run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the subsystems (events, input, renderer, audio, windows,
// game) and the collaborator traits. It is public so other backends can be
// plugged in through the builder.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the winit window manager; apps only see it through
// `core::platform_bridge::Platform`.
//
// `engine` defines the app facade and its frame loop.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{App, AppBuilder, AppConfig, LoopState, TimeSource};
pub use platform::WinitPlatform;
