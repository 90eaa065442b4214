//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the OS window layer (winit) with the app.
//
// Components:
// - `interface`: the `Platform` trait and the `PlatformEvent` contract
// - `event_collector`: app-side draining of the event channel
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use interface::{Platform, PlatformEvent, WindowRequest};

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::send_event;
