//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between the OS window layer and the app.
//
// Commands flow app → platform through the `Platform` trait; everything the
// OS reports flows platform → app as `PlatformEvent`s on a bounded channel
// that the app drains once per frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use glam::{IVec2, Vec2};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::error::PlatformError;
use crate::core::input::event::InputEvent;
use crate::core::window::{DisplayContext, WindowHandle};

//=== PlatformEvent =======================================================

/// Events sent from the platform to the app.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// Batched input since the previous flush.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// A requested window now exists.
    WindowCreated {
        handle: WindowHandle,
        title: String,
        /// Outer position on the desktop (logical pixels, top-left origin).
        position: Vec2,
        client_dimensions: IVec2,
    },

    /// A requested window could not be created. Its handle is never reused.
    WindowCreationFailed { handle: WindowHandle, reason: String },

    /// Client area changed size, in logical pixels. Zero dimensions mean
    /// minimized.
    WindowResized {
        handle: WindowHandle,
        client_dimensions: IVec2,
    },

    /// The user asked to close a window.
    CloseRequested { handle: WindowHandle },

    /// A window lost keyboard focus; held input will never see its release.
    FocusLost { handle: WindowHandle },

    /// The OS event loop ended on its own.
    LoopExited,
}

//=== WindowRequest =======================================================

/// Parameters for [`Platform::request_window`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRequest {
    pub title: String,
    pub position: Vec2,
    pub client_dimensions: IVec2,
}

//=== Platform ============================================================

/// OS window manager.
///
/// Window creation is asynchronous: `request_window` reserves a handle and
/// the window is announced later with [`PlatformEvent::WindowCreated`].
pub trait Platform {
    /// Starts the OS event loop; events go to `sender`.
    fn startup(&mut self, sender: Sender<PlatformEvent>) -> Result<(), PlatformError>;

    /// Closes every remaining window and drops the event loop.
    fn shutdown(&mut self);

    /// Processes pending OS messages without blocking.
    fn pump_messages(&mut self);

    fn request_window(&mut self, request: WindowRequest) -> Result<WindowHandle, PlatformError>;

    fn destroy_window(&mut self, handle: WindowHandle);

    /// Hands out the window's drawing context. One per window at a time.
    fn acquire_display_context(&mut self, handle: WindowHandle)
        -> Result<DisplayContext, PlatformError>;

    /// Takes back a context from [`acquire_display_context`](Self::acquire_display_context).
    fn release_display_context(&mut self, context: DisplayContext);

    /// Moves the window's outer frame to `position` (desktop pixels).
    fn set_window_position(&mut self, handle: WindowHandle, position: Vec2);
}

//=== Sending =============================================================

/// Sends without blocking. A full or disconnected channel drops the event.
///
/// Returns `false` when the event was dropped.
pub(crate) fn send_event(sender: &Sender<PlatformEvent>, event: PlatformEvent) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            warn!(target: "platform", "Event queue full, dropping {:?}", event);
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            warn!(target: "platform", "Event queue disconnected, dropping event");
            false
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn send_event_drops_when_full() {
        let (tx, rx) = bounded(1);

        assert!(send_event(&tx, PlatformEvent::LoopExited));
        assert!(!send_event(&tx, PlatformEvent::LoopExited));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_event_survives_disconnect() {
        let (tx, rx) = bounded(4);
        drop(rx);
        assert!(!send_event(&tx, PlatformEvent::CloseRequested { handle: WindowHandle::new(1) }));
    }

    #[test]
    fn platform_event_is_debug() {
        let event = PlatformEvent::CloseRequested { handle: WindowHandle::new(3) };
        assert!(format!("{:?}", event).contains("CloseRequested"));
    }
}
