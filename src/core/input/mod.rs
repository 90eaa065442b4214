//=========================================================================
// Input System
//
// Frame-coherent keyboard and mouse queries for the app and the game.
//
// Responsibilities:
// - Receive batches of platform-independent `InputEvent`s each frame
// - Maintain level state (held) and edge state (pressed/released this frame)
// - Expose read-only queries used by the game and the frame loop
//
// Frame contract (driven by the App in BeginFrame):
//   begin_frame() → process_events() × N → finalize_frame() → queries
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Internal Imports ====================================================

use state_tracker::StateTracker;

//=== External Crates =====================================================

use log::{debug, trace};

//=== InputSystem =========================================================

/// Owns the input state for the running app.
pub struct InputSystem {
    tracker: StateTracker,
    events_this_frame: usize,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            tracker: StateTracker::new(),
            events_this_frame: 0,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn startup(&mut self) {
        debug!(target: "input", "Input system started");
    }

    pub fn shutdown(&mut self) {
        self.tracker.reset();
        debug!(target: "input", "Input system shut down");
    }

    //--- Frame Processing -------------------------------------------------

    /// Drops last frame's edges. Held keys stay held.
    pub fn begin_frame(&mut self) {
        self.tracker.clear();
        self.events_this_frame = 0;
    }

    /// Applies one batch from the platform, in arrival order.
    pub fn process_events(&mut self, events: &[InputEvent]) {
        self.events_this_frame += events.len();
        self.tracker.process_events(events);
    }

    pub fn finalize_frame(&mut self) {
        self.tracker.finalize_frame();
        if self.events_this_frame > 0 {
            trace!(target: "input", "{} input events this frame", self.events_this_frame);
        }
    }

    /// Releases every held key and button, e.g. when the app loses focus.
    ///
    /// Each one reports `was_key_just_released` this frame.
    pub fn release_all(&mut self) {
        self.tracker.release_all();
        debug!(target: "input", "Released all held input");
    }

    //--- Keyboard Queries -------------------------------------------------

    /// `true` on the frame the key went down.
    pub fn was_key_just_pressed(&self, key: KeyCode) -> bool {
        self.tracker.is_key_pressed(key)
    }

    /// `true` on the frame the key went up.
    pub fn was_key_just_released(&self, key: KeyCode) -> bool {
        self.tracker.is_key_released(key)
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.tracker.is_key_down(key)
    }

    //--- Mouse Queries ----------------------------------------------------

    pub fn was_button_just_pressed(&self, button: MouseButton) -> bool {
        self.tracker.is_button_pressed(button)
    }

    pub fn was_button_just_released(&self, button: MouseButton) -> bool {
        self.tracker.is_button_released(button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.tracker.is_button_down(button)
    }

    /// Cursor position in client pixels of the window that last reported it.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.tracker.mouse_position()
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        self.tracker.mouse_delta()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.tracker.modifiers()
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
