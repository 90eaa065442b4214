//=========================================================================
// State Tracker
//=========================================================================
//
// Held/pressed/released bookkeeping behind `InputSystem`.
//
// Per frame: clear() → process_events(batch)* → finalize_frame() → queries
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Edges ===============================================================

/// Held set plus this frame's down/up transitions for one kind of switch.
struct Edges<T> {
    held: HashSet<T>,
    went_down: HashSet<T>,
    went_up: HashSet<T>,
}

impl<T: Copy + Eq + Hash> Edges<T> {
    fn new() -> Self {
        Self {
            held: HashSet::new(),
            went_down: HashSet::new(),
            went_up: HashSet::new(),
        }
    }

    fn begin_frame(&mut self) {
        self.went_down.clear();
        self.went_up.clear();
    }

    /// A repeated down while already held is not a new press.
    fn press(&mut self, id: T) {
        if self.held.insert(id) {
            self.went_down.insert(id);
        }
    }

    fn release(&mut self, id: T) {
        if self.held.remove(&id) {
            self.went_up.insert(id);
        }
    }

    fn release_all(&mut self) {
        self.went_up.extend(self.held.drain());
    }
}

//=== StateTracker ========================================================

/// Held keys/buttons, this frame's transitions and the cursor.
pub struct StateTracker {
    keys: Edges<KeyCode>,
    buttons: Edges<MouseButton>,
    modifiers: Modifiers,

    cursor: (f32, f32),
    cursor_at_frame_start: (f32, f32),
    cursor_delta: (f32, f32),
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            keys: Edges::new(),
            buttons: Edges::new(),
            modifiers: Modifiers::NONE,
            cursor: (0.0, 0.0),
            cursor_at_frame_start: (0.0, 0.0),
            cursor_delta: (0.0, 0.0),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Forgets last frame's transitions. Held state carries over.
    pub(super) fn clear(&mut self) {
        self.keys.begin_frame();
        self.buttons.begin_frame();
        self.cursor_at_frame_start = self.cursor;
    }

    pub(super) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            match *event {
                InputEvent::KeyDown { key, modifiers } => {
                    self.modifiers = modifiers;
                    self.keys.press(key);
                }
                InputEvent::KeyUp { key, modifiers } => {
                    self.modifiers = modifiers;
                    self.keys.release(key);
                }
                InputEvent::MouseButtonDown { button, modifiers } => {
                    self.modifiers = modifiers;
                    self.buttons.press(button);
                }
                InputEvent::MouseButtonUp { button, modifiers } => {
                    self.modifiers = modifiers;
                    self.buttons.release(button);
                }
                InputEvent::MouseMoved { x, y } => self.cursor = (x, y),
                InputEvent::Unidentified => {}
            }
        }
    }

    pub(super) fn finalize_frame(&mut self) {
        let (x0, y0) = self.cursor_at_frame_start;
        self.cursor_delta = (self.cursor.0 - x0, self.cursor.1 - y0);
    }

    /// Lets go of every held key and button; each reports a release this
    /// frame.
    pub(super) fn release_all(&mut self) {
        self.keys.release_all();
        self.buttons.release_all();
        self.modifiers = Modifiers::NONE;
    }

    /// Forgets everything, held keys included.
    pub(super) fn reset(&mut self) {
        *self = Self::new();
    }

    //--- Keyboard ---------------------------------------------------------

    /// Key went down this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.went_down.contains(&key)
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.held.contains(&key)
    }

    /// Key went up this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys.went_up.contains(&key)
    }

    //--- Mouse ------------------------------------------------------------

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.went_down.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.held.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons.went_up.contains(&button)
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        self.cursor_delta
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
