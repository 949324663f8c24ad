//=========================================================================
// State Tracker
//=========================================================================
//
// Per-frame input state for scenes.
//
// Architecture:
//   Vec<Vec<InputEvent>> ─> begin_frame() ─> apply() ─> end_frame()
//                                                          ↓
//                           is_key_pressed / is_clicked / mouse_position
//
// Held keys and buttons persist across frames. Pressed and released sets
// only cover the events folded in since the last `begin_frame`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};
use crate::core::render::Rect;

//=== StateTracker ========================================================

/// Keyboard and mouse state as of the current frame.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    //--- Persistent State -------------------------------------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f32, f32),
    modifiers: Modifiers,

    //--- Frame Deltas -----------------------------------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    mouse_delta: (f32, f32),
    frame_origin: (f32, f32),
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Folds one frame's batches in, replacing last frame's deltas.
    pub fn advance_frame(&mut self, batches: &[Vec<InputEvent>]) {
        self.begin_frame();
        for batch in batches {
            self.apply(batch);
        }
        self.end_frame();
    }

    /// Forgets last frame's pressed and released sets.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.frame_origin = self.mouse_position;
    }

    /// Applies events in order.
    pub fn apply(&mut self, events: &[InputEvent]) {
        for event in events {
            self.apply_event(event);
        }
    }

    /// Computes the mouse delta for the frame.
    pub fn end_frame(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.frame_origin.0,
            self.mouse_position.1 - self.frame_origin.1,
        );
    }

    fn apply_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = modifiers;
                // Repeats while held are not new presses.
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }
            InputEvent::MouseMoved { x, y } => {
                self.mouse_position = (x, y);
            }
        }
    }

    //--- Keyboard ---------------------------------------------------------

    /// Went down this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Currently held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Went up this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn any_key_pressed(&self) -> bool {
        !self.keys_pressed.is_empty()
    }

    pub fn keys_pressed(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_pressed.iter()
    }

    //--- Mouse ------------------------------------------------------------

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Left button went down this frame.
    pub fn is_clicked(&self) -> bool {
        self.is_button_pressed(MouseButton::Left)
    }

    /// Left button went down this frame with the cursor inside `area`.
    pub fn is_clicked_in(&self, area: Rect) -> bool {
        self.is_clicked() && self.is_hovering(area)
    }

    pub fn is_hovering(&self, area: Rect) -> bool {
        area.contains(self.mouse_position)
    }

    /// Cursor position in window pixels.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Cursor movement since the previous frame.
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    //--- Modifiers --------------------------------------------------------

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn shift_held(&self) -> bool {
        self.modifiers.shift
    }

    pub fn ctrl_held(&self) -> bool {
        self.modifiers.ctrl
    }

    pub fn alt_held(&self) -> bool {
        self.modifiers.alt
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
