//=========================================================================
// Input Processor
//=========================================================================
//
// Translates winit window events into engine `InputEvent`s.
//
// Architecture:
//   WindowEvent → InputProcessor → InputEvent → InputBuffer
//
// Modifier state arrives separately (`ModifiersChanged`) and is stamped
// onto every key and button event that follows. Keys without an engine
// mapping and OS key repeats are dropped here.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
        }
    }

    pub(crate) fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        };
    }

    //--- Conversion -------------------------------------------------------

    pub(crate) fn key(&self, event: &KeyEvent) -> Option<InputEvent> {
        if event.repeat {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => self.key_input(code, event.state),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    fn key_input(&self, code: WinitKeyCode, state: ElementState) -> Option<InputEvent> {
        let key = map_key(code)?;
        let modifiers = self.modifiers;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        })
    }

    pub(crate) fn button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = map_button(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    pub(crate) fn cursor(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::mouse_moved(x as f32, y as f32)
    }
}

//=== Mappings ============================================================

fn map_key(code: WinitKeyCode) -> Option<KeyCode> {
    use WinitKeyCode as W;

    let key = match code {
        W::Digit0 | W::Numpad0 => KeyCode::Digit0,
        W::Digit1 | W::Numpad1 => KeyCode::Digit1,
        W::Digit2 | W::Numpad2 => KeyCode::Digit2,
        W::Digit3 | W::Numpad3 => KeyCode::Digit3,
        W::Digit4 | W::Numpad4 => KeyCode::Digit4,
        W::Digit5 | W::Numpad5 => KeyCode::Digit5,
        W::Digit6 | W::Numpad6 => KeyCode::Digit6,
        W::Digit7 | W::Numpad7 => KeyCode::Digit7,
        W::Digit8 | W::Numpad8 => KeyCode::Digit8,
        W::Digit9 | W::Numpad9 => KeyCode::Digit9,

        W::KeyA => KeyCode::KeyA,
        W::KeyB => KeyCode::KeyB,
        W::KeyC => KeyCode::KeyC,
        W::KeyD => KeyCode::KeyD,
        W::KeyE => KeyCode::KeyE,
        W::KeyF => KeyCode::KeyF,
        W::KeyG => KeyCode::KeyG,
        W::KeyH => KeyCode::KeyH,
        W::KeyI => KeyCode::KeyI,
        W::KeyJ => KeyCode::KeyJ,
        W::KeyK => KeyCode::KeyK,
        W::KeyL => KeyCode::KeyL,
        W::KeyM => KeyCode::KeyM,
        W::KeyN => KeyCode::KeyN,
        W::KeyO => KeyCode::KeyO,
        W::KeyP => KeyCode::KeyP,
        W::KeyQ => KeyCode::KeyQ,
        W::KeyR => KeyCode::KeyR,
        W::KeyS => KeyCode::KeyS,
        W::KeyT => KeyCode::KeyT,
        W::KeyU => KeyCode::KeyU,
        W::KeyV => KeyCode::KeyV,
        W::KeyW => KeyCode::KeyW,
        W::KeyX => KeyCode::KeyX,
        W::KeyY => KeyCode::KeyY,
        W::KeyZ => KeyCode::KeyZ,

        W::ArrowUp => KeyCode::ArrowUp,
        W::ArrowDown => KeyCode::ArrowDown,
        W::ArrowLeft => KeyCode::ArrowLeft,
        W::ArrowRight => KeyCode::ArrowRight,

        W::Space => KeyCode::Space,
        W::Enter | W::NumpadEnter => KeyCode::Enter,
        W::Escape => KeyCode::Escape,
        W::Tab => KeyCode::Tab,
        W::Backspace => KeyCode::Backspace,
        W::Delete => KeyCode::Delete,

        _ => return None,
    };
    Some(key)
}

fn map_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
