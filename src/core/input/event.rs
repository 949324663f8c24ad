//=========================================================================
// Input Events
//=========================================================================
//
// Engine-side representation of keyboard and mouse input.
//
// Flow:
//   winit event ─(platform)─> InputEvent ─(core)─> StateTracker ─> scenes
//
// Only the keys a small arcade game needs are named. Anything else is
// reported as `KeyCode::Unidentified` and filtered before it reaches the
// core thread.
//
//=========================================================================

//=== MouseButton =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Side, thumb and macro buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical key, independent of keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    //--- Navigation -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Key with no mapping above.
    Unidentified,
}

impl KeyCode {
    /// Digit value for `Digit0`..`Digit9`.
    pub fn digit(self) -> Option<u8> {
        use KeyCode::*;
        let value = match self {
            Digit0 => 0,
            Digit1 => 1,
            Digit2 => 2,
            Digit3 => 3,
            Digit4 => 4,
            Digit5 => 5,
            Digit6 => 6,
            Digit7 => 7,
            Digit8 => 8,
            Digit9 => 9,
            _ => return None,
        };
        Some(value)
    }

    /// Keys that confirm a menu choice.
    pub fn is_confirm(self) -> bool {
        matches!(self, KeyCode::Enter | KeyCode::Space)
    }
}

//=== Modifiers ===========================================================

/// Shift / Ctrl / Alt state. Left and right variants are not told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Command on macOS.
    pub ctrl: bool,
    /// Alt, or Option on macOS.
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== InputEvent ==========================================================

/// One input occurrence, as batched by the platform each frame.
///
/// Cursor positions are in window pixels with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },
    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },
    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },
    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },
    MouseMoved {
        x: f32,
        y: f32,
    },
}

impl InputEvent {
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn button_down(button: MouseButton) -> Self {
        Self::MouseButtonDown {
            button,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn button_up(button: MouseButton) -> Self {
        Self::MouseButtonUp {
            button,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn mouse_moved(x: f32, y: f32) -> Self {
        Self::MouseMoved { x, y }
    }

    /// Modifier state carried by the event (`NONE` for cursor moves).
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => *modifiers,
            Self::MouseMoved { .. } => Modifiers::NONE,
        }
    }

    /// `true` for cursor movement, which the platform coalesces.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMoved { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_values() {
        assert_eq!(KeyCode::Digit0.digit(), Some(0));
        assert_eq!(KeyCode::Digit7.digit(), Some(7));
        assert_eq!(KeyCode::KeyA.digit(), None);
    }

    #[test]
    fn confirm_keys() {
        assert!(KeyCode::Enter.is_confirm());
        assert!(KeyCode::Space.is_confirm());
        assert!(!KeyCode::Escape.is_confirm());
    }

    #[test]
    fn modifier_constants() {
        assert!(Modifiers::NONE.is_empty());
        assert!(Modifiers::default().is_empty());
        assert!(Modifiers::CTRL.ctrl && !Modifiers::CTRL.shift);
        assert!(!Modifiers::ALT.is_empty());
    }

    #[test]
    fn event_modifiers() {
        let event = InputEvent::KeyDown {
            key: KeyCode::KeyS,
            modifiers: Modifiers::SHIFT,
        };
        assert_eq!(event.modifiers(), Modifiers::SHIFT);
        assert_eq!(InputEvent::mouse_moved(1.0, 2.0).modifiers(), Modifiers::NONE);
    }

    #[test]
    fn only_cursor_moves_are_continuous() {
        assert!(InputEvent::mouse_moved(0.0, 0.0).is_continuous());
        assert!(!InputEvent::button_down(MouseButton::Left).is_continuous());
        assert!(!InputEvent::key_up(KeyCode::Escape).is_continuous());
    }
}
