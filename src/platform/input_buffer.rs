//=========================================================================
// Input Buffer
//=========================================================================
//
// Collects converted input between two redraws.
//
// Events keep their arrival order. Consecutive cursor moves collapse
// into the latest one, so a click still lands where the cursor was when
// it happened while a burst of motion costs a single entry.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    const BASE_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(Self::BASE_CAPACITY),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        if event.is_continuous() {
            if let Some(last) = self.events.last_mut() {
                if last.is_continuous() {
                    *last = event;
                    return;
                }
            }
        }
        self.events.push(event);
    }

    /// Hands over everything buffered and starts a fresh batch.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::replace(
            &mut self.events,
            Vec::with_capacity(Self::BASE_CAPACITY),
        )
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
