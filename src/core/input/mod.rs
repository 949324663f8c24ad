//=========================================================================
// Input
//=========================================================================
//
// Keyboard and mouse input as seen by scenes.
//
// The platform thread converts window events into `InputEvent` batches;
// the core thread folds each frame's batches into a `StateTracker` and
// hands it to the director by reference.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use state_tracker::StateTracker;
