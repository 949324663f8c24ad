//=========================================================================
// Platform Bridge
//=========================================================================
//
// The contract between the winit platform thread and the core thread.
//
// Components:
// - `interface`: messages in both directions and `PlatformError`
// - `event_collector`: core-side draining of platform messages
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::{CoreEvent, PlatformEvent};
pub use interface::PlatformError;
