//=========================================================================
// Aetheric Stage: Library Root
//
// Scene lifecycle, fade transitions and timed effects for small
// frame-driven games.
//
// Responsibilities:
// - Expose the stage (`core::scene`), effects, input, time and render
//   collaborators
// - Keep the winit integration (`platform`) private
// - Provide the `Engine` facade that runs a stage in a window
//
// Typical usage:
// ```no_run
// use aetheric_stage::prelude::*;
//
// fn main() -> Result<(), Box<dyn std::error::Error>> {
//     EngineBuilder::<Screen, Data>::new()
//         .build(Data::default())
//         .init(|stage| stage.register_default(Screen::Title, Title::new))?
//         .run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything that runs on the core thread and is usable
// without a window: the director can be driven frame by frame from tests
// or from another host loop.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window and input translation.
// `engine` wires platform and core together.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::PlatformError;
pub use engine::{Engine, EngineBuilder};
