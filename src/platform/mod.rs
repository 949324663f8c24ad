//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Owns the OS window and feeds input to the core thread.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  EventCollector  │
//  │   ↓                      │    │   ↓              │
//  │  InputProcessor          │    │  StateTracker    │
//  │   ↓                      │    │   ↓              │
//  │  InputBuffer             │    │  StageDirector   │
//  │   ↓                      │    └──────────────────┘
//  │  RedrawRequested (flush) │        ↑        │
//  │   ↓                      │        │        │
//  │  PlatformEvent ──────────┼────────┘        │
//  │  CoreEvent <─────────────┼─────────────────┘
//  └──────────────────────────┘
// ```
//
// Flow:
//   - RedrawRequested is the frame boundary. Buffered input goes out as
//     one `PlatformEvent::Inputs` batch; empty buffers are not sent.
//   - Closing the window sends `WindowClosed` and leaves the loop.
//   - When the core reports `Exited` (or its channel drops), the loop
//     exits at the next redraw.
//
// Winit requires the main thread on macOS/iOS, so this runs on the
// thread that called `Engine::run()`.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::platform_bridge::{CoreEvent, PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== WindowSettings ======================================================

/// Title and logical size of the window opened by `Engine::run`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Aetheric Stage".to_owned(),
            width: 1280,
            height: 720,
        }
    }
}

//=== Platform ============================================================

pub(crate) struct Platform {
    /// Created lazily in `resumed()`.
    window: Option<Window>,
    settings: WindowSettings,
    buffer: InputBuffer,
    input_processor: InputProcessor,
    event_sender: Sender<PlatformEvent>,
    core_events: Receiver<CoreEvent>,
    failure: Option<PlatformError>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub fn new(
        settings: WindowSettings,
        event_sender: Sender<PlatformEvent>,
        core_events: Receiver<CoreEvent>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            settings,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            event_sender,
            core_events,
            failure: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes or the core exits.
    ///
    /// # Errors
    ///
    /// Fails if the event loop cannot be created or aborts, or if the
    /// window cannot be opened.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn buffer_input(&mut self, event: InputEvent) {
        self.buffer.push(event);
    }

    /// Sends buffered input to the core thread.
    ///
    /// A disconnected channel means the core is gone; the batch is dropped
    /// so the window can still close normally.
    fn flush_input_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let pending = self.buffer.len();
        let batch = self.buffer.drain();

        trace!(target: "platform::input", "Flushing {} events", pending);

        if self.event_sender.send(PlatformEvent::Inputs(batch)).is_err() {
            warn!(
                target: "platform::input",
                "Channel disconnected, dropping {} events",
                pending
            );
        }
    }

    /// True once the core thread has finished.
    fn core_finished(&self) -> bool {
        match self.core_events.try_recv() {
            Ok(CoreEvent::Exited) => {
                info!(target: "platform", "Stage exited, closing window");
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!(target: "platform", "Core thread gone, closing window");
                true
            }
        }
    }

    fn notify_closed(&self) {
        if self.event_sender.send(PlatformEvent::WindowClosed).is_err() {
            debug!(target: "platform", "Core already stopped");
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                error!(target: "platform", "Window creation failed: {}", err);
                self.notify_closed();
                self.failure = Some(err.into());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.notify_closed();
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.set_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.cursor(position.x, position.y);
                self.buffer_input(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.key(&key_event) {
                    Some(event) => self.buffer_input(event),
                    None => trace!(target: "platform::input", "Key ignored: {:?}", key_event.physical_key),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.button(button, state);
                self.buffer_input(event);
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();

                if self.core_finished() {
                    event_loop.exit();
                    return;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
