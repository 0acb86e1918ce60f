use std::sync::Arc;

use wde_logger::{throw, info};
use winit::{
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
#[cfg(target_os = "windows")]
use winit::platform::windows::EventLoopBuilderExtWindows;
#[cfg(target_os = "linux")]
use winit::platform::x11::EventLoopBuilderExtX11;

/// Type of an event
pub type Event = winit::event::Event<()>;
pub type WindowEvent = winit::event::WindowEvent;
pub type WindowIndex = winit::window::WindowId;

/// Type of a loop
pub type EventLoop = winit::event_loop::EventLoop<()>;

/// Type of the window event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopEvent {
    Close,
    Redraw,
}

/// Window handler.
/// The event loop may run on a thread other than the main one, the window is then sent to the render thread.
///
/// # Example
///
/// ```ignore
/// let mut window = Window::new(1280, 720, "Terrain");
///
/// // Create window and event loop
/// let event_loop = window.create();
/// let window_index = window.run(&event_loop);
///
/// // Hand the window to the renderer, then run the event loop
/// event_loop.run(move |event, elwt| { ... });
/// ```
#[derive(Debug)]
pub struct Window {
    pub title: String,
    pub init_size: (u32, u32),
    pub window: Option<Arc<winit::window::Window>>
}

impl Window {
    /// Create a new os window description.
    ///
    /// # Arguments
    ///
    /// * `width` - Width of the window.
    /// * `height` - Height of the window.
    /// * `title` - Title of the window.
    #[tracing::instrument]
    pub fn new(width: u32, height: u32, title: &str) -> Self {
        info!(width, height, "Creating new window.");

        Self {
            title: title.to_string(),
            init_size: (width, height),
            window: None
        }
    }

    /// Create the window and its event loop.
    /// If the event loop or window fails to be created, the application will panic.
    ///
    /// # Returns
    ///
    /// * `event_loop` - The event loop of the window.
    #[tracing::instrument]
    pub fn create(&mut self) -> EventLoop {
        info!("Creating window.");

        let mut builder = EventLoopBuilder::new();
        #[cfg(any(target_os = "windows", target_os = "linux"))]
        builder.with_any_thread(true);
        let event_loop = builder.build()
            .unwrap_or_else(|e| throw!("Failed to create event loop : {:?}.", e));

        let window = WindowBuilder::new()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(self.init_size.0, self.init_size.1))
            .with_min_inner_size(winit::dpi::PhysicalSize::new(1, 1))
            .with_resizable(true)
            .with_visible(true)
            .with_decorations(true)
            .build(&event_loop)
            .unwrap_or_else(|e| throw!("Failed to create window '{}' : {:?}.", self.title, e));

        // Physical size may differ from the requested one on scaled displays
        let size = window.inner_size();
        self.init_size = (size.width.max(1), size.height.max(1));
        self.window = Some(Arc::new(window));

        event_loop
    }

    /// Prepare the event loop to run.
    ///
    /// # Arguments
    ///
    /// * `event_loop` - The event loop of the window.
    ///
    /// # Returns
    ///
    /// * `window_index` - The index of the window.
    #[tracing::instrument]
    pub fn run(&self, event_loop: &EventLoop) -> WindowIndex {
        info!("Starting window main loop.");

        let window_index = match self.window.as_ref() {
            Some(window) => window.id(),
            None => throw!("Window is not created. Call 'create()' before 'run()'."),
        };
        // Poll events even when the application is not focused
        event_loop.set_control_flow(ControlFlow::Poll);

        window_index
    }
}

impl Drop for Window {
    #[tracing::instrument]
    fn drop(&mut self) {
        info!("Dropping window.");
    }
}
