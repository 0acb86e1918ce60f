use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{span, Level};
use wde_logger::{debug, error, info, throw, trace};
use wde_resources::{HeightmapResource, LoadError, ResourceDescription, ResourceHandle, ResourceType, ResourcesManager, ShaderResource};
use wde_wgpu::{Event, LoopEvent, RenderError, RenderEvent, RenderInstance, Window, WindowEvent};

use crate::{Renderer, Scene, TerrainConfig, TerrainShaders};

/// Terrain shaders, relative to the executable.
const TERRAIN_VERTEX_SHADER: &str = "res/shaders/terrain/vert.wgsl";
const TERRAIN_FRAGMENT_SHADER: &str = "res/shaders/terrain/frag.wgsl";

/// Number of frames of the FPS average.
const FPS_FRAMES: usize = 40;

/// Errors stopping the viewer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("resource '{0}' is not loaded")]
    MissingResource(String),
    #[error("window thread stopped before sending the window")]
    Window,
    #[error("render failed : {0:?}")]
    Render(RenderError),
}

/// Data the scene is built from.
struct SceneResources {
    res_manager: ResourcesManager,
    heightmap: ResourceHandle,
    vertex_shader: ResourceHandle,
    fragment_shader: ResourceHandle,
}

impl SceneResources {
    /// Start loading the heightmap and the shaders, and wait for them.
    #[tracing::instrument(skip(config))]
    async fn load(config: &TerrainConfig) -> Result<Self, AppError> {
        let mut res_manager = ResourcesManager::new();
        let heightmap = res_manager.load::<HeightmapResource>(ResourceDescription::new(
            "Heightmap", ResourceType::Heightmap, &config.heightmap));
        let vertex_shader = res_manager.load::<ShaderResource>(ResourceDescription::new(
            "Terrain vertex", ResourceType::Shader, TERRAIN_VERTEX_SHADER));
        let fragment_shader = res_manager.load::<ShaderResource>(ResourceDescription::new(
            "Terrain fragment", ResourceType::Shader, TERRAIN_FRAGMENT_SHADER));

        res_manager.wait_loaded().await?;

        Ok(Self { res_manager, heightmap, vertex_shader, fragment_shader })
    }

    fn shader(&self, handle: &ResourceHandle) -> Result<&str, AppError> {
        self.res_manager.get::<ShaderResource>(handle)
            .and_then(|shader| shader.data.as_deref())
            .ok_or_else(|| AppError::MissingResource(handle.label.clone()))
    }
}


/// The terrain viewer.
///
/// # Example
///
/// ```ignore
/// let config = TerrainConfig::load_default()?;
/// App::new(config).run().await?;
/// ```
#[derive(Debug)]
pub struct App {
    config: TerrainConfig,
}

impl App {
    pub fn new(config: TerrainConfig) -> Self {
        App { config }
    }

    /// Load the terrain, open the window and render until the window is closed.
    ///
    /// # Errors
    ///
    /// * `AppError::Load` - The heightmap or a shader cannot be loaded. Nothing is rendered.
    /// * `AppError::Render` - A frame cannot be recorded.
    pub async fn run(self) -> Result<(), AppError> {
        debug!("======== Starting viewer ========");
        let config = self.config;


        // ======== RESOURCES LOADING ========
        let resources = match SceneResources::load(&config).await {
            Ok(resources) => resources,
            Err(e) => {
                error!("Failed to load the terrain : {}.", e);
                return Err(e);
            }
        };



        // ======== WINDOW CREATION ========
        let _window_creation_span = span!(Level::INFO, "window_init").entered();
        let mut window = Window::new(config.window.width, config.window.height, &config.window.title);

        // Create channel to send the window to the runtime
        let (window_t, mut window_r) = mpsc::unbounded_channel();

        // Run window
        trace!("Starting window.");
        let (event_t, mut event_r) = mpsc::unbounded_channel();
        let (event_relay_t, mut event_relay_r) = mpsc::unbounded_channel::<()>();
        let (resize_t, mut resize_r) = mpsc::unbounded_channel();
        let (exit_t, mut exit_r) = mpsc::unbounded_channel::<()>();
        let window_join = std::thread::spawn(move || {
            // Create event loop
            let event_loop = window.create();
            let window_index = window.run(&event_loop);

            // Send window to the runtime
            if window_t.send(window).is_err() {
                return;
            }

            // Run event loop
            event_loop.run(move |event, elwt| {
                match event {
                    // Close window when the close button is pressed
                    Event::WindowEvent {
                        event: WindowEvent::CloseRequested,
                        window_id,
                    } if window_id == window_index => {
                        info!("Closing window.");
                        let _ = event_t.send(LoopEvent::Close);
                        elwt.exit();
                    },

                    // Resize window when requested
                    Event::WindowEvent {
                        event: WindowEvent::Resized(size),
                        window_id,
                    } if window_id == window_index => {
                        if resize_t.send((size.width, size.height)).is_err() {
                            elwt.exit();
                        }
                    },

                    // Ask for a frame when all events are processed
                    Event::AboutToWait => {
                        // Stop when asked to, or when the runtime is gone
                        if !matches!(exit_r.try_recv(), Err(TryRecvError::Empty)) {
                            elwt.exit();
                        }
                        else if event_relay_r.try_recv().is_ok() {
                            let _event_loop_wait_span = span!(Level::INFO, "event_loop_wait").entered();
                            if event_t.send(LoopEvent::Redraw).is_err() {
                                elwt.exit();
                            }
                        }
                    },

                    // Ignore other events
                    _ => ()
                }
            }).unwrap_or_else(|e| {
                throw!("Failed to run event loop : {:?}.", e);
            });
        });
        drop(_window_creation_span);



        // ======== RENDERER INITIALIZATION ========
        let window = window_r.recv().await.ok_or(AppError::Window)?;
        let mut window_size = window.init_size;
        let mut render_instance = RenderInstance::new("Terrain", &window).await;

        let _scene_initialization_span = span!(Level::INFO, "scene_init").entered();
        let heightmap = resources.res_manager.get::<HeightmapResource>(&resources.heightmap)
            .and_then(|heightmap| heightmap.data.as_ref())
            .ok_or_else(|| AppError::MissingResource(resources.heightmap.label.clone()))?;
        let mut scene = Scene::new(&config, heightmap, render_instance.surface_size());
        drop(_scene_initialization_span);

        let _renderer_initialization_span = span!(Level::INFO, "renderer_init").entered();
        let shaders = TerrainShaders {
            vertex: resources.shader(&resources.vertex_shader)?,
            fragment: resources.shader(&resources.fragment_shader)?,
        };
        let mut renderer = Renderer::new(&render_instance, &scene, shaders).map_err(AppError::Render)?;
        drop(_renderer_initialization_span);



        // ======== MAIN LOOP ========
        let mut result = Ok(());
        let mut last_fps_time = std::time::Instant::now();
        let mut fps_frames = [0.0; FPS_FRAMES];
        let mut fps_frames_index = 0;

        loop {
            // Ask the event loop for the next frame, and wait for it
            let _ = event_relay_t.send(());
            match event_r.recv().await {
                Some(LoopEvent::Redraw) => (),
                Some(LoopEvent::Close) | None => break,
            }

            let _next_frame_span = span!(Level::INFO, "next_frame").entered();
            trace!("======== Next frame ========");

            // ====== Handle resize ======
            if let Ok(mut size) = resize_r.try_recv() {
                trace!("Handling resize event due to window event.");

                // Make sure to get the last resize event
                while let Ok(next) = resize_r.try_recv() {
                    size = next;
                }
                window_size = size;
                Self::resize(&mut render_instance, &mut renderer, &mut scene, window_size);
            }

            // ====== Render ======
            {
                let _render_span = span!(Level::INFO, "render").entered();
                renderer.update(&render_instance, &mut scene);

                // Acquire render texture
                let mut should_resize = false;
                match RenderInstance::get_current_texture(&render_instance) {
                    RenderEvent::Redraw(render_texture) => {
                        let rendered = renderer.render(&render_instance, &scene, &render_texture);
                        if let Err(e) = render_instance.present(render_texture) {
                            error!("Failed to present frame : {:?}.", e);
                        }

                        if let Err(e) = rendered {
                            error!("Failed to render frame : {:?}.", e);
                            result = Err(AppError::Render(e));
                            break;
                        }
                    },
                    RenderEvent::Close => {
                        info!("Closing viewer.");
                        break;
                    },
                    RenderEvent::Resize(_, _) => {
                        should_resize = true;
                    },
                    RenderEvent::None => {},
                }

                if should_resize {
                    debug!("Handling resize event due to render event.");
                    Self::resize(&mut render_instance, &mut renderer, &mut scene, window_size);
                }
            }

            // ====== Frame statistics ======
            let fps = 1.0 / last_fps_time.elapsed().as_secs_f32().max(f32::EPSILON);
            last_fps_time = std::time::Instant::now();
            fps_frames[fps_frames_index] = fps;
            fps_frames_index += 1;
            if fps_frames_index >= FPS_FRAMES {
                fps_frames_index = 0;
                info!("FPS: {:.2}", fps_frames.iter().sum::<f32>() / FPS_FRAMES as f32);
            }
        }

        // End
        debug!("======== Ending viewer ========");
        let _ = exit_t.send(());

        // Join window thread
        info!("Joining window thread.");
        {
            let _window_join_span = span!(Level::INFO, "window_join").entered();
            if window_join.join().is_err() {
                error!("Window thread panicked.");
            }
        }

        result
    }

    /// Resize the surface and everything that depends on its size.
    fn resize(render_instance: &mut RenderInstance, renderer: &mut Renderer, scene: &mut Scene, (width, height): (u32, u32)) {
        if let Err(e) = render_instance.resize(width, height) {
            error!("Failed to resize render instance : {:?}.", e);
            return;
        }
        renderer.resize(render_instance, width, height);
        scene.resize(width, height);
    }
}
