//! Tidewave - animated procedural ocean viewer
//!
//! Keys: 1/2/3/4 weather (calm, choppy, stormy, default), F wireframe,
//! V visibility, Space ripple at the origin, left click ripple under the
//! cursor, Esc quit.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use glam::{Vec2, Vec3};
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use tidewave::camera::CameraSystem;
use tidewave::cli::Args;
use tidewave::ocean::{HeightFieldAnimator, DEFAULT_RIPPLE_INTENSITY};
use tidewave::params::{ConfigPatch, RenderConfig, SurfaceConfig, ViewCamera, WeatherPreset};
use tidewave::rendering::RenderSystem;
use tidewave::scene::HeadlessScene;

/// Fixed step for headless simulation
const HEADLESS_DT_S: f32 = 1.0 / 60.0;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    ocean: HeightFieldAnimator,
    camera: CameraSystem,
    startup_weather: Option<WeatherPreset>,

    // Ripples requested since the last frame (world positions)
    pending_ripples: Vec<Vec3>,
    cursor: Vec2,

    render_config: RenderConfig,
    last_frame: Instant,
}

impl App {
    fn new(config: SurfaceConfig, startup_weather: Option<WeatherPreset>) -> Self {
        Self {
            window: None,
            render_system: None,
            ocean: HeightFieldAnimator::new(config),
            camera: CameraSystem::new(ViewCamera::default()),
            startup_weather,
            pending_ripples: Vec::new(),
            cursor: Vec2::ZERO,
            render_config: RenderConfig::default(),
            last_frame: Instant::now(),
        }
    }

    fn queue_ripple_at_cursor(&mut self) {
        let plane_y = self.ocean.config.surface_elevation;
        match self
            .camera
            .pick_plane(self.cursor, &self.render_config, plane_y)
        {
            Some(point) => self.pending_ripples.push(point),
            None => info!("Click missed the ocean plane"),
        }
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        match key {
            KeyCode::Escape => self.shutdown(event_loop),
            KeyCode::Digit1 => self.ocean.apply_preset(WeatherPreset::Calm),
            KeyCode::Digit2 => self.ocean.apply_preset(WeatherPreset::Choppy),
            KeyCode::Digit3 => self.ocean.apply_preset(WeatherPreset::Stormy),
            KeyCode::Digit4 => self.ocean.apply_preset(WeatherPreset::Default),
            KeyCode::KeyF => {
                let wireframe = !self.ocean.config.wireframe;
                self.ocean
                    .set_properties(&ConfigPatch::default().with_wireframe(wireframe));
            }
            KeyCode::KeyV => {
                let visible = self.ocean.renderable().map_or(true, |r| r.visible);
                self.ocean.toggle_visibility(!visible);
            }
            KeyCode::Space => {
                let y = self.ocean.config.surface_elevation;
                self.pending_ripples.push(Vec3::new(0.0, y, 0.0));
            }
            _ => {}
        }
    }

    /// Remove the surface from the renderer and stop the event loop
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(render_system) = self.render_system.as_mut() {
            self.ocean.cleanup(render_system);
        }
        event_loop.exit();
    }

    /// Advance the simulation and render a single frame
    fn render_frame(&mut self) {
        let now = Instant::now();
        let elapsed_s = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        // Ripples go after the base update, otherwise it would overwrite them
        self.ocean.update(elapsed_s);
        for point in self.pending_ripples.drain(..) {
            self.ocean
                .create_ripple(point.x, point.z, DEFAULT_RIPPLE_INTENSITY);
        }

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };
        let handle = self.ocean.handle();
        if let (Some(handle), Some(renderable)) = (handle, self.ocean.renderable_mut()) {
            render_system.sync_surface(handle, renderable);
        }

        let view_proj = self.camera.view_proj(&self.render_config);
        match render_system.render(view_proj, self.camera.eye()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => render_system.resize(
                self.render_config.window_width,
                self.render_config.window_height,
            ),
            Err(e) => error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Tidewave")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        self.render_config.window_width = size.width.max(1);
        self.render_config.window_height = size.height.max(1);

        let mut render_system =
            match pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.render_config)) {
                Ok(render_system) => render_system,
                Err(e) => {
                    error!("Failed to initialize renderer: {}", e);
                    event_loop.exit();
                    return;
                }
            };

        if let Err(e) = self.ocean.initialize(Some(&mut render_system)) {
            error!("{}", e);
            event_loop.exit();
            return;
        }
        if let Some(preset) = self.startup_weather {
            self.ocean.apply_preset(preset);
        }

        info!("Tidewave is running (Esc to quit)");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                self.render_config.window_width = size.width.max(1);
                self.render_config.window_height = size.height.max(1);
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.queue_ripple_at_cursor(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(key, event_loop),
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }
}

/// Simulate `frames` steps against an in-memory scene and log height statistics
fn run_headless(
    config: SurfaceConfig,
    weather: Option<WeatherPreset>,
    frames: u32,
) -> anyhow::Result<()> {
    let mut scene = HeadlessScene::new();
    let mut ocean = HeightFieldAnimator::new(config);
    ocean
        .initialize(Some(&mut scene))
        .context("failed to initialize headless surface")?;
    if let Some(preset) = weather {
        ocean.apply_preset(preset);
    }

    for frame in 0..frames {
        ocean.update(HEADLESS_DT_S);
        // One ripple per simulated second, at the origin
        if frame % 60 == 0 {
            ocean.create_ripple(0.0, 0.0, DEFAULT_RIPPLE_INTENSITY);
        }
        if frame % 60 == 0 || frame + 1 == frames {
            if let Some(renderable) = ocean.renderable() {
                let (min, max, sum) = renderable.geometry.heights().fold(
                    (f32::INFINITY, f32::NEG_INFINITY, 0.0),
                    |(min, max, sum), h| (min.min(h), max.max(h), sum + h),
                );
                let mean = sum / renderable.geometry.vertex_count() as f32;
                info!(
                    "frame {:>5} t={:.3} height min {:.3} max {:.3} mean {:.4}",
                    frame,
                    ocean.clock_time().unwrap_or_default(),
                    min,
                    max,
                    mean
                );
            }
        }
    }

    ocean.cleanup(&mut scene);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args
        .surface_config()
        .context("invalid surface configuration")?;
    let weather = args.weather_preset();

    if let Some(frames) = args.headless {
        return run_headless(config, weather, frames);
    }

    let mut app = App::new(config, weather);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
