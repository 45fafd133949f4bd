//! Application event loop of the viewer.
//!
//! The loop owns the [`FrameRenderer`] and the GPU [`Context`]. Window events
//! are translated into camera and scene-state changes; every redraw plans one
//! frame and replays it into the context.
//!
//! # Lifecycle
//!
//! 1. `run` builds the scene on the CPU before any window exists
//! 2. `resumed` creates the window and the context, uploads the scene buffer
//!    and starts loading textures on the tokio runtime
//! 3. decoded textures come back as [`OrreryEvent::TextureLoaded`] and
//!    replace their placeholders
//! 4. each `RedrawRequested` advances the clock by the elapsed time and draws
//!
//! # Controls
//!
//! - left drag tumbles the camera, the wheel zooms
//! - `+` / `-` change the speed factor by 0.1
//! - `R` shows or hides the orbit guides

use std::{fmt::Debug, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::Key,
    window::{Window, WindowId},
};

use crate::{
    camera::Zoom,
    context::Context,
    data_structures::scene_buffer::TextureRef,
    render::FrameRenderer,
    resources::texture::{DecodedTexture, load_texture},
    scene::Scene,
    settings::Settings,
};

/// Speed factor change per key press.
pub const SPEED_STEP: f32 = 0.1;

pub enum OrreryEvent {
    TextureLoaded(DecodedTexture),
}

impl Debug for OrreryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextureLoaded(decoded) => f
                .debug_tuple("TextureLoaded")
                .field(&decoded.texture)
                .finish(),
        }
    }
}

/// Left-button drag tracking.
#[derive(Debug, Default)]
struct Pointer {
    dragging: bool,
    last: Option<PhysicalPosition<f64>>,
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<OrreryEvent>,
    settings: Settings,
    renderer: FrameRenderer,
    textures: Vec<TextureRef>,
    ctx: Option<Context>,
    pointer: Pointer,
    last_time: Instant,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(
        event_loop: &EventLoop<OrreryEvent>,
        settings: Settings,
        scene: Scene,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        let async_runtime = tokio::runtime::Runtime::new()?;
        let textures = scene.textures();
        let renderer = FrameRenderer::new(scene, &settings);
        Ok(Self {
            async_runtime,
            proxy,
            settings,
            renderer,
            textures,
            ctx: None,
            pointer: Pointer::default(),
            last_time: Instant::now(),
            init_error: None,
        })
    }

    fn spawn_texture_loads(&self) {
        for texture in &self.textures {
            let texture = texture.clone();
            let asset_dir = self.settings.asset_dir.clone();
            let proxy = self.proxy.clone();
            self.async_runtime.spawn(async move {
                let name = texture.name().to_string();
                match load_texture(&asset_dir, texture).await {
                    Ok(decoded) => {
                        if proxy.send_event(OrreryEvent::TextureLoaded(decoded)).is_err() {
                            log::debug!("event loop closed before {} arrived", name);
                        }
                    }
                    Err(e) => log::warn!("keeping placeholder for {}: {:#}", name, e),
                }
            });
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        if let Some(ctx) = &mut self.ctx {
            ctx.resize(width, height);
        }
    }

    fn on_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let state = self.renderer.state_mut();
        match event.logical_key.as_ref() {
            Key::Character("+") | Key::Character("=") => {
                state.adjust_speed_factor(SPEED_STEP);
                log::info!("speed factor {:.1}", state.clock.speed_factor);
            }
            Key::Character("-") => {
                state.adjust_speed_factor(-SPEED_STEP);
                log::info!("speed factor {:.1}", state.clock.speed_factor);
            }
            Key::Character("r") | Key::Character("R") => {
                state.toggle_orbit_guides();
                log::info!("orbit guides visible: {}", state.show_orbit_guides);
            }
            _ => {}
        }
    }

    fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        if self.pointer.dragging {
            if let Some(last) = self.pointer.last {
                let dx = (position.x - last.x) as f32;
                let dy = (position.y - last.y) as f32;
                self.renderer.state_mut().on_drag_delta(dx, dy);
            }
        }
        self.pointer.last = Some(position);
    }

    fn on_wheel(&mut self, delta: MouseScrollDelta) {
        // winit reports scrolling away from the user as positive
        let towards_user = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y as f64,
            MouseScrollDelta::PixelDelta(pos) => -pos.y,
        };
        if let Some(zoom) = Zoom::from_wheel_delta(towards_user) {
            self.renderer.state_mut().on_scroll(zoom);
        }
    }
}

impl ApplicationHandler<OrreryEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes().with_title("Orrery");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create a window: {}", e);
                self.init_error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let init = Context::new(
            window,
            self.renderer.buffer(),
            self.settings.clear_colour,
        );
        let ctx = match self.async_runtime.block_on(init) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::error!("App initialization failed. Cannot create the main context: {:#}", e);
                self.init_error = Some(e);
                event_loop.exit();
                return;
            }
        };
        let size = ctx.window().inner_size();
        ctx.window().request_redraw();
        self.ctx = Some(ctx);
        self.resize(size.width, size.height);

        self.spawn_texture_loads();
        self.last_time = Instant::now();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: OrreryEvent) {
        match event {
            OrreryEvent::TextureLoaded(decoded) => {
                if let Some(ctx) = &mut self.ctx {
                    ctx.install_texture(decoded);
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.ctx.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => self.on_key(&event),
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.pointer.dragging = state.is_pressed();
            }
            WindowEvent::CursorMoved { position, .. } => self.on_cursor_moved(position),
            WindowEvent::CursorLeft { .. } => self.pointer.last = None,
            WindowEvent::MouseWheel { delta, .. } => self.on_wheel(delta),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                if let Some(ctx) = &mut self.ctx {
                    self.renderer.render_frame(dt, ctx);
                    // invoke main render loop
                    ctx.window().request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Builds the default scene and runs the viewer until its window closes.
///
/// Fails if no window or GPU context could be created.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let scene = Scene::build(&settings)?;
    let event_loop: EventLoop<OrreryEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, settings, scene)?;

    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
