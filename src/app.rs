//! Fenêtre, contexte OpenGL et boucle d'événements

use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use winit::dpi::LogicalSize;
use winit::event::{Event, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use crate::camera::{aspect_ratio, Camera};
use crate::config::AppConfig;
use crate::gpu::SceneRenderer;
use crate::input::{InputEvent, KeyBindings};
use crate::logging::APP;
use crate::scene::SceneState;

/// Application principale
pub struct SandboxApp {
    pub config: AppConfig,
}

/// Fenêtre et contexte GL créés ensemble
struct GlWindowContext {
    window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    gl: Rc<glow::Context>,
}

impl SandboxApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        let gl_window = create_gl_window(&event_loop, &self.config)?;

        let bindings = KeyBindings::from_config(&self.config.input)?;
        let mut scene = SceneState::new(Camera::from_config(&self.config.camera), bindings);

        let size = gl_window.window.inner_size();
        let mut aspect = aspect_ratio(size.width, size.height);
        unsafe {
            gl_window.gl.enable(glow::DEPTH_TEST);
        }

        let renderer = SceneRenderer::new(gl_window.gl.clone(), &self.config.assets, self.config.lighting.clone())?;
        renderer.set_viewport(size.width, size.height);

        grab_cursor(&gl_window.window);
        info!(target: APP, "Démarrage de la boucle de rendu");

        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => {
                match event {
                    WindowEvent::CloseRequested => scene.request_quit(),
                    WindowEvent::Resized(size) => {
                        if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                            gl_window.surface.resize(&gl_window.context, w, h);
                            renderer.set_viewport(size.width, size.height);
                            aspect = aspect_ratio(size.width, size.height);
                        }
                    }
                    WindowEvent::Focused(false) => scene.input.clear(),
                    WindowEvent::KeyboardInput { event, .. } => {
                        if let PhysicalKey::Code(code) = event.physical_key {
                            scene.apply(InputEvent::Key { code, state: event.state });
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        scene.apply(InputEvent::CursorMoved { x: position.x, y: position.y });
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let delta_y = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(p) => (p.y / 20.0) as f32,
                        };
                        scene.apply(InputEvent::Scroll { delta_y });
                    }
                    WindowEvent::RedrawRequested => {
                        scene.update(Instant::now());
                        renderer.render(&scene.camera, aspect);
                        if let Err(e) = gl_window.surface.swap_buffers(&gl_window.context) {
                            error!(target: APP, "Échec de l'échange des tampons : {}", e);
                            scene.request_quit();
                        }
                    }
                    _ => {}
                }

                if scene.quit_requested() {
                    info!(target: APP, "Arrêt après {} frames", scene.clock.frame_count());
                    elwt.exit();
                }
            }
            Event::AboutToWait => gl_window.window.request_redraw(),
            _ => {}
        })?;

        Ok(())
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    match grabbed {
        Ok(()) => window.set_cursor_visible(false),
        Err(e) => warn!(target: APP, "Capture du curseur impossible : {}", e),
    }
}

/// Préfère la configuration avec le plus d'échantillons
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
        .expect("le display ne propose aucune configuration GL")
}

fn create_gl_window(event_loop: &EventLoop<()>, config: &AppConfig) -> Result<GlWindowContext> {
    let window_config = &config.window;
    let window_builder = WindowBuilder::new()
        .with_title(&window_config.title)
        .with_inner_size(LogicalSize::new(window_config.width, window_config.height))
        .with_resizable(window_config.resizable);

    let template = ConfigTemplateBuilder::new().with_depth_size(24);
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_builder(Some(window_builder))
        .build(event_loop, template, pick_config)
        .map_err(|e| anyhow!("Création de la fenêtre impossible : {}", e))?;
    let window = window.ok_or_else(|| anyhow!("Aucune fenêtre créée"))?;

    let (major, minor) = window_config.gl_version;
    let context_attributes = ContextAttributesBuilder::new()
        .with_profile(GlProfile::Core)
        .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
        .build(Some(window.raw_window_handle()));

    let gl_display = gl_config.display();
    let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .with_context(|| format!("Contexte OpenGL {}.{} core indisponible", major, minor))?;

    let surface_attributes = window.build_surface_attributes(Default::default());
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
        .context("Création de la surface impossible")?;
    let context = not_current
        .make_current(&surface)
        .context("Activation du contexte OpenGL impossible")?;

    if window_config.vsync {
        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            warn!(target: APP, "VSync indisponible : {}", e);
        }
    }

    let gl = unsafe { glow::Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s)) };
    info!(target: APP, "OpenGL : {}", unsafe { gl.get_parameter_string(glow::VERSION) });

    Ok(GlWindowContext {
        window,
        surface,
        context,
        gl: Rc::new(gl),
    })
}
