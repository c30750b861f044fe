//! Nataraja - five noise-driven threads dancing to an audio stream
//!
//! Each thread traces one figure (nataraja, drum, trident, third eye, om)
//! around the window centre. Fractal noise bends the figures over time and
//! the current frequency spectrum scales their noise offsets.

use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use nataraja::animation::{AnimationLoop, CancelToken, FrameOutcome};
use nataraja::audio::AudioSystem;
use nataraja::canvas::Canvas;
use nataraja::cli::{Args, Settings};
use nataraja::error::AppError;
use nataraja::rendering::RenderSystem;

const TITLE_IDLE: &str = "Nataraja - click, Space or Enter to start";
const TITLE_RUNNING: &str = "Nataraja";

/// Main application state
struct App {
    settings: Settings,

    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    canvas: Canvas,

    // Audio and animation
    audio: Option<AudioSystem>,
    animation: AnimationLoop,
    cancel: CancelToken,

    // First fatal error; reported after the event loop returns
    failure: Option<AppError>,
}

impl App {
    fn new(settings: Settings) -> Result<Self, AppError> {
        let animation = AnimationLoop::new(
            &settings.noise,
            settings.style.clone(),
            settings.analyser.frequency_bin_count(),
        )?;
        let cancel = animation.cancel_token();
        let canvas = Canvas::new(settings.render.window_width, settings.render.window_height);

        Ok(Self {
            settings,
            window: None,
            render_system: None,
            canvas,
            audio: None,
            animation,
            cancel,
            failure: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title(TITLE_IDLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.settings.render.window_width,
                self.settings.render.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let size = window.inner_size();
        self.canvas.resize(size.width, size.height);

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.settings.render.background,
        ))?;

        let audio = AudioSystem::new(self.settings.analyser.clone(), &self.settings.source)?;

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.audio = Some(audio);

        if self.settings.autostart {
            self.start();
        } else {
            info!("waiting for click, Space or Enter");
        }
        Ok(())
    }

    /// Forward a start signal to the animation loop
    fn start(&mut self) {
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        if !self.animation.start(audio) {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(TITLE_RUNNING);
            window.request_redraw();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.cancel.cancel();
        event_loop.exit();
    }

    /// Draw a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_system), Some(audio)) = (self.render_system.as_mut(), self.audio.as_mut())
        else {
            return;
        };

        if let FrameOutcome::Cancelled = self.animation.frame(&mut self.canvas, audio) {
            return;
        }

        match render_system.render(&self.canvas) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                self.shutdown(event_loop);
            }
            Err(e) => warn!("render error: {e:?}"),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.animation.wants_frame() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => self.shutdown(event_loop),
                KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter => self.start(),
                _ => {}
            },
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.start(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
                self.canvas.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.settings()?;
    info!(
        "source: {:?}, {} octaves, gradient cache {}, value cache {}",
        settings.source,
        settings.noise.octaves,
        settings.noise.gradient_cache,
        settings.noise.value_cache,
    );

    let mut app = App::new(settings)?;
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
