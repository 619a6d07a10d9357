//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use glimpse::Viewer;
//! Viewer::builder()
//!     .with_title("Cube")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    camera::Camera,
    capture::{CaptureThrottle, PendingExport, ScreenshotManager},
    error::GlimpseError,
    gpu::{GpuFrameSource, Readback, RenderContext, SceneRenderer},
    input::{InputEvent, InputProcessor, MouseButton, ViewerCommand},
    options::Options,
    util::FrameClock,
};

/// Ticks between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 600;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title (overrides `display.title`).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let mut options = self.options.unwrap_or_default();
        if let Some(title) = self.title {
            options.display.title = title;
        }
        Viewer { options }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window showing the demo scene, with screenshot and GIF recording
/// bound to keys.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed and every pending export has been written.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::ThreadSpawn`] if the encoder cannot start,
    /// [`GlimpseError::Gpu`] if the GPU cannot be initialized, or
    /// [`GlimpseError::Viewer`] for event-loop and window failures.
    pub fn run(self) -> Result<(), GlimpseError> {
        let capture = ScreenshotManager::new(&self.options.capture)?;
        let event_loop =
            EventLoop::new().map_err(|e| GlimpseError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp::new(self.options, capture);
        let result = event_loop
            .run_app(&mut app)
            .map_err(|e| GlimpseError::Viewer(e.to_string()));
        app.finish_capture();

        result?;
        app.init_error.take().map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// GPU state, created once the window exists.
struct GpuState {
    context: RenderContext,
    scene: SceneRenderer,
    readback: Readback,
}

/// Internal winit application handler.
struct ViewerApp {
    options: Options,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    camera: Camera,
    input: InputProcessor,
    capture: ScreenshotManager,
    throttle: CaptureThrottle,
    clock: FrameClock,
    screenshot_requested: bool,
    exports: Vec<PendingExport>,
    init_error: Option<GlimpseError>,
}

impl ViewerApp {
    fn new(options: Options, capture: ScreenshotManager) -> Self {
        let camera = Camera::new(
            options.display.aspect(),
            Vec3::from_array(options.camera.start_position),
        );
        let input =
            InputProcessor::new(&options.camera, options.keybindings.clone());
        let throttle = CaptureThrottle::new(options.capture.capture_interval);
        let clock = FrameClock::new(options.display.target_fps);
        Self {
            options,
            window: None,
            gpu: None,
            camera,
            input,
            capture,
            throttle,
            clock,
            screenshot_requested: false,
            exports: Vec::new(),
            init_error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: GlimpseError) {
        log::error!("{error}");
        self.init_error = Some(error);
        event_loop.exit();
    }

    fn execute(&mut self, command: ViewerCommand, event_loop: &ActiveEventLoop) {
        match command {
            ViewerCommand::Camera(cmd) => cmd.apply(&mut self.camera),
            ViewerCommand::Screenshot => self.screenshot_requested = true,
            ViewerCommand::ToggleRecording => {
                if let Some(pending) = self.capture.toggle_recording() {
                    self.exports.push(pending);
                }
                self.update_title();
            }
            ViewerCommand::Quit => {
                self.finish_capture();
                event_loop.exit();
            }
        }
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            let title = &self.options.display.title;
            if self.capture.is_recording() {
                window.set_title(&format!("{title} [REC]"));
            } else {
                window.set_title(title);
            }
        }
    }

    /// Export an active recording and wait for the encoder to drain.
    fn finish_capture(&mut self) {
        if self.capture.is_recording() {
            self.exports.push(self.capture.stop_recording());
        }
        self.capture.shutdown();
        self.poll_exports();
    }

    /// Drop exports that have resolved. The encoder logs each outcome.
    fn poll_exports(&mut self) {
        self.exports.retain_mut(|pending| pending.try_take().is_none());
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let _ = self.clock.tick();
        if self.clock.ticks() % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps", self.clock.fps());
        }

        let camera = &self.options.camera;
        gpu.scene.update_camera(
            &gpu.context.queue,
            &self.camera.uniform(camera.fovy, camera.znear, camera.zfar),
        );

        match gpu.context.get_next_frame() {
            Ok(frame) => {
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder = gpu.context.create_encoder("Frame Encoder");
                gpu.scene.draw(
                    &gpu.context.device,
                    &mut encoder,
                    &view,
                    gpu.context.format(),
                );
                gpu.context.submit(encoder);
                frame.present();
            }
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                gpu.context.reconfigure();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }

        let mut source = GpuFrameSource {
            context: &gpu.context,
            scene: &mut gpu.scene,
            readback: &gpu.readback,
        };
        if self.throttle.tick(self.capture.is_recording()) {
            self.capture.capture_frame(&mut source);
        }
        if std::mem::take(&mut self.screenshot_requested) {
            let _ = self.capture.take_screenshot(&mut source);
        }

        self.poll_exports();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.context.resize(width, height);
            let (width, height) = gpu.context.size();
            gpu.scene.resize(&gpu.context.device, width, height);
            gpu.readback.resize(&gpu.context.device, width, height);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let display = &self.options.display;
        let attrs = Window::default_attributes()
            .with_title(&display.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                display.width,
                display.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, GlimpseError::Viewer(e.to_string()));
                return;
            }
        };

        let inner = window.inner_size();
        let size = (inner.width.max(1), inner.height.max(1));
        let context =
            match pollster::block_on(RenderContext::new(window.clone(), size)) {
                Ok(context) => context,
                Err(e) => {
                    self.fail(event_loop, e.into());
                    return;
                }
            };
        let size = context.size();
        let scene = SceneRenderer::new(
            &context.device,
            size,
            self.options.display.clear_color,
        );
        let readback = Readback::new(&context.device, size.0, size.1);
        log::info!(
            "viewer ready at {}x{}; screenshots go to {}",
            size.0,
            size.1,
            self.capture.output_dir().display()
        );

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(GpuState {
            context,
            scene,
            readback,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.finish_capture();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => self.resize(size.width, size.height),

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                let _ = self.input.handle_event(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                };
                if let Some(cmd) = self.input.handle_event(event) {
                    self.execute(cmd, event_loop);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                if let Some(cmd) =
                    self.input.handle_event(InputEvent::Scroll { delta })
                {
                    self.execute(cmd, event_loop);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key = format!("{code:?}");
                if let Some(cmd) = self.input.handle_key(&key, event.repeat) {
                    self.execute(cmd, event_loop);
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        match self.clock.next_frame_at() {
            Some(at) if !self.clock.should_render() => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(at));
            }
            _ => {
                event_loop.set_control_flow(ControlFlow::Poll);
                window.request_redraw();
            }
        }
    }
}
