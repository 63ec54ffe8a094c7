use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "timeleap".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Creation is retried on resize after a failure, up to this many tries in
/// total. A window opened at zero size fails once and recovers here.
const MAX_GPU_ATTEMPTS: u32 = 3;

fn should_retry_gpu(failed: u32, size: PhysicalSize<u32>) -> bool {
    failed > 0 && failed < MAX_GPU_ATTEMPTS && size.width > 0 && size.height > 0
}

fn create_gpu<'w>(window: &'w Window, init: &GpuInit, failed: &mut u32) -> Option<Gpu<'w>> {
    match pollster::block_on(Gpu::new(window, init.clone())) {
        Ok(gpu) => {
            *failed = 0;
            Some(gpu)
        }
        Err(e) => {
            *failed += 1;
            if *failed < MAX_GPU_ATTEMPTS {
                log::warn!("rendering unavailable, retrying on resize: {e:#}");
            } else {
                log::warn!("rendering unavailable, window will stay blank: {e:#}");
            }
            None
        }
    }
}

/// Drives one window: platform events in, one [`App::on_frame`] per redraw.
pub struct Runtime;

impl Runtime {
    /// Blocks until the window closes or the app returns [`AppControl::Exit`].
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("creating the event loop")?;
        let mut driver = Driver { config, gpu_init, app, surface: None, gpu_attempts: 0, done: false };
        event_loop.run_app(&mut driver).context("event loop failed")
    }
}

/// The window and everything whose lifetime follows it. The GPU surface
/// borrows the window, hence the self-reference.
#[self_referencing]
struct WindowState {
    input: InputState,
    frame_input: InputFrame,
    clock: FrameClock,

    window: Window,

    /// `None` when no rendering context could be created for the window.
    #[borrows(window)]
    #[covariant]
    gpu: Option<Gpu<'this>>,
}

struct Driver<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    surface: Option<WindowState>,
    /// Failed GPU creations so far; resizes retry until the cap.
    gpu_attempts: u32,
    done: bool,
}

impl<A: App + 'static> Driver<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop.create_window(attrs).context("creating the window")?;
        let gpu_init = &self.gpu_init;
        let attempts = &mut self.gpu_attempts;

        let surface = WindowStateBuilder {
            input: InputState::default(),
            frame_input: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| create_gpu(w, gpu_init, attempts),
        }
        .build();

        log::info!("window {:?} open", surface.borrow_window().id());
        surface.borrow_window().request_redraw();
        self.surface = Some(surface);
        Ok(())
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop) {
        self.done = true;
        self.surface = None;
        event_loop.exit();
    }

    fn frame(&mut self, window_id: WindowId) -> AppControl {
        let app = &mut self.app;
        let Some(surface) = self.surface.as_mut() else {
            return AppControl::Continue;
        };
        surface.with_mut(|s| {
            let mut ctx = FrameCtx {
                window: WindowCtx { id: window_id, window: s.window },
                gpu: s.gpu.as_mut(),
                input_frame: s.frame_input,
                time: s.clock.tick(),
            };
            let control = app.on_frame(&mut ctx);
            s.frame_input.clear();
            control
        })
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() || self.done {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            log::error!("{e:#}");
            self.finish(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Scenes spin on their own, so keep frames coming.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(surface) = &self.surface {
            surface.borrow_window().request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let app = &mut self.app;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let control = surface.with_mut(|s| {
            if let Some(ev) = translate_window_event(s.window, s.input, &event) {
                s.input.apply_event(s.frame_input, ev);
            }
            app.on_window_event(window_id, &event)
        });
        if control == AppControl::Exit {
            self.finish(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window {window_id:?} closed");
                self.finish(event_loop);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let gpu_init = &self.gpu_init;
                let attempts = &mut self.gpu_attempts;
                surface.with_mut(|s| {
                    let size = s.window.inner_size();
                    if let Some(gpu) = s.gpu.as_mut() {
                        gpu.resize(size);
                    } else if should_retry_gpu(*attempts, size) {
                        *s.gpu = create_gpu(s.window, gpu_init, attempts);
                    }
                    s.window.request_redraw();
                });
            }
            WindowEvent::RedrawRequested => {
                if self.frame(window_id) == AppControl::Exit {
                    self.finish(event_loop);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_retried_only_after_a_failure_at_nonzero_size() {
        let size = PhysicalSize::new(800, 600);
        assert!(!should_retry_gpu(0, size));
        assert!(should_retry_gpu(1, size));
        assert!(!should_retry_gpu(1, PhysicalSize::new(0, 600)));
        assert!(!should_retry_gpu(1, PhysicalSize::new(800, 0)));
    }

    #[test]
    fn gpu_retries_stop_at_the_cap() {
        let size = PhysicalSize::new(800, 600);
        assert!(should_retry_gpu(MAX_GPU_ATTEMPTS - 1, size));
        assert!(!should_retry_gpu(MAX_GPU_ATTEMPTS, size));
    }
}
