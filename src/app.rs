//! Hosts that drive a [`Stage`]: a winit window, or a fixed-step headless loop.
//!
//! Both feed the stage the only two signals it needs: "the viewport is now
//! W×H" and "advance to time T and produce a frame".

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::StageConfig;
use crate::demos::Demo;
use crate::error::{Error, Result};
use crate::gpu::GpuRenderer;
use crate::renderer::HeadlessRenderer;
use crate::stage::Stage;

/// What to run and how.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub demo: Demo,
    pub config: StageConfig,
    /// Stop after this many frames. Headless runs default to one second's worth.
    pub frames: Option<u64>,
    /// Frame rate of the headless clock.
    pub fps: f32,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            demo: Demo::default(),
            config: StageConfig::default(),
            frames: None,
            fps: 60.0,
        }
    }
}

impl AppOptions {
    pub fn new(demo: Demo) -> Self {
        Self {
            demo,
            ..Default::default()
        }
    }

    pub fn config(mut self, config: StageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn frames(mut self, frames: u64) -> Self {
        self.frames = Some(frames);
        self
    }

    pub fn fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }
}

/// Opens a window and runs the demo until it is closed (or `frames` elapse).
pub fn run(options: AppOptions) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DioramaApp::Pending { options };
    event_loop.run_app(&mut app)?;

    match app {
        DioramaApp::Failed(e) => Err(e),
        _ => Ok(()),
    }
}

/// Runs the demo without a window on a fixed time step of `1 / fps` seconds,
/// starting at t = 0. Returns the stage so callers can inspect the result.
pub fn run_headless(options: &AppOptions) -> Result<Stage<HeadlessRenderer>> {
    let config = &options.config;
    let (width, height) = (config.viewport.width, config.viewport.height);
    let fps = if options.fps > 0.0 && options.fps.is_finite() {
        options.fps
    } else {
        log::warn!("invalid fps {}, using 60", options.fps);
        60.0
    };
    let frames = options.frames.unwrap_or(fps.ceil() as u64);

    let mut stage = Stage::new(config, width, height, HeadlessRenderer::new())?;
    options.demo.build(&mut stage, config)?;
    stage.start();

    for frame in 0..frames {
        stage.on_frame(frame as f32 / fps);
    }
    stage.stop();

    log::info!(
        "headless run of '{}': {} frames, {:.2}s simulated",
        options.demo.title(),
        stage.renderer().frames,
        stage.elapsed()
    );
    Ok(stage)
}

enum DioramaApp {
    Pending {
        options: AppOptions,
    },
    Running {
        window: Arc<Window>,
        stage: Stage<GpuRenderer>,
        start_time: Instant,
        frame_limit: Option<u64>,
    },
    Failed(Error),
}

impl DioramaApp {
    fn launch(
        event_loop: &ActiveEventLoop,
        options: &AppOptions,
    ) -> Result<(Arc<Window>, Stage<GpuRenderer>)> {
        let config = &options.config;
        let attrs = WindowAttributes::default()
            .with_title(format!("diorama: {}", options.demo.title()))
            .with_inner_size(LogicalSize::new(config.viewport.width, config.viewport.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let renderer = GpuRenderer::new(window.clone())?;
        let scale = window.scale_factor();
        let size: LogicalSize<f32> = window.inner_size().to_logical(scale);

        let mut stage = Stage::new(config, size.width, size.height, renderer)?;
        stage.on_resize(size.width, size.height, scale as f32)?;
        options.demo.build(&mut stage, config)?;
        stage.start();
        Ok((window, stage))
    }
}

impl ApplicationHandler for DioramaApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let DioramaApp::Pending { options } = self else {
            return;
        };

        let next = match Self::launch(event_loop, options) {
            Ok((window, stage)) => {
                window.request_redraw();
                DioramaApp::Running {
                    frame_limit: options.frames,
                    window,
                    stage,
                    start_time: Instant::now(),
                }
            }
            Err(e) => {
                log::error!("could not start: {e}");
                event_loop.exit();
                DioramaApp::Failed(e)
            }
        };
        *self = next;
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let DioramaApp::Running {
            window,
            stage,
            start_time,
            frame_limit,
        } = self
        else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                stage.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                resize(stage, size, window.scale_factor());
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                resize(stage, window.inner_size(), scale_factor);
            }
            WindowEvent::RedrawRequested => {
                stage.on_frame(start_time.elapsed().as_secs_f32());

                if frame_limit.is_some_and(|limit| stage.scheduler().clock().ticks() >= limit) {
                    stage.stop();
                    event_loop.exit();
                    return;
                }
                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn resize(stage: &mut Stage<GpuRenderer>, size: PhysicalSize<u32>, scale_factor: f64) {
    let logical: LogicalSize<f32> = size.to_logical(scale_factor);
    // Minimizing reports 0x0; keep the last good projection.
    if let Err(e) = stage.on_resize(logical.width, logical.height, scale_factor as f32) {
        log::warn!("ignoring resize: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_run_advances_on_a_fixed_step() {
        let mut config = StageConfig::default();
        config.seed = Some(1);
        let options = AppOptions::new(Demo::HauntedHouse)
            .config(config)
            .frames(121)
            .fps(60.0);

        let stage = run_headless(&options).unwrap();
        assert_eq!(stage.renderer().frames, 121);
        assert!((stage.elapsed() - 2.0).abs() < 1e-5);
        assert_eq!(stage.renderer().buffer_size, (800, 600));
    }

    #[test]
    fn headless_defaults_to_one_second() {
        let stage = run_headless(&AppOptions::new(Demo::FirstProject)).unwrap();
        assert_eq!(stage.renderer().frames, 60);
    }

    #[test]
    fn headless_rejects_bad_viewport() {
        let mut config = StageConfig::default();
        config.viewport.height = 0.0;
        let err = run_headless(&AppOptions::new(Demo::Textures).config(config))
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
    }
}
