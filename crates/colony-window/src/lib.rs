//! colony-window: winit + softbuffer host for the launcher shell.
//!
//! Responsibilities:
//! - Create the window and a softbuffer surface for it.
//! - Translate window events into shell input events.
//! - Pace frames: tick animations, render the display list, present.

use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use colony_config::WindowConfig;
use colony_core::{DisplayList, Viewport};
use colony_shell::{Application, EventResult, InputEvent};
use colony_text::FontSet;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

pub mod events;
pub mod raster;

use events::InputTranslator;
use raster::Rasterizer;

/// The seam between the host loop and whatever it drives.
pub trait FrameHandler {
    fn on_input(&mut self, event: InputEvent) -> EventResult;
    /// Advance animations; true while another frame is wanted.
    fn on_tick(&mut self, dt: f32) -> bool;
    fn on_render(&mut self, viewport: Viewport) -> DisplayList;
    fn on_exit(&mut self) {}
}

impl FrameHandler for Application {
    fn on_input(&mut self, event: InputEvent) -> EventResult {
        self.handle_event(event)
    }

    fn on_tick(&mut self, dt: f32) -> bool {
        self.tick(dt)
    }

    fn on_render(&mut self, viewport: Viewport) -> DisplayList {
        self.render_frame(viewport)
    }

    fn on_exit(&mut self) {
        self.shutdown();
    }
}

pub struct ColonyWindow {
    event_loop: EventLoop<()>,
    window: Rc<Window>,
    context: softbuffer::Context<Rc<Window>>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    rasterizer: Rasterizer,
}

impl ColonyWindow {
    pub fn new(config: &WindowConfig, fonts: Arc<FontSet>) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let window = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_min_inner_size(LogicalSize::new(config.min_width, config.min_height))
            .build(&event_loop)
            .context("failed to create window")?;
        let window = Rc::new(window);

        // softbuffer's error type is not Send + Sync, so it is stringified.
        let context = softbuffer::Context::new(window.clone()).map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface =
            softbuffer::Surface::new(&context, window.clone()).map_err(|e| anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        info!(width = size.width, height = size.height, scale = window.scale_factor(), "window created");
        Ok(Self { event_loop, window, context, surface, rasterizer: Rasterizer::new(fonts) })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Drive `handler` until the window closes. `on_exit` runs exactly once.
    pub fn run(self, mut handler: impl FrameHandler + 'static) -> Result<()> {
        let Self { event_loop, window, context, mut surface, mut rasterizer } = self;
        let mut input = InputTranslator::default();
        let mut last_frame = Instant::now();
        let mut exited = false;

        event_loop
            .run(move |event, elwt| {
                // Keeps the display connection alive as long as the loop.
                let _ = &context;
                elwt.set_control_flow(ControlFlow::Wait);
                match event {
                    Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                        WindowEvent::CloseRequested => {
                            if !exited {
                                handler.on_exit();
                                exited = true;
                            }
                            elwt.exit();
                        }
                        WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => window.request_redraw(),
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            let dt = now.saturating_duration_since(last_frame).as_secs_f32();
                            last_frame = now;
                            let animating = handler.on_tick(dt);
                            if let Err(error) = present(&window, &mut surface, &mut rasterizer, &mut handler) {
                                warn!(%error, "frame presentation failed");
                            }
                            if animating {
                                window.request_redraw();
                            }
                        }
                        other => {
                            let mut redraw = false;
                            for shell_event in input.translate(&other, Instant::now()) {
                                redraw |= handler.on_input(shell_event).is_handled();
                            }
                            if redraw {
                                window.request_redraw();
                            }
                        }
                    },
                    Event::LoopExiting => {
                        if !exited {
                            handler.on_exit();
                            exited = true;
                        }
                    }
                    _ => {}
                }
            })
            .context("event loop terminated with an error")?;
        Ok(())
    }
}

fn present(
    window: &Window,
    surface: &mut softbuffer::Surface<Rc<Window>, Rc<Window>>,
    rasterizer: &mut Rasterizer,
    handler: &mut impl FrameHandler,
) -> Result<()> {
    let size = window.inner_size();
    let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
        // Minimized.
        return Ok(());
    };
    surface.resize(w, h).map_err(|e| anyhow!("surface resize: {e}"))?;

    let list = handler.on_render(Viewport { width: size.width, height: size.height });
    let Some(pixmap) = rasterizer.render(&list) else {
        debug!(width = size.width, height = size.height, "skipped frame with no raster target");
        return Ok(());
    };
    let mut buffer = surface.buffer_mut().map_err(|e| anyhow!("surface buffer: {e}"))?;
    raster::copy_to_xrgb(pixmap, &mut buffer);
    buffer.present().map_err(|e| anyhow!("surface present: {e}"))?;
    Ok(())
}
