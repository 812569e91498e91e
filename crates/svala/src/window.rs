//! Window management and the frame loop, via winit.
//!
//! Implements [`winit::application::ApplicationHandler`]. Each
//! `RedrawRequested` plays one frame in a fixed order:
//!
//! 1. advance the clock;
//! 2. apply a pending resize (zero-area sizes are skipped and retried);
//! 3. route buffered input into the control state and transit triggers;
//! 4. run user update hooks;
//! 5. run node behaviors;
//! 6. step physics and the respawn policy (when configured);
//! 7. expire per-frame input state;
//! 8. propagate world transforms;
//! 9. draw;
//! 10. request the next redraw.
//!
//! Nothing in the loop is allowed to stop it: a lost or outdated surface is
//! reconfigured and the frame retried, and only window close or GPU
//! out-of-memory exits.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::app::Context;
use crate::behavior::run_behaviors;
use crate::camera::Viewport;
use crate::input::InputRouter;
use crate::render::{ClearColor, GpuContext, RenderState};

/// The application state that winit drives.
pub(crate) struct WinitApp {
    ctx: Context,
    router: InputRouter,
    setup_systems: Vec<Box<dyn FnMut(&mut Context)>>,
    update_systems: Vec<Box<dyn FnMut(&mut Context)>>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    render: Option<RenderState>,
    /// Latest resize observed since the last applied one. Zero-area sizes
    /// stay here until a valid size replaces them.
    pending_size: Option<(u32, u32)>,
    started: bool,
    title: String,
    clear_color: ClearColor,
}

impl WinitApp {
    pub fn new(
        ctx: Context,
        router: InputRouter,
        setup_systems: Vec<Box<dyn FnMut(&mut Context)>>,
        update_systems: Vec<Box<dyn FnMut(&mut Context)>>,
        title: String,
        clear_color: ClearColor,
    ) -> Self {
        Self {
            ctx,
            router,
            setup_systems,
            update_systems,
            window: None,
            gpu: None,
            render: None,
            pending_size: None,
            started: false,
            title,
            clear_color,
        }
    }

    fn viewport(&self) -> Viewport {
        self.gpu
            .as_ref()
            .map(|gpu| {
                let (w, h) = gpu.surface_size();
                Viewport::new(w, h)
            })
            .unwrap_or(Viewport::new(1, 1))
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));
            let window = Arc::new(
                event_loop
                    .create_window(attrs)
                    .expect("Failed to create window"),
            );

            let gpu = GpuContext::new(window.clone());
            self.render = Some(RenderState::new(&gpu));

            self.gpu = Some(gpu);
            self.window = Some(window);
        }

        if !self.started {
            self.started = true;
            for system in self.setup_systems.iter_mut() {
                system(&mut self.ctx);
            }
            // Setup may have replaced the scene wholesale, so adopt the real
            // surface size and compose world transforms only now.
            let viewport = self.viewport();
            self.ctx.scene.camera.set_viewport(viewport);
            self.ctx.scene.propagate();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.pending_size = Some((size.width, size.height));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.ctx.input.keys.press(key_code),
                        ElementState::Released => self.ctx.input.keys.release(key_code),
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => self.ctx.input.mouse.press(button),
                ElementState::Released => self.ctx.input.mouse.release(button),
            },

            WindowEvent::CursorMoved { position, .. } => {
                self.ctx.cursor.x = position.x as f32;
                self.ctx.cursor.y = position.y as f32;
            }

            WindowEvent::RedrawRequested => {
                // 1. Clock.
                self.ctx.clock.tick();

                // 2. Resize. A zero-area size stays pending: the projection
                // keeps its previous aspect and the update is retried when a
                // drawable size arrives.
                if let Some((w, h)) = self.pending_size {
                    if w > 0 && h > 0 {
                        if let Some(gpu) = self.gpu.as_mut() {
                            gpu.resize(w, h);
                        }
                        if let (Some(gpu), Some(render)) =
                            (self.gpu.as_ref(), self.render.as_mut())
                        {
                            render.resize(gpu);
                        }
                        self.ctx.scene.camera.set_viewport(Viewport::new(w, h));
                        self.pending_size = None;
                    }
                }

                // 3. Input routing — the only writer of the control state.
                let viewport = self.viewport();
                self.router.route(
                    &self.ctx.input,
                    self.ctx.cursor,
                    viewport,
                    &mut self.ctx.scene,
                    &mut self.ctx.controls,
                );

                // 4. User update hooks.
                for system in self.update_systems.iter_mut() {
                    system(&mut self.ctx);
                }

                // 5. Behaviors.
                run_behaviors(&mut self.ctx.scene, &self.ctx.clock, &self.ctx.controls);

                // 6. Physics + respawn.
                #[cfg(feature = "physics")]
                {
                    let dt = self.ctx.clock.delta_secs();
                    if let Some(physics) = self.ctx.physics.as_mut() {
                        physics.step(&mut self.ctx.scene, dt);
                        if let Some(policy) = self.ctx.respawn.as_mut() {
                            physics.respawn_pass(&mut self.ctx.scene, policy);
                        }
                    }
                }

                // 7. Per-frame input state expires.
                self.ctx.input.keys.clear_just();
                self.ctx.input.mouse.clear_just();

                // 8. Compose world transforms.
                self.ctx.scene.propagate();

                // 9. Draw.
                if let (Some(gpu), Some(render)) = (self.gpu.as_mut(), self.render.as_mut()) {
                    match render.render(gpu, &self.ctx.scene, self.clear_color) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let (w, h) = gpu.surface_size();
                            gpu.resize(w, h);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory!");
                            event_loop.exit();
                        }
                        Err(e) => {
                            log::warn!("Surface error: {:?}", e);
                        }
                    }
                }

                // 10. Schedule the next frame.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
