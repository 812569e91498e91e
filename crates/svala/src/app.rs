//! App builder and the context passed to systems.
//!
//! [`App`] is the entry point: configure the scene, input bindings, and
//! hooks, then call [`run`](App::run) to start the event loop.
//!
//! # Example
//!
//! ```ignore
//! use svala::prelude::*;
//!
//! fn main() {
//!     env_logger::init();
//!
//!     App::new("My Scene")
//!         .clear_color([0.02, 0.02, 0.06, 1.0])
//!         .setup(setup)
//!         .run();
//! }
//!
//! fn setup(ctx: &mut Context) {
//!     ctx.scene.camera.transform =
//!         Transform::from_xyz(0.0, 10.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y);
//!     ctx.scene.spawn(Node::new().shape(Shape::cuboid(2.0, 2.0, 2.0)));
//! }
//! ```

use crate::control::ControlState;
use crate::input::{Binding, CursorPosition, InputRouter, InputState};
use crate::render::ClearColor;
use crate::scene::Scene;
use crate::time::FrameClock;

/// Everything a setup or update hook can touch: the scene, the control
/// state, timing, and raw input.
pub struct Context {
    pub scene: Scene,
    pub controls: ControlState,
    pub clock: FrameClock,
    pub input: InputState,
    /// Cursor position in window coordinates.
    pub cursor: CursorPosition,
    /// The physics world, when the app has one.
    #[cfg(feature = "physics")]
    pub physics: Option<crate::physics::PhysicsWorld>,
    /// The respawn policy applied after each physics step, when configured.
    #[cfg(feature = "physics")]
    pub respawn: Option<crate::physics::RespawnPolicy>,
}

impl Context {
    pub(crate) fn new() -> Self {
        Self {
            scene: Scene::new(),
            controls: ControlState::new(),
            clock: FrameClock::new(),
            input: InputState::new(),
            cursor: CursorPosition::default(),
            #[cfg(feature = "physics")]
            physics: None,
            #[cfg(feature = "physics")]
            respawn: None,
        }
    }
}

/// The application builder. Configure, then [`run`](App::run).
pub struct App {
    title: String,
    clear_color: ClearColor,
    ctx: Context,
    router: InputRouter,
    setup_systems: Vec<Box<dyn FnMut(&mut Context)>>,
    update_systems: Vec<Box<dyn FnMut(&mut Context)>>,
}

impl App {
    /// Create a new app with the given window title.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            clear_color: ClearColor::default(),
            ctx: Context::new(),
            router: InputRouter::new(),
            setup_systems: Vec::new(),
            update_systems: Vec::new(),
        }
    }

    /// Set the background clear color.
    pub fn clear_color(mut self, rgba: [f64; 4]) -> Self {
        self.clear_color = ClearColor(rgba);
        self
    }

    /// Register a startup hook that runs once after window creation.
    pub fn setup(mut self, system: impl FnMut(&mut Context) + 'static) -> Self {
        self.setup_systems.push(Box::new(system));
        self
    }

    /// Register an update hook that runs every frame, after input routing
    /// and before behaviors.
    pub fn update(mut self, system: impl FnMut(&mut Context) + 'static) -> Self {
        self.update_systems.push(Box::new(system));
        self
    }

    /// Add an input binding to the router.
    pub fn bind(mut self, binding: Binding) -> Self {
        self.router.bind(binding);
        self
    }

    /// Attach a physics world, stepped each frame after behaviors.
    #[cfg(feature = "physics")]
    pub fn physics(mut self, world: crate::physics::PhysicsWorld) -> Self {
        self.ctx.physics = Some(world);
        self
    }

    /// Attach a respawn policy, applied after each physics step.
    #[cfg(feature = "physics")]
    pub fn respawn(mut self, policy: crate::physics::RespawnPolicy) -> Self {
        self.ctx.respawn = Some(policy);
        self
    }

    /// Start the event loop. Does not return.
    pub fn run(self) {
        let event_loop =
            winit::event_loop::EventLoop::new().expect("Failed to create event loop");

        let mut app = crate::window::WinitApp::new(
            self.ctx,
            self.router,
            self.setup_systems,
            self.update_systems,
            self.title,
            self.clear_color,
        );

        event_loop.run_app(&mut app).expect("Event loop error");
    }
}
