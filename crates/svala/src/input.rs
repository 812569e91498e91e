//! Keyboard and mouse input, and the router that turns events into control
//! state.
//!
//! [`Input`] tracks which keys/buttons are held, pressed this frame, or
//! released this frame; the window event handler feeds it. The
//! [`InputRouter`] is the only writer of the [`ControlState`]: a set of
//! declarative bindings maps discrete events (a key press, a pointer click
//! that hits a node) onto flag writes and transit triggers, applied at one
//! fixed point in the frame.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::camera::Viewport;
use crate::control::ControlState;
use crate::scene::Scene;

/// Tracks the state of a set of inputs (keys or mouse buttons).
///
/// - `pressed`: currently held down
/// - `just_pressed`: pressed this frame (not held last frame)
/// - `just_released`: released this frame
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
    just_released: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    /// Returns `true` if the input is currently held down.
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Returns `true` if the input was pressed this frame.
    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    /// Returns `true` if the input was released this frame.
    pub fn just_released(&self, input: T) -> bool {
        self.just_released.contains(&input)
    }

    /// Returns `true` if any input was pressed this frame.
    pub fn any_just_pressed(&self) -> bool {
        !self.just_pressed.is_empty()
    }

    /// Call when an input is pressed (from the event handler).
    pub(crate) fn press(&mut self, input: T) {
        if self.pressed.insert(input) {
            self.just_pressed.insert(input);
        }
    }

    /// Call when an input is released (from the event handler).
    pub(crate) fn release(&mut self, input: T) {
        if self.pressed.remove(&input) {
            self.just_released.insert(input);
        }
    }

    /// Clear per-frame state. Called at the end of each frame.
    pub(crate) fn clear_just(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mouse cursor position in window coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorPosition {
    pub x: f32,
    pub y: f32,
}

/// Keyboard and mouse state with convenience accessors.
pub struct InputState {
    pub(crate) keys: Input<KeyCode>,
    pub(crate) mouse: Input<MouseButton>,
}

impl InputState {
    pub(crate) fn new() -> Self {
        Self {
            keys: Input::new(),
            mouse: Input::new(),
        }
    }

    /// Returns `true` if the key is currently held down.
    pub fn pressed(&self, key: KeyCode) -> bool {
        self.keys.pressed(key)
    }

    /// Returns `true` if the key was pressed this frame.
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.keys.just_pressed(key)
    }

    /// Returns `true` if the key was released this frame.
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.keys.just_released(key)
    }

    /// Returns `true` if any key was pressed this frame.
    pub fn any_key_just_pressed(&self) -> bool {
        self.keys.any_just_pressed()
    }

    /// Returns `true` if the mouse button is currently held down.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse.pressed(button)
    }

    /// Returns `true` if the mouse button was pressed this frame.
    pub fn mouse_just_pressed(&self, button: MouseButton) -> bool {
        self.mouse.just_pressed(button)
    }
}

// ── Router ──────────────────────────────────────────────────────────────

/// One event→state mapping.
#[derive(Debug, Clone)]
pub enum Binding {
    /// Any key press sets a flag to `true` (a one-way arming switch).
    AnyKeySets { flag: String },
    /// A specific key press sets a flag to a fixed value.
    KeySets {
        key: KeyCode,
        flag: String,
        value: bool,
    },
    /// A specific key press flips a flag.
    KeyToggles { key: KeyCode, flag: String },
    /// A left click whose pick ray hits the named node's bounding sphere
    /// triggers that node's transit FSM.
    ClickTriggers { node: String },
}

/// Maps input events onto [`ControlState`] writes and transit triggers.
///
/// The router runs once per frame, before behaviors, so every behavior in a
/// frame observes the same control snapshot.
#[derive(Debug, Default)]
pub struct InputRouter {
    bindings: Vec<Binding>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    /// Apply all bindings for this frame's events.
    pub fn route(
        &self,
        input: &InputState,
        cursor: CursorPosition,
        viewport: Viewport,
        scene: &mut Scene,
        controls: &mut ControlState,
    ) {
        for binding in &self.bindings {
            match binding {
                Binding::AnyKeySets { flag } => {
                    if input.any_key_just_pressed() {
                        controls.set_flag(flag, true);
                    }
                }
                Binding::KeySets { key, flag, value } => {
                    if input.just_pressed(*key) {
                        controls.set_flag(flag, *value);
                    }
                }
                Binding::KeyToggles { key, flag } => {
                    if input.just_pressed(*key) {
                        let value = controls.toggle_flag(flag);
                        log::debug!("flag \"{flag}\" toggled to {value}");
                    }
                }
                Binding::ClickTriggers { node } => {
                    if input.mouse_just_pressed(MouseButton::Left) {
                        click_trigger(node, cursor, viewport, scene);
                    }
                }
            }
        }
    }
}

/// Hit-test a click against the named node and trigger its transit.
fn click_trigger(name: &str, cursor: CursorPosition, viewport: Viewport, scene: &mut Scene) {
    let Some(id) = scene.try_named(name) else {
        log::warn!("click binding targets unknown node \"{name}\"");
        return;
    };

    let ray = scene.camera.pick_ray(cursor.x, cursor.y, viewport);

    let Some(node) = scene.node(id) else { return };
    let Some(shape) = &node.shape else { return };

    // Bounding sphere: the shape's local radius scaled by the largest world
    // axis, centered at the node's world position.
    let world = node.world;
    let scale = world
        .x_axis
        .truncate()
        .length()
        .max(world.y_axis.truncate().length())
        .max(world.z_axis.truncate().length());
    let center = node.world_position();
    let radius = shape.bounding_radius() * scale;

    if ray.hits_sphere(center, radius) {
        if let Some(behavior) = scene.node_mut(id).and_then(|n| n.behavior.as_mut()) {
            if behavior.trigger() {
                log::info!("transit triggered on \"{name}\"");
            } else {
                log::debug!("transit trigger on \"{name}\" rejected (busy)");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Behavior, Transit, TransitState};
    use crate::math::{Transform, Vec3};
    use crate::render::Shape;
    use crate::scene::Node;

    #[test]
    fn just_pressed_lasts_one_frame() {
        let mut input: Input<KeyCode> = Input::new();
        input.press(KeyCode::Space);
        assert!(input.just_pressed(KeyCode::Space));
        assert!(input.pressed(KeyCode::Space));

        input.clear_just();
        assert!(!input.just_pressed(KeyCode::Space));
        assert!(input.pressed(KeyCode::Space));
    }

    #[test]
    fn key_repeat_does_not_retrigger_just_pressed() {
        let mut input: Input<KeyCode> = Input::new();
        input.press(KeyCode::KeyW);
        input.clear_just();
        // OS key repeat delivers another press while still held.
        input.press(KeyCode::KeyW);
        assert!(!input.just_pressed(KeyCode::KeyW));
    }

    #[test]
    fn any_key_arms_flag_once() {
        let mut state = InputState::new();
        let mut scene = Scene::new();
        let mut controls = ControlState::new();
        let mut router = InputRouter::new();
        router.bind(Binding::AnyKeySets {
            flag: "go".to_string(),
        });

        let viewport = Viewport::new(800, 600);
        router.route(
            &state,
            CursorPosition::default(),
            viewport,
            &mut scene,
            &mut controls,
        );
        assert!(!controls.flag("go"));

        state.keys.press(KeyCode::KeyQ);
        router.route(
            &state,
            CursorPosition::default(),
            viewport,
            &mut scene,
            &mut controls,
        );
        assert!(controls.flag("go"));
    }

    #[test]
    fn toggle_binding_flips_flag() {
        let mut state = InputState::new();
        let mut scene = Scene::new();
        let mut controls = ControlState::new();
        let mut router = InputRouter::new();
        router.bind(Binding::KeyToggles {
            key: KeyCode::KeyT,
            flag: "walls".to_string(),
        });
        controls.set_flag("walls", true);

        state.keys.press(KeyCode::KeyT);
        router.route(
            &state,
            CursorPosition::default(),
            Viewport::new(800, 600),
            &mut scene,
            &mut controls,
        );
        assert!(!controls.flag("walls"));
    }

    #[test]
    fn click_on_node_triggers_transit() {
        let viewport = Viewport::new(800, 600);
        let mut scene = Scene::new();
        scene.camera.set_viewport(viewport);
        scene.camera.transform =
            Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);

        let rocket = scene.spawn(
            Node::new()
                .named("rocket")
                .shape(Shape::sphere(1.0))
                .behavior(Behavior::Transit(Transit::between(
                    ("a", Vec3::ZERO),
                    ("b", Vec3::new(0.0, 10.0, 0.0)),
                ))),
        );
        scene.propagate();

        let mut state = InputState::new();
        let mut controls = ControlState::new();
        let mut router = InputRouter::new();
        router.bind(Binding::ClickTriggers {
            node: "rocket".to_string(),
        });

        // Click dead center: the ray passes through the node.
        state.mouse.press(MouseButton::Left);
        router.route(
            &state,
            CursorPosition { x: 400.0, y: 300.0 },
            viewport,
            &mut scene,
            &mut controls,
        );

        let node = scene.node(rocket).unwrap();
        match node.behavior.as_ref().unwrap() {
            Behavior::Transit(t) => assert_eq!(t.state(), TransitState::Ascending),
            _ => unreachable!(),
        }
    }

    #[test]
    fn click_off_node_is_ignored() {
        let viewport = Viewport::new(800, 600);
        let mut scene = Scene::new();
        scene.camera.set_viewport(viewport);
        scene.camera.transform =
            Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);

        let rocket = scene.spawn(
            Node::new()
                .named("rocket")
                .shape(Shape::sphere(1.0))
                .behavior(Behavior::Transit(Transit::between(
                    ("a", Vec3::ZERO),
                    ("b", Vec3::new(0.0, 10.0, 0.0)),
                ))),
        );
        scene.propagate();

        let mut state = InputState::new();
        let mut controls = ControlState::new();
        let mut router = InputRouter::new();
        router.bind(Binding::ClickTriggers {
            node: "rocket".to_string(),
        });

        // Click the far corner: the ray misses the bounding sphere.
        state.mouse.press(MouseButton::Left);
        router.route(
            &state,
            CursorPosition { x: 2.0, y: 2.0 },
            viewport,
            &mut scene,
            &mut controls,
        );

        let node = scene.node(rocket).unwrap();
        match node.behavior.as_ref().unwrap() {
            Behavior::Transit(t) => assert_eq!(t.state(), TransitState::Idle),
            _ => unreachable!(),
        }
    }
}
