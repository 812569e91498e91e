//! Animation behaviors — per-frame update rules for scene nodes.
//!
//! Three update-rule shapes cover every animated entity in the demos, so
//! they are modeled as one tagged set instead of duplicated control flow:
//!
//! - [`Oscillator`] — integrates an angle each frame and reflects at a
//!   bound. A pendulum.
//! - [`Orbiter`] — a pure function of elapsed time; nothing is integrated,
//!   so it is restartable and immune to accumulation error.
//! - [`Transit`] — a finite-state machine moving a node between two named
//!   endpoints with a one-shot rotation halfway through.
//!
//! A behavior reads the clock and the [`ControlState`] and writes its node's
//! local [`Transform`]. Nothing else — no I/O, no scene access.
//! [`run_behaviors`] is the per-frame pass the driver runs over the scene.

use std::f32::consts::FRAC_PI_2;

use crate::control::ControlState;
use crate::math::{Quat, Transform, Vec3};
use crate::scene::Scene;
use crate::time::FrameClock;

/// Rotation axis for behaviors that spin about a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn rotation(self, angle: f32) -> Quat {
        match self {
            Axis::X => Quat::from_rotation_x(angle),
            Axis::Y => Quat::from_rotation_y(angle),
            Axis::Z => Quat::from_rotation_z(angle),
        }
    }
}

// ── Oscillator ──────────────────────────────────────────────────────────

/// Reflect-at-bound angle integration: `angle += speed` each frame, and the
/// speed negates once `|angle|` exceeds the bound.
///
/// The speed is fixed at construction. A row of oscillators whose speeds
/// fall off with arm length desynchronizes and re-synchronizes over time —
/// the pendulum-wave effect.
///
/// The oscillator holds its rest pose until the gate flag in the control
/// state first reads `true`. Integration is per-frame (not per-second) and
/// purely additive, so identical speeds and frame counts reproduce
/// bit-identical angle sequences.
#[derive(Debug, Clone)]
pub struct Oscillator {
    speed: f32,
    bound: f32,
    axis: Axis,
    gate: String,
    angle: f32,
    rest: Quat,
}

impl Oscillator {
    /// An oscillator with the given per-frame angular step, bounded at ±π/2,
    /// swinging about X, gated by the `"go"` flag.
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            bound: FRAC_PI_2,
            axis: Axis::X,
            gate: "go".to_string(),
            angle: 0.0,
            rest: Quat::IDENTITY,
        }
    }

    pub fn with_bound(mut self, bound: f32) -> Self {
        self.bound = bound;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Name of the control flag that activates the oscillator.
    pub fn with_gate(mut self, gate: impl Into<String>) -> Self {
        self.gate = gate.into();
        self
    }

    /// Rotation held (and swung around) while at rest.
    pub fn with_rest(mut self, rest: Quat) -> Self {
        self.rest = rest;
        self
    }

    /// Current integrated angle.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    fn update(&mut self, transform: &mut Transform, controls: &ControlState) {
        if !controls.flag(&self.gate) {
            transform.rotation = self.rest;
            return;
        }
        self.angle += self.speed;
        if self.angle.abs() > self.bound {
            self.speed = -self.speed;
        }
        transform.rotation = self.rest * self.axis.rotation(self.angle);
    }
}

// ── Orbiter ─────────────────────────────────────────────────────────────

/// A purely time-parameterized rotation about Y:
/// `rotation.y = elapsed * speed * multiplier`.
///
/// No state persists between frames — the angle is recomputed fresh from
/// elapsed time, so the orbiter is trivially resumable and two evaluations
/// at the same instant agree exactly. The multiplier is a shared named
/// scalar in the control state (default `"rotation_speed"`, reading 1.0
/// while unset).
#[derive(Debug, Clone)]
pub struct Orbiter {
    speed: f32,
    multiplier: String,
}

impl Orbiter {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            multiplier: "rotation_speed".to_string(),
        }
    }

    /// Name of the shared control scalar that scales every orbiter.
    pub fn with_multiplier(mut self, name: impl Into<String>) -> Self {
        self.multiplier = name.into();
        self
    }

    /// The angle written at the given elapsed time. Exposed so the purity
    /// property (angle == elapsed × speed × multiplier) is checkable.
    pub fn angle_at(&self, elapsed: f32, controls: &ControlState) -> f32 {
        elapsed * self.speed * controls.scalar_or(&self.multiplier, 1.0)
    }

    fn update(&self, transform: &mut Transform, elapsed: f32, controls: &ControlState) {
        transform.rotation = Quat::from_rotation_y(self.angle_at(elapsed, controls));
    }
}

// ── Transit ─────────────────────────────────────────────────────────────

/// Phase of a [`Transit`] animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitState {
    /// Parked at the current base, waiting for a trigger.
    Idle,
    /// Moving toward the other base, pre-rotation.
    Ascending,
    /// Still moving; orientation is interpolating toward the target angle.
    Rotating,
    /// Orientation latched at the target; pure translation remains.
    Arrived,
}

/// A finite-state machine carrying a node between two named endpoints.
///
/// `trigger` is accepted only while [`Idle`](TransitState::Idle) — at most
/// one transit is ever in flight, and re-triggers mid-flight are idempotent
/// no-ops. While moving, the position integrates toward the target endpoint
/// at fixed speed. At ≥50% of the planned distance the FSM enters
/// [`Rotating`](TransitState::Rotating) once, turning the node toward the
/// direction-dependent target angle at fixed angular speed; reaching that
/// angle latches into [`Arrived`](TransitState::Arrived) and no further
/// rotation happens this transit. On reaching the destination exactly the
/// state returns to `Idle` and the current base toggles, so the next
/// trigger flies back — two completed transits restore the starting
/// transform and state.
#[derive(Debug, Clone)]
pub struct Transit {
    state: TransitState,
    bases: [(String, Vec3); 2],
    /// Index of the current base in `bases`.
    current: usize,
    speed: f32,
    angular_speed: f32,
    /// Orientation target (about Z) when parked at the second base. The
    /// first base's target is zero.
    flip: f32,
    orientation: f32,
}

impl Transit {
    /// A transit between two named endpoints, starting parked at the first.
    pub fn between(
        from: (impl Into<String>, Vec3),
        to: (impl Into<String>, Vec3),
    ) -> Self {
        Self {
            state: TransitState::Idle,
            bases: [(from.0.into(), from.1), (to.0.into(), to.1)],
            current: 0,
            speed: 4.0,
            angular_speed: 2.0,
            flip: std::f32::consts::PI,
            orientation: 0.0,
        }
    }

    /// Travel speed in units per second.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Rotation speed in radians per second.
    pub fn with_angular_speed(mut self, angular_speed: f32) -> Self {
        self.angular_speed = angular_speed;
        self
    }

    /// Orientation (about Z) the node turns to on the way out. The return
    /// trip turns back to zero.
    pub fn with_flip(mut self, flip: f32) -> Self {
        self.flip = flip;
        self
    }

    pub fn state(&self) -> TransitState {
        self.state
    }

    /// Name of the base the node is at (or departing from).
    pub fn current_base(&self) -> &str {
        &self.bases[self.current].0
    }

    /// Request a transit to the other base. Accepted only while `Idle`;
    /// returns whether the trigger took effect.
    pub fn trigger(&mut self) -> bool {
        if self.state == TransitState::Idle {
            self.state = TransitState::Ascending;
            true
        } else {
            false
        }
    }

    fn origin(&self) -> Vec3 {
        self.bases[self.current].1
    }

    fn target(&self) -> Vec3 {
        self.bases[1 - self.current].1
    }

    /// Orientation to reach during this transit.
    fn orientation_target(&self) -> f32 {
        if self.current == 0 { self.flip } else { 0.0 }
    }

    fn update(&mut self, transform: &mut Transform, dt: f32) {
        if self.state == TransitState::Idle {
            return;
        }

        let origin = self.origin();
        let target = self.target();
        let total = (target - origin).length();
        if total <= f32::EPSILON {
            // Degenerate endpoints: nothing to fly.
            self.state = TransitState::Idle;
            return;
        }
        let dir = (target - origin) / total;

        // Integrate position toward the target, clamping at arrival.
        let remaining = (target - transform.translation).length();
        let step = self.speed * dt;
        let arrived = step >= remaining;
        if arrived {
            transform.translation = target;
        } else {
            transform.translation += dir * step;
        }

        let progress = (transform.translation - origin).dot(dir) / total;

        // One-shot: the rotation phase starts at the halfway mark and only
        // from Ascending, never again within the same transit.
        if self.state == TransitState::Ascending && progress >= 0.5 {
            self.state = TransitState::Rotating;
        }

        if self.state == TransitState::Rotating {
            let target_angle = self.orientation_target();
            let delta = target_angle - self.orientation;
            let turn = self.angular_speed * dt;
            if delta.abs() <= turn {
                self.orientation = target_angle;
                self.state = TransitState::Arrived;
            } else {
                self.orientation += turn.copysign(delta);
            }
        }

        if arrived {
            // Snap orientation home even if the rotation phase was still in
            // flight, toggle the base, and go back to waiting.
            self.orientation = self.orientation_target();
            self.current = 1 - self.current;
            self.state = TransitState::Idle;
        }

        transform.rotation = Quat::from_rotation_z(self.orientation);
    }
}

// ── Behavior ────────────────────────────────────────────────────────────

/// The tagged set of per-frame update rules a node can carry.
#[derive(Debug, Clone)]
pub enum Behavior {
    Oscillator(Oscillator),
    Orbiter(Orbiter),
    Transit(Transit),
}

impl Behavior {
    /// Apply one frame of this behavior to the node's local transform.
    pub fn update(
        &mut self,
        transform: &mut Transform,
        dt: f32,
        elapsed: f32,
        controls: &ControlState,
    ) {
        match self {
            Behavior::Oscillator(o) => o.update(transform, controls),
            Behavior::Orbiter(o) => o.update(transform, elapsed, controls),
            Behavior::Transit(t) => t.update(transform, dt),
        }
    }

    /// Forward a trigger to the transit FSM, if this is one. Returns whether
    /// a transit actually started.
    pub fn trigger(&mut self) -> bool {
        match self {
            Behavior::Transit(t) => t.trigger(),
            _ => false,
        }
    }
}

impl From<Oscillator> for Behavior {
    fn from(o: Oscillator) -> Self {
        Behavior::Oscillator(o)
    }
}

impl From<Orbiter> for Behavior {
    fn from(o: Orbiter) -> Self {
        Behavior::Orbiter(o)
    }
}

impl From<Transit> for Behavior {
    fn from(t: Transit) -> Self {
        Behavior::Transit(t)
    }
}

/// Run every node's behavior for the current frame.
pub fn run_behaviors(scene: &mut Scene, clock: &FrameClock, controls: &ControlState) {
    let dt = clock.delta_secs();
    let elapsed = clock.elapsed_secs();
    for id in scene.ids() {
        let Some(node) = scene.node_mut(id) else {
            continue;
        };
        if let Some(behavior) = node.behavior.as_mut() {
            behavior.update(&mut node.transform, dt, elapsed, controls);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn armed_controls() -> ControlState {
        let mut controls = ControlState::new();
        controls.set_flag("go", true);
        controls
    }

    // ── Oscillator ──────────────────────────────────────────────────

    #[test]
    fn oscillator_holds_rest_until_gated() {
        let mut osc = Oscillator::new(0.1);
        let mut tf = Transform::IDENTITY;
        let controls = ControlState::new();

        for _ in 0..50 {
            osc.update(&mut tf, &controls);
        }
        assert_eq!(osc.angle(), 0.0);
        assert_eq!(tf.rotation, Quat::IDENTITY);
    }

    #[test]
    fn oscillator_stays_within_bound_plus_one_step() {
        let speed = 0.13;
        let mut osc = Oscillator::new(speed);
        let mut tf = Transform::IDENTITY;
        let controls = armed_controls();

        for _ in 0..10_000 {
            osc.update(&mut tf, &controls);
            assert!(
                osc.angle().abs() <= FRAC_PI_2 + speed,
                "angle {} escaped the bound",
                osc.angle()
            );
        }
    }

    #[test]
    fn oscillator_reverses_at_bound() {
        let mut osc = Oscillator::new(1.0).with_bound(1.5);
        let mut tf = Transform::IDENTITY;
        let controls = armed_controls();

        // 1.0, 2.0 (past bound, speed flips), 1.0, 0.0, -1.0, ...
        osc.update(&mut tf, &controls);
        assert_eq!(osc.angle(), 1.0);
        osc.update(&mut tf, &controls);
        assert_eq!(osc.angle(), 2.0);
        osc.update(&mut tf, &controls);
        assert_eq!(osc.angle(), 1.0);
    }

    #[test]
    fn oscillator_row_is_deterministic() {
        // The pendulum-wave configuration: 15 oscillators, speeds falling
        // off with arm length. Two runs must agree bit-for-bit.
        let speeds: Vec<f32> = (0..15).map(|i| 0.02 / (1.0 + i as f32 * 0.15)).collect();
        let controls = armed_controls();

        let run = |frames: usize| -> Vec<f32> {
            let mut oscillators: Vec<Oscillator> =
                speeds.iter().map(|&s| Oscillator::new(s)).collect();
            let mut tf = Transform::IDENTITY;
            for _ in 0..frames {
                for osc in &mut oscillators {
                    osc.update(&mut tf, &controls);
                }
            }
            oscillators.iter().map(|o| o.angle()).collect()
        };

        let a = run(5_000);
        let b = run(5_000);
        assert_eq!(a, b);

        // And each angle matches an independent replay of the reflect rule.
        for (i, &speed) in speeds.iter().enumerate() {
            let mut angle = 0.0f32;
            let mut v = speed;
            for _ in 0..5_000 {
                angle += v;
                if angle.abs() > FRAC_PI_2 {
                    v = -v;
                }
            }
            assert_eq!(a[i], angle, "oscillator {i} diverged");
        }
    }

    // ── Orbiter ─────────────────────────────────────────────────────

    #[test]
    fn orbiter_angle_is_pure_in_elapsed_time() {
        let orbiter = Orbiter::new(1.0);
        let mut controls = ControlState::new();
        controls.set_scalar("rotation_speed", 2.0);

        assert_eq!(orbiter.angle_at(3.0, &controls), 6.0);
        // Re-evaluating at the same instant drifts nowhere.
        assert_eq!(orbiter.angle_at(3.0, &controls), 6.0);
    }

    #[test]
    fn orbiter_multiplier_defaults_to_one() {
        let orbiter = Orbiter::new(0.5);
        let controls = ControlState::new();
        assert_eq!(orbiter.angle_at(4.0, &controls), 2.0);
    }

    #[test]
    fn orbiter_writes_y_rotation() {
        let orbiter = Orbiter::new(1.0);
        let controls = ControlState::new();
        let mut tf = Transform::IDENTITY;
        orbiter.update(&mut tf, 0.25, &controls);
        assert_eq!(tf.rotation, Quat::from_rotation_y(0.25));
    }

    // ── Transit ─────────────────────────────────────────────────────

    fn test_transit() -> Transit {
        Transit::between(("pad-a", Vec3::ZERO), ("pad-b", Vec3::new(0.0, 10.0, 0.0)))
            .with_speed(1.0)
            .with_angular_speed(1.0)
    }

    #[test]
    fn trigger_only_from_idle() {
        let mut transit = test_transit();
        assert_eq!(transit.state(), TransitState::Idle);
        assert!(transit.trigger());
        assert_eq!(transit.state(), TransitState::Ascending);

        // Re-triggering mid-flight is rejected and changes nothing.
        assert!(!transit.trigger());
        assert_eq!(transit.state(), TransitState::Ascending);
    }

    #[test]
    fn retrigger_while_rotating_is_rejected() {
        let mut transit = test_transit();
        let mut tf = Transform::IDENTITY;
        transit.trigger();

        // Past the halfway mark the FSM is rotating.
        for _ in 0..6 {
            transit.update(&mut tf, 1.0);
        }
        assert_eq!(transit.state(), TransitState::Rotating);
        assert!(!transit.trigger());
        assert_eq!(transit.state(), TransitState::Rotating);
    }

    #[test]
    fn rotation_starts_at_half_distance() {
        let mut transit = test_transit();
        let mut tf = Transform::IDENTITY;
        transit.trigger();

        for _ in 0..4 {
            transit.update(&mut tf, 1.0);
        }
        // 4 of 10 units: still pre-rotation.
        assert_eq!(transit.state(), TransitState::Ascending);

        transit.update(&mut tf, 1.0);
        // 5 of 10 units: the one-shot rotation phase has begun.
        assert_eq!(transit.state(), TransitState::Rotating);
    }

    #[test]
    fn rotation_latches_before_arrival() {
        let mut transit = test_transit().with_angular_speed(10.0);
        let mut tf = Transform::IDENTITY;
        transit.trigger();

        for _ in 0..6 {
            transit.update(&mut tf, 1.0);
        }
        // The fast turn finished in one step; only translation remains.
        assert_eq!(transit.state(), TransitState::Arrived);
        assert_eq!(transit.current_base(), "pad-a");
    }

    #[test]
    fn arrival_toggles_base_and_returns_to_idle() {
        let mut transit = test_transit().with_angular_speed(10.0);
        let mut tf = Transform::IDENTITY;
        transit.trigger();

        for _ in 0..20 {
            transit.update(&mut tf, 1.0);
        }
        assert_eq!(transit.state(), TransitState::Idle);
        assert_eq!(transit.current_base(), "pad-b");
        assert_eq!(tf.translation, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn round_trip_restores_start_transform() {
        let mut transit = test_transit().with_angular_speed(10.0);
        let mut tf = Transform::IDENTITY;

        // Out...
        assert!(transit.trigger());
        for _ in 0..20 {
            transit.update(&mut tf, 1.0);
        }
        assert_eq!(transit.current_base(), "pad-b");

        // ...and back.
        assert!(transit.trigger());
        for _ in 0..20 {
            transit.update(&mut tf, 1.0);
        }
        assert_eq!(transit.current_base(), "pad-a");
        assert_eq!(transit.state(), TransitState::Idle);
        assert_eq!(tf.translation, Vec3::ZERO);
        assert_eq!(tf.rotation, Quat::from_rotation_z(0.0));
    }

    #[test]
    fn no_motion_without_trigger() {
        let mut transit = test_transit();
        let mut tf = Transform::IDENTITY;
        for _ in 0..10 {
            transit.update(&mut tf, 1.0);
        }
        assert_eq!(tf.translation, Vec3::ZERO);
        assert_eq!(transit.state(), TransitState::Idle);
    }

    // ── run_behaviors ───────────────────────────────────────────────

    #[test]
    fn pass_updates_every_node() {
        use crate::scene::{Node, Scene};

        let mut scene = Scene::new();
        scene.spawn(Node::new().behavior(Orbiter::new(1.0).into()));
        let osc = scene.spawn(Node::new().behavior(Oscillator::new(0.1).into()));

        let mut clock = FrameClock::new();
        clock.advance(Duration::from_millis(250));
        let controls = armed_controls();

        run_behaviors(&mut scene, &clock, &controls);

        let node = scene.node(osc).unwrap();
        match node.behavior.as_ref().unwrap() {
            Behavior::Oscillator(o) => assert!((o.angle() - 0.1).abs() < 1e-6),
            _ => unreachable!(),
        }
    }

    #[test]
    fn paused_clock_freezes_orbiters() {
        use crate::scene::{Node, Scene};

        let mut scene = Scene::new();
        let orbiter = scene.spawn(Node::new().behavior(Orbiter::new(1.0).into()));

        let mut clock = FrameClock::new();
        clock.advance(Duration::from_secs(1));
        let controls = ControlState::new();

        run_behaviors(&mut scene, &clock, &controls);
        let before = scene.node(orbiter).unwrap().transform.rotation;

        // Pausing freezes elapsed time, so further passes rewrite the same
        // rotation.
        clock.set_paused(true);
        clock.advance(Duration::from_secs(5));
        run_behaviors(&mut scene, &clock, &controls);
        let after = scene.node(orbiter).unwrap().transform.rotation;
        assert_eq!(before, after);
    }
}
