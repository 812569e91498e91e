//! 3D physics integration via Rapier.
//!
//! The simulation is fully delegated: scene nodes carry a [`RigidBody`]
//! describing a shape and body type, [`PhysicsWorld::step`] feeds new bodies
//! to Rapier, advances the pipeline with a fixed timestep, and copies each
//! dynamic body's pose back onto its node's transform. Nodes despawned from
//! the scene have their bodies removed on the next step.
//!
//! [`PhysicsWorld::respawn_pass`] layers the bounded-volume respawn policy
//! on top: bodies that fall below a floor threshold are teleported back
//! into a spawn volume with their velocity zeroed, and each one is paired
//! with a freshly spawned, differently colored duplicate. The population
//! only grows — faithfully reproducing the observed behavior — unless an
//! explicit cap is configured.

use std::collections::HashMap;

use rapier3d::prelude::*;

use crate::math::{Quat, Transform, Vec3};
use crate::render::Shape;
use crate::scene::{Node, NodeId, Scene};

// ── Components ──────────────────────────────────────────────────────────

/// Body type: simulated or immovable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Affected by gravity and collisions.
    Dynamic,
    /// Never moves. Walls, floors, pads.
    Fixed,
}

/// Collider shape fed to the physics library.
#[derive(Debug, Clone, Copy)]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { hx: f32, hy: f32, hz: f32 },
}

/// A rigid-body attachment for a scene node.
///
/// Attach alongside a transform; the Rapier handle is managed internally.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub kind: BodyKind,
    pub shape: ColliderShape,
    pub linear_velocity: Vec3,
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub(crate) handle: Option<RigidBodyHandle>,
}

impl RigidBody {
    /// A dynamic body with the given collider shape.
    pub fn dynamic(shape: ColliderShape) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            linear_velocity: Vec3::ZERO,
            restitution: 0.0,
            friction: 0.5,
            density: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            handle: None,
        }
    }

    /// A fixed (static) body with the given collider shape.
    pub fn fixed(shape: ColliderShape) -> Self {
        Self {
            kind: BodyKind::Fixed,
            ..Self::dynamic(shape)
        }
    }

    pub fn with_linear_velocity(mut self, v: Vec3) -> Self {
        self.linear_velocity = v;
        self
    }

    pub fn with_restitution(mut self, r: f32) -> Self {
        self.restitution = r;
        self
    }

    pub fn with_friction(mut self, f: f32) -> Self {
        self.friction = f;
        self
    }

    pub fn with_density(mut self, d: f32) -> Self {
        self.density = d;
        self
    }

    pub fn with_linear_damping(mut self, d: f32) -> Self {
        self.linear_damping = d;
        self
    }

    pub fn with_angular_damping(mut self, d: f32) -> Self {
        self.angular_damping = d;
        self
    }

    /// A copy ready to attach to a new node: same configuration, no handle,
    /// velocity zeroed.
    pub fn duplicate(&self) -> Self {
        Self {
            linear_velocity: Vec3::ZERO,
            handle: None,
            ..self.clone()
        }
    }
}

// ── Respawn policy ──────────────────────────────────────────────────────

/// Axis-aligned box positions are respawned into.
#[derive(Debug, Clone, Copy)]
pub struct SpawnVolume {
    pub min: Vec3,
    pub max: Vec3,
}

impl SpawnVolume {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    fn sample(&self, rng: &mut fastrand::Rng) -> Vec3 {
        Vec3::new(
            self.min.x + rng.f32() * (self.max.x - self.min.x),
            self.min.y + rng.f32() * (self.max.y - self.min.y),
            self.min.z + rng.f32() * (self.max.z - self.min.z),
        )
    }
}

/// Configuration for the bounded-volume respawn pass.
///
/// `cap: None` reproduces the observed behavior faithfully: the tracked
/// population only grows. `cap: Some(n)` stops duplication (but not
/// teleporting) once `n` dynamic bodies exist.
#[derive(Debug)]
pub struct RespawnPolicy {
    pub floor_y: f32,
    pub volume: SpawnVolume,
    pub cap: Option<usize>,
    rng: fastrand::Rng,
}

impl RespawnPolicy {
    pub fn new(floor_y: f32, volume: SpawnVolume) -> Self {
        Self {
            floor_y,
            volume,
            cap: None,
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Fix the randomization seed, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// A random position inside the spawn volume.
    pub fn sample_position(&mut self) -> Vec3 {
        self.volume.sample(&mut self.rng)
    }

    /// A random saturated color for a duplicate, so it reads as new.
    pub fn sample_color(&mut self) -> [f32; 4] {
        let [r, g, b] = hsl_to_rgb(self.rng.f32(), 0.7, 0.6);
        [r, g, b, 1.0]
    }
}

/// Convert an HSL color (all components 0..1) to linear-ish RGB.
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h * 6.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m]
}

// ── World ───────────────────────────────────────────────────────────────

/// The physics world. Step it once per frame with the frame delta.
pub struct PhysicsWorld {
    gravity: Vec3,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    node_of: HashMap<RigidBodyHandle, NodeId>,
    accumulator: f32,
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish()
    }
}

impl PhysicsWorld {
    /// A physics world with default gravity (0, -9.81, 0).
    pub fn new() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            node_of: HashMap::new(),
            accumulator: 0.0,
        }
    }

    /// Set gravity (builder pattern).
    pub fn with_gravity(mut self, g: Vec3) -> Self {
        self.gravity = g;
        self
    }

    /// Number of registered rigid bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Current simulated position of a node's body, if registered.
    pub fn body_position(&self, body: &RigidBody) -> Option<Vec3> {
        let handle = body.handle?;
        self.bodies.get(handle).map(|b| b.translation())
    }

    /// Advance the simulation by one frame.
    ///
    /// Physics runs with a fixed timestep (default 1/60 s) behind an
    /// accumulator, decoupling simulation from display cadence. The frame
    /// delta is capped so a long hitch cannot trigger a runaway number of
    /// catch-up steps.
    pub fn step(&mut self, scene: &mut Scene, frame_dt: f32) {
        if frame_dt <= 0.0 {
            return;
        }

        self.accumulator += frame_dt.min(0.25);
        if self.accumulator < self.params.dt {
            return;
        }

        // 1. Remove bodies whose nodes have been despawned.
        let dead: Vec<RigidBodyHandle> = self
            .node_of
            .iter()
            .filter(|(_, &id)| !scene.is_alive(id))
            .map(|(&h, _)| h)
            .collect();
        for handle in dead {
            self.node_of.remove(&handle);
            self.bodies.remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }

        // 2. Register new bodies (handle is None).
        for id in scene.ids() {
            let Some(node) = scene.node(id) else { continue };
            let Some(body) = &node.body else { continue };
            if body.handle.is_some() {
                continue;
            }

            let body_type = match body.kind {
                BodyKind::Dynamic => RigidBodyType::Dynamic,
                BodyKind::Fixed => RigidBodyType::Fixed,
            };
            let rb = RigidBodyBuilder::new(body_type)
                .translation(node.transform.translation)
                .rotation(quat_to_scaled_axis(node.transform.rotation))
                .linvel(body.linear_velocity)
                .linear_damping(body.linear_damping)
                .angular_damping(body.angular_damping)
                .build();
            let collider = collider_builder(body.shape)
                .restitution(body.restitution)
                .friction(body.friction)
                .density(body.density)
                .build();

            let handle = self.bodies.insert(rb);
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
            self.node_of.insert(handle, id);
            if let Some(node) = scene.node_mut(id) {
                if let Some(body) = node.body.as_mut() {
                    body.handle = Some(handle);
                }
            }
        }

        // 3. Step with fixed dt, consuming the accumulator.
        let fixed_dt = self.params.dt;
        while self.accumulator >= fixed_dt {
            self.pipeline.step(
                self.gravity,
                &self.params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                &(),
                &(),
            );
            self.accumulator -= fixed_dt;
        }

        // 4. Copy dynamic body poses back onto node transforms.
        let mut sync: Vec<(NodeId, Vec3, Quat)> = Vec::new();
        for (&handle, &id) in &self.node_of {
            if let Some(body) = self.bodies.get(handle) {
                if body.is_dynamic() {
                    sync.push((id, body.translation(), *body.rotation()));
                }
            }
        }
        for (id, pos, rot) in sync {
            if let Some(node) = scene.node_mut(id) {
                node.transform.translation = pos;
                node.transform.rotation = rot;
            }
        }
    }

    /// Apply the bounded-volume respawn policy after a step.
    ///
    /// Every dynamic body below `policy.floor_y` is teleported to a random
    /// position in the spawn volume with its velocity reset, and — cap
    /// permitting — paired with a new duplicate node spawned into the
    /// scene. Returns the number of duplicates spawned.
    pub fn respawn_pass(&mut self, scene: &mut Scene, policy: &mut RespawnPolicy) -> usize {
        let fallen: Vec<(RigidBodyHandle, NodeId)> = self
            .node_of
            .iter()
            .filter(|(&handle, &id)| {
                scene.is_alive(id)
                    && self
                        .bodies
                        .get(handle)
                        .map_or(false, |b| b.is_dynamic() && b.translation().y < policy.floor_y)
            })
            .map(|(&h, &id)| (h, id))
            .collect();

        let mut population = self
            .node_of
            .values()
            .filter(|&&id| {
                scene
                    .node(id)
                    .and_then(|n| n.body.as_ref())
                    .map_or(false, |b| b.kind == BodyKind::Dynamic)
            })
            .count();

        let mut spawned = 0;
        for (handle, id) in fallen {
            // Teleport the stray back into the volume, velocity zeroed.
            let new_pos = policy.sample_position();
            if let Some(body) = self.bodies.get_mut(handle) {
                body.set_translation(new_pos, true);
                body.set_linvel(Vec3::ZERO, true);
                body.set_angvel(Vec3::ZERO, true);
            }
            if let Some(node) = scene.node_mut(id) {
                node.transform.translation = new_pos;
            }

            // Insert a visually distinct duplicate, unless capped.
            if policy.cap.is_some_and(|cap| population >= cap) {
                continue;
            }
            let Some(node) = scene.node(id) else { continue };
            let Some(template) = node.body.as_ref().map(RigidBody::duplicate) else {
                continue;
            };
            let shape = node
                .shape
                .clone()
                .map(|s| s.color(policy.sample_color()))
                .unwrap_or_else(|| match template.shape {
                    ColliderShape::Ball { radius } => {
                        Shape::sphere(radius).color(policy.sample_color())
                    }
                    ColliderShape::Cuboid { hx, hy, hz } => {
                        Shape::cuboid(hx * 2.0, hy * 2.0, hz * 2.0).color(policy.sample_color())
                    }
                });

            let spawn_pos = policy.sample_position();
            scene.spawn(
                Node::new()
                    .at(Transform::from_translation(spawn_pos))
                    .shape(shape)
                    .body(template),
            );
            population += 1;
            spawned += 1;
        }

        if spawned > 0 {
            log::debug!("respawn pass spawned {spawned} duplicate(s)");
        }
        spawned
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

// ── Conversion helpers ──────────────────────────────────────────────────

fn collider_builder(shape: ColliderShape) -> ColliderBuilder {
    match shape {
        ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
        ColliderShape::Cuboid { hx, hy, hz } => ColliderBuilder::cuboid(hx, hy, hz),
    }
}

/// Convert a quaternion to a scaled-axis-angle vector (for
/// `RigidBodyBuilder::rotation`).
fn quat_to_scaled_axis(q: Quat) -> Vec3 {
    let (axis, angle) = q.to_axis_angle();
    axis * angle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_node(x: f32, y: f32, z: f32, radius: f32) -> Node {
        Node::new()
            .at(Transform::from_xyz(x, y, z))
            .shape(Shape::sphere(radius))
            .body(RigidBody::dynamic(ColliderShape::Ball { radius }))
    }

    fn volume() -> SpawnVolume {
        SpawnVolume::new(Vec3::new(-3.0, 0.5, -3.0), Vec3::new(3.0, 4.5, 3.0))
    }

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut scene = Scene::new();
        let ball = scene.spawn(ball_node(0.0, 5.0, 0.0, 0.3));

        let mut physics = PhysicsWorld::new();
        for _ in 0..30 {
            physics.step(&mut scene, FRAME);
        }

        let y = scene.node(ball).unwrap().transform.translation.y;
        assert!(y < 5.0, "ball should have fallen, y = {y}");
    }

    #[test]
    fn fixed_body_does_not_move() {
        let mut scene = Scene::new();
        let floor = scene.spawn(
            Node::new()
                .at(Transform::from_xyz(0.0, -1.0, 0.0))
                .body(RigidBody::fixed(ColliderShape::Cuboid {
                    hx: 5.0,
                    hy: 0.1,
                    hz: 5.0,
                })),
        );

        let mut physics = PhysicsWorld::new();
        for _ in 0..30 {
            physics.step(&mut scene, FRAME);
        }

        let pos = scene.node(floor).unwrap().transform.translation;
        assert_eq!(pos.y, -1.0);
    }

    #[test]
    fn despawned_node_loses_its_body() {
        let mut scene = Scene::new();
        let ball = scene.spawn(ball_node(0.0, 5.0, 0.0, 0.3));

        let mut physics = PhysicsWorld::new();
        physics.step(&mut scene, FRAME);
        assert_eq!(physics.body_count(), 1);

        scene.despawn_recursive(ball);
        physics.step(&mut scene, FRAME);
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn respawn_teleports_and_duplicates() {
        let mut scene = Scene::new();
        let ball = scene.spawn(ball_node(0.0, -10.0, 0.0, 0.3));

        let mut physics = PhysicsWorld::new();
        physics.step(&mut scene, FRAME);

        let mut policy = RespawnPolicy::new(-6.0, volume()).with_seed(7);
        let before = scene.node_count();
        let spawned = physics.respawn_pass(&mut scene, &mut policy);

        // Exactly one duplicate for the one fallen body.
        assert_eq!(spawned, 1);
        assert_eq!(scene.node_count(), before + 1);

        // The stray was teleported into the volume with velocity reset.
        let body = scene.node(ball).unwrap().body.as_ref().unwrap().clone();
        let pos = physics.body_position(&body).unwrap();
        assert!(volume().contains(pos), "teleported out of volume: {pos}");

        // The duplicate also starts inside the volume.
        let dup = scene
            .iter()
            .find(|(id, n)| *id != ball && n.body.is_some())
            .map(|(_, n)| n.transform.translation)
            .unwrap();
        assert!(volume().contains(dup), "duplicate outside volume: {dup}");
    }

    #[test]
    fn bodies_above_floor_are_left_alone() {
        let mut scene = Scene::new();
        scene.spawn(ball_node(0.0, 3.0, 0.0, 0.3));

        let mut physics = PhysicsWorld::new();
        physics.step(&mut scene, FRAME);

        let mut policy = RespawnPolicy::new(-6.0, volume()).with_seed(7);
        assert_eq!(physics.respawn_pass(&mut scene, &mut policy), 0);
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn cap_stops_duplication_but_not_teleporting() {
        let mut scene = Scene::new();
        let ball = scene.spawn(ball_node(0.0, -10.0, 0.0, 0.3));

        let mut physics = PhysicsWorld::new();
        physics.step(&mut scene, FRAME);

        let mut policy = RespawnPolicy::new(-6.0, volume()).with_seed(7).with_cap(1);
        let spawned = physics.respawn_pass(&mut scene, &mut policy);

        assert_eq!(spawned, 0);
        assert_eq!(scene.node_count(), 1);

        let body = scene.node(ball).unwrap().body.as_ref().unwrap().clone();
        let pos = physics.body_position(&body).unwrap();
        assert!(volume().contains(pos));
    }

    #[test]
    fn population_grows_monotonically_without_cap() {
        let mut scene = Scene::new();
        scene.spawn(ball_node(0.0, -10.0, 0.0, 0.3));

        let mut physics = PhysicsWorld::new();
        let mut policy = RespawnPolicy::new(-6.0, volume()).with_seed(42);

        // Drive several frames with everything repeatedly falling out: the
        // tracked population must never shrink.
        let mut last_count = scene.node_count();
        for _ in 0..5 {
            physics.step(&mut scene, FRAME);
            // Push every registered body straight back under the floor.
            for id in scene.ids() {
                let handle = scene
                    .node(id)
                    .and_then(|n| n.body.as_ref())
                    .and_then(|b| b.handle);
                if let Some(handle) = handle {
                    if let Some(body) = physics.bodies.get_mut(handle) {
                        body.set_translation(Vec3::new(0.0, -10.0, 0.0), true);
                    }
                }
            }
            physics.respawn_pass(&mut scene, &mut policy);
            assert!(scene.node_count() >= last_count);
            last_count = scene.node_count();
        }
        assert!(last_count > 1, "population never grew");
    }

    #[test]
    fn spawn_volume_sampling_stays_inside() {
        let vol = volume();
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..1000 {
            assert!(vol.contains(vol.sample(&mut rng)));
        }
    }

    #[test]
    fn hsl_conversion_stays_in_range() {
        for i in 0..12 {
            let [r, g, b] = hsl_to_rgb(i as f32 / 12.0, 0.7, 0.6);
            for c in [r, g, b] {
                assert!((0.0..=1.0).contains(&c), "channel {c} out of range");
            }
        }
    }
}
