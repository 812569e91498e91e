//! Scene graph — a tree of nodes with parent-relative transforms.
//!
//! The [`Scene`] owns every node, the camera, and the lights. Nodes live in
//! a generational arena: a [`NodeId`] pairs a slot index with a generation
//! counter, so a handle to a despawned node is detected as stale instead of
//! silently pointing at whatever reused the slot.
//!
//! Children are owned by their parent: they are created with
//! [`Scene::spawn_child`] and die with the parent in
//! [`Scene::despawn_recursive`]. Nodes are never re-parented, so the
//! parent/child relation is a tree by construction — no cycles, at most one
//! parent per node.
//!
//! [`Scene::propagate`] walks the tree breadth-first (parents before
//! children) and writes each node's composed world matrix, which the
//! renderer and the pick-ray hit test read.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::behavior::Behavior;
use crate::camera::Camera;
use crate::math::{Mat4, Transform, Vec3};
use crate::render::Shape;

/// A lightweight handle to a node in the [`Scene`].
///
/// Only valid for the scene that created it, and only while its generation
/// matches (i.e. the node has not been despawned).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Raw slot index. Useful for diagnostics, not for lookups.
    pub fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({}v{})", self.index, self.generation)
    }
}

/// A positioned, optionally renderable, optionally animated node.
#[derive(Debug, Default)]
pub struct Node {
    /// Unique name, registered on spawn. `Scene::named` looks nodes up by it.
    pub name: Option<String>,
    /// Local transform, relative to the parent.
    pub transform: Transform,
    /// Composed world matrix, written by [`Scene::propagate`].
    pub world: Mat4,
    /// Per-frame update rule.
    pub behavior: Option<Behavior>,
    /// Visual shape. Nodes without one are pure grouping pivots.
    pub shape: Option<Shape>,
    /// Rigid-body attachment for the physics layer.
    #[cfg(feature = "physics")]
    pub body: Option<crate::physics::RigidBody>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            world: Mat4::IDENTITY,
            ..Self::default()
        }
    }

    /// Set the unique name registered when this node is spawned.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    #[cfg(feature = "physics")]
    pub fn body(mut self, body: crate::physics::RigidBody) -> Self {
        self.body = Some(body);
        self
    }

    /// The node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children, in spawn order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// World-space position, valid after the last [`Scene::propagate`].
    pub fn world_position(&self) -> Vec3 {
        self.world.col(3).truncate()
    }
}

/// A light attached to the scene (not to a node).
#[derive(Debug, Clone, Copy)]
pub enum Light {
    /// Parallel rays from infinitely far away, like the sun.
    Directional {
        /// Direction the light shines toward (normalized by the shader).
        direction: Vec3,
        color: [f32; 3],
        intensity: f32,
    },
    /// Emits in all directions from a position, falling off to zero at
    /// `radius`.
    Point {
        position: Vec3,
        color: [f32; 3],
        intensity: f32,
        radius: f32,
    },
}

/// Constant light applied to all surfaces. Prevents fully-black shadows.
#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.1,
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The scene: node arena, camera, and lights.
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    names: HashMap<String, NodeId>,
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub ambient: AmbientLight,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            names: HashMap::new(),
            camera: Camera::new(),
            lights: Vec::new(),
            ambient: AmbientLight::default(),
        }
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    // ── Spawn / Despawn ──────────────────────────────────────────────

    /// Spawn a root node.
    ///
    /// # Panics
    ///
    /// Panics if the node carries a name that is already registered.
    pub fn spawn(&mut self, node: Node) -> NodeId {
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    /// Spawn a node under a parent. The child's transform is relative to the
    /// parent; the parent's child list keeps spawn order.
    ///
    /// # Panics
    ///
    /// Panics if the parent is not alive, or on a duplicate name.
    pub fn spawn_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        assert!(
            self.is_alive(parent),
            "Cannot spawn child on dead parent {:?}",
            parent
        );
        let id = self.insert(node);
        self.node_mut_unchecked(id).parent = Some(parent);
        self.node_mut_unchecked(parent).children.push(id);
        id
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = if let Some(index) = self.free.pop() {
            let generation = self.slots[index as usize].generation;
            NodeId { index, generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: None,
            });
            NodeId {
                index,
                generation: 0,
            }
        };

        if let Some(name) = &node.name {
            if let Some(&existing) = self.names.get(name) {
                panic!(
                    "Name \"{}\" is already used by {:?} (tried to assign to {:?})",
                    name, existing, id
                );
            }
            self.names.insert(name.clone(), id);
        }

        self.slots[id.index as usize].node = Some(node);
        id
    }

    /// Despawn a node and all its descendants. Removes the node from its
    /// parent's child list (or from the roots).
    ///
    /// Returns `true` if the node was alive.
    pub fn despawn_recursive(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }

        // Detach from parent or root list.
        if let Some(parent) = self.node_unchecked(id).parent {
            self.node_mut_unchecked(parent).children.retain(|&c| c != id);
        } else {
            self.roots.retain(|&r| r != id);
        }

        // Collect the subtree breadth-first, then free every slot.
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let children = self.node_unchecked(doomed[i]).children.clone();
            doomed.extend(children);
            i += 1;
        }
        for victim in doomed {
            let slot = &mut self.slots[victim.index as usize];
            if let Some(node) = slot.node.take() {
                if let Some(name) = &node.name {
                    self.names.remove(name);
                }
            }
            slot.generation += 1;
            self.free.push(victim.index);
        }
        true
    }

    // ── Lookup ───────────────────────────────────────────────────────

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index as usize)
            .map_or(false, |s| s.generation == id.generation && s.node.is_some())
    }

    /// Number of alive nodes.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        if self.is_alive(id) {
            self.slots[id.index as usize].node.as_ref()
        } else {
            None
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.is_alive(id) {
            self.slots[id.index as usize].node.as_mut()
        } else {
            None
        }
    }

    fn node_unchecked(&self, id: NodeId) -> &Node {
        self.slots[id.index as usize].node.as_ref().unwrap()
    }

    fn node_mut_unchecked(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.index as usize].node.as_mut().unwrap()
    }

    /// Look up the node with the given name.
    ///
    /// # Panics
    ///
    /// Panics if no node has that name.
    pub fn named(&self, name: &str) -> NodeId {
        *self
            .names
            .get(name)
            .unwrap_or_else(|| panic!("No node named \"{}\"", name))
    }

    /// Look up a node by name, returning `None` if missing.
    pub fn try_named(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// All alive node ids, in slot order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.node.is_some())
            .map(|(index, s)| NodeId {
                index: index as u32,
                generation: s.generation,
            })
            .collect()
    }

    /// Iterate all alive nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(index, s)| {
            s.node.as_ref().map(|node| {
                (
                    NodeId {
                        index: index as u32,
                        generation: s.generation,
                    },
                    node,
                )
            })
        })
    }

    // ── Transform propagation ────────────────────────────────────────

    /// Recompute every node's world matrix from the tree of local
    /// transforms. Breadth-first, so a parent's world matrix is final before
    /// any of its children compose with it.
    pub fn propagate(&mut self) {
        let mut queue: VecDeque<(NodeId, Mat4)> = VecDeque::new();
        for &root in &self.roots {
            queue.push_back((root, Mat4::IDENTITY));
        }

        while let Some((id, parent_world)) = queue.pop_front() {
            let node = self.node_mut_unchecked(id);
            let world = parent_world * node.transform.matrix();
            node.world = world;
            for &child in &self.node_unchecked(id).children {
                queue.push_back((child, world));
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quat;

    #[test]
    fn root_world_equals_local() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::new().at(Transform::from_xyz(10.0, 20.0, 0.0)));
        scene.propagate();

        let world = scene.node(root).unwrap().world;
        assert_eq!(world, Transform::from_xyz(10.0, 20.0, 0.0).matrix());
    }

    #[test]
    fn child_composes_with_parent() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Node::new().at(Transform::from_xyz(100.0, 0.0, 0.0)));
        let child = scene.spawn_child(parent, Node::new().at(Transform::from_xyz(10.0, 0.0, 0.0)));
        scene.propagate();

        let pos = scene.node(child).unwrap().world_position();
        assert!((pos.x - 110.0).abs() < 1e-3);
        assert!(pos.y.abs() < 1e-3);
    }

    #[test]
    fn parent_moves_child_follows() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Node::new());
        let child = scene.spawn_child(parent, Node::new().at(Transform::from_xyz(5.0, 0.0, 0.0)));
        scene.propagate();

        scene.node_mut(parent).unwrap().transform.translation = Vec3::new(50.0, 0.0, 0.0);
        scene.propagate();

        let pos = scene.node(child).unwrap().world_position();
        assert!((pos.x - 55.0).abs() < 1e-3);
    }

    #[test]
    fn parent_rotation_swings_child() {
        let mut scene = Scene::new();
        // A pendulum pivot with a bob hanging 2 units below.
        let pivot = scene.spawn(Node::new());
        let bob = scene.spawn_child(pivot, Node::new().at(Transform::from_xyz(0.0, -2.0, 0.0)));

        scene.node_mut(pivot).unwrap().transform.rotation =
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        scene.propagate();

        // Rotating the pivot 90° about Z sends the bob sideways.
        let pos = scene.node(bob).unwrap().world_position();
        assert!((pos.x - 2.0).abs() < 1e-3);
        assert!(pos.y.abs() < 1e-3);
    }

    #[test]
    fn deep_chain_accumulates() {
        let mut scene = Scene::new();
        let a = scene.spawn(Node::new().at(Transform::from_xyz(1.0, 0.0, 0.0)));
        let b = scene.spawn_child(a, Node::new().at(Transform::from_xyz(2.0, 0.0, 0.0)));
        let c = scene.spawn_child(b, Node::new().at(Transform::from_xyz(3.0, 0.0, 0.0)));
        scene.propagate();

        let pos = scene.node(c).unwrap().world_position();
        assert!((pos.x - 6.0).abs() < 1e-3);
    }

    #[test]
    fn despawn_recursive_removes_subtree() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Node::new());
        let child = scene.spawn_child(parent, Node::new());
        let grandchild = scene.spawn_child(child, Node::new());
        let _other = scene.spawn(Node::new());
        assert_eq!(scene.node_count(), 4);

        assert!(scene.despawn_recursive(parent));

        assert_eq!(scene.node_count(), 1);
        assert!(!scene.is_alive(parent));
        assert!(!scene.is_alive(child));
        assert!(!scene.is_alive(grandchild));
    }

    #[test]
    fn despawn_child_updates_parent_list() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Node::new());
        let child1 = scene.spawn_child(parent, Node::new());
        let _child2 = scene.spawn_child(parent, Node::new());

        scene.despawn_recursive(child1);

        assert!(scene.is_alive(parent));
        assert_eq!(scene.node(parent).unwrap().children().len(), 1);
    }

    #[test]
    fn stale_id_is_detected() {
        let mut scene = Scene::new();
        let old = scene.spawn(Node::new());
        scene.despawn_recursive(old);

        // Reuse the slot; the stale handle must not resolve to the new node.
        let fresh = scene.spawn(Node::new());
        assert_eq!(fresh.index(), old.index());
        assert!(!scene.is_alive(old));
        assert!(scene.node(old).is_none());
        assert!(scene.is_alive(fresh));
    }

    #[test]
    fn named_lookup() {
        let mut scene = Scene::new();
        let rocket = scene.spawn(Node::new().named("rocket"));
        assert_eq!(scene.named("rocket"), rocket);
        assert_eq!(scene.try_named("ghost"), None);
    }

    #[test]
    #[should_panic(expected = "already used")]
    fn duplicate_name_panics() {
        let mut scene = Scene::new();
        scene.spawn(Node::new().named("pad"));
        scene.spawn(Node::new().named("pad"));
    }

    #[test]
    fn despawn_frees_name() {
        let mut scene = Scene::new();
        let pad = scene.spawn(Node::new().named("pad"));
        scene.despawn_recursive(pad);
        assert_eq!(scene.try_named("pad"), None);

        // The name can be reused afterwards.
        scene.spawn(Node::new().named("pad"));
    }
}
