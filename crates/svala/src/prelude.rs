//! Common imports for building scenes: `use svala::prelude::*`.

pub use crate::app::{App, Context};
pub use crate::behavior::{Axis, Behavior, Orbiter, Oscillator, Transit, TransitState};
pub use crate::blueprint::SceneDoc;
pub use crate::camera::{Camera, Viewport};
pub use crate::control::ControlState;
pub use crate::input::{Binding, KeyCode, MouseButton};
pub use crate::math::{Mat4, Quat, Transform, Vec2, Vec3};
pub use crate::render::{ClearColor, Shape};
pub use crate::scene::{AmbientLight, Light, Node, NodeId, Scene};
pub use crate::time::FrameClock;

#[cfg(feature = "physics")]
pub use crate::physics::{
    BodyKind, ColliderShape, PhysicsWorld, RespawnPolicy, RigidBody, SpawnVolume,
};
