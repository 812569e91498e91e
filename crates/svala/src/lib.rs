//! # Svala — Time-Driven Scene Animation
//!
//! A small framework for animated 3D scenes: a frame clock, a scene graph
//! with parent-relative transforms, a tagged set of time-driven animation
//! behaviors, a winit/wgpu render loop, and an optional rapier-backed
//! physics layer.
//!
//! Start with `use svala::prelude::*` and build an [`App`](app::App).

pub mod app;
pub mod behavior;
pub mod blueprint;
pub mod camera;
pub mod control;
pub mod input;
pub mod math;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod time;
pub(crate) mod window;

#[cfg(feature = "physics")]
pub mod physics;
