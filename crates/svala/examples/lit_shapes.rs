//! Lit shapes — the introductory scene: a few primitives, a light, and a
//! spinning cube driven directly by elapsed time.
//!
//! - **Space** — pause / resume the clock (the cube freezes mid-spin)
//!
//! Run with: `cargo run -p svala --example lit_shapes`

use std::f32::consts::FRAC_PI_2;

use svala::prelude::*;

fn main() {
    env_logger::init();

    App::new("svala — lit shapes (Space: pause)")
        .clear_color([0.08, 0.09, 0.12, 1.0])
        .setup(setup)
        .update(spin_cube)
        .update(toggle_pause)
        .run();
}

fn setup(ctx: &mut Context) {
    let scene = &mut ctx.scene;

    scene.camera = Camera::new()
        .with_fov(75.0)
        .at(Transform::from_xyz(0.0, 10.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y));

    scene.add_light(Light::Directional {
        direction: Vec3::new(-50.0, -100.0, -10.0).normalize(),
        color: [1.0, 1.0, 1.0],
        intensity: 1.0,
    });
    scene.add_light(Light::Point {
        position: Vec3::new(0.0, 5.0, 10.0),
        color: [1.0, 1.0, 1.0],
        intensity: 1.5,
        radius: 40.0,
    });
    scene.ambient.intensity = 0.2;

    // Floor.
    scene.spawn(
        Node::new()
            .at(Transform::from_xyz(0.0, -2.0, 0.0))
            .shape(Shape::plane(20.0, 20.0).color([0.5, 0.5, 0.5, 1.0])),
    );

    // The spinning cube.
    scene.spawn(
        Node::new()
            .named("cube")
            .shape(Shape::cuboid(2.0, 2.0, 2.0).color([0.27, 0.67, 0.53, 1.0]).shininess(60.0)),
    );

    // A standing torus and a sphere to round out the scene.
    scene.spawn(
        Node::new()
            .at(
                Transform::from_xyz(-6.0, 1.0, 0.0)
                    .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
            )
            .shape(Shape::torus(3.0, 1.0).color([0.9, 0.9, 0.95, 1.0]).shininess(60.0)),
    );
    scene.spawn(
        Node::new()
            .at(Transform::from_xyz(6.0, 1.0, 0.0))
            .shape(Shape::sphere(3.0).color([0.9, 0.9, 0.95, 1.0]).shininess(60.0)),
    );
}

/// Spin the cube straight from elapsed time, like the orbiter rule but on
/// two axes. Pausing the clock freezes it in place.
fn spin_cube(ctx: &mut Context) {
    let t = ctx.clock.elapsed_secs();
    let cube = ctx.scene.named("cube");
    if let Some(node) = ctx.scene.node_mut(cube) {
        node.transform.rotation = Quat::from_rotation_y(t) * Quat::from_rotation_x(t);
    }
}

fn toggle_pause(ctx: &mut Context) {
    if ctx.input.just_pressed(KeyCode::Space) {
        let paused = !ctx.clock.is_paused();
        ctx.clock.set_paused(paused);
        log::info!("{}", if paused { "paused" } else { "resumed" });
    }
}
