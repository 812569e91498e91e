//! Solar system — nested orbits driven by pure elapsed-time rotation.
//!
//! Every orbiting node recomputes its rotation fresh from the clock each
//! frame, scaled by one shared control scalar, so the whole system can be
//! sped up or slowed down without accumulating drift.
//!
//! - **Up / Down** — adjust the shared rotation speed
//!
//! Run with: `cargo run -p svala --example solar_system`

use svala::prelude::*;

fn main() {
    env_logger::init();

    App::new("svala — solar system (Up/Down: rotation speed)")
        .clear_color([0.01, 0.01, 0.03, 1.0])
        .setup(setup)
        .update(adjust_speed)
        .run();
}

fn setup(ctx: &mut Context) {
    let scene = &mut ctx.scene;

    // Top-down view, with +Z as "up" on screen.
    scene.camera = Camera::new()
        .with_fov(40.0)
        .at(Transform::from_xyz(0.0, 50.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z));

    // The sun lights the system from the center.
    scene.add_light(Light::Point {
        position: Vec3::ZERO,
        color: [1.0, 1.0, 1.0],
        intensity: 2.0,
        radius: 100.0,
    });
    scene.ambient.intensity = 0.05;

    // Whole-system pivot: its rotation carries every planet around the sun.
    let system = scene.spawn(Node::new().behavior(Orbiter::new(1.0).into()));

    // Sun, self-lit.
    scene.spawn_child(
        system,
        Node::new()
            .behavior(Orbiter::new(1.0).into())
            .shape(
                Shape::sphere(5.0)
                    .color([1.0, 0.9, 0.2, 1.0])
                    .emissive([1.0, 0.85, 0.1]),
            ),
    );

    // Faint ring marking the earth's orbit.
    scene.spawn_child(
        system,
        Node::new().shape(Shape::torus(10.0, 0.05).color([0.53, 0.53, 0.53, 1.0])),
    );

    // Earth orbit pivot, offset from the sun; its own rotation spins the
    // earth-moon pair.
    let earth_orbit = scene.spawn_child(
        system,
        Node::new()
            .at(Transform::from_xyz(10.0, 0.0, 0.0))
            .behavior(Orbiter::new(1.0).into()),
    );

    // If the texture is missing the earth renders with the plain base
    // color instead — a warning in the log, never a stopped loop.
    scene.spawn_child(
        earth_orbit,
        Node::new()
            .behavior(Orbiter::new(1.0).into())
            .shape(
                Shape::sphere(1.0)
                    .color([0.2, 0.45, 0.85, 1.0])
                    .textured("assets/earth.png"),
            ),
    );

    // Moon, offset from the earth.
    let moon_orbit = scene.spawn_child(
        earth_orbit,
        Node::new().at(Transform::from_xyz(2.0, 0.0, 0.0)),
    );
    scene.spawn_child(
        moon_orbit,
        Node::new()
            .behavior(Orbiter::new(1.0).into())
            .shape(Shape::sphere(0.5).color([0.7, 0.7, 0.7, 1.0]).emissive([0.1, 0.1, 0.1])),
    );
}

fn adjust_speed(ctx: &mut Context) {
    let mut delta = 0.0;
    if ctx.input.just_pressed(KeyCode::ArrowUp) {
        delta += 0.25;
    }
    if ctx.input.just_pressed(KeyCode::ArrowDown) {
        delta -= 0.25;
    }
    if delta != 0.0 {
        let value = (ctx.controls.scalar_or("rotation_speed", 1.0) + delta).clamp(0.0, 5.0);
        ctx.controls.set_scalar("rotation_speed", value);
        log::info!("rotation speed x{value:.2}");
    }
}
