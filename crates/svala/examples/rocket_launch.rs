//! Rocket transit — a click-triggered finite-state machine flying a rocket
//! between a ground pad and a floating platform.
//!
//! Halfway up, the rocket flips 180° so it lands upright on the platform;
//! the next click flies it back. Clicks while a transit is in flight are
//! rejected — at most one transit is ever running.
//!
//! - **Left click** on the rocket — launch (or return)
//!
//! Run with: `cargo run -p svala --example rocket_launch`

use svala::prelude::*;

const PAD_POS: Vec3 = Vec3::ZERO;
const PLATFORM_POS: Vec3 = Vec3::new(0.0, 25.0, 0.0);
/// Rocket resting height above the pad, and hanging depth under the
/// platform (it docks flipped, nose down).
const DOCK_PAD: Vec3 = Vec3::new(0.0, 2.4, 0.0);
const DOCK_PLATFORM: Vec3 = Vec3::new(0.0, 22.4, 0.0);

fn main() {
    env_logger::init();

    App::new("svala — rocket transit (click the rocket)")
        .clear_color([0.05, 0.05, 0.09, 1.0])
        .bind(Binding::ClickTriggers {
            node: "rocket".to_string(),
        })
        .setup(setup)
        .run();
}

fn setup(ctx: &mut Context) {
    let scene = &mut ctx.scene;

    scene.camera = Camera::new().with_fov(60.0).at(
        Transform::from_xyz(14.0, 14.0, 30.0).looking_at(Vec3::new(0.0, 12.0, 0.0), Vec3::Y),
    );
    scene.add_light(Light::Directional {
        direction: Vec3::new(-0.5, -1.0, -0.3).normalize(),
        color: [1.0, 1.0, 1.0],
        intensity: 1.2,
    });
    scene.ambient.intensity = 0.25;

    // Ground and the two bases.
    scene.spawn(
        Node::new()
            .at(Transform::from_xyz(0.0, -0.6, 0.0))
            .shape(Shape::cuboid(60.0, 1.0, 60.0).color([0.35, 0.4, 0.35, 1.0])),
    );
    scene.spawn(
        Node::new()
            .at(Transform::from_translation(PAD_POS))
            .shape(Shape::cuboid(4.0, 0.4, 4.0).color([0.25, 0.25, 0.28, 1.0])),
    );
    scene.spawn(
        Node::new()
            .at(Transform::from_translation(PLATFORM_POS))
            .shape(Shape::cuboid(4.0, 0.4, 4.0).color([0.45, 0.3, 0.2, 1.0])),
    );

    // The rocket. The transit FSM lives on the root node, which also
    // carries the body shape the click hit-test uses.
    let rocket = scene.spawn(
        Node::new()
            .named("rocket")
            .at(Transform::from_translation(DOCK_PAD))
            .shape(Shape::cylinder(0.6, 4.0).color([0.85, 0.85, 0.88, 1.0]).shininess(48.0))
            .behavior(
                Transit::between(("pad", DOCK_PAD), ("platform", DOCK_PLATFORM))
                    .with_speed(6.0)
                    .with_angular_speed(2.5)
                    .into(),
            ),
    );

    // Nose cone and fins, carried along by the parent transform.
    scene.spawn_child(
        rocket,
        Node::new()
            .at(Transform::from_xyz(0.0, 2.3, 0.0))
            .shape(Shape::sphere(0.6).color([0.85, 0.2, 0.15, 1.0])),
    );
    for (x, z) in [(0.7, 0.0), (-0.7, 0.0), (0.0, 0.7), (0.0, -0.7)] {
        scene.spawn_child(
            rocket,
            Node::new()
                .at(Transform::from_xyz(x, -1.8, z))
                .shape(Shape::cuboid(0.25, 1.2, 0.25).color([0.85, 0.2, 0.15, 1.0])),
        );
    }
}
