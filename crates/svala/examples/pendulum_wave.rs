//! Pendulum wave — a row of pendulums whose periods fall off with arm
//! length, drifting out of phase and back into sync.
//!
//! - **Any key** — start the swing
//!
//! Run with: `cargo run -p svala --example pendulum_wave`

use std::f32::consts::FRAC_PI_2;

use svala::prelude::*;

const NUM_PENDULUMS: usize = 15;
const START_LENGTH: f32 = 5.0;
const LENGTH_INCREMENT: f32 = 1.0;
const START_SPEED: f32 = 0.02;
const SPACING: f32 = 3.0;

const ROD_COLOR: [f32; 4] = [0.17, 0.24, 0.31, 1.0];
const BOB_COLOR: [f32; 4] = [0.20, 0.60, 0.86, 1.0];

fn main() {
    env_logger::init();

    App::new("svala — pendulum wave (press any key to start)")
        .clear_color([0.05, 0.06, 0.10, 1.0])
        .bind(Binding::AnyKeySets {
            flag: "go".to_string(),
        })
        .setup(setup)
        .run();
}

fn setup(ctx: &mut Context) {
    let scene = &mut ctx.scene;

    scene.camera = Camera::new().with_fov(75.0).at(
        Transform::from_xyz(30.0, 25.0, 30.0).looking_at(Vec3::new(0.0, 5.0, 0.0), Vec3::Y),
    );
    scene.add_light(Light::Directional {
        direction: Vec3::new(-20.0, -30.0, -15.0).normalize(),
        color: [1.0, 1.0, 1.0],
        intensity: 1.5,
    });
    scene.ambient.intensity = 0.3;

    // Platform far below, so the pendulums hang in open space.
    scene.spawn(
        Node::new()
            .at(Transform::from_xyz(0.0, -15.0, 0.0))
            .shape(Shape::cuboid(500.0, 1.0, 500.0).color([0.5, 0.5, 0.5, 1.0])),
    );

    // The rig everything hangs from.
    let rig = scene.spawn(Node::new().at(Transform::from_xyz(0.0, 20.0, 0.0)));

    // Horizontal support rod along X.
    scene.spawn_child(
        rig,
        Node::new()
            .at(Transform::IDENTITY.with_rotation(Quat::from_rotation_z(FRAC_PI_2)))
            .shape(Shape::cylinder(0.5, 50.0).color(ROD_COLOR)),
    );

    for i in 0..NUM_PENDULUMS {
        let x = (i as f32 - NUM_PENDULUMS as f32 / 2.0) * SPACING;
        let length = START_LENGTH + i as f32 * LENGTH_INCREMENT;
        // Speed inversely related to arm length: neighbours desynchronize
        // and re-synchronize over time.
        let speed = START_SPEED / (1.0 + i as f32 * 0.15);

        let pivot = scene.spawn_child(
            rig,
            Node::new()
                .at(Transform::from_xyz(x, 0.0, 0.0))
                .behavior(Oscillator::new(speed).into()),
        );

        // Connecting rod, hanging halfway down.
        scene.spawn_child(
            pivot,
            Node::new()
                .at(Transform::from_xyz(0.0, -length / 2.0, 0.0))
                .shape(Shape::cylinder(0.15, length).color(ROD_COLOR)),
        );

        // The bob at the end.
        scene.spawn_child(
            pivot,
            Node::new()
                .at(Transform::from_xyz(0.0, -length, 0.0))
                .shape(Shape::sphere(1.2).color(BOB_COLOR).shininess(64.0)),
        );
    }
}
