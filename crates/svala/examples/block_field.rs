//! Block field — a procedural grid of randomly sized, randomly tinted
//! blocks on a platform. A static scene; all the work is construction.
//!
//! Run with: `cargo run -p svala --example block_field`

use std::f32::consts::TAU;

use svala::prelude::*;

const GRID_SIZE: u32 = 25;
const SPACING: f32 = 4.0;
const MIN_HEIGHT: f32 = 2.0;
const MAX_HEIGHT: f32 = 15.0;

fn main() {
    env_logger::init();

    App::new("svala — block field")
        .clear_color([0.05, 0.06, 0.10, 1.0])
        .setup(setup)
        .run();
}

fn setup(ctx: &mut Context) {
    let scene = &mut ctx.scene;

    scene.camera = Camera::new()
        .with_fov(75.0)
        .at(Transform::from_xyz(30.0, 25.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y));
    scene.add_light(Light::Directional {
        direction: Vec3::new(-20.0, -30.0, -15.0).normalize(),
        color: [1.0, 1.0, 1.0],
        intensity: 1.5,
    });
    scene.ambient.intensity = 0.3;

    // Platform just under the blocks.
    scene.spawn(
        Node::new()
            .at(Transform::from_xyz(0.0, -0.5, 0.0))
            .shape(Shape::cuboid(500.0, 1.0, 500.0).color([0.5, 0.5, 0.5, 1.0])),
    );

    let mut rng = fastrand::Rng::new();
    let half = (GRID_SIZE - 1) as f32 / 2.0;

    for x in 0..GRID_SIZE {
        for z in 0..GRID_SIZE {
            let height = MIN_HEIGHT + rng.f32() * (MAX_HEIGHT - MIN_HEIGHT);

            // Blue-ish tint with a little per-block variation.
            let [r, g, b] = hsl_to_rgb(
                0.55 + rng.f32() * 0.1,
                0.6 + rng.f32() * 0.2,
                0.4 + rng.f32() * 0.2,
            );

            scene.spawn(
                Node::new()
                    .at(
                        // Bases sit on the platform: center at half the height.
                        Transform::from_xyz(
                            (x as f32 - half) * SPACING,
                            height / 2.0,
                            (z as f32 - half) * SPACING,
                        )
                        .with_rotation(Quat::from_rotation_y(rng.f32() * TAU)),
                    )
                    .shape(Shape::cuboid(2.0, height, 2.0).color([r, g, b, 1.0])),
            );
        }
    }
}

/// HSL (all components 0..1) to RGB, for the per-block tint spread.
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
