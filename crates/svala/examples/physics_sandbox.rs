//! Physics sandbox — a walled volume of rigid-body spheres.
//!
//! The simulation is entirely Rapier's; the scene just feeds it shapes and
//! copies poses back. Toggling the walls away lets the spheres pour off the
//! edge; every sphere that falls below the kill floor is teleported back
//! into the spawn volume *and* duplicated, so the population only grows —
//! the deliberately unbounded respawn policy.
//!
//! - **W** — remove / restore the walls
//!
//! Run with: `cargo run -p svala --example physics_sandbox --features physics`

use svala::prelude::*;

const WALL_COUNT: usize = 6;
const INITIAL_SPHERES: usize = 250;

fn main() {
    env_logger::init();

    App::new("svala — physics sandbox (W: toggle walls)")
        .clear_color([0.10, 0.10, 0.10, 1.0])
        .bind(Binding::KeyToggles {
            key: KeyCode::KeyW,
            flag: "walls".to_string(),
        })
        .physics(PhysicsWorld::new())
        .respawn(RespawnPolicy::new(
            -6.0,
            SpawnVolume::new(Vec3::new(-3.0, 0.5, -3.0), Vec3::new(3.0, 4.5, 3.0)),
        ))
        .setup(setup)
        .update(sync_walls)
        .run();
}

fn setup(ctx: &mut Context) {
    ctx.controls.set_flag("walls", true);

    let scene = &mut ctx.scene;

    scene.camera = Camera::new()
        .with_fov(75.0)
        .at(Transform::from_xyz(9.0, 7.0, 12.0).looking_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y));
    scene.add_light(Light::Directional {
        direction: Vec3::new(-0.5, -1.0, -0.1).normalize(),
        color: [1.0, 1.0, 1.0],
        intensity: 1.0,
    });
    scene.ambient.intensity = 0.25;

    // Catch floor far below the box. Strays that miss it fall past the
    // respawn threshold and get recycled.
    scene.spawn(
        Node::new()
            .at(Transform::from_xyz(0.0, -5.0, 0.0))
            .shape(Shape::cuboid(10.0, 0.2, 10.0).color([0.25, 0.25, 0.25, 1.0]))
            .body(RigidBody::fixed(ColliderShape::Cuboid {
                hx: 5.0,
                hy: 0.1,
                hz: 5.0,
            })),
    );

    spawn_walls(scene);

    // Fill the box with spheres.
    let mut rng = fastrand::Rng::new();
    for _ in 0..INITIAL_SPHERES {
        let x = (rng.f32() - 0.5) * 6.0;
        let y = rng.f32() * 4.0 + 0.5;
        let z = (rng.f32() - 0.5) * 6.0;
        let color = [rng.f32() * 0.8 + 0.2, rng.f32() * 0.8 + 0.2, rng.f32() * 0.8 + 0.2, 1.0];

        scene.spawn(
            Node::new()
                .at(Transform::from_xyz(x, y, z))
                .shape(Shape::sphere(0.3).color(color))
                .body(
                    RigidBody::dynamic(ColliderShape::Ball { radius: 0.3 })
                        .with_restitution(0.6)
                        .with_friction(0.4)
                        .with_linear_damping(0.3)
                        .with_angular_damping(0.3),
                ),
        );
    }
}

/// The enclosure: four side walls, a floor, and a ceiling. The side walls
/// and ceiling are invisible colliders; the floor carries the visible pane.
fn spawn_walls(scene: &mut Scene) {
    let t = 0.05; // half-thickness
    let walls: [(Vec3, ColliderShape); WALL_COUNT] = [
        (Vec3::new(-4.0, 2.5, 0.0), ColliderShape::Cuboid { hx: t, hy: 2.5, hz: 4.0 }),
        (Vec3::new(4.0, 2.5, 0.0), ColliderShape::Cuboid { hx: t, hy: 2.5, hz: 4.0 }),
        (Vec3::new(0.0, 2.5, -4.0), ColliderShape::Cuboid { hx: 4.0, hy: 2.5, hz: t }),
        (Vec3::new(0.0, 2.5, 4.0), ColliderShape::Cuboid { hx: 4.0, hy: 2.5, hz: t }),
        (Vec3::new(0.0, 0.0, 0.0), ColliderShape::Cuboid { hx: 4.0, hy: t, hz: 4.0 }),
        (Vec3::new(0.0, 5.0, 0.0), ColliderShape::Cuboid { hx: 4.0, hy: t, hz: 4.0 }),
    ];

    for (i, (pos, shape)) in walls.into_iter().enumerate() {
        let mut node = Node::new()
            .named(format!("wall-{i}"))
            .at(Transform::from_translation(pos))
            .body(RigidBody::fixed(shape).with_friction(0.3).with_restitution(0.5));
        // The box floor is the one visible face of the enclosure.
        if i == 4 {
            node = node.shape(Shape::plane(8.0, 8.0).color([0.5, 0.5, 0.5, 1.0]));
        }
        scene.spawn(node);
    }
}

/// Despawn or rebuild the enclosure when the "walls" flag changes. The
/// physics step removes the despawned walls' bodies on its next pass and
/// registers rebuilt ones, so this is just scene surgery.
fn sync_walls(ctx: &mut Context) {
    let want_walls = ctx.controls.flag("walls");
    let have_walls = ctx.scene.try_named("wall-0").is_some();

    if want_walls && !have_walls {
        log::info!("restoring walls");
        spawn_walls(&mut ctx.scene);
    } else if !want_walls && have_walls {
        log::info!("removing walls");
        for i in 0..WALL_COUNT {
            if let Some(id) = ctx.scene.try_named(&format!("wall-{i}")) {
                ctx.scene.despawn_recursive(id);
            }
        }
    }
}
