//! Scene from data — the whole scene described as a JSON document and
//! built by the generic builder, no imperative construction at all.
//!
//! - **Any key** — start the pendulum
//!
//! Run with: `cargo run -p svala --example scene_doc`

use svala::prelude::*;

const DOC: &str = r#"{
    "camera": { "position": [12.0, 10.0, 18.0], "look_at": [0.0, 4.0, 0.0], "fov_y": 60.0 },
    "lights": [
        { "type": "directional", "direction": [-0.5, -1.0, -0.3], "intensity": 1.3 },
        { "type": "point", "position": [0.0, 8.0, 6.0], "intensity": 1.0, "radius": 30.0 }
    ],
    "nodes": [
        {
            "shape": { "type": "plane", "width": 40.0, "depth": 40.0, "color": [0.45, 0.45, 0.45, 1.0] }
        },
        {
            "name": "carousel",
            "translation": [0.0, 1.5, 0.0],
            "behavior": { "type": "orbiter", "speed": 0.8 },
            "children": [
                { "translation": [4.0, 0.0, 0.0],
                  "shape": { "type": "cuboid", "width": 1.5, "height": 1.5, "depth": 1.5, "color": [0.27, 0.67, 0.53, 1.0] } },
                { "translation": [-4.0, 0.0, 0.0],
                  "shape": { "type": "sphere", "radius": 0.9, "color": [0.86, 0.35, 0.25, 1.0] } },
                { "shape": { "type": "torus", "radius": 4.0, "tube": 0.08, "color": [0.6, 0.6, 0.65, 1.0] } }
            ]
        },
        {
            "name": "swing",
            "translation": [0.0, 9.0, 0.0],
            "behavior": { "type": "oscillator", "speed": 0.02 },
            "children": [
                { "translation": [0.0, -3.0, 0.0],
                  "shape": { "type": "cylinder", "radius": 0.1, "height": 6.0, "color": [0.17, 0.24, 0.31, 1.0] } },
                { "translation": [0.0, -6.0, 0.0],
                  "shape": { "type": "sphere", "radius": 0.7, "color": [0.20, 0.60, 0.86, 1.0] } }
            ]
        }
    ]
}"#;

fn main() {
    env_logger::init();

    let doc = SceneDoc::from_json(DOC).expect("embedded scene document is valid");

    App::new("svala — scene from JSON (press any key)")
        .clear_color([0.06, 0.07, 0.11, 1.0])
        .bind(Binding::AnyKeySets {
            flag: "go".to_string(),
        })
        .setup(move |ctx| {
            ctx.scene = doc.build();
        })
        .run();
}
