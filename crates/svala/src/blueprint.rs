//! Declarative scene description.
//!
//! A [`SceneDoc`] is a serde data model for a whole scene — camera, lights,
//! and a node tree with shapes and behaviors — loadable from JSON and built
//! into a live [`Scene`] by one generic builder. Demos that would otherwise
//! repeat the same construction boilerplate can describe their scene as
//! data instead; imperative construction remains available for anything the
//! document format doesn't cover.

use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, Orbiter, Oscillator, Transit};
use crate::camera::Camera;
use crate::math::{Transform, Vec3};
use crate::render::Shape;
use crate::scene::{Light, Node, NodeId, Scene};

fn one() -> f32 {
    1.0
}

fn ones() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn white() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn white_rgb() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_fov() -> f32 {
    45.0
}

fn default_radius() -> f32 {
    10.0
}

fn default_transit_speed() -> f32 {
    4.0
}

fn default_angular_speed() -> f32 {
    2.0
}

/// A whole scene as data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDoc {
    #[serde(default)]
    pub camera: Option<CameraDoc>,
    #[serde(default)]
    pub lights: Vec<LightDoc>,
    #[serde(default)]
    pub nodes: Vec<NodeDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDoc {
    pub position: [f32; 3],
    #[serde(default)]
    pub look_at: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov_y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDoc {
    Directional {
        direction: [f32; 3],
        #[serde(default = "white_rgb")]
        color: [f32; 3],
        #[serde(default = "one")]
        intensity: f32,
    },
    Point {
        position: [f32; 3],
        #[serde(default = "white_rgb")]
        color: [f32; 3],
        #[serde(default = "one")]
        intensity: f32,
        #[serde(default = "default_radius")]
        radius: f32,
    },
}

/// One node in the tree: transform, optional appearance and behavior,
/// children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "ones")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub shape: Option<ShapeDoc>,
    #[serde(default)]
    pub behavior: Option<BehaviorDoc>,
    #[serde(default)]
    pub children: Vec<NodeDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDoc {
    Sphere {
        radius: f32,
        #[serde(default = "white")]
        color: [f32; 4],
    },
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
        #[serde(default = "white")]
        color: [f32; 4],
    },
    Cylinder {
        radius: f32,
        height: f32,
        #[serde(default = "white")]
        color: [f32; 4],
    },
    Plane {
        width: f32,
        depth: f32,
        #[serde(default = "white")]
        color: [f32; 4],
    },
    Torus {
        radius: f32,
        tube: f32,
        #[serde(default = "white")]
        color: [f32; 4],
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorDoc {
    Oscillator {
        speed: f32,
        #[serde(default)]
        gate: Option<String>,
    },
    Orbiter {
        speed: f32,
        #[serde(default)]
        multiplier: Option<String>,
    },
    Transit {
        from_name: String,
        from: [f32; 3],
        to_name: String,
        to: [f32; 3],
        #[serde(default = "default_transit_speed")]
        speed: f32,
        #[serde(default = "default_angular_speed")]
        angular_speed: f32,
    },
}

impl SceneDoc {
    /// Parse a scene document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize this document to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Build a live scene from this document.
    pub fn build(&self) -> Scene {
        let mut scene = Scene::new();

        if let Some(cam) = &self.camera {
            scene.camera = Camera::new().with_fov(cam.fov_y).at(
                Transform::from_translation(Vec3::from_array(cam.position))
                    .looking_at(Vec3::from_array(cam.look_at), Vec3::Y),
            );
        }

        for light in &self.lights {
            scene.add_light(match *light {
                LightDoc::Directional {
                    direction,
                    color,
                    intensity,
                } => Light::Directional {
                    direction: Vec3::from_array(direction),
                    color,
                    intensity,
                },
                LightDoc::Point {
                    position,
                    color,
                    intensity,
                    radius,
                } => Light::Point {
                    position: Vec3::from_array(position),
                    color,
                    intensity,
                    radius,
                },
            });
        }

        for doc in &self.nodes {
            spawn_doc(&mut scene, None, doc);
        }

        scene
    }
}

/// Spawn one node document (and its subtree) into the scene.
fn spawn_doc(scene: &mut Scene, parent: Option<NodeId>, doc: &NodeDoc) -> NodeId {
    let mut node = Node::new().at(
        Transform::from_translation(Vec3::from_array(doc.translation)).with_scale_xyz(
            doc.scale[0],
            doc.scale[1],
            doc.scale[2],
        ),
    );

    if let Some(name) = &doc.name {
        node = node.named(name.clone());
    }
    if let Some(shape) = &doc.shape {
        node = node.shape(build_shape(shape));
    }
    if let Some(behavior) = &doc.behavior {
        node = node.behavior(build_behavior(behavior));
    }

    let id = match parent {
        Some(parent) => scene.spawn_child(parent, node),
        None => scene.spawn(node),
    };

    for child in &doc.children {
        spawn_doc(scene, Some(id), child);
    }
    id
}

fn build_shape(doc: &ShapeDoc) -> Shape {
    match *doc {
        ShapeDoc::Sphere { radius, color } => Shape::sphere(radius).color(color),
        ShapeDoc::Cuboid {
            width,
            height,
            depth,
            color,
        } => Shape::cuboid(width, height, depth).color(color),
        ShapeDoc::Cylinder {
            radius,
            height,
            color,
        } => Shape::cylinder(radius, height).color(color),
        ShapeDoc::Plane {
            width,
            depth,
            color,
        } => Shape::plane(width, depth).color(color),
        ShapeDoc::Torus {
            radius,
            tube,
            color,
        } => Shape::torus(radius, tube).color(color),
    }
}

fn build_behavior(doc: &BehaviorDoc) -> Behavior {
    match doc {
        BehaviorDoc::Oscillator { speed, gate } => {
            let mut osc = Oscillator::new(*speed);
            if let Some(gate) = gate {
                osc = osc.with_gate(gate.clone());
            }
            osc.into()
        }
        BehaviorDoc::Orbiter { speed, multiplier } => {
            let mut orbiter = Orbiter::new(*speed);
            if let Some(multiplier) = multiplier {
                orbiter = orbiter.with_multiplier(multiplier.clone());
            }
            orbiter.into()
        }
        BehaviorDoc::Transit {
            from_name,
            from,
            to_name,
            to,
            speed,
            angular_speed,
        } => Transit::between(
            (from_name.clone(), Vec3::from_array(*from)),
            (to_name.clone(), Vec3::from_array(*to)),
        )
        .with_speed(*speed)
        .with_angular_speed(*angular_speed)
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;

    const DOC: &str = r#"{
        "camera": { "position": [0.0, 10.0, 20.0], "look_at": [0.0, 0.0, 0.0], "fov_y": 75.0 },
        "lights": [
            { "type": "directional", "direction": [-0.5, -1.0, -0.5], "intensity": 1.5 }
        ],
        "nodes": [
            {
                "name": "pivot",
                "translation": [0.0, 20.0, 0.0],
                "behavior": { "type": "oscillator", "speed": 0.02 },
                "children": [
                    {
                        "name": "bob",
                        "translation": [0.0, -5.0, 0.0],
                        "shape": { "type": "sphere", "radius": 1.2, "color": [0.2, 0.57, 0.86, 1.0] }
                    }
                ]
            },
            {
                "shape": { "type": "plane", "width": 500.0, "depth": 500.0 },
                "translation": [0.0, -15.0, 0.0]
            }
        ]
    }"#;

    #[test]
    fn parse_and_build() {
        let doc = SceneDoc::from_json(DOC).unwrap();
        let mut scene = doc.build();

        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.lights.len(), 1);
        assert!((scene.camera.fov_y - 75.0).abs() < 1e-6);

        scene.propagate();
        let bob = scene.named("bob");
        let pos = scene.node(bob).unwrap().world_position();
        // Pivot at y=20, bob hanging 5 below.
        assert!((pos.y - 15.0).abs() < 1e-4);

        let pivot = scene.named("pivot");
        assert!(matches!(
            scene.node(pivot).unwrap().behavior.as_ref(),
            Some(Behavior::Oscillator(_))
        ));
    }

    #[test]
    fn defaults_fill_in() {
        let doc = SceneDoc::from_json(r#"{ "nodes": [ { } ] }"#).unwrap();
        let scene = doc.build();
        assert_eq!(scene.node_count(), 1);
        assert!(scene.lights.is_empty());
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(SceneDoc::from_json("{ not json").is_err());
    }

    #[test]
    fn json_round_trip() {
        let doc = SceneDoc::from_json(DOC).unwrap();
        let json = doc.to_json().unwrap();
        let again = SceneDoc::from_json(&json).unwrap();
        assert_eq!(again.nodes.len(), doc.nodes.len());
        assert_eq!(again.lights.len(), doc.lights.len());
    }
}
