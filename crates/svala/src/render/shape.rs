//! First-class shape primitives.
//!
//! A [`Shape`] is the visual half of a node: a primitive kind plus surface
//! appearance. Each kind maps to a built-in unit mesh that the renderer
//! scales to the requested dimensions at draw time.
//!
//! ```ignore
//! scene.spawn(
//!     Node::new()
//!         .at(Transform::from_xyz(0.0, 1.0, 0.0))
//!         .shape(Shape::sphere(0.5).color([1.0, 0.0, 0.0, 1.0])),
//! );
//! ```

use crate::math::Vec3;

/// The kind and dimensions of a shape primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Sphere { radius: f32 },
    Cuboid { width: f32, height: f32, depth: f32 },
    Cylinder { radius: f32, height: f32 },
    Plane { width: f32, depth: f32 },
    Torus { radius: f32, tube: f32 },
}

/// A shape primitive with surface appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Base color (linear RGBA). Multiplied with the texture when present.
    pub base_color: [f32; 4],
    /// Self-illumination, added after lighting.
    pub emissive: [f32; 3],
    /// Specular exponent. Higher is shinier.
    pub shininess: f32,
    /// Path to a base-color texture. Loaded on first use; a missing or
    /// unreadable file falls back to the white placeholder.
    pub texture: Option<String>,
}

impl Shape {
    fn from_kind(kind: ShapeKind) -> Self {
        Self {
            kind,
            base_color: [1.0, 1.0, 1.0, 1.0],
            emissive: [0.0, 0.0, 0.0],
            shininess: 32.0,
            texture: None,
        }
    }

    /// A sphere with the given radius.
    pub fn sphere(radius: f32) -> Self {
        Self::from_kind(ShapeKind::Sphere { radius })
    }

    /// A box with the given full extents.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::from_kind(ShapeKind::Cuboid {
            width,
            height,
            depth,
        })
    }

    /// A cylinder along the Y axis with the given radius and total height.
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::from_kind(ShapeKind::Cylinder { radius, height })
    }

    /// A plane on the XZ plane with the given width and depth.
    pub fn plane(width: f32, depth: f32) -> Self {
        Self::from_kind(ShapeKind::Plane { width, depth })
    }

    /// A torus in the XZ plane: `radius` from center to the tube's center,
    /// `tube` the tube's own radius.
    pub fn torus(radius: f32, tube: f32) -> Self {
        Self::from_kind(ShapeKind::Torus { radius, tube })
    }

    /// Set the base color (linear RGBA).
    pub fn color(mut self, rgba: [f32; 4]) -> Self {
        self.base_color = rgba;
        self
    }

    /// Set the emissive color.
    pub fn emissive(mut self, rgb: [f32; 3]) -> Self {
        self.emissive = rgb;
        self
    }

    /// Set the specular exponent.
    pub fn shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Set the base-color texture path.
    pub fn textured(mut self, path: impl Into<String>) -> Self {
        self.texture = Some(path.into());
        self
    }

    /// Scale applied to the unit mesh to reach the requested dimensions.
    ///
    /// Built-in meshes are unit-sized: sphere radius 0.5, cube side 1.0,
    /// cylinder radius 0.5 × height 1.0, plane side 1.0. Torus meshes are
    /// generated per (radius, tube) pair, so no scaling is needed.
    pub(crate) fn mesh_scale(&self) -> Vec3 {
        match self.kind {
            ShapeKind::Sphere { radius } => Vec3::splat(radius * 2.0),
            ShapeKind::Cuboid {
                width,
                height,
                depth,
            } => Vec3::new(width, height, depth),
            ShapeKind::Cylinder { radius, height } => {
                Vec3::new(radius * 2.0, height, radius * 2.0)
            }
            ShapeKind::Plane { width, depth } => Vec3::new(width, 1.0, depth),
            ShapeKind::Torus { .. } => Vec3::ONE,
        }
    }

    /// Radius of the local-space bounding sphere, used for click hit-tests.
    pub fn bounding_radius(&self) -> f32 {
        match self.kind {
            ShapeKind::Sphere { radius } => radius,
            ShapeKind::Cuboid {
                width,
                height,
                depth,
            } => 0.5 * (width * width + height * height + depth * depth).sqrt(),
            ShapeKind::Cylinder { radius, height } => {
                (radius * radius + 0.25 * height * height).sqrt()
            }
            ShapeKind::Plane { width, depth } => 0.5 * (width * width + depth * depth).sqrt(),
            ShapeKind::Torus { radius, tube } => radius + tube,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_bounding_radius_is_radius() {
        assert_eq!(Shape::sphere(2.5).bounding_radius(), 2.5);
    }

    #[test]
    fn cuboid_bounding_radius_is_half_diagonal() {
        let r = Shape::cuboid(2.0, 2.0, 2.0).bounding_radius();
        assert!((r - 3.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn unit_mesh_scaling() {
        assert_eq!(Shape::sphere(1.0).mesh_scale(), Vec3::splat(2.0));
        assert_eq!(
            Shape::cuboid(2.0, 4.0, 6.0).mesh_scale(),
            Vec3::new(2.0, 4.0, 6.0)
        );
        assert_eq!(
            Shape::cylinder(0.5, 3.0).mesh_scale(),
            Vec3::new(1.0, 3.0, 1.0)
        );
    }
}
