//! Perspective camera, viewport tracking, and pick rays.
//!
//! The [`Camera`] owns its own transform and projection parameters. The
//! driver feeds it the latest valid [`Viewport`]; a zero-area size is
//! rejected so a frame is never projected through a degenerate aspect ratio
//! — the previous valid viewport stays in effect until a usable size
//! arrives.
//!
//! [`Camera::pick_ray`] unprojects a cursor position into a world-space
//! [`Ray`] for click hit-testing against node bounding spheres.

use crate::math::{Mat4, Transform, Vec3};

/// Drawable surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. Only meaningful for valid viewports.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Whether the viewport has drawable area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A perspective camera.
#[derive(Debug, Clone)]
pub struct Camera {
    pub transform: Transform,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    aspect: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            transform: Transform::IDENTITY,
            fov_y: 45.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }

    pub fn with_fov(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self
    }

    pub fn at(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Adopt a new viewport. A zero-area viewport is rejected (the previous
    /// aspect ratio stays in effect) and `false` is returned.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if !viewport.is_valid() {
            return false;
        }
        self.aspect = viewport.aspect();
        true
    }

    /// The aspect ratio the projection currently uses.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Perspective projection matrix (0..1 depth, wgpu convention).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    /// View matrix: the inverse of the camera's world transform.
    pub fn view(&self) -> Mat4 {
        self.transform.matrix().inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unproject a cursor position (pixels, origin top-left) into a
    /// world-space ray through the scene.
    pub fn pick_ray(&self, cursor_x: f32, cursor_y: f32, viewport: Viewport) -> Ray {
        let ndc_x = 2.0 * cursor_x / viewport.width.max(1) as f32 - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor_y / viewport.height.max(1) as f32;

        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Ray {
            origin: near,
            dir: (far - near).normalize(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// A world-space ray: origin plus normalized direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Whether the ray passes within `radius` of `center`. Points behind the
    /// origin only count when the origin itself is inside the sphere.
    pub fn hits_sphere(&self, center: Vec3, radius: f32) -> bool {
        let to_center = center - self.origin;
        let along = to_center.dot(self.dir).max(0.0);
        let closest = self.origin + self.dir * along;
        (center - closest).length_squared() <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_viewport_updates_aspect() {
        let mut camera = Camera::new();
        assert!(camera.set_viewport(Viewport::new(800, 400)));
        assert_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn zero_area_viewport_is_rejected() {
        let mut camera = Camera::new();
        camera.set_viewport(Viewport::new(1280, 720));
        let before = camera.aspect();

        assert!(!camera.set_viewport(Viewport::new(0, 720)));
        assert!(!camera.set_viewport(Viewport::new(1280, 0)));
        assert_eq!(camera.aspect(), before);
    }

    #[test]
    fn projection_tracks_latest_viewport() {
        let mut camera = Camera::new();
        camera.set_viewport(Viewport::new(1000, 500));
        let wide = camera.projection();
        camera.set_viewport(Viewport::new(500, 500));
        let square = camera.projection();
        assert_ne!(wide, square);
    }

    #[test]
    fn center_pick_ray_looks_down_the_view_axis() {
        let mut camera = Camera::new();
        camera.set_viewport(Viewport::new(800, 600));
        camera.transform = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);

        let ray = camera.pick_ray(400.0, 300.0, Viewport::new(800, 600));
        assert!((ray.dir - Vec3::NEG_Z).length() < 1e-3);
    }

    #[test]
    fn center_ray_hits_centered_sphere() {
        let mut camera = Camera::new();
        camera.set_viewport(Viewport::new(800, 600));
        camera.transform = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);

        let ray = camera.pick_ray(400.0, 300.0, Viewport::new(800, 600));
        assert!(ray.hits_sphere(Vec3::ZERO, 1.0));
        // A corner click misses it.
        let corner = camera.pick_ray(0.0, 0.0, Viewport::new(800, 600));
        assert!(!corner.hits_sphere(Vec3::ZERO, 1.0));
    }

    #[test]
    fn sphere_behind_ray_is_missed() {
        let ray = Ray {
            origin: Vec3::ZERO,
            dir: Vec3::Z,
        };
        assert!(!ray.hits_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0));
        assert!(ray.hits_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0));
    }
}
