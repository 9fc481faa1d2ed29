//! Perspective camera
//!
//! Mirrors the usual retained-mode camera contract: changing the aspect ratio
//! does not touch the projection until [`Camera::update_projection`] is called.

use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};

/// Perspective camera looking down -Z from its position
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    fov_y: Deg<f32>,
    aspect: f32,
    near: f32,
    far: f32,
    position: Point3<f32>,
    projection: Matrix4<f32>,
}

impl Camera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let fov_y = Deg(fov_y_degrees);
        Self {
            fov_y,
            aspect,
            near,
            far,
            position: Point3::new(0.0, 1.4, 4.0),
            projection: perspective(fov_y, aspect, near, far),
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Point3::new(x, y, z);
        self
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y.0
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Set the aspect ratio. Non-positive or non-finite values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        } else {
            tracing::warn!(aspect, "ignoring invalid camera aspect");
        }
    }

    /// Recompute the projection from the current parameters
    pub fn update_projection(&mut self) {
        self.projection = perspective(self.fov_y, self.aspect, self.near, self.far);
    }

    /// Column-major projection matrix
    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    /// World-to-camera transform
    pub fn view(&self) -> Matrix4<f32> {
        let p = self.position;
        Matrix4::from_translation(Vector3::new(-p.x, -p.y, -p.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(38.0, 1.0, 0.1, 100.0)
    }
}
