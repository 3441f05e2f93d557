//! Perspective camera
//!
//! Right-handed, Y-up view space. Projection uses the OpenGL clip depth range
//! produced by [`Mat4Ext::perspective`].

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Perspective camera positioned in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at
    pub target: Vec3,

    /// Up vector, typically +Y
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Viewport width divided by height
    pub aspect: f32,

    /// Distance to the near clipping plane
    pub near: f32,

    /// Distance to the far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a camera at `position` looking at the origin
    ///
    /// `fov_degrees` is the vertical field of view.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Move the camera, keeping its target
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at `target` with the given up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update the aspect ratio after a viewport resize
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// View-to-clip transform
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined `projection * view`
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 2.0, 10.0), 60.0, 16.0 / 9.0, 0.1, 100.0)
    }
}
