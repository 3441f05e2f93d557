//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of transform helpers the physics
//! and render code depend on.

pub use nalgebra::{Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Placement of a mesh in the world: position and per-axis scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with position and uniform scale
    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale: Vec3::new(scale, scale, scale),
        }
    }

    /// Model matrix: scale, then translate
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position) * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Clamp `value` into `[min, max]`
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        value.max(min).min(max)
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a right-handed perspective projection with clip depth in [-1, 1]
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0;
        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type Point3 = nalgebra::Point3<f32>;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_transform_scales_then_translates() {
        let transform = Transform::from_position_scale(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let moved = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(3.0, 2.0, 3.0), epsilon = EPSILON);
        assert_eq!(Transform::default().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = Mat4::look_at(eye, Vec3::zeros(), Vec3::y());
        let eye_in_view = view.transform_point(&Point3::from(eye));
        assert_relative_eq!(eye_in_view, Point3::origin(), epsilon = EPSILON);

        // Target ends up straight ahead on -Z
        let target_in_view = view.transform_point(&Point3::origin());
        assert_relative_eq!(target_in_view, Point3::new(0.0, 0.0, -5.0), epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        let projection = Mat4::perspective(utils::deg_to_rad(90.0), 1.0, 0.1, 100.0);
        let near = projection.transform_point(&Point3::new(0.0, 0.0, -0.1));
        let far = projection.transform_point(&Point3::new(0.0, 0.0, -100.0));
        assert_relative_eq!(near.z, -1.0, epsilon = 1e-4);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clamp() {
        assert_relative_eq!(utils::clamp(5.0, 0.0, 0.25), 0.25);
        assert_relative_eq!(utils::clamp(-1.0, 0.0, 0.25), 0.0);
        assert_relative_eq!(utils::clamp(0.1, 0.0, 0.25), 0.1);
    }
}
