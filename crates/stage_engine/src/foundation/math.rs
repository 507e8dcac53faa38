//! Math utilities and types
//!
//! Provides the 2D math types used by the scene graph. World and local
//! transforms are stored as homogeneous 3x3 affine matrices.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// Homogeneous 2D affine transform (last row is always `0 0 1`)
pub type Affine2 = Mat3;

/// Affine matrix construction and inspection helpers
pub mod affine {
    use super::{Affine2, Point2, Vec2};

    /// Build a local transform from its components.
    ///
    /// The linear part folds rotation and skew together:
    ///
    /// ```text
    /// a = cos(r + ky) * sx     c = -sin(r - kx) * sy
    /// b = sin(r + ky) * sx     d =  cos(r - kx) * sy
    /// ```
    ///
    /// and the translation column carries the position.
    pub fn from_parts(position: Vec2, rotation: f32, scale: Vec2, skew: Vec2) -> Affine2 {
        let a = (rotation + skew.y).cos() * scale.x;
        let b = (rotation + skew.y).sin() * scale.x;
        let c = -(rotation - skew.x).sin() * scale.y;
        let d = (rotation - skew.x).cos() * scale.y;

        Affine2::new(
            a, c, position.x,
            b, d, position.y,
            0.0, 0.0, 1.0,
        )
    }

    /// Translation component of an affine matrix
    pub fn translation(matrix: &Affine2) -> Vec2 {
        Vec2::new(matrix.m13, matrix.m23)
    }

    /// Transform a point (applies translation)
    pub fn transform_point(matrix: &Affine2, point: Point2) -> Point2 {
        matrix.transform_point(&point)
    }

    /// Transform a vector (ignores translation)
    pub fn transform_vector(matrix: &Affine2, vector: Vec2) -> Vec2 {
        matrix.transform_vector(&vector)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_parts() {
        let m = affine::from_parts(Vec2::zeros(), 0.0, Vec2::new(1.0, 1.0), Vec2::zeros());
        assert_relative_eq!(m, Affine2::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_then_translation() {
        let m = affine::from_parts(
            Vec2::new(10.0, 0.0),
            constants::PI / 2.0,
            Vec2::new(2.0, 2.0),
            Vec2::zeros(),
        );

        // (1, 0) scaled to (2, 0), rotated to (0, 2), translated to (10, 2)
        let p = affine::transform_point(&m, Point2::new(1.0, 0.0));
        assert_relative_eq!(p, Point2::new(10.0, 2.0), epsilon = EPSILON);

        let v = affine::transform_vector(&m, Vec2::new(1.0, 0.0));
        assert_relative_eq!(v, Vec2::new(0.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_skew_shears_axes() {
        let m = affine::from_parts(
            Vec2::zeros(),
            0.0,
            Vec2::new(1.0, 1.0),
            Vec2::new(constants::PI / 4.0, 0.0),
        );

        // Skewing on x tilts the y axis: (0, 1) -> (sin(pi/4), cos(pi/4))
        let v = affine::transform_vector(&m, Vec2::new(0.0, 1.0));
        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(v, Vec2::new(half_sqrt2, half_sqrt2), epsilon = EPSILON);
    }

    #[test]
    fn test_utils() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = EPSILON);
        assert_eq!(utils::clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(utils::clamp(-0.5, 0.0, 1.0), 0.0);
    }
}
