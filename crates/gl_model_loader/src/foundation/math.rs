//! Math utilities and types
//!
//! Provides the vector and small matrix types used by the mesh model and the
//! tangent calculator.

pub use nalgebra::{Matrix2, Matrix2x3, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 2x2 matrix type (UV deltas)
pub type Mat2 = Matrix2<f32>;

/// 2x3 matrix type (two edge rows, or tangent/bitangent rows)
pub type Mat2x3 = Matrix2x3<f32>;

/// Small matrix routines
pub mod utils {
    use super::*;

    /// Invert a 2x2 matrix as `1/det * adjugate`.
    ///
    /// Returns `None` when the determinant is exactly zero.
    pub fn invert_mat2(m: &Mat2) -> Option<Mat2> {
        let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
        if det == 0.0 {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Mat2::new(
            m[(1, 1)] * inv_det, -m[(0, 1)] * inv_det,
            -m[(1, 0)] * inv_det, m[(0, 0)] * inv_det,
        ))
    }

    /// Normalize without guarding against zero length.
    ///
    /// A zero vector yields non-finite components.
    pub fn normalize_unchecked(v: &Vec3) -> Vec3 {
        let inv_len = 1.0 / v.dot(v).sqrt();
        v * inv_len
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invert_identity() {
        let inv = invert_mat2(&Mat2::identity()).unwrap();
        assert_relative_eq!(inv, Mat2::identity());
    }

    #[test]
    fn test_invert_general() {
        let m = Mat2::new(4.0, 7.0, 2.0, 6.0);
        let inv = invert_mat2(&m).unwrap();
        assert_relative_eq!(m * inv, Mat2::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_invert_singular() {
        assert!(invert_mat2(&Mat2::new(1.0, 2.0, 2.0, 4.0)).is_none());
        assert!(invert_mat2(&Mat2::zeros()).is_none());
    }

    #[test]
    fn test_normalize_unchecked() {
        let n = normalize_unchecked(&Vec3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(n, Vec3::new(0.6, 0.0, 0.8), epsilon = 1e-6);
        assert!(!normalize_unchecked(&Vec3::zeros()).x.is_finite());
    }
}
