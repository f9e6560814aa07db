//! Per-triangle tangent generation for de-indexed meshes
//!
//! For each triangle the edge matrix `E` (rows `p1 - p0`, `p2 - p0`) and the
//! UV delta matrix `M` (rows `uv1 - uv0`, `uv2 - uv0`) satisfy
//! `E = M * [T; B]`, so the tangent is row 0 of `M⁻¹ * E`.
//!
//! When `M` is singular the UV deltas are nudged by `bias * attempt` on all
//! four entries and the inversion is retried, at most
//! [`MAX_SINGULAR_RETRIES`] times per triangle.

use std::fmt;

use log::{debug, warn};

use crate::assets::{LoaderError, Result};
use crate::foundation::math::{utils, Mat2, Mat2x3, Vec3};

use super::primitives::Mesh;

/// Retries allowed per triangle after the first singular inversion
pub const MAX_SINGULAR_RETRIES: u32 = 64;

/// Outcome of the last tangent calculation on a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TangentStatus {
    /// No singular UV matrix was met
    #[default]
    Clean,
    /// This many singular UV matrices were retried with a bias
    SingularMatrices(usize),
}

impl TangentStatus {
    /// Number of singular inversions encountered
    pub fn singular_count(&self) -> usize {
        match self {
            Self::Clean => 0,
            Self::SingularMatrices(n) => *n,
        }
    }
}

impl fmt::Display for TangentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("no error"),
            Self::SingularMatrices(n) => write!(f, "{n} singular matrices found"),
        }
    }
}

/// Invert the UV delta matrix, nudging it by `bias * attempt` while singular.
///
/// Returns the inverse and the number of singular attempts, or the total number
/// of attempts made when the retry budget runs out.
fn invert_uv_with_bias(deltas: &Mat2, bias: f32) -> std::result::Result<(Mat2, usize), u32> {
    let mut singular = 0;
    let mut nudge = 0.0;
    for _ in 0..=MAX_SINGULAR_RETRIES {
        let biased = deltas.add_scalar(nudge);
        if let Some(inverse) = utils::invert_mat2(&biased) {
            return Ok((inverse, singular));
        }
        singular += 1;
        nudge += bias;
    }
    Err(MAX_SINGULAR_RETRIES + 1)
}

impl Mesh {
    /// Calculate one tangent per triangle and store it for each of the three
    /// corners.
    ///
    /// Returns `Ok(false)` without touching the mesh when it is not
    /// de-indexed, when tangents exist and `recalculate` is false, or when
    /// `bias` is exactly zero. Zero-length tangents are not guarded and come
    /// out non-finite.
    ///
    /// # Errors
    /// - `MissingTexcoords` when the mesh has fewer texture coordinates than
    ///   vertices
    /// - `DegenerateUv` when a triangle's UV matrix stays singular after
    ///   [`MAX_SINGULAR_RETRIES`] biased retries; existing tangents are kept
    pub fn calculate_tangents(&mut self, recalculate: bool, bias: f32) -> Result<bool> {
        if !self.is_index_eliminated() || bias == 0.0 {
            return Ok(false);
        }
        if !self.tangents().is_empty() && !recalculate {
            return Ok(false);
        }

        let triangles = self.vertices().len() / 3;
        if self.texcoords().len() < triangles * 3 {
            return Err(LoaderError::MissingTexcoords {
                mesh: self.name().to_string(),
            });
        }

        let mut tangents = Vec::with_capacity(triangles * 3);
        let mut singular_total = 0;
        let mut non_finite = 0;

        for i in 0..triangles {
            let p = &self.vertices()[3 * i..3 * i + 3];
            let uv = &self.texcoords()[3 * i..3 * i + 3];

            let edge1 = p[1] - p[0];
            let edge2 = p[2] - p[0];
            let edges = Mat2x3::new(
                edge1.x, edge1.y, edge1.z,
                edge2.x, edge2.y, edge2.z,
            );

            let delta_uv1 = uv[1] - uv[0];
            let delta_uv2 = uv[2] - uv[0];
            let deltas = Mat2::new(
                delta_uv1.x, delta_uv1.y,
                delta_uv2.x, delta_uv2.y,
            );

            let (inverse, singular) = invert_uv_with_bias(&deltas, bias).map_err(|attempts| {
                LoaderError::DegenerateUv {
                    mesh: self.name().to_string(),
                    triangle: i,
                    attempts,
                }
            })?;
            singular_total += singular;

            let tangent_bitangent = inverse * edges;
            let raw = Vec3::new(
                tangent_bitangent[(0, 0)],
                tangent_bitangent[(0, 1)],
                tangent_bitangent[(0, 2)],
            );
            let tangent = utils::normalize_unchecked(&raw);
            if !tangent.iter().all(|c| c.is_finite()) {
                non_finite += 1;
            }

            tangents.extend_from_slice(&[tangent, tangent, tangent]);
        }

        let status = if singular_total == 0 {
            TangentStatus::Clean
        } else {
            warn!(
                "Mesh '{}': {} singular UV matrices retried with bias {}",
                self.name(), singular_total, bias
            );
            TangentStatus::SingularMatrices(singular_total)
        };
        if non_finite > 0 {
            warn!("Mesh '{}': {} triangles produced non-finite tangents", self.name(), non_finite);
        }
        debug!("Mesh '{}': calculated tangents for {} triangles", self.name(), triangles);

        self.replace_tangents(tangents, status);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_mesh(corners: &[(Vec3, Vec3)], eliminated: bool) -> Mesh {
        let mut mesh = Mesh::new("Quad");
        for (p, uv) in corners {
            mesh.push_vertex(*p);
            mesh.push_texcoord(*uv);
        }
        mesh.set_index_eliminated(eliminated);
        mesh
    }

    fn unit_triangle(eliminated: bool) -> Mesh {
        flat_mesh(
            &[
                (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0)),
                (Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
                (Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            ],
            eliminated,
        )
    }

    #[test]
    fn test_tangent_follows_u_axis() {
        let mut mesh = unit_triangle(true);
        assert!(mesh.calculate_tangents(false, 1e-4).unwrap());
        assert_eq!(mesh.tangents().len(), 3);
        for t in mesh.tangents() {
            assert_relative_eq!(*t, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
            assert_relative_eq!(t.norm(), 1.0, epsilon = 1e-6);
        }
        assert_eq!(mesh.tangent_status(), TangentStatus::Clean);
        assert_eq!(mesh.tangent_status().to_string(), "no error");
    }

    #[test]
    fn test_requires_index_elimination() {
        let mut mesh = unit_triangle(false);
        assert!(!mesh.calculate_tangents(false, 1e-4).unwrap());
        assert!(mesh.tangents().is_empty());
    }

    #[test]
    fn test_zero_bias_is_noop() {
        let mut mesh = unit_triangle(true);
        assert!(!mesh.calculate_tangents(false, 0.0).unwrap());
        assert!(mesh.tangents().is_empty());
    }

    #[test]
    fn test_recalculate_flag() {
        let mut mesh = unit_triangle(true);
        assert!(mesh.calculate_tangents(false, 1e-4).unwrap());
        assert!(!mesh.calculate_tangents(false, 1e-4).unwrap());
        assert!(mesh.calculate_tangents(true, 1e-4).unwrap());
        assert_eq!(mesh.tangents().len(), 3);
    }

    #[test]
    fn test_singular_uv_is_retried() {
        // deltas (1, 0) and (2, 0): singular until the bias lifts the second column
        let mut mesh = flat_mesh(
            &[
                (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0)),
                (Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
                (Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0)),
            ],
            true,
        );
        assert!(mesh.calculate_tangents(false, 0.5).unwrap());
        assert_eq!(mesh.tangent_status(), TangentStatus::SingularMatrices(1));
        assert_eq!(mesh.tangent_status().to_string(), "1 singular matrices found");
        assert_relative_eq!(mesh.tangent(0).unwrap().norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_collapsed_uv_reports_degenerate() {
        let same = Vec3::new(0.5, 0.5, 0.0);
        let mut mesh = flat_mesh(
            &[
                (Vec3::new(0.0, 0.0, 0.0), same),
                (Vec3::new(1.0, 0.0, 0.0), same),
                (Vec3::new(0.0, 1.0, 0.0), same),
            ],
            true,
        );
        let err = mesh.calculate_tangents(false, 1e-3).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::DegenerateUv { triangle: 0, attempts, .. } if attempts == MAX_SINGULAR_RETRIES + 1
        ));
        assert!(mesh.tangents().is_empty());
    }

    #[test]
    fn test_missing_texcoords() {
        let mut mesh = Mesh::new("Bare");
        for _ in 0..3 {
            mesh.push_vertex(Vec3::zeros());
        }
        mesh.set_index_eliminated(true);
        assert!(matches!(
            mesh.calculate_tangents(false, 1e-4),
            Err(LoaderError::MissingTexcoords { .. })
        ));
    }
}
