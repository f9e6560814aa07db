//! Mesh representation for imported models
//!
//! A `Mesh` is one named sub-object of an OBJ file. During the parse it only
//! grows; once the parser moves on to the next object marker it is never
//! touched again, except when index elimination replaces it wholesale with a
//! de-indexed copy.
//!
//! # Layouts
//!
//! - **Indexed**: `faces` hold index triples into the vertex, texture
//!   coordinate and normal arrays.
//! - **De-indexed** (`is_index_eliminated()`): attribute arrays are position
//!   aligned, one entry per triangle corner, so triangle `i` occupies entries
//!   `3i..3i + 3`. The faces that remain are bookkeeping only.

use crate::assets::{LoaderError, Result};
use crate::foundation::math::Vec3;
use crate::render::tangents::TangentStatus;

use super::face::{AttributeChannel, Face};

/// Geometry of one named sub-object
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    material_name: Option<String>,
    vertices: Vec<Vec3>,
    texcoords: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
    tangents: Vec<Vec3>,
    index_eliminated: bool,
    tangent_status: TangentStatus,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material_name: None,
            vertices: Vec::new(),
            texcoords: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            tangents: Vec::new(),
            index_eliminated: false,
            tangent_status: TangentStatus::default(),
        }
    }

    /// Name given by the object marker
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Material selected with `usemtl`, if any
    pub fn material_name(&self) -> Option<&str> {
        self.material_name.as_deref()
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Texture coordinates (third component is zero when the file gave two)
    pub fn texcoords(&self) -> &[Vec3] {
        &self.texcoords
    }

    /// Vertex normals
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangle faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Per-corner tangents; empty until [`Mesh::calculate_tangents`] succeeds
    pub fn tangents(&self) -> &[Vec3] {
        &self.tangents
    }

    /// Whether the attribute arrays are position aligned
    pub fn is_index_eliminated(&self) -> bool {
        self.index_eliminated
    }

    /// Outcome of the last tangent calculation
    pub fn tangent_status(&self) -> TangentStatus {
        self.tangent_status
    }

    /// Number of elements stored for a channel
    pub fn channel_len(&self, channel: AttributeChannel) -> usize {
        self.channel(channel).len()
    }

    /// Attribute array for a channel
    pub fn channel(&self, channel: AttributeChannel) -> &[Vec3] {
        match channel {
            AttributeChannel::Vertices => &self.vertices,
            AttributeChannel::TextureCoordinates => &self.texcoords,
            AttributeChannel::Normals => &self.normals,
        }
    }

    /// Number of triangles described by the mesh
    pub fn triangle_count(&self) -> usize {
        if self.index_eliminated {
            self.vertices.len() / 3
        } else {
            self.faces.len()
        }
    }

    /// Tangent of one corner
    ///
    /// # Errors
    /// `NoTangentData` if tangents have not been calculated,
    /// `TangentIndexOutOfRange` if `index` is past the last corner.
    pub fn tangent(&self, index: usize) -> Result<Vec3> {
        if self.tangents.is_empty() {
            return Err(LoaderError::NoTangentData);
        }
        self.tangents
            .get(index)
            .copied()
            .ok_or(LoaderError::TangentIndexOutOfRange {
                index,
                len: self.tangents.len(),
            })
    }

    pub(crate) fn set_material_name(&mut self, name: impl Into<String>) {
        self.material_name = Some(name.into());
    }

    pub(crate) fn set_index_eliminated(&mut self, eliminated: bool) {
        self.index_eliminated = eliminated;
    }

    pub(crate) fn push_vertex(&mut self, v: Vec3) {
        self.vertices.push(v);
    }

    pub(crate) fn push_texcoord(&mut self, vt: Vec3) {
        self.texcoords.push(vt);
    }

    pub(crate) fn push_normal(&mut self, vn: Vec3) {
        self.normals.push(vn);
    }

    pub(crate) fn push_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub(crate) fn replace_tangents(&mut self, tangents: Vec<Vec3>, status: TangentStatus) {
        self.tangents = tangents;
        self.tangent_status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mesh_is_empty() {
        let mesh = Mesh::new("Cube");
        assert_eq!(mesh.name(), "Cube");
        assert_eq!(mesh.material_name(), None);
        assert!(mesh.vertices().is_empty());
        assert!(mesh.faces().is_empty());
        assert!(!mesh.is_index_eliminated());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_tangent_before_calculation() {
        let mesh = Mesh::new("Cube");
        assert!(matches!(mesh.tangent(0), Err(LoaderError::NoTangentData)));
    }

    #[test]
    fn test_tangent_index_out_of_range() {
        let mut mesh = Mesh::new("Tri");
        mesh.replace_tangents(vec![Vec3::x(); 3], TangentStatus::Clean);
        assert_eq!(mesh.tangent(2).unwrap(), Vec3::x());
        assert!(matches!(
            mesh.tangent(3),
            Err(LoaderError::TangentIndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_channel_access() {
        let mut mesh = Mesh::new("Tri");
        mesh.push_vertex(Vec3::new(1.0, 2.0, 3.0));
        mesh.push_normal(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.channel_len(AttributeChannel::Vertices), 1);
        assert_eq!(mesh.channel_len(AttributeChannel::TextureCoordinates), 0);
        assert_eq!(mesh.channel(AttributeChannel::Normals)[0], Vec3::new(0.0, 1.0, 0.0));
    }
}
