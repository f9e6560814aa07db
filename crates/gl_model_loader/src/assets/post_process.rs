//! Post-processing passes over parsed meshes
//!
//! UV flipping and index correction run per line while the OBJ stream is being
//! parsed; index elimination runs once over the finished meshes.

use log::debug;

use crate::foundation::math::Vec3;
use crate::render::{AttributeChannel, Face, Mesh};

use super::{LoaderError, Result};

/// Swap the first two components of a texture coordinate
pub fn flip_uv(texcoord: Vec3) -> Vec3 {
    Vec3::new(texcoord.y, texcoord.x, texcoord.z)
}

/// Expand every mesh into a flat, position-aligned layout when `enabled`.
///
/// With `enabled == false` the meshes are returned untouched.
///
/// # Errors
/// `MalformedObj` when a face index falls outside its attribute array.
pub fn eliminate_indices(meshes: Vec<Mesh>, enabled: bool) -> Result<Vec<Mesh>> {
    if !enabled {
        return Ok(meshes);
    }
    meshes.iter().map(deindex_mesh).collect()
}

/// Build the de-indexed copy of one mesh.
///
/// Each face `j` contributes corners `3j..3j + 3` to the vertex array, and to
/// the texture coordinate and normal arrays when the source mesh has any of
/// those. A face that does not reference a channel the mesh does have
/// contributes zero vectors so that the arrays stay aligned. The output faces
/// index `3j, 3j + 1, 3j + 2` in every populated channel.
pub fn deindex_mesh(mesh: &Mesh) -> Result<Mesh> {
    let mut out = Mesh::new(mesh.name());
    if let Some(material) = mesh.material_name() {
        out.set_material_name(material);
    }
    out.set_index_eliminated(true);

    let has_texcoords = !mesh.texcoords().is_empty();
    let has_normals = !mesh.normals().is_empty();

    for (j, face) in mesh.faces().iter().enumerate() {
        for v in resolve(mesh, face, j, AttributeChannel::Vertices)? {
            out.push_vertex(v);
        }
        if has_texcoords {
            for vt in resolve(mesh, face, j, AttributeChannel::TextureCoordinates)? {
                out.push_texcoord(vt);
            }
        }
        if has_normals {
            for vn in resolve(mesh, face, j, AttributeChannel::Normals)? {
                out.push_normal(vn);
            }
        }

        let base = i64::try_from(3 * j).map_err(|_| {
            LoaderError::MalformedObj(format!("mesh '{}': too many faces to index", mesh.name()))
        })?;
        let flat = [base, base + 1, base + 2];
        out.push_face(Face::new(
            flat,
            has_texcoords.then_some(flat),
            has_normals.then_some(flat),
        ));
    }

    debug!(
        "Mesh '{}': de-indexed {} faces into {} corners",
        mesh.name(),
        mesh.faces().len(),
        out.vertices().len()
    );
    Ok(out)
}

fn resolve(mesh: &Mesh, face: &Face, face_idx: usize, channel: AttributeChannel) -> Result<[Vec3; 3]> {
    let Some(indices) = face.indices(channel) else {
        return Ok([Vec3::zeros(); 3]);
    };
    let data = mesh.channel(channel);
    let mut corners = [Vec3::zeros(); 3];
    for (corner, idx) in corners.iter_mut().zip(indices) {
        *corner = usize::try_from(idx)
            .ok()
            .and_then(|i| data.get(i))
            .copied()
            .ok_or_else(|| {
                LoaderError::MalformedObj(format!(
                    "mesh '{}': face {} {:?} index {} outside 0..{}",
                    mesh.name(),
                    face_idx,
                    channel,
                    idx,
                    data.len()
                ))
            })?;
    }
    Ok(corners)
}
