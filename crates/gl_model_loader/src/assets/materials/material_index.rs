//! Mesh to material cross-referencing

use log::debug;

use crate::assets::{LoaderError, Result};
use crate::render::{Material, Mesh};

/// Resolve each mesh's material name to a position in `materials`
///
/// The returned vector is parallel to `meshes`. Names are compared exactly and
/// the first material with a matching name wins when the library defines the
/// same name twice.
///
/// # Errors
/// `MaterialNotFound` for the first mesh whose material is missing from the
/// list, or which never selected a material at all.
pub fn material_indices(meshes: &[Mesh], materials: &[Material]) -> Result<Vec<usize>> {
    meshes
        .iter()
        .map(|mesh| {
            let wanted = mesh.material_name();
            let index = wanted.and_then(|name| materials.iter().position(|m| m.name() == name));
            match index {
                Some(index) => {
                    debug!("Mesh '{}' uses material #{index}", mesh.name());
                    Ok(index)
                }
                None => Err(LoaderError::MaterialNotFound {
                    mesh: mesh.name().to_string(),
                    material: wanted.map(str::to_string),
                }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_using(name: &str, material: Option<&str>) -> Mesh {
        let mut mesh = Mesh::new(name);
        if let Some(material) = material {
            mesh.set_material_name(material);
        }
        mesh
    }

    #[test]
    fn test_indices_follow_mesh_order() {
        let meshes = vec![mesh_using("a", Some("Blue")), mesh_using("b", Some("Red"))];
        let materials = vec![Material::new("Red"), Material::new("Blue")];

        assert_eq!(material_indices(&meshes, &materials).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_shared_material() {
        let meshes = vec![mesh_using("a", Some("Red")), mesh_using("b", Some("Red"))];
        let materials = vec![Material::new("Red")];

        assert_eq!(material_indices(&meshes, &materials).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let meshes = vec![mesh_using("a", Some("Red"))];
        let materials = vec![Material::new("Blue"), Material::new("Red"), Material::new("Red")];

        assert_eq!(material_indices(&meshes, &materials).unwrap(), vec![1]);
    }

    #[test]
    fn test_missing_material() {
        let meshes = vec![mesh_using("a", Some("Red")), mesh_using("b", Some("Green"))];
        let materials = vec![Material::new("Red")];

        match material_indices(&meshes, &materials) {
            Err(LoaderError::MaterialNotFound { mesh, material }) => {
                assert_eq!(mesh, "b");
                assert_eq!(material.as_deref(), Some("Green"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_mesh_without_material() {
        let meshes = vec![mesh_using("bare", None)];
        let materials = vec![Material::new("Red")];

        assert!(matches!(
            material_indices(&meshes, &materials),
            Err(LoaderError::MaterialNotFound { material: None, .. })
        ));
    }

    #[test]
    fn test_name_match_is_exact() {
        let meshes = vec![mesh_using("a", Some("red"))];
        let materials = vec![Material::new("Red")];

        assert!(material_indices(&meshes, &materials).is_err());
    }

    #[test]
    fn test_no_meshes() {
        assert!(material_indices(&[], &[]).unwrap().is_empty());
    }
}
