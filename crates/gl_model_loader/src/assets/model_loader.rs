//! Combined OBJ + MTL loading
//!
//! Convenience layer over [`ObjLoader`] and [`MtlLoader`] for the common case
//! of an OBJ file paired with one material library.

use std::path::Path;

use log::info;

use crate::core::config::ImportConfig;
use crate::render::{Material, Mesh};

use super::materials::{material_indices, MtlLoader};
use super::obj_loader::{ObjLoader, ObjModel};
use super::Result;

/// Geometry and materials loaded together
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    /// Parsed OBJ content
    pub obj: ObjModel,
    /// Materials in library order; empty when no MTL file was given
    pub materials: Vec<Material>,
}

impl LoadedModel {
    /// Meshes of the OBJ part
    pub fn meshes(&self) -> &[Mesh] {
        self.obj.meshes()
    }

    /// Material index for each mesh
    ///
    /// # Errors
    /// `MaterialNotFound` when a mesh names a material the library lacks.
    pub fn material_indices(&self) -> Result<Vec<usize>> {
        material_indices(self.obj.meshes(), &self.materials)
    }

    /// Calculate tangents for every mesh, returning how many were computed
    ///
    /// Stops at the first mesh that fails. Meshes already processed keep
    /// their new tangents.
    ///
    /// # Errors
    /// See [`Mesh::calculate_tangents`].
    pub fn calculate_tangents(&mut self, recalculate: bool, bias: f32) -> Result<usize> {
        let mut computed = 0;
        for mesh in self.obj.meshes_mut() {
            if mesh.calculate_tangents(recalculate, bias)? {
                computed += 1;
            }
        }
        Ok(computed)
    }
}

/// Loads an OBJ file and, optionally, its MTL library
pub struct ModelLoader;

impl ModelLoader {
    /// Load `obj_path` with `config`, plus the materials in `mtl_path`
    ///
    /// # Errors
    /// Anything [`ObjLoader::load_obj`] or [`MtlLoader::load_mtl`] reports.
    pub fn load<P, Q>(obj_path: P, mtl_path: Option<Q>, config: &ImportConfig) -> Result<LoadedModel>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let obj = ObjLoader::load_obj(obj_path, config)?;
        let materials = match mtl_path {
            Some(path) => MtlLoader::load_mtl(path)?,
            None => Vec::new(),
        };

        info!(
            "Loaded model: {} mesh(es), {} material(s)",
            obj.meshes().len(),
            materials.len()
        );
        Ok(LoadedModel { obj, materials })
    }
}
