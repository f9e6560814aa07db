//! # GL Model Loader
//!
//! Wavefront OBJ/MTL importer producing triangle meshes ready for upload to a
//! graphics API.
//!
//! ## Features
//!
//! - **OBJ parsing**: named sub-objects, positions, texture coordinates,
//!   normals, triangular faces and material references
//! - **MTL parsing**: scalar and color attributes, texture maps with their
//!   transform options
//! - **Post-processing**: UV flip, index base correction and index elimination
//! - **Tangents**: per-corner tangent vectors for normal mapping
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gl_model_loader::prelude::*;
//!
//! fn main() -> Result<(), LoaderError> {
//!     let config = ImportConfig::new()
//!         .with_index_correction(IndexPolicy::OneBased)
//!         .with_post_process(PostProcessFlags::INDEX_ELIMINATION, true);
//!
//!     let mut model = ModelLoader::load("ship.obj", Some("ship.mtl"), &config)?;
//!     model.calculate_tangents(false, 0.001)?;
//!
//!     for (mesh, index) in model.meshes().iter().zip(model.material_indices()?) {
//!         println!("{} -> {}", mesh.name(), model.materials[index].name());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod assets;
pub mod render;

pub use assets::{LoaderError, Result};

/// Common imports for loader users
pub mod prelude {
    pub use crate::{
        LoaderError,
        assets::{
            material_indices, LoadedModel, ModelLoader, MtlLoader, MtlParser, ObjLoader, ObjModel,
            ObjParser,
        },
        config::Config,
        core::config::{ImportConfig, IndexPolicy, PostProcessFlags},
        foundation::math::Vec3,
        render::{AttributeChannel, Face, MapRef, MapRole, Material, Mesh, TangentStatus},
    };
}
