//! Asset loading: OBJ/MTL parsing, post-processing and file acquisition

pub mod obj_loader;
pub mod post_process;
pub mod materials;
pub mod model_loader;

pub use obj_loader::{ObjLoader, ObjModel, ObjParser};
pub use materials::{material_indices, MtlLoader, MtlParser};
pub use model_loader::{LoadedModel, ModelLoader};

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the loader
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Model loading errors
///
/// None of these are retried internally. A failed parse returns no partial
/// meshes or materials.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// OBJ path does not end in `.obj`
    #[error("Not an OBJ file: {}", .0.display())]
    NotAnObjFile(PathBuf),

    /// MTL path does not end in `.mtl`
    #[error("Not an MTL file: {}", .0.display())]
    NotAMtlFile(PathBuf),

    /// The underlying line source failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Number parse failure, missing fields, bad face arity or an index
    /// outside its attribute array
    #[error("Non-standard OBJ file: {0}")]
    MalformedObj(String),

    /// Number parse failure or missing fields in an MTL file
    #[error("Non-standard MTL file: {0}")]
    MalformedMtl(String),

    /// A texture map option value could not be parsed
    #[error("Illegal MTL format: {option} does not accept '{value}'")]
    IllegalMapOption {
        /// Option flag, e.g. `-bm`
        option: String,
        /// Offending token
        value: String,
    },

    /// `-mm` base is greater than gain
    #[error("Illegal color range: base {base} must not exceed gain {gain}")]
    IllegalRange {
        /// Requested base
        base: f32,
        /// Requested gain
        gain: f32,
    },

    /// Unknown index-base selector
    #[error("Invalid index policy: {0}")]
    InvalidIndexPolicy(String),

    /// Tangents read before they were calculated
    #[error("No tangent data exists")]
    NoTangentData,

    /// Tangent index past the end of the calculated tangents
    #[error("Tangent index {index} out of range for {len} tangents")]
    TangentIndexOutOfRange {
        /// Requested corner
        index: usize,
        /// Number of stored tangents
        len: usize,
    },

    /// A mesh's material name matches no parsed material
    #[error("Material {material:?} used by mesh '{mesh}' cannot be found")]
    MaterialNotFound {
        /// Mesh name
        mesh: String,
        /// Material name the mesh asked for
        material: Option<String>,
    },

    /// A triangle's UV matrix stayed singular through every biased retry
    #[error("Mesh '{mesh}': triangle {triangle} has a degenerate UV mapping after {attempts} attempts")]
    DegenerateUv {
        /// Mesh name
        mesh: String,
        /// Triangle index within the de-indexed mesh
        triangle: usize,
        /// Inversions attempted
        attempts: u32,
    },

    /// Tangents requested on a mesh without texture coordinates
    #[error("Mesh '{mesh}' has no texture coordinates for tangent calculation")]
    MissingTexcoords {
        /// Mesh name
        mesh: String,
    },
}
