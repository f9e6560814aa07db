//! Material parsing subsystem
//!
//! MTL text is parsed into [`crate::render::Material`] records; meshes are tied
//! to materials by name afterwards.

pub mod mtl_parser;
pub mod map_options;
pub mod material_index;

pub use mtl_parser::{MtlLoader, MtlParser};
pub use material_index::material_indices;
