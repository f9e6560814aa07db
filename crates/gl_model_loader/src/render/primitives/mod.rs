//! Geometry primitives

pub mod face;
pub mod mesh;

pub use face::{AttributeChannel, Face};
pub use mesh::Mesh;
