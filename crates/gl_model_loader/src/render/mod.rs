//! In-memory geometry and material model
//!
//! Everything the parsers produce lives here. Meshes and materials are plain
//! data; the only computation attached to them is tangent generation.

pub mod primitives;
pub mod material;
mod tangents;

pub use primitives::{AttributeChannel, Face, Mesh};
pub use material::{BlendSetting, Channel, ColorRange, MapRef, MapRole, Material};
pub use tangents::{TangentStatus, MAX_SINGULAR_RETRIES};
