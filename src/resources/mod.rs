//! Resource management
//!
//! GPU-side meshes, textures, samplers and shader programs, and the
//! materials and pipeline state built from them.

mod material;
mod mesh;
mod pipeline_state;
mod shader;
mod texture;

pub use material::*;
pub use mesh::*;
pub use pipeline_state::*;
pub use shader::*;
pub use texture::*;
