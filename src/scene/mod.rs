//! Scene components
//!
//! The world itself is a `bevy_ecs::World`; these are the components the
//! renderer looks for on its entities.

mod camera;
mod light;
mod mesh_renderer;
mod transform;

pub use camera::*;
pub use light::*;
pub use mesh_renderer::*;
pub use transform::*;
