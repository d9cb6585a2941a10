//! Forward rendering pipeline
//!
//! One frame runs these stages in order:
//! 1. Collection - walk the world for the camera, draw commands and lights
//! 2. Opaque pass - draw opaque commands in collection order
//! 3. Sky - textured sphere forced onto the far plane
//! 4. Transparent pass - draw transparent commands back-to-front
//! 5. Post-processing - optional fullscreen effects sampling the scene

pub mod collector;
pub mod command;
pub mod forward_pass;
pub mod postprocess;
pub mod sky;
pub mod sort;

pub use collector::{collect_scene, CollectedScene};
pub use command::RenderCommand;
pub use forward_pass::FrameUniforms;
pub use postprocess::{Effect, PostProcess, RenderTargets};
pub use sky::{sky_model_matrix, sky_transform, SkyRenderer, ALWAYS_BEHIND};
pub use sort::sort_back_to_front;
