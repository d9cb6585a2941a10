//! Graphics context abstraction layer
//!
//! Provides the trait every graphics context implements, the value types it
//! exchanges with the renderer, and an in-memory recording implementation.

pub mod recording;
pub mod scope;
pub mod traits;
pub mod types;

pub use recording::{GlCall, RecordingContext};
pub use scope::{CreatedResource, CreationScope};
pub use traits::*;
pub use types::*;
