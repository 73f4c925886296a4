/// FOV Mesh Library
///
/// Per-tick field-of-view visibility polygon and mesh building for game backends

pub mod comp;
pub mod vision;
pub mod config;
pub mod tick;

// Re-export commonly used types
pub use crate::comp::*;
pub use crate::vision::*;
pub use crate::tick::*;
