//! Shared type definitions for projwiz

mod platform_types;
mod retry_types;
mod step_types;

pub use platform_types::*;
pub use retry_types::*;
pub use step_types::*;
