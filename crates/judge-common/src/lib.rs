//! Wire types and shared error baseline for the CodeCoach evaluation core.

pub mod error;
pub mod types;

pub use error::CoreError;
pub use types::*;
