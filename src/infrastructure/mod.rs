//! Infrastructure layer: document import/export
//!
//! This layer owns everything that touches files or wire formats.

pub mod codec;
pub mod error;

pub use error::{InfraError, InfraResult};
