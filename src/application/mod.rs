//! Application layer: editor session, id generation and command scripts
//!
//! This layer owns the caller-side state around the pure domain operations.

pub mod error;
pub mod error_ext;
pub mod ids;
pub mod script;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use ids::{IdGenerator, IdStrategy, SequentialGenerator, UuidGenerator};
pub use script::{ScriptCommand, ScriptReport, ScriptRunner, ScriptSink};
pub use session::{EditorSession, SessionOptions};
