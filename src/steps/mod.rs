//! Step bindings and the file operations they drive

mod handlers;
mod registry;

pub use handlers::Workspace;
pub use registry::{Action, Binding, Registry, StepKind};
