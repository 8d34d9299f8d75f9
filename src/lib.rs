//! fsbdd - behaviour-driven scenarios for file-system operations
//!
//! Gherkin steps are matched against an immutable [`steps::Registry`] and
//! dispatched to file handlers on a [`steps::Workspace`]; the
//! [`testing::Runner`] executes scenarios and aggregates the results.

pub mod cli;
pub mod commands;
pub mod common;
pub mod steps;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use steps::{Action, Registry, StepKind, Workspace};
