//! Operations module
//!
//! Coordinates workflow tasks: external tool invocations, example argument
//! parsing, and workspace cleanup

pub mod clean;
pub mod example;
pub mod invocation;
pub mod tasks;

pub use clean::*;
pub use example::*;
pub use invocation::*;
pub use tasks::*;
