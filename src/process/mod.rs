//! External process execution primitives.

pub mod runner;

pub use runner::ToolProcessRunner;
