//! Publish workflow orchestration.

pub mod publisher;

pub use publisher::{PublishIntent, PublishOrchestrator};
