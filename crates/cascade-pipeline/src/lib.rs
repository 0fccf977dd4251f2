//! # cascade-pipeline
//!
//! Boundary between resolution and the CI system: renders trigger targets
//! into a pipeline document and pipes it to the agent that publishes it.

pub mod render;
pub mod upload;

pub use render::{PipelineDocument, TriggerStep, render_document};
pub use upload::{AgentUploader, Uploader};
