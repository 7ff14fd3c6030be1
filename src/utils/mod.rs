//! Utility modules shared by the document model and the pipeline.

pub mod hash;
pub mod html;
