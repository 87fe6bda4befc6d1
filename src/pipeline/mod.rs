pub mod cleanup;
pub mod controller;

pub use controller::{Pipeline, PipelineReport, Stage};
