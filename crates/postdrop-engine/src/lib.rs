//! # postdrop-engine
//!
//! Adapter for the external, metadata-driven rename engine (FileBot-compatible
//! command line).
//!
//! This crate provides:
//! - [`RenameEngine`], the capability the fallback orchestrator drives, with a
//!   process-backed implementation in [`ProcessEngine`]
//! - [`MetadataSource`] and [`ActionMode`], the knobs a single strategy turns
//! - [`OutputSummary`], the interpreter that decides whether an invocation
//!   actually did anything
//! - Engine lookup on `PATH` or from configuration
//!
//! The engine's exit status is not a reliable success signal. It can exit
//! non-zero after moving files, and zero after doing nothing. Callers must use
//! [`OutputSummary::affected`] to decide.
//!
//! ## Example
//!
//! ```no_run
//! use postdrop_engine::{
//!     ActionMode, EngineRequest, EngineSettings, OutputSummary, ProcessEngine, RenameEngine,
//! };
//! use std::path::PathBuf;
//!
//! # async fn example() -> postdrop_engine::Result<()> {
//! let engine = ProcessEngine::new(PathBuf::from("filebot"), EngineSettings::new("/media"));
//! let request = EngineRequest::auto_detect("/downloads/The.Show.S01E01", ActionMode::Simulate);
//! let output = engine.run(&request).await?;
//! let summary = OutputSummary::parse(&output.combined());
//! println!("would rename {} files", summary.affected(ActionMode::Simulate));
//! # Ok(())
//! # }
//! ```

pub mod command;
mod engine;
mod error;
pub mod output;
mod source;
pub mod tools;

pub use command::{build_args, EngineSettings};
pub use engine::{EngineOutput, EngineRequest, ProcessEngine, RenameEngine};
pub use error::{Error, Result};
pub use output::{destinations, OutputSummary};
pub use source::{ActionMode, MetadataSource};
pub use tools::{find_on_path, probe_engine, resolve_engine, EngineInfo};
