//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use postdrop::config::Config;
use postdrop::context::PipelineContext;
use postdrop::logging::LogSink;
use postdrop_common::paths::is_video_file;
use postdrop_engine::{ActionMode, EngineOutput, EngineRequest, MetadataSource, RenameEngine};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use walkdir::WalkDir;

/// Rename engine that identifies a download only through the given sources.
///
/// `None` in `accepts` stands for auto-detection. On a committed match every
/// video under the source is moved flat into the target root.
pub struct FakeEngine {
    target_root: PathBuf,
    accepts: Vec<Option<MetadataSource>>,
    calls: Mutex<Vec<EngineRequest>>,
}

impl FakeEngine {
    pub fn new(target_root: &Path, accepts: Vec<Option<MetadataSource>>) -> Self {
        Self {
            target_root: target_root.to_path_buf(),
            accepts,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<EngineRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn matches(&self, request: &EngineRequest) -> bool {
        request.non_strict && self.accepts.contains(&request.metadata_source)
    }
}

#[async_trait]
impl RenameEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake-filebot"
    }

    async fn run(&self, request: &EngineRequest) -> postdrop_engine::Result<EngineOutput> {
        self.calls.lock().unwrap().push(request.clone());

        if !self.matches(request) {
            return Ok(EngineOutput::new(
                1,
                "Failed to identify or process any files\nFailure (×_×)⌒☆\n",
            ));
        }

        let videos: Vec<PathBuf> = WalkDir::new(&request.source)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_video_file(e.path()))
            .map(|e| e.into_path())
            .collect();

        let mut stdout = String::new();
        for from in videos {
            let to = self.target_root.join(from.file_name().unwrap());
            match request.action {
                ActionMode::Simulate => {
                    stdout.push_str(&format!("[TEST] from [{}] to [{}]\n", from.display(), to.display()));
                }
                ActionMode::Commit => {
                    fs::rename(&from, &to)?;
                    stdout.push_str(&format!("[MOVE] from [{}] to [{}]\n", from.display(), to.display()));
                }
            }
        }
        stdout.push_str("Done ヾ(＾▽＾)ノ\n");
        Ok(EngineOutput::new(0, stdout))
    }
}

/// Config pointing at `plex_url`, with no waiting anywhere.
pub fn test_config(plex_url: &str, target_root: &Path) -> Config {
    let mut config = Config::default();
    config.plex.url = plex_url.to_string();
    config.plex.token = "test-token".to_string();
    config.plex.retry_delay_secs = 0;
    config.library.target_root = target_root.to_path_buf();
    config.readiness.stability_window_secs = 0;
    config
}

pub fn test_context(config: Config, log_file: Option<PathBuf>, dry_run: bool) -> PipelineContext {
    PipelineContext::new(config, LogSink::new(log_file)).with_dry_run(dry_run)
}

/// Create `files` (relative paths) under `root` with some content.
pub fn create_files(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"not really a video").unwrap();
    }
}
