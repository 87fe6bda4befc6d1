//! Interpretation of the rename engine's textual output.
//!
//! The engine prints one marker line per file it handled:
//!
//! ```text
//! [TEST] from [/downloads/x/a.mkv] to [/media/TV Shows/A/Season 01/A - S01E01.mkv]
//! [MOVE] from [/downloads/x/a.mkv] to [/media/TV Shows/A/Season 01/A - S01E01.mkv]
//! ```
//!
//! Counting these markers is the only trustworthy success signal. If the
//! engine ever changes this format every run will read as a failure; the tests
//! below pin the literal samples the interpreter relies on.

use crate::source::ActionMode;
use std::path::PathBuf;

/// Marker printed for each file a dry run would rename.
pub const DRY_RUN_MARKER: &str = "[TEST]";

/// Marker printed for each file actually moved.
pub const MOVE_MARKER: &str = "[MOVE]";

/// Marker counts extracted from one engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSummary {
    /// Lines announcing a simulated rename.
    pub dry_run_matches: usize,
    /// Lines announcing a committed move.
    pub committed_moves: usize,
}

impl OutputSummary {
    /// Count marker lines in `output`. A line counts at most once per marker.
    pub fn parse(output: &str) -> Self {
        let mut summary = Self::default();
        for line in output.lines() {
            let line = line.trim_start();
            if line.contains(DRY_RUN_MARKER) {
                summary.dry_run_matches += 1;
            }
            if line.contains(MOVE_MARKER) {
                summary.committed_moves += 1;
            }
        }
        summary
    }

    /// Files affected under the given action mode.
    pub fn affected(&self, action: ActionMode) -> usize {
        match action {
            ActionMode::Simulate => self.dry_run_matches,
            ActionMode::Commit => self.committed_moves,
        }
    }

    /// Whether a run with this output counts as a success.
    ///
    /// The exit code is not an input: affected files win over it in both
    /// directions.
    pub fn succeeded(&self, action: ActionMode) -> bool {
        self.affected(action) > 0
    }
}

/// Destination paths announced by the marker lines for `action`, in order.
///
/// Lines that do not end in a bracketed `to [...]` target are skipped.
pub fn destinations(output: &str, action: ActionMode) -> Vec<PathBuf> {
    output
        .lines()
        .filter(|line| line.contains(action.marker()))
        .filter_map(|line| {
            let line = line.trim_end();
            let start = line.rfind(" to [")? + " to [".len();
            let target = line[start..].strip_suffix(']')?;
            (!target.is_empty()).then(|| PathBuf::from(target))
        })
        .collect()
}
