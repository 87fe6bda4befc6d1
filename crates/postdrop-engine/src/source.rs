use crate::output::{DRY_RUN_MARKER, MOVE_MARKER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metadata database the engine is told to identify titles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataSource {
    /// Primary TV database.
    TheTvDb,
    /// General-purpose database in TV mode.
    TheMovieDbTv,
    /// Anime-specific database.
    AniDb,
    /// Primary movie database.
    TheMovieDb,
    /// Open movie database.
    Omdb,
}

impl MetadataSource {
    /// Identifier passed to the engine's `--db` option.
    pub fn engine_id(&self) -> &'static str {
        match self {
            Self::TheTvDb => "TheTVDB",
            Self::TheMovieDbTv => "TheMovieDB::TV",
            Self::AniDb => "AniDB",
            Self::TheMovieDb => "TheMovieDB",
            Self::Omdb => "OMDb",
        }
    }

    /// Whether this source identifies episodes rather than movies.
    pub fn is_episodic(&self) -> bool {
        matches!(self, Self::TheTvDb | Self::TheMovieDbTv | Self::AniDb)
    }
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine_id())
    }
}

impl FromStr for MetadataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thetvdb" | "tvdb" => Ok(Self::TheTvDb),
            "themoviedb::tv" | "tmdb-tv" | "tmdb_tv" => Ok(Self::TheMovieDbTv),
            "anidb" => Ok(Self::AniDb),
            "themoviedb" | "tmdb" => Ok(Self::TheMovieDb),
            "omdb" => Ok(Self::Omdb),
            _ => Err(format!("Unknown metadata source: {}", s)),
        }
    }
}

/// Whether the engine previews or performs its renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    /// Dry run: report what would move.
    Simulate,
    /// Move files into the library.
    #[default]
    Commit,
}

impl ActionMode {
    /// Value passed to the engine's `--action` option.
    pub fn engine_action(&self) -> &'static str {
        match self {
            Self::Simulate => "test",
            Self::Commit => "move",
        }
    }

    /// Marker the engine prints for each file handled in this mode.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Simulate => DRY_RUN_MARKER,
            Self::Commit => MOVE_MARKER,
        }
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulate => write!(f, "simulate"),
            Self::Commit => write!(f, "commit"),
        }
    }
}
