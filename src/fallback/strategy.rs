//! Rename strategies as data.
//!
//! Adding or removing a metadata source means editing one of the chains
//! below; the orchestrator iterates them generically.

use postdrop_common::MediaCategory;
use postdrop_engine::{ActionMode, EngineRequest, MetadataSource};
use std::fmt;
use std::path::Path;

/// Which part of the fallback sequence a strategy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    AutoDetect,
    TvChain,
    MovieChain,
    LastResort,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoDetect => write!(f, "auto-detect"),
            Self::TvChain => write!(f, "tv-chain"),
            Self::MovieChain => write!(f, "movie-chain"),
            Self::LastResort => write!(f, "last-resort"),
        }
    }
}

/// One way of invoking the rename engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub stage: Stage,
    /// `None` lets the engine choose.
    pub source: Option<MetadataSource>,
    /// Pass the engine's lenient-matching flag.
    pub non_strict: bool,
}

impl Strategy {
    const fn with_source(stage: Stage, source: MetadataSource) -> Self {
        Self {
            stage,
            source: Some(source),
            non_strict: true,
        }
    }

    /// The engine's own detection, lenient matching.
    pub const AUTO_DETECT: Strategy = Strategy {
        stage: Stage::AutoDetect,
        source: None,
        non_strict: true,
    };

    /// No source, no lenient matching: whatever the engine has cached.
    pub const LAST_RESORT: Strategy = Strategy {
        stage: Stage::LastResort,
        source: None,
        non_strict: false,
    };

    /// Engine request for this strategy against `source_path`.
    pub fn request(&self, source_path: &Path, action: ActionMode) -> EngineRequest {
        EngineRequest {
            source: source_path.to_path_buf(),
            metadata_source: self.source,
            action,
            non_strict: self.non_strict,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(source) => write!(f, "{} [{}]", self.stage, source),
            None => write!(f, "{}", self.stage),
        }
    }
}

/// TV sources in the order they are tried.
pub const TV_CHAIN: &[Strategy] = &[
    Strategy::with_source(Stage::TvChain, MetadataSource::TheTvDb),
    Strategy::with_source(Stage::TvChain, MetadataSource::TheMovieDbTv),
    Strategy::with_source(Stage::TvChain, MetadataSource::AniDb),
];

/// Movie sources in the order they are tried.
pub const MOVIE_CHAIN: &[Strategy] = &[
    Strategy::with_source(Stage::MovieChain, MetadataSource::TheMovieDb),
    Strategy::with_source(Stage::MovieChain, MetadataSource::Omdb),
];

/// Source chains to walk after auto-detection, given a classification.
///
/// The detected category's chain comes first and the other follows as a
/// cross-fallback. Unknown walks TV before movies.
pub fn chains_for(category: MediaCategory) -> Vec<Strategy> {
    let (first, second) = match category {
        MediaCategory::Movie => (MOVIE_CHAIN, TV_CHAIN),
        MediaCategory::Tv | MediaCategory::Unknown => (TV_CHAIN, MOVIE_CHAIN),
    };
    first.iter().chain(second.iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(chain: &[Strategy]) -> Vec<MetadataSource> {
        chain.iter().filter_map(|s| s.source).collect()
    }

    #[test]
    fn test_tv_first_for_tv_and_unknown() {
        let expected = vec![
            MetadataSource::TheTvDb,
            MetadataSource::TheMovieDbTv,
            MetadataSource::AniDb,
            MetadataSource::TheMovieDb,
            MetadataSource::Omdb,
        ];
        assert_eq!(sources(&chains_for(MediaCategory::Tv)), expected);
        assert_eq!(sources(&chains_for(MediaCategory::Unknown)), expected);
    }

    #[test]
    fn test_movie_first_for_movie() {
        assert_eq!(
            sources(&chains_for(MediaCategory::Movie)),
            vec![
                MetadataSource::TheMovieDb,
                MetadataSource::Omdb,
                MetadataSource::TheTvDb,
                MetadataSource::TheMovieDbTv,
                MetadataSource::AniDb,
            ]
        );
    }

    #[test]
    fn test_last_resort_request_is_strict_without_source() {
        let request = Strategy::LAST_RESORT.request(Path::new("/dl/x"), ActionMode::Commit);
        assert_eq!(request.metadata_source, None);
        assert!(!request.non_strict);

        let request = TV_CHAIN[0].request(Path::new("/dl/x"), ActionMode::Simulate);
        assert_eq!(request.metadata_source, Some(MetadataSource::TheTvDb));
        assert!(request.non_strict);
        assert_eq!(request.action, ActionMode::Simulate);
    }

    #[test]
    fn test_display() {
        assert_eq!(TV_CHAIN[1].to_string(), "tv-chain [TheMovieDB::TV]");
        assert_eq!(Strategy::LAST_RESORT.to_string(), "last-resort");
    }
}
