//! Filename-based media type classification.
//!
//! This module decides whether a batch looks like TV episodes or movies,
//! using only base filenames. Parent directory names are ignored so that a
//! folder called e.g. `Season Pass 2019` cannot bias the result.
//!
//! ## Scores
//!
//! - **TV**: filenames with an `S01E02` marker, a `1x02` marker, or the
//!   standalone word "season" or "episode" (so "Seasoning" does not count)
//! - **Movie**: filenames with a standalone year 1900–2099 that is not a
//!   resolution like `2160p` or `1080i`
//!
//! TV wins ties: a release that carries both an episode marker and a year is
//! almost always an episode of a show with a year in its title.

use crate::batch::MediaBatch;
use once_cell::sync::Lazy;
use postdrop_common::{Error, MediaCategory, Result};
use regex::Regex;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

// Letters and digits only; `.` `_` `-` and spaces all separate tokens.
static TV_SXXEYY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])s\d{1,3}\s*e\d{1,4}(?:[^0-9]|$)").expect("valid regex")
});

static TV_NXNN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}x\d{1,3}\b").expect("valid regex"));

static TV_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])(?:season|episode)s?(?:[^a-z]|$)").expect("valid regex")
});

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Result of classifying a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// The category the scores point to.
    pub category: MediaCategory,
    /// Filenames with a TV pattern.
    pub tv_score: usize,
    /// Filenames with a movie year.
    pub movie_score: usize,
}

/// Filename classifier.
pub struct TypeClassifier;

impl TypeClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a set of base filenames.
    pub fn classify_names<I, S>(&self, names: I) -> Classification
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tv_score = 0;
        let mut movie_score = 0;

        for name in names {
            let name = name.as_ref();
            if self.has_tv_marker(name) {
                tv_score += 1;
            }
            if self.has_movie_year(name) {
                movie_score += 1;
            }
        }

        let category = if tv_score > 0 && tv_score >= movie_score {
            MediaCategory::Tv
        } else if movie_score > 0 {
            MediaCategory::Movie
        } else {
            MediaCategory::Unknown
        };

        Classification {
            category,
            tv_score,
            movie_score,
        }
    }

    /// Classify a batch by the base names of its files.
    pub fn classify(&self, batch: &MediaBatch) -> Classification {
        let result = self.classify_names(batch.file_names());
        tracing::info!(
            category = %result.category,
            tv_score = result.tv_score,
            movie_score = result.movie_score,
            files = batch.len(),
            "Classified batch"
        );
        result
    }

    fn has_tv_marker(&self, name: &str) -> bool {
        TV_SXXEYY.is_match(name) || TV_NXNN.is_match(name) || TV_WORDS.is_match(name)
    }

    /// A 4-digit run in 1900–2099, not part of a longer number and not
    /// directly followed by `p` or `i`.
    fn has_movie_year(&self, name: &str) -> bool {
        DIGIT_RUN.find_iter(name).any(|m| {
            let digits = m.as_str();
            if digits.len() != 4 || !(digits.starts_with("19") || digits.starts_with("20")) {
                return false;
            }
            let next = name[m.end()..].chars().next();
            !matches!(next, Some('p' | 'P' | 'i' | 'I'))
        })
    }
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a batch.
///
/// An empty batch classifies as Unknown; use [`classify_batch`] when an empty
/// batch must be reported as a failure.
pub fn classify(batch: &MediaBatch) -> Classification {
    TypeClassifier::new().classify(batch)
}

/// Classify a batch, failing with [`Error::EmptyBatch`] when it has no files.
pub fn classify_batch(batch: &MediaBatch) -> Result<Classification> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch {
            path: batch.source().to_path_buf(),
        });
    }
    Ok(classify(batch))
}

/// Category implied by where the engine put the files.
///
/// The library folder directly under `target_root` decides when it is one
/// the engine's Plex layout uses (`TV Shows`, `Anime`, `Movies`); otherwise
/// the renamed file names are classified like a batch.
pub fn classify_destinations(destinations: &[PathBuf], target_root: &Path) -> MediaCategory {
    let folder_category = destinations.iter().find_map(|dest| {
        let relative = dest.strip_prefix(target_root).ok()?;
        match relative.components().next()? {
            Component::Normal(folder) => {
                match folder.to_str()?.to_lowercase().as_str() {
                    "tv shows" | "tv" | "anime" | "series" => Some(MediaCategory::Tv),
                    "movies" | "films" => Some(MediaCategory::Movie),
                    _ => None,
                }
            }
            _ => None,
        }
    });
    if let Some(category) = folder_category {
        return category;
    }

    let names = destinations
        .iter()
        .filter_map(|d| d.file_name())
        .map(|n| n.to_string_lossy().into_owned());
    TypeClassifier::new().classify_names(names).category
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Classification {
        TypeClassifier::new().classify_names(list)
    }

    #[test]
    fn test_episode_markers_are_tv() {
        for name in [
            "Show.S01E01.mkv",
            "show.s1e2.720p.mkv",
            "Show S01 E03.mkv",
            "Show.1x02.mkv",
            "Show Season 2 Part 1.mkv",
            "Show - Episode 7.mp4",
        ] {
            let result = names(&[name]);
            assert_eq!(result.category, MediaCategory::Tv, "{name}");
            assert_eq!(result.tv_score, 1, "{name}");
            assert_eq!(result.movie_score, 0, "{name}");
        }
    }

    #[test]
    fn test_year_is_movie() {
        for name in [
            "Movie.2019.1080p.BluRay.mkv",
            "Old Movie (1954).avi",
            "Movie_2001_2160p.mkv",
        ] {
            let result = names(&[name]);
            assert_eq!(result.category, MediaCategory::Movie, "{name}");
            assert_eq!(result.movie_score, 1, "{name}");
        }
    }

    #[test]
    fn test_words_containing_season_are_movies() {
        for name in [
            "The.Seasoning.House.2012.1080p.mkv",
            "Seasoned.2019.mkv",
            "Tomorrowseason.1999.mkv",
        ] {
            let result = names(&[name]);
            assert_eq!(result.tv_score, 0, "{name}");
            assert_eq!(result.category, MediaCategory::Movie, "{name}");
        }
        assert_eq!(names(&["Show_Season_2.mkv"]).category, MediaCategory::Tv);
        assert_eq!(names(&["Show.Season2.mkv"]).category, MediaCategory::Tv);
        assert_eq!(names(&["Show.Episodes.1-3.mkv"]).category, MediaCategory::Tv);
    }

    #[test]
    fn test_episode_marker_must_stand_alone() {
        assert_eq!(names(&["Glass2e1.2019.mkv"]).category, MediaCategory::Movie);
        assert_eq!(names(&["Show_S02E05_720p.mkv"]).category, MediaCategory::Tv);
    }

    #[test]
    fn test_resolution_is_not_a_year() {
        assert_eq!(names(&["Clip.2160p.mkv"]).category, MediaCategory::Unknown);
        assert_eq!(names(&["Clip.1999i.mkv"]).category, MediaCategory::Unknown);
        assert_eq!(names(&["Clip.2020P.mkv"]).category, MediaCategory::Unknown);
    }

    #[test]
    fn test_out_of_range_and_long_numbers_are_not_years() {
        assert_eq!(names(&["Clip.1899.mkv"]).category, MediaCategory::Unknown);
        assert_eq!(names(&["Clip.2100.mkv"]).category, MediaCategory::Unknown);
        assert_eq!(names(&["VID_20190412.mp4"]).category, MediaCategory::Unknown);
    }

    #[test]
    fn test_resolution_dimensions_are_not_episodes() {
        assert_eq!(names(&["Clip.1280x720.mkv"]).tv_score, 0);
        assert_eq!(names(&["Clip.1920x1080.mkv"]).tv_score, 0);
    }

    #[test]
    fn test_both_markers_tie_goes_to_tv() {
        let result = names(&["Show.2019.S01E01.mkv"]);
        assert_eq!(result.tv_score, 1);
        assert_eq!(result.movie_score, 1);
        assert_eq!(result.category, MediaCategory::Tv);
    }

    #[test]
    fn test_majority_movie() {
        let result = names(&["Movie.2019.mkv", "Other.2020.mkv", "Extras Episode.mkv"]);
        assert_eq!(result.tv_score, 1);
        assert_eq!(result.movie_score, 2);
        assert_eq!(result.category, MediaCategory::Movie);
    }

    #[test]
    fn test_no_pattern_is_unknown() {
        let result = names(&["video.mkv", "random_name.mp4"]);
        assert_eq!(
            result,
            Classification {
                category: MediaCategory::Unknown,
                tv_score: 0,
                movie_score: 0
            }
        );
    }

    #[test]
    fn test_directory_names_are_ignored() {
        let batch = MediaBatch::from_files(
            "/downloads/The.Show.S01E01",
            vec![PathBuf::from("/downloads/The.Show.S01E01/video.mkv")],
        );
        assert_eq!(classify(&batch).category, MediaCategory::Unknown);

        let batch = MediaBatch::from_files(
            "/downloads/Season 1",
            vec![PathBuf::from("/downloads/Season 1/Movie.2019.mkv")],
        );
        assert_eq!(classify(&batch).category, MediaCategory::Movie);
    }

    #[test]
    fn test_destination_library_folder() {
        let root = Path::new("/media");
        let tv = [PathBuf::from("/media/TV Shows/Show/Season 01/Show - S01E01.mkv")];
        assert_eq!(classify_destinations(&tv, root), MediaCategory::Tv);

        let movie = [PathBuf::from("/media/Movies/Film (2019)/Film (2019).mkv")];
        assert_eq!(classify_destinations(&movie, root), MediaCategory::Movie);

        let anime = [PathBuf::from("/media/Anime/Show/Show - 01.mkv")];
        assert_eq!(classify_destinations(&anime, root), MediaCategory::Tv);
    }

    #[test]
    fn test_destination_names_when_folder_unknown() {
        let root = Path::new("/media");
        let custom = [PathBuf::from("/media/Library/Show/Show - S02E03 - Title.mkv")];
        assert_eq!(classify_destinations(&custom, root), MediaCategory::Tv);

        let outside = [PathBuf::from("/elsewhere/Film (1999).mkv")];
        assert_eq!(classify_destinations(&outside, root), MediaCategory::Movie);

        assert_eq!(classify_destinations(&[], root), MediaCategory::Unknown);
    }

    #[test]
    fn test_empty_batch() {
        let batch = MediaBatch::from_files("/downloads/empty", Vec::new());
        assert_eq!(classify(&batch).category, MediaCategory::Unknown);
        assert!(matches!(
            classify_batch(&batch),
            Err(Error::EmptyBatch { .. })
        ));
    }
}
