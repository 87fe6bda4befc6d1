//! Core type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category a batch is classified into, and the library it is rescanned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    /// TV episodes, organized into the show library.
    Tv,
    /// Movies, organized into the movie library.
    Movie,
    /// No filename pattern matched.
    Unknown,
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tv => write!(f, "tv"),
            Self::Movie => write!(f, "movie"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for MediaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tv" | "show" | "shows" | "series" => Ok(Self::Tv),
            "movie" | "movies" | "film" => Ok(Self::Movie),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown media category: {}", s)),
        }
    }
}
