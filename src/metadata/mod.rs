/// Data structures for TMDB show and episode credit metadata.
///
/// This module provides the typed value objects decoded from TMDB responses
/// (shows, seasons, episode credits and the people credited on them) and
/// the decoding entry points used by the client and the scenarios.
mod season;
mod tmdb_types;

pub use season::{Season, SeasonSet};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tmdb_types::{TmdbCredits, TmdbShow};

/// A response body did not match the expected schema.
#[derive(Debug, Error)]
#[error("Failed to decode API response at '{path}': {message}")]
pub struct DeserializationError {
    /// JSON path of the offending value (`.` for the document root)
    pub path: String,
    /// The decoder's description of the mismatch
    pub message: String,
}

/// A TV show with its seasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    /// The show's original name
    pub name: String,
    /// All seasons, ordered and de-duplicated
    pub seasons: SeasonSet,
}

/// A person credited on an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMember {
    /// TMDB person id
    pub id: u64,
    /// The person's own name
    pub real_name: String,
    /// The character played (for crew entries: the job)
    pub cast_name: String,
}

/// The credits of a single episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// Regular cast members
    pub cast: Vec<CastMember>,
    /// Crew members
    pub crew: Vec<CastMember>,
    /// Guest stars of this episode; may overlap with `cast`
    pub guest_stars: Vec<CastMember>,
}

impl Show {
    /// Decodes the body of a `tv/{id}` response.
    pub fn from_json(body: &str) -> Result<Self, DeserializationError> {
        let show: TmdbShow = decode(body)?;
        Ok(Show {
            name: show.name,
            seasons: show.seasons,
        })
    }
}

impl Episode {
    /// Decodes the body of a `tv/{id}/season/{n}/episode/{m}/credits` response.
    pub fn from_json(body: &str) -> Result<Self, DeserializationError> {
        let credits: TmdbCredits = decode(body)?;
        Ok(Episode {
            cast: credits.cast.into_iter().map(CastMember::from).collect(),
            crew: credits.crew.into_iter().map(CastMember::from).collect(),
            guest_stars: credits.guest_stars.into_iter().map(CastMember::from).collect(),
        })
    }

    /// Whether any credit matches both the real name and the cast name.
    pub fn credits_contain(credits: &[CastMember], real_name: &str, cast_name: &str) -> bool {
        credits
            .iter()
            .any(|member| member.real_name == real_name && member.cast_name == cast_name)
    }

    pub fn in_cast(&self, real_name: &str, cast_name: &str) -> bool {
        Self::credits_contain(&self.cast, real_name, cast_name)
    }

    pub fn in_guest_stars(&self, real_name: &str, cast_name: &str) -> bool {
        Self::credits_contain(&self.guest_stars, real_name, cast_name)
    }
}

/// Decodes JSON, recording the path of the first field that fails.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, DeserializationError> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| DeserializationError {
        path: e.path().to_string(),
        message: e.into_inner().to_string(),
    })
}
