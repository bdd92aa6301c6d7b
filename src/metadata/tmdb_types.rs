//! TMDB API response types for deserialization.
//!
//! These structures mirror the JSON fields used from the TMDB v3 responses.
//! The `rename` attributes are the only place external names are mapped to
//! internal ones; every listed field is required.

use super::{CastMember, Season};
use serde::Deserialize;

/// Response of `GET /tv/{id}`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbShow {
    #[serde(rename = "original_name")]
    pub name: String,
    pub seasons: super::SeasonSet,
}

/// One entry of the `seasons` array of a show.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbSeason {
    #[serde(rename = "season_number")]
    pub id: u32,
    #[serde(rename = "episode_count")]
    pub episode_count: u32,
}

/// Response of `GET /tv/{id}/season/{n}/episode/{m}/credits`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbCredits {
    pub cast: Vec<TmdbCastCredit>,
    pub crew: Vec<TmdbCrewCredit>,
    #[serde(rename = "guest_stars")]
    pub guest_stars: Vec<TmdbCastCredit>,
}

/// A cast or guest star credit.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbCastCredit {
    pub id: u64,
    #[serde(rename = "name")]
    pub real_name: String,
    #[serde(rename = "character")]
    pub cast_name: String,
}

/// A crew credit; crew entries carry a `job` instead of a `character`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbCrewCredit {
    pub id: u64,
    #[serde(rename = "name")]
    pub real_name: String,
    #[serde(rename = "job")]
    pub cast_name: String,
}

impl From<TmdbSeason> for Season {
    fn from(season: TmdbSeason) -> Self {
        Season::new(season.id, season.episode_count)
    }
}

impl From<TmdbCastCredit> for CastMember {
    fn from(credit: TmdbCastCredit) -> Self {
        CastMember {
            id: credit.id,
            real_name: credit.real_name,
            cast_name: credit.cast_name,
        }
    }
}

impl From<TmdbCrewCredit> for CastMember {
    fn from(credit: TmdbCrewCredit) -> Self {
        CastMember {
            id: credit.id,
            real_name: credit.real_name,
            cast_name: credit.cast_name,
        }
    }
}
