//! Live assertion scenarios against the metadata API
//!
//! Every scenario performs its own requests, decodes the response and checks
//! it against literal expectations. The checks themselves are plain functions
//! over decoded values so they can be exercised without the network.

use crate::api_client::{ApiClient, ApiRequestError, FetchError};
use crate::metadata::{DeserializationError, Episode, Season, SeasonSet};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// TMDB id of "Breaking Bad"
pub const BREAKING_BAD_ID: u64 = 1396;
/// TMDB id of "Game of Thrones"
pub const GAME_OF_THRONES_ID: u64 = 1399;

/// Real name of the credited person checked by the actor scenarios
pub const ACTOR_REAL_NAME: &str = "Nell Tiger Free";
/// Character name of the credited person checked by the actor scenarios
pub const ACTOR_CAST_NAME: &str = "Myrcella Baratheon";

/// Expected seasons of Breaking Bad for the ordered-set scenario.
pub const EXPECTED_SEASON_SET: &[(u32, u32)] = &[(5, 16), (4, 13), (1, 8), (3, 13), (2, 13)];

/// Expected per-season episode counts of Breaking Bad.
///
/// Season 1 disagrees with [`EXPECTED_SEASON_SET`] (7 vs 8). Both fixtures
/// are kept as recorded until confirmed against live data.
pub const EXPECTED_EPISODE_COUNTS: &[(u32, u32)] = &[(5, 16), (4, 13), (3, 13), (2, 13), (1, 7)];

/// A domain predicate did not hold.
///
/// Carries one line per mismatch found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .diagnostics.join("\n"))]
pub struct AssertionFailure {
    pub diagnostics: Vec<String>,
}

impl AssertionFailure {
    /// Fails with a single diagnostic line
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostics: vec![diagnostic.into()],
        }
    }

    /// Turns accumulated diagnostics into a result; no lines means success.
    pub fn from_diagnostics(diagnostics: Vec<String>) -> Result<(), AssertionFailure> {
        if diagnostics.is_empty() {
            Ok(())
        } else {
            Err(Self { diagnostics })
        }
    }
}

/// Why a scenario failed
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The request could not be completed
    #[error("Request error: {0}")]
    Request(#[from] ApiRequestError),

    /// The response did not match the schema
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] DeserializationError),

    /// The decoded data did not meet expectations
    #[error("Assertion failed:\n{0}")]
    Assertion(#[from] AssertionFailure),
}

impl From<FetchError> for ScenarioError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Request(e) => ScenarioError::Request(e),
            FetchError::Deserialization(e) => ScenarioError::Deserialization(e),
        }
    }
}

/// Result of running one scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: &'static str,
    /// Whether every check held
    pub passed: bool,
    /// Diagnostic text for a failed scenario
    pub message: Option<String>,
}

/// An independently runnable check against the live API.
pub struct Scenario {
    /// Unique name used for selection
    pub name: &'static str,
    /// One-line summary
    pub description: &'static str,
    check: fn(&ApiClient) -> Result<(), ScenarioError>,
}

impl Scenario {
    /// Runs the scenario, converting any error into a failed outcome.
    pub fn run(&self, client: &ApiClient) -> ScenarioOutcome {
        info!(scenario = self.name, "running scenario");

        match (self.check)(client) {
            Ok(()) => {
                info!(scenario = self.name, "passed");
                ScenarioOutcome {
                    name: self.name,
                    passed: true,
                    message: None,
                }
            }
            Err(e) => {
                warn!(scenario = self.name, error = %e, "failed");
                ScenarioOutcome {
                    name: self.name,
                    passed: false,
                    message: Some(e.to_string()),
                }
            }
        }
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

static SCENARIOS: [Scenario; 5] = [
    Scenario {
        name: "seasons_ordered_set",
        description: "Breaking Bad seasons match the expected ordered set",
        check: seasons_ordered_set,
    },
    Scenario {
        name: "seasons_episode_counts",
        description: "Breaking Bad seasons have the expected episode counts",
        check: seasons_episode_counts,
    },
    Scenario {
        name: "actor_absent_from_episode",
        description: "Myrcella is not credited in Game of Thrones S06E01",
        check: actor_absent_from_episode,
    },
    Scenario {
        name: "actor_is_main_cast",
        description: "Myrcella is main cast but not a guest in S05E01",
        check: actor_is_main_cast,
    },
    Scenario {
        name: "actor_is_main_cast_and_guest",
        description: "Myrcella is both main cast and guest in S05E02",
        check: actor_is_main_cast_and_guest,
    },
];

/// All scenarios, in their default run order
pub fn all() -> &'static [Scenario] {
    &SCENARIOS
}

/// Looks up a scenario by name
pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}

fn seasons_ordered_set(client: &ApiClient) -> Result<(), ScenarioError> {
    let show = client.fetch_show(BREAKING_BAD_ID)?;
    let expected = season_set(EXPECTED_SEASON_SET);
    check_season_set(&expected, &show.seasons)?;
    Ok(())
}

fn seasons_episode_counts(client: &ApiClient) -> Result<(), ScenarioError> {
    let show = client.fetch_show(BREAKING_BAD_ID)?;
    check_episode_counts(EXPECTED_EPISODE_COUNTS, &show.seasons)?;
    Ok(())
}

fn actor_absent_from_episode(client: &ApiClient) -> Result<(), ScenarioError> {
    let episode = client.fetch_episode_credits(GAME_OF_THRONES_ID, 6, 1)?;
    check_credit_placement(&episode, ACTOR_REAL_NAME, ACTOR_CAST_NAME, CreditPlacement::ABSENT)?;
    Ok(())
}

fn actor_is_main_cast(client: &ApiClient) -> Result<(), ScenarioError> {
    let episode = client.fetch_episode_credits(GAME_OF_THRONES_ID, 5, 1)?;
    check_credit_placement(&episode, ACTOR_REAL_NAME, ACTOR_CAST_NAME, CreditPlacement::CAST_ONLY)?;
    Ok(())
}

fn actor_is_main_cast_and_guest(client: &ApiClient) -> Result<(), ScenarioError> {
    let episode = client.fetch_episode_credits(GAME_OF_THRONES_ID, 5, 2)?;
    check_credit_placement(
        &episode,
        ACTOR_REAL_NAME,
        ACTOR_CAST_NAME,
        CreditPlacement::CAST_AND_GUEST,
    )?;
    Ok(())
}

/// Builds a season set from `(season number, episode count)` pairs
pub fn season_set(pairs: &[(u32, u32)]) -> SeasonSet {
    pairs
        .iter()
        .map(|&(id, episode_count)| Season::new(id, episode_count))
        .collect()
}

/// Compares two season sets element by element in iteration order.
pub fn check_season_set(expected: &SeasonSet, actual: &SeasonSet) -> Result<(), AssertionFailure> {
    let mut diagnostics = Vec::new();

    if expected.len() != actual.len() {
        diagnostics.push(format!(
            "Season count: Expected: [{}], Actual: [{}]",
            expected.len(),
            actual.len()
        ));
    }

    for (position, (want, got)) in expected.iter().zip(actual.iter()).enumerate() {
        if !want.equals(got) {
            diagnostics.push(format!(
                "Position {}: Expected: [season {}, {} episodes], Actual: [season {}, {} episodes]",
                position, want.id, want.episode_count, got.id, got.episode_count
            ));
        }
    }

    AssertionFailure::from_diagnostics(diagnostics)
}

/// Checks the episode count of every returned season that has an expectation.
///
/// Seasons without an expectation are not checked. All mismatches are
/// collected before failing.
pub fn check_episode_counts(
    expected: &[(u32, u32)],
    actual: &SeasonSet,
) -> Result<(), AssertionFailure> {
    let mut diagnostics = Vec::new();

    for season in actual {
        let Some(&(_, want)) = expected.iter().find(|(id, _)| *id == season.id) else {
            continue;
        };
        if season.episode_count != want {
            diagnostics.push(format!(
                "Season {}: Expected: [{}], Actual: [{}]",
                season.id, want, season.episode_count
            ));
        }
    }

    AssertionFailure::from_diagnostics(diagnostics)
}

/// Where a person is expected to appear in an episode's credits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditPlacement {
    pub in_cast: bool,
    pub in_guest_stars: bool,
}

impl CreditPlacement {
    pub const ABSENT: Self = Self {
        in_cast: false,
        in_guest_stars: false,
    };
    pub const CAST_ONLY: Self = Self {
        in_cast: true,
        in_guest_stars: false,
    };
    pub const CAST_AND_GUEST: Self = Self {
        in_cast: true,
        in_guest_stars: true,
    };

    /// Observed placement of a person in the episode
    pub fn of(episode: &Episode, real_name: &str, cast_name: &str) -> Self {
        Self {
            in_cast: episode.in_cast(real_name, cast_name),
            in_guest_stars: episode.in_guest_stars(real_name, cast_name),
        }
    }
}

/// Checks that a person appears exactly where expected in cast and guest stars.
pub fn check_credit_placement(
    episode: &Episode,
    real_name: &str,
    cast_name: &str,
    expected: CreditPlacement,
) -> Result<(), AssertionFailure> {
    let actual = CreditPlacement::of(episode, real_name, cast_name);
    let mut diagnostics = Vec::new();

    if actual.in_cast != expected.in_cast {
        diagnostics.push(format!(
            "{} as {} in cast: Expected: [{}], Actual: [{}]",
            real_name, cast_name, expected.in_cast, actual.in_cast
        ));
    }
    if actual.in_guest_stars != expected.in_guest_stars {
        diagnostics.push(format!(
            "{} as {} in guest stars: Expected: [{}], Actual: [{}]",
            real_name, cast_name, expected.in_guest_stars, actual.in_guest_stars
        ));
    }

    AssertionFailure::from_diagnostics(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::CastMember;

    fn myrcella() -> CastMember {
        CastMember {
            id: 1403284,
            real_name: ACTOR_REAL_NAME.to_string(),
            cast_name: ACTOR_CAST_NAME.to_string(),
        }
    }

    fn episode(cast: Vec<CastMember>, guest_stars: Vec<CastMember>) -> Episode {
        Episode {
            cast,
            crew: Vec::new(),
            guest_stars,
        }
    }

    #[test]
    fn test_scenario_names_are_unique_and_findable() {
        for scenario in all() {
            let found = find(scenario.name).unwrap();
            assert_eq!(found.name, scenario.name);
        }
        let mut names: Vec<_> = all().iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all().len());
        assert!(find("no_such_scenario").is_none());
    }

    #[test]
    fn test_expected_season_set_is_ordered_descending() {
        let set = season_set(EXPECTED_SEASON_SET);
        let order: Vec<(u32, u32)> = set.iter().map(|s| (s.id, s.episode_count)).collect();
        assert_eq!(order, vec![(5, 16), (4, 13), (3, 13), (2, 13), (1, 8)]);
    }

    #[test]
    fn test_check_season_set_passes_on_match() {
        let actual = season_set(&[(1, 8), (2, 13), (3, 13), (4, 13), (5, 16)]);
        assert!(check_season_set(&season_set(EXPECTED_SEASON_SET), &actual).is_ok());
    }

    #[test]
    fn test_check_season_set_reports_extra_season() {
        let actual = season_set(&[(0, 9), (1, 8), (2, 13), (3, 13), (4, 13), (5, 16)]);
        let failure = check_season_set(&season_set(EXPECTED_SEASON_SET), &actual).unwrap_err();
        assert_eq!(failure.diagnostics[0], "Season count: Expected: [5], Actual: [6]");
    }

    #[test]
    fn test_check_season_set_reports_each_position() {
        let actual = season_set(&[(1, 7), (2, 13), (3, 13), (4, 13), (5, 15)]);
        let failure = check_season_set(&season_set(EXPECTED_SEASON_SET), &actual).unwrap_err();
        assert_eq!(failure.diagnostics.len(), 2);
        assert!(failure.diagnostics[0].starts_with("Position 0:"));
        assert!(failure.diagnostics[1].starts_with("Position 4:"));
    }

    #[test]
    fn test_check_episode_counts_accumulates_all_mismatches() {
        let actual = season_set(&[(1, 8), (2, 13), (3, 12), (4, 13), (5, 16)]);
        let failure = check_episode_counts(EXPECTED_EPISODE_COUNTS, &actual).unwrap_err();
        assert_eq!(
            failure.diagnostics,
            vec![
                "Season 3: Expected: [13], Actual: [12]".to_string(),
                "Season 1: Expected: [7], Actual: [8]".to_string(),
            ]
        );
        assert_eq!(
            failure.to_string(),
            "Season 3: Expected: [13], Actual: [12]\nSeason 1: Expected: [7], Actual: [8]"
        );
    }

    #[test]
    fn test_check_episode_counts_ignores_unexpected_seasons() {
        let actual = season_set(&[(0, 62), (1, 7), (2, 13), (3, 13), (4, 13), (5, 16)]);
        assert!(check_episode_counts(EXPECTED_EPISODE_COUNTS, &actual).is_ok());
    }

    #[test]
    fn test_absent_placement() {
        let other = CastMember {
            id: 1,
            real_name: ACTOR_REAL_NAME.to_string(),
            cast_name: "Someone Else".to_string(),
        };
        let ep = episode(vec![other], Vec::new());
        assert!(
            check_credit_placement(&ep, ACTOR_REAL_NAME, ACTOR_CAST_NAME, CreditPlacement::ABSENT)
                .is_ok()
        );

        let ep = episode(Vec::new(), vec![myrcella()]);
        let failure =
            check_credit_placement(&ep, ACTOR_REAL_NAME, ACTOR_CAST_NAME, CreditPlacement::ABSENT)
                .unwrap_err();
        assert_eq!(failure.diagnostics.len(), 1);
        assert!(failure.diagnostics[0].contains("in guest stars"));
    }

    #[test]
    fn test_cast_only_placement() {
        let ep = episode(vec![myrcella()], Vec::new());
        assert_eq!(
            CreditPlacement::of(&ep, ACTOR_REAL_NAME, ACTOR_CAST_NAME),
            CreditPlacement::CAST_ONLY
        );

        let ep = episode(vec![myrcella()], vec![myrcella()]);
        assert!(
            check_credit_placement(&ep, ACTOR_REAL_NAME, ACTOR_CAST_NAME, CreditPlacement::CAST_ONLY)
                .is_err()
        );
    }

    #[test]
    fn test_cast_and_guest_placement_reports_both_lists() {
        let ep = episode(Vec::new(), Vec::new());
        let failure = check_credit_placement(
            &ep,
            ACTOR_REAL_NAME,
            ACTOR_CAST_NAME,
            CreditPlacement::CAST_AND_GUEST,
        )
        .unwrap_err();
        assert_eq!(failure.diagnostics.len(), 2);
    }

    #[test]
    fn test_scenario_error_messages() {
        let err = ScenarioError::from(AssertionFailure::new("Season 1: Expected: [7], Actual: [8]"));
        assert_eq!(err.to_string(), "Assertion failed:\nSeason 1: Expected: [7], Actual: [8]");
    }

    mod against_mock_server {
        use super::super::*;
        use crate::config::ApiConfig;
        use std::time::Duration;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const BREAKING_BAD_JSON: &str = r#"{
            "original_name": "Breaking Bad",
            "seasons": [
                {"season_number": 1, "episode_count": 8},
                {"season_number": 2, "episode_count": 13},
                {"season_number": 3, "episode_count": 13},
                {"season_number": 4, "episode_count": 13},
                {"season_number": 5, "episode_count": 16}
            ]
        }"#;

        const BREAKING_BAD_WRONG_COUNTS_JSON: &str = r#"{
            "original_name": "Breaking Bad",
            "seasons": [
                {"season_number": 1, "episode_count": 8},
                {"season_number": 2, "episode_count": 12},
                {"season_number": 3, "episode_count": 13},
                {"season_number": 4, "episode_count": 10},
                {"season_number": 5, "episode_count": 16}
            ]
        }"#;

        async fn serve(route: &str, body: &'static str) -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .mount(&server)
                .await;
            server
        }

        async fn run_against(server: &MockServer, name: &'static str) -> ScenarioOutcome {
            let base = server.uri();
            tokio::task::spawn_blocking(move || {
                let config = ApiConfig::new("test-key")
                    .unwrap()
                    .with_base_url(base)
                    .with_timeout(Duration::from_secs(2));
                let client = ApiClient::new(config).unwrap();
                find(name).unwrap().run(&client)
            })
            .await
            .unwrap()
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn test_matching_show_passes() {
            let server = serve("/tv/1396", BREAKING_BAD_JSON).await;
            let outcome = run_against(&server, "seasons_ordered_set").await;
            assert_eq!(
                outcome,
                ScenarioOutcome {
                    name: "seasons_ordered_set",
                    passed: true,
                    message: None,
                }
            );
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn test_wrong_counts_fail_with_every_mismatch() {
            let server = serve("/tv/1396", BREAKING_BAD_WRONG_COUNTS_JSON).await;
            let outcome = run_against(&server, "seasons_episode_counts").await;

            assert!(!outcome.passed);
            assert_eq!(
                outcome.message.as_deref(),
                Some(
                    "Assertion failed:\n\
                     Season 4: Expected: [13], Actual: [10]\n\
                     Season 2: Expected: [13], Actual: [12]\n\
                     Season 1: Expected: [7], Actual: [8]"
                )
            );
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn test_broken_credits_fail_with_deserialization_error() {
            let server = serve(
                "/tv/1399/season/5/episode/2/credits",
                r#"{"cast": [], "crew": [{"id": 1, "name": "A"}], "guest_stars": []}"#,
            )
            .await;
            let outcome = run_against(&server, "actor_is_main_cast_and_guest").await;

            assert!(!outcome.passed);
            let message = outcome.message.unwrap();
            assert!(message.starts_with("Deserialization error:"), "got: {message}");
            assert!(message.contains("'crew[0]'"));
            assert!(message.contains("job"));
        }
    }
}
