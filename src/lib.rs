//! tmdb_probe - Live integration checks against The Movie Database API
//!
//! This library fetches show and episode credit metadata from TMDB, decodes
//! it into typed values and runs assertion scenarios over the results
//! (season listings, episode counts, cast and guest star membership).

mod api_client;
mod config;
pub mod metadata;
pub mod scenarios;

pub use api_client::{ApiClient, credits_path};
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, parse_timeout_secs};
pub use metadata::{CastMember, Episode, Season, SeasonSet, Show};
pub use scenarios::{Scenario, ScenarioOutcome};

// Re-export error types
pub use api_client::{ApiRequestError, FetchError};
pub use config::ConfigError;
pub use metadata::DeserializationError;
pub use scenarios::{AssertionFailure, ScenarioError};

use thiserror::Error;
use tracing::info;

/// Progress event emitted while running scenarios
///
/// These events allow library users to report progress as scenarios
/// start and finish.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A run of `total` scenarios started
    Started { total: usize },

    /// A scenario is about to run
    ScenarioStarted {
        index: usize,
        total: usize,
        name: &'static str,
    },

    /// A scenario finished
    ScenarioFinished {
        index: usize,
        total: usize,
        outcome: ScenarioOutcome,
    },

    /// All scenarios finished
    Complete { passed: usize, failed: usize },
}

/// Top-level error type for tmdb_probe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Error while assembling the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while talking to the API
    #[error("API request error: {0}")]
    Request(#[from] ApiRequestError),

    /// No scenario exists with the given name
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

/// Resolves scenario names, or returns every scenario when `names` is empty.
pub fn select_scenarios(names: &[String]) -> Result<Vec<&'static Scenario>, ProbeError> {
    if names.is_empty() {
        return Ok(scenarios::all().iter().collect());
    }

    names
        .iter()
        .map(|name| scenarios::find(name).ok_or_else(|| ProbeError::UnknownScenario(name.clone())))
        .collect()
}

/// Runs the given scenarios one after another against a fresh client
///
/// Each scenario performs its own requests; a failing scenario does not stop
/// the run. Progress events are emitted through the provided callback.
///
/// # Arguments
///
/// * `config` - Connection settings for the API
/// * `selected` - The scenarios to run, in order
/// * `progress_callback` - Closure called with progress events
///
/// # Returns
///
/// One outcome per scenario, in run order
///
/// # Examples
///
/// ```no_run
/// use tmdb_probe::{ApiConfig, ProgressEvent, run_scenarios, select_scenarios};
///
/// let config = ApiConfig::from_env().unwrap();
/// let selected = select_scenarios(&[]).unwrap();
/// let outcomes = run_scenarios(config, &selected, |event| {
///     if let ProgressEvent::ScenarioFinished { outcome, .. } = event {
///         println!("{}: {}", outcome.name, if outcome.passed { "ok" } else { "FAILED" });
///     }
/// })
/// .unwrap();
/// assert!(outcomes.iter().all(|o| o.passed));
/// ```
pub fn run_scenarios<F>(
    config: ApiConfig,
    selected: &[&'static Scenario],
    mut progress_callback: F,
) -> Result<Vec<ScenarioOutcome>, ProbeError>
where
    F: FnMut(ProgressEvent),
{
    let client = ApiClient::new(config)?;
    info!(
        base_url = %client.config().base_url,
        timeout = ?client.config().timeout,
        "starting scenario run"
    );

    let total = selected.len();
    progress_callback(ProgressEvent::Started { total });

    let mut outcomes = Vec::with_capacity(total);

    for (index, scenario) in selected.iter().enumerate() {
        progress_callback(ProgressEvent::ScenarioStarted {
            index,
            total,
            name: scenario.name,
        });

        let outcome = scenario.run(&client);

        progress_callback(ProgressEvent::ScenarioFinished {
            index,
            total,
            outcome: outcome.clone(),
        });

        outcomes.push(outcome);
    }

    let passed = outcomes.iter().filter(|o| o.passed).count();
    progress_callback(ProgressEvent::Complete {
        passed,
        failed: total - passed,
    });

    Ok(outcomes)
}
