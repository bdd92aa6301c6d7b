use clap::Parser;
use std::process;
use std::time::Duration;
use tmdb_probe::{
    ApiConfig, DEFAULT_BASE_URL, ProgressEvent, parse_timeout_secs, run_scenarios,
    scenarios, select_scenarios,
};
use tracing_subscriber::EnvFilter;

/// Run live metadata checks against The Movie Database API
#[derive(Parser, Debug)]
#[command(name = "tmdb_probe", version, about)]
struct Args {
    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the API
    #[arg(long, env = "TMDB_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds (defaults to the client's timeout)
    #[arg(long, env = "TMDB_TIMEOUT_SECS", value_parser = parse_timeout)]
    timeout_secs: Option<Duration>,

    /// Only run the named scenario (can be given multiple times)
    #[arg(short, long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// List available scenarios and exit
    #[arg(long)]
    list: bool,
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    parse_timeout_secs(raw).map_err(|e| e.to_string())
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::Started { total } => {
            println!("Running {} scenario(s)...\n", total);
        }
        ProgressEvent::ScenarioStarted { index, total, name } => {
            println!("[{}/{}] {}", index + 1, total, name);
        }
        ProgressEvent::ScenarioFinished { outcome, .. } => {
            if outcome.passed {
                println!("  ok");
            } else {
                println!("  FAILED");
                if let Some(message) = outcome.message {
                    for line in message.lines() {
                        println!("    {}", line);
                    }
                }
            }
        }
        ProgressEvent::Complete { passed, failed } => {
            println!("\n{} passed, {} failed", passed, failed);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    if args.list {
        for scenario in scenarios::all() {
            println!("{:<32} {}", scenario.name, scenario.description);
        }
        return;
    }

    let config = match ApiConfig::new(args.api_key.unwrap_or_default()) {
        Ok(config) => {
            let config = config.with_base_url(args.base_url);
            match args.timeout_secs {
                Some(timeout) => config.with_timeout(timeout),
                None => config,
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let selected = match select_scenarios(&args.scenarios) {
        Ok(selected) => selected,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --list to see available scenarios.");
            process::exit(2);
        }
    };

    match run_scenarios(config, &selected, handle_progress_event) {
        Ok(outcomes) => {
            if outcomes.iter().any(|outcome| !outcome.passed) {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("\nError during scenario run: {}", e);
            process::exit(2);
        }
    }
}
