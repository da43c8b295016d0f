use adres_geo::address::candidates_for;
use adres_geo::batch::{BatchEvent, BatchResolver};
use adres_geo::config::{AppConfig, QueryStrategy};
use adres_geo::geocode::{GeocodeResult, Geocoder, NominatimClient};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

/// adres: geocode Russian postal addresses through Nominatim.
///
/// Addresses are resolved one at a time with a pause between requests,
/// so large batches take roughly one second per address.
///
/// Examples:
///   adres parse "Алтайский край, Мамонтово, ул. Советская, 10"
///   adres geocode "г. Барнаул, ул. Мира, 15" "г. Новосибирск, ул. Ленина, 1"
///   adres geocode --file addresses.txt --strategy candidates
///   adres geocode --file batch.json > results.json
///   adres serve --port 8087
#[derive(Parser)]
#[command(name = "adres", version, about, long_about = None)]
struct Cli {
    /// Config file. Defaults to ~/.config/adres/config.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decompose an address and print its query candidates.
    Parse {
        address: String,
    },

    /// Geocode a batch. Reads stdin when no addresses or file are given.
    Geocode {
        addresses: Vec<String>,

        /// One address per line, or a `{"addresses": [...]}` payload if the
        /// file ends in `.json`.
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,

        /// "direct" (raw address only) or "candidates" (walk generated
        /// candidates when the raw address is not found).
        #[arg(long, value_parser = parse_strategy)]
        strategy: Option<QueryStrategy>,

        /// Pause between requests in milliseconds.
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Serve the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

fn parse_strategy(s: &str) -> Result<QueryStrategy, String> {
    match s.to_lowercase().as_str() {
        "direct" | "raw" => Ok(QueryStrategy::Direct),
        "candidates" | "fallback" => Ok(QueryStrategy::Candidates),
        _ => Err(format!("Unknown strategy '{}'. Use 'direct' or 'candidates'.", s)),
    }
}

#[derive(Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    total: usize,
    succeeded: usize,
    results: Vec<GeocodeResult>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    if let Err(e) = adres_geo::init_logging(level) {
        eprintln!("Error: invalid log filter: {}", e);
        std::process::exit(1);
    }

    let loaded = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    match cli.command {
        Command::Parse { address } => {
            let (fragments, candidates) = candidates_for(&address);
            let out = json!({
                "address": address,
                "fragments": fragments,
                "candidates": candidates,
            });
            print_json(&out);
        }
        Command::Geocode { addresses, file, strategy, delay_ms } => {
            if let Some(strategy) = strategy {
                config.batch.strategy = strategy;
            }
            if let Some(delay_ms) = delay_ms {
                config.batch.delay_ms = delay_ms;
            }
            let payload = build_payload(addresses, file.as_deref()).unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });
            run_geocode(&config, payload).await;
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Err(e) = adres_geo::server::start(&config).await {
                error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn run_geocode(config: &AppConfig, payload: Value) {
    let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimClient::new(config.geocoder.clone()));
    let (mut rx, task) = BatchResolver::new(geocoder, &config.batch).spawn(payload);

    let mut terminal = None;
    while let Some(event) = rx.recv().await {
        match event {
            BatchEvent::Progress { processed, total } => info!("[{}/{}] processed", processed, total),
            other => terminal = Some(other),
        }
    }

    match task.await {
        Ok(state) => info!("batch {}", state),
        Err(e) => error!("batch task failed: {}", e),
    }

    match terminal {
        Some(BatchEvent::Results { results }) => {
            let succeeded = results.iter().filter(|r| r.success).count();
            print_json(&Report {
                generated_at: Utc::now(),
                total: results.len(),
                succeeded,
                results,
            });
        }
        Some(BatchEvent::Error { message }) => {
            error!("{}", message);
            std::process::exit(1);
        }
        _ => {
            error!("batch ended without a result");
            std::process::exit(1);
        }
    }
}

/// Assemble the batch payload from positional args, a file, or stdin.
fn build_payload(addresses: Vec<String>, file: Option<&Path>) -> Result<Value, String> {
    let Some(path) = file else {
        if !addresses.is_empty() {
            return Ok(json!({ "addresses": addresses }));
        }
        let lines = io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Cannot read stdin: {}", e))?;
        return Ok(json!({ "addresses": non_blank(lines) }));
    };

    let data = std::fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        if !addresses.is_empty() {
            return Err("Positional addresses cannot be combined with a JSON payload file".into());
        }
        return serde_json::from_str(&data).map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e));
    }

    let mut all = non_blank(data.lines().map(str::to_string).collect());
    all.extend(addresses);
    Ok(json!({ "addresses": all }))
}

fn non_blank(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            error!("Cannot serialize output: {}", e);
            std::process::exit(1);
        }
    }
}
