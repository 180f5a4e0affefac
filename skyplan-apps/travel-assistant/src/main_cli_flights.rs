//!  Skyplan Travel Assistant
//!
//!  Copyright (C) 2026  Skyplan contributors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! CLI for one-way flight search.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use skyplan_travel_assistant::{
    CredentialStore, FLIGHT_SEARCH_KEY, FlightOption, FlightSearchClient, FlightSearchParams,
    FlightSearchResult, SearchSession, resolve_search_id,
};
use std::cmp::max;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "skyplan-flights")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Origin: IATA code (SFO) or free-text place ("San Francisco")
    #[arg(short, long, required_unless_present = "set_api_key")]
    from: Option<String>,

    /// Destination: IATA code (JFK) or free-text place ("New York")
    #[arg(short, long, required_unless_present = "set_api_key")]
    to: Option<String>,

    /// Departure date (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(short, long, required_unless_present = "set_api_key")]
    date: Option<String>,

    /// Route the request through a CORS relay (base URL ending in `?url=`)
    #[arg(long)]
    proxy: Option<String>,

    /// Credential store path (defaults to ~/.config/skyplan/credentials.json)
    #[arg(long)]
    credentials: Option<String>,

    /// Store the given flight-search API key and exit
    #[arg(long)]
    set_api_key: Option<String>,

    /// Save the raw JSON response to a file for debugging
    #[arg(long)]
    save_json: bool,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

/// Parse date string to NaiveDate
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .context(format!(
            "Invalid date format: {}. Use YYYY-MM-DD or YYYY/MM/DD",
            s
        ))
}

/// Format duration in hours/minutes.
fn fmt_duration(minutes: i64) -> String {
    let hrs = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{}h", hrs)
    } else if hrs == 0 {
        format!("{}m", mins)
    } else {
        format!("{}h {:02}m", hrs, mins)
    }
}

/// Show only the clock part of an upstream timestamp.
fn fmt_time(raw: &str) -> String {
    if raw.is_empty() {
        return "??:??".to_string();
    }
    raw.split_whitespace().nth(1).unwrap_or(raw).to_string()
}

fn fmt_times(option: &FlightOption) -> String {
    let dep = option
        .flights
        .first()
        .map(|leg| fmt_time(&leg.departure_airport.time))
        .unwrap_or_else(|| "??:??".to_string());
    let arr = option
        .flights
        .last()
        .map(|leg| fmt_time(&leg.arrival_airport.time))
        .unwrap_or_else(|| "??:??".to_string());
    format!("{} → {}", dep, arr)
}

fn fmt_airline(option: &FlightOption) -> String {
    let airline = option
        .flights
        .first()
        .map(|leg| leg.airline.as_str())
        .unwrap_or("");
    if airline.is_empty() {
        "??".to_string()
    } else {
        airline.to_string()
    }
}

/// Format stops and layovers combined: "2 stops: 1h05@DEN, 2h20@ORD"
fn fmt_stops_and_layovers(option: &FlightOption) -> String {
    if option.layovers.is_empty() {
        // Layover detail can be absent even for multi-leg itineraries.
        return match option.flights.len() {
            0 | 1 => "direct".to_string(),
            n => format!("{} stops", n - 1),
        };
    }
    let parts: Vec<String> = option
        .layovers
        .iter()
        .map(|l| {
            let name = if l.id.is_empty() { l.name.as_str() } else { l.id.as_str() };
            let name = if name.is_empty() { "Unknown" } else { name };
            format!("{}@{}", fmt_duration(l.duration), name)
        })
        .collect();
    format!("{} stop(s): {}", option.layovers.len(), parts.join(", "))
}

/// Emissions delta marker, empty when the service provided no estimate.
fn fmt_emissions(option: &FlightOption) -> String {
    let emissions = &option.carbon_emissions;
    if emissions.this_flight == 0 && emissions.typical_for_this_route == 0 {
        return String::new();
    }
    format!(" ({:+}% CO2)", emissions.difference_percent)
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

/// Calculate terminal-aware column widths
fn calc_column_widths(options: &[FlightOption]) -> (usize, usize, usize, usize, usize) {
    let mut max_airline = 7;
    let mut max_times = 15;
    let mut max_duration = 10;
    let mut max_stops = 25;

    for option in options {
        max_airline = max(max_airline, fmt_airline(option).len());
        max_times = max(max_times, fmt_times(option).len());
        max_duration = max(max_duration, fmt_duration(option.total_duration).len());
        max_stops = max(max_stops, fmt_stops_and_layovers(option).len());
    }

    let terminal_width = get_terminal_width();
    let available_width = terminal_width.saturating_sub(25);
    let total_content = max_airline + max_times + max_duration + max_stops;

    if total_content > available_width && available_width > 50 {
        let ratio = available_width as f64 / total_content as f64;
        max_airline = max((max_airline as f64 * ratio).floor() as usize, 4);
        max_times = max((max_times as f64 * ratio).floor() as usize, 10);
        max_duration = max((max_duration as f64 * ratio).floor() as usize, 5);
        max_stops = max((max_stops as f64 * ratio).floor() as usize, 10);
    }

    let rank_width = 5;
    (rank_width, max_airline, max_times, max_duration, max_stops)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

/// Render results to stdout
fn render_results(result: &FlightSearchResult) {
    let params = &result.search_params;

    println!(
        "================================================================================================"
    );
    println!(
        "  🛫  {} → {} on {}",
        params.departure_id, params.arrival_id, params.outbound_date
    );
    println!(
        "================================================================================================\n"
    );

    let best_price = result
        .options
        .iter()
        .map(|o| o.price)
        .filter(|p| *p > 0.0)
        .fold(f64::INFINITY, f64::min);
    if best_price.is_finite() {
        println!("💰 Best Price:  ${:.0}", best_price);
    }
    println!("📊 Total Flights: {}", result.options.len());

    let (rw, aw, tw, dw, sw) = calc_column_widths(&result.options);

    println!("\n🏆 Top {} Results:", 5.min(result.options.len()));
    println!("{}\n", dash_bar());

    let h1 = format!("  {:>w$}", "#", w = rw);
    let h2 = format!("{:<w$}", "AIRLINE", w = aw);
    let h3 = format!("{:<w$}", "DEP → ARR", w = tw);
    let h4 = format!("{:<w$}", "DURATION", w = dw);
    let h5 = format!("{:<w$}", "LAYOVERS", w = sw);
    println!("{}  {}  {}  {}  {}   PRICE", h1, h2, h3, h4, h5);
    println!("{}\n", dash_bar());

    for (i, option) in result.options.iter().take(5).enumerate() {
        let c1 = format!("  {:>w$}", i + 1, w = rw);
        let c2 = format!("{:<w$}", fmt_airline(option), w = aw);
        let c3 = format!("{:<w$}", fmt_times(option), w = tw);
        let c4 = format!("{:<w$}", fmt_duration(option.total_duration), w = dw);
        let c5 = format!("{:<w$}", fmt_stops_and_layovers(option), w = sw);
        println!(
            "{}  {}  {}  {}  {}   ${:.0}{}",
            c1,
            c2,
            c3,
            c4,
            c5,
            option.price,
            fmt_emissions(option)
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::info!("Starting skyplan-flights CLI");
    tracing::debug!("Args: {:?}", args);

    let store = match &args.credentials {
        Some(path) => CredentialStore::new(path),
        None => CredentialStore::new(CredentialStore::default_path()),
    };

    if let Some(key) = &args.set_api_key {
        store.set(FLIGHT_SEARCH_KEY, key)?;
        println!("Stored flight-search API key at {}", store.path().display());
        return Ok(());
    }

    // required_unless_present guarantees these once --set-api-key is ruled out
    let from = args.from.context("--from is required")?;
    let to = args.to.context("--to is required")?;
    let date = args.date.context("--date is required")?;

    let depart_date = parse_date(&date)?;
    let departure_id = resolve_search_id(&from);
    let arrival_id = resolve_search_id(&to);
    tracing::info!(
        "Resolved request: {} -> {} on {}",
        departure_id,
        arrival_id,
        depart_date
    );

    let params = FlightSearchParams::builder(departure_id, arrival_id, depart_date)
        .build()
        .context("Failed to build search parameters")?;

    // Credential read fresh at the boundary, threaded explicitly from here.
    let credential = store.require(FLIGHT_SEARCH_KEY)?;

    let mut client = FlightSearchClient::new(30)?;
    if let Some(proxy) = args.proxy {
        client = client.with_cors_proxy(proxy);
    }
    let session = SearchSession::new(client);

    let Some(result) = session.search(&params, &credential).await? else {
        // Single-shot CLI issues one search; a discarded response here
        // would mean the gate misbehaved.
        anyhow::bail!("Search response was discarded as stale");
    };

    if args.save_json {
        let filename = format!(
            "debug_{}_{}.json",
            params.departure_id, params.arrival_id
        );
        std::fs::write(&filename, &result.raw_response).context("Failed to write JSON file")?;
        tracing::info!("Saved raw response to {}", filename);
    }

    tracing::info!("Search completed: {} options found", result.len());
    render_results(&result);

    Ok(())
}
