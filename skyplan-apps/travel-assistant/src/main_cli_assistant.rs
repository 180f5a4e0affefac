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

//! CLI for the trip-planning assistant.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use skyplan_travel_assistant::{
    ASSISTANT_KEY, AssistantClient, CredentialStore, TripRequest, build_itinerary_prompt,
};

#[derive(Parser, Debug)]
#[command(name = "skyplan-assistant")]
#[command(author, version, about = "AI-assisted trip planning and travel questions")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,

    /// Credential store path (defaults to ~/.config/skyplan/credentials.json)
    #[arg(long, global = true)]
    credentials: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a day-by-day itinerary from trip parameters
    Plan {
        /// Departure city
        #[arg(long)]
        from: String,

        /// Destination city
        #[arg(long)]
        to: String,

        /// Trip start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Trip end date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Total budget in USD
        #[arg(long)]
        budget: u32,

        /// Number of travelers
        #[arg(long, default_value = "1")]
        travelers: u32,
    },

    /// Ask a free-text travel question
    Ask {
        /// The question
        question: String,
    },

    /// Store the assistant API key
    SetApiKey {
        key: String,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").context(format!(
        "Invalid date format: {}. Use YYYY-MM-DD",
        s
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    let store = match &args.credentials {
        Some(path) => CredentialStore::new(path),
        None => CredentialStore::new(CredentialStore::default_path()),
    };

    let message = match args.command {
        Command::SetApiKey { key } => {
            store.set(ASSISTANT_KEY, &key)?;
            println!("Stored assistant API key at {}", store.path().display());
            return Ok(());
        }
        Command::Plan {
            from,
            to,
            start,
            end,
            budget,
            travelers,
        } => {
            let trip = TripRequest {
                source: from,
                destination: to,
                start_date: parse_date(&start)?,
                end_date: parse_date(&end)?,
                budget_usd: budget,
                travelers,
            };
            build_itinerary_prompt(&trip)
        }
        Command::Ask { question } => question,
    };

    let credential = store.require(ASSISTANT_KEY)?;
    let client = AssistantClient::new(60)?;

    tracing::info!("Sending request to the assistant...");
    let answer = client.chat(&[], &message, &credential).await?;
    println!("{}", answer);

    Ok(())
}
