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

//! # Itinerary Prompt Builder
//!
//! Deterministic, side-effect free rendering of trip parameters into the
//! natural-language prompt sent to the generative-text service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Style instruction sent with every assistant call.
pub const ASSISTANT_STYLE: &str = "You are a friendly and knowledgeable travel planning assistant. \
     Answer questions about destinations, itineraries, budgets, and travel tips. \
     Use markdown headings and bullet lists. Keep recommendations practical.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TripRequest {
    pub source: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_usd: u32,
    pub travelers: u32,
}

impl TripRequest {
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(0)
    }
}

/// Render a trip request into the itinerary prompt. Pure: equal inputs
/// produce byte-identical prompts.
pub fn build_itinerary_prompt(trip: &TripRequest) -> String {
    format!(
        "Plan a trip from {source} to {destination}.\n\
         Travel dates: {start} to {end} ({nights} nights).\n\
         Budget: {budget} USD total for {travelers} traveler(s).\n\
         \n\
         Produce a day-by-day itinerary in markdown with:\n\
         - suggested neighborhoods or areas to stay\n\
         - must-see sights and one off-the-beaten-path option per day\n\
         - rough daily cost estimates that respect the budget\n\
         - local transport tips between the listed stops",
        source = trip.source,
        destination = trip.destination,
        start = trip.start_date.format("%Y-%m-%d"),
        end = trip.end_date.format("%Y-%m-%d"),
        nights = trip.nights(),
        budget = trip.budget_usd,
        travelers = trip.travelers,
    )
}
