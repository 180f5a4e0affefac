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

//! # Flights Response Normalizer
//!
//! Side-effect free mapping from the upstream's heterogeneous JSON document
//! into the internal [`FlightOption`] model. The upstream contract has gone
//! through several revisions (flat records vs. nested leg lists, with and
//! without an emissions block), so one normalizer branches explicitly on the
//! detected shape instead of keeping parallel code paths.
//!
//! Missing optional fields never fail the normalization: numerics default to
//! `0`, strings to `""`. It fails only when the service reports an explicit
//! error, when no recognized result key is present at the top level, or when
//! the transformed list ends up empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SearchError;

/// Fallback leg length used only to synthesize a missing arrival timestamp
/// from a known departure. A fallback, not a measurement.
const FALLBACK_LEG_MINUTES: i64 = 120;

const UPSTREAM_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Airport {
    pub name: String,
    /// IATA code or place identifier.
    pub id: String,
    /// Local timestamp, or `""` when unknown. An empty time is not a parse
    /// failure.
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightLeg {
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    /// Minutes, never negative.
    pub duration: i64,
    pub airplane: String,
    pub airline: String,
    pub airline_logo: String,
    pub travel_class: String,
    pub flight_number: String,
    pub legroom: String,
    /// Free-text amenity tags, insertion order preserved.
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Layover {
    pub duration: i64,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CarbonEmissions {
    pub this_flight: i64,
    pub typical_for_this_route: i64,
    /// Signed; at-or-below route-typical is <= 0.
    pub difference_percent: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightOption {
    pub flights: Vec<FlightLeg>,
    pub layovers: Vec<Layover>,
    pub total_duration: i64,
    pub carbon_emissions: CarbonEmissions,
    pub price: f64,
    #[serde(rename = "type")]
    pub trip_type: String,
    pub airline_logo: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Opaque upstream identifier, unique within one result set.
    pub booking_token: String,
}

impl FlightOption {
    /// The sole identity used for "currently selected option" comparisons.
    pub fn selection_id(&self) -> &str {
        &self.booking_token
    }
}

/// Normalize one upstream document into `FlightOption`s.
///
/// Pure: the resolved origin/destination codes are used only as fallback
/// airport ids for legs that omit their own.
pub fn normalize_flights(
    doc: &Value,
    departure_id: &str,
    arrival_id: &str,
) -> Result<Vec<FlightOption>, SearchError> {
    surface_upstream_error(doc)?;

    let options = if let Some(records) = doc.get("flights_data").and_then(Value::as_array) {
        records
            .iter()
            .map(|record| flat_record_to_option(record, departure_id, arrival_id))
            .collect()
    } else if doc.get("best_flights").is_some() || doc.get("other_flights").is_some() {
        let best = doc.get("best_flights").and_then(Value::as_array);
        let other = doc.get("other_flights").and_then(Value::as_array);
        best.into_iter()
            .flatten()
            .chain(other.into_iter().flatten())
            .map(|record| nested_record_to_option(record, departure_id, arrival_id))
            .collect::<Vec<_>>()
    } else {
        return Err(SearchError::MalformedResponse(
            "flights_data or best_flights",
        ));
    };

    // An empty success response is not a valid outcome for the caller.
    if options.is_empty() {
        return Err(SearchError::EmptyResult);
    }
    Ok(options)
}

/// Fail fast on an explicit error envelope, mapping known substrings to
/// specific messages.
fn surface_upstream_error(doc: &Value) -> Result<(), SearchError> {
    let Some(message) = doc.get("error").and_then(Value::as_str) else {
        return Ok(());
    };
    if message.contains("Invalid API key") {
        return Err(SearchError::InvalidCredential);
    }
    if message.contains("cannot be in the past") {
        return Err(SearchError::PastDate);
    }
    Err(SearchError::UpstreamApi(message.to_string()))
}

/// One flat record is one single-leg option: the record carries the leg
/// fields directly and never details layovers.
fn flat_record_to_option(record: &Value, departure_id: &str, arrival_id: &str) -> FlightOption {
    let leg = leg_from_value(record, departure_id, arrival_id);
    let total_duration = leg.duration;
    let airline_logo = leg.airline_logo.clone();
    let extensions = leg.extensions.clone();

    let emissions = record.get("emissions");
    let carbon_emissions = CarbonEmissions {
        this_flight: int_at(emissions, "amount").max(0),
        typical_for_this_route: int_at(emissions, "average").max(0),
        difference_percent: int_at(emissions, "difference"),
    };

    FlightOption {
        flights: vec![leg],
        layovers: Vec::new(),
        total_duration,
        carbon_emissions,
        price: coerce_price(record.get("price")),
        trip_type: "One way".to_string(),
        airline_logo,
        extensions,
        booking_token: first_text(record, &["booking_token", "booking_link"]),
    }
}

fn nested_record_to_option(record: &Value, departure_id: &str, arrival_id: &str) -> FlightOption {
    let flights: Vec<FlightLeg> = match record.get("flights").and_then(Value::as_array) {
        Some(legs) => legs
            .iter()
            .map(|leg| leg_from_value(leg, departure_id, arrival_id))
            .collect(),
        // No nested list: the record itself is the single leg.
        None => vec![leg_from_value(record, departure_id, arrival_id)],
    };

    let layovers: Vec<Layover> = record
        .get("layovers")
        .and_then(Value::as_array)
        .map(|stops| {
            stops
                .iter()
                .map(|stop| Layover {
                    duration: coerce_minutes(stop.get("duration")),
                    name: first_text(stop, &["name"]),
                    id: first_text(stop, &["id"]),
                })
                .collect()
        })
        .unwrap_or_default();

    let total_duration = match record.get("total_duration") {
        Some(explicit) => coerce_minutes(Some(explicit)),
        None => flights.iter().map(|leg| leg.duration).sum(),
    };

    let emissions = record.get("carbon_emissions");
    let carbon_emissions = CarbonEmissions {
        this_flight: int_at(emissions, "this_flight").max(0),
        typical_for_this_route: int_at(emissions, "typical_for_this_route").max(0),
        difference_percent: int_at(emissions, "difference_percent"),
    };

    let trip_type = match record.get("type").and_then(Value::as_str) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => "One way".to_string(),
    };

    FlightOption {
        airline_logo: first_text(record, &["airline_logo"]),
        extensions: text_list(record, &["extensions", "features"]),
        booking_token: first_text(record, &["booking_token", "booking_link"]),
        price: coerce_price(record.get("price")),
        flights,
        layovers,
        total_duration,
        carbon_emissions,
        trip_type,
    }
}

/// Map one leg, tolerating both the nested airport-object form and the flat
/// `*_airport`/`*_code`/`*_time` string form.
fn leg_from_value(leg: &Value, departure_id: &str, arrival_id: &str) -> FlightLeg {
    let departure_airport = airport_from_value(leg, "departure", departure_id);
    let mut arrival_airport = airport_from_value(leg, "arrival", arrival_id);
    let duration = coerce_minutes(leg.get("duration").or_else(|| leg.get("duration_minutes")));

    if arrival_airport.time.is_empty() && !departure_airport.time.is_empty() {
        arrival_airport.time = synthesize_arrival(&departure_airport.time);
    }

    let travel_class = match first_text(leg, &["travel_class", "cabin_class"]) {
        class if class.is_empty() => "Economy".to_string(),
        class => class,
    };

    FlightLeg {
        departure_airport,
        arrival_airport,
        duration,
        airplane: first_text(leg, &["airplane", "aircraft"]),
        airline: first_text(leg, &["airline"]),
        airline_logo: first_text(leg, &["airline_logo"]),
        travel_class,
        flight_number: first_text(leg, &["flight_number"]),
        legroom: first_text(leg, &["legroom"]),
        extensions: text_list(leg, &["extensions", "features"]),
    }
}

fn airport_from_value(leg: &Value, side: &str, fallback_id: &str) -> Airport {
    let object_key = format!("{side}_airport");
    if let Some(nested) = leg.get(&object_key).filter(|v| v.is_object()) {
        let id = first_text(nested, &["id"]);
        return Airport {
            name: first_text(nested, &["name"]),
            id: if id.is_empty() {
                fallback_id.to_string()
            } else {
                id
            },
            time: first_text(nested, &["time"]),
        };
    }

    // Flat form: "<side>_airport" is the name string.
    let name = first_text(leg, &[object_key.as_str()]);
    let code = first_text(leg, &[format!("{side}_code").as_str()]);
    Airport {
        name,
        id: if code.is_empty() {
            fallback_id.to_string()
        } else {
            code
        },
        time: first_text(leg, &[format!("{side}_time").as_str()]),
    }
}

/// Arrival fallback: departure plus a fixed duration. Only used when the
/// departure timestamp parses in the upstream's format; otherwise the
/// arrival stays empty.
fn synthesize_arrival(departure_time: &str) -> String {
    match chrono::NaiveDateTime::parse_from_str(departure_time, UPSTREAM_TIME_FORMAT) {
        Ok(departure) => (departure + chrono::Duration::minutes(FALLBACK_LEG_MINUTES))
            .format(UPSTREAM_TIME_FORMAT)
            .to_string(),
        Err(_) => String::new(),
    }
}

static DURATION_H_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*h").unwrap());
static DURATION_M_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*m").unwrap());

/// Coerce a duration field to integer minutes. Accepts a JSON number, a
/// numeric string, or an "Xh Ym" style label. Anything else is `0`.
pub(crate) fn coerce_minutes(value: Option<&Value>) -> i64 {
    let Some(value) = value else { return 0 };
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0)
            .max(0),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                return n.max(0);
            }
            let hours = DURATION_H_RE
                .captures(s)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .unwrap_or(0);
            let minutes = DURATION_M_RE
                .captures(s)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .unwrap_or(0);
            if hours == 0 && minutes == 0 {
                tracing::debug!("Could not parse duration from: '{}'", s);
            }
            hours * 60 + minutes
        }
        _ => 0,
    }
}

/// Coerce a price to a non-negative float, stripping currency symbols and
/// thousands separators from string forms. Absent or unparseable is `0`.
pub(crate) fn coerce_price(value: Option<&Value>) -> f64 {
    let Some(value) = value else { return 0.0 };
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0).max(0.0),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn int_at(container: Option<&Value>, key: &str) -> i64 {
    container
        .and_then(|v| v.get(key))
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
        .unwrap_or(0)
}

fn first_text(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .unwrap_or("")
        .to_string()
}

fn text_list(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
