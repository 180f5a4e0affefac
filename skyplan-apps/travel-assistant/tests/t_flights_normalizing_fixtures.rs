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

//! Integration tests for the normalizer using captured JSON response
//! fixtures. These catch regressions when the upstream shape drifts between
//! the flat-record and nested-leg revisions the normalizer has to tolerate.

use std::path::Path;

use skyplan_travel_assistant::{FlightOption, SearchError, normalize_flights};

/// Load a fixture file from the fixtures directory.
///
/// Panics if the file cannot be loaded or is not valid JSON.
fn load_fixture(name: &str) -> serde_json::Value {
    let fixtures_dir =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures-flights-normalizing");
    let fixture_path = fixtures_dir.join(format!("{}.json", name));
    let raw = std::fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture '{}' at {:?}: {}",
            name, fixture_path, e
        )
    });
    serde_json::from_str(&raw).expect("fixture is valid JSON")
}

#[test]
fn nested_fixture_normalizes_best_and_other_flights() {
    let doc = load_fixture("nested-sfo_jfk");
    let options = normalize_flights(&doc, "SFO", "JFK").expect("fixture normalizes");

    // 2 best + 1 other, in order.
    assert_eq!(options.len(), 3);
    let tokens: Vec<_> = options.iter().map(FlightOption::selection_id).collect();
    assert_eq!(
        tokens,
        vec![
            "WyJDalJJY1RaRFFUaEJhIl1d",
            "WyJDalJJY1RaRFFUaEJiIl1d",
            "WyJDalJJY1RaRFFUaEJjIl1d"
        ]
    );

    // Booking tokens are unique within the result set.
    let mut deduped = tokens.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), tokens.len());

    let nonstop = &options[0];
    assert_eq!(nonstop.flights.len(), 1);
    assert_eq!(nonstop.total_duration, 330);
    assert_eq!(nonstop.price, 348.0);
    assert_eq!(nonstop.carbon_emissions.difference_percent, -4);
    assert_eq!(nonstop.flights[0].extensions.len(), 3);

    let one_stop = &options[1];
    assert_eq!(one_stop.flights.len(), 2);
    assert_eq!(one_stop.layovers.len(), one_stop.flights.len() - 1);
    assert_eq!(one_stop.layovers[0].id, "DEN");
    assert_eq!(one_stop.layovers[0].duration, 75);
    // The second leg spells the aircraft field differently.
    assert_eq!(one_stop.flights[1].airplane, "Boeing 737MAX 9");

    // The "other" record has no explicit total: summed from its single leg.
    let red_eye = &options[2];
    assert_eq!(red_eye.total_duration, 325);
    assert_eq!(red_eye.flights[0].airline, "JetBlue");
}

#[test]
fn flat_fixture_normalizes_each_record_as_single_leg() {
    let doc = load_fixture("flat-lhr_cdg");
    let options = normalize_flights(&doc, "LHR", "CDG").expect("fixture normalizes");
    assert_eq!(options.len(), 3);

    for option in &options {
        assert_eq!(option.flights.len(), 1);
        assert!(option.layovers.is_empty());
        assert_eq!(option.trip_type, "One way");
    }

    let full = &options[0];
    assert_eq!(full.flights[0].departure_airport.id, "LHR");
    assert_eq!(full.flights[0].departure_airport.name, "Heathrow Airport");
    assert_eq!(full.total_duration, 80);
    assert_eq!(full.price, 96.0);
    assert_eq!(full.carbon_emissions.this_flight, 62000);
    assert_eq!(full.selection_id(), "af-1681-20990901");

    // Second record: duration given as a label, price as a string, and no
    // arrival time (synthesized from the departure).
    let sparse = &options[1];
    assert_eq!(sparse.total_duration, 85);
    assert_eq!(sparse.price, 112.0);
    assert_eq!(sparse.flights[0].arrival_airport.time, "2099-09-01 13:05");
    assert_eq!(sparse.flights[0].travel_class, "Economy");

    // Third record: nearly everything missing, everything defaulted.
    let bare = &options[2];
    assert_eq!(bare.total_duration, 0);
    assert_eq!(bare.price, 0.0);
    assert_eq!(bare.flights[0].departure_airport.time, "");
    assert_eq!(bare.flights[0].arrival_airport.time, "");
    assert_eq!(bare.carbon_emissions.this_flight, 0);
}

#[test]
fn invalid_key_fixture_fails_fast() {
    let doc = load_fixture("error-invalid-key");
    let err = normalize_flights(&doc, "SFO", "JFK").unwrap_err();
    assert!(matches!(err, SearchError::InvalidCredential));
}

#[test]
fn past_date_fixture_maps_to_past_date() {
    let doc = load_fixture("error-past-date");
    let err = normalize_flights(&doc, "SFO", "JFK").unwrap_err();
    assert!(matches!(err, SearchError::PastDate));
}

#[test]
fn empty_success_fixture_is_an_error() {
    let doc = load_fixture("empty-success");
    let err = normalize_flights(&doc, "SFO", "JFK").unwrap_err();
    assert!(matches!(err, SearchError::EmptyResult));
}

#[test]
fn error_messages_are_user_readable() {
    for (fixture, needle) in [
        ("error-invalid-key", "API key"),
        ("error-past-date", "past"),
        ("empty-success", "no flights"),
    ] {
        let doc = load_fixture(fixture);
        let message = normalize_flights(&doc, "SFO", "JFK").unwrap_err().to_string();
        assert!(
            message.contains(needle),
            "'{message}' should mention '{needle}'"
        );
    }
}
