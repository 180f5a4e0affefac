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

//! Guards that must trip before any network activity happens. These run
//! fully offline: a guard that reached the network would hang or fail on a
//! nonsense endpoint instead of returning the expected error.

use chrono::{Days, NaiveDate};
use skyplan_travel_assistant::{
    ApiCredential, CredentialStore, FLIGHT_SEARCH_KEY, FlightSearchClient, FlightSearchParams,
    SearchError, SearchSession,
};

fn yesterday() -> NaiveDate {
    chrono::Local::now().date_naive() - Days::new(1)
}

fn tomorrow() -> NaiveDate {
    chrono::Local::now().date_naive() + Days::new(1)
}

#[tokio::test]
async fn past_date_fails_before_any_network_call() {
    let client = FlightSearchClient::new(1).unwrap();
    // Construct directly to sidestep the builder's own validation.
    let params = FlightSearchParams {
        departure_id: "SFO".to_string(),
        arrival_id: "JFK".to_string(),
        outbound_date: yesterday(),
        currency: "USD".to_string(),
        locale: "en".to_string(),
    };

    let credential = ApiCredential::new("a-valid-looking-key");
    let started = std::time::Instant::now();
    let err = client.search_flights(&params, &credential).await.unwrap_err();

    assert!(matches!(err, SearchError::PastDate));
    // A network round-trip (or its timeout) would take far longer.
    assert!(started.elapsed() < std::time::Duration::from_millis(100));
}

#[tokio::test]
async fn missing_credential_fails_at_the_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    // The flights CLI resolves its credential before constructing a client;
    // with nothing stored the request must die here.
    let err = match std::env::var(FLIGHT_SEARCH_KEY) {
        // Store lookups fall back to the environment, so exercise a key
        // that cannot be set there if the real one is.
        Ok(_) => store.require("SKYPLAN_TEST_NEVER_SET").unwrap_err(),
        Err(_) => store.require(FLIGHT_SEARCH_KEY).unwrap_err(),
    };
    assert!(matches!(err, SearchError::MissingCredential(_)));
}

#[tokio::test]
async fn session_reports_not_busy_after_failed_search() {
    let client = FlightSearchClient::new(1).unwrap();
    let session = SearchSession::new(client);
    let params = FlightSearchParams {
        departure_id: "SFO".to_string(),
        arrival_id: "JFK".to_string(),
        outbound_date: yesterday(),
        currency: "USD".to_string(),
        locale: "en".to_string(),
    };

    assert!(!session.is_busy());
    let _ = session.search(&params, &ApiCredential::new("k")).await;
    assert!(!session.is_busy());
}

#[tokio::test]
async fn overlapping_search_is_rejected_while_first_is_in_flight() {
    // A bound listener that never accepts: the TCP handshake completes in
    // the kernel backlog and the request then hangs until the client
    // timeout, keeping the first search in flight.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let client = FlightSearchClient::new(2)
        .unwrap()
        .with_cors_proxy(format!("http://{addr}/relay"));
    let session = SearchSession::new(client);
    let params = FlightSearchParams {
        departure_id: "SFO".to_string(),
        arrival_id: "JFK".to_string(),
        outbound_date: tomorrow(),
        currency: "USD".to_string(),
        locale: "en".to_string(),
    };

    let first = {
        let session = session.clone();
        let params = params.clone();
        tokio::spawn(async move { session.search(&params, &ApiCredential::new("k")).await })
    };

    // Let the first request acquire the flag and hit the wire.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(session.is_busy());
    let err = session
        .search(&params, &ApiCredential::new("k"))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Busy));

    // The session stays busy until the first request resolves.
    assert!(session.is_busy());
    let outcome = first.await.unwrap();
    assert!(outcome.is_err());
    assert!(!session.is_busy());
}
