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

//! # Flights Query Builder
//!
//! Side-effect free assembly of the one-way flight-search GET request.
//! Credentials are threaded in explicitly by the caller; nothing here reads
//! ambient state or touches the network.

use chrono::NaiveDate;

use crate::credentials::ApiCredential;
use crate::errors::SearchError;

const SEARCH_ENDPOINT: &str = "https://serpapi.com/search.json";

/// `type=2` is the upstream's one-way marker. Round-trip and multi-city
/// search are out of scope.
const TRIP_TYPE_ONE_WAY: &str = "2";

#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchParams {
    pub departure_id: String,
    pub arrival_id: String,
    pub outbound_date: NaiveDate,
    pub currency: String,
    pub locale: String,
}

impl FlightSearchParams {
    pub fn builder(
        departure_id: String,
        arrival_id: String,
        outbound_date: NaiveDate,
    ) -> FlightSearchParamsBuilder {
        FlightSearchParamsBuilder {
            departure_id,
            arrival_id,
            outbound_date,
            currency: "USD".to_string(),
            locale: "en".to_string(),
        }
    }

    /// Client-side guard. The upstream service rejects past dates as well;
    /// both paths surface a user-readable message. Endpoint identifiers are
    /// only checked for presence: the resolver is a heuristic and a bad but
    /// non-empty identifier surfaces downstream as an empty or failed search.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.departure_id.trim().is_empty() {
            return Err(SearchError::EmptyEndpoint("origin"));
        }
        if self.arrival_id.trim().is_empty() {
            return Err(SearchError::EmptyEndpoint("destination"));
        }
        let today = chrono::Local::now().date_naive();
        if self.outbound_date < today {
            return Err(SearchError::PastDate);
        }
        Ok(())
    }

    /// The single outbound search URL for the given date.
    pub fn search_url(&self, credential: &ApiCredential) -> String {
        format!(
            "{}?engine=google_flights&departure_id={}&arrival_id={}&outbound_date={}&type={}&currency={}&hl={}&api_key={}",
            SEARCH_ENDPOINT,
            urlencoding::encode(&self.departure_id),
            urlencoding::encode(&self.arrival_id),
            self.outbound_date.format("%Y-%m-%d"),
            TRIP_TYPE_ONE_WAY,
            urlencoding::encode(&self.currency),
            urlencoding::encode(&self.locale),
            urlencoding::encode(credential.secret()),
        )
    }

    /// CORS-relay form: the fully-built search URL is percent-encoded a
    /// second time and passed as the relay's `url` query parameter.
    pub fn proxied_url(&self, proxy_base: &str, credential: &ApiCredential) -> String {
        let target = self.search_url(credential);
        format!("{}{}", proxy_base, urlencoding::encode(&target))
    }
}

#[derive(Clone)]
pub struct FlightSearchParamsBuilder {
    departure_id: String,
    arrival_id: String,
    outbound_date: NaiveDate,
    currency: String,
    locale: String,
}

impl FlightSearchParamsBuilder {
    pub fn currency(mut self, currency: String) -> Self {
        self.currency = currency;
        self
    }

    pub fn locale(mut self, locale: String) -> Self {
        self.locale = locale;
        self
    }

    pub fn build(self) -> Result<FlightSearchParams, SearchError> {
        let params = FlightSearchParams {
            departure_id: self.departure_id,
            arrival_id: self.arrival_id,
            outbound_date: self.outbound_date,
            currency: self.currency,
            locale: self.locale,
        };
        params.validate()?;
        Ok(params)
    }
}
