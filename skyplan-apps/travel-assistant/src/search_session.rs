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

//! # Search Session
//!
//! One form instance's view of the flight search: a busy flag that rejects
//! resubmission while a request is in flight, and a latest-wins
//! sequence gate so a response that was overtaken by a newer search is
//! discarded instead of being applied out of order.

use skyplan_latest_wins::{BusyFlag, LatestWins};

use crate::credentials::ApiCredential;
use crate::errors::SearchError;
use crate::flights_search::{FlightSearchClient, FlightSearchResult};
use crate::flights_query_builder::FlightSearchParams;

#[derive(Clone)]
pub struct SearchSession {
    client: FlightSearchClient,
    gate: LatestWins,
    busy: BusyFlag,
}

impl SearchSession {
    pub fn new(client: FlightSearchClient) -> Self {
        Self {
            client,
            gate: LatestWins::new(),
            busy: BusyFlag::new(),
        }
    }

    /// True while a search issued through this session has not resolved.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Run one search. A submission while another is still in flight is
    /// rejected with `SearchError::Busy`. `Ok(None)` means the response
    /// arrived after a newer search was issued and was discarded silently;
    /// other errors are the request's own.
    pub async fn search(
        &self,
        params: &FlightSearchParams,
        credential: &ApiCredential,
    ) -> Result<Option<FlightSearchResult>, SearchError> {
        let guard = self.busy.acquire().map_err(|_| SearchError::Busy)?;
        let ticket = self.gate.issue();
        let outcome = self.client.search_flights(params, credential).await;
        drop(guard);

        if !self.gate.admit(ticket) {
            tracing::debug!(
                sequence = ticket.sequence(),
                "Discarding superseded search response"
            );
            return Ok(None);
        }
        outcome.map(Some)
    }
}
