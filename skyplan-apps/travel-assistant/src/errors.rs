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

//! # Search Errors
//!
//! Request-level error taxonomy. Every variant is terminal for the current
//! request: nothing here is retried, and each renders as a single
//! human-readable message for the presentation layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No {0} API key is configured. Set it in the credential store or environment first")]
    MissingCredential(&'static str),

    #[error("The API key was rejected by the service. Check the stored key and try again")]
    InvalidCredential,

    #[error("The travel date cannot be in the past")]
    PastDate,

    #[error("A non-empty {0} is required")]
    EmptyEndpoint(&'static str),

    #[error("A search is already in flight; wait for it to finish")]
    Busy,

    #[error("HTTP error {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("The service reported an error: {0}")]
    UpstreamApi(String),

    #[error("The search succeeded but returned no flights for this route and date")]
    EmptyResult,

    #[error("Unexpected response shape: missing {0}")]
    MalformedResponse(&'static str),
}
