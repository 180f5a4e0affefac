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

// Library for skyplan-travel-assistant
// Flight search normalization and AI-assisted trip planning

mod assistant_chat;
mod credentials;
mod errors;
mod flights_normalizer;
mod flights_query_builder;
mod flights_search;
mod place_resolver;
mod plan_prompt;
mod search_session;

pub use assistant_chat::{AssistantClient, ChatRole, ChatTurn};
pub use credentials::{
    ASSISTANT_KEY, ApiCredential, CredentialStore, FLIGHT_SEARCH_KEY,
};
pub use errors::SearchError;
pub use flights_normalizer::{
    Airport, CarbonEmissions, FlightLeg, FlightOption, Layover, normalize_flights,
};
pub use flights_query_builder::{FlightSearchParams, FlightSearchParamsBuilder};
pub use flights_search::{FlightSearchClient, FlightSearchResult};
pub use place_resolver::resolve_search_id;
pub use plan_prompt::{ASSISTANT_STYLE, TripRequest, build_itinerary_prompt};
pub use search_session::SearchSession;
