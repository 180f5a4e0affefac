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

//! # Place Resolver
//!
//! Heuristic mapping from a user-supplied origin/destination string to a
//! search identifier. Exactly 3 characters is assumed to be an IATA code;
//! anything else becomes a lowercase `place:` reference token.
//!
//! There is no lookup against an airport directory: a mistyped 3-letter
//! string still resolves to an (invalid) IATA code and only surfaces
//! downstream as an empty result or an upstream error.

/// Resolve a free-text origin/destination into a search-ready identifier.
/// Always succeeds; never validates.
pub fn resolve_search_id(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.chars().count() == 3 {
        return trimmed.to_uppercase();
    }
    let token = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("+")
        .to_lowercase();
    format!("place:{token}")
}
