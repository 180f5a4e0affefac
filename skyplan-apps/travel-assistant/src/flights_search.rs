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

//! # Flight Search Client
//!
//! Effectful (time, network) operations for the flight-search service.
//! Exactly one network call per invocation: no retry, no pagination.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use wreq::redirect::Policy;
use wreq_util::Emulation;

use crate::credentials::ApiCredential;
use crate::errors::SearchError;
use crate::flights_normalizer::{FlightOption, normalize_flights};
use crate::flights_query_builder::FlightSearchParams;

#[derive(Debug, Clone)]
pub struct FlightSearchResult {
    pub search_params: FlightSearchParams,
    pub options: Vec<FlightOption>,
    pub raw_response: String,
}

impl FlightSearchResult {
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[derive(Clone)]
pub struct FlightSearchClient {
    client: Arc<wreq::Client>,
    /// Optional CORS-relay base; when set, every request is routed through
    /// it with the target URL double-encoded as its query parameter.
    proxy_base: Option<String>,
}

impl FlightSearchClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = wreq::Client::builder()
            .emulation(Emulation::Safari18_5)
            .redirect(Policy::default())
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            proxy_base: None,
        })
    }

    pub fn with_cors_proxy(mut self, proxy_base: String) -> Self {
        self.proxy_base = Some(proxy_base);
        self
    }

    pub async fn fetch_raw(&self, url: &str) -> Result<String, SearchError> {
        let http_start = std::time::Instant::now();
        tracing::trace!("[fetch_raw] Starting HTTP request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::UpstreamApi(format!("Request failed: {e}")))?;
        let http_elapsed = http_start.elapsed();
        tracing::trace!("[fetch_raw] HTTP request completed in {:?}", http_elapsed);

        let status = response.status();
        tracing::debug!(
            "[fetch_raw] HTTP Status: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        );

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::UpstreamApi(format!("Read body: {e}")))?;
        tracing::debug!("[fetch_raw] Response body: {} KB", body.len() / 1024);

        if !status.is_success() {
            let body_preview = body.chars().take(500).collect::<String>();
            return Err(SearchError::UpstreamHttp {
                status: status.as_u16(),
                body: body_preview,
            });
        }

        Ok(body)
    }

    /// Run one search: validate, build the URL, fetch, decode, normalize.
    /// The credential is read by the caller at the call boundary and passes
    /// through here untouched.
    pub async fn search_flights(
        &self,
        params: &FlightSearchParams,
        credential: &ApiCredential,
    ) -> Result<FlightSearchResult, SearchError> {
        let overall_start = std::time::Instant::now();
        params.validate()?;

        let url = match &self.proxy_base {
            Some(proxy) => params.proxied_url(proxy, credential),
            None => params.search_url(credential),
        };
        tracing::info!(
            "Searching {} -> {} on {}",
            params.departure_id,
            params.arrival_id,
            params.outbound_date
        );

        let fetch_start = std::time::Instant::now();
        let body = self.fetch_raw(&url).await?;
        tracing::info!(
            "HTTP fetch completed in {:?}, got {} KB",
            fetch_start.elapsed(),
            body.len() / 1024
        );

        let doc: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Response is not JSON: {e}");
            SearchError::MalformedResponse("JSON document")
        })?;

        let parse_start = std::time::Instant::now();
        let options = normalize_flights(&doc, &params.departure_id, &params.arrival_id)?;
        tracing::debug!(
            "Normalized {} options in {:?}",
            options.len(),
            parse_start.elapsed()
        );
        tracing::info!("Total search_flights time: {:?}", overall_start.elapsed());

        Ok(FlightSearchResult {
            search_params: params.clone(),
            options,
            raw_response: body,
        })
    }
}
