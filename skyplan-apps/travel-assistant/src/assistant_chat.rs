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

//! # Assistant Chat Client
//!
//! Effectful client for the generative-language service: one POST per call,
//! carrying the style instruction plus the prior conversation turns (or a
//! synthesized itinerary prompt), returning a single text blob. No
//! streaming.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wreq::redirect::Policy;
use wreq_util::Emulation;

use crate::credentials::ApiCredential;
use crate::errors::SearchError;
use crate::plan_prompt::ASSISTANT_STYLE;

const GENERATE_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// The wire role names the service expects.
    fn wire_name(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn from_conversation(history: &[ChatTurn], message: &str) -> Self {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content {
                role: turn.role.wire_name(),
                parts: vec![Part {
                    text: turn.content.clone(),
                }],
            })
            .collect();
        contents.push(Content {
            role: "user",
            parts: vec![Part {
                text: message.to_string(),
            }],
        });
        Self {
            system_instruction: Content {
                role: "user",
                parts: vec![Part {
                    text: ASSISTANT_STYLE.to_string(),
                }],
            },
            contents,
            generation_config: GenerationConfig::default(),
        }
    }
}

#[derive(Clone)]
pub struct AssistantClient {
    client: Arc<wreq::Client>,
}

impl AssistantClient {
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
        })
    }

    /// Send one message with its prior turns, returning the response text.
    pub async fn chat(
        &self,
        history: &[ChatTurn],
        message: &str,
        credential: &ApiCredential,
    ) -> Result<String, SearchError> {
        let url = format!(
            "{}?key={}",
            GENERATE_ENDPOINT,
            urlencoding::encode(credential.secret())
        );
        let request = GenerateRequest::from_conversation(history, message);

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::UpstreamApi(format!("Request failed: {e}")))?;
        tracing::debug!("Assistant call returned in {:?}", start.elapsed());

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::UpstreamApi(format!("Read body: {e}")))?;

        let doc: serde_json::Value = serde_json::from_str(&body)
            .map_err(|_| SearchError::MalformedResponse("JSON document"))?;

        if let Some(message) = doc
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(serde_json::Value::as_str)
        {
            if message.contains("API key not valid") {
                return Err(SearchError::InvalidCredential);
            }
            return Err(SearchError::UpstreamApi(message.to_string()));
        }
        if !status.is_success() {
            return Err(SearchError::UpstreamHttp {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        extract_text(&doc)
    }
}

/// Pull the single text blob out of the generation response.
fn extract_text(doc: &serde_json::Value) -> Result<String, SearchError> {
    let parts = doc
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(serde_json::Value::as_array)
        .ok_or(SearchError::MalformedResponse("candidates"))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(serde_json::Value::as_str))
        .collect::<Vec<_>>()
        .join("");
    if text.is_empty() {
        return Err(SearchError::MalformedResponse("candidate text"));
    }
    Ok(text)
}
