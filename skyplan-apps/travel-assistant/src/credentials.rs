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

//! # Credential Store
//!
//! Two string credentials keyed by fixed names, persisted as a small JSON
//! map on disk. Keys are read fresh at each call boundary and threaded
//! explicitly into the clients; no client caches them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::SearchError;

/// Store key for the flight-search service.
pub const FLIGHT_SEARCH_KEY: &str = "SERPAPI_KEY";
/// Store key for the generative-language service.
pub const ASSISTANT_KEY: &str = "GEMINI_API_KEY";

/// A credential pulled out of the store, ready to be transmitted as a query
/// parameter of the owning service.
#[derive(Debug, Clone)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(flatten)]
    keys: BTreeMap<String, String>,
}

/// On-disk key/value store for API credentials.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's home directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config/skyplan/credentials.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreFile> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Corrupt credential store at {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(e).context("Failed to read credential store"),
        }
    }

    /// Read one stored value. A missing store file reads as empty.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.keys.get(key).cloned())
    }

    /// Write one value and persist immediately.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut store = self.load()?;
        store.keys.insert(key.to_string(), value.trim().to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create credential directory")?;
        }
        let serialized = serde_json::to_string_pretty(&store)?;
        std::fs::write(&self.path, serialized).context("Failed to write credential store")?;
        Ok(())
    }

    /// Fetch a credential the caller is about to use, checking the process
    /// environment first so CI and one-off runs need no store file.
    /// Fails with `MissingCredential` before any network activity happens.
    pub fn require(&self, key: &'static str) -> Result<ApiCredential, SearchError> {
        if let Ok(from_env) = std::env::var(key)
            && !from_env.trim().is_empty()
        {
            return Ok(ApiCredential::new(from_env.trim().to_string()));
        }
        match self.get(key) {
            Ok(Some(value)) if !value.trim().is_empty() => {
                Ok(ApiCredential::new(value.trim().to_string()))
            }
            Ok(_) => Err(SearchError::MissingCredential(key)),
            Err(e) => {
                // A store that exists but cannot be read is not the same as
                // an absent key; keep that distinction in the logs.
                tracing::warn!("Credential store unreadable, treating {key} as unset: {e:#}");
                Err(SearchError::MissingCredential(key))
            }
        }
    }
}
