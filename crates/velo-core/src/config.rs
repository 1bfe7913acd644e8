// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell configuration, injected at shell construction time.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, VeloError};

/// Where the shell loads its web content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// A live development server on the local network.
    Development,
    /// The web bundle packaged inside the app.
    Production,
}

/// Address of the development content server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevServer {
    pub host: String,
    pub port: u16,
}

impl Default for DevServer {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3001,
        }
    }
}

impl DevServer {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// The host must be a bare name or address (IPv6 in brackets) so that
    /// `url()` parses back to exactly this host and port.
    fn validate(&self) -> Result<()> {
        let host = self.host.as_str();
        if host.is_empty() {
            return Err(VeloError::InvalidConfig("dev_server.host is empty".into()));
        }
        if self.port == 0 {
            return Err(VeloError::InvalidConfig("dev_server.port is 0".into()));
        }
        if host.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(VeloError::InvalidConfig(format!(
                "dev_server.host must be a host name, not a URL: {host:?}"
            )));
        }

        let parsed = Url::parse(&self.url()).map_err(|e| {
            VeloError::InvalidConfig(format!("dev_server.host {host:?} is not a valid host: {e}"))
        })?;
        let same_host = parsed
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(host));
        if !same_host || parsed.port_or_known_default() != Some(self.port) {
            return Err(VeloError::InvalidConfig(format!(
                "dev_server.host {host:?} does not round-trip as a URL host"
            )));
        }
        Ok(())
    }
}

/// Resolved load target for the WebView.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    /// Absolute URL to fetch.
    Remote(String),
    /// Path relative to the platform's bundled asset root.
    Bundled(String),
}

/// Host shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Development server or bundled asset. Chosen once per shell.
    pub content_source: ContentSource,
    /// Dev server address; also the only host the navigation policy keeps
    /// inside the WebView.
    pub dev_server: DevServer,
    /// Entry document relative to the bundled asset root.
    pub bundled_entry: String,
    /// Expose the WebView to remote inspectors (Chrome DevTools / Safari).
    pub remote_debugging: bool,
    /// Enable `localStorage` / `sessionStorage`.
    pub dom_storage: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            content_source: ContentSource::Production,
            dev_server: DevServer::default(),
            bundled_entry: "index.html".into(),
            remote_debugging: false,
            dom_storage: true,
        }
    }
}

impl ShellConfig {
    /// Development preset: load from `host:port`, inspector enabled.
    pub fn development(host: impl Into<String>, port: u16) -> Self {
        Self {
            content_source: ContentSource::Development,
            dev_server: DevServer {
                host: host.into(),
                port,
            },
            remote_debugging: true,
            ..Self::default()
        }
    }

    /// Production preset: load the bundled entry document.
    pub fn production(entry: impl Into<String>) -> Self {
        Self {
            content_source: ContentSource::Production,
            bundled_entry: entry.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.dev_server.validate()?;
        let entry = self.bundled_entry.trim();
        if entry.is_empty() {
            return Err(VeloError::InvalidConfig("bundled_entry is empty".into()));
        }
        if entry.starts_with('/') || entry.split('/').any(|seg| seg == "..") {
            return Err(VeloError::InvalidConfig(format!(
                "bundled_entry must be a relative path inside the bundle: {entry}"
            )));
        }
        Ok(())
    }

    /// The load target for the configured content source.
    pub fn content_location(&self) -> ContentLocation {
        match self.content_source {
            ContentSource::Development => ContentLocation::Remote(self.dev_server.url()),
            ContentSource::Production => ContentLocation::Bundled(self.bundled_entry.clone()),
        }
    }

    /// Host the navigation policy keeps in-WebView. Only set in development;
    /// a production shell loaded nothing from the network.
    pub fn internal_host(&self) -> Option<&str> {
        match self.content_source {
            ContentSource::Development => Some(self.dev_server.host.as_str()),
            ContentSource::Production => None,
        }
    }
}
