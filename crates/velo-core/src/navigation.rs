// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Navigation policy — decides, before any fetch happens, whether a navigation
// requested inside the WebView stays there or goes to the system handler.

use url::Url;

use crate::config::ShellConfig;
use crate::types::NavigationDecision;

/// Stateless per-request navigation filter.
///
/// Only the URL of the current request is consulted; there is no history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPolicy {
    /// Host of the content server the shell loaded, lowercased and without
    /// IPv6 brackets. `None` when content is bundled.
    internal_host: Option<String>,
}

impl NavigationPolicy {
    pub fn new(internal_host: Option<&str>) -> Self {
        Self {
            internal_host: internal_host.map(normalize_host),
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.internal_host())
    }

    /// Decide what to do with a navigation to `url`.
    ///
    /// 1. Same host as the dev server → load internally (port is ignored).
    /// 2. Any other `http`/`https` URL → externalize.
    /// 3. Everything else (anchors, `file:`, `about:`, custom schemes, and
    ///    strings that do not parse as absolute URLs) → load internally.
    pub fn decide(&self, url: &str) -> NavigationDecision {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(url, error = %e, "unparseable navigation target, allowing");
                return NavigationDecision::LoadInternally;
            }
        };

        if let (Some(internal), Some(host)) = (&self.internal_host, parsed.host_str()) {
            if normalize_host(host) == *internal {
                return NavigationDecision::LoadInternally;
            }
        }

        match parsed.scheme() {
            "http" | "https" => NavigationDecision::Externalize,
            _ => NavigationDecision::LoadInternally,
        }
    }
}

fn normalize_host(host: &str) -> String {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_policy() -> NavigationPolicy {
        NavigationPolicy::from_config(&ShellConfig::development("localhost", 3001))
    }

    #[test]
    fn dev_host_stays_internal() {
        let policy = dev_policy();
        assert_eq!(
            policy.decide("http://localhost:3001/settings"),
            NavigationDecision::LoadInternally
        );
        // Port and case do not matter.
        assert_eq!(
            policy.decide("https://LOCALHOST:8443/"),
            NavigationDecision::LoadInternally
        );
    }

    #[test]
    fn foreign_web_urls_are_externalized() {
        let policy = dev_policy();
        assert_eq!(
            policy.decide("https://example.com"),
            NavigationDecision::Externalize
        );
        assert_eq!(
            policy.decide("http://example.com/?next=localhost"),
            NavigationDecision::Externalize
        );
        // Host matching is exact, not substring.
        assert_eq!(
            policy.decide("https://localhost.evil.example/"),
            NavigationDecision::Externalize
        );
    }

    #[test]
    fn other_schemes_stay_internal() {
        let policy = dev_policy();
        for url in [
            "file:///android_asset/index.html",
            "about:blank",
            "velo://settings",
            "mailto:someone@example.com",
            "#section-2",
            "/relative/path",
        ] {
            assert_eq!(policy.decide(url), NavigationDecision::LoadInternally, "{url}");
        }
    }

    #[test]
    fn production_externalizes_every_web_url() {
        let policy = NavigationPolicy::from_config(&ShellConfig::production("index.html"));
        assert_eq!(
            policy.decide("http://localhost:3001/"),
            NavigationDecision::Externalize
        );
        assert_eq!(
            policy.decide("file:///android_asset/about.html"),
            NavigationDecision::LoadInternally
        );
    }

    #[test]
    fn ipv6_dev_host() {
        let policy = NavigationPolicy::new(Some("::1"));
        assert_eq!(
            policy.decide("http://[::1]:3001/"),
            NavigationDecision::LoadInternally
        );
    }
}
