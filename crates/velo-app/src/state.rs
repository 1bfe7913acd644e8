// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

/// Result of the last platform-info request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlatformInfoState {
    /// Not requested yet.
    #[default]
    Unknown,
    /// Request in flight.
    Loading,
    /// Host answered.
    Known(String),
    /// No bridge, or the host never answered within the timeout.
    Unavailable,
}

impl PlatformInfoState {
    pub fn label(&self) -> &str {
        match self {
            Self::Unknown => "Not requested",
            Self::Loading => "Asking the host...",
            Self::Known(info) => info,
            Self::Unavailable => "Not running inside a native shell",
        }
    }
}

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Demo counter. Survives route changes, not page reloads.
    pub count: u32,
    pub platform_info: PlatformInfoState,
    /// Last user-visible status line.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn set_platform_info(&mut self, reply: Option<String>) {
        self.platform_info = match reply {
            Some(info) if !info.is_empty() => PlatformInfoState::Known(info),
            _ => PlatformInfoState::Unavailable,
        };
    }
}
