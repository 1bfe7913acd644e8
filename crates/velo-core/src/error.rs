// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Velo.

use thiserror::Error;

/// Top-level error type for all Velo operations.
///
/// Errors raised while serving a bridge call never reach the web content;
/// the dispatcher logs and drops them. Construction-time failures (shell
/// creation, config loading) are returned to the embedding code.
#[derive(Debug, Error)]
pub enum VeloError {
    // -- Configuration --
    #[error("invalid shell configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Host shell --
    #[error("webview already torn down")]
    WebViewGone,

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, VeloError>;
