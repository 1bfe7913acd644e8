// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Velo — native host shells and the web-content bridge.
//!
//! The platform-independent pieces (`traits`, `dispatch`, `transport`,
//! `shell`) carry all bridge semantics. The `android` and `ios` modules only
//! adapt the platform WebView and OS services to the traits:
//!
//! - Android: `jni` calls into `android.webkit.WebView`; content reaches the
//!   host through an injected object (direct calls).
//! - iOS: `objc2` message sends to `WKWebView`; content posts to a
//!   `WKScriptMessageHandler` and receives results via injected script.

pub mod dispatch;
pub mod shell;
pub mod traits;
pub mod transport;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

#[cfg(test)]
mod mock;

pub use shell::HostShell;
pub use traits::{BridgeTransport, NativeHost, WebViewHandle, WebViewSettings};

/// Install the global `tracing` subscriber once per process.
///
/// Native entry points call this before anything else; repeated calls (a
/// recreated Activity, a second view controller) are no-ops.
pub fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .try_init();
    });
}

/// Host used by desktop previews and CI, where no native shell exists.
#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub fn desktop_host() -> Box<dyn traits::NativeHost> {
    Box::new(stub::StubHost)
}
