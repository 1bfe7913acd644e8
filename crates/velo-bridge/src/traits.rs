// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the host shell.
//
// `NativeHost` is the privileged side (device info, toasts, system URL
// handler). `WebViewHandle` is the embedded browser the shell owns.
// `BridgeTransport` is the seam between the two calling conventions.

use velo_core::config::{ContentLocation, ShellConfig};
use velo_core::error::Result;
use velo_core::types::{CallConvention, PlatformInfo};

/// Privileged operations the shell performs on behalf of web content.
///
/// Implementations must not block: every method runs inline on the UI
/// thread.
pub trait NativeHost {
    /// Describe the running OS. Must be non-empty and stable across calls.
    fn platform_info(&self) -> Result<PlatformInfo>;

    /// Show a short, non-blocking notification.
    fn show_toast(&self, message: &str) -> Result<()>;

    /// Hand a URL to the system browser / app picker.
    fn open_external(&self, url: &str) -> Result<()>;
}

/// Settings applied once when the shell creates its WebView.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebViewSettings {
    pub javascript: bool,
    pub remote_debugging: bool,
    pub dom_storage: bool,
}

impl WebViewSettings {
    pub fn from_config(config: &ShellConfig) -> Self {
        Self {
            javascript: true,
            remote_debugging: config.remote_debugging,
            dom_storage: config.dom_storage,
        }
    }
}

/// The embedded WebView as seen by the shell.
pub trait WebViewHandle {
    fn apply_settings(&mut self, settings: &WebViewSettings) -> Result<()>;

    /// Route every navigation request through the shell's policy.
    fn attach_navigation_handler(&mut self) -> Result<()>;

    /// Expose the bridge to content under `channel`.
    fn register_channel(&mut self, channel: &str, convention: CallConvention) -> Result<()>;

    /// Remove the bridge registration so the platform drops its reference
    /// to the host.
    fn unregister_channel(&mut self, channel: &str) -> Result<()>;

    fn load(&mut self, location: &ContentLocation) -> Result<()>;

    fn can_go_back(&self) -> bool;

    fn go_back(&mut self) -> Result<()>;

    /// Run `script` in the page's main frame. Fire-and-forget.
    fn evaluate_script(&mut self, script: &str) -> Result<()>;

    fn destroy(&mut self) -> Result<()>;
}

/// One bridge endpoint, either direct-call or post-and-callback.
///
/// Both strategies accept the same actions with the same argument and
/// return shapes; only the delivery differs. Entry points that do not match
/// the strategy's convention drop the request.
pub trait BridgeTransport {
    /// Channel name content uses to reach this endpoint.
    fn channel(&self) -> &str;

    fn convention(&self) -> CallConvention;

    /// Direct convention: run `method` and return its value inline.
    fn call(&self, host: &dyn NativeHost, method: &str, args: &[&str]) -> Option<String>;

    /// Post-and-callback convention: accept a posted JSON body and deliver
    /// any result by injecting the well-known callback into `webview`.
    fn post(&mut self, host: &dyn NativeHost, webview: &mut dyn WebViewHandle, body: &str);
}
