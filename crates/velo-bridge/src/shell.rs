// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host shell — owns the WebView, its configuration, and its lifecycle.
//
// The platform glue (Activity / view controller) forwards every WebView
// callback to the matching `on_*` method. All of them run on the UI thread.

use std::cell::RefCell;

use velo_core::config::ShellConfig;
use velo_core::error::{Result, VeloError};
use velo_core::navigation::NavigationPolicy;
use velo_core::types::{BackAction, NavigationDecision};

use crate::traits::{BridgeTransport, NativeHost, WebViewHandle, WebViewSettings};

pub struct HostShell<W: WebViewHandle, H: NativeHost> {
    policy: NavigationPolicy,
    host: H,
    transport: Box<dyn BridgeTransport>,
    /// `None` once torn down.
    webview: Option<W>,
}

impl<W: WebViewHandle, H: NativeHost> HostShell<W, H> {
    /// Configure `webview`, attach the bridge and the navigation policy, and
    /// start loading the configured content source.
    ///
    /// On failure the WebView is released before the error is returned,
    /// bridge registration included.
    pub fn create(
        config: ShellConfig,
        mut webview: W,
        host: H,
        transport: Box<dyn BridgeTransport>,
    ) -> Result<Self> {
        config.validate()?;

        webview
            .apply_settings(&WebViewSettings::from_config(&config))
            .and_then(|()| webview.attach_navigation_handler())
            .map_err(|e| abandon(&mut webview, None, e))?;
        webview
            .register_channel(transport.channel(), transport.convention())
            .map_err(|e| abandon(&mut webview, None, e))?;

        let location = config.content_location();
        tracing::info!(
            source = ?config.content_source,
            location = ?location,
            channel = transport.channel(),
            "host shell created"
        );
        webview
            .load(&location)
            .map_err(|e| abandon(&mut webview, Some(transport.channel()), e))?;

        Ok(Self {
            policy: NavigationPolicy::from_config(&config),
            host,
            transport,
            webview: Some(webview),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Navigation decision callback. Externalized URLs are handed to the
    /// system here; a failure to open them is left to the platform.
    pub fn on_navigation(&self, url: &str) -> NavigationDecision {
        let decision = self.policy.decide(url);
        if decision == NavigationDecision::Externalize {
            tracing::info!(url, "opening navigation externally");
            if let Err(e) = self.host.open_external(url) {
                tracing::warn!(url, error = %e, "external open failed");
            }
        }
        decision
    }

    /// A new document started loading (link, reload, or history step).
    ///
    /// Nothing is pending host-side: posts are answered before they return,
    /// and a reply addressed to the previous document is dropped in the page
    /// by its token guard.
    pub fn on_page_started(&self, url: &str) {
        tracing::debug!(url, channel = self.transport.channel(), "page started");
    }

    /// Back button / gesture. `Propagate` means the platform should run its
    /// default handler (usually closing the screen).
    pub fn on_back_pressed(&mut self) -> BackAction {
        let Some(webview) = self.webview.as_mut() else {
            return BackAction::Propagate;
        };
        if !webview.can_go_back() {
            return BackAction::Propagate;
        }
        match webview.go_back() {
            Ok(()) => BackAction::WentBack,
            Err(e) => {
                tracing::warn!(error = %e, "webview go_back failed");
                BackAction::Propagate
            }
        }
    }

    /// Posted message arriving on `channel`.
    pub fn on_script_message(&mut self, channel: &str, body: &str) {
        if channel != self.transport.channel() {
            tracing::debug!(channel, "message on unregistered channel, dropping");
            return;
        }
        let Some(webview) = self.webview.as_mut() else {
            return;
        };
        self.transport.post(&self.host, webview, body);
    }

    /// Release the bridge registration, then the WebView. Idempotent.
    pub fn teardown(&mut self) {
        let Some(mut webview) = self.webview.take() else {
            return;
        };
        if let Err(e) = webview.unregister_channel(self.transport.channel()) {
            tracing::warn!(error = %e, "bridge unregistration failed");
        }
        if let Err(e) = webview.destroy() {
            tracing::warn!(error = %e, "webview destroy failed");
        }
        tracing::info!("host shell torn down");
    }
}

/// Take the shell out of a platform's slot if `is_owner` accepts it.
///
/// A replaced Activity or view controller can still deliver lifecycle calls
/// after its successor created a new shell; those leave the slot untouched.
pub fn take_owned<W, H>(
    slot: &RefCell<Option<HostShell<W, H>>>,
    is_owner: impl FnOnce(&HostShell<W, H>) -> bool,
) -> Option<HostShell<W, H>>
where
    W: WebViewHandle,
    H: NativeHost,
{
    let mut slot = slot.borrow_mut();
    if slot.as_ref().is_some_and(is_owner) {
        slot.take()
    } else {
        None
    }
}

/// Undo a partially created shell: drop the bridge registration if one was
/// made, then the WebView. Returns `error` for propagation.
fn abandon<W: WebViewHandle>(webview: &mut W, channel: Option<&str>, error: VeloError) -> VeloError {
    tracing::warn!(error = %error, "host shell creation failed, releasing webview");
    if let Some(channel) = channel {
        if let Err(e) = webview.unregister_channel(channel) {
            tracing::warn!(error = %e, "bridge unregistration failed");
        }
    }
    if let Err(e) = webview.destroy() {
        tracing::warn!(error = %e, "webview destroy failed");
    }
    error
}

impl<W: WebViewHandle, H: NativeHost> Drop for HostShell<W, H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
