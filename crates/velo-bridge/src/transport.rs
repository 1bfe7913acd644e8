// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The two bridge transport strategies.
//
// `DirectTransport` backs an object injected into the page's global scope
// (Android `addJavascriptInterface`): calls return inline, nothing is ever
// pending. `CallbackTransport` backs a message channel (iOS
// `WKScriptMessageHandler`): content posts JSON, results come back as an
// injected call to `setPlatformInfo`.

use velo_core::protocol::{self, PLATFORM_INFO_CALLBACK};
use velo_core::types::{CallConvention, Platform};

use crate::dispatch::dispatch;
use crate::traits::{BridgeTransport, NativeHost, WebViewHandle};

/// Select the transport strategy a platform's WebView supports.
pub fn for_platform(platform: Platform) -> Box<dyn BridgeTransport> {
    match platform.call_convention() {
        CallConvention::Direct => Box::new(DirectTransport::new(platform.channel())),
        CallConvention::PostAndCallback => Box::new(CallbackTransport::new(platform.channel())),
    }
}

// ---------------------------------------------------------------------------
// Direct call
// ---------------------------------------------------------------------------

/// Stateless direct-call endpoint.
///
/// Holds no per-page state, so it is safe to invoke from whichever thread
/// the WebView delivers injected-object calls on.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    channel: String,
}

impl DirectTransport {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

impl BridgeTransport for DirectTransport {
    fn channel(&self) -> &str {
        &self.channel
    }

    fn convention(&self) -> CallConvention {
        CallConvention::Direct
    }

    fn call(&self, host: &dyn NativeHost, method: &str, args: &[&str]) -> Option<String> {
        let message = protocol::decode_call(&self.channel, method, args)?;
        tracing::debug!(channel = %self.channel, action = message.action.name(), "direct bridge call");
        dispatch(host, &message)
    }

    fn post(&mut self, _host: &dyn NativeHost, _webview: &mut dyn WebViewHandle, _body: &str) {
        tracing::debug!(channel = %self.channel, "post on a direct-call channel, dropping");
    }
}

// ---------------------------------------------------------------------------
// Post and callback
// ---------------------------------------------------------------------------

/// Message-channel endpoint.
///
/// Each post is decoded, executed and answered before `post` returns, so
/// calls on one channel complete in the order content issued them and no
/// request is ever pending host-side. A reply injected after the page has
/// been replaced is discarded in the page by the token guard that
/// [`protocol::callback_script`] wraps around it.
#[derive(Debug, Clone)]
pub struct CallbackTransport {
    channel: String,
}

impl CallbackTransport {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

impl BridgeTransport for CallbackTransport {
    fn channel(&self) -> &str {
        &self.channel
    }

    fn convention(&self) -> CallConvention {
        CallConvention::PostAndCallback
    }

    fn call(&self, _host: &dyn NativeHost, method: &str, _args: &[&str]) -> Option<String> {
        tracing::debug!(channel = %self.channel, method, "direct call on a message channel, dropping");
        None
    }

    fn post(&mut self, host: &dyn NativeHost, webview: &mut dyn WebViewHandle, body: &str) {
        let Some(message) = protocol::decode_post(&self.channel, body) else {
            return;
        };
        let Some(value) = dispatch(host, &message) else {
            return;
        };
        let script =
            protocol::callback_script(PLATFORM_INFO_CALLBACK, &value, message.page.as_deref());
        if let Err(e) = webview.evaluate_script(&script) {
            tracing::warn!(channel = %self.channel, error = %e, "callback injection failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{HostEvent, RecordingHost, RecordingWebView, WebViewEvent};
    use velo_core::{ANDROID_CHANNEL, IOS_CHANNEL};

    #[test]
    fn platform_selection() {
        let android = for_platform(Platform::Android);
        assert_eq!(android.channel(), ANDROID_CHANNEL);
        assert_eq!(android.convention(), CallConvention::Direct);

        let ios = for_platform(Platform::Ios);
        assert_eq!(ios.channel(), IOS_CHANNEL);
        assert_eq!(ios.convention(), CallConvention::PostAndCallback);
    }

    #[test]
    fn direct_call_returns_inline() {
        let host = RecordingHost::android("14", 34);
        let transport = DirectTransport::new(ANDROID_CHANNEL);
        assert_eq!(
            transport.call(&host, "getPlatformInfo", &[]).as_deref(),
            Some("Android 14 (SDK 34)")
        );
        assert_eq!(transport.call(&host, "showToast", &["hi"]), None);
        assert_eq!(host.toasts(), vec!["hi".to_string()]);
    }

    #[test]
    fn direct_unknown_method_has_no_effect() {
        let host = RecordingHost::android("14", 34);
        let transport = DirectTransport::new(ANDROID_CHANNEL);
        assert_eq!(transport.call(&host, "startCamera", &["now"]), None);
        assert!(host.events().is_empty());
    }

    #[test]
    fn direct_calls_run_in_issue_order() {
        let host = RecordingHost::android("14", 34);
        let transport = DirectTransport::new(ANDROID_CHANNEL);

        assert_eq!(transport.call(&host, "showToast", &["A"]), None);
        assert!(transport.call(&host, "getPlatformInfo", &[]).is_some());
        assert_eq!(transport.call(&host, "showToast", &["B"]), None);

        assert_eq!(
            host.events(),
            vec![
                HostEvent::Toast("A".into()),
                HostEvent::PlatformInfo,
                HostEvent::Toast("B".into()),
            ]
        );
    }

    #[test]
    fn post_delivers_result_through_callback_exactly_once() {
        let host = RecordingHost::ios("17.2");
        let mut webview = RecordingWebView::new();
        let mut transport = CallbackTransport::new(IOS_CHANNEL);

        transport.post(&host, &mut webview, r#"{"action":"getPlatformInfo"}"#);

        let scripts = webview.scripts();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains(r#"window.setPlatformInfo("iOS 17.2")"#));
    }

    #[test]
    fn post_toast_injects_nothing() {
        let host = RecordingHost::ios("17.2");
        let mut webview = RecordingWebView::new();
        let mut transport = CallbackTransport::new(IOS_CHANNEL);

        transport.post(&host, &mut webview, r#"{"action":"showToast","message":"Saved"}"#);

        assert_eq!(host.toasts(), vec!["Saved".to_string()]);
        assert!(webview.scripts().is_empty());
    }

    #[test]
    fn same_channel_calls_run_in_issue_order() {
        let host = RecordingHost::ios("17.2");
        let mut webview = RecordingWebView::new();
        let mut transport = CallbackTransport::new(IOS_CHANNEL);

        transport.post(&host, &mut webview, r#"{"action":"showToast","message":"A"}"#);
        transport.post(&host, &mut webview, r#"{"action":"getPlatformInfo"}"#);
        transport.post(&host, &mut webview, r#"{"action":"showToast","message":"B"}"#);

        assert_eq!(
            host.events(),
            vec![
                HostEvent::Toast("A".into()),
                HostEvent::PlatformInfo,
                HostEvent::Toast("B".into()),
            ]
        );
    }

    #[test]
    fn unknown_and_malformed_posts_have_no_effect() {
        let host = RecordingHost::ios("17.2");
        let mut webview = RecordingWebView::new();
        let mut transport = CallbackTransport::new(IOS_CHANNEL);

        for body in [
            r#"{"action":"vibrate"}"#,
            r#"{"action":"showToast"}"#,
            "{broken",
            "null",
        ] {
            transport.post(&host, &mut webview, body);
        }

        assert!(host.events().is_empty());
        assert!(webview.events().is_empty());
    }

    #[test]
    fn each_post_is_answered_before_it_returns() {
        let host = RecordingHost::ios("17.2");
        let mut webview = RecordingWebView::new();
        let mut transport = CallbackTransport::new(IOS_CHANNEL);

        transport.post(&host, &mut webview, r#"{"action":"getPlatformInfo","page":"p-1"}"#);
        assert_eq!(webview.scripts().len(), 1);
        transport.post(&host, &mut webview, r#"{"action":"getPlatformInfo","page":"p-2"}"#);

        let scripts = webview.scripts();
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].contains(r#"window.__veloPage === "p-1""#));
        assert!(scripts[1].contains(r#"window.__veloPage === "p-2""#));
        assert!(
            webview
                .events()
                .iter()
                .all(|e| matches!(e, WebViewEvent::Script(_)))
        );
    }

    #[test]
    fn desktop_uses_the_direct_strategy() {
        let desktop = for_platform(Platform::Desktop);
        assert_eq!(desktop.convention(), CallConvention::Direct);
        let host = RecordingHost::ios("17.2");
        assert_eq!(
            desktop.call(&host, "getPlatformInfo", &[]).as_deref(),
            Some("iOS 17.2")
        );
    }

    #[test]
    fn callbacks_are_guarded_by_page_token() {
        let host = RecordingHost::ios("17.2");
        let mut webview = RecordingWebView::new();
        let mut transport = CallbackTransport::new(IOS_CHANNEL);

        transport.post(&host, &mut webview, r#"{"action":"getPlatformInfo","page":"p-7"}"#);

        let scripts = webview.scripts();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].starts_with(r#"if (window.__veloPage === "p-7""#));
    }

    #[test]
    fn strategies_drop_the_other_convention() {
        let host = RecordingHost::ios("17.2");
        let mut webview = RecordingWebView::new();

        let mut direct = DirectTransport::new(ANDROID_CHANNEL);
        direct.post(&host, &mut webview, r#"{"action":"showToast","message":"x"}"#);

        let callback = CallbackTransport::new(IOS_CHANNEL);
        assert_eq!(callback.call(&host, "getPlatformInfo", &[]), None);

        assert!(host.events().is_empty());
        assert!(webview.events().is_empty());
    }
}
