// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire contract between web content and the host shells.
//
// Decoding is deliberately lenient: anything that is not a recognised,
// well-formed request decodes to `None` and is dropped by the caller. A newer
// web bundle talking to an older shell (or the reverse) must never fault.

use serde::Deserialize;
use serde_json::Value;

use crate::types::{BridgeAction, BridgeMessage};

/// Function the host calls inside the page to deliver a platform-info result
/// on the post-and-callback path. Content defines it before posting.
pub const PLATFORM_INFO_CALLBACK: &str = "setPlatformInfo";

/// Global the client shim stores its page token in.
pub const PAGE_TOKEN_GLOBAL: &str = "__veloPage";

/// JSON body posted on the post-and-callback channel.
///
/// Only `action` is typed. `message` and `page` stay raw so that a field of
/// the wrong type can be ignored by actions that do not use it instead of
/// failing the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WirePayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub page: Option<Value>,
}

fn into_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Map an action tag plus its optional argument onto a [`BridgeAction`].
pub fn parse_action(name: &str, message: Option<String>) -> Option<BridgeAction> {
    match name {
        "getPlatformInfo" => Some(BridgeAction::GetPlatformInfo),
        "showToast" => message.map(|message| BridgeAction::ShowToast { message }),
        other => {
            tracing::debug!(action = other, "ignoring unknown bridge action");
            None
        }
    }
}

/// Decode a JSON body posted on `channel`.
pub fn decode_post(channel: &str, body: &str) -> Option<BridgeMessage> {
    let payload: WirePayload = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(channel, error = %e, "dropping malformed bridge payload");
            return None;
        }
    };

    let Some(name) = payload.action else {
        tracing::debug!(channel, "dropping bridge payload without action");
        return None;
    };

    let action = parse_action(&name, into_string(payload.message))?;
    Some(BridgeMessage {
        channel: channel.to_owned(),
        action,
        page: into_string(payload.page),
    })
}

/// Decode a direct method call (`AndroidBridge.showToast("hi")`).
pub fn decode_call(channel: &str, method: &str, args: &[&str]) -> Option<BridgeMessage> {
    let message = args.first().map(|s| (*s).to_owned());
    let action = parse_action(method, message)?;
    Some(BridgeMessage::new(channel, action))
}

/// Quote `value` as a JavaScript string literal.
///
/// JSON string syntax is valid JS except for U+2028 / U+2029, which older
/// engines reject inside literals.
pub fn js_string_literal(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_owned()).to_string();
    quoted.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029")
}

/// Script that invokes `window.<function>(value)` inside the page.
///
/// With a page token, the call only happens if the page that posted the
/// request is still the one loaded.
pub fn callback_script(function: &str, value: &str, page: Option<&str>) -> String {
    let arg = js_string_literal(value);
    let target = format!("typeof window.{function} === \"function\"");
    match page {
        Some(token) => format!(
            "if (window.{PAGE_TOKEN_GLOBAL} === {} && {target}) {{ window.{function}({arg}); }}",
            js_string_literal(token)
        ),
        None => format!("if ({target}) {{ window.{function}({arg}); }}"),
    }
}

/// Client-side bridge shim evaluated by the web content at start-up.
///
/// Installs `window.velo` with `getPlatformInfo(timeoutMs)` and
/// `showToast(message)`. The direct `AndroidBridge` object is preferred; the
/// `iOSBridge` message handler is the fallback. Callback results are matched
/// to waiters in FIFO order, which the host's same-channel ordering makes
/// sound. A waiter that timed out still occupies its slot, so a late
/// callback is consumed by the stale entry instead of the next caller.
pub const CLIENT_SHIM: &str = r#"
(function () {
  if (window.velo) { return; }
  window.__veloPage = window.__veloPage ||
    (Date.now().toString(36) + Math.random().toString(36).slice(2));
  var waiting = [];
  window.setPlatformInfo = function (info) {
    var next = waiting.shift();
    if (next && !next.settled) { next.settled = true; next.resolve(info); }
  };
  function direct() { return window.AndroidBridge || null; }
  function channel() {
    var handlers = window.webkit && window.webkit.messageHandlers;
    return (handlers && handlers.iOSBridge) || null;
  }
  function post(body) {
    body.page = window.__veloPage;
    channel().postMessage(body);
  }
  window.velo = {
    getPlatformInfo: function (timeoutMs) {
      var bridge = direct();
      if (bridge && typeof bridge.getPlatformInfo === "function") {
        return Promise.resolve(bridge.getPlatformInfo());
      }
      if (!channel()) { return Promise.resolve(null); }
      return new Promise(function (resolve) {
        var entry = { settled: false, resolve: resolve };
        waiting.push(entry);
        setTimeout(function () {
          if (!entry.settled) { entry.settled = true; resolve(null); }
        }, timeoutMs || 3000);
        post({ action: "getPlatformInfo" });
      });
    },
    showToast: function (message) {
      var bridge = direct();
      if (bridge && typeof bridge.showToast === "function") {
        bridge.showToast(String(message));
        return true;
      }
      if (!channel()) { return false; }
      post({ action: "showToast", message: String(message) });
      return true;
    }
  };
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IOS_CHANNEL;

    #[test]
    fn decodes_recognised_actions() {
        let msg = decode_post(IOS_CHANNEL, r#"{"action":"getPlatformInfo","page":"p1"}"#).unwrap();
        assert_eq!(msg.action, BridgeAction::GetPlatformInfo);
        assert_eq!(msg.page.as_deref(), Some("p1"));
        assert_eq!(msg.channel, IOS_CHANNEL);

        let msg = decode_post(IOS_CHANNEL, r#"{"action":"showToast","message":"saved"}"#).unwrap();
        assert_eq!(
            msg.action,
            BridgeAction::ShowToast {
                message: "saved".into()
            }
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let msg = decode_post(
            IOS_CHANNEL,
            r#"{"action":"getPlatformInfo","version":7,"nested":{"a":1}}"#,
        );
        assert!(msg.is_some());
    }

    #[test]
    fn malformed_and_unknown_payloads_decode_to_none() {
        for body in [
            "",
            "not json",
            "[]",
            "42",
            r#""getPlatformInfo""#,
            r#"{}"#,
            r#"{"message":"orphan"}"#,
            r#"{"action":"showToast"}"#,
            r#"{"action":"vibrate"}"#,
            r#"{"action":42}"#,
        ] {
            assert!(decode_post(IOS_CHANNEL, body).is_none(), "{body:?}");
        }
    }

    #[test]
    fn direct_calls() {
        assert!(decode_call("AndroidBridge", "getPlatformInfo", &[]).is_some());
        assert!(decode_call("AndroidBridge", "showToast", &[]).is_none());
        assert!(decode_call("AndroidBridge", "openCamera", &["x"]).is_none());
        let msg = decode_call("AndroidBridge", "showToast", &["hello"]).unwrap();
        assert_eq!(
            msg.action,
            BridgeAction::ShowToast {
                message: "hello".into()
            }
        );
    }

    #[test]
    fn mistyped_optional_fields_do_not_sink_the_payload() {
        let msg = decode_post(IOS_CHANNEL, r#"{"action":"getPlatformInfo","message":5}"#).unwrap();
        assert_eq!(msg.action, BridgeAction::GetPlatformInfo);

        let msg = decode_post(IOS_CHANNEL, r#"{"action":"getPlatformInfo","page":{"id":1}}"#).unwrap();
        assert_eq!(msg.page, None);

        // showToast needs its message as text.
        assert!(decode_post(IOS_CHANNEL, r#"{"action":"showToast","message":5}"#).is_none());
        assert!(decode_post(IOS_CHANNEL, r#"{"action":"showToast","message":null}"#).is_none());
    }

    #[test]
    fn string_literals_escape_hostile_text() {
        assert_eq!(js_string_literal("iOS 17.2"), r#""iOS 17.2""#);
        assert_eq!(js_string_literal(r#"it's "x" \ y"#), r#""it's \"x\" \\ y""#);
        assert_eq!(js_string_literal("a\nb"), r#""a\nb""#);
        assert_eq!(js_string_literal("a\u{2028}b\u{2029}"), r#""a\u2028b\u2029""#);
    }

    #[test]
    fn callback_script_shape() {
        assert_eq!(
            callback_script(PLATFORM_INFO_CALLBACK, "iOS 17.2", None),
            r#"if (typeof window.setPlatformInfo === "function") { window.setPlatformInfo("iOS 17.2"); }"#
        );
        let guarded = callback_script(PLATFORM_INFO_CALLBACK, "iOS 17.2", Some("abc"));
        assert!(guarded.starts_with(r#"if (window.__veloPage === "abc" && "#));
        assert!(guarded.ends_with(r#"window.setPlatformInfo("iOS 17.2"); }"#));
    }

    /// Runs the shim and the injected callbacks in Node, replaying a reload
    /// between a request and its reply. Skipped where `node` is unavailable.
    #[test]
    fn stale_callback_never_reaches_the_reloaded_page() {
        use std::process::Command;

        match Command::new("node").arg("--version").output() {
            Ok(out) if out.status.success() => {}
            _ => {
                eprintln!("node not found, skipping page-token check");
                return;
            }
        }

        let stale = callback_script(PLATFORM_INFO_CALLBACK, "stale reply", Some("page-1"));
        let fresh = callback_script(PLATFORM_INFO_CALLBACK, "iOS 17.2", Some("page-2"));
        let program = [
            "globalThis.window = globalThis;\n",
            "var posted = [];\n",
            "window.webkit = { messageHandlers: { iOSBridge: { postMessage: function (b) { posted.push(b); } } } };\n",
            "window.__veloPage = 'page-1';\n",
            CLIENT_SHIM,
            "window.velo.getPlatformInfo(1000);\n",
            // New document: fresh globals, new token.
            "delete window.velo; delete window.setPlatformInfo;\n",
            "window.__veloPage = 'page-2';\n",
            CLIENT_SHIM,
            "window.velo.getPlatformInfo(1000).then(function (info) {\n",
            "  console.log('pages:' + JSON.stringify(posted.map(function (p) { return p.page; })));\n",
            "  console.log('resolved:' + info);\n",
            "  process.exit(0);\n",
            "});\n",
            &stale,
            "\n",
            &fresh,
            "\n",
        ]
        .concat();

        let output = Command::new("node").arg("-e").arg(&program).output().unwrap();
        assert!(
            output.status.success(),
            "{}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(r#"pages:["page-1","page-2"]"#), "{stdout}");
        assert!(stdout.contains("resolved:iOS 17.2"), "{stdout}");
    }

    #[test]
    fn shim_mentions_both_channels_and_the_callback() {
        assert!(CLIENT_SHIM.contains("AndroidBridge"));
        assert!(CLIENT_SHIM.contains("iOSBridge"));
        assert!(CLIENT_SHIM.contains(PLATFORM_INFO_CALLBACK));
        assert!(CLIENT_SHIM.contains(PAGE_TOKEN_GLOBAL));
    }
}
