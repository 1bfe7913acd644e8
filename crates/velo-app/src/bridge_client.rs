// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Web-content side of the host bridge.
//
// Inside a native shell every call goes through `window.velo`, installed by
// the client shim (idempotent, so it is prefixed to each script rather than
// installed once and raced). The shim picks the direct Android object when
// present and falls back to posting on the iOS message channel. The desktop
// preview has neither and talks to the desktop host in-process instead.

#[cfg(not(feature = "desktop"))]
use dioxus::prelude::*;
#[cfg(not(feature = "desktop"))]
use velo_core::protocol::{CLIENT_SHIM, js_string_literal};

/// How long to wait for `setPlatformInfo` on the callback convention.
pub const PLATFORM_INFO_TIMEOUT_MS: u32 = 3000;

/// Ask the host for its platform description. `None` when there is no host
/// or it never answered.
#[cfg(not(feature = "desktop"))]
pub async fn platform_info() -> Option<String> {
    let script = with_shim(&format!(
        "return await window.velo.getPlatformInfo({PLATFORM_INFO_TIMEOUT_MS});"
    ));
    match document::eval(&script).await {
        Ok(serde_json::Value::String(info)) => Some(info),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = ?e, "platform info request failed");
            None
        }
    }
}

/// Request a native toast. `false` when no bridge is reachable.
#[cfg(not(feature = "desktop"))]
pub async fn show_toast(message: &str) -> bool {
    let script = with_shim(&format!(
        "return window.velo.showToast({});",
        js_string_literal(message)
    ));
    match document::eval(&script).await {
        Ok(serde_json::Value::Bool(sent)) => sent,
        Ok(_) => false,
        Err(e) => {
            tracing::warn!(error = ?e, "toast request failed");
            false
        }
    }
}

#[cfg(not(feature = "desktop"))]
fn with_shim(body: &str) -> String {
    format!("{CLIENT_SHIM}\n{body}")
}

#[cfg(feature = "desktop")]
pub async fn platform_info() -> Option<String> {
    desktop::call("getPlatformInfo", &[])
}

#[cfg(feature = "desktop")]
pub async fn show_toast(message: &str) -> bool {
    desktop::call("showToast", &[message]);
    true
}

#[cfg(feature = "desktop")]
mod desktop {
    use velo_core::types::Platform;

    pub fn call(method: &str, args: &[&str]) -> Option<String> {
        let host = velo_bridge::desktop_host();
        velo_bridge::transport::for_platform(Platform::current()).call(host.as_ref(), method, args)
    }
}
