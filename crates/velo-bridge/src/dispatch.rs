// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Action dispatch shared by both transports.

use velo_core::types::{BridgeAction, BridgeMessage};

use crate::traits::NativeHost;

/// Execute one decoded bridge message against `host`.
///
/// Returns the value content should receive, if the action has one. Native
/// failures are logged and swallowed: bridge actions are conveniences, and a
/// failure degrades to "feature unavailable" rather than an error in content.
pub fn dispatch(host: &dyn NativeHost, message: &BridgeMessage) -> Option<String> {
    match &message.action {
        BridgeAction::GetPlatformInfo => match host.platform_info() {
            Ok(info) => Some(info.to_string()),
            Err(e) => {
                tracing::warn!(channel = %message.channel, error = %e, "platform info unavailable");
                None
            }
        },
        BridgeAction::ShowToast { message: text } => {
            if let Err(e) = host.show_toast(text) {
                tracing::warn!(channel = %message.channel, error = %e, "toast failed");
            }
            None
        }
    }
}
