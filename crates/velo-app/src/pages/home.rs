// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Home page — counter, platform info, and native toast.

use dioxus::prelude::*;

use crate::bridge_client;
use crate::state::{AppState, PlatformInfoState};

#[component]
pub fn Home() -> Element {
    let mut state = use_context::<Signal<AppState>>();

    let count = state.read().count;
    let info = state.read().platform_info.clone();
    let loading = info == PlatformInfoState::Loading;

    rsx! {
        div {
            h1 { "Velo" }
            p { style: "color: #666;", "Web content hosted by a native shell" }

            // Counter
            div { style: "display: flex; align-items: center; gap: 12px; margin: 24px 0;",
                button {
                    style: "padding: 10px 20px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px;",
                    onclick: move |_| state.write().increment(),
                    "Count: {count}"
                }
            }

            // Platform info
            h2 { "Platform" }
            p { style: "font-family: monospace; padding: 8px; background: #f5f5f5; border-radius: 6px;",
                "{info.label()}"
            }
            button {
                style: "padding: 8px 16px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                disabled: loading,
                onclick: move |_| async move {
                    state.write().platform_info = PlatformInfoState::Loading;
                    let reply = bridge_client::platform_info().await;
                    tracing::info!(?reply, "platform info reply");
                    state.write().set_platform_info(reply);
                },
                "Get Platform Info"
            }

            // Toast
            h2 { style: "margin-top: 24px;", "Native toast" }
            button {
                style: "padding: 8px 16px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                onclick: move |_| async move {
                    let message = format!("Hello from the web! Count is {}", state.read().count);
                    let sent = bridge_client::show_toast(&message).await;
                    state.write().status_message = (!sent).then(|| "No native bridge available".to_string());
                },
                "Show Toast"
            }

            if let Some(msg) = state.read().status_message.clone() {
                p { style: "color: #c00; font-size: 14px; margin-top: 8px;", "{msg}" }
            }
        }
    }
}
