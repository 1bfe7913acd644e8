// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Velo web content.
//
// Entry point. Initialises logging and app state, and launches the Dioxus UI.
// The same bundle runs inside the Android and iOS shells; `bridge_client`
// hides which bridge convention the host uses.

mod bridge_client;
mod pages;
mod state;

use dioxus::prelude::*;

use pages::about::About;
use pages::home::Home;

fn main() {
    #[cfg(feature = "desktop")]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Velo web content starting");

    dioxus::launch(app);
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(Shell)]
    #[route("/")]
    Home {},
    #[route("/about")]
    About {},
}

/// Root component.
fn app() -> Element {
    use_context_provider(|| Signal::new(state::AppState::default()));

    rsx! {
        Router::<Route> {}
    }
}

/// Page frame with a two-link header.
#[component]
fn Shell() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            nav { class: "top-bar",
                style: "display: flex; gap: 16px; padding: 12px 16px; border-bottom: 1px solid #e0e0e0; background: #fafafa;",
                Link { to: Route::Home {}, style: "text-decoration: none; color: #333;", "Home" }
                Link { to: Route::About {}, style: "text-decoration: none; color: #333;", "About" }
            }

            div { class: "page-content",
                style: "flex: 1; padding: 16px;",
                Outlet::<Route> {}
            }
        }
    }
}
