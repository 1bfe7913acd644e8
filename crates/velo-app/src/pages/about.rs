// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// About page. The external link leaves the content origin, so the native
// shell opens it in the system browser instead of the WebView.

use dioxus::prelude::*;

const PROJECT_URL: &str = "https://github.com/hyperpolymath/velo";

#[component]
pub fn About() -> Element {
    rsx! {
        div {
            h1 { "About" }
            p {
                "A single web bundle served to Android and iOS shells. The shells expose two "
                "bridge actions: platform info and native toasts."
            }
            p {
                a { href: PROJECT_URL, style: "color: #007aff;", "Project page" }
            }
        }
    }
}
