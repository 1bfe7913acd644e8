// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Velo — Core types, message contract and policies shared by the native
// shells and the web content.

pub mod config;
pub mod error;
pub mod navigation;
pub mod protocol;
pub mod types;

pub use config::{ContentSource, DevServer, ShellConfig};
pub use error::VeloError;
pub use navigation::NavigationPolicy;
pub use types::*;
