// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub host for desktop/CI builds where no native mobile shell exists.
//
// Platform info describes the build host; toasts go to the log; opening
// external URLs is unavailable.

use velo_core::error::{Result, VeloError};
use velo_core::types::PlatformInfo;

use crate::traits::NativeHost;

/// No-op host returned on non-mobile platforms.
pub struct StubHost;

impl NativeHost for StubHost {
    fn platform_info(&self) -> Result<PlatformInfo> {
        Ok(PlatformInfo::new(
            "Desktop",
            format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH),
        ))
    }

    fn show_toast(&self, message: &str) -> Result<()> {
        tracing::info!(message, "toast (stub host)");
        Ok(())
    }

    fn open_external(&self, url: &str) -> Result<()> {
        tracing::warn!(url, "NativeHost::open_external called on stub host");
        Err(VeloError::PlatformUnavailable)
    }
}
