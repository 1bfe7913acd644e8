// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Velo bridge.

use serde::{Deserialize, Serialize};

/// Channel the Android shell registers its injected bridge object under.
pub const ANDROID_CHANNEL: &str = "AndroidBridge";

/// Channel the iOS shell registers its script message handler under.
pub const IOS_CHANNEL: &str = "iOSBridge";

/// In-process channel of desktop previews. Never visible to page script.
pub const DESKTOP_CHANNEL: &str = "DesktopBridge";

/// Target platform of a host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Android,
    Ios,
    /// Desktop / CI builds where no native WebView host exists.
    Desktop,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Desktop
        }
    }

    /// Fixed bridge channel name for this platform.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Android => ANDROID_CHANNEL,
            Self::Ios => IOS_CHANNEL,
            Self::Desktop => DESKTOP_CHANNEL,
        }
    }

    /// How web content reaches the host on this platform.
    pub fn call_convention(&self) -> CallConvention {
        match self {
            // Desktop previews call the host in-process and get values back
            // inline.
            Self::Android | Self::Desktop => CallConvention::Direct,
            Self::Ios => CallConvention::PostAndCallback,
        }
    }
}

/// The two ways web content can invoke a bridge action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallConvention {
    /// Host functions are members of an injected global object; results are
    /// returned inline.
    Direct,
    /// Content posts an opaque payload; results come back through a
    /// host-injected call to a well-known callback function.
    PostAndCallback,
}

/// Description of the device the shell is running on.
///
/// Computed fresh for every request and handed to content by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Operating system name ("Android", "iOS", ...).
    pub os_name: String,
    /// Release string as reported by the OS ("14", "17.2").
    pub os_version: String,
    /// Android API level. `None` everywhere else.
    pub sdk_level: Option<u32>,
}

impl PlatformInfo {
    pub fn new(os_name: impl Into<String>, os_version: impl Into<String>) -> Self {
        Self {
            os_name: os_name.into(),
            os_version: os_version.into(),
            sdk_level: None,
        }
    }

    pub fn with_sdk_level(mut self, level: u32) -> Self {
        self.sdk_level = Some(level);
        self
    }
}

impl std::fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.os_name, self.os_version)?;
        if let Some(level) = self.sdk_level {
            write!(f, " (SDK {level})")?;
        }
        Ok(())
    }
}

/// A recognised bridge operation.
///
/// Unrecognised action tags never become a `BridgeAction`; they are dropped
/// during decoding (see [`crate::protocol`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeAction {
    /// No arguments, returns a platform description string.
    GetPlatformInfo,
    /// Show a transient native notification. No return value.
    ShowToast { message: String },
}

impl BridgeAction {
    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetPlatformInfo => "getPlatformInfo",
            Self::ShowToast { .. } => "showToast",
        }
    }
}

/// A request from web content addressed to one bridge channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeMessage {
    pub channel: String,
    pub action: BridgeAction,
    /// Token of the content instance that posted the message, if the client
    /// shim supplied one. Only meaningful on the post-and-callback path.
    pub page: Option<String>,
}

impl BridgeMessage {
    pub fn new(channel: impl Into<String>, action: BridgeAction) -> Self {
        Self {
            channel: channel.into(),
            action,
            page: None,
        }
    }
}

/// Outcome of the navigation policy for one navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the WebView follow the link.
    LoadInternally,
    /// Cancel in-WebView navigation and hand the URL to the system.
    Externalize,
}

/// Outcome of a back-navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// The WebView stepped back in its own history.
    WentBack,
    /// No history left; the platform default handler should run.
    Propagate,
}
