// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording test doubles for `NativeHost` and `WebViewHandle`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use velo_core::config::ContentLocation;
use velo_core::error::{Result, VeloError};
use velo_core::types::{CallConvention, PlatformInfo};

use crate::traits::{NativeHost, WebViewHandle, WebViewSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    PlatformInfo,
    Toast(String),
    OpenExternal(String),
}

/// Host that records every privileged operation in call order.
pub struct RecordingHost {
    info: Option<PlatformInfo>,
    events: RefCell<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn android(release: &str, sdk: u32) -> Self {
        Self {
            info: Some(PlatformInfo::new("Android", release).with_sdk_level(sdk)),
            events: RefCell::default(),
        }
    }

    pub fn ios(version: &str) -> Self {
        Self {
            info: Some(PlatformInfo::new("iOS", version)),
            events: RefCell::default(),
        }
    }

    /// Every operation fails and records nothing.
    pub fn failing() -> Self {
        Self {
            info: None,
            events: RefCell::default(),
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                HostEvent::Toast(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn opened(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                HostEvent::OpenExternal(u) => Some(u.clone()),
                _ => None,
            })
            .collect()
    }
}

impl NativeHost for RecordingHost {
    fn platform_info(&self) -> Result<PlatformInfo> {
        let info = self.info.clone().ok_or(VeloError::PlatformUnavailable)?;
        self.events.borrow_mut().push(HostEvent::PlatformInfo);
        Ok(info)
    }

    fn show_toast(&self, message: &str) -> Result<()> {
        if self.info.is_none() {
            return Err(VeloError::Bridge("toast service gone".into()));
        }
        self.events
            .borrow_mut()
            .push(HostEvent::Toast(message.to_owned()));
        Ok(())
    }

    fn open_external(&self, url: &str) -> Result<()> {
        if self.info.is_none() {
            return Err(VeloError::Bridge("no activity found to handle intent".into()));
        }
        self.events
            .borrow_mut()
            .push(HostEvent::OpenExternal(url.to_owned()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebViewEvent {
    Settings(WebViewSettings),
    NavigationHandler,
    Register(String, CallConvention),
    Unregister(String),
    Load(ContentLocation),
    GoBack,
    Script(String),
    Destroy,
}

/// WebView whose log outlives the shell that owns it (clones share state).
#[derive(Clone, Default)]
pub struct RecordingWebView {
    log: Rc<RefCell<Vec<WebViewEvent>>>,
    history: Rc<Cell<usize>>,
    fail_load: bool,
}

impl RecordingWebView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `depth` entries behind the current page.
    pub fn with_history(depth: usize) -> Self {
        let webview = Self::default();
        webview.history.set(depth);
        webview
    }

    /// Every `load` fails, as a WebView with no network stack would.
    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<WebViewEvent> {
        self.log.borrow().clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                WebViewEvent::Script(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: WebViewEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl WebViewHandle for RecordingWebView {
    fn apply_settings(&mut self, settings: &WebViewSettings) -> Result<()> {
        self.record(WebViewEvent::Settings(*settings));
        Ok(())
    }

    fn attach_navigation_handler(&mut self) -> Result<()> {
        self.record(WebViewEvent::NavigationHandler);
        Ok(())
    }

    fn register_channel(&mut self, channel: &str, convention: CallConvention) -> Result<()> {
        self.record(WebViewEvent::Register(channel.to_owned(), convention));
        Ok(())
    }

    fn unregister_channel(&mut self, channel: &str) -> Result<()> {
        self.record(WebViewEvent::Unregister(channel.to_owned()));
        Ok(())
    }

    fn load(&mut self, location: &ContentLocation) -> Result<()> {
        if self.fail_load {
            return Err(VeloError::Bridge("load refused".into()));
        }
        self.record(WebViewEvent::Load(location.clone()));
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        self.history.get() > 0
    }

    fn go_back(&mut self) -> Result<()> {
        self.history.set(self.history.get().saturating_sub(1));
        self.record(WebViewEvent::GoBack);
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str) -> Result<()> {
        self.record(WebViewEvent::Script(script.to_owned()));
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        self.record(WebViewEvent::Destroy);
        Ok(())
    }
}
