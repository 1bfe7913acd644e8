// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS host shell via objc2.
//
// Requires compilation with the iOS SDK (Xcode). The shell embeds a
// `WKWebView` into a view controller supplied by the app, registers a
// `WKScriptMessageHandler` under `iOSBridge`, and becomes the web view's
// `WKNavigationDelegate`.
//
// This module is cfg-gated to `target_os = "ios"`. Every entry point must run
// on the main thread; the shell lives in a main-thread thread-local slot and
// the ObjC delegate forwards into it, so the delegate holds no reference to
// the shell and the handler registration cannot form a retain cycle with it.
//
// ## Unsafe code
//
// 1. **ObjC message sends** (`msg_send!`): selectors are the documented
//    WebKit / UIKit / Foundation API. Main-thread requirements are checked
//    through `MainThreadMarker` before any UI object is touched.
// 2. **Class definitions** (`define_class!`): one `NSObject` subclass,
//    `MainThreadOnly`, without ivars.
// 3. **Blocks**: toast animations pass `RcBlock`s to UIKit, which copies
//    them before returning.

#![cfg(target_os = "ios")]

use std::cell::{Cell, RefCell};
use std::ffi::{CStr, c_char};
use std::path::PathBuf;
use std::rc::Rc;

use block2::{DynBlock, RcBlock};
use objc2::rc::{Allocated, Retained};
use objc2::runtime::{AnyObject, Bool, NSObject, NSObjectProtocol};
use objc2::{MainThreadMarker, MainThreadOnly, class, define_class, msg_send, sel};
use objc2_foundation::{NSDictionary, NSPoint, NSRect, NSSize, NSString, NSURL};
use objc2_ui_kit::UIApplication;
use objc2_web_kit::{
    WKNavigationAction, WKNavigationActionPolicy, WKNavigationDelegate, WKScriptMessage,
    WKScriptMessageHandler, WKUserContentController, WKWebView,
};

use velo_core::config::{ContentLocation, ShellConfig};
use velo_core::error::{Result, VeloError};
use velo_core::types::{BackAction, CallConvention, NavigationDecision, Platform, PlatformInfo};

use crate::shell::{HostShell, take_owned};
use crate::traits::{NativeHost, WebViewHandle, WebViewSettings};
use crate::transport;

/// Directory inside the app bundle that holds the web build.
const BUNDLE_ASSET_DIR: &str = "assets";

/// Config file read from the bundle when the app passes none.
const BUNDLE_CONFIG: &str = "velo.json";

/// How long a toast stays on screen before it fades.
const TOAST_SECONDS: f64 = 2.0;
const TOAST_FADE_SECONDS: f64 = 0.3;

/// Toast geometry, in points.
const TOAST_HEIGHT: f64 = 44.0;
const TOAST_MARGIN: f64 = 24.0;
const TOAST_SPACING: f64 = 8.0;

/// `NSTextAlignmentCenter` on iOS.
const TEXT_CENTER: isize = 1;

/// `UIViewAnimationOptionAllowUserInteraction`.
const ANIMATE_ALLOW_INTERACTION: usize = 1 << 1;

/// `UIViewAutoresizingFlexibleWidth | UIViewAutoresizingFlexibleHeight`.
const FLEXIBLE_SIZE: usize = 2 | 16;

/// `UIViewAutoresizingFlexibleWidth | UIViewAutoresizingFlexibleTopMargin`.
const PINNED_TO_BOTTOM: usize = 2 | 8;

thread_local! {
    static SHELL: RefCell<Option<HostShell<IosWebView, IosHost>>> = const { RefCell::new(None) };
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assert that we are on the main thread and return the marker.
fn require_main_thread() -> Result<MainThreadMarker> {
    MainThreadMarker::new()
        .ok_or_else(|| VeloError::Bridge("must be called from the main thread".into()))
}

/// `NSBundle.mainBundle.resourcePath`.
fn bundle_resources() -> Result<PathBuf> {
    // SAFETY: NSBundle mainBundle / resourcePath are read-only.
    let resources: Option<Retained<NSString>> = unsafe {
        let bundle: Retained<AnyObject> = msg_send![class!(NSBundle), mainBundle];
        msg_send![&bundle, resourcePath]
    };
    resources
        .map(|path| PathBuf::from(path.to_string()))
        .ok_or_else(|| VeloError::Bridge("main bundle has no resource path".into()))
}

/// Frame of the `slot`-th visible toast: full width minus margins, stacked
/// upwards from the bottom edge of a container of `size`.
fn toast_frame(size: NSSize, slot: usize) -> NSRect {
    let width = (size.width - 2.0 * TOAST_MARGIN).max(0.0);
    let y = size.height - TOAST_MARGIN - TOAST_HEIGHT - slot as f64 * (TOAST_HEIGHT + TOAST_SPACING);
    NSRect::new(NSPoint::new(TOAST_MARGIN, y), NSSize::new(width, TOAST_HEIGHT))
}

fn ns_url(url: &str) -> Result<Retained<NSURL>> {
    NSURL::URLWithString(&NSString::from_str(url))
        .ok_or_else(|| VeloError::Bridge(format!("not a valid NSURL: {url}")))
}

/// Convert a `WKScriptMessage.body` into the JSON text the protocol decoder
/// expects. Strings pass through; dictionaries and arrays are serialized.
fn body_as_json(body: &AnyObject) -> Option<String> {
    // SAFETY: isKindOfClass: / isValidJSONObject: are NSObject and
    // NSJSONSerialization class methods taking any object.
    unsafe {
        let is_string: bool = msg_send![body, isKindOfClass: class!(NSString)];
        if is_string {
            let text = &*(body as *const AnyObject as *const NSString);
            return Some(text.to_string());
        }

        let valid: bool = msg_send![class!(NSJSONSerialization), isValidJSONObject: body];
        if !valid {
            return None;
        }
        let data: Option<Retained<objc2_foundation::NSData>> = msg_send![
            class!(NSJSONSerialization),
            dataWithJSONObject: body,
            options: 0usize,
            error: std::ptr::null_mut::<*mut AnyObject>()
        ];
        data.map(|d| String::from_utf8_lossy(&d.to_vec()).into_owned())
    }
}

// ---------------------------------------------------------------------------
// Shell delegate (WKScriptMessageHandler + WKNavigationDelegate)
// ---------------------------------------------------------------------------

// SAFETY: NSObject subclass with no ivars. MainThreadOnly matches WebKit,
// which calls both protocols on the main thread.
define_class! {
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "VeloShellDelegate"]
    struct ShellDelegate;

    unsafe impl NSObjectProtocol for ShellDelegate {}

    unsafe impl WKScriptMessageHandler for ShellDelegate {
        #[unsafe(method(userContentController:didReceiveScriptMessage:))]
        fn did_receive(&self, _controller: &WKUserContentController, message: &WKScriptMessage) {
            // SAFETY: name / body are WKScriptMessage properties.
            let (name, body): (Retained<NSString>, Retained<AnyObject>) =
                unsafe { (msg_send![message, name], msg_send![message, body]) };
            let channel = name.to_string();

            let Some(json) = body_as_json(&body) else {
                tracing::debug!(channel = %channel, "dropping non-JSON bridge message");
                return;
            };

            SHELL.with(|slot| {
                if let Some(shell) = slot.borrow_mut().as_mut() {
                    shell.on_script_message(&channel, &json);
                }
            });
        }
    }

    unsafe impl WKNavigationDelegate for ShellDelegate {
        #[unsafe(method(webView:decidePolicyForNavigationAction:decisionHandler:))]
        fn decide_policy(
            &self,
            _web_view: &WKWebView,
            action: &WKNavigationAction,
            decision_handler: &DynBlock<dyn Fn(WKNavigationActionPolicy)>,
        ) {
            // SAFETY: request / URL / absoluteString are read-only properties.
            let url: Option<String> = unsafe {
                let request: Retained<AnyObject> = msg_send![action, request];
                let url: Option<Retained<NSURL>> = msg_send![&request, URL];
                url.and_then(|u| {
                    let abs: Option<Retained<NSString>> = msg_send![&u, absoluteString];
                    abs.map(|s| s.to_string())
                })
            };

            let decision = url.and_then(|url| {
                SHELL.with(|slot| slot.borrow().as_ref().map(|shell| shell.on_navigation(&url)))
            });

            let policy = match decision {
                Some(NavigationDecision::Externalize) => WKNavigationActionPolicy::Cancel,
                _ => WKNavigationActionPolicy::Allow,
            };
            decision_handler.call((policy,));
        }

        #[unsafe(method(webView:didStartProvisionalNavigation:))]
        fn did_start(&self, web_view: &WKWebView, _navigation: Option<&AnyObject>) {
            // SAFETY: URL is a WKWebView property.
            let url: String = unsafe {
                let url: Option<Retained<NSURL>> = msg_send![web_view, URL];
                url.and_then(|u| {
                    let abs: Option<Retained<NSString>> = msg_send![&u, absoluteString];
                    abs.map(|s| s.to_string())
                })
                .unwrap_or_default()
            };

            SHELL.with(|slot| {
                if let Some(shell) = slot.borrow_mut().as_mut() {
                    shell.on_page_started(&url);
                }
            });
        }
    }
}

impl ShellDelegate {
    fn new(mtm: MainThreadMarker) -> Retained<Self> {
        let this = mtm.alloc::<Self>().set_ivars(());
        // SAFETY: Standard NSObject init via super.
        unsafe { msg_send![super(this), init] }
    }
}

// ---------------------------------------------------------------------------
// NativeHost — UIDevice, toast overlay, UIApplication
// ---------------------------------------------------------------------------

/// Concrete iOS host, bound to the view controller that launched the shell.
pub struct IosHost {
    owner: Retained<AnyObject>,
    container: Retained<AnyObject>,
    /// Toasts currently on screen, used to stack new ones above them.
    visible_toasts: Rc<Cell<usize>>,
}

impl IosHost {
    pub fn new(owner: Retained<AnyObject>, container: Retained<AnyObject>) -> Self {
        Self {
            owner,
            container,
            visible_toasts: Rc::default(),
        }
    }

    fn is_owned_by(&self, view_controller: &AnyObject) -> bool {
        std::ptr::eq(&*self.owner, view_controller)
    }
}

impl NativeHost for IosHost {
    /// `UIDevice.currentDevice.systemVersion`. The name is always `iOS`;
    /// `systemName` reports `iPadOS` on tablets.
    fn platform_info(&self) -> Result<PlatformInfo> {
        let _mtm = require_main_thread()?;
        // SAFETY: UIDevice class property and string property; main thread
        // confirmed above.
        let version: Retained<NSString> = unsafe {
            let device: Retained<AnyObject> = msg_send![class!(UIDevice), currentDevice];
            msg_send![&device, systemVersion]
        };
        Ok(PlatformInfo::new("iOS", version.to_string()))
    }

    /// iOS has no toast. Show a non-interactive label near the bottom of the
    /// container, stacked above any toast still visible, and fade it out after
    /// `TOAST_SECONDS`. Nothing is presented modally, so overlapping toasts
    /// all show and the page keeps receiving touches.
    fn show_toast(&self, message: &str) -> Result<()> {
        let _mtm = require_main_thread()?;
        let text = NSString::from_str(message);
        let slot = self.visible_toasts.get();

        // SAFETY: UILabel / UIColor / CALayer setters and UIView hierarchy
        // calls on the main thread. The animation blocks own retained
        // references to the label.
        unsafe {
            let bounds: NSRect = msg_send![&self.container, bounds];
            let frame = toast_frame(bounds.size, slot);

            let alloc: Allocated<AnyObject> = msg_send![class!(UILabel), alloc];
            let label: Retained<AnyObject> = msg_send![alloc, initWithFrame: frame];
            let _: () = msg_send![&label, setText: &*text];
            let _: () = msg_send![&label, setTextAlignment: TEXT_CENTER];
            let _: () = msg_send![&label, setNumberOfLines: 0isize];
            let foreground: Retained<AnyObject> = msg_send![class!(UIColor), whiteColor];
            let _: () = msg_send![&label, setTextColor: &*foreground];
            let backdrop: Retained<AnyObject> =
                msg_send![class!(UIColor), colorWithWhite: 0.0f64, alpha: 0.8f64];
            let _: () = msg_send![&label, setBackgroundColor: &*backdrop];
            let layer: Retained<AnyObject> = msg_send![&label, layer];
            let _: () = msg_send![&layer, setCornerRadius: 10.0f64];
            let _: () = msg_send![&label, setClipsToBounds: true];
            let _: () = msg_send![&label, setUserInteractionEnabled: false];
            let _: () = msg_send![&label, setAutoresizingMask: PINNED_TO_BOTTOM];
            let _: () = msg_send![&self.container, addSubview: &*label];
            self.visible_toasts.set(slot + 1);

            let fading = label.clone();
            let animations: RcBlock<dyn Fn()> = RcBlock::new(move || {
                let _: () = msg_send![&fading, setAlpha: 0.0f64];
            });
            let visible = Rc::clone(&self.visible_toasts);
            let completion: RcBlock<dyn Fn(Bool)> = RcBlock::new(move |_finished: Bool| {
                let _: () = msg_send![&label, removeFromSuperview];
                visible.set(visible.get().saturating_sub(1));
            });
            let _: () = msg_send![
                class!(UIView),
                animateWithDuration: TOAST_FADE_SECONDS,
                delay: TOAST_SECONDS,
                options: ANIMATE_ALLOW_INTERACTION,
                animations: &*animations,
                completion: &*completion
            ];
        }
        Ok(())
    }

    /// `UIApplication.shared.open(url)` after a `canOpenURL` check.
    fn open_external(&self, url: &str) -> Result<()> {
        let mtm = require_main_thread()?;
        let app = UIApplication::sharedApplication(mtm);
        let ns_url = ns_url(url)?;

        // SAFETY: canOpenURL: / openURL:options:completionHandler: on the
        // shared application, main thread confirmed above.
        unsafe {
            let can_open: bool = msg_send![&app, canOpenURL: &*ns_url];
            if !can_open {
                return Err(VeloError::Bridge(format!("no handler for {url}")));
            }
            let options = NSDictionary::<NSString, AnyObject>::new();
            let _: () = msg_send![
                &app,
                openURL: &*ns_url,
                options: &*options,
                completionHandler: None::<&DynBlock<dyn Fn(Bool)>>
            ];
        }
        tracing::info!(url, "iOS: external URL dispatched");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WebViewHandle — WKWebView
// ---------------------------------------------------------------------------

/// WKWebView embedded in a container view.
///
/// WebKit copies its configuration when the view is created, so the view is
/// instantiated by `apply_settings`, not by `new`. Every later operation
/// fails with `WebViewGone` before that point and after `destroy`.
pub struct IosWebView {
    container: Retained<AnyObject>,
    configuration: Retained<AnyObject>,
    delegate: Retained<ShellDelegate>,
    webview: Option<Retained<AnyObject>>,
}

impl IosWebView {
    pub fn new(mtm: MainThreadMarker, container: Retained<AnyObject>) -> Self {
        // SAFETY: +new on WKWebViewConfiguration.
        let configuration: Retained<AnyObject> =
            unsafe { msg_send![class!(WKWebViewConfiguration), new] };
        Self {
            container,
            configuration,
            delegate: ShellDelegate::new(mtm),
            webview: None,
        }
    }

    fn live(&self) -> Result<&AnyObject> {
        self.webview.as_deref().ok_or(VeloError::WebViewGone)
    }

    fn content_controller(&self) -> Retained<AnyObject> {
        // SAFETY: userContentController is shared by reference between the
        // configuration and every web view created from it.
        unsafe { msg_send![&self.configuration, userContentController] }
    }
}

impl WebViewHandle for IosWebView {
    fn apply_settings(&mut self, settings: &WebViewSettings) -> Result<()> {
        // SAFETY: WKWebViewConfiguration / WKWebpagePreferences setters
        // before the web view exists; WKWebView alloc/init and UIView
        // hierarchy calls. `IosWebView::new` required a MainThreadMarker.
        let webview: Retained<AnyObject> = unsafe {
            let prefs: Retained<AnyObject> =
                msg_send![&self.configuration, defaultWebpagePreferences];
            let _: () = msg_send![&prefs, setAllowsContentJavaScript: settings.javascript];

            let store: Retained<AnyObject> = if settings.dom_storage {
                msg_send![class!(WKWebsiteDataStore), defaultDataStore]
            } else {
                msg_send![class!(WKWebsiteDataStore), nonPersistentDataStore]
            };
            let _: () = msg_send![&self.configuration, setWebsiteDataStore: &*store];

            let frame: NSRect = msg_send![&self.container, bounds];
            let alloc: Allocated<AnyObject> = msg_send![class!(WKWebView), alloc];
            let webview: Retained<AnyObject> =
                msg_send![alloc, initWithFrame: frame, configuration: &*self.configuration];

            let _: () = msg_send![&webview, setAutoresizingMask: FLEXIBLE_SIZE];
            let _: () = msg_send![&webview, setAllowsBackForwardNavigationGestures: true];

            // `inspectable` exists from iOS 16.4.
            let has_inspectable: bool =
                msg_send![&webview, respondsToSelector: sel!(setInspectable:)];
            if has_inspectable {
                let _: () = msg_send![&webview, setInspectable: settings.remote_debugging];
            }

            let _: () = msg_send![&self.container, addSubview: &*webview];
            webview
        };

        self.webview = Some(webview);
        tracing::info!(?settings, "iOS: WKWebView created");
        Ok(())
    }

    fn attach_navigation_handler(&mut self) -> Result<()> {
        let webview = self.live()?;
        // SAFETY: navigationDelegate is weak; `self.delegate` keeps it alive.
        unsafe {
            let _: () = msg_send![webview, setNavigationDelegate: &*self.delegate];
        }
        Ok(())
    }

    fn register_channel(&mut self, channel: &str, convention: CallConvention) -> Result<()> {
        if convention != CallConvention::PostAndCallback {
            return Err(VeloError::Bridge(format!(
                "WKWebView only supports message channels, got {convention:?}"
            )));
        }
        let controller = self.content_controller();
        let name = NSString::from_str(channel);
        // SAFETY: addScriptMessageHandler:name: retains the handler until
        // removeScriptMessageHandlerForName: in `unregister_channel`.
        unsafe {
            let _: () = msg_send![
                &controller,
                addScriptMessageHandler: &*self.delegate,
                name: &*name
            ];
        }
        tracing::info!(channel, "iOS: script message handler registered");
        Ok(())
    }

    fn unregister_channel(&mut self, channel: &str) -> Result<()> {
        let controller = self.content_controller();
        let name = NSString::from_str(channel);
        // SAFETY: removing an unregistered name is a no-op in WebKit.
        unsafe {
            let _: () = msg_send![&controller, removeScriptMessageHandlerForName: &*name];
        }
        Ok(())
    }

    fn load(&mut self, location: &ContentLocation) -> Result<()> {
        let webview = self.live()?;
        match location {
            ContentLocation::Remote(url) => {
                let ns_url = ns_url(url)?;
                tracing::info!(url = %url, "iOS: loading content");
                // SAFETY: NSURLRequest factory and WKWebView loadRequest:.
                unsafe {
                    let request: Retained<AnyObject> =
                        msg_send![class!(NSURLRequest), requestWithURL: &*ns_url];
                    let _: Option<Retained<AnyObject>> = msg_send![webview, loadRequest: &*request];
                }
            }
            ContentLocation::Bundled(entry) => {
                let path = bundle_resources()?.join(BUNDLE_ASSET_DIR).join(entry);
                let path = path.to_string_lossy();
                tracing::info!(path = %path, "iOS: loading bundled content");

                let file_url = NSURL::fileURLWithPath(&NSString::from_str(&path));
                // SAFETY: URLByDeletingLastPathComponent and
                // loadFileURL:allowingReadAccessToURL: (grants the asset dir).
                unsafe {
                    let dir: Option<Retained<NSURL>> =
                        msg_send![&file_url, URLByDeletingLastPathComponent];
                    let dir = dir.unwrap_or_else(|| file_url.clone());
                    let _: Option<Retained<AnyObject>> = msg_send![
                        webview,
                        loadFileURL: &*file_url,
                        allowingReadAccessToURL: &*dir
                    ];
                }
            }
        }
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        match self.live() {
            // SAFETY: canGoBack is a read-only WKWebView property.
            Ok(webview) => unsafe { msg_send![webview, canGoBack] },
            Err(_) => false,
        }
    }

    fn go_back(&mut self) -> Result<()> {
        let webview = self.live()?;
        // SAFETY: goBack returns the started WKNavigation or nil.
        unsafe {
            let _: Option<Retained<AnyObject>> = msg_send![webview, goBack];
        }
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str) -> Result<()> {
        let webview = self.live()?;
        let source = NSString::from_str(script);
        // SAFETY: evaluateJavaScript:completionHandler: with no handler.
        unsafe {
            let _: () = msg_send![
                webview,
                evaluateJavaScript: &*source,
                completionHandler: None::<&DynBlock<dyn Fn(*mut AnyObject, *mut AnyObject)>>
            ];
        }
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        let Some(webview) = self.webview.take() else {
            return Ok(());
        };
        // SAFETY: stopLoading, delegate reset, and removal from the view
        // hierarchy on the main thread.
        unsafe {
            let _: () = msg_send![&webview, stopLoading];
            let _: () = msg_send![&webview, setNavigationDelegate: None::<&AnyObject>];
            let _: () = msg_send![&webview, removeFromSuperview];
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Embed a shell into `view_controller`'s view and start loading content.
///
/// Replaces (and tears down) any shell created earlier.
pub fn launch(view_controller: &AnyObject, config: ShellConfig) -> Result<()> {
    crate::init_logging();
    let mtm = require_main_thread()?;

    // SAFETY: UIViewController.view loads the view if needed; main thread.
    let (container, owner): (Retained<AnyObject>, Retained<AnyObject>) = unsafe {
        let view: Retained<AnyObject> = msg_send![view_controller, view];
        let owner = Retained::retain(view_controller as *const AnyObject as *mut AnyObject)
            .ok_or_else(|| VeloError::Bridge("view controller is nil".into()))?;
        (view, owner)
    };

    let shell = HostShell::create(
        config,
        IosWebView::new(mtm, container.clone()),
        IosHost::new(owner, container),
        transport::for_platform(Platform::Ios),
    )?;

    let previous = SHELL.with(|slot| slot.borrow_mut().replace(shell));
    drop(previous);
    Ok(())
}

/// Like [`launch`], with the config read from `velo.json` in the app bundle.
pub fn launch_bundled(view_controller: &AnyObject) -> Result<()> {
    let config = ShellConfig::load(&bundle_resources()?.join(BUNDLE_CONFIG))?;
    launch(view_controller, config)
}

/// Step back in the web view's history. `false` means nothing to go back to,
/// or `view_controller` does not own the current shell.
pub fn go_back(view_controller: &AnyObject) -> bool {
    SHELL.with(|slot| {
        slot.borrow_mut()
            .as_mut()
            .filter(|shell| shell.host().is_owned_by(view_controller))
            .map(|shell| shell.on_back_pressed() == BackAction::WentBack)
            .unwrap_or(false)
    })
}

/// Tear down the shell `view_controller` launched. A shell launched since by
/// another view controller is left running.
pub fn teardown(view_controller: &AnyObject) {
    let shell = SHELL.with(|slot| {
        take_owned(slot, |shell| shell.host().is_owned_by(view_controller))
    });
    match shell {
        Some(mut shell) => shell.teardown(),
        None => tracing::debug!("iOS: teardown from a replaced view controller, shell kept"),
    }
}

/// C entry point for Swift / Objective-C app delegates.
///
/// A null `config_json` reads `velo.json` from the app bundle.
///
/// # Safety
///
/// `view_controller` must be a valid `UIViewController *` and `config_json`
/// null or a NUL-terminated UTF-8 string. Call on the main thread.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn velo_shell_launch(
    view_controller: *mut AnyObject,
    config_json: *const c_char,
) -> bool {
    if view_controller.is_null() {
        return false;
    }
    // SAFETY: caller contract above.
    let view_controller = unsafe { &*view_controller };
    let result = if config_json.is_null() {
        launch_bundled(view_controller)
    } else {
        // SAFETY: caller contract above.
        let json = unsafe { CStr::from_ptr(config_json) };
        json.to_str()
            .map_err(|e| VeloError::InvalidConfig(e.to_string()))
            .and_then(ShellConfig::from_json)
            .and_then(|config| launch(view_controller, config))
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "iOS: shell launch failed");
            false
        }
    }
}

/// C entry point: `true` if the web view went back.
///
/// # Safety
///
/// `view_controller` must be null or the `UIViewController *` passed to
/// `velo_shell_launch`. Call on the main thread.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn velo_shell_go_back(view_controller: *mut AnyObject) -> bool {
    // SAFETY: caller contract above.
    match unsafe { view_controller.as_ref() } {
        Some(view_controller) => go_back(view_controller),
        None => false,
    }
}

/// C entry point: release the web view and the bridge registration.
///
/// # Safety
///
/// As for `velo_shell_go_back`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn velo_shell_teardown(view_controller: *mut AnyObject) {
    // SAFETY: caller contract above.
    if let Some(view_controller) = unsafe { view_controller.as_ref() } {
        teardown(view_controller);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_toasts_stack_instead_of_replacing() {
        let screen = NSSize::new(390.0, 844.0);
        let first = toast_frame(screen, 0);
        let second = toast_frame(screen, 1);

        assert_eq!(first.origin.x, TOAST_MARGIN);
        assert_eq!(first.size.width, 390.0 - 2.0 * TOAST_MARGIN);
        assert_eq!(first.origin.y + first.size.height, 844.0 - TOAST_MARGIN);
        // The second sits fully above the first.
        assert!(second.origin.y + second.size.height <= first.origin.y);
    }

    #[test]
    fn lifecycle_calls_without_shell_are_ignored() {
        let controller = NSObject::new();
        assert!(!go_back(&controller));
        teardown(&controller);
        // SAFETY: null is part of the C contract.
        unsafe {
            assert!(!velo_shell_go_back(std::ptr::null_mut()));
            velo_shell_teardown(std::ptr::null_mut());
            assert!(!velo_shell_launch(std::ptr::null_mut(), std::ptr::null()));
        }
    }

    // Integration tests for WKWebView hosting require a running iOS app with
    // a key window. They are exercised in the Xcode test target rather than
    // via `cargo test`.
}
