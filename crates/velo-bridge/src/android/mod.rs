// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android host shell via JNI.
//
// The Kotlin glue in `platform/android` is a thin forwarder: `ShellActivity`
// owns the `android.webkit.WebView` view and passes it to `nativeCreate`;
// `ShellWebViewClient` forwards `shouldOverrideUrlLoading` / `onPageStarted`;
// `VeloBridge` is the object injected as `window.AndroidBridge` and forwards
// each `@JavascriptInterface` method to `nativeCall`.
//
// ## Threading
//
// Activity and WebViewClient callbacks arrive on the UI thread, where the
// shell lives in a thread-local slot. `@JavascriptInterface` methods arrive
// on the WebView's JavaBridge thread, so direct calls do not go through the
// shell: they use a `DirectTransport` (stateless) against the host published
// in `DIRECT_HOST`. Both actions dispatch inline on that thread, in call
// order: `getPlatformInfo` only reads `Build` statics, and `showToast` only
// queues the toast on the UI thread.
//
// ## Ownership
//
// One Activity owns the shell at a time. A newer `nativeCreate` replaces
// it; lifecycle calls from any other Activity (an older instance being
// destroyed late) are ignored.

#![cfg(target_os = "android")]

use std::cell::RefCell;
use std::sync::{Arc, RwLock};

use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jstring};
use jni::{JNIEnv, JavaVM};

use velo_core::config::{ContentLocation, ShellConfig};
use velo_core::error::{Result, VeloError};
use velo_core::types::{ANDROID_CHANNEL, BackAction, CallConvention, NavigationDecision, Platform, PlatformInfo};

use crate::shell::{HostShell, take_owned};
use crate::traits::{BridgeTransport, NativeHost, WebViewHandle, WebViewSettings};
use crate::transport::{self, DirectTransport};

/// Class injected into the page as the bridge object.
const BRIDGE_CLASS: &str = "com/velo/shell/VeloBridge";

/// `WebViewClient` subclass that forwards navigation callbacks to Rust.
const CLIENT_CLASS: &str = "com/velo/shell/ShellWebViewClient";

/// `Runnable` that shows one toast.
const TOAST_TASK_CLASS: &str = "com/velo/shell/ToastTask";

/// Root URL of the APK's `assets/` directory as seen by the WebView.
const ASSET_ROOT: &str = "file:///android_asset/";

/// `Toast.LENGTH_SHORT`.
const TOAST_LENGTH_SHORT: i32 = 0;

thread_local! {
    /// The shell owned by the UI thread. Only one Activity hosts a shell.
    static SHELL: RefCell<Option<HostShell<AndroidWebView, AndroidHost>>> = const { RefCell::new(None) };
}

/// Host reachable from the JavaBridge thread. Cleared on teardown so a late
/// call cannot reach a destroyed Activity.
static DIRECT_HOST: RwLock<Option<AndroidHost>> = RwLock::new(None);

// ---------------------------------------------------------------------------
// JNI helpers
// ---------------------------------------------------------------------------

/// Map a JNI failure into `VeloError::Bridge`, clearing any pending Java
/// exception so later JNI calls on this thread stay legal.
fn jni_err(env: &mut JNIEnv<'_>, context: &str, e: jni::errors::Error) -> VeloError {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    VeloError::Bridge(format!("{context}: {e}"))
}

fn read_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> Option<String> {
    if value.is_null() {
        return None;
    }
    env.get_string(value).ok().map(String::from)
}

fn as_jboolean(flag: bool) -> jboolean {
    if flag { JNI_TRUE } else { JNI_FALSE }
}

// ---------------------------------------------------------------------------
// NativeHost — android.os.Build, android.widget.Toast, Intent.ACTION_VIEW
// ---------------------------------------------------------------------------

/// Android implementation of the privileged host operations.
///
/// Holds the process `JavaVM` and a global reference to the hosting
/// Activity; cloning shares both.
#[derive(Clone)]
pub struct AndroidHost {
    vm: Arc<JavaVM>,
    activity: GlobalRef,
}

impl AndroidHost {
    pub fn new(vm: Arc<JavaVM>, activity: GlobalRef) -> Self {
        Self { vm, activity }
    }

    pub fn activity(&self) -> &JObject<'static> {
        self.activity.as_obj()
    }
}

impl NativeHost for AndroidHost {
    /// `Build.VERSION.RELEASE` plus `Build.VERSION.SDK_INT`.
    fn platform_info(&self) -> Result<PlatformInfo> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| VeloError::Bridge(format!("failed to attach JNI thread: {e}")))?;

        let release = match env.get_static_field("android/os/Build$VERSION", "RELEASE", "Ljava/lang/String;") {
            Ok(value) => value.l().map_err(|e| jni_err(&mut env, "RELEASE->l", e))?,
            Err(e) => return Err(jni_err(&mut env, "Build.VERSION.RELEASE", e)),
        };
        let release = read_string(&mut env, &JString::from(release)).unwrap_or_default();

        let sdk = match env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I") {
            Ok(value) => value.i().map_err(|e| jni_err(&mut env, "SDK_INT->i", e))?,
            Err(e) => return Err(jni_err(&mut env, "Build.VERSION.SDK_INT", e)),
        };

        Ok(PlatformInfo::new("Android", release).with_sdk_level(sdk.max(0) as u32))
    }

    /// Queue `Toast.makeText(activity, message, LENGTH_SHORT).show()` on the
    /// UI thread through `Activity.runOnUiThread`. The call itself returns as
    /// soon as the toast is queued, so it is safe on the JavaBridge thread
    /// and toasts appear in call order.
    fn show_toast(&self, message: &str) -> Result<()> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| VeloError::Bridge(format!("failed to attach JNI thread: {e}")))?;

        let text: JString = match env.new_string(message) {
            Ok(text) => text,
            Err(e) => return Err(jni_err(&mut env, "new_string(toast)", e)),
        };

        let task = match env.new_object(
            TOAST_TASK_CLASS,
            "(Landroid/content/Context;Ljava/lang/String;I)V",
            &[
                JValue::Object(self.activity.as_obj()),
                JValue::Object(&text),
                JValue::Int(TOAST_LENGTH_SHORT),
            ],
        ) {
            Ok(task) => task,
            Err(e) => return Err(jni_err(&mut env, "new ToastTask", e)),
        };

        if let Err(e) = env.call_method(
            self.activity.as_obj(),
            "runOnUiThread",
            "(Ljava/lang/Runnable;)V",
            &[JValue::Object(&task)],
        ) {
            return Err(jni_err(&mut env, "runOnUiThread(ToastTask)", e));
        }
        Ok(())
    }

    /// Launch an `ACTION_VIEW` intent for `url`.
    fn open_external(&self, url: &str) -> Result<()> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| VeloError::Bridge(format!("failed to attach JNI thread: {e}")))?;

        let j_url: JString = match env.new_string(url) {
            Ok(s) => s,
            Err(e) => return Err(jni_err(&mut env, "new_string(url)", e)),
        };
        let uri = env.call_static_method(
            "android/net/Uri",
            "parse",
            "(Ljava/lang/String;)Landroid/net/Uri;",
            &[JValue::Object(&j_url)],
        );
        let uri: JObject = match uri.and_then(|v| v.l()) {
            Ok(uri) => uri,
            Err(e) => return Err(jni_err(&mut env, "Uri.parse", e)),
        };

        let j_action: JString = match env.new_string("android.intent.action.VIEW") {
            Ok(s) => s,
            Err(e) => return Err(jni_err(&mut env, "new_string(ACTION_VIEW)", e)),
        };
        let intent = match env.new_object(
            "android/content/Intent",
            "(Ljava/lang/String;Landroid/net/Uri;)V",
            &[JValue::Object(&j_action), JValue::Object(&uri)],
        ) {
            Ok(intent) => intent,
            Err(e) => return Err(jni_err(&mut env, "new Intent", e)),
        };

        // ActivityNotFoundException lands here and is cleared by jni_err.
        if let Err(e) = env.call_method(
            self.activity.as_obj(),
            "startActivity",
            "(Landroid/content/Intent;)V",
            &[JValue::Object(&intent)],
        ) {
            return Err(jni_err(&mut env, "startActivity(ACTION_VIEW)", e));
        }

        tracing::info!(url, "Android: external URL dispatched");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WebViewHandle — android.webkit.WebView
// ---------------------------------------------------------------------------

/// The Activity's `WebView`, held through a global reference.
pub struct AndroidWebView {
    vm: Arc<JavaVM>,
    webview: GlobalRef,
    /// The injected `VeloBridge` instance while registered.
    bridge: Option<GlobalRef>,
}

impl AndroidWebView {
    pub fn new(vm: Arc<JavaVM>, webview: GlobalRef) -> Self {
        Self {
            vm,
            webview,
            bridge: None,
        }
    }

    fn env(&self) -> Result<jni::AttachGuard<'_>> {
        self.vm
            .attach_current_thread()
            .map_err(|e| VeloError::Bridge(format!("failed to attach JNI thread: {e}")))
    }

    /// Call a `void` WebView method taking at most one argument.
    fn call_void(&self, name: &str, sig: &str, args: &[JValue<'_, '_>]) -> Result<()> {
        let mut env = self.env()?;
        match env.call_method(self.webview.as_obj(), name, sig, args) {
            Ok(_) => Ok(()),
            Err(e) => Err(jni_err(&mut env, name, e)),
        }
    }

    fn call_with_string(&self, name: &str, value: &str) -> Result<()> {
        let mut env = self.env()?;
        let j_value: JString = match env.new_string(value) {
            Ok(s) => s,
            Err(e) => return Err(jni_err(&mut env, "new_string", e)),
        };
        match env.call_method(
            self.webview.as_obj(),
            name,
            "(Ljava/lang/String;)V",
            &[JValue::Object(&j_value)],
        ) {
            Ok(_) => Ok(()),
            Err(e) => Err(jni_err(&mut env, name, e)),
        }
    }
}

impl WebViewHandle for AndroidWebView {
    fn apply_settings(&mut self, settings: &WebViewSettings) -> Result<()> {
        let mut env = self.env()?;

        let web_settings = env.call_method(
            self.webview.as_obj(),
            "getSettings",
            "()Landroid/webkit/WebSettings;",
            &[],
        );
        let web_settings: JObject = match web_settings.and_then(|v| v.l()) {
            Ok(s) => s,
            Err(e) => return Err(jni_err(&mut env, "getSettings", e)),
        };

        for (setter, flag) in [
            ("setJavaScriptEnabled", settings.javascript),
            ("setDomStorageEnabled", settings.dom_storage),
            ("setAllowFileAccess", true),
        ] {
            if let Err(e) = env.call_method(&web_settings, setter, "(Z)V", &[JValue::Bool(as_jboolean(flag))]) {
                return Err(jni_err(&mut env, setter, e));
            }
        }

        // Process-wide switch; only ever turned on, never off, so a debug
        // Activity does not disable inspection for a sibling.
        if settings.remote_debugging {
            if let Err(e) = env.call_static_method(
                "android/webkit/WebView",
                "setWebContentsDebuggingEnabled",
                "(Z)V",
                &[JValue::Bool(JNI_TRUE)],
            ) {
                return Err(jni_err(&mut env, "setWebContentsDebuggingEnabled", e));
            }
        }

        tracing::info!(?settings, "Android: WebView configured");
        Ok(())
    }

    fn attach_navigation_handler(&mut self) -> Result<()> {
        let mut env = self.env()?;
        let client = match env.new_object(CLIENT_CLASS, "()V", &[]) {
            Ok(client) => client,
            Err(e) => return Err(jni_err(&mut env, "new ShellWebViewClient", e)),
        };
        match env.call_method(
            self.webview.as_obj(),
            "setWebViewClient",
            "(Landroid/webkit/WebViewClient;)V",
            &[JValue::Object(&client)],
        ) {
            Ok(_) => Ok(()),
            Err(e) => Err(jni_err(&mut env, "setWebViewClient", e)),
        }
    }

    fn register_channel(&mut self, channel: &str, convention: CallConvention) -> Result<()> {
        if convention != CallConvention::Direct {
            return Err(VeloError::Bridge(format!(
                "Android WebView only injects direct-call objects, got {convention:?}"
            )));
        }

        let mut env = self.env()?;
        let bridge = match env.new_object(BRIDGE_CLASS, "()V", &[]) {
            Ok(bridge) => bridge,
            Err(e) => return Err(jni_err(&mut env, "new VeloBridge", e)),
        };
        let j_channel: JString = match env.new_string(channel) {
            Ok(s) => s,
            Err(e) => return Err(jni_err(&mut env, "new_string(channel)", e)),
        };
        if let Err(e) = env.call_method(
            self.webview.as_obj(),
            "addJavascriptInterface",
            "(Ljava/lang/Object;Ljava/lang/String;)V",
            &[JValue::Object(&bridge), JValue::Object(&j_channel)],
        ) {
            return Err(jni_err(&mut env, "addJavascriptInterface", e));
        }
        let global = match env.new_global_ref(&bridge) {
            Ok(global) => global,
            Err(e) => return Err(jni_err(&mut env, "new_global_ref(bridge)", e)),
        };
        drop(env);

        self.bridge = Some(global);
        tracing::info!(channel, "Android: bridge object injected");
        Ok(())
    }

    fn unregister_channel(&mut self, channel: &str) -> Result<()> {
        self.call_with_string("removeJavascriptInterface", channel)?;
        self.bridge = None;
        Ok(())
    }

    fn load(&mut self, location: &ContentLocation) -> Result<()> {
        let url = match location {
            ContentLocation::Remote(url) => url.clone(),
            ContentLocation::Bundled(path) => format!("{ASSET_ROOT}{path}"),
        };
        tracing::info!(url = %url, "Android: loading content");
        self.call_with_string("loadUrl", &url)
    }

    fn can_go_back(&self) -> bool {
        let Ok(mut env) = self.env() else {
            return false;
        };
        match env.call_method(self.webview.as_obj(), "canGoBack", "()Z", &[]) {
            Ok(value) => value.z().unwrap_or(false),
            Err(e) => {
                let err = jni_err(&mut env, "canGoBack", e);
                tracing::warn!(error = %err, "Android: history query failed");
                false
            }
        }
    }

    fn go_back(&mut self) -> Result<()> {
        self.call_void("goBack", "()V", &[])
    }

    fn evaluate_script(&mut self, script: &str) -> Result<()> {
        let mut env = self.env()?;
        let j_script: JString = match env.new_string(script) {
            Ok(s) => s,
            Err(e) => return Err(jni_err(&mut env, "new_string(script)", e)),
        };
        let no_callback = JObject::null();
        match env.call_method(
            self.webview.as_obj(),
            "evaluateJavascript",
            "(Ljava/lang/String;Landroid/webkit/ValueCallback;)V",
            &[JValue::Object(&j_script), JValue::Object(&no_callback)],
        ) {
            Ok(_) => Ok(()),
            Err(e) => Err(jni_err(&mut env, "evaluateJavascript", e)),
        }
    }

    fn destroy(&mut self) -> Result<()> {
        self.call_void("stopLoading", "()V", &[])?;
        self.call_void("destroy", "()V", &[])
    }
}

// ---------------------------------------------------------------------------
// JNI entry points — com.velo.shell.ShellActivity
// ---------------------------------------------------------------------------

fn create_shell(
    env: &mut JNIEnv<'_>,
    activity: &JObject<'_>,
    webview: &JObject<'_>,
    config_json: &JString<'_>,
) -> Result<()> {
    let json = read_string(env, config_json)
        .ok_or_else(|| VeloError::InvalidConfig("config JSON is null".into()))?;
    let config = ShellConfig::from_json(&json)?;

    let vm = match env.get_java_vm() {
        Ok(vm) => Arc::new(vm),
        Err(e) => return Err(jni_err(env, "get_java_vm", e)),
    };
    let activity = match env.new_global_ref(activity) {
        Ok(global) => global,
        Err(e) => return Err(jni_err(env, "new_global_ref(activity)", e)),
    };
    let webview = match env.new_global_ref(webview) {
        Ok(global) => global,
        Err(e) => return Err(jni_err(env, "new_global_ref(webview)", e)),
    };

    let host = AndroidHost::new(Arc::clone(&vm), activity);
    let shell = HostShell::create(
        config,
        AndroidWebView::new(vm, webview),
        host.clone(),
        transport::for_platform(Platform::Android),
    )?;

    // A recreated Activity replaces (and tears down) the previous shell.
    let previous = SHELL.with(|slot| slot.borrow_mut().replace(shell));
    drop(previous);
    if let Ok(mut direct) = DIRECT_HOST.write() {
        *direct = Some(host);
    }
    Ok(())
}

/// Whether `shell` was created for `activity`.
fn is_owner(
    env: &JNIEnv<'_>,
    shell: &HostShell<AndroidWebView, AndroidHost>,
    activity: &JObject<'_>,
) -> bool {
    env.is_same_object(shell.host().activity(), activity)
        .unwrap_or(false)
}

/// `external fun nativeCreate(webView: WebView, configJson: String): Boolean`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_velo_shell_ShellActivity_nativeCreate<'local>(
    mut env: JNIEnv<'local>,
    activity: JObject<'local>,
    webview: JObject<'local>,
    config_json: JString<'local>,
) -> jboolean {
    crate::init_logging();
    match create_shell(&mut env, &activity, &webview, &config_json) {
        Ok(()) => JNI_TRUE,
        Err(e) => {
            tracing::error!(error = %e, "Android: shell creation failed");
            JNI_FALSE
        }
    }
}

/// `external fun nativeShouldOverrideUrlLoading(url: String): Boolean`
///
/// `true` cancels the in-WebView load (the URL was handed to the system).
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_velo_shell_ShellWebViewClient_nativeShouldOverrideUrlLoading<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    url: JString<'local>,
) -> jboolean {
    let Some(url) = read_string(&mut env, &url) else {
        return JNI_FALSE;
    };
    let decision = SHELL.with(|slot| slot.borrow().as_ref().map(|shell| shell.on_navigation(&url)));
    as_jboolean(decision == Some(NavigationDecision::Externalize))
}

/// `external fun nativeOnPageStarted(url: String)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_velo_shell_ShellWebViewClient_nativeOnPageStarted<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    url: JString<'local>,
) {
    let url = read_string(&mut env, &url).unwrap_or_default();
    SHELL.with(|slot| {
        if let Some(shell) = slot.borrow_mut().as_mut() {
            shell.on_page_started(&url);
        }
    });
}

/// `external fun nativeOnBackPressed(): Boolean`
///
/// `false` tells the Activity to run `super.onBackPressed()`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_velo_shell_ShellActivity_nativeOnBackPressed<'local>(
    env: JNIEnv<'local>,
    this: JObject<'local>,
) -> jboolean {
    let action = SHELL.with(|slot| {
        slot.borrow_mut()
            .as_mut()
            .filter(|shell| is_owner(&env, shell, &this))
            .map(|shell| shell.on_back_pressed())
    });
    as_jboolean(action == Some(BackAction::WentBack))
}

/// `external fun nativeDestroy()`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_velo_shell_ShellActivity_nativeDestroy<'local>(
    env: JNIEnv<'local>,
    this: JObject<'local>,
) {
    let shell = SHELL.with(|slot| take_owned(slot, |shell| is_owner(&env, shell, &this)));
    let Some(mut shell) = shell else {
        tracing::debug!("Android: destroy from a replaced Activity, shell kept");
        return;
    };
    if let Ok(mut direct) = DIRECT_HOST.write() {
        *direct = None;
    }
    shell.teardown();
}

// ---------------------------------------------------------------------------
// JNI entry point — com.velo.shell.VeloBridge (JavaBridge thread)
// ---------------------------------------------------------------------------

/// `external fun nativeCall(method: String, arg: String?): String?`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_velo_shell_VeloBridge_nativeCall<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    method: JString<'local>,
    arg: JString<'local>,
) -> jstring {
    let Some(method) = read_string(&mut env, &method) else {
        return std::ptr::null_mut();
    };
    let arg = read_string(&mut env, &arg);
    let args: Vec<&str> = arg.as_deref().into_iter().collect();

    let host = match DIRECT_HOST.read() {
        Ok(guard) => guard.clone(),
        Err(_) => None,
    };
    let Some(host) = host else {
        tracing::debug!(method = %method, "bridge call after teardown, dropping");
        return std::ptr::null_mut();
    };

    let reply = DirectTransport::new(ANDROID_CHANNEL).call(&host, &method, &args);
    match reply {
        Some(value) => match env.new_string(value) {
            Ok(s) => s.into_raw(),
            Err(e) => {
                let err = jni_err(&mut env, "new_string(reply)", e);
                tracing::warn!(error = %err, "Android: reply conversion failed");
                std::ptr::null_mut()
            }
        },
        None => std::ptr::null_mut(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_entries_resolve_under_android_asset() {
        assert_eq!(format!("{ASSET_ROOT}{}", "index.html"), "file:///android_asset/index.html");
    }

    #[test]
    fn jboolean_mapping() {
        assert_eq!(as_jboolean(true), JNI_TRUE);
        assert_eq!(as_jboolean(false), JNI_FALSE);
    }

    // Everything else needs a live ART runtime and is exercised by the
    // instrumented tests of the Android project.
}
