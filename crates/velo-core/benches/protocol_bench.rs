// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the per-message hot paths: payload decoding,
// callback script generation, and navigation decisions. All of these run
// inline on the UI thread.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use velo_core::protocol::{PLATFORM_INFO_CALLBACK, callback_script, decode_post};
use velo_core::{IOS_CHANNEL, NavigationPolicy, ShellConfig};

fn bench_decode_post(c: &mut Criterion) {
    let bodies: &[(&str, &str)] = &[
        ("platform_info", r#"{"action":"getPlatformInfo","page":"lx3k9a0f2q"}"#),
        ("toast", r#"{"action":"showToast","message":"Saved 3 items","page":"lx3k9a0f2q"}"#),
        ("unknown", r#"{"action":"vibrate","pattern":[100,50,100]}"#),
        ("malformed", r#"{"action":"showToast""#),
    ];

    let mut group = c.benchmark_group("decode_post");
    for &(label, body) in bodies {
        group.bench_function(label, |b| {
            b.iter(|| black_box(decode_post(IOS_CHANNEL, black_box(body))));
        });
    }
    group.finish();
}

fn bench_callback_script(c: &mut Criterion) {
    c.bench_function("callback_script (guarded)", |b| {
        b.iter(|| {
            black_box(callback_script(
                PLATFORM_INFO_CALLBACK,
                black_box("iOS 17.2"),
                Some("lx3k9a0f2q"),
            ))
        });
    });
}

fn bench_navigation(c: &mut Criterion) {
    let policy = NavigationPolicy::from_config(&ShellConfig::development("localhost", 3001));
    let urls = [
        "http://localhost:3001/settings",
        "https://example.com/docs?page=2",
        "file:///android_asset/index.html",
    ];

    c.bench_function("navigation_decide (3 urls)", |b| {
        b.iter(|| {
            for url in urls {
                black_box(policy.decide(black_box(url)));
            }
        });
    });
}

criterion_group!(benches, bench_decode_post, bench_callback_script, bench_navigation);
criterion_main!(benches);
