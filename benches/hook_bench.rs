// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use koukku::{
    install_header_watch, install_hook, HostObject, JsValue, Outcome, XhrPrototype,
    XmlHttpRequest,
};

fn target() -> HostObject {
    let object = HostObject::new("bench");
    object.define_method("add", |_, args| {
        let total: f64 = args.iter().filter_map(JsValue::as_number).sum();
        Ok(Outcome::ready(total))
    });
    object
}

fn hook_dispatch_benchmark(c: &mut Criterion) {
    let args = [JsValue::from(1), JsValue::from(2)];

    let plain = target();
    c.bench_function("call_unhooked", |b| {
        b.iter(|| black_box(plain.call_sync("add", black_box(&args))))
    });

    let hooked = target();
    install_hook(hooked.methods(), "add", |result, _| {
        black_box(result);
        Ok(())
    });
    c.bench_function("call_hooked", |b| {
        b.iter(|| black_box(hooked.call_sync("add", black_box(&args))))
    });

    let nested = target();
    for _ in 0..8 {
        install_hook(nested.methods(), "add", |_, _| Ok(()));
    }
    c.bench_function("call_hooked_8_deep", |b| {
        b.iter(|| black_box(nested.call_sync("add", black_box(&args))))
    });
}

fn header_watch_benchmark(c: &mut Criterion) {
    let prototype = Arc::new(XhrPrototype::new());
    let _watch = install_header_watch(&prototype, "Authorization", |value| {
        black_box(value);
    });
    let xhr = XmlHttpRequest::with_prototype(prototype);

    c.bench_function("set_header_while_watching", |b| {
        b.iter(|| {
            let _ = xhr.open("GET", "https://example.com/");
            black_box(xhr.set_request_header("Accept", "application/json"))
        })
    });
}

criterion_group!(benches, hook_dispatch_benchmark, header_watch_benchmark);
criterion_main!(benches);
