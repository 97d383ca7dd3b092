#![feature(test)]

extern crate test;

use requestkit::{ClientFactory, Configuration, MockRecord, Response};
use std::sync::Arc;
use test::Bencher;

fn factory() -> ClientFactory {
    ClientFactory::new(Arc::new(Configuration::new("tenant.example.com")))
        .base_path("/api/v2")
        .default_headers(vec![("x-tenant", "acme"), ("accept", "application/json")])
}

#[bench]
fn begin_request_simple(b: &mut Bencher) {
    let mut f = factory();

    b.iter(|| {
        let request = f.begin_request("GET");
        test::black_box(request);
    })
}

#[bench]
fn begin_request_json(b: &mut Bencher) {
    let mut f = factory();

    b.iter(|| {
        let request = f.begin_request("POST").add_path("users");
        test::black_box(request.url().unwrap());
    })
}

#[bench]
fn register_mock_responses_mixed(b: &mut Bencher) {
    b.iter(|| {
        let mut f = factory();
        f.register_mock_responses((0..100).map(|i| {
            if i % 3 == 0 {
                MockRecord::new()
            } else {
                MockRecord::new()
                    .with_response(Response::new().with_body(i.to_string()))
                    .with_callback(|_, _| {})
            }
        }));
        test::black_box(f.mock_queue().len());
    })
}

#[bench]
fn call_mocked(b: &mut Bencher) {
    let mut f = factory();
    let request = f.begin_request("GET").add_path("users");

    b.iter(|| {
        f.register_mock_response(Response::new().with_body("hello"), None, None);
        let response = futures::executor::block_on(request.call()).unwrap();
        test::black_box(response);
    })
}
