#![warn(missing_docs)]

//!
//! Requestkit is the request-construction layer of an API client. A `ClientFactory` hands out
//! one `RequestBuilder` per call, pre-configured with the shared configuration, operating
//! context, base path and default headers, and lets tests queue canned responses that
//! builders serve instead of touching the network.
//!
//! # Getting Started
//!
//! Create a factory from a shared `Configuration`, then start requests from it:
//!
//! ## Example
//!
//! ```
//! use requestkit::{ClientFactory, Configuration, OperatingContext};
//! use std::sync::Arc;
//!
//! let configuration = Arc::new(Configuration::new("tenant.example.com"));
//! let mut factory = ClientFactory::new(configuration)
//!     .context(OperatingContext::Management)
//!     .base_path("/api/v2");
//!
//! let request = factory
//!     .begin_request("GET")
//!     .add_path("users")
//!     .with_param("page", "2");
//!
//! assert_eq!(
//!     "https://tenant.example.com/api/v2/users?page=2",
//!     request.url().unwrap()
//! );
//! ```
//!
//! Requests that aren't served from the mock queue are sent through a `Transport`, which the
//! caller provides. This crate doesn't perform any network I/O on its own.
//!
//! # Content type
//!
//! `POST`, `PUT`, `PATCH` and `DELETE` requests get a `Content-Type: application/json` header.
//! The factory's default headers are applied on top, so a default `Content-Type` wins:
//!
//! ## Example
//!
//! ```
//! use requestkit::{ClientFactory, Configuration};
//! use std::sync::Arc;
//!
//! let mut factory = ClientFactory::new(Arc::new(Configuration::default()))
//!     .default_headers(vec![("content-type", "application/x-www-form-urlencoded")]);
//!
//! let request = factory.begin_request("post");
//! assert_eq!(
//!     Some("application/x-www-form-urlencoded"),
//!     request.headers().get("Content-Type")
//! );
//!
//! let request = factory.begin_request("get");
//! assert_eq!(
//!     Some("application/x-www-form-urlencoded"),
//!     request.headers().get("Content-Type")
//! );
//! ```
//!
//! # Mocking responses
//!
//! Every builder shares the factory's mock queue. Each executed request consumes the oldest
//! entry that hasn't been served yet, whether it was registered before or after the builder
//! was created.
//!
//! ## Example
//!
//! ```
//! use requestkit::{ClientFactory, Configuration, MockRecord, Response};
//! use http::StatusCode;
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let mut factory = ClientFactory::new(Arc::new(Configuration::default()));
//! let request = factory.begin_request("GET").add_path("users");
//!
//! factory.register_mock_responses(vec![
//!     MockRecord::new().with_response(Response::new().with_body("first")),
//!     MockRecord::new()
//!         .with_response(Response::new())
//!         .with_callback(|_request, response| response.set_status(StatusCode::ACCEPTED)),
//! ]);
//!
//! assert_eq!("first", request.call().await.unwrap().text());
//! assert_eq!(StatusCode::ACCEPTED, request.call().await.unwrap().status());
//! # });
//! ```
//!
//! # Simulating failures
//!
//! An entry registered with a failure turns into an error of kind `ErrorKind::MockedFailure`
//! whose `source()` is the injected value.
//!
//! ## Example
//!
//! ```
//! use requestkit::{ClientFactory, Configuration, ErrorKind, Failure, Response};
//! use std::error::Error as _;
//! use std::io;
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let mut factory = ClientFactory::new(Arc::new(Configuration::default()));
//! let failure: Failure = Arc::new(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
//! factory.register_mock_response(Response::new(), None, Some(failure));
//!
//! let error = factory.begin_request("GET").call().await.unwrap_err();
//! assert_eq!(ErrorKind::MockedFailure, error.kind);
//! assert_eq!("timed out", error.source().unwrap().to_string());
//! # });
//! ```
//!
//! # Debug
//!
//! Requestkit logs through the `log` crate: request creation, mock registration, skipped
//! mock records and served mocks are reported at the `debug` level. Install any logger (e.g.
//! `env_logger`) and set `RUST_LOG=requestkit=debug` to see them.
//!
//! ```
//! use requestkit::{ClientFactory, Configuration, Response};
//! use std::sync::Arc;
//!
//! let _ = env_logger::try_init();
//!
//! # futures::executor::block_on(async {
//! let mut factory = ClientFactory::new(Arc::new(Configuration::default()));
//! factory.register_mock_response(Response::new(), None, None);
//!
//! // With RUST_LOG=requestkit=debug, logs the new request and the served mock
//! let response = factory.begin_request("GET").call().await.unwrap();
//! assert!(response.status().is_success());
//! # });
//! ```
//!

mod client;
mod configuration;
mod context;
mod error;
mod headers;
mod mock;
mod request;
mod response;
mod transport;

pub use client::ClientFactory;
pub use configuration::Configuration;
pub use context::OperatingContext;
pub use error::{Error, ErrorKind, Failure};
pub use headers::Headers;
pub use mock::{MockCallback, MockEntry, MockInput, MockQueue, MockRecord};
pub use request::{PreparedRequest, RequestBuilder};
pub use response::Response;
pub use transport::Transport;
