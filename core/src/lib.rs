//! Client core for the book and student catalog service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` executes the
//! round-trip; `ApiService` glues the two together and maps every failure to
//! a user-facing message. `Session` drives a screen: list, create, edit and
//! delete with client-side validation in front of every submission.
//!
//! # Design
//! - `CatalogClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Records are defined independently from the mock-server crate;
//!   integration tests catch schema drift.
//! - Screen state lives in `UiState`, owned by the `Session`, and never in
//!   free-floating globals.

pub mod client;
pub mod error;
pub mod http;
pub mod service;
pub mod session;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::CatalogClient;
pub use error::{ApiError, SessionError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{ApiService, UpdateMethod};
pub use session::{MessageKind, Session, UiState, View};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{Book, BookDetail, BookInput, ErrorBody, Normalize, Record, Resource, Student, StudentInput};
pub use validation::{PricePolicy, Validate, ValidationError, ValidationPolicy};
