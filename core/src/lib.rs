//! Synchronous client for the Realtycloud real-estate data API.
//!
//! # Overview
//! Orders EGRN object and right-transfer-history reports, owner risk
//! assessments, cadastral number suggestions and order status through one
//! `Realtycloud` value constructed with an API key.
//!
//! # Design
//! - Input is validated when `RealtyObject` / `RealtyOwner` are constructed,
//!   so an invalid order never produces a network call.
//! - Group clients (`EgrnClient`, `RiskClient`, `SuggestClient`,
//!   `StatusClient`) split every operation into `build_*` (produces an
//!   `HttpRequest`) and `parse_*` (consumes an `HttpResponse`), keeping the
//!   I/O boundary explicit.
//! - `Realtycloud` joins them with a `Transport`; the default `UreqTransport`
//!   blocks on one round trip per call.
//! - Non-2xx responses become `ApiError` variants through `classify`.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod settings;
pub mod transport;
pub mod types;
pub mod validate;

pub use api::Realtycloud;
pub use client::{EgrnClient, RiskClient, StatusClient, SuggestClient};
pub use error::{classify, ApiError, Error, StatusError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use settings::ClientConfig;
pub use transport::{Transport, UreqTransport};
pub use types::{
    IndividualOwner, LegalOwner, OrderItem, OwnerFields, OwnerPayload, OwnerType, Product, RealtyObject, RealtyOwner,
    Suggestion,
};
