//! Blocking client for the BlackRoad product and deployment API.
//!
//! # Overview
//! ```no_run
//! use blackroad::BlackRoadClient;
//!
//! let client = BlackRoadClient::new("br_live_...");
//! for product in client.list_products(blackroad::DEFAULT_PRODUCT_LIMIT)? {
//!     println!("{} {}", product.id, product.name);
//! }
//! let deployment = client.create_deployment("product-123", "production")?;
//! println!("{}", deployment.status);
//! # Ok::<(), blackroad::ApiError>(())
//! ```
//!
//! # Design
//! - `BlackRoadClient` is immutable after construction and holds only its
//!   `ClientConfig` and a `Transport`.
//! - Requests are built as plain data (`build_request`), executed by the
//!   transport, and decoded by `decode`, so each step is testable alone.
//! - Every operation reports failures through one `ApiError` type; nothing is
//!   retried or logged above `debug`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{decode, BlackRoadClient, DEFAULT_PRODUCT_LIMIT};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Deployment, NewDeployment, NewProduct, Product};
