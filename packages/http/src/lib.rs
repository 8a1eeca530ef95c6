//! # pipedrive-http
//!
//! Blocking HTTP transport used by the Pipedrive compatibility client.
//!
//! The client never talks to reqwest directly. It builds an [`HttpRequest`]
//! (absolute URL, query, headers, optional JSON or form body) and hands it
//! to an [`HttpExecutor`]:
//!
//! ```ignore
//! use pipedrive_http::{HttpExecutor, HttpRequest, ReqwestExecutor};
//!
//! let executor = ReqwestExecutor::with_default_timeout()?;
//! let response = executor.execute(
//!     &HttpRequest::get("https://api.pipedrive.com/api/v2/deals/1")
//!         .with_header("x-api-token", token),
//! )?;
//! assert!(response.is_success());
//! ```
//!
//! With the `test-utils` feature, `executor::mock::MockExecutor` provides
//! canned responses and request recording for tests in downstream crates.

pub mod executor;
pub mod types;

pub use executor::{HttpExecutor, ReqwestExecutor};
pub use types::{Body, HttpRequest, HttpResponse, Method};

#[cfg(any(test, feature = "test-utils"))]
pub use executor::mock::MockExecutor;
