//! # Host Bridge Traits
//!
//! Capability traits the SharePoint client depends on but does not implement
//! itself.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - one-shot HTTP requests and streaming downloads
//! - [`FileSystemAccess`](storage::FileSystemAccess) - local writes for downloaded files
//! - [`LoggerSink`](logging::LoggerSink) - forward structured logs to host logging
//!
//! Desktop implementations live in `bridge-desktop`. Tests substitute
//! `mockall` mocks or in-memory fakes.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it and keep the HTTP status and body
//! when a server answered with a failure, so callers can report both.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a client can be shared across
//! tasks, even though the client itself issues one request at a time.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{DynAsyncRead, HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//!
//!     async fn download_stream(&self, request: HttpRequest) -> Result<Box<DynAsyncRead>> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{DynAsyncRead, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::{DynAsyncWrite, FileSystemAccess};
