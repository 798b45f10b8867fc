//! # SharePoint Provider
//!
//! REST client for one SharePoint Online site and its document libraries.
//!
//! ## Overview
//!
//! This module provides:
//! - App-only connection through the client-credentials token provider
//! - Depth-limited folder walks with paths relative to the walk's start
//! - Streaming downloads of single files or whole folders, preserving or
//!   flattening the remote hierarchy
//! - Folder existence checks, idempotent folder creation and file moves
//!
//! All remote items are addressed by server-relative path, e.g.
//! `/sites/Finance/Shared Documents/2024/q1.xlsx`.
//!
//! ## Example
//!
//! ```ignore
//! use provider_sharepoint::{MaxDepth, PathPolicy, SharePointClient};
//!
//! let client = SharePointClient::connect(config).await?;
//! let files = client
//!     .download_folder("/sites/Finance/Shared Documents/2024", "./out", PathPolicy::Preserve, MaxDepth::Unbounded)
//!     .await?;
//! ```

pub mod client;
pub mod error;
pub mod folders;
pub mod paths;
pub mod transfer;
pub mod types;
pub mod walker;

#[cfg(test)]
mod test_support;

pub use client::{odata_path_literal, SharePointClient, ODATA_VERBOSE};
pub use error::{Result, SharePointError};
pub use folders::OverwritePolicy;
pub use paths::{local_path_for, PathPolicy};
pub use transfer::{DownloadResult, DOWNLOAD_CHUNK_SIZE};
pub use walker::{relative_to, MaxDepth, RemoteFileEntry};
