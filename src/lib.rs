//! Workspace façade crate.
//!
//! This crate exists to expose a single dependency for host applications that
//! want the SharePoint client together with its configuration, logging and
//! authentication layers. Enable the `desktop-shims` feature (default) to pull
//! in the reqwest/Tokio-backed bridges.

#[cfg(feature = "desktop-shims")]
pub use core_auth as auth;
#[cfg(feature = "desktop-shims")]
pub use core_runtime as runtime;
#[cfg(feature = "desktop-shims")]
pub use provider_sharepoint as sharepoint;

#[cfg(feature = "desktop-shims")]
pub use core_runtime::{ClientConfig, ClientConfigBuilder};
#[cfg(feature = "desktop-shims")]
pub use provider_sharepoint::{
    DownloadResult, MaxDepth, OverwritePolicy, PathPolicy, RemoteFileEntry, SharePointClient,
    SharePointError,
};
