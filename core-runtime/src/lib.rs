//! # Core Runtime Module
//!
//! Foundational infrastructure shared by the authentication and SharePoint
//! crates:
//! - Client configuration with fail-fast validation
//! - Logging and tracing setup
//!
//! Nothing in here talks to the network; it only decides how the crates that
//! do are wired and observed.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
