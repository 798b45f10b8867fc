//! # Authentication Module
//!
//! App-only authentication for SharePoint Online.
//!
//! ## Overview
//!
//! SharePoint's REST API accepts bearer tokens issued by the tenant's
//! access-control service for an app registration. This crate exchanges the
//! registration's client ID and secret for such a token through the OAuth 2.0
//! client-credentials grant.
//!
//! ## Features
//!
//! - [`TokenProvider`] seam so the SharePoint client can be tested without a token endpoint
//! - [`ClientCredentialsProvider`] built directly from a `ClientConfig`
//! - Overridable token endpoint for tests and sovereign clouds
//! - Tokens and secrets are redacted from `Debug` output and never logged

pub mod client_credentials;
pub mod error;
pub mod types;

pub use client_credentials::{ClientCredentialsProvider, TokenProvider, DEFAULT_TOKEN_ENDPOINT};
pub use error::{AuthError, Result};
pub use types::{AccessToken, ClientCredentials, SHAREPOINT_PRINCIPAL};
