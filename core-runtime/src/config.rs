//! # Client Configuration
//!
//! The configuration system uses a builder to construct a [`ClientConfig`]
//! holding the tenant credentials, the site being addressed and the bridge
//! implementations used for HTTP and local file access. Validation is
//! fail-fast: a config that builds is one the client can use.
//!
//! ## Required Settings
//!
//! - `tenant` - the `<tenant>` in `https://<tenant>.sharepoint.com`
//! - `tenant_id` - Azure AD tenant ID
//! - `client_id` / `client_secret` - app registration credentials
//! - `site` - the segment after `/sites/` in the site URL
//!
//! ## Optional Settings
//!
//! - `site_url` - overrides `https://<tenant>.sharepoint.com`
//! - `token_url` - overrides the access-control token endpoint
//! - `request_timeout` - per-request timeout (none by default)
//! - `HttpClient` / `FileSystemAccess` - injected bridges
//!
//! When the `desktop-shims` feature is enabled, `ReqwestHttpClient` and
//! `TokioFileSystem` are injected automatically if no bridge was provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .tenant("contoso")
//!     .tenant_id("00000000-0000-0000-0000-000000000000")
//!     .client_id("app-id")
//!     .client_secret("app-secret")
//!     .site("Finance")
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{FileSystemAccess, HttpClient};
use std::sync::Arc;
use std::time::Duration;

/// Environment variables read by [`ClientConfigBuilder::from_env`].
pub const ENV_TENANT: &str = "SHAREPOINT_TENANT";
pub const ENV_TENANT_ID: &str = "SHAREPOINT_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "SHAREPOINT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SHAREPOINT_CLIENT_SECRET";
pub const ENV_SITE: &str = "SHAREPOINT_SITE";
pub const ENV_SITE_URL: &str = "SHAREPOINT_SITE_URL";

/// Configuration for a SharePoint client instance.
///
/// Use [`ClientConfigBuilder`] to construct instances. The config is read-only
/// after construction and shared by every request the client makes.
#[derive(Clone)]
pub struct ClientConfig {
    /// SharePoint tenant name (`<tenant>.sharepoint.com`)
    pub tenant: String,

    /// Azure AD tenant ID
    pub tenant_id: String,

    /// App registration client ID, without the `@tenant_id` suffix
    pub client_id: String,

    /// App registration client secret
    pub client_secret: String,

    /// Site name under `/sites/`
    pub site: String,

    /// Explicit site root URL, replacing `https://<tenant>.sharepoint.com`
    pub site_url_override: Option<String>,

    /// Explicit token endpoint URL
    pub token_url: Option<String>,

    /// Per-request timeout; `None` lets requests block until the transport resolves
    pub request_timeout: Option<Duration>,

    /// HTTP transport
    pub http_client: Arc<dyn HttpClient>,

    /// Local file access used for downloads
    pub file_system: Arc<dyn FileSystemAccess>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("tenant", &self.tenant)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("site", &self.site)
            .field("site_url_override", &self.site_url_override)
            .field("token_url", &self.token_url)
            .field("request_timeout", &self.request_timeout)
            .field("http_client", &"HttpClient { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .finish()
    }
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Host name of the tenant, as used in the OAuth resource identifier.
    pub fn sharepoint_host(&self) -> String {
        format!("{}.sharepoint.com", self.tenant)
    }

    /// Root URL server-relative paths are appended to.
    ///
    /// Trailing slashes of an override are dropped so that
    /// `site_url() + "/sites/..."` never produces a double slash.
    pub fn site_url(&self) -> String {
        match &self.site_url_override {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.sharepoint_host()),
        }
    }

    /// Base of the site's REST API: `{site_url}/sites/{site}/_api`.
    pub fn api_base(&self) -> String {
        format!("{}/sites/{}/_api", self.site_url(), self.site)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Identifiers are non-empty and free of whitespace padding
    /// - The site name is a single path segment
    /// - URL overrides use http or https
    /// - A configured timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tenant", &self.tenant),
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("site", &self.site),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", name)));
            }
            if value.trim() != value.as_str() {
                return Err(Error::Config(format!(
                    "{} must not have leading or trailing whitespace",
                    name
                )));
            }
        }

        if self.tenant.contains('.') || self.tenant.contains('/') {
            return Err(Error::Config(
                "tenant must be the bare tenant name, e.g. 'contoso' for contoso.sharepoint.com"
                    .to_string(),
            ));
        }

        if self.site.contains('/') {
            return Err(Error::Config(
                "site must be the single segment after '/sites/'".to_string(),
            ));
        }

        for (name, url) in [
            ("site_url", &self.site_url_override),
            ("token_url", &self.token_url),
        ] {
            if let Some(url) = url {
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(Error::Config(format!(
                        "{} must be an http(s) URL, got '{}'",
                        name, url
                    )));
                }
            }
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(Error::Config(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                  Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                  Tests: inject a mock via .http_client()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new()
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "No file system implementation provided. \
                  Desktop: enable the 'desktop-shims' feature to use TokioFileSystem. \
                  Tests: inject a fake via .file_system()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    use bridge_desktop::TokioFileSystem;

    Ok(Arc::new(TokioFileSystem::new()))
}

/// Builder for constructing [`ClientConfig`] instances.
#[derive(Default)]
pub struct ClientConfigBuilder {
    tenant: Option<String>,
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    site: Option<String>,
    site_url: Option<String>,
    token_url: Option<String>,
    request_timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
}

impl ClientConfigBuilder {
    /// Seed a builder from the `SHAREPOINT_*` environment variables.
    ///
    /// Unset variables leave the corresponding field empty so that `build()`
    /// reports exactly which setting is missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Seed a builder from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            tenant: lookup(ENV_TENANT),
            tenant_id: lookup(ENV_TENANT_ID),
            client_id: lookup(ENV_CLIENT_ID),
            client_secret: lookup(ENV_CLIENT_SECRET),
            site: lookup(ENV_SITE),
            site_url: lookup(ENV_SITE_URL),
            ..Self::default()
        }
    }

    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Override the site root URL (default `https://<tenant>.sharepoint.com`).
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    /// Override the OAuth token endpoint.
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system implementation.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Builds the final `ClientConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required setting is missing or invalid
    /// - No bridge was injected and no desktop default is available
    pub fn build(self) -> Result<ClientConfig> {
        fn required(value: Option<String>, setter: &str) -> Result<String> {
            value.ok_or_else(|| {
                Error::Config(format!(
                    "{} is required. Use .{}() to set it.",
                    setter, setter
                ))
            })
        }

        let tenant = required(self.tenant, "tenant")?;
        let tenant_id = required(self.tenant_id, "tenant_id")?;
        let client_id = required(self.client_id, "client_id")?;
        let client_secret = required(self.client_secret, "client_secret")?;
        let site = required(self.site, "site")?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        let config = ClientConfig {
            tenant,
            tenant_id,
            client_id,
            client_secret,
            site,
            site_url_override: self.site_url,
            token_url: self.token_url,
            request_timeout: self.request_timeout,
            http_client,
            file_system,
        };

        config.validate()?;

        Ok(config)
    }
}
