use core_runtime::config::ClientConfig;
use serde::Deserialize;
use std::fmt;

/// SharePoint Online's well-known service principal ID.
pub const SHAREPOINT_PRINCIPAL: &str = "00000003-0000-0ff1-ce00-000000000000";

/// A bearer token for the SharePoint REST API.
///
/// `Debug` and `Display` never print the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building an `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// App-only credentials of a tenant's app registration.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Tenant name, as in `<tenant>.sharepoint.com`
    pub tenant: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(
        tenant: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.tenant.clone(),
            config.tenant_id.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )
    }

    /// `{principal}/{tenant}.sharepoint.com@{tenant_id}`
    pub fn resource(&self) -> String {
        format!(
            "{}/{}.sharepoint.com@{}",
            SHAREPOINT_PRINCIPAL, self.tenant, self.tenant_id
        )
    }

    /// `{client_id}@{tenant_id}`
    pub fn qualified_client_id(&self) -> String {
        format!("{}@{}", self.client_id, self.tenant_id)
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant", &self.tenant)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Token endpoint response.
///
/// The access-control service reports `expires_in` as a string while Azure AD
/// v2 reports a number, so it is kept as raw JSON.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<serde_json::Value>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    pub fn expires_in_secs(&self) -> Option<u64> {
        match self.expires_in.as_ref()? {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
