//! OAuth 2.0 client-credentials flow against SharePoint's access-control
//! service.
//!
//! The token is requested once; there is no expiry tracking or refresh. A
//! client that outlives its token has to be rebuilt.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::{ClientCredentials, ClientCredentialsProvider, TokenProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let credentials = ClientCredentials::new("contoso", "tenant-id", "app-id", "app-secret");
//! let provider = ClientCredentialsProvider::new(credentials, http_client);
//! let token = provider.access_token().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AccessToken, ClientCredentials, TokenResponse};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_runtime::config::ClientConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Access-control token endpoint; `{tenant_id}` is substituted.
pub const DEFAULT_TOKEN_ENDPOINT: &str =
    "https://accounts.accesscontrol.windows.net/{tenant_id}/tokens/OAuth/2";

/// Source of bearer tokens for the SharePoint REST API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<AccessToken>;
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    resource: String,
    client_id: String,
    client_secret: &'a str,
}

/// Token provider for app-only (client-credentials) access.
pub struct ClientCredentialsProvider {
    credentials: ClientCredentials,
    token_url: String,
    timeout: Option<Duration>,
    http_client: Arc<dyn HttpClient>,
}

impl ClientCredentialsProvider {
    pub fn new(credentials: ClientCredentials, http_client: Arc<dyn HttpClient>) -> Self {
        let token_url = DEFAULT_TOKEN_ENDPOINT.replace("{tenant_id}", &credentials.tenant_id);
        Self {
            credentials,
            token_url,
            timeout: None,
            http_client,
        }
    }

    /// Build a provider from the client configuration, honouring its token URL
    /// override and request timeout.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut provider = Self::new(
            ClientCredentials::from_config(config),
            Arc::clone(&config.http_client),
        );
        if let Some(url) = &config.token_url {
            provider.token_url = url.clone();
        }
        provider.timeout = config.request_timeout;
        provider
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn build_request(&self) -> Result<HttpRequest> {
        let form = TokenRequest {
            grant_type: "client_credentials",
            resource: self.credentials.resource(),
            client_id: self.credentials.qualified_client_id(),
            client_secret: &self.credentials.client_secret,
        };

        HttpRequest::new(HttpMethod::Post, self.token_url.clone())
            .form(&form)
            .map(|request| request.maybe_timeout(self.timeout))
            .map_err(|e| AuthError::NetworkError(format!("Failed to encode token request: {}", e)))
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    #[instrument(skip(self), fields(tenant = %self.credentials.tenant))]
    async fn access_token(&self) -> Result<AccessToken> {
        debug!(url = %self.token_url, "Requesting app-only access token");

        let response = self
            .http_client
            .execute(self.build_request()?)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            let body = response.text_lossy();
            warn!(status = response.status, error = %body, "Token request rejected");
            return Err(AuthError::TokenRequestFailed {
                status: response.status,
                body,
            });
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        let expires_in = token_response.expires_in_secs();
        let token_type = token_response.token_type.as_deref().unwrap_or("unknown");
        info!(token_type, expires_in = ?expires_in, "Token response received");

        let token = token_response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingAccessToken)?;

        Ok(AccessToken::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::{DynAsyncRead, HttpResponse};
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn download_stream(&self, request: HttpRequest) -> BridgeResult<Box<DynAsyncRead>>;
        }
    }

    fn credentials() -> ClientCredentials {
        ClientCredentials::new("contoso", "tid-1", "app-1", "s3cr3t")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[tokio::test]
    async fn test_token_request_carries_form_fields() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Post);
            assert_eq!(
                req.url,
                "https://accounts.accesscontrol.windows.net/tid-1/tokens/OAuth/2"
            );
            assert_eq!(
                req.headers.get("Content-Type").map(String::as_str),
                Some("application/x-www-form-urlencoded")
            );

            let body = req.body.expect("form body");
            let form: HashMap<String, String> = serde_urlencoded::from_bytes(&body).unwrap();
            assert_eq!(form["grant_type"], "client_credentials");
            assert_eq!(
                form["resource"],
                "00000003-0000-0ff1-ce00-000000000000/contoso.sharepoint.com@tid-1"
            );
            assert_eq!(form["client_id"], "app-1@tid-1");
            assert_eq!(form["client_secret"], "s3cr3t");

            Ok(response(
                200,
                r#"{"token_type":"Bearer","access_token":"tok","expires_in":"3599"}"#,
            ))
        });

        let provider = ClientCredentialsProvider::new(credentials(), Arc::new(mock_http));
        let token = provider.access_token().await.unwrap();

        assert_eq!(token.secret(), "tok");
    }

    #[tokio::test]
    async fn test_token_url_override() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| req.url == "http://localhost:9000/token")
            .times(1)
            .returning(|_| Ok(response(200, r#"{"access_token":"tok"}"#)));

        let provider = ClientCredentialsProvider::new(credentials(), Arc::new(mock_http))
            .with_token_url("http://localhost:9000/token");

        assert_eq!(provider.token_url(), "http://localhost:9000/token");
        assert!(provider.access_token().await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_status_keeps_status_and_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(401, "invalid_client")));

        let provider = ClientCredentialsProvider::new(credentials(), Arc::new(mock_http));

        match provider.access_token().await {
            Err(AuthError::TokenRequestFailed { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid_client");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_access_token() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(200, r#"{"token_type":"Bearer"}"#)));

        let provider = ClientCredentialsProvider::new(credentials(), Arc::new(mock_http));

        assert!(matches!(
            provider.access_token().await,
            Err(AuthError::MissingAccessToken)
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(200, "<html>")));

        let provider = ClientCredentialsProvider::new(credentials(), Arc::new(mock_http));

        assert!(matches!(
            provider.access_token().await,
            Err(AuthError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|_| {
            Err(BridgeError::OperationFailed("Connection failed".to_string()))
        });

        let provider = ClientCredentialsProvider::new(credentials(), Arc::new(mock_http));

        assert!(matches!(
            provider.access_token().await,
            Err(AuthError::NetworkError(_))
        ));
    }
}
