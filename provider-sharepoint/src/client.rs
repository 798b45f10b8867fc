//! SharePoint REST client
//!
//! Holds the site addressing, the bearer token and the bridges every
//! operation goes through. The operations themselves live in the
//! `walker`, `transfer` and `folders` modules as further `impl` blocks.

use crate::error::{Result, SharePointError};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::storage::FileSystemAccess;
use core_auth::{AccessToken, ClientCredentialsProvider, TokenProvider};
use core_runtime::config::ClientConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// `Accept` / `Content-Type` value for verbose OData payloads.
pub const ODATA_VERBOSE: &str = "application/json;odata=verbose";

/// Client for one SharePoint site.
///
/// The token is acquired once when the client is built and used for every
/// request afterwards. Requests are issued one at a time.
pub struct SharePointClient {
    pub(crate) site_url: String,
    pub(crate) api_base: String,
    pub(crate) token: AccessToken,
    pub(crate) http_client: Arc<dyn HttpClient>,
    pub(crate) file_system: Arc<dyn FileSystemAccess>,
    pub(crate) request_timeout: Option<Duration>,
}

impl SharePointClient {
    /// Acquire an app-only token for `config` and build a client.
    #[instrument(skip(config), fields(tenant = %config.tenant, site = %config.site))]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let provider = ClientCredentialsProvider::from_config(&config);
        Self::connect_with(config, &provider).await
    }

    /// Build a client using a caller-supplied token source.
    pub async fn connect_with(config: ClientConfig, provider: &dyn TokenProvider) -> Result<Self> {
        let token = provider.access_token().await?;
        let client = Self::with_token(config, token);
        info!(site_url = %client.site_url, "Connected to SharePoint site");
        Ok(client)
    }

    /// Build a client around an already acquired token.
    pub fn with_token(config: ClientConfig, token: AccessToken) -> Self {
        Self {
            site_url: config.site_url(),
            api_base: config.api_base(),
            token,
            http_client: config.http_client,
            file_system: config.file_system,
            request_timeout: config.request_timeout,
        }
    }

    /// Site root that server-relative paths are appended to.
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// `{site_url}/sites/{site}/_api`
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub(crate) fn folder_url(&self, server_relative_path: &str) -> String {
        format!(
            "{}/web/GetFolderByServerRelativeUrl('{}')",
            self.api_base,
            odata_path_literal(server_relative_path)
        )
    }

    pub(crate) fn file_url(&self, server_relative_path: &str) -> String {
        format!(
            "{}/web/GetFileByServerRelativeUrl('{}')",
            self.api_base,
            odata_path_literal(server_relative_path)
        )
    }

    /// Authenticated request with the verbose OData `Accept` header.
    pub(crate) fn request(&self, method: HttpMethod, url: impl Into<String>) -> HttpRequest {
        HttpRequest::new(method, url)
            .bearer_token(self.token.secret())
            .header("Accept", ODATA_VERBOSE)
            .maybe_timeout(self.request_timeout)
    }

    /// Authenticated request carrying a verbose OData JSON body.
    pub(crate) fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        body: &T,
    ) -> Result<HttpRequest> {
        Ok(self
            .request(method, url)
            .header("Content-Type", ODATA_VERBOSE)
            .json(body)?)
    }

    pub(crate) async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = ?request.method, url = %request.url, "SharePoint request");
        let response = self.http_client.execute(request).await?;
        debug!(status = response.status, size = response.body.len(), "SharePoint response");
        Ok(response)
    }
}

/// Turn a response with an unexpected status into `SharePointError::Api`.
pub(crate) fn api_error(response: &HttpResponse) -> SharePointError {
    let body = response.text_lossy();
    warn!(status = response.status, body = %body, "SharePoint request rejected");
    SharePointError::Api {
        status: response.status,
        body,
    }
}

/// Embed a server-relative path in a single-quoted OData string literal.
///
/// Quotes are doubled, then each segment is percent-encoded; `/` separators
/// are kept so the path stays readable in logs.
pub fn odata_path_literal(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(&segment.replace('\'', "''")).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Last segment of a server-relative path.
pub(crate) fn base_name(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_with, json_response, MockHttpClient};
    use std::fmt::Write as _;
    use std::sync::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

    struct FieldText(String);

    impl Visit for FieldText {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            let _ = write!(self.0, "{}={:?} ", field.name(), value);
        }
    }

    impl<S: Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = FieldText(String::new());
            event.record(&mut fields);
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), fields.0));
        }
    }

    #[test]
    fn test_api_error_is_logged_with_status_and_body() {
        let captured = CapturedEvents::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let response = json_response(503, serde_json::json!({ "error": "busy" }));

        let error = tracing::subscriber::with_default(subscriber, || api_error(&response));

        assert!(matches!(error, SharePointError::Api { status: 503, ref body } if body.contains("busy")));
        let events = captured.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, Level::WARN);
        assert!(events[0].1.contains("status=503"));
        assert!(events[0].1.contains("busy"));
    }

    #[test]
    fn test_odata_path_literal() {
        assert_eq!(
            odata_path_literal("/sites/S/Shared Documents/a.txt"),
            "/sites/S/Shared%20Documents/a.txt"
        );
        assert_eq!(
            odata_path_literal("/sites/S/Docs/O'Brien's.docx"),
            "/sites/S/Docs/O%27%27Brien%27%27s.docx"
        );
        assert_eq!(odata_path_literal("/a#b/c?d"), "/a%23b/c%3Fd");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/sites/S/Shared Documents/a.txt"), "a.txt");
        assert_eq!(base_name("/sites/S/Shared Documents/sub/"), "sub");
        assert_eq!(base_name("a.txt"), "a.txt");
    }

    #[test]
    fn test_urls() {
        let client = client_with(MockHttpClient::new());

        assert_eq!(client.site_url(), "https://contoso.sharepoint.com");
        assert_eq!(
            client.api_base(),
            "https://contoso.sharepoint.com/sites/S/_api"
        );
        assert_eq!(
            client.folder_url("/sites/S/Shared Documents"),
            "https://contoso.sharepoint.com/sites/S/_api/web/GetFolderByServerRelativeUrl('/sites/S/Shared%20Documents')"
        );
        assert_eq!(
            client.file_url("/sites/S/x.txt"),
            "https://contoso.sharepoint.com/sites/S/_api/web/GetFileByServerRelativeUrl('/sites/S/x.txt')"
        );
    }

    #[test]
    fn test_request_headers() {
        let client = client_with(MockHttpClient::new());
        let request = client
            .json_request(HttpMethod::Post, "https://x", &serde_json::json!({ "a": 1 }))
            .unwrap();

        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Bearer test-token")
        );
        assert_eq!(
            request.headers.get("Accept").map(String::as_str),
            Some(ODATA_VERBOSE)
        );
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some(ODATA_VERBOSE)
        );
        assert!(request.timeout.is_none());
    }
}
