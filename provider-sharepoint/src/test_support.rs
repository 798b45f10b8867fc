//! Mocks and fixtures shared by the unit tests.

use crate::client::SharePointClient;
use async_trait::async_trait;
use bridge_desktop::TokioFileSystem;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{DynAsyncRead, HttpClient, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_auth::AccessToken;
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;

mock! {
    pub HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        async fn download_stream(&self, request: HttpRequest) -> BridgeResult<Box<DynAsyncRead>>;
    }
}

/// Client for site `S` of tenant `contoso` with token `test-token`.
pub fn client_with(http_client: MockHttpClient) -> SharePointClient {
    SharePointClient {
        site_url: "https://contoso.sharepoint.com".to_string(),
        api_base: "https://contoso.sharepoint.com/sites/S/_api".to_string(),
        token: AccessToken::new("test-token"),
        http_client: Arc::new(http_client),
        file_system: Arc::new(TokioFileSystem::new()),
        request_timeout: None,
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

/// Verbose OData folder listing with the given file and subfolder paths.
pub fn folder_json(files: &[&str], folders: &[&str]) -> serde_json::Value {
    let name = |path: &str| path.rsplit('/').next().unwrap_or(path).to_string();

    serde_json::json!({
        "d": {
            "Files": { "results": files.iter().map(|path| serde_json::json!({
                "Name": name(path),
                "ServerRelativeUrl": path,
                "Length": "1",
            })).collect::<Vec<_>>() },
            "Folders": { "results": folders.iter().map(|path| serde_json::json!({
                "Name": name(path),
                "ServerRelativeUrl": path,
            })).collect::<Vec<_>>() },
        }
    })
}

pub fn stream_of(data: &[u8]) -> Box<DynAsyncRead> {
    Box::new(std::io::Cursor::new(data.to_vec()))
}
