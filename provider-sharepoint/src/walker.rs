//! Folder walk
//!
//! Lists every file below a server-relative folder, depth first, with each
//! file's path relative to the folder the walk started from.

use crate::client::{api_error, SharePointClient};
use crate::error::{Result, SharePointError};
use crate::types::FolderResponse;
use bridge_traits::http::HttpMethod;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument};

/// How far below the start folder a walk descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxDepth {
    /// Descend into every subfolder
    #[default]
    Unbounded,
    /// Descend into subfolders only while the current depth is below the limit
    Limited(u32),
}

impl MaxDepth {
    /// Map the integer convention where `-1` means unbounded.
    pub fn from_i64(value: i64) -> Result<Self> {
        match value {
            -1 => Ok(MaxDepth::Unbounded),
            v => u32::try_from(v)
                .map(MaxDepth::Limited)
                .map_err(|_| SharePointError::InvalidDepth(v)),
        }
    }

    /// Whether the subfolders of a folder at `depth` are visited.
    pub fn descends_from(&self, depth: u32) -> bool {
        match self {
            MaxDepth::Unbounded => true,
            MaxDepth::Limited(limit) => depth < *limit,
        }
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxDepth::Unbounded => f.write_str("unbounded"),
            MaxDepth::Limited(limit) => write!(f, "{}", limit),
        }
    }
}

/// One file found by a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFileEntry {
    /// Base name
    pub name: String,
    /// Server-relative path, used to address the file in later calls
    pub server_relative_path: String,
    /// `/`-separated path relative to the walk's start folder
    pub relative_path: String,
    /// Site URL followed by the server-relative path
    pub full_url: String,
    /// Folder levels below the start folder; 0 for its direct children
    pub depth: u32,
    /// Byte size reported by the listing
    pub length: Option<u64>,
    /// Last modification time as reported by the listing
    pub time_last_modified: Option<String>,
}

impl SharePointClient {
    /// List the files below `start_folder`.
    ///
    /// A folder's files come first in the order the API returned them,
    /// followed by each subfolder's files, subfolders again in API order.
    /// Any failed listing aborts the whole walk.
    #[instrument(skip(self), fields(folder = %start_folder, max_depth = %max_depth))]
    pub async fn list_files(
        &self,
        start_folder: &str,
        max_depth: MaxDepth,
    ) -> Result<Vec<RemoteFileEntry>> {
        let walk_root = start_folder;
        let mut entries = Vec::new();
        let mut pending: Vec<(String, u32)> = vec![(start_folder.to_string(), 0)];

        while let Some((folder, depth)) = pending.pop() {
            let contents = self.list_folder(&folder).await?;

            debug!(
                folder = %folder,
                depth,
                files = contents.d.files.results.len(),
                folders = contents.d.folders.results.len(),
                "Listed folder"
            );

            for file in contents.d.files.results {
                entries.push(RemoteFileEntry {
                    relative_path: relative_to(&file.server_relative_url, walk_root),
                    full_url: format!("{}{}", self.site_url, file.server_relative_url),
                    name: file.name,
                    server_relative_path: file.server_relative_url,
                    depth,
                    length: file.length,
                    time_last_modified: file.time_last_modified,
                });
            }

            if max_depth.descends_from(depth) {
                // Reversed so the first subfolder is popped first.
                pending.extend(
                    contents
                        .d
                        .folders
                        .results
                        .into_iter()
                        .rev()
                        .map(|sub| (sub.server_relative_url, depth + 1)),
                );
            }
        }

        info!(files = entries.len(), "Folder walk complete");
        Ok(entries)
    }

    async fn list_folder(&self, folder: &str) -> Result<FolderResponse> {
        let url = format!("{}?$expand=Folders,Files", self.folder_url(folder));
        let response = self.execute(self.request(HttpMethod::Get, url)).await?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| SharePointError::Parse(format!("folder '{}': {}", folder, e)))
    }
}

/// `path` relative to `root`, `/`-separated.
///
/// Segments are compared case-insensitively since SharePoint may echo
/// server-relative URLs in a different case than the caller used. A path
/// outside `root` climbs out with `..` segments.
pub fn relative_to(path: &str, root: &str) -> String {
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let root_segments: Vec<&str> = root.split('/').filter(|s| !s.is_empty()).collect();

    let common = path_segments
        .iter()
        .zip(root_segments.iter())
        .take_while(|(a, b)| a.to_lowercase() == b.to_lowercase())
        .count();

    let mut relative: Vec<&str> = vec![".."; root_segments.len() - common];
    relative.extend_from_slice(&path_segments[common..]);

    if relative.is_empty() {
        ".".to_string()
    } else {
        relative.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_with, folder_json, json_response, MockHttpClient};

    #[test]
    fn test_max_depth_from_i64() {
        assert_eq!(MaxDepth::from_i64(-1).unwrap(), MaxDepth::Unbounded);
        assert_eq!(MaxDepth::from_i64(0).unwrap(), MaxDepth::Limited(0));
        assert_eq!(MaxDepth::from_i64(3).unwrap(), MaxDepth::Limited(3));
        assert!(matches!(
            MaxDepth::from_i64(-2),
            Err(SharePointError::InvalidDepth(-2))
        ));
        assert!(MaxDepth::from_i64(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_descends_from() {
        assert!(MaxDepth::Unbounded.descends_from(1000));
        assert!(!MaxDepth::Limited(0).descends_from(0));
        assert!(MaxDepth::Limited(2).descends_from(1));
        assert!(!MaxDepth::Limited(2).descends_from(2));
    }

    #[test]
    fn test_relative_to() {
        let root = "/sites/S/Shared Documents";
        assert_eq!(relative_to("/sites/S/Shared Documents/a.txt", root), "a.txt");
        assert_eq!(
            relative_to("/sites/S/Shared Documents/A/B/f.txt", root),
            "A/B/f.txt"
        );
        assert_eq!(
            relative_to("/sites/S/shared documents/A/f.txt", root),
            "A/f.txt"
        );
        assert_eq!(
            relative_to("/sites/S/Ärger/Übersicht/x.txt", "/sites/S/ärger/übersicht"),
            "x.txt"
        );
        assert_eq!(relative_to("/sites/S/Other/x.txt", root), "../Other/x.txt");
        assert_eq!(relative_to("/root/a.txt", "/root/"), "a.txt");
        assert_eq!(relative_to("/root", "/root"), ".");
    }

    fn tree_mock() -> MockHttpClient {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|req| {
            if req.url.contains("('/root/sub')") {
                Ok(json_response(200, folder_json(&["/root/sub/b.txt"], &[])))
            } else if req.url.contains("('/root')") {
                Ok(json_response(200, folder_json(&["/root/a.txt"], &["/root/sub"])))
            } else {
                Ok(json_response(404, serde_json::json!({ "error": "not found" })))
            }
        });
        mock_http
    }

    #[tokio::test]
    async fn test_list_files_unbounded() {
        let client = client_with(tree_mock());

        let entries = client.list_files("/root", MaxDepth::Unbounded).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].relative_path, "a.txt");
        assert_eq!(entries[0].depth, 0);
        assert_eq!(entries[0].full_url, "https://contoso.sharepoint.com/root/a.txt");
        assert_eq!(entries[1].name, "b.txt");
        assert_eq!(entries[1].relative_path, "sub/b.txt");
        assert_eq!(entries[1].depth, 1);
        assert_eq!(entries[1].server_relative_path, "/root/sub/b.txt");
    }

    #[tokio::test]
    async fn test_list_files_depth_zero_skips_subfolders() {
        let client = client_with(tree_mock());

        let entries = client.list_files("/root", MaxDepth::Limited(0)).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
    }

    #[tokio::test]
    async fn test_list_files_is_depth_first_pre_order() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|req| {
            let body = if req.url.contains("('/r/x/deep')") {
                folder_json(&["/r/x/deep/3.txt"], &[])
            } else if req.url.contains("('/r/x')") {
                folder_json(&["/r/x/2.txt"], &["/r/x/deep"])
            } else if req.url.contains("('/r/y')") {
                folder_json(&["/r/y/4.txt"], &[])
            } else {
                folder_json(&["/r/1.txt"], &["/r/x", "/r/y"])
            };
            Ok(json_response(200, body))
        });
        let client = client_with(mock_http);

        let entries = client.list_files("/r", MaxDepth::Unbounded).await.unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.relative_path.as_str()).collect();
        let depths: Vec<_> = entries.iter().map(|e| e.depth).collect();

        assert_eq!(paths, ["1.txt", "x/2.txt", "x/deep/3.txt", "y/4.txt"]);
        assert_eq!(depths, [0, 1, 2, 1]);
    }

    #[tokio::test]
    async fn test_list_files_depth_one_stops_below_first_level() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| !req.url.contains("('/r/x/deep')"))
            .returning(|req| {
                let body = if req.url.contains("('/r/x')") {
                    folder_json(&["/r/x/2.txt"], &["/r/x/deep"])
                } else {
                    folder_json(&["/r/1.txt"], &["/r/x"])
                };
                Ok(json_response(200, body))
            });
        let client = client_with(mock_http);

        let entries = client.list_files("/r", MaxDepth::Limited(1)).await.unwrap();
        let found: Vec<_> = entries
            .iter()
            .map(|e| (e.relative_path.as_str(), e.depth))
            .collect();

        assert_eq!(found, [("1.txt", 0), ("x/2.txt", 1)]);
    }

    #[tokio::test]
    async fn test_list_files_sends_expand_and_auth() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Get
                    && req.url.ends_with("('/root')?$expand=Folders,Files")
                    && req.headers.get("Authorization").map(String::as_str)
                        == Some("Bearer test-token")
            })
            .times(1)
            .returning(|_| Ok(json_response(200, folder_json(&[], &[]))));
        let client = client_with(mock_http);

        assert!(client
            .list_files("/root", MaxDepth::Unbounded)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_failed_subfolder_listing_aborts_walk() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|req| {
            if req.url.contains("('/root')") {
                Ok(json_response(200, folder_json(&["/root/a.txt"], &["/root/locked"])))
            } else {
                Ok(json_response(403, serde_json::json!({ "error": "denied" })))
            }
        });
        let client = client_with(mock_http);

        let result = client.list_files("/root", MaxDepth::Unbounded).await;

        assert!(matches!(result, Err(SharePointError::Api { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_unparseable_listing_is_parse_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(json_response(200, serde_json::json!({ "value": [] }))));
        let client = client_with(mock_http);

        let result = client.list_files("/root", MaxDepth::Unbounded).await;

        assert!(matches!(result, Err(SharePointError::Parse(_))));
    }
}
