//! SharePoint REST response types
//!
//! Data structures for deserializing `odata=verbose` responses, where every
//! payload is wrapped in a `d` object and collections in `results`.

use serde::{Deserialize, Deserializer};

/// `GetFolderByServerRelativeUrl(...)?$expand=Folders,Files` response
#[derive(Debug, Deserialize)]
pub struct FolderResponse {
    pub d: FolderContents,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FolderContents {
    #[serde(default)]
    pub files: Collection<SpFile>,
    #[serde(default)]
    pub folders: Collection<SpFolder>,
}

/// Deferred or expanded collection
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

/// SP.File resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpFile {
    pub name: String,

    pub server_relative_url: String,

    /// Byte size; verbose OData reports Int64 values as strings
    #[serde(default, deserialize_with = "lenient_u64")]
    pub length: Option<u64>,

    #[serde(default)]
    pub time_last_modified: Option<String>,
}

/// SP.Folder resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpFolder {
    pub name: String,

    pub server_relative_url: String,
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::String(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_response_deserialization() {
        let json = r#"{
            "d": {
                "__metadata": { "type": "SP.Folder" },
                "Name": "root",
                "Files": { "results": [
                    {
                        "Name": "a.txt",
                        "ServerRelativeUrl": "/sites/S/Shared Documents/a.txt",
                        "Length": "42",
                        "TimeLastModified": "2024-03-01T10:00:00Z"
                    }
                ] },
                "Folders": { "results": [
                    { "Name": "sub", "ServerRelativeUrl": "/sites/S/Shared Documents/sub" }
                ] }
            }
        }"#;

        let response: FolderResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.d.files.results.len(), 1);
        let file = &response.d.files.results[0];
        assert_eq!(file.name, "a.txt");
        assert_eq!(file.length, Some(42));
        assert_eq!(file.time_last_modified.as_deref(), Some("2024-03-01T10:00:00Z"));
        assert_eq!(
            response.d.folders.results[0].server_relative_url,
            "/sites/S/Shared Documents/sub"
        );
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let response: FolderResponse = serde_json::from_str(r#"{"d":{"Name":"empty"}}"#).unwrap();

        assert!(response.d.files.results.is_empty());
        assert!(response.d.folders.results.is_empty());
    }

    #[test]
    fn test_numeric_length() {
        let file: SpFile = serde_json::from_str(
            r#"{"Name":"b.bin","ServerRelativeUrl":"/b.bin","Length":7}"#,
        )
        .unwrap();

        assert_eq!(file.length, Some(7));
        assert_eq!(file.time_last_modified, None);
    }
}
