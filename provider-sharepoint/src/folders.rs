//! Remote folder and file management.

use crate::client::{api_error, base_name, SharePointClient};
use crate::error::Result;
use bridge_traits::http::HttpMethod;
use serde_json::json;
use tracing::{debug, info, instrument};

/// What `moveTo` does when the destination already holds a file of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Reject the move
    Fail,
    /// Replace the existing file
    #[default]
    Replace,
}

impl OverwritePolicy {
    /// `flags` value of the `moveTo` call.
    pub fn flags(&self) -> u8 {
        match self {
            OverwritePolicy::Fail => 0,
            OverwritePolicy::Replace => 1,
        }
    }
}

impl SharePointClient {
    /// Whether a folder exists at `server_relative_path`.
    ///
    /// 404 is reported as `false`; any other non-200 status is an error.
    #[instrument(skip(self))]
    pub async fn folder_exists(&self, server_relative_path: &str) -> Result<bool> {
        let url = self.folder_url(server_relative_path);
        let response = self.execute(self.request(HttpMethod::Get, url)).await?;

        match response.status {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(api_error(&response)),
        }
    }

    /// Create a folder unless it already exists.
    ///
    /// Returns `true` when the folder was created and `false` when it was
    /// already there, in which case nothing is sent.
    #[instrument(skip(self))]
    pub async fn create_folder(&self, server_relative_path: &str) -> Result<bool> {
        if self.folder_exists(server_relative_path).await? {
            debug!("Folder already exists");
            return Ok(false);
        }

        let body = json!({
            "__metadata": { "type": "SP.Folder" },
            "ServerRelativeUrl": server_relative_path,
        });
        let url = format!("{}/web/folders", self.api_base);
        let response = self
            .execute(self.json_request(HttpMethod::Post, url, &body)?)
            .await?;

        if response.status != 201 {
            return Err(api_error(&response));
        }

        info!("Folder created");
        Ok(true)
    }

    /// Move a file into `destination_folder`, creating the folder first if
    /// needed.
    ///
    /// Returns the server-relative path of the moved file.
    #[instrument(skip(self))]
    pub async fn move_file(
        &self,
        source: &str,
        destination_folder: &str,
        overwrite: OverwritePolicy,
    ) -> Result<String> {
        let folder = destination_folder.trim_end_matches('/');
        if !self.folder_exists(folder).await? {
            self.create_folder(folder).await?;
        }

        let destination = format!("{}/{}", folder, base_name(source));
        let body = json!({
            "newUrl": destination,
            "flags": overwrite.flags(),
        });
        let url = format!("{}/moveTo", self.file_url(source));
        let response = self
            .execute(self.json_request(HttpMethod::Post, url, &body)?)
            .await?;

        if response.status != 200 {
            return Err(api_error(&response));
        }

        info!(destination = %destination, "File moved");
        Ok(destination)
    }
}
