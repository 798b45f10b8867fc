//! Streaming downloads to the local filesystem.

use crate::client::{base_name, SharePointClient};
use crate::error::Result;
use crate::paths::{checked_segment, local_path_for, PathPolicy};
use crate::walker::{MaxDepth, RemoteFileEntry};
use bridge_traits::http::HttpMethod;
use core_runtime::logging::strip_path;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::{debug, info, instrument, warn};

/// Copy buffer size for downloads.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// A file written by [`SharePointClient::download_folder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    pub entry: RemoteFileEntry,
    pub local_path: PathBuf,
}

impl SharePointClient {
    /// Download one file into `target_dir`, keeping its base name.
    ///
    /// Returns the path written.
    pub async fn download_file(
        &self,
        server_relative_path: &str,
        target_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let name = base_name(server_relative_path);
        let local_path = target_dir
            .as_ref()
            .join(checked_segment(name, server_relative_path)?);

        self.download_to(server_relative_path, &local_path).await?;
        Ok(local_path)
    }

    /// Stream a remote file to `local_path`.
    ///
    /// Missing parent directories are created and an existing file is
    /// truncated. A failure midway leaves the partial file in place.
    #[instrument(skip(self, local_path), fields(file = %strip_path(server_relative_path)))]
    pub async fn download_to(&self, server_relative_path: &str, local_path: &Path) -> Result<u64> {
        let url = format!("{}/$value", self.file_url(server_relative_path));
        let request = self.request(HttpMethod::Get, url);
        let stream = self.http_client.download_stream(request).await?;

        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.file_system.create_dir_all(parent).await?;
        }
        let mut writer = self.file_system.open_write_stream(local_path).await?;
        let mut reader = BufReader::with_capacity(DOWNLOAD_CHUNK_SIZE, stream);

        let written = tokio::io::copy_buf(&mut reader, &mut writer).await?;
        writer.shutdown().await?;

        info!(bytes = written, path = %local_path.display(), "File downloaded");
        Ok(written)
    }

    /// Walk `folder` and download every file found below `target_dir`.
    ///
    /// Stops at the first failure; files already written stay on disk.
    #[instrument(skip(self, target_dir), fields(folder = %folder))]
    pub async fn download_folder(
        &self,
        folder: &str,
        target_dir: impl AsRef<Path>,
        policy: PathPolicy,
        max_depth: MaxDepth,
    ) -> Result<Vec<DownloadResult>> {
        let target_dir = target_dir.as_ref();
        let entries = self.list_files(folder, max_depth).await?;
        let mut written: HashSet<PathBuf> = HashSet::with_capacity(entries.len());
        let mut results = Vec::with_capacity(entries.len());

        for entry in entries {
            let local_path = local_path_for(&entry, target_dir, policy)?;

            if !written.insert(local_path.clone()) {
                warn!(
                    path = %local_path.display(),
                    remote = %entry.server_relative_path,
                    "Overwriting a file downloaded earlier in this run"
                );
            }

            debug!(remote = %entry.server_relative_path, "Downloading");
            self.download_to(&entry.server_relative_path, &local_path).await?;
            results.push(DownloadResult { entry, local_path });
        }

        info!(
            files = results.len(),
            target = %target_dir.display(),
            "Folder download complete"
        );
        Ok(results)
    }
}
