//! Local File System Abstraction
//!
//! Downloads are written through this trait so tests and hosts can redirect
//! where bytes land without touching the transfer logic.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Writer handed out by [`FileSystemAccess::open_write_stream`].
pub type DynAsyncWrite = dyn tokio::io::AsyncWrite + Send + Unpin;

/// File system access trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
/// use tokio::io::AsyncWriteExt;
///
/// async fn save(fs: &dyn FileSystemAccess, target: &Path, data: &[u8]) -> Result<()> {
///     let mut writer = fs.open_write_stream(&target.join("report.pdf")).await?;
///     writer.write_all(data).await?;
///     writer.shutdown().await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Open a file for streaming writes
    ///
    /// Missing parent directories are created first. An existing file at
    /// `path` is truncated.
    async fn open_write_stream(&self, path: &Path) -> Result<Box<DynAsyncWrite>>;
}
