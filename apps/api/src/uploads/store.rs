use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::uploads::janitor::release_after_use;

/// Owner of the transient upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        info!("Upload directory ready at {}", self.dir.display());
        Ok(())
    }

    /// Writes the bytes under a collision-resistant name and hands back the
    /// single owner of the file.
    pub async fn persist(
        &self,
        field_name: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> io::Result<StoredUpload> {
        let path = self.dir.join(unique_file_name(field_name, original_name));
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size_bytes = bytes.len(), "Upload received");

        Ok(StoredUpload {
            path,
            size_bytes: bytes.len() as u64,
        })
    }
}

/// An uploaded file owned by exactly one request handler.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
    size_bytes: u64,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Deletes the file if it still exists. Never fails.
    pub async fn release(self) {
        release_after_use(&self.path).await;
    }
}

/// `<field>-<unix millis>-<9 random digits><original extension>`
fn unique_file_name(field_name: &str, original_name: &str) -> String {
    let suffix = Uuid::new_v4().as_u128() % 1_000_000_000;
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    format!(
        "{field_name}-{}-{suffix:09}{extension}",
        Utc::now().timestamp_millis()
    )
}
