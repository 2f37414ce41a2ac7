use manga_reader_common::utils::hash::{calculate_sha256, is_sha256_hex};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::{Result, Storage};

async fn write_then_rename(partial: &Path, target: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(partial).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(partial, target).await
}

impl Storage {
    fn image_path(&self, hash: &str) -> PathBuf {
        self.data_dir.join("images").join(hash)
    }

    /// Content-addressed: identical bytes are written once and share a hash.
    pub async fn store_image(&self, data: &[u8]) -> Result<String> {
        let hash = calculate_sha256(data);
        let image_path = self.image_path(&hash);

        if let Some(parent) = image_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        if !image_path.exists() {
            // Readers only ever see a complete file under the final name.
            let partial =
                image_path.with_file_name(format!(".{}.{}.part", hash, uuid::Uuid::new_v4()));
            if let Err(e) = write_then_rename(&partial, &image_path, data).await {
                let _ = fs::remove_file(&partial).await;
                return Err(e.into());
            }
            tracing::info!("Stored image {} ({} bytes)", hash, data.len());
        }

        Ok(hash)
    }

    pub async fn get_image(&self, hash: &str) -> Result<Option<Vec<u8>>> {
        // Only well-formed hashes map to files; anything else cannot exist.
        if !is_sha256_hex(hash) {
            return Ok(None);
        }

        let image_path = self.image_path(hash);
        if image_path.exists() {
            let data = fs::read(image_path).await?;
            Ok(Some(data))
        } else {
            Ok(None)
        }
    }
}
