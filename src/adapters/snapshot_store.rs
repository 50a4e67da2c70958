use crate::domain::model::Snapshot;
use crate::domain::ports::SnapshotStore;
use crate::utils::error::{MonitorError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_SNAPSHOT_DIR: &str = "website_snapshots";

/// Characters that may not appear in a file name on common filesystems.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Maps a URL to a file-name-safe key. Distinct URLs may collide.
pub fn sanitize_key(url: &str) -> String {
    url.chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// One JSON document per URL under a base directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    base_path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn key_for(&self, url: &str) -> String {
        sanitize_key(url)
    }

    async fn ensure_ready(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| MonitorError::storage(&self.base_path, e))
    }

    async fn load(&self, key: &str) -> Result<Option<Snapshot>> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MonitorError::storage(path, e)),
        };

        let snapshot = serde_json::from_str(&content)
            .map_err(|source| MonitorError::SnapshotFormat { path, source })?;
        Ok(Some(snapshot))
    }

    async fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        self.ensure_ready().await?;

        let path = self.path_for(key);
        let data = serde_json::to_vec_pretty(snapshot).map_err(|source| {
            MonitorError::SnapshotFormat {
                path: path.clone(),
                source,
            }
        })?;

        // 先寫暫存檔再改名，避免中斷時留下半份快照
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &data)
            .await
            .map_err(|e| MonitorError::storage(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| MonitorError::storage(&path, e))?;

        tracing::debug!("Saved snapshot ({} bytes) to {}", data.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(
            sanitize_key("https://example.com/a?b=c|d"),
            "https___example.com_a_b=c_d"
        );
        assert_eq!(sanitize_key(r#"x\y*z"<>"#), "x_y_z___");
        assert_eq!(sanitize_key("plain-name"), "plain-name");
    }

    #[tokio::test]
    async fn test_load_missing_snapshot_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        assert!(store.load("nothing-here").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_text_exactly() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested").join("snapshots"));
        let url = "https://example.com/~jdoe/research";
        let key = store.key_for(url);
        let text = "Économie appliquée  —\t経済学\n\n  \"quoted\" \\ back\u{1F4DA}";

        store.save(&key, &Snapshot::new(url, text)).await.unwrap();
        let loaded = store.load(&key).await.unwrap().unwrap();

        assert_eq!(loaded.text, text);
        assert_eq!(loaded.url, url);
        assert!(loaded.saved_at.is_some());
        assert!(store.path_for(&key).exists());
        assert!(!store.path_for(&key).with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_value() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let key = store.key_for("https://example.com");

        store
            .save(&key, &Snapshot::new("https://example.com", "first version"))
            .await
            .unwrap();
        store
            .save(&key, &Snapshot::new("https://example.com", "second"))
            .await
            .unwrap();

        let loaded = store.load(&key).await.unwrap().unwrap();
        assert_eq!(loaded.text, "second");
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        std::fs::write(store.path_for("broken"), b"not json").unwrap();

        let err = store.load("broken").await.unwrap_err();
        assert!(matches!(err, MonitorError::SnapshotFormat { .. }));
    }
}
