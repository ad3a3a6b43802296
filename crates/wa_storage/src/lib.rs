use std::path::Path;
use std::sync::Arc;
use wa_core::{Error, Result, Storage};

pub mod backends;

pub use backends::*;

/// Names accepted by [`create_storage`].
pub const STORAGE_KINDS: &[&str] = &["json", "memory"];

/// Build the storage backend registered under `kind`.
pub async fn create_storage(kind: &str, data_dir: &Path) -> Result<Arc<dyn Storage>> {
    match kind {
        "json" => {
            let storage = JsonFileStorage::new(data_dir).await?;
            tracing::info!("🏦 Using JSON file storage in {}", data_dir.display());
            Ok(Arc::new(storage))
        }
        "memory" => {
            tracing::info!("🏦 Using in-memory storage (data is lost on exit)");
            Ok(Arc::new(MemoryStorage::new()))
        }
        other => Err(Error::Configuration(format!(
            "Unknown storage backend '{}'. Available backends: {}",
            other,
            STORAGE_KINDS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wa_core::ArticleStorage;

    #[tokio::test]
    async fn test_create_known_backends() {
        let dir = tempdir().unwrap();
        for kind in STORAGE_KINDS {
            let storage = create_storage(kind, dir.path()).await.unwrap();
            assert!(storage.list_articles().await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_unknown_backend_is_rejected() {
        let dir = tempdir().unwrap();
        let err = create_storage("qdrant", dir.path()).await.err().unwrap();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("json, memory"));
    }
}
