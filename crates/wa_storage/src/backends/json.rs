use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use wa_core::{Article, ArticleStorage, Error, ProfileStorage, Result, StyleProfile};

pub const ARTICLES_FILE: &str = "articles.json";
pub const STYLE_PROFILE_FILE: &str = "style_profile.json";

/// Two pretty-printed JSON documents under a data directory.
///
/// Every read goes to disk. Writes replace the whole file through a sibling
/// temp file and a rename, so readers never see a half-written document.
/// There is no locking: concurrent writers race and the last rename wins.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    data_dir: PathBuf,
}

impl JsonFileStorage {
    pub async fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await.map_err(|e| {
            Error::Storage(format!(
                "Failed to create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn articles_path(&self) -> PathBuf {
        self.data_dir.join(ARTICLES_FILE)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(STYLE_PROFILE_FILE)
    }
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

async fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, path).await?;
    tracing::debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

#[async_trait]
impl ArticleStorage for JsonFileStorage {
    async fn load_articles(&self) -> Result<Vec<Article>> {
        Ok(read_document(&self.articles_path()).await?.unwrap_or_default())
    }

    async fn save_articles(&self, articles: &[Article]) -> Result<()> {
        write_document(&self.articles_path(), articles).await
    }
}

#[async_trait]
impl ProfileStorage for JsonFileStorage {
    async fn load_profile(&self) -> Result<Option<StyleProfile>> {
        read_document(&self.profile_path()).await
    }

    async fn save_profile(&self, profile: &StyleProfile) -> Result<()> {
        write_document(&self.profile_path(), profile).await
    }
}
