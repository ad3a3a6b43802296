use async_trait::async_trait;
use crate::types::{Article, StyleProfile};
use crate::Result;

/// Whole-document access to the article collection.
///
/// Backends only implement `load_articles`/`save_articles`; the list, append
/// and delete operations are read-modify-write cycles built on top of them.
#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Load every stored article, in insertion order. Missing data is an empty list.
    async fn load_articles(&self) -> Result<Vec<Article>>;

    /// Replace the stored collection.
    async fn save_articles(&self, articles: &[Article]) -> Result<()>;

    async fn list_articles(&self) -> Result<Vec<Article>> {
        self.load_articles().await
    }

    /// Store a new article and return it with its assigned id and date.
    async fn append_article(&self, title: String, content: String) -> Result<Article> {
        let mut articles = self.load_articles().await?;
        let article = Article::new(title, content);
        articles.push(article.clone());
        self.save_articles(&articles).await?;
        tracing::debug!("Stored article {} ({} total)", article.id, articles.len());
        Ok(article)
    }

    /// Remove every article with the given id. Returns how many were removed;
    /// unknown ids remove nothing and still succeed.
    async fn delete_article(&self, id: &str) -> Result<usize> {
        let mut articles = self.load_articles().await?;
        let before = articles.len();
        articles.retain(|a| a.id != id);
        self.save_articles(&articles).await?;
        Ok(before - articles.len())
    }
}

/// Access to the single stored style profile.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    async fn load_profile(&self) -> Result<Option<StyleProfile>>;

    /// Overwrite the stored profile.
    async fn save_profile(&self, profile: &StyleProfile) -> Result<()>;
}

/// A backend that holds both documents.
pub trait Storage: ArticleStorage + ProfileStorage {}

impl<T: ArticleStorage + ProfileStorage> Storage for T {}
