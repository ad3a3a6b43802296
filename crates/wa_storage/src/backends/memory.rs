use async_trait::async_trait;
use wa_core::{Article, ArticleStorage, ProfileStorage, Result, StyleProfile};
use tokio::sync::RwLock;

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    articles: RwLock<Vec<Article>>,
    profile: RwLock<Option<StyleProfile>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn load_articles(&self) -> Result<Vec<Article>> {
        Ok(self.articles.read().await.clone())
    }

    async fn save_articles(&self, articles: &[Article]) -> Result<()> {
        *self.articles.write().await = articles.to_vec();
        Ok(())
    }
}

#[async_trait]
impl ProfileStorage for MemoryStorage {
    async fn load_profile(&self) -> Result<Option<StyleProfile>> {
        Ok(self.profile.read().await.clone())
    }

    async fn save_profile(&self, profile: &StyleProfile) -> Result<()> {
        *self.profile.write().await = Some(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Map;

    #[tokio::test]
    async fn test_append_then_list() {
        let storage = MemoryStorage::new();
        let stored = storage
            .append_article("Titre".to_string(), "Du contenu.".to_string())
            .await
            .unwrap();

        let articles = storage.list_articles().await.unwrap();
        assert_eq!(articles, vec![stored.clone()]);
        assert!(!stored.id.is_empty());
        assert!(stored.date <= Utc::now());
    }

    #[tokio::test]
    async fn test_append_keeps_insertion_order() {
        let storage = MemoryStorage::new();
        for title in ["a", "b", "c"] {
            storage.append_article(title.to_string(), String::new()).await.unwrap();
        }
        let titles: Vec<String> = storage
            .list_articles()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let storage = MemoryStorage::new();
        storage.append_article("t".to_string(), "c".to_string()).await.unwrap();
        let before = storage.list_articles().await.unwrap();

        let removed = storage.delete_article("does-not-exist").await.unwrap();
        assert_eq!(removed, 0);
        assert_eq!(storage.list_articles().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_matching_article() {
        let storage = MemoryStorage::new();
        let keep = storage.append_article("keep".to_string(), "x".to_string()).await.unwrap();
        let drop = storage.append_article("drop".to_string(), "y".to_string()).await.unwrap();

        assert_eq!(storage.delete_article(&drop.id).await.unwrap(), 1);
        assert_eq!(storage.list_articles().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_profile_absent_until_saved() {
        let storage = MemoryStorage::new();
        assert!(storage.load_profile().await.unwrap().is_none());

        let profile = StyleProfile {
            avg_sentence_length: 2.0,
            total_articles: 1,
            total_words: 4,
            analyzed_at: Utc::now(),
            sample_text: "Hello world. Goodbye now.".to_string(),
            advanced_analysis: Map::new(),
        };
        storage.save_profile(&profile).await.unwrap();
        assert_eq!(storage.load_profile().await.unwrap(), Some(profile));
    }
}
