use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reads an ISO-8601 timestamp. Values without an offset are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid ISO-8601 timestamp '{}'", raw))
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// A writing sample used as input for style analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
}

impl Article {
    /// Builds a new article with a fresh id and the current date.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            date: Utc::now(),
        }
    }
}

/// The descriptor produced by the last style analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub avg_sentence_length: f64,
    pub total_articles: usize,
    pub total_words: usize,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub analyzed_at: DateTime<Utc>,
    pub sample_text: String,
    /// Model-defined characterization. Holds `{"error": ...}` when the model
    /// could not be used.
    pub advanced_analysis: Map<String, Value>,
}

impl StyleProfile {
    /// Returns the embedded failure reason, if the advanced analysis failed.
    pub fn analysis_error(&self) -> Option<&str> {
        self.advanced_analysis.get("error").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_articles_get_distinct_ids() {
        let a = Article::new("One", "first");
        let b = Article::new("Two", "second");
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(a.title, "One");
        assert_eq!(a.content, "first");
    }

    #[test]
    fn test_profile_serializes_flat_fields() {
        let mut advanced = Map::new();
        advanced.insert("tone".to_string(), Value::from("formel"));
        let profile = StyleProfile {
            avg_sentence_length: 12.5,
            total_articles: 2,
            total_words: 40,
            analyzed_at: Utc::now(),
            sample_text: "Bonjour.".to_string(),
            advanced_analysis: advanced,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["avg_sentence_length"], 12.5);
        assert_eq!(json["total_articles"], 2);
        assert_eq!(json["advanced_analysis"]["tone"], "formel");
        assert!(json["analyzed_at"].is_string());
        assert_eq!(profile.analysis_error(), None);
    }

    #[test]
    fn test_article_reads_naive_timestamp_as_utc() {
        let article: Article = serde_json::from_str(
            r#"{"id":"20240501102030","title":"Mai","content":"Texte.","date":"2024-05-01T10:20:30.123456"}"#,
        )
        .unwrap();
        assert_eq!(article.id, "20240501102030");
        assert_eq!(article.date.to_rfc3339(), "2024-05-01T10:20:30.123456+00:00");
    }

    #[test]
    fn test_timestamps_accept_offsets_and_reject_garbage() {
        let shifted = parse_timestamp("2024-05-01T12:20:30+02:00").unwrap();
        assert_eq!(shifted, parse_timestamp("2024-05-01T10:20:30").unwrap());
        assert!(parse_timestamp("2024-05-01T10:20:30Z").is_some());
        assert!(parse_timestamp("hier").is_none());

        let err = serde_json::from_str::<Article>(
            r#"{"id":"x","title":"t","content":"c","date":"hier"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid ISO-8601 timestamp"));
    }

    #[test]
    fn test_profile_round_trips_through_json() {
        let profile = StyleProfile {
            avg_sentence_length: 3.0,
            total_articles: 1,
            total_words: 3,
            analyzed_at: Utc::now(),
            sample_text: "Une phrase.".to_string(),
            advanced_analysis: Map::new(),
        };
        let raw = serde_json::to_string(&profile).unwrap();
        let back: StyleProfile = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, profile);
    }
}
