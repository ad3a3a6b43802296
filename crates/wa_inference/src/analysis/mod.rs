//! Style analysis: local lexical statistics plus a model-written
//! characterization of tone, vocabulary and rhythm.

use std::fmt;
use std::sync::Arc;
use chrono::Utc;
use serde_json::{Map, Value};
use wa_core::{Article, CompletionRequest, Error, Result, StyleProfile, TextModel};

/// Characters of the corpus sent to the model.
pub const ANALYSIS_CORPUS_CHARS: usize = 3000;
/// Characters of the corpus kept in the profile as a style example.
pub const SAMPLE_TEXT_CHARS: usize = 500;
pub const ANALYSIS_MAX_TOKENS: u32 = 2000;

pub const MISSING_KEY_REASON: &str = "ANTHROPIC_API_KEY not configured";
pub const UNPARSEABLE_REPLY_REASON: &str = "Could not parse Claude response";

fn analysis_failed(reason: impl fmt::Display) -> String {
    format!("Claude analysis failed: {}", reason)
}

/// Word and sentence counts over a set of articles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalStats {
    pub total_words: usize,
    pub total_sentences: usize,
    pub avg_sentence_length: f64,
}

impl LexicalStats {
    /// Words are whitespace-separated tokens. Sentences are the pieces between
    /// periods that are not blank.
    pub fn from_articles(articles: &[Article]) -> Self {
        let mut total_words = 0;
        let mut total_sentences = 0;
        for article in articles {
            total_words += article.content.split_whitespace().count();
            total_sentences += article
                .content
                .split('.')
                .filter(|s| !s.trim().is_empty())
                .count();
        }

        let avg = total_words as f64 / total_sentences.max(1) as f64;
        Self {
            total_words,
            total_sentences,
            avg_sentence_length: (avg * 10.0).round() / 10.0,
        }
    }
}

/// All article bodies joined by single spaces.
pub fn build_corpus(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| a.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn analysis_prompt(excerpt: &str) -> String {
    format!(
        r#"Analyse en profondeur le style d'écriture suivant et retourne un JSON structuré avec ces analyses:

Texte à analyser:
{excerpt}

Retourne un JSON exactement avec cette structure:
{{
  "tone": "formel/informel/professionnel/décontracté/poétique",
  "vocabulary_level": "simple/moyen/avancé/littéraire",
  "sentence_structure": "courtes/moyennes/longues/variées",
  "writing_patterns": [
    "pattern 1 spécifique",
    "pattern 2 spécifique"
  ],
  "voice": "personnalité détectée (ex: didactique, narratif, introspectif)",
  "rhythm": "cadence perçue (ex: rapide, méditatif, dynamique)",
  "register": "niveau de langue (familier/courant/soutenu)",
  "special_features": [
    "élément stylistique 1",
    "élément stylistique 2"
  ]
}}

Sois précis et analytique dans ton évaluation."#
    )
}

/// Decodes the span from the first `{` to the last `}` of a model reply.
///
/// `Err` carries the reason to store in the profile.
pub fn extract_json_object(reply: &str) -> std::result::Result<Map<String, Value>, String> {
    let span = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => return Err(UNPARSEABLE_REPLY_REASON.to_string()),
    };
    serde_json::from_str(span).map_err(analysis_failed)
}

fn error_object(reason: String) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("error".to_string(), Value::String(reason));
    map
}

pub struct StyleAnalyzer {
    model: Option<Arc<dyn TextModel>>,
}

impl fmt::Debug for StyleAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleAnalyzer")
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .finish()
    }
}

impl StyleAnalyzer {
    /// `None` means no credential: profiles are still produced, with the
    /// advanced analysis replaced by an error entry.
    pub fn new(model: Option<Arc<dyn TextModel>>) -> Self {
        Self { model }
    }

    /// Builds a profile from `articles`.
    ///
    /// The only error is [`Error::NoArticles`]; model problems end up in
    /// `advanced_analysis.error` instead.
    pub async fn analyze(&self, articles: &[Article]) -> Result<StyleProfile> {
        if articles.is_empty() {
            return Err(Error::NoArticles);
        }

        let corpus = build_corpus(articles);
        let stats = LexicalStats::from_articles(articles);
        let advanced_analysis = match self.advanced_analysis(&corpus).await {
            Ok(analysis) => analysis,
            Err(reason) => {
                tracing::warn!("Advanced style analysis unavailable: {}", reason);
                error_object(reason)
            }
        };

        tracing::info!(
            "📝 Analyzed {} articles ({} words, {} avg words per sentence)",
            articles.len(),
            stats.total_words,
            stats.avg_sentence_length
        );

        Ok(StyleProfile {
            avg_sentence_length: stats.avg_sentence_length,
            total_articles: articles.len(),
            total_words: stats.total_words,
            analyzed_at: Utc::now(),
            sample_text: truncate_chars(&corpus, SAMPLE_TEXT_CHARS).to_string(),
            advanced_analysis,
        })
    }

    async fn advanced_analysis(
        &self,
        corpus: &str,
    ) -> std::result::Result<Map<String, Value>, String> {
        let model = self.model.as_ref().ok_or_else(|| MISSING_KEY_REASON.to_string())?;
        let prompt = analysis_prompt(truncate_chars(corpus, ANALYSIS_CORPUS_CHARS));
        let reply = model
            .complete(CompletionRequest::new(prompt, ANALYSIS_MAX_TOKENS))
            .await
            .map_err(analysis_failed)?;
        tracing::debug!("{} returned {} chars of analysis", model.name(), reply.len());
        extract_json_object(&reply)
    }
}
