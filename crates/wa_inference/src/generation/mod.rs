use std::fmt;
use std::sync::Arc;
use serde_json::Value;
use wa_core::{CompletionRequest, Error, Result, StyleProfile, TextModel};

pub const GENERATION_MAX_TOKENS: u32 = 2500;
pub const GENERATION_TEMPERATURE: f32 = 0.8;

pub const MISSING_KEY_MESSAGE: &str = "ANTHROPIC_API_KEY non configurée. Ajoutez votre clé API Claude dans les variables d'environnement.";

/// Requested size of a generated article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl ArticleLength {
    /// Anything other than `short`, `medium` or `long` means medium.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "short" => Self::Short,
            "long" => Self::Long,
            _ => Self::Medium,
        }
    }

    /// Target word range, as written into the prompt.
    pub fn word_range(self) -> &'static str {
        match self {
            Self::Short => "300-500 mots",
            Self::Medium => "700-1000 mots",
            Self::Long => "1500-2000 mots",
        }
    }
}

impl fmt::Display for ArticleLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        })
    }
}

fn text_field(profile: &StyleProfile, key: &str, placeholder: &str) -> String {
    match profile.advanced_analysis.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => placeholder.to_string(),
        Some(other) => other.to_string(),
    }
}

fn list_field(profile: &StyleProfile, key: &str, placeholder: &str) -> String {
    match profile.advanced_analysis.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => placeholder.to_string(),
        Some(other) => other.to_string(),
    }
}

/// The style section of the generation prompt.
pub fn style_description(profile: &StyleProfile) -> String {
    format!(
        "
Style d'écriture à imiter:
- Longueur moyenne des phrases: {avg:.1} mots
- Nombre d'articles de référence: {articles}
- Ton: {tone}
- Niveau de vocabulaire: {vocabulary}
- Structure des phrases: {structure}
- Voix/personnalité: {voice}
- Rythme: {rhythm}
- Registre de langue: {register}
- Patterns d'écriture: {patterns}
- Caractéristiques spéciales: {features}

Exemple de style:
{sample}
",
        avg = profile.avg_sentence_length,
        articles = profile.total_articles,
        tone = text_field(profile, "tone", "non spécifié"),
        vocabulary = text_field(profile, "vocabulary_level", "non spécifié"),
        structure = text_field(profile, "sentence_structure", "non spécifié"),
        voice = text_field(profile, "voice", "non spécifiée"),
        rhythm = text_field(profile, "rhythm", "non spécifié"),
        register = text_field(profile, "register", "non spécifié"),
        patterns = list_field(profile, "writing_patterns", "non spécifiés"),
        features = list_field(profile, "special_features", "non spécifiées"),
        sample = profile.sample_text,
    )
}

pub fn build_prompt(topic: &str, length: ArticleLength, profile: &StyleProfile) -> String {
    format!(
        "Tu es un expert en écriture capable d'imiter parfaitement n'importe quel style d'écriture.

{style}

Ta mission:
- Sujet: {topic}
- Longueur: {length}
- Génère un article qui reproduit EXACTEMENT le style d'écriture analysé ci-dessus
- Respecte toutes les caractéristiques stylistiques: ton, vocabulaire, structure, voix, rythme, registre
- Utilise les mêmes patterns d'écriture et caractéristiques spéciales
- Sois créatif mais parfaitement cohérent avec le style fourni

IMPORTANT: Ne fais pas de résumé générique. Imite authentiquement le style. Rédige l'article complet directement.",
        style = style_description(profile),
        length = length.word_range(),
    )
}

/// Document returned in place of an article when the model call fails.
pub fn fallback_article(topic: &str, error: &str) -> String {
    format!(
        "# {topic}

[Article généré - Configuration Claude requise]

Pour utiliser la génération d'articles avec Claude:
1. Obtenez une clé API sur https://console.anthropic.com/
2. Ajoutez ANTHROPIC_API_KEY dans vos variables d'environnement
3. Redémarrez le serveur

Erreur: {error}"
    )
}

pub struct ArticleGenerator {
    model: Option<Arc<dyn TextModel>>,
}

impl fmt::Debug for ArticleGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleGenerator")
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .finish()
    }
}

impl ArticleGenerator {
    pub fn new(model: Option<Arc<dyn TextModel>>) -> Self {
        Self { model }
    }

    /// Writes an article on `topic` in the style of `profile`.
    ///
    /// Without a model this fails with [`Error::Configuration`]. A failed
    /// model call is not an error: the caller gets [`fallback_article`].
    pub async fn generate(
        &self,
        topic: &str,
        length: ArticleLength,
        profile: &StyleProfile,
    ) -> Result<String> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| Error::Configuration(MISSING_KEY_MESSAGE.to_string()))?;

        let request = CompletionRequest::new(build_prompt(topic, length, profile), GENERATION_MAX_TOKENS)
            .with_temperature(GENERATION_TEMPERATURE);

        match model.complete(request).await {
            Ok(article) => {
                tracing::info!("✍️ Generated {} chars on '{}' ({})", article.len(), topic, length);
                Ok(article)
            }
            Err(e) => {
                tracing::warn!("Generation with {} failed, returning placeholder: {}", model.name(), e);
                Ok(fallback_article(topic, &e.to_string()))
            }
        }
    }
}
