use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use wa_core::{ArticleStorage, ProfileStorage};
use wa_inference::ArticleLength;
use crate::error::ApiError;
use crate::AppState;

pub const NO_PROFILE_MESSAGE: &str =
    "Aucun profil de style disponible. Ajoutez des articles et analysez votre style d'abord.";
pub const PROFILE_UNAVAILABLE_MESSAGE: &str =
    "Aucun profil de style disponible. Analysez d'abord vos articles.";
pub const UNTITLED: &str = "Sans titre";

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    #[serde(default = "default_length")]
    pub length: String,
    /// Accepted for compatibility; the learned style decides the tone.
    #[serde(default)]
    pub tone: Option<String>,
}

fn default_length() -> String {
    ArticleLength::default().to_string()
}

fn upload_error(reason: impl std::fmt::Display) -> ApiError {
    ApiError::BadRequest(format!("Erreur lors de l'upload: {}", reason))
}

/// `draft.md` becomes `draft`.
pub fn title_from_filename(filename: &str) -> String {
    std::path::Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "AI Writing Assistant API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_articles(State(state): State<Arc<AppState>>) -> ApiResult {
    let articles = state.storage.list_articles().await?;
    Ok(Json(json!({ "count": articles.len(), "articles": articles })))
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewArticle>, JsonRejection>,
) -> ApiResult {
    let Json(article) = payload?;
    let article = state
        .storage
        .append_article(article.title, article.content)
        .await?;
    tracing::info!("➕ Added article {} '{}'", article.id, article.title);
    Ok(Json(json!({ "message": "Article ajouté avec succès", "article": article })))
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult {
    let removed = state.storage.delete_article(&id).await?;
    tracing::info!("🗑️ Deleted {} article(s) with id {}", removed, id);
    Ok(Json(json!({ "message": "Article supprimé avec succès" })))
}

pub async fn analyze_style(State(state): State<Arc<AppState>>) -> ApiResult {
    let articles = state.storage.list_articles().await?;
    let profile = state.analyzer.analyze(&articles).await?;
    state.storage.save_profile(&profile).await?;
    Ok(Json(json!({ "message": "Analyse du style terminée", "profile": profile })))
}

pub async fn get_style_profile(State(state): State<Arc<AppState>>) -> ApiResult {
    Ok(Json(match state.storage.load_profile().await? {
        Some(profile) => json!({ "profile": profile }),
        None => json!({ "message": PROFILE_UNAVAILABLE_MESSAGE }),
    }))
}

pub async fn generate_article(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let profile = state
        .storage
        .load_profile()
        .await?
        .ok_or_else(|| ApiError::BadRequest(NO_PROFILE_MESSAGE.to_string()))?;

    if let Some(tone) = &request.tone {
        tracing::debug!("Ignoring requested tone '{}'", tone);
    }

    let length = ArticleLength::parse_lenient(&request.length);
    let article = state
        .generator
        .generate(&request.topic, length, &profile)
        .await?;

    Ok(Json(json!({
        "article": article,
        "topic": request.topic,
        "length": request.length,
        "generated_at": Utc::now(),
    })))
}

pub async fn upload_article(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;
        let content = String::from_utf8(bytes.to_vec()).map_err(upload_error)?;

        let article = state
            .storage
            .append_article(title_from_filename(&filename), content)
            .await?;
        tracing::info!("📄 Uploaded {} as article {}", filename, article.id);
        return Ok(Json(json!({ "message": "Fichier uploadé avec succès", "article": article })));
    }

    Err(upload_error("aucun fichier reçu"))
}
