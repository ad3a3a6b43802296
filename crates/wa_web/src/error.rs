use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const NO_ARTICLES_MESSAGE: &str = "Aucun article disponible pour l'analyse";

/// Handler failure, rendered as `{"detail": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// The request body could not be read as the expected JSON document.
    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<wa_core::Error> for ApiError {
    fn from(e: wa_core::Error) -> Self {
        match e {
            wa_core::Error::NoArticles => Self::BadRequest(NO_ARTICLES_MESSAGE.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::BadRequest(detail) | Self::Unprocessable(detail) => {
                tracing::warn!("{} {}", status, detail)
            }
            Self::Internal(detail) => tracing::error!("{} {}", status, detail),
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_status() {
        let no_articles: ApiError = wa_core::Error::NoArticles.into();
        assert_eq!(no_articles.status(), StatusCode::BAD_REQUEST);
        assert_eq!(no_articles.to_string(), NO_ARTICLES_MESSAGE);

        let config: ApiError = wa_core::Error::Configuration("missing key".to_string()).into();
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(config.to_string(), "missing key");
    }

    #[test]
    fn test_unprocessable_body_is_422() {
        let error = ApiError::Unprocessable("missing field `content`".to_string());
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
