use std::sync::Arc;
use wa_core::{Storage, TextModel};
use wa_inference::{ArticleGenerator, StyleAnalyzer};

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub analyzer: StyleAnalyzer,
    pub generator: ArticleGenerator,
}

impl AppState {
    /// `model` is `None` when no credential is configured.
    pub fn new(storage: Arc<dyn Storage>, model: Option<Arc<dyn TextModel>>) -> Self {
        Self {
            storage,
            analyzer: StyleAnalyzer::new(model.clone()),
            generator: ArticleGenerator::new(model),
        }
    }
}
