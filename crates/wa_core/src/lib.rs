pub mod models;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::{CompletionRequest, TextModel};
pub use storage::{ArticleStorage, ProfileStorage, Storage};
pub use types::{Article, StyleProfile};
