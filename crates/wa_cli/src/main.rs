use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use wa_core::{ArticleStorage, ProfileStorage, Storage, TextModel};
use wa_inference::{ArticleGenerator, ArticleLength, StyleAnalyzer, DEFAULT_BASE_URL, DEFAULT_MODEL_NAME};
use wa_web::handlers::title_from_filename;
use wa_web::{AppState, DEFAULT_CORS_ORIGINS};

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Learn a writing style from sample articles and write new ones in it", long_about = None)]
pub struct Cli {
    /// Directory holding articles.json and style_profile.json
    #[arg(long, env = "WA_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
    #[arg(long, default_value = "json", help = "Storage backend. Available backends: json (default), memory")]
    storage: String,
    #[arg(long, default_value = "anthropic", help = "Model provider. Available providers: anthropic (default), dummy")]
    model: String,
    #[arg(long, default_value = DEFAULT_MODEL_NAME)]
    model_name: String,
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_base_url: String,
    /// Give up on a model call after this many seconds. Unbounded by default.
    #[arg(long)]
    request_timeout_secs: Option<u64>,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Allowed browser origin, repeatable. `*` allows any origin.
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },
    /// Add text files as articles, titled by file name
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List stored articles
    Articles,
    /// Analyze the stored articles and save the style profile
    Analyze,
    /// Write an article in the learned style
    Generate {
        topic: String,
        /// short, medium or long
        #[arg(long, default_value = "medium")]
        length: String,
    },
}

impl Cli {
    fn inference_config(&self) -> wa_inference::Config {
        wa_inference::Config {
            provider: self.model.clone(),
            api_key: self.api_key.clone(),
            model_name: self.model_name.clone(),
            base_url: self.api_base_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

async fn import_files(storage: &Arc<dyn Storage>, files: &[PathBuf]) -> anyhow::Result<()> {
    for path in files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let content = String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8 text", path.display()))?;
        let filename = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

        let article = storage.append_article(title_from_filename(&filename), content).await?;
        info!("📄 Imported {} as '{}' ({})", path.display(), article.title, article.id);
    }
    Ok(())
}

async fn analyze(storage: &Arc<dyn Storage>, model: Option<Arc<dyn TextModel>>) -> anyhow::Result<()> {
    let articles = storage.list_articles().await?;
    if articles.is_empty() {
        bail!("No articles to analyze. Add some with `wa import <FILES>` first.");
    }
    let profile = StyleAnalyzer::new(model).analyze(&articles).await?;
    storage.save_profile(&profile).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

async fn generate(
    storage: &Arc<dyn Storage>,
    model: Option<Arc<dyn TextModel>>,
    topic: &str,
    length: &str,
) -> anyhow::Result<()> {
    let Some(profile) = storage.load_profile().await? else {
        bail!("No style profile yet. Run `wa analyze` first.");
    };
    let article = ArticleGenerator::new(model)
        .generate(topic, ArticleLength::parse_lenient(length), &profile)
        .await?;
    println!("{}", article);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let storage = wa_storage::create_storage(&cli.storage, &cli.data_dir).await?;
    let inference_config = cli.inference_config();
    let model = wa_inference::create_model(&inference_config)?;
    if let Some(model) = &model {
        info!("🧠 Inference model initialized (using {}, {})", model.name(), inference_config.model_name);
    }

    match cli.command {
        Commands::Serve { host, port, cors_origins } => {
            let cors_origins = if cors_origins.is_empty() {
                DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
            } else {
                cors_origins
            };
            let app = wa_web::create_app(AppState::new(storage, model), &cors_origins);
            wa_web::serve(app, &format!("{}:{}", host, port))
                .await
                .context("HTTP server failed")?;
        }
        Commands::Import { files } => import_files(&storage, &files).await?,
        Commands::Articles => {
            let articles = storage.list_articles().await?;
            for article in &articles {
                println!("{}  {}  {}", article.id, article.date.to_rfc3339(), article.title);
            }
            info!("{} article(s)", articles.len());
        }
        Commands::Analyze => analyze(&storage, model).await?,
        Commands::Generate { topic, length } => generate(&storage, model, &topic, &length).await?,
    }

    Ok(())
}
