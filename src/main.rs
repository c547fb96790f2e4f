use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rsesa::{api, EsaEngine, PreprocessOptions, TfIdf};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Explicit Semantic Analysis text classifier", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assign every text file the most similar concept file
    Classify {
        /// Directory of concept documents
        #[arg(short, long)]
        concepts: PathBuf,

        /// Directory of texts to classify
        #[arg(short, long)]
        texts: PathBuf,

        /// Print results as JSON, including all scores
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// Serve the classifier over HTTP
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        addr: String,

        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// JSON file with preprocessing options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Language used for stop-words and stemming
    #[arg(short, long)]
    language: Option<String>,

    /// Skip stemming
    #[arg(long)]
    no_stem: bool,

    /// Keep stop-words
    #[arg(long)]
    keep_stopwords: bool,

    /// Use raw term counts instead of dividing by the number of distinct terms
    #[arg(long)]
    raw_tf: bool,
}

impl ModelArgs {
    fn preprocess_options(&self) -> Result<PreprocessOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => PreprocessOptions::default(),
        };

        if let Some(language) = &self.language {
            options.language = language.clone();
        }
        if self.no_stem {
            options.stem = false;
        }
        if self.keep_stopwords {
            options.remove_stopwords = false;
        }

        Ok(options)
    }

    fn engine(&self) -> Result<EsaEngine> {
        let options = self.preprocess_options()?;
        let engine = EsaEngine::new(options).context("Failed to configure preprocessing")?;
        Ok(engine.with_model(TfIdf::new(!self.raw_tf)))
    }
}

fn classify(concepts: PathBuf, texts: PathBuf, json: bool, model: &ModelArgs) -> Result<()> {
    let engine = model.engine()?;

    let start = Instant::now();
    let results = engine
        .run_directories(&concepts, &texts)
        .context("Classification failed")?;
    tracing::info!("Classified {} texts in {:?}", results.len(), start.elapsed());

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (text, classification) in &results {
            println!("{}\t{}", text, classification.concept);
        }
    }

    Ok(())
}

async fn serve(addr: String, model: &ModelArgs) -> Result<()> {
    let engine = Arc::new(model.engine()?);
    let app = api::create_router(engine).layer(tower_http::trace::TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Classify {
            concepts,
            texts,
            json,
            model,
        } => classify(concepts, texts, json, &model),
        Command::Serve { addr, model } => serve(addr, &model).await,
    }
}
