use anyhow::Result;
use axum::Router;
use clap::Parser;
use recommender::{DocumentSource, RecommenderConfig, Weighting};
use server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog path (.json, .jsonl, or a directory of them)
    #[arg(long, default_value = "./data/movies.json")]
    catalog: String,
    /// Document to vectorize: plot or soup
    #[arg(long, default_value_t = DocumentSource::Plot)]
    document: DocumentSource,
    /// tfidf or count; overrides the config file
    #[arg(long)]
    weighting: Option<Weighting>,
    /// JSON file with vectorizer settings
    #[arg(long)]
    config: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = RecommenderConfig::resolve(args.config.as_deref(), args.document, args.weighting)?;
    let app: Router = build_app(&args.catalog, args.document, &config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
