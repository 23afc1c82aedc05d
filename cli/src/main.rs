use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use recommender::{
    build_index, items_from_records, load_records, recommend_scored, BuiltIndex, DocumentSource,
    RecommenderConfig, Weighting, DEFAULT_K,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recommend")]
#[command(about = "Content-based movie recommendations from plot text or metadata soups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Catalog path (.json, .jsonl, or a directory of them)
    #[arg(long)]
    input: String,
    /// Document to vectorize: plot or soup
    #[arg(long, default_value_t = DocumentSource::Plot)]
    document: DocumentSource,
    /// tfidf or count; defaults to tfidf for plot and count for soup
    #[arg(long)]
    weighting: Option<Weighting>,
    /// JSON file with vectorizer settings
    #[arg(long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the items most similar to a title
    Similar {
        #[command(flatten)]
        index: IndexArgs,
        /// Title to find neighbors for (exact match)
        #[arg(long)]
        title: String,
        /// Number of neighbors
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
        /// Print scores next to titles
        #[arg(long, default_value_t = false)]
        scores: bool,
    },
    /// Build the index and report catalog statistics
    Stats {
        #[command(flatten)]
        index: IndexArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Similar { index, title, k, scores } => {
            let built = load_and_build(&index)?;
            let neighbors = recommend_scored(&title, &built, k)?;
            for n in neighbors {
                if scores {
                    println!("{:.6}\t{}", n.score, n.title);
                } else {
                    println!("{}", n.title);
                }
            }
            Ok(())
        }
        Commands::Stats { index } => {
            let built = load_and_build(&index)?;
            report_stats(&built);
            Ok(())
        }
    }
}

fn resolve_config(args: &IndexArgs) -> Result<RecommenderConfig> {
    RecommenderConfig::resolve(args.config.as_deref(), args.document, args.weighting)
}

fn load_and_build(args: &IndexArgs) -> Result<BuiltIndex> {
    let config = resolve_config(args)?;
    let records = load_records(&args.input)?;
    tracing::info!(records = records.len(), input = %args.input, document = %args.document, "loaded catalog");
    let items = items_from_records(&records, args.document);
    Ok(build_index(&items, &config)?)
}

fn report_stats(built: &BuiltIndex) {
    tracing::info!(
        items = built.len(),
        distinct_titles = built.titles().len(),
        vocabulary = built.vocabulary_size(),
        weighting = %built.weighting(),
        "index stats"
    );
    println!("items\t{}", built.len());
    println!("distinct_titles\t{}", built.titles().len());
    println!("vocabulary\t{}", built.vocabulary_size());
    for title in built.titles().duplicates() {
        let kept = built.titles().get(title).unwrap_or_default();
        println!("duplicate\t{title}\t(resolves to position {kept})");
    }
}
