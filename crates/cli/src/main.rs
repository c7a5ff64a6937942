use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dataset::{clean_records, read_movies_csv};
use model::{evaluate, stratified_split, DecisionTree, ModelArtifact, TreeParams};
use pipeline::{vectorize_dataset, FeatureSchema, MovieInput};
use server::{create_router, AppState, HeaderValue};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

/// Cult Classic Calculator - dataset builder and prediction service
#[derive(Parser)]
#[command(name = "cult-calc")]
#[command(about = "Build the cult film dataset, train the classifier, and serve predictions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the cult film title list and cache it on disk
    Scrape {
        /// Path of the title cache file
        #[arg(long, default_value = "cc_names.txt")]
        cache: PathBuf,

        /// Re-scrape even if the cache file already has titles
        #[arg(long)]
        refresh: bool,
    },

    /// Build the dataset, train the model, and save the artifact
    Build {
        /// Path to the TMDB movie CSV dump
        #[arg(long, default_value = "movies.csv")]
        movies: PathBuf,

        /// Path of the title cache file
        #[arg(long, default_value = "cc_names.txt")]
        cache: PathBuf,

        /// Re-scrape even if the cache file already has titles
        #[arg(long)]
        refresh: bool,

        /// Where to write the trained model artifact
        #[arg(long, default_value = "tree_model.bin")]
        model: PathBuf,

        /// Depth limit of the decision tree
        #[arg(long, default_value = "4")]
        max_depth: usize,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Seed for the stratified split
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Score a single movie against a trained model
    Predict {
        /// Path of the trained model artifact
        #[arg(long, default_value = "tree_model.bin")]
        model: PathBuf,

        /// Movie title
        #[arg(long)]
        title: String,

        /// Release year
        #[arg(long)]
        year: i32,

        /// Runtime in minutes
        #[arg(long)]
        runtime: i64,

        /// Tagline (informational only)
        #[arg(long, default_value = "")]
        tagline: String,

        /// Plot description (informational only)
        #[arg(long, default_value = "")]
        description: String,

        /// Comma-separated genre tags, e.g. "Horror, Thriller"
        #[arg(long)]
        genre: String,

        /// Box office revenue in dollars
        #[arg(long)]
        revenue: f64,

        /// Production budget in dollars
        #[arg(long)]
        budget: f64,

        /// Adult rating flag
        #[arg(long)]
        adult: bool,
    },

    /// Serve the prediction API over HTTP
    Serve {
        /// Path of the trained model artifact
        #[arg(long, default_value = "tree_model.bin")]
        model: PathBuf,

        /// Interface to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Origin allowed to call the API from a browser
        #[arg(long, default_value = "http://localhost:3000")]
        origin: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Scrape { cache, refresh } => handle_scrape(cache, refresh).await?,
        Commands::Build {
            movies,
            cache,
            refresh,
            model,
            max_depth,
            test_fraction,
            seed,
        } => handle_build(movies, cache, refresh, model, max_depth, test_fraction, seed).await?,
        Commands::Predict {
            model,
            title,
            year,
            runtime,
            tagline,
            description,
            genre,
            revenue,
            budget,
            adult,
        } => {
            let movie = MovieInput {
                title,
                year,
                runtime,
                tagline,
                description,
                genre,
                revenue,
                budget,
                adult,
            };
            handle_predict(model, movie)?
        }
        Commands::Serve {
            model,
            host,
            port,
            origin,
        } => handle_serve(model, host, port, origin).await?,
    }

    Ok(())
}

/// Handle the 'scrape' command
async fn handle_scrape(cache: PathBuf, refresh: bool) -> Result<()> {
    let client = scrape::build_client()?;

    let start = Instant::now();
    let titles = scrape::load_or_scrape(&client, &cache, refresh).await?;
    println!(
        "{} {} cult film titles in {} ({:?})",
        "✓".green(),
        titles.len(),
        cache.display(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'build' command
async fn handle_build(
    movies: PathBuf,
    cache: PathBuf,
    refresh: bool,
    model_path: PathBuf,
    max_depth: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<()> {
    // Step 1: cult title list (cache or fresh scrape)
    let client = scrape::build_client()?;
    let titles = scrape::load_or_scrape(&client, &cache, refresh).await?;
    let cult_titles: HashSet<String> = titles.into_iter().collect();
    println!("{} {} cult titles loaded", "✓".green(), cult_titles.len());

    // Step 2: raw CSV
    let start = Instant::now();
    let raw = read_movies_csv(&movies)
        .with_context(|| format!("reading movie CSV from {}", movies.display()))?;
    println!(
        "{} Read {} raw rows in {:?}",
        "✓".green(),
        raw.len(),
        start.elapsed()
    );

    // Step 3: clean and label
    let outcome = clean_records(raw, &cult_titles);
    let report = outcome.report;
    println!("{}", "Cleaning summary:".bold().blue());
    println!("{}Input rows: {}", "• ".green(), report.input_rows);
    println!("{}Missing titles dropped: {}", "• ".green(), report.missing_title);
    println!(
        "{}Duplicate titles dropped: {}",
        "• ".green(),
        report.duplicate_title
    );
    println!(
        "{}Bad release dates dropped: {}",
        "• ".green(),
        report.bad_release_date
    );
    println!(
        "{}Zero-financial rows dropped: {}",
        "• ".green(),
        report.zero_financials
    );
    println!(
        "{}Kept: {} ({} labeled cult)",
        "• ".cyan(),
        report.kept,
        report.cult
    );

    // Step 4: feature engineering
    let schema = FeatureSchema::from_records(&outcome.records);
    let (rows, labels) = vectorize_dataset(&outcome.records, &schema);
    println!(
        "{} Encoded {} rows x {} features ({} genres)",
        "✓".green(),
        rows.len(),
        schema.len(),
        schema.genres().len()
    );

    // Step 5: split and train
    let split = stratified_split(&rows, &labels, test_fraction, seed)?;
    let params = TreeParams::default().with_max_depth(max_depth);
    let start = Instant::now();
    let tree = DecisionTree::fit(&split.x_train, &split.y_train, params)?;
    println!(
        "{} Trained tree (depth {}, {} leaves) on {} rows in {:?}",
        "✓".green(),
        tree.depth(),
        tree.n_leaves(),
        split.x_train.len(),
        start.elapsed()
    );

    // Step 6: held-out evaluation
    let predictions = tree.predict_batch(&split.x_test)?;
    let metrics = evaluate(&split.y_test, &predictions)?;
    println!("{}", "Held-out metrics:".bold().blue());
    println!("{}Accuracy:  {:.3}", "• ".green(), metrics.accuracy);
    println!("{}Precision: {:.3}", "• ".green(), metrics.precision);
    println!("{}Recall:    {:.3}", "• ".green(), metrics.recall);
    println!("{}F1:        {:.3}", "• ".green(), metrics.f1);
    println!(
        "{}Test rows: {} ({} cult)",
        "• ".cyan(),
        metrics.support,
        metrics.positives
    );

    // Step 7: persist
    ModelArtifact::new(schema, tree)?.save(&model_path)?;
    println!(
        "{} Model artifact written to {}",
        "✓".green(),
        model_path.display()
    );
    Ok(())
}

/// Handle the 'predict' command
fn handle_predict(model_path: PathBuf, movie: MovieInput) -> Result<()> {
    let artifact = ModelArtifact::load(&model_path)
        .with_context(|| format!("loading model artifact from {}", model_path.display()))?;

    let explanation = artifact.explain_input(&movie)?;

    println!(
        "{}",
        format!("{} ({})", movie.title, movie.year).bold().blue()
    );
    let verdict = if explanation.label == 1 {
        "CULT CLASSIC".green().bold()
    } else {
        "not a cult classic".yellow()
    };
    println!(
        "Verdict: {} ({:.1}% cult probability)",
        verdict, explanation.probability
    );

    // Strongest factors first
    let mut factors: Vec<_> = explanation.factors.iter().collect();
    factors.sort_by(|a, b| {
        b.1.score
            .abs()
            .partial_cmp(&a.1.score.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!("Top factors:");
    for (name, factor) in factors.iter().take(5) {
        println!(
            "  {} {:+.1} pts (weight {:.2}) - {}",
            name.cyan(),
            factor.score,
            factor.weight,
            factor.details
        );
    }
    Ok(())
}

/// Handle the 'serve' command
async fn handle_serve(model_path: PathBuf, host: String, port: u16, origin: String) -> Result<()> {
    let artifact = ModelArtifact::load(&model_path)
        .with_context(|| format!("loading model artifact from {}", model_path.display()))?;
    println!(
        "{} Model loaded ({} features, {} genres)",
        "✓".green(),
        artifact.tree().n_features(),
        artifact.schema().genres().len()
    );

    let origin = HeaderValue::from_str(&origin)
        .with_context(|| format!("invalid CORS origin {origin}"))?;
    let app = create_router(AppState::new(artifact), origin);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("invalid host/port combination")?;
    println!("{} Serving on http://{}", "✓".green(), addr);
    server::serve(addr, app).await
}
