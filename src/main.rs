use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use gpumatch::prelude::*;
use gpumatch_core::{coerce_number, format_number};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend graphics cards matching a partial description
#[derive(Parser, Debug)]
#[command(name = "gpumatch")]
#[command(version, about = "Graphics card recommender", long_about = None)]
struct Args {
    /// Path to the catalog document
    #[arg(short, long, default_value = "gpus.json", global = true)]
    catalog: PathBuf,

    /// Path to the fitted encoding artifact
    #[arg(short, long, default_value = "gpu_model.bin", global = true)]
    model: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit the feature encoding on the catalog and write the artifact
    Fit,

    /// Rank catalog cards against a partial query
    Predict(PredictArgs),

    /// Show the fitted artifact's statistics and vocabularies
    Inspect,

    /// View or edit the catalog document
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Weighted exact-match rules
    Expert,
    /// Cosine nearest neighbors over the fitted encoding
    Neighbor,
}

#[derive(clap::Args, Debug)]
struct PredictArgs {
    #[arg(long, value_enum, default_value_t = Method::Expert)]
    method: Method,

    #[command(flatten)]
    query: QueryArgs,

    /// Maximum results for the expert method
    #[arg(long, default_value_t = gpumatch_core::DEFAULT_TOP_N)]
    top_n: usize,

    /// Number of neighbors for the neighbor method
    #[arg(long, default_value_t = gpumatch_core::DEFAULT_NEIGHBORS)]
    neighbors: usize,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Show per-attribute contributions (expert method)
    #[arg(long)]
    explain: bool,
}

#[derive(clap::Args, Debug)]
struct QueryArgs {
    /// Query as a JSON object; individual flags override its keys
    #[arg(long)]
    query: Option<String>,

    #[arg(long)]
    manufacturer: Option<String>,

    #[arg(long)]
    architecture: Option<String>,

    #[arg(long)]
    performance: Option<String>,

    /// Thermal design power; non-numeric values are ignored
    #[arg(long)]
    tdp: Option<String>,

    /// Power draw; non-numeric values are ignored
    #[arg(long)]
    power: Option<String>,
}

#[derive(clap::Args, Debug)]
struct CardArgs {
    /// Card name
    #[arg(long)]
    name: String,

    #[arg(long)]
    manufacturer: Option<String>,

    #[arg(long)]
    architecture: Option<String>,

    #[arg(long)]
    performance: Option<String>,

    #[arg(long)]
    tdp: Option<String>,

    #[arg(long)]
    power: Option<String>,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// List all records with their indexes
    List,
    /// Append a record
    Add(CardArgs),
    /// Replace the record at an index
    Update {
        index: usize,
        #[command(flatten)]
        card: CardArgs,
    },
    /// Delete the record at an index
    Delete { index: usize },
}

impl QueryArgs {
    fn to_query(&self) -> anyhow::Result<Query> {
        let mut value = match &self.query {
            Some(raw) => serde_json::from_str::<Value>(raw).context("--query is not valid JSON")?,
            None => Value::Object(Default::default()),
        };
        let Some(obj) = value.as_object_mut() else {
            bail!("--query must be a JSON object");
        };

        let flags = [
            (Attribute::Manufacturer, &self.manufacturer),
            (Attribute::Architecture, &self.architecture),
            (Attribute::Performance, &self.performance),
            (Attribute::Tdp, &self.tdp),
            (Attribute::Power, &self.power),
        ];
        for (attr, flag) in flags {
            if let Some(v) = flag {
                obj.insert(attr.key().to_string(), Value::String(v.clone()));
            }
        }

        Ok(Query::from_value(&value))
    }
}

impl CardArgs {
    fn to_record(&self) -> CardRecord {
        let mut record = CardRecord::new(self.name.clone());
        if let Some(v) = &self.manufacturer {
            record = record.with_manufacturer(v.clone());
        }
        if let Some(v) = &self.architecture {
            record = record.with_architecture(v.clone());
        }
        if let Some(v) = &self.performance {
            record = record.with_performance(v.clone());
        }
        record.tdp = self.tdp.as_ref().and_then(|v| coerce_number(&Value::String(v.clone())));
        record.power = self.power.as_ref().and_then(|v| coerce_number(&Value::String(v.clone())));
        record
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Catalog document: {:?}", args.catalog);
    debug!("Model artifact: {:?}", args.model);

    match &args.command {
        Command::Fit => fit(&args),
        Command::Predict(predict_args) => predict(&args, predict_args),
        Command::Inspect => inspect(&args),
        Command::Catalog(command) => catalog(&args, command),
    }
}

fn fit(args: &Args) -> anyhow::Result<()> {
    let store = CatalogStore::open(&args.catalog)?;
    let artifacts = ArtifactStore::new(&args.model);
    let fitted = artifacts.refit(store.snapshot())?;

    info!(
        "Model saved successfully: {} records, {} features",
        fitted.catalog().len(),
        fitted.encoder().dim()
    );
    Ok(())
}

fn predict(args: &Args, predict_args: &PredictArgs) -> anyhow::Result<()> {
    let query = predict_args.query.to_query()?;
    let config = MatcherConfig::default()
        .with_top_n(predict_args.top_n)
        .with_neighbors(predict_args.neighbors);
    debug!("Query: {:?}, config: {:?}", query, config);

    let results = match predict_args.method {
        Method::Expert => {
            let store = CatalogStore::open(&args.catalog)?;
            let matcher = RuleMatcher::new(store.snapshot());
            if predict_args.explain && !predict_args.json {
                print_explanations(&matcher, &query, config.top_n);
                return Ok(());
            }
            matcher.predict(&query, config.top_n)
        }
        Method::Neighbor => {
            let fitted = ArtifactStore::new(&args.model).load()?;
            warn_if_stale(args, &fitted);
            let matcher = NeighborMatcher::new(fitted).with_neighbors(config.neighbors);
            matcher.predict(&query)
        }
    };

    if predict_args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    match predict_args.method {
        Method::Expert => {
            println!("Top {} Matching GPUs:", config.top_n);
            for m in &results {
                println!("{} - Score: {:.1}", m.name, m.score);
            }
        }
        Method::Neighbor => {
            println!("Top {} Predicted GPUs:", config.neighbors);
            for m in &results {
                println!("{}: {:.4}", m.name, m.score);
            }
        }
    }
    Ok(())
}

fn print_explanations(matcher: &RuleMatcher, query: &Query, top_n: usize) {
    println!("Top {} Matching GPUs:", top_n);
    for (m, breakdown) in matcher.predict_explained(query, top_n) {
        let parts: Vec<String> = breakdown
            .iter()
            .filter(|c| c.matched)
            .map(|c| format!("{} +{:.1}", c.attribute, c.score))
            .collect();
        println!("{} - Score: {:.1} ({})", m.name, m.score, parts.join(", "));
    }
}

fn warn_if_stale(args: &Args, fitted: &FittedEncoding) {
    match CatalogStore::open(&args.catalog) {
        Ok(store) => {
            if fitted.is_stale_for(&store.snapshot()) {
                warn!(
                    "Catalog {:?} changed since the model was fitted at {}; predictions use the fitted snapshot. Run `gpumatch fit` to refresh.",
                    args.catalog,
                    fitted.fitted_at()
                );
            }
        }
        Err(e) => debug!("Skipping staleness check: {}", e),
    }
}

fn inspect(args: &Args) -> anyhow::Result<()> {
    let fitted = ArtifactStore::new(&args.model).load()?;
    let encoder = fitted.encoder();

    println!("Artifact:    {}", args.model.display());
    println!("Fitted at:   {}", fitted.fitted_at());
    println!("Records:     {}", fitted.catalog().len());
    println!("Fingerprint: {}", fitted.fingerprint());
    println!("Dimensions:  {}", encoder.dim());

    for stats in encoder.numeric_stats() {
        println!(
            "  {}: median={} mean={:.4} std={:.4}",
            stats.attribute,
            format_number(stats.median),
            stats.mean,
            stats.scale
        );
    }
    for vocab in encoder.vocabularies() {
        println!("  {}: [{}]", vocab.attribute, vocab.categories.join(", "));
    }

    match CatalogStore::open(&args.catalog) {
        Ok(store) => {
            let state = if fitted.is_stale_for(&store.snapshot()) {
                "stale"
            } else {
                "current"
            };
            println!("Catalog:     {} ({})", args.catalog.display(), state);
        }
        Err(e) => println!("Catalog:     unavailable ({})", e),
    }
    Ok(())
}

fn catalog(args: &Args, command: &CatalogCommand) -> anyhow::Result<()> {
    match command {
        CatalogCommand::List => {
            let store = CatalogStore::open(&args.catalog)?;
            for (i, record) in store.records().iter().enumerate() {
                println!("{:>4}  {}", i, format_record(record));
            }
        }
        CatalogCommand::Add(card) => {
            let store = CatalogStore::open_or_create(&args.catalog)?;
            let index = store.add(card.to_record())?;
            info!("Added record {} to {:?}", index, args.catalog);
        }
        CatalogCommand::Update { index, card } => {
            let store = CatalogStore::open(&args.catalog)?;
            store.update(*index, card.to_record())?;
            info!("Updated record {} in {:?}", index, args.catalog);
        }
        CatalogCommand::Delete { index } => {
            let store = CatalogStore::open(&args.catalog)?;
            let removed = store.delete(*index)?;
            info!("Deleted record {} ({}) from {:?}", index, removed.name, args.catalog);
        }
    }
    Ok(())
}

fn format_record(record: &CardRecord) -> String {
    let text = |v: Option<&str>| v.unwrap_or("-").to_string();
    let number = |v: Option<f64>| v.map_or_else(|| "-".to_string(), format_number);
    format!(
        "{} | {} | tdp {} | power {} | {} | {}",
        record.name,
        text(record.manufacturer()),
        number(record.tdp),
        number(record.power),
        text(record.architecture()),
        text(record.performance()),
    )
}
