//! `promptloop` binary: run the optimization loop from the command line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use promptloop_core::{catalog, load_catalog, Product, StateUpdate};
use promptloop_runtime::orchestrator::{LoopOrchestrator, Phase, ProgressSink};
use promptloop_runtime::providers::{OpenAiProvider, OPENAI_API_KEY_ENV};
use promptloop_runtime::{ModelId, RuntimeConfig};

#[derive(Parser)]
#[command(
    name = "promptloop",
    version,
    about = "Iteratively optimize attribute-enrichment prompts with LLM agents"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full evaluate / suggest / iterate loop
    Run(RunArgs),

    /// List the products the loop evaluates against
    Products {
        /// Catalog file (YAML or JSON); defaults to the built-in samples
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show the seed prompt variants
    Prompts,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Generation model
    #[arg(long, default_value_t = ModelId::default())]
    model: ModelId,

    /// Number of loop iterations (1-10)
    #[arg(long, default_value_t = 2)]
    iterations: u32,

    /// Catalog file (YAML or JSON); defaults to the built-in samples
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Restrict the run to these product names
    #[arg(long = "products", value_name = "NAME")]
    product_names: Vec<String>,

    /// How many prompt variants to request each iteration
    #[arg(long, default_value_t = 2)]
    suggestions: usize,

    /// Enable the simulated-feedback phase
    #[arg(long)]
    feedback: bool,

    /// Write the iteration history as JSON to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Per-call timeout, e.g. "60s" or "2m"
    #[arg(long, value_parser = humantime::parse_duration, default_value = "60s")]
    timeout: Duration,
}

/// Prints each node's log delta as it lands.
struct StdoutSink;

impl ProgressSink for StdoutSink {
    fn on_update(&self, _phase: Phase, update: &StateUpdate) {
        for line in &update.logs {
            println!("{line}");
        }
    }
}

fn load_products(path: Option<&PathBuf>) -> Result<Vec<Product>> {
    match path {
        Some(path) => load_catalog(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => Ok(catalog::sample_products()),
    }
}

fn select_products(mut products: Vec<Product>, names: &[String]) -> Result<Vec<Product>> {
    if names.is_empty() {
        return Ok(products);
    }
    for name in names {
        if !products.iter().any(|p| &p.name == name) {
            let known: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
            bail!("unknown product '{name}', catalog has: {}", known.join(", "));
        }
    }
    products.retain(|p| names.contains(&p.name));
    Ok(products)
}

async fn run(args: RunArgs) -> Result<()> {
    let products = select_products(load_products(args.catalog.as_ref())?, &args.product_names)?;
    if products.is_empty() {
        bail!("catalog is empty; nothing to evaluate");
    }

    let provider = OpenAiProvider::from_env()
        .with_context(|| format!("{OPENAI_API_KEY_ENV} must be set to run the loop"))?;

    let mut config = RuntimeConfig::default()
        .with_model(args.model)
        .with_max_iterations(args.iterations)
        .with_feedback(args.feedback);
    config.num_suggestions = args.suggestions;
    config.call_timeout = args.timeout;

    let orchestrator = LoopOrchestrator::new(Arc::new(provider), config);
    let (state, report) = orchestrator
        .run(products, catalog::seed_prompts(), &StdoutSink)
        .await;

    let elapsed = (report.finished_at - report.started_at)
        .to_std()
        .unwrap_or_default();
    println!();
    println!("Run complete: {} iterations in {}", report.iterations_completed,
        humantime::format_duration(Duration::from_secs(elapsed.as_secs())));
    println!(
        "LLM calls: {} ({} failed), tokens: {}",
        report.usage.llm_calls,
        report.usage.failed_calls,
        report.usage.total_tokens()
    );
    println!("Final prompt set:");
    for prompt in &state.current_prompts {
        println!("  {} - {}", prompt.id, prompt.name);
    }

    if let Some(path) = &args.export {
        let json = state.export_history()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
        println!("History written to {}", path.display());
    }
    Ok(())
}

fn list_products(path: Option<&PathBuf>) -> Result<()> {
    for product in load_products(path)? {
        println!(
            "{} [{}] - {} attributes, {} expected",
            product.name,
            product.category,
            product.attributes.len(),
            product.expected_attributes.len()
        );
    }
    Ok(())
}

fn list_prompts() {
    for prompt in catalog::seed_prompts() {
        println!("## {} ({})", prompt.name, prompt.id);
        println!("{}", prompt.template);
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(args).await,
        Command::Products { catalog } => list_products(catalog.as_ref()),
        Command::Prompts => {
            list_prompts();
            Ok(())
        }
    }
}
