//! nl-shell — translate natural language into shell commands.
//!
//! Resolves a query once, or runs a small REPL with `--repl`. Commands
//! are printed, never executed.

use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nl_engine::{CommandCatalog, IntentClassifier, NaiveBayesModel, Resolver, SafetyPolicy};
use nl_protocol::{Platform, ResolveError};
use nl_shell::config::ShellConfig;
use nl_shell::feedback::{self, JsonlFeedbackSink};
use nl_shell::report;

#[derive(Parser, Debug)]
#[command(name = "nl-shell", version, about = "Natural language to shell command")]
struct Cli {
    /// The request, e.g. `nl-shell create a folder named demo`.
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Interactive mode: read one request per line until EOF or "exit".
    #[arg(short = 'i', long)]
    repl: bool,

    /// Target platform (windows or linux); defaults to the host.
    #[arg(long)]
    platform: Option<Platform>,

    /// TOML config file.
    #[arg(long)]
    config: Option<String>,

    /// Naive-Bayes model artifact, overriding the config.
    #[arg(long)]
    model: Option<String>,

    /// JSONL feedback log, overriding the config.
    #[arg(long)]
    feedback_log: Option<String>,

    /// Emit the full resolution as JSON instead of the plain report.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ShellConfig::from_file(path)?,
        None => ShellConfig::default(),
    };

    let platform = cli
        .platform
        .or(config.platform)
        .unwrap_or_else(Platform::detect);
    tracing::info!(%platform, version = env!("CARGO_PKG_VERSION"), "nl-shell starting");

    let catalog = match &config.catalog_path {
        Some(path) => CommandCatalog::from_json_file(path)?,
        None => CommandCatalog::builtin(),
    };
    let policy = match &config.policy_path {
        Some(path) => SafetyPolicy::from_json_file(path)?,
        None => SafetyPolicy::builtin(),
    };
    let classifier = load_classifier(cli.model.as_deref().or(config.model_path.as_deref()));

    let feedback_path = cli.feedback_log.as_deref().or(config.feedback_log.as_deref());
    let history = feedback_path.map(feedback::load_history).unwrap_or_default();
    let mut resolver = Resolver::with_history(catalog, policy, classifier, &history);
    if let Some(path) = feedback_path {
        resolver = resolver.with_feedback(Arc::new(JsonlFeedbackSink::open(path)?));
    }

    if cli.repl {
        return repl(&resolver, platform, config.suggestions, cli.json);
    }

    let query = cli.query.join(" ");
    if query.trim().is_empty() {
        anyhow::bail!("no request given; pass a query or use --repl");
    }
    if !resolve_and_print(&resolver, &query, platform, config.suggestions, cli.json) {
        std::process::exit(1);
    }
    Ok(())
}

/// A missing or unreadable model is a degradation, not a failure.
fn load_classifier(path: Option<&str>) -> Option<Arc<dyn IntentClassifier>> {
    let path = path?;
    match NaiveBayesModel::from_file(path) {
        Ok(model) => {
            tracing::info!(%path, "classifier model loaded");
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::warn!(%path, error = %e, "classifier unavailable, continuing without");
            None
        }
    }
}

fn repl(resolver: &Resolver, platform: Platform, suggestions: usize, json: bool) -> anyhow::Result<()> {
    println!("nl-shell interactive mode on {platform} (exit to quit)");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => break,
            "help" => {
                println!("type a request, e.g. \"create a folder named demo\"");
                continue;
            }
            _ => {
                resolve_and_print(resolver, line, platform, suggestions, json);
            }
        }
    }
    Ok(())
}

/// Resolve one query and print the outcome. Returns false on failure
/// so one-shot mode can exit nonzero.
fn resolve_and_print(
    resolver: &Resolver,
    query: &str,
    platform: Platform,
    suggestions: usize,
    json: bool,
) -> bool {
    match resolver.resolve(query, platform) {
        Ok(resolved) => {
            if json {
                match serde_json::to_string_pretty(&resolved) {
                    Ok(out) => println!("{out}"),
                    Err(e) => eprintln!("error: {e}"),
                }
            } else {
                print!("{}", report::render(&resolved));
            }
            true
        }
        Err(err) => {
            eprintln!("error: {err}");
            if matches!(err, ResolveError::NoMatch { .. }) {
                let near = resolver.suggestions(query, platform, suggestions);
                eprint!("{}", report::render_suggestions(&near));
            }
            false
        }
    }
}
