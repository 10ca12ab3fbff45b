use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zmna_config::Config;

mod commands;
mod controller;
mod events;
mod state;
mod storage;

#[cfg(test)]
mod tests;

/// Georgian verb record editor
#[derive(Parser)]
#[command(name = "zmna", version, about)]
struct Cli {
    /// JSON config file; fields it omits take their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a draft (or record) and print the canonical record
    Assemble { draft: PathBuf },
    /// Check a raw gloss against an argument pattern
    CheckGloss { pattern: String, gloss: String },
    /// Print the effective preverb and translation for a tense
    Resolve {
        draft: PathBuf,
        preverb: String,
        tense: String,
    },
    /// Replay JSON-lines edit events against a stored draft, then save it
    Edit { key: String, events: PathBuf },
    /// Ask the example service for sentences
    Examples {
        draft: PathBuf,
        tense: String,
        preverbs: Vec<String>,
    },
    /// Search noun or adjective reference data
    Lookup {
        /// `noun` or `adjective`
        kind: String,
        #[arg(default_value = "")]
        text: String,
        #[arg(long)]
        category: Vec<String>,
        #[arg(long)]
        domain: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config);

    match cli.command {
        Command::Assemble { draft } => commands::assemble(&config, &draft),
        Command::CheckGloss { pattern, gloss } => commands::check_gloss(&pattern, &gloss),
        Command::Resolve {
            draft,
            preverb,
            tense,
        } => commands::resolve(&config, &draft, &preverb, &tense),
        Command::Edit { key, events } => commands::edit(config, &key, &events).await,
        Command::Examples {
            draft,
            tense,
            preverbs,
        } => commands::examples(&config, &draft, &tense, &preverbs).await,
        Command::Lookup {
            kind,
            text,
            category,
            domain,
        } => commands::lookup(&config, &kind, &text, category, domain),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Config::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
        }
        None => Ok(Config::new()),
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}
