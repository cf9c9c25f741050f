//! ata — the ATA CLI
//!
//! Ask a question about OEM tracing data and see the SQL it turns into,
//! followed by demo results.
//!
//! # Usage
//!
//! ```bash
//! # Ask a question
//! ata "top 5 oems in Texas for the last 3 months"
//!
//! # Show the result as a bar chart
//! ata "totals by state" --view chart
//!
//! # See how a question was understood
//! ata explain "for Mindray by city"
//! ```

use std::path::PathBuf;

use anyhow::Context;
use ata::prelude::*;
use ata::{mock, render};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ata")]
#[command(author = "DIT Analytics Team")]
#[command(version)]
#[command(about = "🤖 ATA — ask questions about OEM tracing data, get SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    ata 'show total quantities by OEM for the last 3 months'
    ata 'top 5 oems in Texas' --view chart
    ata 'for Mindray by city' --format json
    ata explain 'top oems by lob'")]
struct Cli {
    /// The question to ask
    question: Option<String>,

    /// How to show the result (overrides the config file)
    #[arg(long, value_enum)]
    view: Option<View>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Compact output without banner or tips
    #[arg(long, env = "ATA_EMBED")]
    embed: bool,

    /// Path to an ata.toml config file
    #[arg(short, long, env = "ATA_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a question is parsed
    Explain {
        /// The question to explain
        question: String,
    },
    /// Show the table and column names questions are mapped to
    Schema,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "ata=debug" } else { "ata=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => AtaConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AtaConfig::discover()?,
    };
    if cli.embed {
        config.display.embed = true;
    }
    if let Some(view) = cli.view {
        config.display.view = view;
    }

    let templater = Templater::new(config.schema.clone());

    match &cli.command {
        Some(Commands::Explain { question }) => {
            let spec = templater.spec(question);
            println!("{}", render::explain(question, &spec, templater.schema()));
        }
        Some(Commands::Schema) => {
            println!("{}", render::schema(templater.schema()));
        }
        None => match cli.question.as_deref().map(str::trim) {
            Some(question) if !question.is_empty() => {
                ask(question, &templater, &config.display, cli.format)?;
            }
            _ => {
                if !config.display.embed {
                    println!("{}", render::banner());
                    println!();
                    println!("Usage: ata <QUESTION> [OPTIONS]");
                    println!();
                }
                println!("{}", render::tip());
            }
        },
    }

    Ok(())
}

fn ask(
    question: &str,
    templater: &Templater,
    display: &DisplayConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    info!(%question, "asking");

    let schema = templater.schema();
    let spec = templater.spec(question);
    let sql = spec.to_sql(schema);
    let result = mock::lookup(&spec, schema);

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "question": question,
                "sql": sql,
                "spec": spec,
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if !display.embed {
                println!("{}", render::banner());
                println!();
            }
            println!("{}", render::sql_block(&sql));
            println!();

            if display.view == View::Sql {
                return Ok(());
            }

            println!("{}", "✓ Query executed successfully (demo mode)!".green());
            println!();
            match display.view {
                View::Table => println!("{}", render::table(&result)),
                View::Chart => println!("{}", render::bar_chart(&result)),
                View::Sql => {}
            }
        }
    }

    Ok(())
}
