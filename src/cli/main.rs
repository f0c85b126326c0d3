//! CLI binary entry point for farmpro-reports

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use farmpro_reports::cli::commands::decode::handle_decode;
use farmpro_reports::cli::commands::download::{DownloadArgs, handle_download};
use farmpro_reports::cli::commands::generate::{GenerateArgs, handle_generate};
use farmpro_reports::cli::commands::list::{ListArgs, handle_list};
use farmpro_reports::cli::commands::stats::handle_stats;
use farmpro_reports::config::{AppConfig, CONFIG_FILENAME};
use farmpro_reports::service::DEFAULT_PAGE_SIZE;

#[derive(Parser)]
#[command(name = "farmpro-reports")]
#[command(about = "Generate and download FarmPro back office reports")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a new report request
    Generate {
        /// Report category (Financial, Health, Resources, Sales)
        #[arg(short = 't', long = "type", default_value = "Financial")]
        report_type: String,
        /// Date range (Last 7 days, Last 30 days, This month)
        #[arg(short, long, default_value = "Last 7 days")]
        range: String,
        /// Output format (PDF, CSV, JSON)
        #[arg(short, long, default_value = "PDF")]
        format: String,
        /// Report title; defaults to "{Category} Report ({range})"
        #[arg(long)]
        title: Option<String>,
    },

    /// List stored reports, most recent first
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: i64,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show month-to-date revenue, costs and herd size
    Stats,

    /// Render a stored report
    Download {
        /// Report id
        id: i64,
        /// Override the stored format (PDF, CSV, JSON)
        #[arg(short, long)]
        format: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,
    },

    /// Decode a report description offline
    Decode {
        description: String,
        /// Category used for the canonical re-encoding
        #[arg(long)]
        category: Option<String>,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Decode {
        description,
        category,
    } = &cli.command
    {
        handle_decode(description, category.as_deref());
        return Ok(());
    }

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Generate {
            report_type,
            range,
            format,
            title,
        } => handle_generate(
            &config,
            &GenerateArgs {
                report_type,
                date_range: range,
                format,
                title,
            },
        )?,
        Commands::List {
            page,
            page_size,
            json,
        } => handle_list(
            &config,
            &ListArgs {
                page,
                page_size,
                json,
            },
        )?,
        Commands::Stats => handle_stats(&config)?,
        Commands::Download {
            id,
            format,
            output,
            force,
        } => handle_download(
            &config,
            &DownloadArgs {
                id,
                format,
                output,
                force,
            },
        )?,
        Commands::Decode { .. } => {}
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
