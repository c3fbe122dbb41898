use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codescope::cli::commands::{self, analyze::AnalyzeOptions};
use codescope::cli::{OutputFormat, ui::Output};

#[derive(Parser)]
#[command(name = "codescope")]
#[command(version, about = "Structural code review for source trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every file under a directory and print the review
    Analyze {
        #[arg(help = "Directory to analyze (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: OutputFormat,
        #[arg(short, long, help = "Write the report to a file instead of stdout")]
        output: Option<PathBuf>,
        #[arg(long, help = "Files analyzed at once (default: available parallelism)")]
        concurrency: Option<usize>,
        #[arg(long = "timeout-ms", help = "Per-file analysis budget in milliseconds")]
        timeout_ms: Option<u64>,
        #[arg(long = "no-content", help = "Omit file text from the report")]
        no_content: bool,
    },

    /// Print only the project-wide summary
    Summary {
        #[arg(help = "Directory to analyze (default: current directory)")]
        path: Option<PathBuf>,
    },

    /// List recognized languages and how each is extracted
    Languages,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective configuration (merged from all sources)
    Show {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
    },
    /// Show configuration file paths
    Path {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            concurrency,
            timeout_ms,
            no_content,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::analyze::run(AnalyzeOptions {
                path,
                format,
                output,
                concurrency,
                timeout_ms,
                no_content,
                quiet: cli.quiet,
            }))?;
        }
        Commands::Summary { path } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::summary::run(path.as_deref()))?;
        }
        Commands::Languages => {
            commands::languages::run()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { path } => {
                commands::config::show(path.as_deref())?;
            }
            ConfigAction::Path { path } => {
                commands::config::path(path.as_deref())?;
            }
        },
    }

    Ok(())
}
