//! scorelink CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "scorelink", version, about = "Exam scoring and share-link tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a score report for a session
    Score {
        /// Path to a session .toml file
        #[arg(long)]
        session: PathBuf,

        /// Output format: text, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Output file (stdout for text/json when omitted; html defaults
        /// to report.html)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also generate the share fragment for this session
        #[arg(long)]
        share: bool,

        /// Request a narrative from the configured feedback provider
        #[arg(long)]
        feedback: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a share URL for a session
    Share {
        /// Path to a session .toml file
        #[arg(long)]
        session: PathBuf,

        /// Base URL the fragment is appended to
        #[arg(long)]
        base_url: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Decode a share fragment or URL back into a session file
    Decode {
        /// A fragment (`#s=...`, `#r=...`, `#report=...`) or a full URL
        /// carrying one
        input: String,

        /// Write the reconstructed session TOML here (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate session TOML files
    Validate {
        /// Path to a session file or directory
        #[arg(long)]
        session: PathBuf,
    },

    /// Create starter config and example session
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scorelink=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            session,
            format,
            output,
            share,
            feedback,
            config,
        } => commands::score::execute(session, format, output, share, feedback, config).await,
        Commands::Share {
            session,
            base_url,
            config,
        } => commands::share::execute(session, base_url, config),
        Commands::Decode { input, output } => commands::decode::execute(&input, output),
        Commands::Validate { session } => commands::validate::execute(session),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
