//! CLI entry point for sitecheck

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sitecheck")]
#[command(version)]
#[command(about = "Check and manage the content of a theme-driven static blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Configuration file, relative to the base directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter configuration and content tree
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new unpublished post
    New {
        /// Title of the new post
        title: String,

        /// File name (without extension); defaults to the slugified title
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Validate configuration and front-matter
    #[command(alias = "c")]
    Check {
        /// Emit diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List site information
    List {
        /// Type of content to list (posts, drafts, tags, menu)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "sitecheck=debug,info"
    } else {
        "sitecheck=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let open_site = || sitecheck::Site::open(&base_dir, cli.config.as_deref());

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            sitecheck::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, name } => {
            let site = open_site()?;
            let path = sitecheck::commands::new::create_post(&site, &title, name.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Check { json } => {
            let site = open_site()?;
            let report = sitecheck::commands::check::run(&site, json)?;
            if report.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::List { r#type, json } => {
            let site = open_site()?;
            sitecheck::commands::list::run(&site, &r#type, json)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
