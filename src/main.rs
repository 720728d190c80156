//! CLI entry point for spacetravelling

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spacetravelling")]
#[command(version)]
#[command(about = "A Prismic-backed blog front-end", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (preview endpoints and page data)
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Generate static page data
    #[command(alias = "g")]
    Generate,

    /// List posts
    List {
        /// Follow "load more" until every post is listed
        #[arg(short, long)]
        all: bool,
    },

    /// Show a single post
    Post {
        /// Post uid
        slug: String,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "spacetravelling=debug,tower_http=debug,info"
    } else {
        "spacetravelling=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let app = spacetravelling::Spacetravelling::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            spacetravelling::server::start(&app, &ip, port).await?;
        }

        Commands::Generate => {
            let app = spacetravelling::Spacetravelling::new(&base_dir)?;
            tracing::info!("Generating page data...");
            let count = app.generate().await?;
            println!("Generated {} posts into {:?}", count, app.public_dir);
        }

        Commands::List { all } => {
            let app = spacetravelling::Spacetravelling::new(&base_dir)?;
            let client = app.client()?;
            spacetravelling::commands::list::run(&app, &client, all).await?;
        }

        Commands::Post { slug } => {
            let app = spacetravelling::Spacetravelling::new(&base_dir)?;
            let client = app.client()?;
            spacetravelling::commands::post::run(&app, &client, &slug).await?;
        }

        Commands::Clean => {
            let app = spacetravelling::Spacetravelling::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("spacetravelling version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
