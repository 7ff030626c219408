//! Critique - constructive AI feedback service
//!
//! Entry point for the HTTP server and a small command-line client.

use anyhow::Context;
use clap::{Parser, Subcommand};
use critique_core::{
    api::{ApiServer, ApiServerConfig},
    CritiqueConfig, FeedbackClient, FeedbackGenerator, FeedbackService, LibsqlStorage, UserId,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "critique")]
#[command(about = "Constructive AI feedback service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Configuration file (defaults to ./critique.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Server address (overrides server.addr)
        #[arg(long)]
        addr: Option<String>,

        /// Database path or :memory: (overrides storage.database)
        #[arg(long)]
        database: Option<String>,
    },

    /// Create and migrate the database
    Init {
        /// Database path (overrides storage.database)
        #[arg(long)]
        database: Option<String>,
    },

    /// Submit text to a running server and print the feedback
    Submit {
        /// User ID to submit as
        #[arg(long, env = "CRITIQUE_USER")]
        user: String,

        /// API base URL
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        api: String,

        /// Text to get feedback on
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Print the newest feedback records for a user
    History {
        /// User ID to query
        #[arg(long, env = "CRITIQUE_USER")]
        user: String,

        /// API base URL
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        api: String,
    },
}

fn init_tracing(log_level: &str) {
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let level = level.as_str().to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "critique={level},critique_core={level},tower_http={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(config: CritiqueConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .server
        .addr
        .parse()
        .with_context(|| format!("Invalid server address '{}'", config.server.addr))?;

    let storage = LibsqlStorage::from_path(&config.storage.database).await?;
    let generator = FeedbackGenerator::from_config(&config.llm)?;
    let service = Arc::new(FeedbackService::new(Arc::new(generator), Arc::new(storage)));

    let server = ApiServer::new(
        ApiServerConfig {
            addr,
            user_header: config.auth.user_header.clone(),
        },
        service,
    );

    tokio::select! {
        result = server.serve() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping API server...");
        }
    }

    info!("API server shut down complete");
    Ok(())
}

fn print_entry(entry: &critique_core::FeedbackEntry) {
    println!("[{}] {}", entry.created_at.format("%Y-%m-%d %H:%M"), entry.id);
    println!("  > {}", entry.user_input);
    println!();
    println!("{}", entry.feedback);
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    debug!("Critique v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = CritiqueConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { addr, database } => {
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            if let Some(database) = database {
                config.storage.database = database;
            }
            serve(config).await
        }
        Commands::Init { database } => {
            let database = database.unwrap_or(config.storage.database);
            let storage = LibsqlStorage::from_path(&database).await?;
            storage.check_database_health().await?;
            println!("Database ready: {}", database);
            Ok(())
        }
        Commands::Submit { user, api, text } => {
            let mut client = FeedbackClient::new(&api, UserId::new(user)?)?
                .with_user_header(config.auth.user_header);
            let entry = client.submit(&text.join(" ")).await?;
            print_entry(&entry);
            Ok(())
        }
        Commands::History { user, api } => {
            let mut client = FeedbackClient::new(&api, UserId::new(user)?)?
                .with_user_header(config.auth.user_header);
            let history = client.refresh_history().await?;
            if history.is_empty() {
                println!("No feedback yet.");
            }
            for entry in history.entries() {
                print_entry(entry);
            }
            Ok(())
        }
    }
}
