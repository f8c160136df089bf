use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use huddle_server::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huddle", version, about = "Real-time room coordination server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the WebSocket coordination server.
    Serve {
        /// TOML config file. Missing keys fall back to defaults.
        #[arg(long, env = "HUDDLE_CONFIG")]
        config: Option<PathBuf>,

        /// Overrides `bind_address`.
        #[arg(long, env = "HUDDLE_BIND")]
        bind: Option<SocketAddr>,

        /// Overrides `jwt_secret`.
        #[arg(long, env = "HUDDLE_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,

        /// Debug logging for the server crates (ignored when RUST_LOG is set).
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print a commented default config file.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            jwt_secret,
            verbose,
        } => {
            init_tracing(verbose);

            let mut settings = match config {
                Some(path) => ServerConfig::from_file(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ServerConfig::default(),
            };
            if let Some(bind) = bind {
                settings.bind_address = bind;
            }
            if let Some(secret) = jwt_secret {
                settings.jwt_secret = secret;
            }

            huddle_server::serve(settings).await
        }
        Commands::Config => {
            print!("{}", ServerConfig::template());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,huddle_server=debug,tower_http=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
