use phantom_authorizer::logging::{self, LogFormat};
use phantom_authorizer::{Authorizer, AuthorizerOutcome, AuthorizerRequest, Config, server};

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const UNAUTHORIZED: &str = "Unauthorized";

#[derive(Parser)]
#[command(
    name = "phantom-authorizer",
    about = "API gateway authorizer exchanging opaque tokens for phantom tokens",
    version
)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Authorize a single gateway event
    ///
    /// Prints the decision JSON on stdout. A hard reject prints
    /// "Unauthorized" on stderr and exits with status 1.
    Invoke {
        /// Event file (reads stdin when omitted)
        #[arg(long, short = 'e')]
        event: Option<PathBuf>,
    },

    /// Serve POST /authorize over HTTP
    Serve {
        /// Address to bind
        #[arg(long, short = 'b', default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    load_dotenv()?;
    let config = Config::load().context("Failed to load configuration")?;
    let authorizer = Authorizer::from_config(&config)?;
    tracing::info!(
        endpoint = %config.introspection_endpoint,
        required_scope = %authorizer.required_scope(),
        "Configuration loaded"
    );

    match cli.command {
        Command::Invoke { event } => invoke(&authorizer, event).await,
        Command::Serve { bind } => {
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind {bind}"))?;

            server::serve(listener, Arc::new(authorizer), async {
                if tokio::signal::ctrl_c().await.is_err() {
                    tracing::warn!("Failed to listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
                tracing::info!("Shutting down server");
            })
            .await?;

            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load `.env` from the working directory when present.
///
/// Variables already set in the environment win over the file.
fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            Ok(())
        }
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("Failed to load .env file"),
    }
}

async fn invoke(
    authorizer: &Authorizer<phantom_authorizer::IntrospectionClient>,
    event: Option<PathBuf>,
) -> Result<ExitCode> {
    let raw = match event {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read event file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    let request: AuthorizerRequest =
        serde_json::from_str(&raw).context("Failed to parse authorizer event")?;

    match authorizer.authorize(&request).await {
        AuthorizerOutcome::Decision(decision) => {
            println!("{}", serde_json::to_string(&decision)?);
            Ok(ExitCode::SUCCESS)
        }
        AuthorizerOutcome::Unauthorized => {
            eprintln!("{UNAUTHORIZED}");
            Ok(ExitCode::FAILURE)
        }
    }
}
