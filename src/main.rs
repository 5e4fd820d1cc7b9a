use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use fraudcheck::classifier::Classifier;
use fraudcheck::config::Config;

/// fraudcheck: transaction fraud scoring service.
///
/// Loads a pre-trained binary classifier once at startup and scores
/// transaction amounts over HTTP (POST /detect_fraud).
#[derive(Parser)]
#[command(name = "fraudcheck", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the classifier and serve the HTTP API
    Serve {
        /// Port to listen on (overrides FRAUD_PORT, default: 5000)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind to (overrides FRAUD_BIND, default: 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Score a single transaction amount from the command line
    Predict {
        /// Transaction amount to score
        #[arg(allow_negative_numbers = true)]
        amount: f32,
    },

    /// Load the model artifact and report what was loaded
    CheckModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("fraudcheck=info,tower_http=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());

            // Fatal on a missing or corrupt artifact: never serve without a model.
            info!(path = %config.model_path.display(), "Loading classifier...");
            let classifier = fraudcheck::classifier::load(&config)?;

            fraudcheck::web::run_server(classifier, port, &bind).await?;
        }

        Commands::Predict { amount } => {
            let config = Config::load()?;
            let classifier = fraudcheck::classifier::load(&config)?;

            let verdict = fraudcheck::detect::score_amount(classifier.as_ref(), amount).await?;
            if verdict.is_fraud {
                println!("{} {}", amount, "FRAUD".red().bold());
            } else {
                println!("{} {}", amount, "legitimate".green());
            }
        }

        Commands::CheckModel => {
            let config = Config::load()?;
            println!("Model path: {}", config.model_path.display());
            println!("Backend:    {:?}", config.classifier_backend);

            let classifier = fraudcheck::classifier::load(&config)?;
            println!("{} {}", "✓".green(), classifier.describe());
        }
    }

    Ok(())
}
