use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use texify::capture::{InputEvent, Session};
use texify::classifier::{EchoClassifier, HttpClassifier};
use texify::config::{default_config_path, Config};
use texify::replay::{read_script, TracingSurface};

#[derive(Parser)]
#[command(name = "texify")]
#[command(about = "Draw a symbol, find its LaTeX command")]
struct Cli {
    /// Path to config.json (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a recorded event script through a capture session
    Replay {
        /// JSON Lines event script; stdin when omitted or "-"
        file: Option<PathBuf>,

        /// Print payloads instead of sending them
        #[arg(long)]
        dry_run: bool,

        /// Classifier endpoint, overriding the config
        #[arg(long)]
        url: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Write the default configuration if no file exists yet
        #[arg(long)]
        init: bool,
    },
}

/// Initialize tracing with output to stderr so stdout carries only results
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "texify=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_events(file: Option<&Path>) -> anyhow::Result<Vec<InputEvent>> {
    match file {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event script {}", path.display()))?;
            read_script(BufReader::new(file))
        }
        _ => read_script(io::stdin().lock()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    match cli.command {
        Commands::Replay {
            file,
            dry_run,
            url,
        } => {
            if let Some(url) = url {
                config.classifier_url = url;
            }
            let events = load_events(file.as_deref())?;
            tracing::info!("Replaying {} events", events.len());

            if dry_run {
                let echo = EchoClassifier::new(io::stdout());
                let mut session = Session::new(TracingSurface::new(), echo, config.canvas);
                session.run(events);
                tracing::info!("Printed {} payloads", session.classifier().submitted());
            } else {
                let classifier =
                    HttpClassifier::from_config(&config)?.on_answer(|result| match result {
                        Ok(answer) => println!("{}", answer.body),
                        Err(e) => tracing::error!("Classification failed: {}", e),
                    });
                let mut session = Session::new(TracingSurface::new(), classifier, config.canvas);
                session.run(events);

                let (_, mut classifier) = session.into_parts();
                tracing::info!(
                    "Waiting for {} submissions to {}",
                    classifier.pending(),
                    classifier.url()
                );
                classifier.drain().await;
            }
        }
        Commands::Config { init } => {
            if init && !config_path.exists() {
                Config::default().save_to(&config_path)?;
                tracing::info!("Wrote default configuration to {}", config_path.display());
            }
            println!("# {}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
