//! # Sanctum
//!
//! Command-line front end for the Oracle Sanctum client.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sanctum_core::{Language, OcrKind, StaticCatalog};
use sanctum_sdk::{ClientConfig, SanctumClient};
use sanctum_session::{Sanctum, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "sanctum", version, about = "Face, palm and tarot readings")]
struct Cli {
    /// Analysis service address. Overrides SANCTUM_API_BASE.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Response language: zh, en or mi. Overrides SANCTUM_LANGUAGE.
    #[arg(long, global = true)]
    language: Option<String>,

    /// Request timeout in seconds. Overrides SANCTUM_REQUEST_TIMEOUT_SECS.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a face from an image.
    Face { image: PathBuf },
    /// Read a palm from an image.
    Palm { image: PathBuf },
    /// Draw a card and ask for its interpretation.
    Tarot {
        #[arg(long)]
        question: Option<String>,
    },
    /// Check that the analysis service is up.
    Health,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::from_env();
        match &self.language {
            Some(code) => config.with_language(Language::normalize(code)),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client_config = cli.client_config();
    let session_config = cli.session_config();
    let client = SanctumClient::new(&client_config)?;

    info!("🔮 Sanctum using {}", client.base_url());

    if let Commands::Health = cli.command {
        let health = client.health().await?;
        println!("{}: {}", client.base_url(), health.status);
        return Ok(());
    }

    let sanctum = Sanctum::spawn(
        Arc::new(client),
        Arc::new(StaticCatalog::builtin()),
        &session_config,
    );

    match cli.command {
        Commands::Face { image } => read_image(&sanctum, OcrKind::Face, image).await,
        Commands::Palm { image } => read_image(&sanctum, OcrKind::Palm, image).await,
        Commands::Tarot { question } => {
            let card = sanctum.tarot().draw(question.as_deref()).await?;
            info!("🃏 Drew {}", card.display_name);
            render::follow_tarot(sanctum.tarot()).await
        }
        Commands::Health => Ok(()),
    }
}

async fn read_image(sanctum: &Sanctum, kind: OcrKind, image: PathBuf) -> anyhow::Result<()> {
    sanctum.select_path(kind, &image).await?;
    let cycle = sanctum.ocr(kind).submit().await?;
    info!("📤 Submitted {} for {} reading (cycle {})", image.display(), kind, cycle);
    render::follow_ocr(sanctum.ocr(kind)).await
}
