mod cards;
mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod models;
mod routes;
mod state;
mod vocabulary;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::WordDetailGenerator;
use crate::layout::{default_page_config, EmbeddedFont, FontSet};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LexiDaily API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout_secs
    );

    let generator = WordDetailGenerator::new(Arc::new(llm), config.meaning_language.clone());

    // Load the meaning-language font; export still works without it
    let fonts = Arc::new(load_fonts(&config));

    let page_config = default_page_config();
    info!(
        "Layout page config: {}x{}pt, margin {}pt",
        page_config.page_width, page_config.page_height, page_config.margin
    );

    // Build app state
    let state = AppState {
        generator,
        config: config.clone(),
        fonts,
        page_config,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_fonts(config: &Config) -> FontSet {
    let mut fonts = FontSet::builtin_only(config.meaning_language.clone());

    let Some(path) = &config.meaning_font_path else {
        warn!(
            "MEANING_FONT_PATH not set; {} meanings will be exported with Helvetica",
            config.meaning_language
        );
        return fonts;
    };

    match EmbeddedFont::load(path) {
        Ok(font) => {
            info!("Meaning font loaded: {} ({})", font.name(), path.display());
            fonts.meaning_font = Some(Arc::new(font));
        }
        Err(e) => {
            warn!("Could not load meaning font {}: {e}; using Helvetica", path.display());
        }
    }

    fonts
}
