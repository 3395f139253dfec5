use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitalhealth_pdf::{HttpLogoFetcher, ReportRenderer};
use vitalhealth_pdf_api::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vitalhealth_pdf_api=debug,vitalhealth_pdf=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let fetcher = HttpLogoFetcher::new(config.render.logo_timeout())
        .context("Failed to build the logo HTTP client")?;
    let renderer = ReportRenderer::new(config.render)?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;

    info!("VitalHealth PDF service listening on http://{}", config.addr);

    axum::serve(listener, app(AppState::new(renderer, fetcher))).await?;
    Ok(())
}
