use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use vitalhealth_pdf::{
    BrandingRequest, HttpLogoFetcher, LogoFetcher, NoopFetcher, PlanRequest, RenderConfig,
    RenderedReport, ReportRenderer, ReportRequest, SectionsRequest, SupplementRequest,
};

#[derive(Parser)]
#[command(
    name = "vitalhealth-pdf",
    about = "Render VitalHealth health reports as branded PDFs",
    version,
    author
)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report payload (JSON) to a PDF file
    Render {
        /// Report payload file
        input: PathBuf,

        /// Output file path (defaults to the suggested report file name)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Directory for the suggested report file name
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,

        /// Render configuration overrides (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Never download logos referenced by URL
        #[arg(long)]
        offline: bool,
    },

    /// Check a report payload without rendering it
    Validate {
        /// Report payload file
        input: PathBuf,
    },

    /// Write an example report payload
    Sample {
        /// Output file path
        #[arg(short, long, default_value = "payload.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            output_dir,
            config,
            offline,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => RenderConfig::default(),
            };
            let request = load_request(&input)?;
            let renderer = ReportRenderer::new(config)?;

            let rendered = if offline {
                render(&renderer, request, &NoopFetcher).await?
            } else {
                let fetcher = remote_fetcher(&renderer)?;
                render(&renderer, request, &fetcher).await?
            };

            let path = output.unwrap_or_else(|| output_dir.join(&rendered.filename));
            std::fs::write(&path, &rendered.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!(
                "✓ Report written to {} ({} page{})",
                path.display(),
                rendered.page_count,
                if rendered.page_count == 1 { "" } else { "s" }
            );
        }

        Commands::Validate { input } => {
            let request = load_request(&input)?;
            match request.validate(&RenderConfig::default()) {
                Ok(report) => {
                    let identity = report.identity();
                    println!(
                        "✓ Payload is valid: {} ({})",
                        identity.name(),
                        identity.analysis_date()
                    );
                }
                Err(e) => {
                    eprintln!("Error: invalid report payload");
                    for field in e.fields() {
                        eprintln!("  - {field}");
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Sample { output } => {
            let json = serde_json::to_string_pretty(&sample_request())?;
            std::fs::write(&output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("✓ Sample payload written to {}", output.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "vitalhealth_pdf=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_request(path: &Path) -> Result<ReportRequest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&json)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(ReportRequest::deserialize_from(value)?)
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("{} is not a render configuration", path.display()))
}

fn remote_fetcher(renderer: &ReportRenderer) -> Result<HttpLogoFetcher> {
    HttpLogoFetcher::new(renderer.config().logo_timeout())
        .context("Failed to build the logo HTTP client")
}

async fn render<F: LogoFetcher>(
    renderer: &ReportRenderer,
    request: ReportRequest,
    fetcher: &F,
) -> Result<RenderedReport> {
    debug!(
        logo_url = request
            .branding
            .as_ref()
            .and_then(|b| b.logo_url.as_deref()),
        "Rendering report"
    );
    Ok(renderer.generate(request, fetcher).await?)
}

fn sample_request() -> ReportRequest {
    ReportRequest {
        patient_name: Some("María Camila Restrepo".to_string()),
        patient_age: Some("42".to_string()),
        patient_sex: Some("Femenino".to_string()),
        analysis_date: Some("15/03/2024".to_string()),
        sections: Some(SectionsRequest {
            general_state: Some(
                "Estado general estable, con buena respuesta del sistema inmunológico."
                    .to_string(),
            ),
            positives: Some("Función hepática y renal dentro de rangos normales.".to_string()),
            watch_items: Some("Ligera deshidratación.\nNiveles de estrés elevados.".to_string()),
            abnormal_findings: Some("Tensión muscular en la zona cervical.".to_string()),
            current_feeling: Some("Cansancio por las tardes y sueño interrumpido.".to_string()),
            projection: Some(
                "Con el plan propuesto se espera una mejora notable en 30 días.".to_string(),
            ),
            follow_up: Some("Nuevo análisis en 30 días".to_string()),
            plan: Some(PlanRequest {
                habits: vec![
                    "Beber 2 litros de agua al día".to_string(),
                    "Caminar 30 minutos en la mañana".to_string(),
                ],
                supplements: vec![SupplementRequest {
                    name: Some("Omega 3".to_string()),
                    dosage: Some("1 cápsula diaria".to_string()),
                    duration_days: Some(30),
                    notes: Some("Tomar con el almuerzo".to_string()),
                }],
            }),
        }),
        branding: Some(BrandingRequest {
            contact: Some("+57 300 000 0000".to_string()),
            distributor: Some("Distribuidor VitalHealth".to_string()),
            ..Default::default()
        }),
    }
}
