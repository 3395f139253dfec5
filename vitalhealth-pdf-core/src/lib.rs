//! # vitalhealth-pdf
//!
//! Renders VitalHealth health-analysis reports as branded, paginated A4 PDFs.
//!
//! ## Features
//!
//! - **PDF Generation**: a small PDF 1.7 writer with pages, standard fonts,
//!   filled rectangles and JPEG/PNG images
//! - **Text Layout**: AFM-based string measurement and greedy line wrapping
//! - **Report Rendering**: validation of the report payload, logo resolution
//!   (inline base64 or remote URL) and the fixed report layout
//!
//! ## Quick Start
//!
//! ```rust
//! use vitalhealth_pdf::{Logo, RenderConfig, ReportRenderer, ReportRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request: ReportRequest = serde_json::from_str(r#"{
//!     "paciente_nombre": "Ana Pérez",
//!     "secciones": {
//!         "estado_general": "Estable", "lo_bueno": "Buena hidratación",
//!         "vigilar": "Colesterol", "alterado": "Ninguno",
//!         "como_se_siente": "Con energía", "proyeccion": "Favorable",
//!         "seguimiento": "Control en 30 días",
//!         "plan_30d": {"habitos": [], "suplementos": []}
//!     }
//! }"#)?;
//!
//! let config = RenderConfig::default();
//! let report = request.validate(&config)?;
//! let renderer = ReportRenderer::new(config)?;
//! let rendered = renderer.render(&report, &Logo::Absent)?;
//!
//! assert!(rendered.bytes.starts_with(b"%PDF-"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Low-level drawing
//!
//! ```rust
//! use vitalhealth_pdf::{Color, Document, Font, Page, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! let mut page = Page::a4();
//!
//! page.graphics()
//!     .set_fill_color(Color::from_hex("#F5F1E8")?)
//!     .rect(0.0, 0.0, 595.0, 842.0)
//!     .fill();
//!
//! page.text()
//!     .set_font(Font::HelveticaBold, 16.0)
//!     .at(40.0, 702.0)
//!     .write("Hola");
//!
//! doc.add_page(page);
//! let bytes = doc.to_bytes()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod graphics;
pub mod objects;
pub mod page;
pub mod report;
pub mod text;
pub mod writer;

pub use document::{Document, DocumentMetadata};
pub use error::{PdfError, Result};
pub use graphics::{Color, GraphicsContext, Image, ImageColorSpace, ImageFormat};
pub use page::Page;
pub use text::{measure_text, wrap_lines, Font, TextContext};

pub use report::{
    report_filename, Branding, BrandingRequest, Element, FieldError, FieldProblem, Footer,
    LayoutCanvas, Logo, LogoFetcher, LogoSource, NoopFetcher, PageGeometry, PageLayout,
    Palette, PatientIdentity, PlanRequest, RenderConfig, RenderedReport, Report, ReportError,
    ReportLayout, ReportRenderer, ReportRequest, ReportSections, SectionLabels,
    SectionsRequest, Supplement, SupplementRequest, TextRun, ThirtyDayPlan, ValidationError,
    MAX_LOGO_BYTES,
};

#[cfg(feature = "remote-logo")]
pub use report::HttpLogoFetcher;

/// Current version of vitalhealth-pdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
