//! Health-analysis report: payload model, validation, logo resolution,
//! layout and rendering.

mod config;
mod layout;
mod logo;
mod model;
mod renderer;
mod validation;

pub use config::{Palette, RenderConfig, SectionLabels};
pub use layout::{
    Element, Footer, LayoutCanvas, PageGeometry, PageLayout, ReportLayout, TextRun,
};
#[cfg(feature = "remote-logo")]
pub use logo::HttpLogoFetcher;
pub use logo::{Logo, LogoFetcher, NoopFetcher, MAX_LOGO_BYTES};
pub use model::{
    Branding, BrandingRequest, LogoSource, PatientIdentity, PlanRequest, Report, ReportRequest,
    ReportSections, SectionsRequest, Supplement, SupplementRequest, ThirtyDayPlan,
};
pub use renderer::{report_filename, RenderedReport, ReportRenderer};
pub use validation::{FieldError, FieldProblem, ValidationError, DATE_FORMAT};

use crate::error::PdfError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "remote-logo")]
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
