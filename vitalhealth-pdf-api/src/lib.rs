//! # vitalhealth-pdf-api
//!
//! REST service that turns VitalHealth report payloads into PDF downloads.
//!

mod api;
mod config;

pub use api::{
    app, generate_pdf, service_info, AppError, AppState, ErrorResponse, MAX_BODY_BYTES,
};
pub use config::{ConfigError, ServerConfig, DEFAULT_ADDR};
