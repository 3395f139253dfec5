use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Json, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};
use vitalhealth_pdf::{LogoFetcher, ReportError, ReportRenderer, ReportRequest, ValidationError};

/// Payloads carry inline base64 logos, so allow more than axum's 2 MB default.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Standard error response structure.
///
/// ```json
/// {
///   "error": "invalid report payload: paciente_nombre is missing",
///   "fields": ["paciente_nombre"]
/// }
/// ```
///
/// `fields` is present on 422 responses only. Fields of the wrong JSON type
/// are listed the same way as missing ones.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
    /// Dotted paths of offending payload fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Application-specific error types for the API
#[derive(Debug, Error)]
pub enum AppError {
    /// Required payload fields are missing, empty or of the wrong type
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Body is not parseable JSON
    #[error("{0}")]
    BadRequest(String),
    /// Request did not declare a JSON body
    #[error("{0}")]
    UnsupportedMediaType(String),
    /// Rendering or serialisation failed
    #[error("{0}")]
    Render(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Report generation failed");
        } else {
            warn!(%status, error = %self, "Rejected report request");
        }

        let fields = match &self {
            AppError::Validation(e) => Some(e.field_paths().into_iter().map(String::from).collect()),
            _ => None,
        };
        let error_response = ErrorResponse {
            error: self.to_string(),
            fields,
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Validation(e) => AppError::Validation(e),
            other => AppError::Render(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(e) => AppError::BadRequest(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => {
                AppError::UnsupportedMediaType(e.body_text())
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// Shared, read-only state: the renderer and the logo fetcher.
pub struct AppState<F> {
    renderer: Arc<ReportRenderer>,
    fetcher: Arc<F>,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            renderer: Arc::clone(&self.renderer),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<F> AppState<F> {
    pub fn new(renderer: ReportRenderer, fetcher: F) -> Self {
        Self {
            renderer: Arc::new(renderer),
            fetcher: Arc::new(fetcher),
        }
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }
}

/// Build the application router with all routes configured.
///
/// # Routes
///
/// - `GET /` - Service acknowledgement
/// - `POST /generate-pdf` - Render a report payload as a PDF download
pub fn app<F>(state: AppState<F>) -> Router
where
    F: LogoFetcher + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(service_info::<F>))
        .route("/generate-pdf", post(generate_pdf::<F>))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Static acknowledgement used by health checks.
pub async fn service_info<F>(State(state): State<AppState<F>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "service": state.renderer.config().service_title,
    }))
}

/// Validate the payload, resolve the logo and return the rendered PDF.
pub async fn generate_pdf<F>(
    State(state): State<AppState<F>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, AppError>
where
    F: LogoFetcher + Send + Sync + 'static,
{
    let Json(value) = payload?;
    let request = ReportRequest::deserialize_from(value)?;
    let rendered = state
        .renderer
        .generate(request, state.fetcher.as_ref())
        .await?;

    let disposition = HeaderValue::from_str(&content_disposition(&rendered.filename))
        .map_err(|e| AppError::Render(format!("Invalid download file name: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response())
}

/// `attachment` disposition with an ASCII `filename` fallback and the exact
/// name as RFC 5987 `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        percent_encode(filename)
    )
}

fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
