//! API request handlers
//!
//! `POST /` accepts either a raw JSON workbook or a multipart upload with a
//! `file` field. Uploaded JSON goes to the exporter, anything else to the
//! importer. Every failure is answered with a [`JsonError`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    BoxError, Json,
};
use serde::{Deserialize, Serialize};
use tower::timeout::error::Elapsed;
use tracing::{debug, error};

use crate::error::ConvertError;

use super::server::AppState;

pub const JSON_MIME_TYPE: &str = "application/json";
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Multipart field carrying the uploaded document
pub const UPLOAD_FIELD: &str = "file";

const WELCOME_TEMPLATE: &str = include_str!("welcome.html");

/// Error payload returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonError {
    #[serde(rename = "http_error_code")]
    pub code: u16,
    pub http_error: String,
    pub message: String,
}

impl JsonError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            http_error: status.canonical_reason().unwrap_or_default().to_string(),
            message: message.into(),
        }
    }
}

/// Handler error: a conversion failure answered as `500` + [`JsonError`]
#[derive(Debug)]
pub struct ApiError(pub ConvertError);

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        error!(error = %err, cause = %err.cause(), "HTTP error");

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        (status, Json(JsonError::new(status, err.to_string()))).into_response()
    }
}

/// GET / - Upload form (debug mode only)
pub async fn welcome() -> Html<&'static str> {
    Html(WELCOME_TEMPLATE)
}

/// POST / - Convert a JSON body or a multipart upload
pub async fn receive_file(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    if is_json(request.headers()) {
        let payload = read_body(request, &state).await?;
        return json_to_xlsx(&state, &payload);
    }

    let mut multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|_| ConvertError::MissingUploadField(UPLOAD_FIELD.to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ConvertError::Upload(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let declared_json = field.content_type().is_some_and(is_json_mime);
        let payload = field
            .bytes()
            .await
            .map_err(|e| ConvertError::Upload(e.body_text()))?;
        debug!(file = %file_name, bytes = payload.len(), json = declared_json, "Upload received");

        return if declared_json {
            json_to_xlsx(&state, &payload)
        } else {
            xlsx_to_json(&state, &payload, &file_name)
        };
    }

    Err(ConvertError::MissingUploadField(UPLOAD_FIELD.to_string()).into())
}

/// POST /json2xlsx - Convert a raw JSON body
pub async fn receive_json(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    let payload = read_body(request, &state).await?;
    json_to_xlsx(&state, &payload)
}

/// Turns middleware failures (timeouts) into the same 500 payload
pub async fn handle_service_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError(ConvertError::Timeout)
    } else {
        ApiError(ConvertError::Upload(err.to_string()))
    }
}

async fn read_body(request: Request, state: &Arc<AppState>) -> Result<Bytes, ConvertError> {
    Bytes::from_request(request, state)
        .await
        .map_err(|e| ConvertError::Upload(e.body_text()))
}

fn json_to_xlsx(state: &AppState, payload: &[u8]) -> Result<Response, ApiError> {
    let exported = state.exporter.export_json(payload)?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME_TYPE));
    headers.insert(CONTENT_DISPOSITION, content_disposition(&exported.file_name));
    Ok((headers, exported.content).into_response())
}

fn xlsx_to_json(state: &AppState, payload: &[u8], file_name: &str) -> Result<Response, ApiError> {
    let body = state.importer.import_json(payload, file_name)?;
    Ok(([(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME_TYPE))], body).into_response())
}

/// `attachment; filename=<name>`, with characters a header cannot carry
/// replaced by `_`
pub fn content_disposition(file_name: &str) -> HeaderValue {
    let safe: String = file_name
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '_' })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename={}", safe))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_json_mime)
}

/// Compares the media type only, ignoring parameters such as `charset`
pub fn is_json_mime(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(JSON_MIME_TYPE))
}
