//! API integration tests, driving the router in-process

use std::io::{Cursor, Write};

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use pretty_assertions::assert_eq;
use tower::ServiceExt;
use xlsx2json::api::handlers::{JsonError, JSON_MIME_TYPE, XLSX_MIME_TYPE};
use xlsx2json::api::{build_router, ApiConfig};
use xlsx2json::excel::{ExcelExporter, ExcelImporter};
use xlsx2json::{Spreadsheet, Workbook};

const BOUNDARY: &str = "xlsx2json-test-boundary";

fn router() -> Router {
    build_router(&ApiConfig::default())
}

fn debug_router() -> Router {
    build_router(&ApiConfig {
        debug: true,
        ..ApiConfig::default()
    })
}

fn sample_workbook() -> Workbook {
    let mut workbook = Workbook::new("sample.xlsx");
    let mut sheet = Spreadsheet::new("Sheet 1")
        .with_columns(["Column0", "Column1", "Column2", "Column3", "Column4"]);
    sheet.add_row(["1", "2", "3", "4", "5"]);
    sheet.add_row(["a", "b", "c", "d", "e"]);
    workbook.add_sheet(sheet);
    workbook
}

fn multipart_request(field: &str, file_name: &str, content_type: &str, content: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, payload: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, JSON_MIME_TYPE)
        .body(Body::from(payload))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn json_error(response: Response) -> JsonError {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_MIME_TYPE);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// XLSX -> JSON
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_upload_xlsx_returns_json() {
    let xlsx = ExcelExporter::new().export(&sample_workbook()).unwrap();
    let response = router()
        .oneshot(multipart_request("file", "sample.xlsx", XLSX_MIME_TYPE, &xlsx))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_MIME_TYPE);
    let workbook = Workbook::from_json(&body_bytes(response).await).unwrap();
    assert_eq!(workbook, sample_workbook());
    let sheet = workbook.sheet("Sheet 1").unwrap();
    assert_eq!(sheet.rows()[1], vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_upload_plain_text_is_invalid_document() {
    let response = router()
        .oneshot(multipart_request("file", "wrong.csv", XLSX_MIME_TYPE, b""))
        .await
        .unwrap();
    let err = json_error(response).await;
    assert_eq!(
        err,
        JsonError {
            code: 500,
            http_error: "Internal Server Error".to_string(),
            message: "invalid spreadsheet stream".to_string(),
        }
    );
}

#[tokio::test]
async fn test_upload_fake_zip_is_invalid_document() {
    let response = router()
        .oneshot(multipart_request(
            "file",
            "wrong.xlsx",
            XLSX_MIME_TYPE,
            b"PK\x03\x04\x14\x00\x00\x00garbage",
        ))
        .await
        .unwrap();
    assert_eq!(json_error(response).await.message, "invalid spreadsheet stream");
}

#[tokio::test]
async fn test_upload_zip_without_workbook_is_invalid_document() {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("readme.txt", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(b"no workbook in here").unwrap();
    let archive = writer.finish().unwrap().into_inner();

    let response = router()
        .oneshot(multipart_request("file", "renamed.xlsx", XLSX_MIME_TYPE, &archive))
        .await
        .unwrap();
    assert_eq!(json_error(response).await.message, "invalid spreadsheet stream");
}

#[tokio::test]
async fn test_upload_wrong_field_name() {
    let xlsx = ExcelExporter::new().export(&sample_workbook()).unwrap();
    let response = router()
        .oneshot(multipart_request("upload", "sample.xlsx", XLSX_MIME_TYPE, &xlsx))
        .await
        .unwrap();
    assert_eq!(
        json_error(response).await.message,
        "parameter named 'file' not found in form"
    );
}

#[tokio::test]
async fn test_post_without_form_or_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let response = router().oneshot(request).await.unwrap();
    assert_eq!(
        json_error(response).await.message,
        "parameter named 'file' not found in form"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// JSON -> XLSX
// ═══════════════════════════════════════════════════════════════════════════

async fn assert_xlsx_response(response: Response) -> Workbook {
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_MIME_TYPE);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=sample.xlsx"
    );
    let bytes = body_bytes(response).await;
    ExcelImporter::new().import(&bytes, "sample.xlsx").unwrap()
}

#[tokio::test]
async fn test_post_json_body_returns_xlsx() {
    let payload = sample_workbook().to_json().unwrap();
    let response = router().oneshot(json_request("/", payload)).await.unwrap();
    assert_eq!(assert_xlsx_response(response).await, sample_workbook());
}

#[tokio::test]
async fn test_json2xlsx_alias() {
    let payload = sample_workbook().to_json().unwrap();
    let response = router()
        .oneshot(json_request("/json2xlsx", payload))
        .await
        .unwrap();
    assert_eq!(assert_xlsx_response(response).await, sample_workbook());
}

#[tokio::test]
async fn test_upload_json_file_returns_xlsx() {
    let payload = sample_workbook().to_json().unwrap();
    let response = router()
        .oneshot(multipart_request("file", "test.json", JSON_MIME_TYPE, &payload))
        .await
        .unwrap();
    assert_eq!(assert_xlsx_response(response).await, sample_workbook());
}

#[tokio::test]
async fn test_malformed_json_body() {
    let response = router()
        .oneshot(json_request("/json2xlsx", b"{\"name\":".to_vec()))
        .await
        .unwrap();
    let err = json_error(response).await;
    assert_eq!(err.code, 500);
    assert!(err.message.contains("EOF"), "unexpected message: {}", err.message);
}

// ═══════════════════════════════════════════════════════════════════════════
// UPLOAD FORM AND CORS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_welcome_only_in_debug() {
    let get = || Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = router().oneshot(get()).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = debug_router().oneshot(get()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<form action=\"/\" method=\"post\""));
}

#[tokio::test]
async fn test_cors_header_on_success_and_error() {
    let mut ok = json_request("/", sample_workbook().to_json().unwrap());
    ok.headers_mut()
        .insert(header::ORIGIN, "http://example.com".parse().unwrap());
    let response = router().oneshot(ok).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let mut bad = json_request("/", b"[]".to_vec());
    bad.headers_mut()
        .insert(header::ORIGIN, "http://example.com".parse().unwrap());
    let response = router().oneshot(bad).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_body_limit_answers_json_error_on_both_routes() {
    let config = ApiConfig {
        max_body_bytes: 16,
        ..ApiConfig::default()
    };
    for uri in ["/", "/json2xlsx"] {
        let response = build_router(&config)
            .oneshot(json_request(uri, sample_workbook().to_json().unwrap()))
            .await
            .unwrap();
        let err = json_error(response).await;
        assert_eq!(err.code, 500);
        assert_eq!(err.http_error, "Internal Server Error");
        assert!(
            err.message.contains("length limit exceeded"),
            "unexpected message for {}: {}",
            uri,
            err.message
        );
    }
}
