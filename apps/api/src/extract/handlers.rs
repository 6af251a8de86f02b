use axum::{extract::Multipart, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::extract::upload::read_upload;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// POST /api/v1/extract
///
/// Multipart upload (field `file`) → plain text of the file.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    let text = extract_text(upload).await?;
    Ok(Json(ExtractResponse { text }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::extract::upload::tests::multipart_request;
    use crate::llm_client::fake::FakeCompletion;
    use crate::routes::build_router;
    use crate::state::AppState;

    async fn extract(file: (&str, &str, &[u8])) -> (StatusCode, serde_json::Value) {
        let config = Config::from_lookup(|_| None).unwrap();
        let app = build_router(AppState::new(Arc::new(FakeCompletion::default()), config));

        let response = app
            .oneshot(multipart_request("/api/v1/extract", &[], Some(file)))
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_markdown_upload_returns_its_text() {
        let (status, body) = extract(("cv.md", "text/markdown", b"# Jane Doe\n- Rust")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "text": "# Jane Doe\n- Rust" }));
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_unprocessable() {
        let (status, body) = extract(("cv.docx", "application/octet-stream", b"PK")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Unsupported file type. Please upload PDF, TXT, or MD."
        );
    }
}
