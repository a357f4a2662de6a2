use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Success body: `{"status": "success", ...data}`.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            status: "success",
            data,
        }),
    )
}

pub fn error(status: StatusCode, message: String) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            status: "error",
            message,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ScrapeResponse;

    #[test]
    fn success_flattens_payload() {
        let (status, Json(body)) = success(ScrapeResponse::Extracted {
            url: "https://example.test".to_string(),
            extracted_text: "Hello".to_string(),
        });

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "status": "success",
                "url": "https://example.test",
                "extracted_text": "Hello"
            })
        );
    }

    #[test]
    fn error_body_shape() {
        let (status, Json(body)) = error(StatusCode::NOT_FOUND, "Failed to fetch page: 404".into());

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "status": "error", "message": "Failed to fetch page: 404" })
        );
    }
}
