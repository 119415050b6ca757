use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Uniform success envelope. Error responses carry the same shape with
/// `data: null` and `success: false` (see `errors::AppError`).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            data,
            message: message.into(),
            success: true,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::CREATED.as_u16(),
            data,
            message: message.into(),
            success: true,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let envelope = ApiResponse::ok(serde_json::json!({"a": 1}), "fetched");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["data"]["a"], 1);
        assert_eq!(value["message"], "fetched");
        assert_eq!(value["success"], true);
    }

    #[test]
    fn test_created_status_code() {
        let envelope = ApiResponse::created((), "made");
        assert_eq!(envelope.status_code, 201);
        assert!(envelope.success);
    }

    #[test]
    fn test_null_payload_serializes_as_null() {
        let envelope: ApiResponse<Option<String>> = ApiResponse::ok(None, "empty slot");
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value["data"].is_null());
        assert_eq!(value["success"], true);
    }
}
