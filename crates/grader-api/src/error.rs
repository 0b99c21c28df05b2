//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트가 같은 JSON 형식으로 실패를 알립니다.
//!
//! ```json
//! {
//!   "code": "RATE_LIMITED",
//!   "message": "Rate limit 초과",
//!   "timestamp": 1738300800
//! }
//! ```

use axum::{http::StatusCode, Json};
use grader_data::{DataError, NarrativeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 통합 API 에러 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "MISSING_API_KEY", "UPSTREAM_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    pub timestamp: i64,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(code: impl Into<String>, message: impl Into<String>, details: Value) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 상태 코드와 에러 본문.
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// 잘못된 요청 (400).
pub fn bad_request(code: &str, message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiErrorResponse::new(code, message)))
}

/// 외부 데이터 소스 실패. 요청 제한은 429, 나머지는 502.
pub fn data_error(err: DataError) -> ApiError {
    let (status, code) = match &err {
        DataError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        DataError::NoData { .. } => (StatusCode::NOT_FOUND, "NO_DATA"),
        DataError::Status { status, .. } => {
            return (
                StatusCode::BAD_GATEWAY,
                Json(ApiErrorResponse::with_details(
                    "UPSTREAM_ERROR",
                    err.to_string(),
                    serde_json::json!({ "upstream_status": status }),
                )),
            );
        }
        DataError::Http(_) | DataError::Decode(_) | DataError::Parse(_) => {
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
        }
    };
    (status, Json(ApiErrorResponse::new(code, err.to_string())))
}

/// 서술형 분석 실패. 키 누락은 400, 요청 제한은 429, 나머지는 502.
pub fn narrative_error(err: NarrativeError) -> ApiError {
    let (status, code) = match &err {
        NarrativeError::MissingCredential => (StatusCode::BAD_REQUEST, "MISSING_API_KEY"),
        NarrativeError::Api { status: 429, .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        NarrativeError::Api { .. } | NarrativeError::Http(_) => {
            (StatusCode::BAD_GATEWAY, "NARRATIVE_UPSTREAM_ERROR")
        }
        NarrativeError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE"),
    };
    (status, Json(ApiErrorResponse::new(code, err.to_string())))
}
