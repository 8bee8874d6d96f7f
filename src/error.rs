//! # 에러 처리 모듈
//!
//! HTTP 응답으로 나가는 에러 타입을 정의합니다.
//!
//! 방문자 카운터는 실패하지 않습니다 (잘못된 쿠키나 IP는 "카운트 안 됨"으로 정규화됨).
//! 실패할 수 있는 경로는 서울시 대기질 API 중계뿐이므로,
//! 에러 본문도 대기질 API 응답과 같은 봉투(envelope) 형태를 사용합니다:
//!
//! ```json
//! { "response": { "header": { "resultCode": "98", "resultMsg": "..." }, "body": null } }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 에러 종류
#[derive(Debug, Error)]
pub enum AppError {
    /// 필요한 설정(예: API 키)이 없음 (HTTP 503)
    #[error("{0} not configured")]
    NotConfigured(String),

    /// 상위(upstream) API 호출 또는 응답 해석 실패 (HTTP 502)
    /// #[from]: reqwest 함수에서 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl AppError {
    /// 대기질 API 규약의 결과 코드
    pub fn result_code(&self) -> &'static str {
        match self {
            AppError::NotConfigured(_) => "99",
            AppError::Upstream(_) => "98",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotConfigured(ref what) => {
                tracing::warn!("Request rejected, {} is not configured", what);
            }
            AppError::Upstream(ref e) => {
                tracing::error!("Upstream error: {}", e);
            }
        }

        let body = Json(json!({
            "response": {
                "header": {
                    "resultCode": self.result_code(),
                    "resultMsg": self.to_string(),
                },
                "body": null
            }
        }));

        (self.status(), body).into_response()
    }
}
