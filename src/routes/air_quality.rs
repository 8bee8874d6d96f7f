//! # 대기질 중계 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/air-quality`                  → 앞쪽 5개 측정소
//! - `GET /api/air-quality?districtCode=...` → 해당 자치구 1건
//!
//! 성공 응답 형태:
//! ```json
//! { "response": { "header": { "resultCode": "00" },
//!                 "body": { "totalCount": 1, "items": { "item": [ { "PM": "35", "FPM": "12", "MSRSTN_NM": "중구" } ] } } } }
//! ```
//! 실패 시 응답은 `AppError`가 같은 봉투 형태로 만듭니다 (503 / 502).

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{error::AppError, models::AirQualityQuery, routes::stats::AppState};

pub async fn air_quality(
    State(state): State<AppState>,
    Query(query): Query<AirQualityQuery>,
) -> Result<Json<Value>, AppError> {
    // 빈 문자열 districtCode는 지정하지 않은 것으로 봅니다.
    let district_code = query.district_code.as_deref().filter(|code| !code.is_empty());
    let items = state.air_quality.fetch(district_code).await?;
    let total_count = items.len();

    Ok(Json(json!({
        "response": {
            "header": { "resultCode": "00" },
            "body": {
                "totalCount": total_count,
                "items": { "item": items }
            }
        }
    })))
}
