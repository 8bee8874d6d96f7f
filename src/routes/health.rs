//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /health` → `{ "status": "ok", "instanceId": "k3f9zq" }`
//!
//! 로드밸런서가 어느 인스턴스에 연결되었는지도 함께 확인할 수 있도록
//! 인스턴스 ID를 포함합니다.

use axum::{extract::State, response::Redirect, Json};
use serde_json::{json, Value};

use crate::routes::stats::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "instanceId": &*state.instance_id
    }))
}

/// `GET /` — 정적 페이지가 없을 때 통계 API로 보냅니다.
pub async fn root_redirect() -> Redirect {
    Redirect::temporary("/api/stats/total")
}
