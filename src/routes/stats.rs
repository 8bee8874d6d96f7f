//! # 방문 통계 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/stats/total`  → 방문 기록 + `{ instanceId, today, allTime, date, timezone }`
//! - `GET /api/stats/hourly` → `{ date, timezone, hourly: [{ hour, count }, ...24개] }`
//! - `GET /api/visit`        → 방문 기록만 하고 204 No Content
//!
//! 카운터는 `Mutex` 안에 있고, 락은 카운터 메서드 호출 동안만 잡습니다.
//! (await 지점을 사이에 두고 락을 들고 있지 않음)

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    middleware::visitor::Visitor,
    models::{HourlyStatsResponse, TotalStatsResponse},
    services::{
        air_quality::AirQualityClient,
        visit_cookie::{set_cookie_header, SameSite},
        visit_counter::VisitCounter,
    },
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// clone해도 카운터는 Arc로 공유되므로 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    /// 프로세스 전체에서 하나뿐인 방문자 카운터
    pub counter: Arc<Mutex<VisitCounter>>,
    /// 이 프로세스의 인스턴스 ID
    pub instance_id: Arc<str>,
    /// 방문 쿠키의 SameSite 정책
    pub cookie_same_site: SameSite,
    /// 서울시 대기질 API 클라이언트
    pub air_quality: AirQualityClient,
}

/// `GET /api/stats/total` — 방문을 기록하고 오늘/누적 방문자 수를 반환합니다.
///
/// 새 방문자로 카운트되면 `Set-Cookie`로 `hw_visit` 쿠키를 내려줍니다.
pub async fn stats_total(State(state): State<AppState>, visitor: Visitor) -> Response {
    let now = Utc::now();
    let (outcome, totals) = {
        let mut counter = state.counter.lock().await;
        let outcome = counter.record_visit(visitor.cookie.as_deref(), &visitor.ip, now);
        (outcome, counter.totals(now))
    };

    let body = TotalStatsResponse::new(&state.instance_id, totals);
    with_visit_cookie(
        Json(body).into_response(),
        outcome.cookie.as_deref(),
        state.cookie_same_site,
    )
}

/// `GET /api/stats/hourly` — 오늘의 시간대별 방문자 수를 반환합니다.
///
/// 조회만 하며 방문으로 기록하지 않습니다.
pub async fn stats_hourly(State(state): State<AppState>) -> Json<HourlyStatsResponse> {
    let snapshot = state.counter.lock().await.hourly(Utc::now());
    Json(snapshot.into())
}

/// `GET /api/visit` — 방문만 기록합니다. 응답 본문 없음.
pub async fn record_visit(State(state): State<AppState>, visitor: Visitor) -> Response {
    let outcome = state
        .counter
        .lock()
        .await
        .record_visit(visitor.cookie.as_deref(), &visitor.ip, Utc::now());

    with_visit_cookie(
        StatusCode::NO_CONTENT.into_response(),
        outcome.cookie.as_deref(),
        state.cookie_same_site,
    )
}

/// 새 쿠키 값이 있으면 응답에 `Set-Cookie` 헤더를 붙입니다.
fn with_visit_cookie(mut response: Response, cookie: Option<&str>, same_site: SameSite) -> Response {
    let Some(value) = cookie else {
        return response;
    };

    match HeaderValue::from_str(&set_cookie_header(value, same_site)) {
        Ok(header) => {
            response.headers_mut().insert(SET_COOKIE, header);
        }
        Err(e) => tracing::warn!("Could not build Set-Cookie header: {}", e),
    }
    response
}
