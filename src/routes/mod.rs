//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 조립 함수를 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `air_quality`: 서울시 대기질 API 중계
//! - `health`: 헬스체크, 루트 리다이렉트
//! - `stats`: 방문 기록과 통계 조회 (+ `AppState`)

pub mod air_quality;
pub mod health;
pub mod stats;

use std::path::Path;

use axum::{routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};

pub use air_quality::*;
pub use health::*;
pub use stats::*;

/// 전체 라우터를 조립합니다.
///
/// `static_dir`이 실제로 존재하면 `/`를 포함한 나머지 경로를 정적 파일로 서빙하고,
/// 없으면 `/`를 `/api/stats/total`로 리다이렉트합니다.
/// CORS와 요청 로깅 레이어는 `main`에서 씌웁니다.
pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route("/api/stats/total", get(stats_total))
        .route("/api/stats/hourly", get(stats_hourly))
        .route("/api/visit", get(record_visit))
        .route("/api/air-quality", get(air_quality))
        .route("/health", get(health_check));

    let router = match static_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => {
            tracing::info!("Serving static files from {}", dir.display());
            let serve_dir =
                ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html")));
            api_routes.fallback_service(serve_dir)
        }
        None => api_routes.route("/", get(root_redirect)),
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        air_quality::AirQualityClient,
        visit_cookie::SameSite,
        visit_counter::{CounterOptions, VisitCounter},
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    fn test_state(api_key: Option<&str>) -> AppState {
        AppState {
            counter: Arc::new(Mutex::new(VisitCounter::new(
                CounterOptions::default(),
                Utc::now(),
            ))),
            instance_id: Arc::from("test01"),
            cookie_same_site: SameSite::Lax,
            air_quality: AirQualityClient::new(
                reqwest::Client::new(),
                "http://127.0.0.1:9",
                api_key.map(str::to_string),
            )
            .unwrap(),
        }
    }

    fn get_request(uri: &str, ip: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri).header("x-forwarded-for", ip);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn first_visit_sets_cookie_and_replay_does_not_count() {
        let app = app(test_state(None), None);

        let first = app
            .clone()
            .oneshot(get_request("/api/stats/total", "203.0.113.1", None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let cookie = set_cookie(&first).expect("first visit sets a cookie");
        assert!(cookie.starts_with("hw_visit="));
        assert!(cookie.ends_with("; Path=/; Max-Age=172800; SameSite=Lax"));

        let body = json_body(first).await;
        assert_eq!(body["instanceId"], "test01");
        assert_eq!(body["today"], 1);
        assert_eq!(body["allTime"], 1);
        assert_eq!(body["timezone"], "Asia/Seoul");

        // Set-Cookie의 "이름=값" 부분만 다시 보냄. 다른 IP라 쿨다운과 무관.
        let pair = cookie.split(';').next().unwrap().to_string();
        let second = app
            .oneshot(get_request("/api/stats/total", "203.0.113.2", Some(&pair)))
            .await
            .unwrap();
        assert!(set_cookie(&second).is_none());

        let body = json_body(second).await;
        assert_eq!(body["today"], 1);
        assert_eq!(body["allTime"], 1);
    }

    #[tokio::test]
    async fn same_ip_without_cookie_counts_once() {
        let app = app(test_state(None), None);

        for _ in 0..2 {
            app.clone()
                .oneshot(get_request("/api/visit", "198.51.100.9", None))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(get_request("/api/stats/hourly", "198.51.100.9", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        let hourly = body["hourly"].as_array().unwrap();
        assert_eq!(hourly.len(), 24);
        let total: u64 = hourly.iter().map(|b| b["count"].as_u64().unwrap()).sum();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn visit_endpoint_returns_no_content_with_cookie() {
        let app = app(test_state(None), None);

        let response = app
            .oneshot(get_request("/api/visit", "192.0.2.5", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(set_cookie(&response).is_some());
    }

    #[tokio::test]
    async fn air_quality_without_key_is_service_unavailable() {
        let app = app(test_state(None), None);

        let response = app
            .oneshot(get_request("/api/air-quality?districtCode=111121", "192.0.2.5", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["response"]["header"]["resultCode"], "99");
        assert!(body["response"]["body"].is_null());
    }

    #[tokio::test]
    async fn air_quality_upstream_failure_is_bad_gateway() {
        // 포트 9(discard)에는 HTTP 서버가 없으므로 연결이 실패합니다.
        let app = app(test_state(Some("KEY")), None);

        let response = app
            .oneshot(get_request("/api/air-quality", "192.0.2.5", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["response"]["header"]["resultCode"], "98");
    }

    #[tokio::test]
    async fn root_redirects_to_total_without_static_dir() {
        let app = app(test_state(None), None);

        let response = app
            .oneshot(get_request("/", "192.0.2.5", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/stats/total"
        );
    }

    #[tokio::test]
    async fn health_reports_instance() {
        let app = app(test_state(None), None);

        let response = app
            .oneshot(get_request("/health", "192.0.2.5", None))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["instanceId"], "test01");
    }
}
