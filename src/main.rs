//! # hw-stats 웹 서버 진입점
//!
//! 방문자 카운터와 서울시 대기질 API 중계를 제공하는 서버입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 방문자 카운터, 대기질 API 클라이언트 생성
//! 4. 라우터 + CORS + 요청 로깅 설정
//! 5. HTTP 서버 시작

mod config;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use std::{net::SocketAddr, path::Path, sync::Arc};

use anyhow::Result;
use chrono::Utc;
use config::Config;
use routes::AppState;
use services::{instance::generate_instance_id, visit_counter::VisitCounter};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hw_stats=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // `?`: 잘못된 VISIT_* 설정이면 여기서 프로세스가 종료됩니다.
    let config = Config::from_env()?;
    tracing::info!("Starting hw-stats server on {}:{}", config.host, config.port);
    tracing::info!(
        policy = ?config.counter.policy,
        cookie_format = ?config.counter.cookie_format,
        ip_cooldown_secs = config.counter.ip_cooldown.as_secs(),
        restore_floor = config.counter.restore_floor,
        "Visit counter configured"
    );
    if config.seoul_api_key.is_none() {
        tracing::warn!("SEOUL_OPENAPI_KEY not set, /api/air-quality will answer 503");
    }

    // 카운터는 프로세스 전체에서 하나만 만들고, 이후에는 Arc로 공유합니다.
    let instance_id = generate_instance_id();
    tracing::info!("Instance id: {}", instance_id);

    let air_quality = services::air_quality::AirQualityClient::new(
        reqwest::Client::new(),
        &config.seoul_api_base,
        config.seoul_api_key.clone(),
    )?;

    let state = AppState {
        counter: Arc::new(Mutex::new(VisitCounter::new(
            config.counter.clone(),
            Utc::now(),
        ))),
        instance_id: Arc::from(instance_id),
        cookie_same_site: config.cookie_same_site,
        air_quality,
    };

    let static_dir = config.static_dir.as_deref().map(Path::new);
    if let Some(dir) = static_dir.filter(|dir| !dir.is_dir()) {
        tracing::warn!("Static directory {} not found, redirecting / instead", dir.display());
    }

    let app = routes::app(state, static_dir)
        .layer(middleware::cors::cors_layer(
            config.allowed_origin_suffixes.clone(),
        ))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // ConnectInfo: X-Forwarded-For가 없을 때 소켓 상대 주소를 클라이언트 IP로 쓰기 위해 필요
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
