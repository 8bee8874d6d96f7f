//! # CORS 설정
//!
//! 쿠키를 주고받아야 하므로(`credentials: true`) 모든 Origin을 허용할 수 없습니다.
//! 허용 규칙:
//! - 로컬 개발: `http://localhost...`, `http://127.0.0.1...`
//! - 배포: `https://`로 시작하고 설정된 접미사(예: `.apps.tossmini.com`)로 끝나는 Origin

use axum::http::{request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Origin이 허용 목록에 해당하는지 확인합니다.
pub fn is_allowed_origin(origin: &str, suffixes: &[String]) -> bool {
    if origin.starts_with("http://localhost") || origin.starts_with("http://127.0.0.1") {
        return true;
    }
    origin.starts_with("https://") && suffixes.iter().any(|suffix| origin.ends_with(suffix.as_str()))
}

/// 허용 목록 기반 CORS 레이어를 만듭니다.
///
/// 허용된 Origin은 그대로 `Access-Control-Allow-Origin`에 반사되고,
/// 허용되지 않은 Origin에는 CORS 헤더를 붙이지 않습니다 (브라우저가 차단).
pub fn cors_layer(suffixes: Vec<String>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| is_allowed_origin(origin, &suffixes))
                    .unwrap_or(false)
            },
        ))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes() -> Vec<String> {
        vec![".private-apps.tossmini.com".to_string(), ".apps.tossmini.com".to_string()]
    }

    #[test]
    fn allows_local_development_origins() {
        assert!(is_allowed_origin("http://localhost:5173", &suffixes()));
        assert!(is_allowed_origin("http://127.0.0.1:3000", &suffixes()));
    }

    #[test]
    fn allows_https_origins_with_configured_suffix() {
        assert!(is_allowed_origin("https://hw.apps.tossmini.com", &suffixes()));
        assert!(is_allowed_origin("https://hw.private-apps.tossmini.com", &suffixes()));
    }

    #[test]
    fn rejects_other_origins() {
        assert!(!is_allowed_origin("http://hw.apps.tossmini.com", &suffixes()));
        assert!(!is_allowed_origin("https://evil.example.com", &suffixes()));
        assert!(!is_allowed_origin("https://apps.tossmini.com.evil.example", &suffixes()));
        assert!(!is_allowed_origin("", &suffixes()));
    }
}
