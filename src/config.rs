//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `SEOUL_OPENAPI_KEY` (또는 `VITE_SEOUL_OPENAPI_KEY`): 서울시 OpenAPI 인증키
//! - `SEOUL_API_BASE`: 서울시 OpenAPI 주소
//! - `VISIT_DEDUP`: 방문 중복 판단 정책 (`cookie` | `cookie_ip` | `none`)
//! - `VISIT_COOKIE_FORMAT`: 쿠키 값 형식 (`timestamp` | `date`)
//! - `VISIT_COOKIE_SAME_SITE`: 쿠키 SameSite 정책 (`none` | `lax`)
//! - `VISIT_IP_COOLDOWN_SECS`: 같은 IP를 다시 세지 않는 시간 (초)
//! - `VISIT_RESTORE_FLOOR`: 재시작 후 "최소 1명" 보정 여부
//! - `ALLOWED_ORIGIN_SUFFIXES`: CORS 허용 도메인 접미사 (쉼표 구분)
//! - `STATIC_DIR`: `/`에서 서빙할 정적 HTML 디렉토리

use std::{env, time::Duration};

use thiserror::Error;

use crate::services::{
    visit_cookie::SameSite,
    visit_counter::{CookieFormat, CounterOptions, DedupPolicy},
};

/// 서울시 OpenAPI 기본 주소
pub const DEFAULT_SEOUL_API_BASE: &str = "http://openAPI.seoul.go.kr:8088";

/// CORS 기본 허용 도메인 접미사 (토스 미니앱)
pub const DEFAULT_ORIGIN_SUFFIXES: [&str; 2] = [".private-apps.tossmini.com", ".apps.tossmini.com"];

/// 설정값이 잘못되었을 때의 에러
///
/// 서버 시작 단계에서만 발생하며, `main`에서 anyhow로 전파되어 프로세스가 종료됩니다.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: &str) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
/// 애플리케이션 전체 설정을 담는 구조체
pub struct Config {
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 서울시 OpenAPI 인증키. 없으면 대기질 API는 503을 반환합니다.
    pub seoul_api_key: Option<String>,
    /// 서울시 OpenAPI 주소
    pub seoul_api_base: String,
    /// 방문자 카운터 옵션
    pub counter: CounterOptions,
    /// 방문 쿠키의 SameSite 정책
    pub cookie_same_site: SameSite,
    /// CORS 허용 도메인 접미사 목록
    pub allowed_origin_suffixes: Vec<String>,
    /// 정적 파일 디렉토리 (선택)
    pub static_dir: Option<String>,
}

impl Config {
    /// 프로세스 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로부터 설정을 만듭니다.
    ///
    /// 테스트에서 프로세스 환경변수를 건드리지 않고 설정을 주입할 수 있도록
    /// 조회 방식을 클로저로 받습니다.
    ///
    /// # 에러
    /// `VISIT_*` 항목의 값을 해석할 수 없으면 `ConfigError`를 반환합니다.
    /// `PORT`는 잘못된 값이면 에러 대신 기본값 3000을 사용합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 빈 문자열은 "설정 안 함"으로 취급합니다.
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut counter = CounterOptions::default();
        if let Some(value) = get("VISIT_DEDUP") {
            counter.policy = value.parse::<DedupPolicy>()?;
        }
        if let Some(value) = get("VISIT_COOKIE_FORMAT") {
            counter.cookie_format = value.parse::<CookieFormat>()?;
        }
        if let Some(value) = get("VISIT_IP_COOLDOWN_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid("VISIT_IP_COOLDOWN_SECS", &value))?;
            counter.ip_cooldown = Duration::from_secs(secs);
        }
        if let Some(value) = get("VISIT_RESTORE_FLOOR") {
            counter.restore_floor = parse_bool("VISIT_RESTORE_FLOOR", &value)?;
        }

        let cookie_same_site = match get("VISIT_COOKIE_SAME_SITE") {
            Some(value) => value.parse::<SameSite>()?,
            None => SameSite::None,
        };

        let allowed_origin_suffixes = match get("ALLOWED_ORIGIN_SUFFIXES") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|suffix| !suffix.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ORIGIN_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(3000),
            // 프론트엔드(Vite)와 같은 .env를 공유할 때를 위해 VITE_ 접두사도 받습니다.
            seoul_api_key: get("SEOUL_OPENAPI_KEY").or_else(|| get("VITE_SEOUL_OPENAPI_KEY")),
            seoul_api_base: get("SEOUL_API_BASE")
                .unwrap_or_else(|| DEFAULT_SEOUL_API_BASE.to_string()),
            counter,
            cookie_same_site,
            allowed_origin_suffixes,
            static_dir: get("STATIC_DIR"),
        })
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.seoul_api_key, None);
        assert_eq!(config.seoul_api_base, DEFAULT_SEOUL_API_BASE);
        assert_eq!(config.counter.policy, DedupPolicy::CookieAndIp);
        assert_eq!(config.counter.cookie_format, CookieFormat::Timestamp);
        assert_eq!(config.counter.ip_cooldown, Duration::from_secs(600));
        assert!(config.counter.restore_floor);
        assert_eq!(config.cookie_same_site, SameSite::None);
        assert_eq!(config.allowed_origin_suffixes.len(), 2);
        assert_eq!(config.static_dir, None);
    }

    #[test]
    fn reads_visit_settings() {
        let config = config_from(&[
            ("VISIT_DEDUP", "cookie"),
            ("VISIT_COOKIE_FORMAT", "date"),
            ("VISIT_COOKIE_SAME_SITE", "lax"),
            ("VISIT_IP_COOLDOWN_SECS", "30"),
            ("VISIT_RESTORE_FLOOR", "off"),
            ("ALLOWED_ORIGIN_SUFFIXES", ".example.com, ,.example.org"),
        ])
        .unwrap();

        assert_eq!(config.counter.policy, DedupPolicy::Cookie);
        assert_eq!(config.counter.cookie_format, CookieFormat::Date);
        assert_eq!(config.counter.ip_cooldown, Duration::from_secs(30));
        assert!(!config.counter.restore_floor);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
        assert_eq!(config.allowed_origin_suffixes, vec![".example.com", ".example.org"]);
    }

    #[test]
    fn falls_back_to_vite_key() {
        let config = config_from(&[("VITE_SEOUL_OPENAPI_KEY", "abc")]).unwrap();
        assert_eq!(config.seoul_api_key.as_deref(), Some("abc"));

        let config = config_from(&[
            ("SEOUL_OPENAPI_KEY", "primary"),
            ("VITE_SEOUL_OPENAPI_KEY", "abc"),
        ])
        .unwrap();
        assert_eq!(config.seoul_api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn invalid_port_uses_default() {
        let config = config_from(&[("PORT", "http")]).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn rejects_unknown_visit_values() {
        assert_eq!(
            config_from(&[("VISIT_DEDUP", "hourly")]).unwrap_err(),
            ConfigError::invalid("VISIT_DEDUP", "hourly")
        );
        assert!(config_from(&[("VISIT_IP_COOLDOWN_SECS", "-1")]).is_err());
        assert!(config_from(&[("VISIT_RESTORE_FLOOR", "maybe")]).is_err());
    }
}
