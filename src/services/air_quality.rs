//! # 서울시 대기질 OpenAPI 중계 서비스
//!
//! `ListAirQualityByDistrictService`를 호출하고, 응답 행을 `AirQualityItem`으로 바꿉니다.
//!
//! ## 상위 API 주소 형식
//! ```text
//! {base}/{KEY}/json/ListAirQualityByDistrictService/{start}/{end}[/{districtCode}]
//! ```
//! 인증키가 URL 경로에 들어가므로 요청 URL은 로그에 남기지 않습니다.

use reqwest::{Client, Url};
use serde_json::Value;

use crate::{config::ConfigError, error::AppError, models::AirQualityItem};

const SERVICE_NAME: &str = "ListAirQualityByDistrictService";

/// 서비스 이름의 대소문자가 응답마다 다를 수 있어 두 가지를 모두 찾습니다.
const SERVICE_KEYS: [&str; 2] = [SERVICE_NAME, "listAirQualityByDistrictService"];

const PM_KEYS: [&str; 4] = ["PM10", "PM", "pm10", "pm"];
const FPM_KEYS: [&str; 5] = ["PM25", "PM2_5", "FPM", "pm25", "fpm"];
const STATION_KEYS: [&str; 4] = ["MSRSTN_NM", "MSRSTEN_NM", "msrstn_nm", "msrsten_nm"];

/// 대기질 API 클라이언트
///
/// `reqwest::Client`는 내부적으로 연결 풀을 Arc로 공유하므로 clone 비용이 작습니다.
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    client: Client,
    base: Url,
    api_key: Option<String>,
}

impl AirQualityClient {
    /// # 에러
    /// `base`가 경로를 붙일 수 있는 http(s) URL이 아니면 `ConfigError`를 반환합니다.
    pub fn new(client: Client, base: &str, api_key: Option<String>) -> Result<Self, ConfigError> {
        let base = Url::parse(base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::invalid("SEOUL_API_BASE", base))?;

        Ok(Self {
            client,
            base,
            api_key,
        })
    }

    /// 대기질 정보를 조회합니다.
    ///
    /// - 인증키가 없으면 `AppError::NotConfigured` (503)
    /// - 네트워크 오류나 JSON이 아닌 응답이면 `AppError::Upstream` (502)
    pub async fn fetch(&self, district_code: Option<&str>) -> Result<Vec<AirQualityItem>, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::NotConfigured("SEOUL_OPENAPI_KEY".to_string()))?;

        let url = self.request_url(api_key, district_code);
        tracing::debug!(?district_code, "Fetching air quality from Seoul OpenAPI");

        let data: Value = self.client.get(url).send().await?.json().await?;
        let items = extract_items(&data);
        tracing::debug!(count = items.len(), "Air quality rows received");

        Ok(items)
    }

    fn request_url(&self, api_key: &str, district_code: Option<&str>) -> Url {
        // 자치구를 지정하면 1건, 아니면 앞쪽 5건
        let end = if district_code.is_some() { "1" } else { "5" };

        let mut url = self.base.clone();
        // new()에서 cannot_be_a_base가 아님을 확인했으므로 항상 Ok
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([api_key, "json", SERVICE_NAME, "1", end]);
            if let Some(code) = district_code {
                segments.push(code);
            }
        }
        url
    }
}

/// 상위 API 응답 JSON에서 행 목록을 꺼내 `AirQualityItem`으로 변환합니다.
///
/// `row`는 배열일 수도, 객체 하나일 수도, 아예 없을 수도 있습니다.
pub fn extract_items(data: &Value) -> Vec<AirQualityItem> {
    let row = SERVICE_KEYS
        .iter()
        .find_map(|key| data.get(*key).filter(|v| !v.is_null()))
        .and_then(|service| service.get("row"));

    match row {
        Some(Value::Array(rows)) => rows.iter().map(map_row).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![map_row(single)],
    }
}

/// 행 하나를 프론트엔드 형태로 바꿉니다 (PM10 → PM, PM25 → FPM 등).
fn map_row(row: &Value) -> AirQualityItem {
    AirQualityItem {
        pm: first_field(row, &PM_KEYS),
        fpm: first_field(row, &FPM_KEYS),
        station_name: first_field(row, &STATION_KEYS),
    }
}

/// 후보 키 중 null이 아닌 첫 값을 문자열로 반환합니다. 없으면 빈 문자열.
fn first_field(row: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| row.get(*key).filter(|v| !v.is_null()))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}
