//! # 대기질 모델 정의
//!
//! 서울시 OpenAPI 응답 행(row)을 프론트엔드가 기대하는 형태로 바꾼 결과와,
//! `GET /api/air-quality`의 쿼리 파라미터를 정의합니다.

use serde::{Deserialize, Serialize};

/// 측정소 한 곳의 대기질 정보
///
/// 필드 이름은 프론트엔드 계약에 맞춰 대문자로 직렬화됩니다.
/// 상위 API가 숫자를 주더라도 모두 문자열로 변환해서 내보냅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirQualityItem {
    /// 미세먼지(PM10) 농도
    #[serde(rename = "PM")]
    pub pm: String,
    /// 초미세먼지(PM2.5) 농도
    #[serde(rename = "FPM")]
    pub fpm: String,
    /// 측정소 이름 (예: "중구")
    #[serde(rename = "MSRSTN_NM")]
    pub station_name: String,
}

/// `GET /api/air-quality?districtCode=...` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct AirQualityQuery {
    /// 자치구 코드. 없으면 앞쪽 5개 측정소를 조회합니다.
    #[serde(rename = "districtCode")]
    pub district_code: Option<String>,
}
