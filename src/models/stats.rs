//! # 방문 통계 응답 모델
//!
//! `GET /api/stats/total`, `GET /api/stats/hourly`의 JSON 응답 형태입니다.
//! 프론트엔드가 camelCase 필드를 기대하므로 `rename_all`로 맞춥니다.

use serde::Serialize;

use crate::services::{
    kst,
    visit_counter::{HourlySnapshot, TotalSnapshot},
};

/// `GET /api/stats/total` 응답
///
/// `instance_id`는 서버 인스턴스마다 카운트가 따로 관리된다는 사실을
/// 클라이언트가 알 수 있도록 함께 내보냅니다.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStatsResponse {
    pub instance_id: String,
    pub today: u64,
    pub all_time: u64,
    /// KST 날짜 (`YYYY-MM-DD`)
    pub date: String,
    pub timezone: &'static str,
}

impl TotalStatsResponse {
    pub fn new(instance_id: &str, snapshot: TotalSnapshot) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            today: snapshot.today,
            all_time: snapshot.all_time,
            date: snapshot.date.format("%Y-%m-%d").to_string(),
            timezone: kst::TIMEZONE,
        }
    }
}

/// 시간대 하나의 방문자 수
#[derive(Debug, Serialize)]
pub struct HourlyBucket {
    pub hour: usize,
    pub count: u64,
}

/// `GET /api/stats/hourly` 응답 (항상 24개 버킷)
#[derive(Debug, Serialize)]
pub struct HourlyStatsResponse {
    pub date: String,
    pub timezone: &'static str,
    pub hourly: Vec<HourlyBucket>,
}

impl From<HourlySnapshot> for HourlyStatsResponse {
    fn from(snapshot: HourlySnapshot) -> Self {
        Self {
            date: snapshot.date.format("%Y-%m-%d").to_string(),
            timezone: kst::TIMEZONE,
            hourly: snapshot
                .counts
                .iter()
                .enumerate()
                .map(|(hour, &count)| HourlyBucket { hour, count })
                .collect(),
        }
    }
}
