//! # KST(한국 표준시) 시간 계산 유틸리티
//!
//! 방문자 카운터는 "오늘"을 한국 시간(UTC+9, 서머타임 없음) 기준 달력 날짜로 정의합니다.
//! 서버가 어느 시간대에서 실행되든 결과가 같도록, 모든 계산은 UTC 시각을
//! 9시간 이동시킨 "가상의 KST 시각"에서 날짜를 잘라낸 뒤 다시 UTC로 되돌리는 방식입니다.
//!
//! ```text
//! UTC 2026-10-14 15:30 ──(+9h)──▶ 2026-10-15 00:30 ──(자정으로 절삭)──▶ 2026-10-15 00:00
//!                                                 ──(-9h)──▶ UTC 2026-10-14 15:00 = 하루 경계
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

/// 응답 JSON에 표기하는 시간대 이름
pub const TIMEZONE: &str = "Asia/Seoul";

/// KST와 UTC의 차이 (시간 단위)
const KST_OFFSET_HOURS: i64 = 9;

/// UTC 시각을 KST 벽시계 시각(naive)으로 이동시킵니다.
fn to_kst_wall_clock(now: DateTime<Utc>) -> NaiveDateTime {
    now.naive_utc() + Duration::hours(KST_OFFSET_HOURS)
}

/// `now`가 속한 KST 하루의 시작 시각(자정)을 UTC 시각으로 반환합니다.
pub fn day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = to_kst_wall_clock(now).date().and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(midnight - Duration::hours(KST_OFFSET_HOURS)))
}

/// `now`의 KST 달력 날짜
pub fn date(now: DateTime<Utc>) -> NaiveDate {
    to_kst_wall_clock(now).date()
}

/// `now`의 KST 날짜를 `YYYY-MM-DD` 문자열로 반환합니다.
pub fn date_string(now: DateTime<Utc>) -> String {
    date(now).format("%Y-%m-%d").to_string()
}

/// `now`의 KST 시(0~23)
pub fn hour(now: DateTime<Utc>) -> usize {
    to_kst_wall_clock(now).hour() as usize
}

/// 밀리초 타임스탬프가 `now`와 같은 KST 하루 구간 `[자정, 다음 자정)` 안에 있는지 확인합니다.
pub fn is_same_day_millis(timestamp_ms: i64, now: DateTime<Utc>) -> bool {
    let start = day_start(now).timestamp_millis();
    let end = start + Duration::days(1).num_milliseconds();
    (start..end).contains(&timestamp_ms)
}
