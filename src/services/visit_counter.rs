//! # 방문자 카운터 서비스
//!
//! 요청마다 "오늘(KST) 처음 온 방문자인가?"를 판단하고 메모리 안의 카운터를 관리합니다.
//!
//! ## 카운터 종류
//! - `today`: 오늘 방문자 수 (KST 자정에 0으로 초기화)
//! - `all_time`: 프로세스가 살아있는 동안의 누적 방문자 수 (절대 감소하지 않음)
//! - `hourly`: 오늘의 시간대(0~23시)별 방문자 수 (KST 자정에 초기화)
//!
//! ## 중복 방지 방식 (`DedupPolicy`)
//! | 정책 | 쿠키 확인 | IP 쿨다운 |
//! |------|-----------|-----------|
//! | `Cookie` | O | X |
//! | `CookieAndIp` | O | O |
//! | `None` | X | X |
//!
//! 하루가 바뀌었는지는 별도 타이머 없이, 모든 메서드 호출 시작 시점에
//! 캐시된 하루 경계와 새로 계산한 하루 경계를 비교해서 감지합니다.
//!
//! 상태는 메모리에만 있으므로 재시작하면 사라집니다.
//! `restore_floor` 옵션은 이 손실을 "최소 1명" 표시로만 보정합니다 (정확한 수가 아님).

use std::{collections::HashMap, str::FromStr, time::Duration};

use chrono::{DateTime, NaiveDate, Utc};

use crate::{config::ConfigError, services::kst};

/// 방문 중복 판단 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// 쿠키만 확인
    Cookie,
    /// 쿠키 + 같은 IP의 쿨다운 시간 확인
    CookieAndIp,
    /// 중복 판단 없이 모든 요청을 카운트
    None,
}

impl FromStr for DedupPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cookie" => Ok(DedupPolicy::Cookie),
            "cookie_ip" => Ok(DedupPolicy::CookieAndIp),
            "none" => Ok(DedupPolicy::None),
            other => Err(ConfigError::invalid("VISIT_DEDUP", other)),
        }
    }
}

/// 새로 발급하는 쿠키 값의 형식
///
/// 읽을 때는 두 형식을 모두 받아들입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieFormat {
    /// 카운트된 시각의 밀리초 타임스탬프 (예: `1760454000000`)
    Timestamp,
    /// 카운트된 KST 날짜 (예: `2026-10-15`)
    Date,
}

impl FromStr for CookieFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(CookieFormat::Timestamp),
            "date" => Ok(CookieFormat::Date),
            other => Err(ConfigError::invalid("VISIT_COOKIE_FORMAT", other)),
        }
    }
}

/// 카운터 동작 옵션
#[derive(Debug, Clone)]
pub struct CounterOptions {
    pub policy: DedupPolicy,
    pub cookie_format: CookieFormat,
    /// 같은 IP를 다시 세지 않는 시간 (기본 10분)
    pub ip_cooldown: Duration,
    /// 재시작으로 `today`가 0인데 "오늘 카운트됨" 쿠키가 오면 최소 1로 보정할지 여부
    pub restore_floor: bool,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            policy: DedupPolicy::CookieAndIp,
            cookie_format: CookieFormat::Timestamp,
            ip_cooldown: Duration::from_secs(10 * 60),
            restore_floor: true,
        }
    }
}

/// `record_visit`의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitOutcome {
    /// 이번 요청이 새 방문자로 카운트되었는지
    pub counted: bool,
    /// 응답에 설정할 새 쿠키 값 (카운트된 경우에만 Some)
    pub cookie: Option<String>,
}

/// 오늘/누적 방문자 수 스냅샷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalSnapshot {
    pub today: u64,
    pub all_time: u64,
    pub date: NaiveDate,
}

/// 시간대별 방문자 수 스냅샷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlySnapshot {
    pub date: NaiveDate,
    pub counts: [u64; 24],
}

/// 프로세스 안에서 방문자 수를 세는 서비스 객체
///
/// 서버 시작 시 한 번 생성되어 `AppState` 안의 Mutex로 공유됩니다.
#[derive(Debug)]
pub struct VisitCounter {
    options: CounterOptions,
    day_start: DateTime<Utc>,
    today: u64,
    all_time: u64,
    hourly: [u64; 24],
    last_count_by_ip: HashMap<String, DateTime<Utc>>,
}

impl VisitCounter {
    pub fn new(options: CounterOptions, now: DateTime<Utc>) -> Self {
        Self {
            options,
            day_start: kst::day_start(now),
            today: 0,
            all_time: 0,
            hourly: [0; 24],
            last_count_by_ip: HashMap::new(),
        }
    }

    /// 요청 하나를 방문으로 기록할지 판단하고, 필요하면 카운터를 올립니다.
    ///
    /// # 매개변수
    /// - `cookie`: 요청의 `hw_visit` 쿠키 값 (없으면 None)
    /// - `client_ip`: 클라이언트 IP (알 수 없으면 빈 문자열)
    /// - `now`: 현재 시각 (테스트에서 시간을 고정할 수 있도록 주입)
    pub fn record_visit(
        &mut self,
        cookie: Option<&str>,
        client_ip: &str,
        now: DateTime<Utc>,
    ) -> VisitOutcome {
        self.roll_over(now);
        self.evict_expired(now);

        let cookie_counted = cookie.is_some_and(|value| counted_today(value, now));
        let already_counted = match self.options.policy {
            DedupPolicy::Cookie | DedupPolicy::CookieAndIp => cookie_counted,
            DedupPolicy::None => false,
        };
        let within_cooldown = self.options.policy == DedupPolicy::CookieAndIp
            && self.within_ip_cooldown(client_ip, now);

        if !already_counted && !within_cooldown {
            self.today += 1;
            self.all_time += 1;
            self.hourly[kst::hour(now)] += 1;
            if !client_ip.is_empty() {
                self.last_count_by_ip.insert(client_ip.to_string(), now);
            }
            tracing::debug!(
                client_ip,
                today = self.today,
                all_time = self.all_time,
                "counted new visit"
            );

            return VisitOutcome {
                counted: true,
                cookie: Some(self.cookie_value(now)),
            };
        }

        if self.options.restore_floor && self.today == 0 && already_counted {
            // 쿠키로는 오늘 방문이 확인되는데 메모리는 0 → 재시작 등으로 잃어버린 카운트
            tracing::info!("visit cookie outlived in-memory count, showing at least one visitor");
            self.today = 1;
            self.all_time = self.all_time.max(1);
        }

        VisitOutcome {
            counted: false,
            cookie: None,
        }
    }

    pub fn totals(&mut self, now: DateTime<Utc>) -> TotalSnapshot {
        self.roll_over(now);
        TotalSnapshot {
            today: self.today,
            all_time: self.all_time,
            date: kst::date(now),
        }
    }

    pub fn hourly(&mut self, now: DateTime<Utc>) -> HourlySnapshot {
        self.roll_over(now);
        HourlySnapshot {
            date: kst::date(now),
            counts: self.hourly,
        }
    }

    /// KST 하루 경계가 넘어갔으면 하루 단위 상태를 초기화합니다.
    fn roll_over(&mut self, now: DateTime<Utc>) {
        let start = kst::day_start(now);
        if start > self.day_start {
            tracing::info!(
                previous_today = self.today,
                date = %kst::date_string(now),
                "KST day boundary passed, resetting daily counters"
            );
            self.day_start = start;
            self.today = 0;
            self.hourly = [0; 24];
            self.last_count_by_ip.clear();
        }
    }

    fn evict_expired(&mut self, now: DateTime<Utc>) {
        let cooldown = self.cooldown();
        self.last_count_by_ip
            .retain(|_, counted_at| now - *counted_at < cooldown);
    }

    fn within_ip_cooldown(&self, client_ip: &str, now: DateTime<Utc>) -> bool {
        if client_ip.is_empty() {
            return false;
        }
        self.last_count_by_ip
            .get(client_ip)
            .is_some_and(|counted_at| now - *counted_at < self.cooldown())
    }

    fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.options.ip_cooldown).unwrap_or(chrono::Duration::MAX)
    }

    fn cookie_value(&self, now: DateTime<Utc>) -> String {
        match self.options.cookie_format {
            CookieFormat::Timestamp => now.timestamp_millis().to_string(),
            CookieFormat::Date => kst::date_string(now),
        }
    }
}

/// 쿠키 값이 "오늘(KST) 이미 카운트됨"을 뜻하는지 확인합니다.
///
/// 숫자면 밀리초 타임스탬프로, 아니면 `YYYY-MM-DD` 날짜로 해석합니다.
/// 해석할 수 없는 값은 "아직 카운트 안 됨"으로 취급합니다.
fn counted_today(value: &str, now: DateTime<Utc>) -> bool {
    let value = value.trim();
    if let Ok(timestamp_ms) = value.parse::<i64>() {
        return kst::is_same_day_millis(timestamp_ms, now);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok_and(|date| date == kst::date(now))
}
