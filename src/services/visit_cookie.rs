//! # 방문 쿠키(`hw_visit`) 읽기/쓰기
//!
//! 쿠키 값의 "의미"(오늘 이미 카운트되었는지)는 `visit_counter`가 판단하고,
//! 이 모듈은 HTTP 헤더 문자열을 다루는 일만 합니다.
//! - `Cookie` 요청 헤더에서 `hw_visit` 값을 꺼내기
//! - `Set-Cookie` 응답 헤더 문자열 만들기

use std::str::FromStr;

use crate::config::ConfigError;

/// 방문 쿠키 이름
pub const COOKIE_NAME: &str = "hw_visit";

/// 쿠키 유효 기간: 2일 (초 단위)
pub const COOKIE_MAX_AGE_SECS: u32 = 86_400 * 2;

/// 쿠키의 `SameSite` 정책
///
/// 토스 미니앱처럼 다른 도메인의 iframe/웹뷰에서 API를 부를 때는
/// `None` + `Secure` 조합이어야 브라우저가 쿠키를 보냅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// `SameSite=Lax`
    Lax,
    /// `SameSite=None; Secure`
    None,
}

impl FromStr for SameSite {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(ConfigError::invalid("VISIT_COOKIE_SAME_SITE", other)),
        }
    }
}

/// `Cookie` 헤더 값에서 이름이 `name`인 쿠키 값을 찾습니다.
///
/// 헤더 형식: `a=1; hw_visit=1760000000000; b=2`
/// 값 앞뒤 공백은 제거하며, 같은 이름이 여러 번 나오면 첫 번째 값을 사용합니다.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// 방문 쿠키를 설정하는 `Set-Cookie` 헤더 값을 만듭니다.
pub fn set_cookie_header(value: &str, same_site: SameSite) -> String {
    let same_site = match same_site {
        SameSite::Lax => "SameSite=Lax",
        SameSite::None => "SameSite=None; Secure",
    };
    format!("{COOKIE_NAME}={value}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; {same_site}")
}
