use std::{convert::Infallible, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header::COOKIE, request::Parts, HeaderMap},
};

use crate::services::visit_cookie::{find_cookie, COOKIE_NAME};

/// 방문 판단에 필요한 요청 정보
///
/// 쿠키나 IP가 없어도 거부하지 않고 None/빈 문자열로 정규화합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visitor {
    pub cookie: Option<String>,
    pub ip: String,
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Visitor {
            cookie: visit_cookie(&parts.headers),
            ip: client_ip(&parts.headers, peer),
        })
    }
}

pub fn visit_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| find_cookie(header, COOKIE_NAME))
        .map(str::to_string)
}

/// `X-Forwarded-For`의 첫 번째 항목, 없으면 소켓 상대 주소
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"));
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();

        assert_eq!(client_ip(&headers, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        let peer: SocketAddr = "[::1]:5000".parse().unwrap();

        assert_eq!(client_ip(&headers, Some(peer)), "::1");
        assert_eq!(client_ip(&HeaderMap::new(), None), "");
    }

    #[test]
    fn reads_visit_cookie_from_any_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("hw_visit=1760000000000"));

        assert_eq!(visit_cookie(&headers).as_deref(), Some("1760000000000"));
        assert_eq!(visit_cookie(&HeaderMap::new()), None);
    }
}
