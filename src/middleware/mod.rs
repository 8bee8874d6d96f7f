//! # 미들웨어 / Extractor 모듈
//!
//! - `cors`: 허용 목록 기반 CORS 레이어
//! - `visitor`: 요청에서 방문 쿠키와 클라이언트 IP를 꺼내는 Extractor

pub mod cors;
pub mod visitor;
