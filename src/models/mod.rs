//! # 데이터 모델 모듈
//!
//! HTTP 응답/요청에 쓰이는 구조체들을 정의합니다.
//! - `air_quality`: 대기질 중계 응답 항목과 쿼리 파라미터
//! - `stats`: 방문 통계 응답

pub mod air_quality;
pub mod stats;

pub use air_quality::*;
pub use stats::*;
