//! # 서비스(비즈니스 로직) 모듈
//!
//! HTTP와 무관한 핵심 로직을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)는 요청에서 값을 꺼내 이 모듈의 함수를 호출합니다.
//!
//! - `air_quality`: 서울시 대기질 OpenAPI 호출과 응답 변환
//! - `instance`: 인스턴스 식별자 생성
//! - `kst`: 한국 표준시 하루 경계/날짜 계산
//! - `visit_cookie`: `hw_visit` 쿠키 헤더 읽기/쓰기
//! - `visit_counter`: 방문자 중복 판단과 카운터

pub mod air_quality;
pub mod instance;
pub mod kst;
pub mod visit_cookie;
pub mod visit_counter;
