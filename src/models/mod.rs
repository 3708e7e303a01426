//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `workout`: 세트/운동 항목/세션 기록 (핵심 데이터 모델)
//! - `session`: 진행 중인 세션의 요청/응답 구조체
//! - `exercise`: 공유 운동 카탈로그
//! - `routine`: 루틴 템플릿
//! - `profile`: 프로필(종목, 단위계)과 코치-선수 연결
//!
//! `pub use X::*;`는 하위 모듈의 모든 공개 항목을
//! 이 모듈에서 바로 접근할 수 있게 재공개(re-export)합니다.
//! 예: `crate::models::workout::SetRecord` 대신 `crate::models::SetRecord`로 접근 가능

pub mod exercise;
pub mod profile;
pub mod routine;
pub mod session;
pub mod workout;

pub use exercise::*;
pub use profile::*;
pub use routine::*;
pub use session::*;
pub use workout::*;
