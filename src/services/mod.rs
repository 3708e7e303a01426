//! # 비즈니스 로직 모듈
//!
//! DB나 HTTP와 무관한 순수 로직을 모아둔 모듈입니다.
//! - `metrics`: 볼륨, 추정 1RM, PR 판정, 경과 시간 표시
//! - `progression`: 과거 이력에서 목표("이전 기록") 찾기
//! - `session`: 진행 중인 운동 세션의 상태 머신

pub mod metrics;
pub mod progression;
pub mod session;
