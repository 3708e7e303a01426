//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `workouts`: 완료된 세션 기록 저장/조회/삭제
//! - `routines`: 루틴 템플릿 CRUD
//! - `exercises`: 공유 운동 카탈로그 검색/추가
//! - `profiles`: 프로필(종목, 단위계) 조회/저장
//! - `roster`: 코치-선수 연결

pub mod exercises;
pub mod profiles;
pub mod roster;
pub mod routines;
pub mod workouts;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::list_workouts`처럼 바로 접근할 수 있게 합니다.
pub use exercises::*;
pub use profiles::*;
pub use roster::*;
pub use routines::*;
pub use workouts::*;
