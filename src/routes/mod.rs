//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `sessions`: 진행 중인 운동 세션 (상태 머신 조작)
//! - `workouts`: 완료된 운동 기록 조회/삭제, 코치의 선수 기록 조회
//! - `progression`: 목표("이전 기록")와 진척도 추이
//! - `exercises`: 공유 운동 카탈로그
//! - `routines`: 루틴 템플릿
//! - `profile`: 프로필(종목, 단위계)
//! - `roster`: 코치-선수 연결
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod exercises;
pub mod health;
pub mod profile;
pub mod progression;
pub mod roster;
pub mod routines;
pub mod sessions;
pub mod workouts;

// 각 모듈의 핸들러 함수들을 재공개하여
// `routes::list_workouts`처럼 바로 접근 가능하게 합니다.
pub use exercises::*;
pub use health::*;
pub use profile::*;
pub use progression::*;
pub use roster::*;
pub use routines::*;
pub use sessions::*;
pub use workouts::*;

use axum::{
    routing::{delete, get, post, put}, // HTTP 메서드별 라우팅 함수들
    Router,
};
use sqlx::SqlitePool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::services::session::WorkoutSession;

/// 진행 중인 세션 저장소: 세션 ID → 세션
///
/// 메모리에만 존재하므로 서버가 재시작되면 진행 중인 세션은 사라집니다.
/// - `Arc`: 여러 요청(스레드)이 같은 맵을 공유하기 위한 참조 카운트 포인터
/// - `tokio::sync::RwLock`: 읽기는 동시에, 쓰기는 하나씩만 허용하는 비동기 잠금
pub type LiveSessions = Arc<RwLock<HashMap<String, WorkoutSession>>>;

// #[derive(Clone)]: Axum의 State Extractor는 내부적으로 AppState를 clone하므로 필수입니다.
// SqlitePool과 Arc는 clone해도 실제 데이터가 복제되지 않고 같은 대상을 가리킵니다.

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// JWT 토큰 검증용 비밀키
    pub jwt_secret: String,
    /// 목표 계산 시 훑어볼 최근 세션 수
    pub history_window: i64,
    /// 진척도 추이 기본 세션 수
    pub trend_limit: i64,
    /// 진행 중인 세션들
    pub live: LiveSessions,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt_secret: String, history_window: i64, trend_limit: i64) -> Self {
        Self {
            pool,
            jwt_secret,
            history_window,
            trend_limit,
            live: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// 목록 조회의 `limit` 값을 1~200 범위로 맞춥니다.
pub(crate) fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, 200)
}

/// 전체 애플리케이션 라우터를 만듭니다.
///
/// 모든 API는 `/api/v1` 아래에 있습니다.
/// Axum 0.8부터 경로 파라미터는 `{id}` 형식으로 씁니다.
pub fn app(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/sessions", get(list_sessions).post(start_session))
        .route("/sessions/{id}", get(get_session).delete(cancel_session))
        .route("/sessions/{id}/exercises", post(add_exercise))
        .route("/sessions/{id}/exercises/{index}", delete(remove_exercise))
        .route("/sessions/{id}/exercises/{index}/move", post(move_exercise))
        .route("/sessions/{id}/exercises/{index}/superset", put(set_superset))
        .route("/sessions/{id}/exercises/{index}/sets", post(add_set))
        .route(
            "/sessions/{id}/exercises/{index}/sets/{set_index}",
            put(replace_set).delete(remove_set),
        )
        .route("/sessions/{id}/finish", post(finish_session))
        .route("/sessions/{id}/resume", post(resume_session))
        .route("/sessions/{id}/complete", post(complete_session));

    let api_routes = Router::new()
        .merge(session_routes)
        // 완료된 운동 기록
        .route("/workouts", get(list_workouts))
        .route("/workouts/{id}", get(get_workout).delete(delete_workout))
        .route("/athletes/{id}/workouts", get(list_athlete_workouts))
        // 진척도
        .route("/progression", get(get_progression_target))
        .route("/progression/trend", get(get_progression_trend))
        // 카탈로그 / 루틴 / 프로필 / 코치
        .route("/exercises", get(search_exercises).post(create_exercise))
        .route("/routines", get(list_routines).post(create_routine))
        .route("/routines/{id}", delete(delete_routine))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/roster", get(list_roster).post(add_to_roster))
        .route("/roster/{athlete_id}", delete(remove_from_roster))
        .route("/health", get(health_check))
        .with_state(state);

    // 개발 환경에서는 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http()) // HTTP 요청/응답 자동 로깅
}
