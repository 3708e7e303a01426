//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "database": "ok", "live_sessions": 3 }`
//!
//! 인증 없이 호출할 수 있습니다. 로드밸런서와 컨테이너 헬스체크용입니다.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::routes::AppState;

/// `GET /health`: DB 연결과 진행 중인 세션 수를 보고합니다.
///
/// DB에 닿지 않으면 503을 반환하고, 에러 내용은 로그에만 남깁니다.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let live_sessions = state.live.read().await.len();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "live_sessions": live_sessions
            })),
        ),
        Err(err) => {
            tracing::error!("Health check database error: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "unreachable",
                    "live_sessions": live_sessions
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn health_needs_no_token() {
        let state = test_state().await;
        let (status, body) = send(&state, Method::GET, "/api/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["live_sessions"], 0);
    }
}
