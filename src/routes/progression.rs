//! # 진척도 API 라우트 핸들러
//!
//! - `GET /api/v1/progression?exercise=...` → 다음 세션에서 넘어야 할 목표
//! - `GET /api/v1/progression/trend?exercise=...&limit=20` → 세션별 최고 세트 추이

use crate::{
    db,
    error::AppError,
    extract::AppQuery,
    middleware::auth::AuthUser,
    models::*,
    routes::{clamp_limit, AppState},
    services::progression,
};
use axum::{
    extract::State,
    Json,
};
use serde_json::{json, Value};

fn exercise_name(query: &ProgressionQuery) -> Result<String, AppError> {
    let name = query.exercise.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(AppError::BadRequest("exercise is required".to_string()));
    }
    Ok(name)
}

/// 최근 `history_window`개 세션에서 목표를 찾습니다.
///
/// 기록이 없으면 `target: null, first_session: true`로 200을 반환합니다.
pub async fn get_progression_target(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<ProgressionQuery>,
) -> Result<Json<ProgressionTarget>, AppError> {
    let exercise = exercise_name(&query)?;

    let history = db::list_workouts(&state.pool, &auth.user_id, state.history_window).await?;
    let target = progression::resolve_target(history.iter().map(|w| &w.data.0), &exercise);

    Ok(Json(ProgressionTarget {
        first_session: target.is_none(),
        exercise,
        target,
    }))
}

pub async fn get_progression_trend(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<ProgressionQuery>,
) -> Result<Json<Value>, AppError> {
    let exercise = exercise_name(&query)?;
    let limit = clamp_limit(query.limit, state.trend_limit);

    let history = db::list_workouts(&state.pool, &auth.user_id, limit).await?;
    let points = progression::progression_trend(&history, &exercise);

    Ok(Json(json!({ "exercise": exercise, "points": points })))
}
