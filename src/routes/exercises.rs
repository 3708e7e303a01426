//! # 운동 카탈로그 API 라우트 핸들러
//!
//! 모든 사용자가 공유하는 운동 이름 목록입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/exercises | `search_exercises` | 자동완성 검색 |
//! | POST | /api/v1/exercises | `create_exercise` | 카탈로그에 추가 |
//!
//! 같은 이름(대소문자, 공백, 구두점 무시)이 이미 있으면 새로 만들지 않고 기존 항목을 200으로 돌려줍니다.

use crate::{
    db,
    error::AppError,
    extract::{AppJson, AppQuery},
    middleware::auth::AuthUser,
    models::*,
    routes::{clamp_limit, AppState},
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /exercises?q=bench&muscle_group=chest&limit=20`
pub async fn search_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppQuery(query): AppQuery<CatalogQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = clamp_limit(query.limit, 50);
    let muscle_group = query
        .muscle_group
        .as_deref()
        .map(str::trim)
        .filter(|group| !group.is_empty());

    let exercises =
        db::search_catalog(&state.pool, query.q.as_deref(), muscle_group, limit).await?;

    Ok(Json(json!({ "exercises": exercises })))
}

/// `POST /exercises` + `{ "name": "Incline Bench Press", "muscle_group": "Chest" }`
///
/// 동시에 같은 이름이 추가되면 드물게 중복 행이 생길 수 있습니다.
/// 조회는 항상 가장 먼저 만들어진 행을 쓰므로 동작에는 영향이 없습니다.
pub async fn create_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<CatalogExercise>), AppError> {
    let name = req.name.split_whitespace().collect::<Vec<_>>().join(" ");
    // slugify: "  Bench   Press! " → "bench-press"
    let name_key = slug::slugify(&name);
    if name_key.is_empty() {
        return Err(AppError::BadRequest("Exercise name is required".to_string()));
    }

    if let Some(existing) = db::find_catalog_by_key(&state.pool, &name_key).await? {
        tracing::debug!(name = %name, existing = %existing.name, "catalog entry already exists");
        return Ok((StatusCode::OK, Json(existing)));
    }

    let muscle_group = req
        .muscle_group
        .as_deref()
        .map(str::trim)
        .filter(|group| !group.is_empty());

    let exercise = db::create_catalog_exercise(
        &state.pool,
        &uuid::Uuid::now_v7().to_string(),
        &name,
        &name_key,
        muscle_group,
        Some(&auth.user_id),
    )
    .await?;

    tracing::info!(exercise = %exercise.name, user_id = %auth.user_id, "catalog exercise added");
    Ok((StatusCode::CREATED, Json(exercise)))
}
