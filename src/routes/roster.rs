//! # 코치 로스터 API 라우트 핸들러
//!
//! 코치 역할 토큰만 사용할 수 있습니다. 연결되면 코치는 선수의 기록을 읽고
//! 선수에게 루틴을 만들어 줄 수 있습니다.

use crate::{
    db,
    error::AppError,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

fn require_coach(auth: &AuthUser) -> Result<(), AppError> {
    if auth.is_coach() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Coach role required".to_string()))
    }
}

pub async fn list_roster(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    require_coach(&auth)?;
    let athletes = db::list_roster(&state.pool, &auth.user_id).await?;
    Ok(Json(json!({ "athletes": athletes })))
}

/// `POST /roster` + `{ "athlete_id": "..." }`: 이미 연결되어 있어도 201
pub async fn add_to_roster(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<AddAthleteRequest>,
) -> Result<(StatusCode, Json<RosterEntry>), AppError> {
    require_coach(&auth)?;

    let athlete_id = req.athlete_id.trim();
    if athlete_id.is_empty() {
        return Err(AppError::BadRequest("athlete_id is required".to_string()));
    }
    if athlete_id == auth.user_id {
        return Err(AppError::BadRequest("A coach cannot coach themselves".to_string()));
    }

    let entry = db::add_athlete(&state.pool, &auth.user_id, athlete_id).await?;
    tracing::info!(coach_id = %auth.user_id, athlete_id = %athlete_id, "athlete linked");

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn remove_from_roster(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(athlete_id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    require_coach(&auth)?;

    if !db::remove_athlete(&state.pool, &auth.user_id, &athlete_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(coach_id = %auth.user_id, athlete_id = %athlete_id, "athlete unlinked");

    Ok(StatusCode::NO_CONTENT)
}
