//! # 루틴 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/routines | `list_routines` | 내 루틴 목록 |
//! | POST | /api/v1/routines | `create_routine` | 루틴 생성 (코치는 선수에게도 가능) |
//! | DELETE | /api/v1/routines/:id | `delete_routine` | 루틴 삭제 |

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

pub async fn list_routines(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let routines = db::list_routines(&state.pool, &auth.user_id).await?;
    Ok(Json(json!({ "routines": routines })))
}

/// `POST /routines`
///
/// `athlete_id`가 본인이 아니면 요청자는 그 선수와 연결된 코치여야 합니다.
pub async fn create_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<CreateRoutineRequest>,
) -> Result<(StatusCode, Json<Routine>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Routine name is required".to_string()));
    }
    if req.exercises.is_empty() {
        return Err(AppError::BadRequest(
            "A routine needs at least one exercise".to_string(),
        ));
    }

    let mut exercises = Vec::with_capacity(req.exercises.len());
    for exercise in req.exercises {
        let exercise_name = exercise.name.split_whitespace().collect::<Vec<_>>().join(" ");
        if exercise_name.is_empty() {
            return Err(AppError::BadRequest("Exercise name is required".to_string()));
        }
        if exercise.sets_goal == Some(0) {
            return Err(AppError::BadRequest(
                "sets_goal must be at least 1".to_string(),
            ));
        }
        exercises.push(RoutineExercise {
            name: exercise_name,
            sets_goal: exercise.sets_goal,
        });
    }

    let owner = match req.athlete_id.as_deref() {
        None => auth.user_id.clone(),
        Some(athlete_id) if athlete_id == auth.user_id => auth.user_id.clone(),
        Some(athlete_id) => {
            if !auth.is_coach() || !db::is_linked(&state.pool, &auth.user_id, athlete_id).await? {
                return Err(AppError::Forbidden(
                    "Only a linked coach can create routines for this athlete".to_string(),
                ));
            }
            athlete_id.to_string()
        }
    };

    let routine = db::create_routine(
        &state.pool,
        &uuid::Uuid::now_v7().to_string(),
        &owner,
        &auth.user_id,
        name,
        &exercises,
    )
    .await?;

    tracing::info!(
        routine_id = %routine.id,
        user_id = %owner,
        created_by = %auth.user_id,
        "routine created"
    );
    Ok((StatusCode::CREATED, Json(routine)))
}

/// 루틴의 주인(선수)이나 만든 사람(코치)만 지울 수 있습니다.
pub async fn delete_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    let routine = db::get_routine(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if routine.user_id != auth.user_id && routine.created_by != auth.user_id {
        return Err(AppError::Forbidden("Not allowed to delete this routine".to_string()));
    }

    db::delete_routine(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
