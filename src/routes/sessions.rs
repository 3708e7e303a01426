//! # 운동 세션 API 라우트 핸들러
//!
//! 진행 중인 운동 세션의 시작부터 저장까지를 다루는 HTTP 핸들러 함수들입니다.
//! 세션은 `AppState.live`(메모리)에만 있고, `complete` 시점에 한 번만 DB에 씁니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/sessions | `list_sessions` | 내 진행 중인 세션 목록 |
//! | POST | /api/v1/sessions | `start_session` | 세션 시작 (setup → active) |
//! | GET | /api/v1/sessions/:id | `get_session` | 세션 화면 |
//! | DELETE | /api/v1/sessions/:id | `cancel_session` | 세션 폐기 |
//! | POST | /api/v1/sessions/:id/exercises | `add_exercise` | 운동 추가 |
//! | DELETE | /api/v1/sessions/:id/exercises/:index | `remove_exercise` | 운동 삭제 |
//! | POST | /api/v1/sessions/:id/exercises/:index/move | `move_exercise` | 위/아래 이동 |
//! | PUT | /api/v1/sessions/:id/exercises/:index/superset | `set_superset` | 슈퍼세트 토글 |
//! | POST | /api/v1/sessions/:id/exercises/:index/sets | `add_set` | 세트 추가 |
//! | PUT | /api/v1/sessions/:id/exercises/:index/sets/:set_index | `replace_set` | 세트 수정 |
//! | DELETE | /api/v1/sessions/:id/exercises/:index/sets/:set_index | `remove_set` | 세트 삭제 |
//! | POST | /api/v1/sessions/:id/finish | `finish_session` | active → finishing |
//! | POST | /api/v1/sessions/:id/resume | `resume_session` | finishing → active |
//! | POST | /api/v1/sessions/:id/complete | `complete_session` | finishing → persisted |
//!
//! ## 세션 사용 흐름
//! ```text
//! 1. 로거 진입 → POST /sessions (부위 선택, 루틴/최근 세션으로 미리 채우기)
//! 2. 운동 추가 → POST /sessions/:id/exercises (이전 기록을 목표로 계산)
//! 3. 세트 입력 → POST .../sets (응답의 is_pr로 PR 표시)
//! 4. 종료 → POST /sessions/:id/finish (기본 운동 시간 확인)
//! 5. 저장 → POST /sessions/:id/complete (한 번의 쓰기, 요약 반환)
//! ```

use crate::{
    db,
    error::AppError,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::{
        metrics, progression,
        session::{build_set, SessionError, WorkoutSession},
    },
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// 내 세션을 찾아 클로저 `f`로 조작합니다.
///
/// 쓰기 잠금은 이 함수 안에서만 잡고, DB 작업 중에는 잡지 않습니다.
/// 다른 사람의 세션 ID는 존재하지 않는 것처럼 404로 응답합니다.
///
/// `FnOnce(&mut WorkoutSession) -> Result<T, SessionError>`:
/// 세션의 가변 참조를 받아 한 번 실행되는 클로저 타입입니다.
async fn with_session<T>(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    f: impl FnOnce(&mut WorkoutSession) -> Result<T, SessionError>,
) -> Result<T, AppError> {
    let mut sessions = state.live.write().await;
    let session = sessions
        .get_mut(id)
        .filter(|session| session.user_id == auth.user_id)
        .ok_or(AppError::NotFound)?;

    // SessionError → AppError 변환은 error.rs의 From 구현이 처리합니다.
    Ok(f(session)?)
}

/// `GET /sessions`: 내 진행 중인 세션 목록 (새로고침 후 이어서 하기용)
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let now = Utc::now();
    let sessions = state.live.read().await;
    let views: Vec<SessionView> = sessions
        .values()
        .filter(|session| session.user_id == auth.user_id)
        .map(|session| session.view(now))
        .collect();

    Ok(Json(json!({ "sessions": views })))
}

/// `POST /sessions`: 세션을 시작합니다.
///
/// `routine_id`가 있으면 루틴의 운동 이름/목표 세트 수로,
/// `seed_from_history`가 true면 같은 부위의 가장 최근 세션으로 운동 항목을 미리 채웁니다.
/// 어느 경우든 각 항목의 `previous`는 이 시점에 한 번 계산됩니다.
pub async fn start_session(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    if req.routine_id.is_some() && req.seed_from_history {
        return Err(AppError::BadRequest(
            "Choose either a routine or the previous session, not both".to_string(),
        ));
    }
    if req.muscle_group.trim().is_empty() {
        return Err(SessionError::MissingMuscleGroup.into());
    }

    let seed = if let Some(routine_id) = &req.routine_id {
        let routine = db::get_routine(&state.pool, routine_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if routine.user_id != auth.user_id {
            return Err(AppError::Forbidden("Routine belongs to another athlete".to_string()));
        }

        let history = db::list_workouts(&state.pool, &auth.user_id, state.history_window).await?;
        routine
            .exercises
            .iter()
            .map(|exercise| {
                let previous =
                    progression::resolve_target(history.iter().map(|w| &w.data.0), &exercise.name);
                ExerciseEntry {
                    sets_goal: exercise.sets_goal,
                    ..ExerciseEntry::new(exercise.name.clone(), previous)
                }
            })
            .collect()
    } else if req.seed_from_history {
        let history =
            db::list_workouts_for_muscle_group(&state.pool, &auth.user_id, &req.muscle_group)
                .await?;
        progression::seed_from_history(&history, &req.muscle_group)
    } else {
        Vec::new()
    };

    let now = Utc::now();
    let mut session = WorkoutSession::new(uuid::Uuid::now_v7().to_string(), &auth.user_id);
    session.start(&req.muscle_group, seed, now)?;

    tracing::info!(
        session_id = %session.id,
        user_id = %auth.user_id,
        muscle_group = %session.muscle_group,
        seeded = session.exercises.len(),
        "workout session started"
    );

    let view = session.view(now);
    state.live.write().await.insert(session.id.clone(), session);

    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /sessions/:id`: 세션 화면 (세트별 PR 여부, 추정 1RM, 경과 시간)
pub async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<SessionView>, AppError> {
    let sessions = state.live.read().await;
    let session = sessions
        .get(&id)
        .filter(|session| session.user_id == auth.user_id)
        .ok_or(AppError::NotFound)?;

    Ok(Json(session.view(Utc::now())))
}

/// `DELETE /sessions/:id`: 세션을 버립니다. 저장된 것이 없으므로 복구도 없습니다.
pub async fn cancel_session(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    let mut sessions = state.live.write().await;
    let session = sessions
        .get(&id)
        .filter(|session| session.user_id == auth.user_id)
        .ok_or(AppError::NotFound)?;
    session.cancel()?;

    sessions.remove(&id);
    tracing::info!(session_id = %id, user_id = %auth.user_id, "workout session cancelled");

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /sessions/:id/exercises`: 운동 항목을 추가합니다.
///
/// 이름은 카탈로그(대소문자/공백 무시)나 내 과거 기록에 있어야 합니다.
/// 카탈로그에 있으면 카탈로그의 표기를 씁니다.
/// 추가하는 순간 최근 `history_window`개 세션에서 목표를 계산합니다.
pub async fn add_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<AddExerciseRequest>,
) -> Result<Json<SessionView>, AppError> {
    let name = req.name.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(SessionError::MissingExerciseName.into());
    }

    let name = match db::find_catalog_by_key(&state.pool, &slug::slugify(&name)).await? {
        Some(exercise) => exercise.name,
        None if db::exercise_in_history(&state.pool, &auth.user_id, &name).await? => name,
        None => {
            return Err(AppError::BadRequest(format!(
                "Unknown exercise '{}'; add it to the catalog first",
                name
            )))
        }
    };

    let history = db::list_workouts(&state.pool, &auth.user_id, state.history_window).await?;
    let previous = progression::resolve_target(history.iter().map(|w| &w.data.0), &name);
    tracing::debug!(exercise = %name, ?previous, "resolved progression target");

    let entry = ExerciseEntry {
        is_superset: req.is_superset,
        ..ExerciseEntry::new(name, previous)
    };

    let now = Utc::now();
    let view = with_session(&state, &auth, &id, |session| {
        session.add_exercise(entry)?;
        Ok(session.view(now))
    })
    .await?;

    Ok(Json(view))
}

/// `DELETE /sessions/:id/exercises/:index`
///
/// `AppPath((id, index))`: 경로 파라미터 두 개를 튜플로 한 번에 추출합니다.
pub async fn remove_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, index)): AppPath<(String, usize)>,
) -> Result<Json<SessionView>, AppError> {
    let now = Utc::now();
    let view = with_session(&state, &auth, &id, |session| {
        session.remove_exercise(index)?;
        Ok(session.view(now))
    })
    .await?;

    Ok(Json(view))
}

/// `POST /sessions/:id/exercises/:index/move` + `{ "direction": "up" }`
pub async fn move_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, index)): AppPath<(String, usize)>,
    AppJson(req): AppJson<MoveExerciseRequest>,
) -> Result<Json<SessionView>, AppError> {
    let now = Utc::now();
    let view = with_session(&state, &auth, &id, |session| {
        session.move_exercise(index, req.direction)?;
        Ok(session.view(now))
    })
    .await?;

    Ok(Json(view))
}

/// `PUT /sessions/:id/exercises/:index/superset` + `{ "is_superset": true }`
pub async fn set_superset(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, index)): AppPath<(String, usize)>,
    AppJson(req): AppJson<SupersetRequest>,
) -> Result<Json<SessionView>, AppError> {
    let now = Utc::now();
    let view = with_session(&state, &auth, &id, |session| {
        session.set_superset(index, req.is_superset)?;
        Ok(session.view(now))
    })
    .await?;

    Ok(Json(view))
}

/// `POST /sessions/:id/exercises/:index/sets`
/// + `{ "weight": 100, "reps": 5, "rest_minutes": 2, "techniques": ["drop_set"], ... }`
pub async fn add_set(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, index)): AppPath<(String, usize)>,
    AppJson(input): AppJson<SetInput>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let set = build_set(input)?;

    let now = Utc::now();
    let view = with_session(&state, &auth, &id, |session| {
        session.add_set(index, set)?;
        Ok(session.view(now))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// `PUT /sessions/:id/exercises/:index/sets/:set_index`: 세트 전체 교체
pub async fn replace_set(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, index, set_index)): AppPath<(String, usize, usize)>,
    AppJson(input): AppJson<SetInput>,
) -> Result<Json<SessionView>, AppError> {
    let set = build_set(input)?;

    let now = Utc::now();
    let view = with_session(&state, &auth, &id, |session| {
        session.replace_set(index, set_index, set)?;
        Ok(session.view(now))
    })
    .await?;

    Ok(Json(view))
}

/// `DELETE /sessions/:id/exercises/:index/sets/:set_index`
pub async fn remove_set(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, index, set_index)): AppPath<(String, usize, usize)>,
) -> Result<Json<SessionView>, AppError> {
    let now = Utc::now();
    let view = with_session(&state, &auth, &id, |session| {
        session.remove_set(index, set_index)?;
        Ok(session.view(now))
    })
    .await?;

    Ok(Json(view))
}

/// `POST /sessions/:id/finish`: 시간 확인 단계로 넘어갑니다.
///
/// 세트가 있는 운동이 하나도 없으면 400을 반환하고 상태는 그대로입니다.
pub async fn finish_session(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<FinishPrompt>, AppError> {
    let now = Utc::now();
    let prompt = with_session(&state, &auth, &id, |session| {
        let default_duration_minutes = session.begin_finish(now)?;
        Ok(FinishPrompt {
            session_id: session.id.clone(),
            default_duration_minutes,
            elapsed: metrics::format_elapsed(session.elapsed_seconds(now)),
        })
    })
    .await?;

    Ok(Json(prompt))
}

/// `POST /sessions/:id/resume`: 시간 확인 모달을 닫고 운동을 계속합니다.
pub async fn resume_session(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<SessionView>, AppError> {
    let now = Utc::now();
    let view = with_session(&state, &auth, &id, |session| {
        session.resume()?;
        Ok(session.view(now))
    })
    .await?;

    Ok(Json(view))
}

/// 저장할 한 행을 씁니다. 종목(discipline)은 이 시점의 프로필에서 복사합니다.
///
/// 반환되는 기록은 `db::create_workout()`이 다시 읽은 저장 행이라 DB 기본값(created_at)까지 담겨 있습니다.
async fn save_workout(
    state: &AppState,
    session: &WorkoutSession,
    data: &WorkoutData,
    workout_date: DateTime<Utc>,
) -> Result<WorkoutRecord, AppError> {
    let discipline = db::get_profile(&state.pool, &session.user_id)
        .await?
        .and_then(|profile| profile.discipline);

    db::create_workout(
        &state.pool,
        &session.id,
        &session.user_id,
        &session.muscle_group,
        &workout_date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        data,
        discipline.as_deref(),
    )
    .await
}

/// `POST /sessions/:id/complete`: 세션을 한 행으로 저장합니다.
///
/// 1. 쓰기 잠금 안에서 저장할 본문(총 볼륨 포함)을 만들고 세션을 맵에서 꺼냅니다.
/// 2. 잠금 없이 DB에 한 번 씁니다.
/// 3. 성공하면 세션은 Persisted가 되어 사라지고, 실패하면 Finishing 상태 그대로 맵에 되돌려 놓습니다.
///
/// 저장하는 동안에는 세션이 맵에 없으므로 resume이나 세트 추가는 404를 받습니다.
/// 저장된 행에 들어가지 못한 세트가 조용히 사라지는 일은 없습니다.
pub async fn complete_session(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<CompleteSessionRequest>,
) -> Result<(StatusCode, Json<CompletedWorkout>), AppError> {
    let now = Utc::now();

    // 블록 표현식: 쓰기 잠금은 블록이 끝날 때 해제됩니다 (DB 작업 전에).
    let (mut session, data) = {
        let mut sessions = state.live.write().await;
        let session = sessions
            .get(&id)
            .filter(|session| session.user_id == auth.user_id)
            .ok_or(AppError::NotFound)?;
        let data = session.build_aggregate(req.duration_minutes, now)?;
        let session = sessions.remove(&id).ok_or(AppError::NotFound)?;
        (session, data)
    };

    let workout = match save_workout(&state, &session, &data, req.workout_date.unwrap_or(now)).await {
        Ok(workout) => workout,
        Err(err) => {
            tracing::warn!(session_id = %id, error = %err, "saving workout failed, session kept for retry");
            state.live.write().await.insert(id, session);
            return Err(err);
        }
    };
    session.mark_persisted()?;

    tracing::info!(
        session_id = %id,
        user_id = %auth.user_id,
        total_volume = data.total_volume,
        duration_minutes = data.duration_minutes,
        "workout session persisted"
    );

    let summary = metrics::summarize(&workout.data);
    Ok((StatusCode::CREATED, Json(CompletedWorkout { workout, summary })))
}
