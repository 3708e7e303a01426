//! # 운동 기록 API 라우트 핸들러
//!
//! 저장이 끝난 세션(변경 불가능한 이력)의 조회와 삭제를 다룹니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/workouts | `list_workouts` | 내 기록 (최신순) |
//! | GET | /api/v1/workouts/:id | `get_workout` | 기록 상세 + 요약 |
//! | DELETE | /api/v1/workouts/:id | `delete_workout` | 기록 삭제 (본인만) |
//! | GET | /api/v1/athletes/:id/workouts | `list_athlete_workouts` | 코치의 선수 기록 조회 |
//!
//! 코치는 연결된 선수의 기록을 읽을 수만 있고 수정하거나 지울 수 없습니다.

use crate::{
    db,
    error::AppError,
    extract::{AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::*,
    routes::{clamp_limit, AppState},
    services::metrics,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

const DEFAULT_LIMIT: i64 = 20;

/// 요청자가 이 선수의 기록을 읽을 수 있는지 확인합니다.
///
/// 본인이거나, 그 선수와 연결된 코치여야 합니다.
async fn ensure_can_read(state: &AppState, auth: &AuthUser, athlete_id: &str) -> Result<(), AppError> {
    if auth.user_id == athlete_id {
        return Ok(());
    }
    if auth.is_coach() && db::is_linked(&state.pool, &auth.user_id, athlete_id).await? {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "Not allowed to view this athlete's workouts".to_string(),
    ))
}

/// `GET /workouts?limit=20`
pub async fn list_workouts(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<ListWorkoutsQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = clamp_limit(query.limit, DEFAULT_LIMIT);
    let workouts = db::list_workouts(&state.pool, &auth.user_id, limit).await?;

    Ok(Json(json!({ "workouts": workouts })))
}

/// `GET /workouts/:id`: 기록 하나와 요약(최고 세트, 총 볼륨 등)
///
/// 요약의 PR 개수는 저장된 각 항목의 `previous`로 다시 계산합니다.
pub async fn get_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<Value>, AppError> {
    let workout = db::get_workout(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_can_read(&state, &auth, &workout.user_id).await?;

    let summary = metrics::summarize(&workout.data);
    Ok(Json(json!({ "workout": workout, "summary": summary })))
}

/// `DELETE /workouts/:id`: 본인의 기록만 지울 수 있습니다.
///
/// 삭제된 기록은 이후 목표 계산에서도 빠집니다.
pub async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    let workout = db::get_workout(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if workout.user_id != auth.user_id {
        return Err(AppError::Forbidden(
            "Only the athlete can delete a workout".to_string(),
        ));
    }

    if !db::delete_workout(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(workout_id = %id, user_id = %auth.user_id, "workout deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /athletes/:id/workouts?limit=20`: 코치 화면용
pub async fn list_athlete_workouts(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(athlete_id): AppPath<String>,
    AppQuery(query): AppQuery<ListWorkoutsQuery>,
) -> Result<Json<Value>, AppError> {
    ensure_can_read(&state, &auth, &athlete_id).await?;

    let limit = clamp_limit(query.limit, DEFAULT_LIMIT);
    let workouts = db::list_workouts(&state.pool, &athlete_id, limit).await?;

    Ok(Json(json!({ "athlete_id": athlete_id, "workouts": workouts })))
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::models::{ExerciseEntry, SetRecord, WorkoutData, DEFAULT_TEMPO};
    use crate::routes::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn one_set_workout(weight: f64, reps: u32) -> WorkoutData {
        let set = SetRecord {
            weight,
            reps,
            tempo: DEFAULT_TEMPO.to_string(),
            rest_seconds: None,
            is_unilateral: false,
            techniques: Default::default(),
            technique_counts: Default::default(),
            extensions: Vec::new(),
        };
        WorkoutData {
            exercises: vec![ExerciseEntry {
                sets: vec![set],
                ..ExerciseEntry::new("Deadlift", None)
            }],
            total_volume: weight * reps as f64,
            duration_minutes: 30,
        }
    }

    #[tokio::test]
    async fn coach_reads_only_linked_athletes() {
        let state = test_state().await;
        db::create_workout(
            &state.pool,
            "w1",
            "athlete-1",
            "Back",
            "2026-02-01T08:00:00.000Z",
            &one_set_workout(180.0, 3),
            None,
        )
        .await
        .unwrap();

        let coach_token = coach("coach-1");
        let (status, _) = send(
            &state,
            Method::GET,
            "/api/v1/athletes/athlete-1/workouts",
            Some(&coach_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        db::add_athlete(&state.pool, "coach-1", "athlete-1").await.unwrap();
        let (status, body) = send(
            &state,
            Method::GET,
            "/api/v1/athletes/athlete-1/workouts",
            Some(&coach_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workouts"][0]["id"], "w1");

        let (status, body) = send(&state, Method::GET, "/api/v1/workouts/w1", Some(&coach_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["best_sets"][0]["weight"], 180.0);

        // 읽기만 가능합니다.
        let (status, _) = send(&state, Method::DELETE, "/api/v1/workouts/w1", Some(&coach_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn other_athletes_cannot_read_history() {
        let state = test_state().await;
        db::create_workout(
            &state.pool,
            "w1",
            "athlete-1",
            "Back",
            "2026-02-01T08:00:00.000Z",
            &one_set_workout(100.0, 5),
            None,
        )
        .await
        .unwrap();

        let (status, _) = send(
            &state,
            Method::GET,
            "/api/v1/workouts/w1",
            Some(&athlete("athlete-2")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_deletable() {
        let state = test_state().await;
        for (id, date) in [("old", "2026-01-01T08:00:00.000Z"), ("new", "2026-01-08T08:00:00.000Z")] {
            db::create_workout(&state.pool, id, "athlete-1", "Legs", date, &one_set_workout(100.0, 5), None)
                .await
                .unwrap();
        }
        let token = athlete("athlete-1");

        let (_, body) = send(&state, Method::GET, "/api/v1/workouts?limit=5", Some(&token), None).await;
        let ids: Vec<_> = body["workouts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["new", "old"]);

        let (status, _) = send(&state, Method::DELETE, "/api/v1/workouts/new", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&state, Method::GET, "/api/v1/workouts/new", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&state, Method::GET, "/api/v1/workouts", Some(&token), None).await;
        assert_eq!(body["workouts"].as_array().unwrap().len(), 1);
        assert_eq!(body["workouts"][0]["id"], json!("old"));
    }
}
