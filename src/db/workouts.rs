//! # 운동 기록 데이터베이스 쿼리 모듈
//!
//! 완료된 세션(`workouts` 테이블)의 저장, 조회, 삭제를 담당합니다.
//!
//! ## 라이프사이클
//! ```text
//! [세션 완료] create_workout() → 변경 불가능한 이력 → delete_workout() → [삭제]
//! ```
//!
//! 저장된 기록은 수정하지 않습니다. 이후에는 새 세션의 목표("이전 기록")를
//! 계산하는 데만 읽힙니다.

use crate::error::AppError;
use crate::models::{WorkoutData, WorkoutRecord};
use sqlx::types::Json;
use sqlx::SqlitePool;

/// 완료된 세션을 한 행으로 저장합니다.
///
/// ## 매개변수
/// - `workout_date`: ISO 8601 문자열. 백데이트된 날짜일 수 있음
/// - `data`: 운동 항목 + 캐시된 총 볼륨 + 운동 시간
/// - `discipline`: 저장 시점의 프로필 종목: None이면 NULL
pub async fn create_workout(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    muscle_group: &str,
    workout_date: &str,
    data: &WorkoutData,
    discipline: Option<&str>,
) -> Result<WorkoutRecord, AppError> {
    // r#"..."#: 원시 문자열 리터럴. 줄바꿈과 따옴표를 그대로 쓸 수 있습니다.
    sqlx::query(
        r#"
        INSERT INTO workouts (id, user_id, type, muscle_group, workout_date, data, discipline)
        VALUES (?, ?, 'workout', ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(muscle_group)
    .bind(workout_date)
    // Json(data): 구조체를 JSON 텍스트로 직렬화하여 바인딩합니다.
    .bind(Json(data))
    .bind(discipline) // Option<&str>: None이면 SQL NULL
    .execute(pool)
    .await?;

    // 생성 직후 조회하여 DB가 채운 기본값(created_at 등)이 포함된 객체를 반환
    get_workout(pool, id)
        .await?
        .ok_or(AppError::Internal(
            "Failed to retrieve created workout".to_string(),
        ))
}

/// ID로 운동 기록 하나를 조회합니다.
pub async fn get_workout(pool: &SqlitePool, id: &str) -> Result<Option<WorkoutRecord>, AppError> {
    let workout = sqlx::query_as::<_, WorkoutRecord>(
        r#"
        SELECT id, user_id, type, muscle_group, workout_date, data, discipline, created_at
        FROM workouts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool) // 0행이면 None, 1행이면 Some
    .await?;

    Ok(workout)
}

/// 선수의 운동 기록을 최신순으로 최대 `limit`개 조회합니다.
///
/// 목표 계산의 "최근 N개 세션" 범위로도 쓰입니다.
/// 같은 날짜면 나중에 저장된 기록이 먼저 옵니다.
pub async fn list_workouts(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<WorkoutRecord>, AppError> {
    let workouts = sqlx::query_as::<_, WorkoutRecord>(
        r#"
        SELECT id, user_id, type, muscle_group, workout_date, data, discipline, created_at
        FROM workouts
        WHERE user_id = ?
        ORDER BY workout_date DESC, created_at DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool) // 모든 행을 Vec으로 반환 (0개여도 빈 Vec)
    .await?;

    Ok(workouts)
}

/// 같은 부위 이름(대소문자 무시)의 세션을 최신순으로 모두 조회합니다.
///
/// 새 세션을 "지난번 같은 부위 세션"으로 미리 채울 때 사용합니다.
pub async fn list_workouts_for_muscle_group(
    pool: &SqlitePool,
    user_id: &str,
    muscle_group: &str,
) -> Result<Vec<WorkoutRecord>, AppError> {
    let workouts = sqlx::query_as::<_, WorkoutRecord>(
        r#"
        SELECT id, user_id, type, muscle_group, workout_date, data, discipline, created_at
        FROM workouts
        WHERE user_id = ? AND LOWER(TRIM(muscle_group)) = LOWER(?)
        ORDER BY workout_date DESC, created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(muscle_group.trim())
    .fetch_all(pool)
    .await?;

    Ok(workouts)
}

/// 선수가 과거에 이 이름의 운동을 기록한 적이 있는지 확인합니다.
///
/// `json_each()`: SQLite JSON1 함수. JSON 배열의 각 원소를 행처럼 펼쳐 줍니다.
pub async fn exercise_in_history(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
) -> Result<bool, AppError> {
    let found: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT 1
        FROM workouts, json_each(workouts.data, '$.exercises') AS entry
        WHERE workouts.user_id = ?
          AND LOWER(TRIM(json_extract(entry.value, '$.name'))) = LOWER(?)
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(name.trim())
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

/// 운동 기록을 삭제합니다. 삭제된 행이 있으면 true
pub async fn delete_workout(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    // rows_affected(): 실제로 영향을 받은 행 수
    Ok(result.rows_affected() > 0)
}
