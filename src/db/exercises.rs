//! # 운동 카탈로그 쿼리 모듈
//!
//! 카탈로그는 여러 사용자가 동시에 추가할 수 있는 공유 테이블입니다.
//! 중복 방지 잠금은 없고, `name_key`(slug)로 먼저 조회해서 중복을 줄이기만 합니다.

use crate::error::AppError;
use crate::models::CatalogExercise;
use sqlx::SqlitePool;

/// 자동완성용 카탈로그 검색
///
/// - `query`: 이름에 포함된 문자열 (대소문자 무시). None이면 전체
/// - `muscle_group`: 부위 필터 (대소문자 무시). None이면 전체
pub async fn search_catalog(
    pool: &SqlitePool,
    query: Option<&str>,
    muscle_group: Option<&str>,
    limit: i64,
) -> Result<Vec<CatalogExercise>, AppError> {
    // "%bench%" 형태의 LIKE 패턴. SQLite의 LIKE는 ASCII 대소문자를 구분하지 않습니다.
    let pattern = format!("%{}%", query.unwrap_or("").trim());

    let exercises = sqlx::query_as::<_, CatalogExercise>(
        r#"
        SELECT id, name, muscle_group, user_id, created_at
        FROM exercises
        WHERE name LIKE ?
          AND (? IS NULL OR LOWER(muscle_group) = LOWER(?))
        ORDER BY name ASC
        LIMIT ?
        "#,
    )
    .bind(&pattern)
    .bind(muscle_group)
    .bind(muscle_group)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(exercises)
}

/// 정규화 키로 가장 먼저 만들어진 카탈로그 항목을 찾습니다.
pub async fn find_catalog_by_key(
    pool: &SqlitePool,
    name_key: &str,
) -> Result<Option<CatalogExercise>, AppError> {
    let exercise = sqlx::query_as::<_, CatalogExercise>(
        r#"
        SELECT id, name, muscle_group, user_id, created_at
        FROM exercises
        WHERE name_key = ?
        ORDER BY created_at ASC
        LIMIT 1
        "#,
    )
    .bind(name_key)
    .fetch_optional(pool)
    .await?;

    Ok(exercise)
}

pub async fn create_catalog_exercise(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    name_key: &str,
    muscle_group: Option<&str>,
    user_id: Option<&str>,
) -> Result<CatalogExercise, AppError> {
    sqlx::query(
        r#"
        INSERT INTO exercises (id, name, name_key, muscle_group, user_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(name_key)
    .bind(muscle_group)
    .bind(user_id)
    .execute(pool)
    .await?;

    let exercise = sqlx::query_as::<_, CatalogExercise>(
        "SELECT id, name, muscle_group, user_id, created_at FROM exercises WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    exercise.ok_or(AppError::Internal(
        "Failed to retrieve created exercise".to_string(),
    ))
}
