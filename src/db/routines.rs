use crate::error::AppError;
use crate::models::{Routine, RoutineExercise};
use sqlx::types::Json;
use sqlx::SqlitePool;

pub async fn create_routine(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    created_by: &str,
    name: &str,
    exercises: &[RoutineExercise],
) -> Result<Routine, AppError> {
    sqlx::query(
        r#"
        INSERT INTO routines (id, user_id, created_by, name, exercises)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(created_by)
    .bind(name)
    .bind(Json(exercises))
    .execute(pool)
    .await?;

    get_routine(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created routine".to_string()))
}

pub async fn get_routine(pool: &SqlitePool, id: &str) -> Result<Option<Routine>, AppError> {
    let routine = sqlx::query_as::<_, Routine>(
        "SELECT id, user_id, created_by, name, exercises, created_at FROM routines WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(routine)
}

pub async fn list_routines(pool: &SqlitePool, user_id: &str) -> Result<Vec<Routine>, AppError> {
    let routines = sqlx::query_as::<_, Routine>(
        r#"
        SELECT id, user_id, created_by, name, exercises, created_at
        FROM routines
        WHERE user_id = ?
        ORDER BY name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(routines)
}

pub async fn delete_routine(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM routines WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
