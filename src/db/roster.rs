use crate::error::AppError;
use crate::models::RosterEntry;
use sqlx::SqlitePool;

/// 이미 연결되어 있으면 아무것도 하지 않습니다.
pub async fn add_athlete(
    pool: &SqlitePool,
    coach_id: &str,
    athlete_id: &str,
) -> Result<RosterEntry, AppError> {
    sqlx::query("INSERT OR IGNORE INTO coach_athletes (coach_id, athlete_id) VALUES (?, ?)")
        .bind(coach_id)
        .bind(athlete_id)
        .execute(pool)
        .await?;

    let entry = sqlx::query_as::<_, RosterEntry>(
        "SELECT coach_id, athlete_id, created_at FROM coach_athletes WHERE coach_id = ? AND athlete_id = ?",
    )
    .bind(coach_id)
    .bind(athlete_id)
    .fetch_optional(pool)
    .await?;

    entry.ok_or(AppError::Internal("Failed to retrieve roster entry".to_string()))
}

pub async fn remove_athlete(
    pool: &SqlitePool,
    coach_id: &str,
    athlete_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM coach_athletes WHERE coach_id = ? AND athlete_id = ?")
        .bind(coach_id)
        .bind(athlete_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_roster(pool: &SqlitePool, coach_id: &str) -> Result<Vec<RosterEntry>, AppError> {
    let entries = sqlx::query_as::<_, RosterEntry>(
        r#"
        SELECT coach_id, athlete_id, created_at
        FROM coach_athletes
        WHERE coach_id = ?
        ORDER BY created_at ASC
        "#,
    )
    .bind(coach_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn is_linked(pool: &SqlitePool, coach_id: &str, athlete_id: &str) -> Result<bool, AppError> {
    let found: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM coach_athletes WHERE coach_id = ? AND athlete_id = ?")
            .bind(coach_id)
            .bind(athlete_id)
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}
