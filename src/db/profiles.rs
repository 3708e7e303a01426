use crate::error::AppError;
use crate::models::Profile;
use sqlx::SqlitePool;

pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<Profile>, AppError> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, display_name, discipline, unit_system, updated_at
        FROM profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// INSERT ... ON CONFLICT DO UPDATE: 없으면 만들고, 있으면 갱신합니다.
pub async fn upsert_profile(
    pool: &SqlitePool,
    user_id: &str,
    display_name: Option<&str>,
    discipline: Option<&str>,
    unit_system: &str,
) -> Result<Profile, AppError> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, display_name, discipline, unit_system)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            display_name = excluded.display_name,
            discipline = excluded.discipline,
            unit_system = excluded.unit_system,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(user_id)
    .bind(display_name)
    .bind(discipline)
    .bind(unit_system)
    .execute(pool)
    .await?;

    get_profile(pool, user_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve saved profile".to_string()))
}
