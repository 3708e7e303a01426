use crate::{
    db,
    error::AppError,
    extract::AppJson,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
};
use axum::{extract::State, Json};

/// `GET /profile`: 저장한 적이 없으면 기본값(kg, 종목 없음)을 돌려줍니다.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Profile>, AppError> {
    let profile = db::get_profile(&state.pool, &auth.user_id)
        .await?
        .unwrap_or_else(|| Profile::empty(&auth.user_id));

    Ok(Json(profile))
}

/// `PUT /profile`: 보낸 필드만 바꾸고 나머지는 기존 값을 유지합니다.
///
/// 빈 문자열은 값을 지우는 것으로 처리합니다.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let current = db::get_profile(&state.pool, &auth.user_id)
        .await?
        .unwrap_or_else(|| Profile::empty(&auth.user_id));

    let merge = |incoming: Option<String>, existing: Option<String>| match incoming {
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value.trim().to_string()),
        None => existing,
    };
    let display_name = merge(req.display_name, current.display_name);
    let discipline = merge(req.discipline, current.discipline);
    let unit_system = req
        .unit_system
        .map(|unit| unit.as_str().to_string())
        .unwrap_or(current.unit_system);

    let profile = db::upsert_profile(
        &state.pool,
        &auth.user_id,
        display_name.as_deref(),
        discipline.as_deref(),
        &unit_system,
    )
    .await?;

    tracing::debug!(user_id = %auth.user_id, "profile updated");
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn profile_updates_merge_with_existing_values() {
        let state = test_state().await;
        let token = athlete("athlete-1");

        let (status, body) = send(&state, Method::GET, "/api/v1/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["unit_system"], "kg");
        assert!(body["discipline"].is_null());

        send(
            &state,
            Method::PUT,
            "/api/v1/profile",
            Some(&token),
            Some(json!({ "display_name": "Jo", "discipline": "powerlifting" })),
        )
        .await;
        let (_, body) = send(
            &state,
            Method::PUT,
            "/api/v1/profile",
            Some(&token),
            Some(json!({ "unit_system": "lb" })),
        )
        .await;
        assert_eq!(body["display_name"], "Jo");
        assert_eq!(body["discipline"], "powerlifting");
        assert_eq!(body["unit_system"], "lb");

        // 알 수 없는 단위계는 다른 입력 오류와 같은 에러 형태로 400
        let (status, body) = send(
            &state,
            Method::PUT,
            "/api/v1/profile",
            Some(&token),
            Some(json!({ "unit_system": "stone" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(body["error"]["message"].as_str().unwrap().contains("unit_system"));

        let (_, body) = send(&state, Method::GET, "/api/v1/profile", Some(&token), None).await;
        assert_eq!(body["unit_system"], "lb");
    }
}
