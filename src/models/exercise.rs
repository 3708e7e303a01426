//! # 운동 카탈로그 모델
//!
//! 모든 사용자가 함께 쓰는 운동 이름 목록입니다 (추가만 가능).
//! `user_id`는 항목을 추가한 사람이고, 기본 제공 항목은 NULL입니다.
//! 중복 판별 키(`name_key`, slug)는 DB 조회 조건으로만 쓰고 구조체에는 싣지 않습니다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogExercise {
    pub id: String,
    pub name: String,
    pub muscle_group: Option<String>,
    pub user_id: Option<String>,
    pub created_at: String,
}

/// `GET /api/v1/exercises?q=bench&muscle_group=chest`: 자동완성 조회
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub muscle_group: Option<String>,
    pub limit: Option<i64>,
}

/// `POST /api/v1/exercises`
#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub muscle_group: Option<String>,
}
