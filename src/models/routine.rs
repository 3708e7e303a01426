//! # 루틴 템플릿 모델
//!
//! 루틴은 운동 이름과 목표 세트 수만 담은 템플릿입니다 (무게는 없음).
//! 세션 시작(setup) 단계에서 운동 항목을 미리 채우는 데 읽기 전용으로 쓰입니다.
//! 코치는 연결된 선수에게 루틴을 만들어 줄 수 있습니다.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExercise {
    pub name: String,
    #[serde(default)]
    pub sets_goal: Option<u32>,
}

/// 루틴 엔티티: DB의 `routines` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Routine {
    pub id: String,
    /// 루틴을 사용하는 선수
    pub user_id: String,
    /// 루틴을 만든 사람 (선수 본인 또는 코치)
    pub created_by: String,
    pub name: String,
    pub exercises: Json<Vec<RoutineExercise>>,
    pub created_at: String,
}

/// `POST /api/v1/routines`
#[derive(Debug, Deserialize)]
pub struct CreateRoutineRequest {
    pub name: String,
    pub exercises: Vec<RoutineExercise>,
    /// 코치가 선수에게 루틴을 만들 때 지정. None이면 본인 루틴
    pub athlete_id: Option<String>,
}
