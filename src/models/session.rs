//! # 라이브 운동 세션 모델 정의
//!
//! 진행 중인 세션(메모리에만 존재)을 조작하는 요청 본문과,
//! 클라이언트에 돌려주는 화면용 응답 구조체들을 정의합니다.
//!
//! ## 세션 흐름
//! 1. `StartSessionRequest`로 세션 시작 (setup → active)
//! 2. 운동 항목/세트 추가·수정·삭제 (active)
//! 3. `POST /sessions/:id/finish`로 종료 확인 단계 진입 (active → finishing)
//! 4. `CompleteSessionRequest`로 시간 확인 후 저장 (finishing → persisted)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::workout::{SetExtension, SetRecord, Target, Technique, WorkoutRecord};

/// 세션 상태 머신의 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// 부위/루틴을 고르는 중
    Setup,
    /// 운동 진행 중 (타이머 동작)
    Active,
    /// 운동 시간 확인 모달
    Finishing,
    /// 저장 완료 (종료 상태)
    Persisted,
}

/// 운동 항목 이동 방향: 인접한 항목과의 교환만 가능합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// 세션 시작 요청: `POST /api/v1/sessions`
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// 부위/세션 이름 (필수, 공백만 있으면 거부)
    pub muscle_group: String,
    /// 저장된 루틴으로 운동 항목을 미리 채우는 경우
    pub routine_id: Option<String>,
    /// 같은 부위의 가장 최근 세션으로 미리 채우는 경우
    #[serde(default)]
    pub seed_from_history: bool,
}

/// 운동 항목 추가 요청: `POST /api/v1/sessions/:id/exercises`
#[derive(Debug, Deserialize)]
pub struct AddExerciseRequest {
    pub name: String,
    #[serde(default)]
    pub is_superset: bool,
}

/// `POST /api/v1/sessions/:id/exercises/:idx/move`
#[derive(Debug, Deserialize)]
pub struct MoveExerciseRequest {
    pub direction: MoveDirection,
}

/// `PUT /api/v1/sessions/:id/exercises/:idx/superset`
#[derive(Debug, Deserialize)]
pub struct SupersetRequest {
    pub is_superset: bool,
}

/// 세트 추가/수정 폼 입력
///
/// 휴식 시간은 분 단위로 받고 `SetRecord.rest_seconds`로 변환됩니다.
/// 무게와 반복 횟수는 필수입니다 (맨몸 운동은 무게 0을 명시). 빠지면 `build_set()`이 거부합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetInput {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub tempo: Option<String>,
    pub rest_minutes: Option<f64>,
    #[serde(default)]
    pub is_unilateral: bool,
    #[serde(default)]
    pub techniques: Vec<Technique>,
    #[serde(default)]
    pub technique_counts: BTreeMap<Technique, u32>,
    #[serde(default)]
    pub extensions: Vec<SetExtension>,
}

/// 세션 저장 요청: `POST /api/v1/sessions/:id/complete`
#[derive(Debug, Default, Deserialize)]
pub struct CompleteSessionRequest {
    /// 사용자가 확인한 운동 시간(분). None이면 경과 시간 기본값 사용
    pub duration_minutes: Option<u32>,
    /// 백데이트할 운동 날짜. None이면 현재 시각
    pub workout_date: Option<DateTime<Utc>>,
}

/// 세트 하나의 화면용 표현: 저장되지 않는 파생값(1RM, PR 여부)을 함께 담습니다.
#[derive(Debug, Clone, Serialize)]
pub struct SetView {
    #[serde(flatten)]
    pub set: SetRecord,
    pub estimated_one_rep_max: f64,
    pub is_pr: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseView {
    pub name: String,
    pub is_superset: bool,
    pub previous: Option<Target>,
    pub sets_goal: Option<u32>,
    /// 추정 1RM 기준 최고 세트의 인덱스
    pub best_set_index: Option<usize>,
    pub sets: Vec<SetView>,
}

/// 진행 중인 세션의 화면용 스냅샷: `GET /api/v1/sessions/:id`
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: String,
    pub phase: SessionPhase,
    pub muscle_group: String,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: u64,
    /// "MM:SS" 또는 "HH:MM:SS"
    pub elapsed: String,
    pub total_volume: f64,
    pub exercises: Vec<ExerciseView>,
}

/// 종료 확인 모달에 보여줄 기본값: `POST /api/v1/sessions/:id/finish`
#[derive(Debug, Clone, Serialize)]
pub struct FinishPrompt {
    pub session_id: String,
    pub default_duration_minutes: u32,
    pub elapsed: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseBest {
    pub name: String,
    pub weight: f64,
    pub reps: u32,
    pub estimated_one_rep_max: f64,
}

/// 운동 후 화면용 요약
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSummary {
    pub total_volume: f64,
    pub duration_minutes: u32,
    pub exercise_count: usize,
    pub set_count: usize,
    /// 이전 기록을 넘어선 세트 수
    pub personal_records: usize,
    pub best_sets: Vec<ExerciseBest>,
}

/// 저장 직후 응답: DB가 채운 기본값(created_at)이 포함된 저장 행과 그 요약
#[derive(Debug, Clone, Serialize)]
pub struct CompletedWorkout {
    pub workout: WorkoutRecord,
    pub summary: WorkoutSummary,
}
