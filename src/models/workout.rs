//! # 운동 기록 데이터 모델
//!
//! 세트(Set) → 운동 항목(Exercise Entry) → 세션(Workout) 순으로 쌓이는
//! 운동 기록의 핵심 구조체들을 정의합니다.
//!
//! ## 구조
//! ```text
//! WorkoutRecord (workouts 테이블 한 행)
//!   └─ data: WorkoutData
//!        ├─ exercises: Vec<ExerciseEntry>
//!        │    └─ sets: Vec<SetRecord>
//!        ├─ total_volume      (저장 시점에 한 번 계산)
//!        └─ duration_minutes  (사용자가 종료 시 확인한 값)
//! ```
//!
//! 저장된 `data` 컬럼은 JSON 텍스트이므로, 예전 클라이언트가 남긴 행에서
//! 필드가 빠져 있어도 읽을 수 있도록 대부분의 필드에 `#[serde(default)]`를 붙였습니다.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::collections::{BTreeMap, BTreeSet};

/// 템포 입력이 비어 있을 때 쓰는 기본값 (이완-정지-수축 초)
pub const DEFAULT_TEMPO: &str = "3-0-1";

fn default_tempo() -> String {
    DEFAULT_TEMPO.to_string()
}

/// 세트에 적용하는 강도 기법
///
/// `#[serde(rename_all = "snake_case")]`: JSON에서는 `"rest_pause"`, `"drop_set"`처럼
/// 스네이크 케이스 문자열로 표현됩니다.
///
/// `Ord`를 derive한 이유는 `BTreeSet`/`BTreeMap`의 키로 쓰기 위해서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    RestPause,
    DropSet,
    ForcedReps,
    Negatives,
    Static,
    Partial,
}

impl Technique {
    /// 추가 횟수/초를 기록할 수 있는 기법인지 여부
    ///
    /// 강제 반복(forced_reps), 부분 반복(partial), 정적 유지(static)만 해당합니다.
    pub fn is_countable(self) -> bool {
        matches!(self, Technique::ForcedReps | Technique::Partial | Technique::Static)
    }
}

/// 세트의 구조화된 연장: 태그가 붙은 열거형(tagged enum)
///
/// `#[serde(tag = "type")]`로 JSON은 다음과 같이 표현됩니다:
/// - `{ "type": "rest_pause", "rest_time": 15, "reps": 3 }`
/// - `{ "type": "drop_set", "weight": 60.0, "reps": 8 }`
///
/// variant마다 필드가 고정되어 있어서, drop_set에 무게가 빠지는 경우는
/// 컴파일 타임에 걸러집니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetExtension {
    /// 짧은 휴식 후 이어서 한 반복
    RestPause { rest_time: u32, reps: u32 },
    /// 무게를 낮춰 이어서 한 반복
    DropSet { weight: f64, reps: u32 },
}

impl SetExtension {
    /// 같은 종류끼리 비교하기 위한 판별자
    pub fn kind(&self) -> Technique {
        match self {
            SetExtension::RestPause { .. } => Technique::RestPause,
            SetExtension::DropSet { .. } => Technique::DropSet,
        }
    }
}

/// 세트 하나: 세션 기록의 최소 단위
///
/// 수정은 항상 전체 교체로만 이뤄집니다 (부분 수정 없음).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// 무게 (사용자 단위계: kg 또는 lb). 저장된 값이 없으면 0
    #[serde(default)]
    pub weight: f64,
    /// 반복 횟수. 저장된 값이 없으면 0
    #[serde(default)]
    pub reps: u32,
    /// 템포 표기 (예: "3-0-1"). 형식 검증은 하지 않습니다.
    #[serde(default = "default_tempo")]
    pub tempo: String,
    /// 세트 후 휴식 시간(초): 입력은 분 단위로 받아 ×60 합니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    /// 한쪽 팔/다리로 수행했는지 여부
    #[serde(default)]
    pub is_unilateral: bool,
    #[serde(default)]
    pub techniques: BTreeSet<Technique>,
    /// 기법별 추가 횟수/초: `techniques`에 있는 countable 기법만 담깁니다.
    #[serde(default)]
    pub technique_counts: BTreeMap<Technique, u32>,
    #[serde(default)]
    pub extensions: Vec<SetExtension>,
}

/// 진척도 목표("이전 기록"): 무게와 반복 횟수 한 쌍
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub weight: f64,
    pub reps: u32,
}

impl From<&SetRecord> for Target {
    fn from(set: &SetRecord) -> Self {
        Self {
            weight: set.weight,
            reps: set.reps,
        }
    }
}

/// 세션 안의 운동 항목 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    /// 수행 순서대로 정렬된 세트 목록 (삽입 순서 = 표시 순서)
    #[serde(default)]
    pub sets: Vec<SetRecord>,
    /// 바로 앞 항목과 슈퍼세트로 묶였는지 여부. 0번 항목은 항상 false
    #[serde(default)]
    pub is_superset: bool,
    /// 항목 생성 시점에 한 번 계산된 목표. 세션 도중 다시 조회하지 않습니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Target>,
    /// 루틴에서 가져온 목표 세트 수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets_goal: Option<u32>,
}

impl ExerciseEntry {
    pub fn new(name: impl Into<String>, previous: Option<Target>) -> Self {
        Self {
            name: name.into(),
            sets: Vec::new(),
            is_superset: false,
            previous,
            sets_goal: None,
        }
    }
}

/// `workouts.data` 컬럼에 JSON으로 저장되는 세션 본문
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutData {
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
    /// 저장 시점에 캐시된 총 볼륨. 읽을 때 다시 계산하지 않습니다.
    #[serde(default)]
    pub total_volume: f64,
    #[serde(default)]
    pub duration_minutes: u32,
}

/// 완료된 운동 세션 엔티티: DB의 `workouts` 테이블 한 행에 대응합니다.
///
/// 한 번 저장되면 변경되지 않는 이력으로 취급합니다 (삭제만 가능).
///
/// `Json<WorkoutData>`: sqlx가 TEXT 컬럼의 JSON을 구조체로 자동 변환합니다.
/// serde 직렬화 시에는 내부 값이 그대로(transparent) 출력됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutRecord {
    pub id: String,
    /// 세션 소유자(운동선수)의 ID
    pub user_id: String,
    /// 기록 종류: 현재는 항상 "workout"
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub log_type: String,
    pub muscle_group: String,
    /// 운동 날짜 (ISO 8601). 유산소 기록처럼 과거 날짜로 백데이트될 수 있음
    pub workout_date: String,
    pub data: Json<WorkoutData>,
    /// 저장 시점에 프로필에서 복사한 종목(discipline)
    pub discipline: Option<String>,
    pub created_at: String,
}

/// 운동 기록 목록 조회 쿼리: `GET /api/v1/workouts?limit=20`
#[derive(Debug, Deserialize)]
pub struct ListWorkoutsQuery {
    pub limit: Option<i64>,
}

/// `GET /api/v1/progression?exercise=Bench%20Press`
#[derive(Debug, Deserialize)]
pub struct ProgressionQuery {
    pub exercise: String,
    pub limit: Option<i64>,
}

/// 진척도 목표 조회 결과
///
/// 한 번도 기록하지 않은 운동이면 `target`이 None이고 `first_session`이 true입니다.
/// 이것은 에러가 아니라 정상적인 결과입니다.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionTarget {
    pub exercise: String,
    pub target: Option<Target>,
    pub first_session: bool,
}

/// 세션별 최고 세트 추이의 한 점
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub workout_id: String,
    pub workout_date: String,
    pub weight: f64,
    pub reps: u32,
    pub estimated_one_rep_max: f64,
    /// 직전 점 대비 추정 1RM 변화량 (첫 점은 None)
    pub delta: Option<f64>,
}
