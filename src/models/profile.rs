use serde::{Deserialize, Serialize};

/// 무게 단위계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Kg,
    Lb,
}

impl UnitSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Kg => "kg",
            UnitSystem::Lb => "lb",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: String,
    pub display_name: Option<String>,
    /// 종목 (예: "bodybuilding", "powerlifting"): 세션 저장 시 복사됩니다.
    pub discipline: Option<String>,
    pub unit_system: String,
    pub updated_at: String,
}

impl Profile {
    /// 아직 프로필을 저장하지 않은 사용자의 기본값
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name: None,
            discipline: None,
            unit_system: UnitSystem::Kg.as_str().to_string(),
            updated_at: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub discipline: Option<String>,
    pub unit_system: Option<UnitSystem>,
}

/// 코치-선수 연결: DB의 `coach_athletes` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RosterEntry {
    pub coach_id: String,
    pub athlete_id: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct AddAthleteRequest {
    pub athlete_id: String,
}
