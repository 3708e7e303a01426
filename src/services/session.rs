//! # 운동 세션 상태 머신
//!
//! 진행 중인 운동 세션 하나를 표현합니다. 세션은 저장되기 전까지
//! 메모리에만 존재합니다 (중간 저장 없음: 서버가 재시작되면 사라짐).
//!
//! ## 상태 전이
//! ```text
//!  Setup ──start()──▶ Active ──begin_finish()──▶ Finishing ──mark_persisted()──▶ Persisted
//!    │                  │  ▲                          │
//!    │                  │  └────────resume()──────────┘
//!    └──cancel()────────┴──cancel()──▶ (폐기)
//! ```
//!
//! - 운동/세트 편집은 `Active` 상태에서만 가능합니다.
//! - `begin_finish()`는 세트가 하나 이상 있는 운동이 있어야 성공합니다.
//! - 시간 제한이나 유휴 만료는 없습니다.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::*;
use crate::services::metrics::{
    best_set, estimated_one_rep_max, format_elapsed, is_personal_record, round_display,
    total_volume,
};

/// 세션 조작 중 발생하는 도메인 에러
///
/// 라우트 계층에서 `AppError`로 변환됩니다 (error.rs 참고).
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Muscle group is required")]
    MissingMuscleGroup,

    #[error("Exercise name is required")]
    MissingExerciseName,

    #[error("Invalid set: {0}")]
    InvalidSet(String),

    #[error("Exercise {0} does not exist in this session")]
    ExerciseOutOfRange(usize),

    #[error("Set {set} does not exist for exercise {exercise}")]
    SetOutOfRange { exercise: usize, set: usize },

    #[error("The first exercise cannot be part of a superset")]
    SupersetWithoutPredecessor,

    #[error("Cannot move exercise {0} further in that direction")]
    CannotMove(usize),

    #[error("Add at least one exercise with one set before finishing")]
    NothingToFinish,

    #[error("Duration must be at least one minute")]
    InvalidDuration,

    /// 현재 상태에서 허용되지 않는 동작
    #[error("Cannot {action} while session is {phase:?}")]
    InvalidTransition {
        phase: SessionPhase,
        action: &'static str,
    },
}

/// 폼 입력을 검증하여 저장 가능한 세트로 변환합니다.
///
/// - 무게와 반복 횟수는 둘 다 있어야 합니다.
/// - 무게는 유한한 0 이상의 값이어야 합니다.
/// - 무게 0, 반복 0인 세트는 기법이 하나 이상 있을 때만 허용합니다 (예: 맨몸 정적 유지).
/// - 빈 템포는 기본값으로 바뀝니다.
/// - `technique_counts`에서 선택되지 않았거나 셀 수 없는 기법은 버립니다.
/// - 같은 종류의 연장은 마지막에 입력한 것만 남깁니다.
pub fn build_set(input: SetInput) -> Result<SetRecord, SessionError> {
    let weight = input
        .weight
        .ok_or_else(|| SessionError::InvalidSet("weight is required".to_string()))?;
    let reps = input
        .reps
        .ok_or_else(|| SessionError::InvalidSet("reps is required".to_string()))?;

    if !weight.is_finite() || weight < 0.0 {
        return Err(SessionError::InvalidSet(
            "weight must be a non-negative number".to_string(),
        ));
    }

    let techniques: std::collections::BTreeSet<Technique> = input.techniques.into_iter().collect();

    if weight == 0.0 && reps == 0 && techniques.is_empty() {
        return Err(SessionError::InvalidSet(
            "weight and reps cannot both be zero without a technique".to_string(),
        ));
    }

    let rest_seconds = match input.rest_minutes {
        Some(minutes) if !minutes.is_finite() || minutes < 0.0 => {
            return Err(SessionError::InvalidSet(
                "rest must be a non-negative number of minutes".to_string(),
            ));
        }
        // as u32: 반올림한 초 단위 값을 정수로 변환 (음수/NaN은 위에서 걸러짐)
        Some(minutes) => Some((minutes * 60.0).round() as u32),
        None => None,
    };

    let technique_counts = input
        .technique_counts
        .into_iter()
        .filter(|(technique, _)| technique.is_countable() && techniques.contains(technique))
        .collect();

    let mut extensions: Vec<SetExtension> = Vec::new();
    for extension in input.extensions {
        if let SetExtension::DropSet { weight, .. } = extension {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SessionError::InvalidSet(
                    "drop set weight must be a non-negative number".to_string(),
                ));
            }
        }
        match extensions.iter_mut().find(|e| e.kind() == extension.kind()) {
            Some(existing) => *existing = extension,
            None => extensions.push(extension),
        }
    }

    let tempo = input
        .tempo
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TEMPO.to_string());

    Ok(SetRecord {
        weight,
        reps,
        tempo,
        rest_seconds,
        is_unilateral: input.is_unilateral,
        techniques,
        technique_counts,
        extensions,
    })
}

/// 진행 중인 운동 세션
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    pub id: String,
    /// 세션 소유자(선수) ID
    pub user_id: String,
    pub muscle_group: String,
    pub phase: SessionPhase,
    pub exercises: Vec<ExerciseEntry>,
    /// `start()` 시점. Setup 상태에서는 None
    pub started_at: Option<DateTime<Utc>>,
}

impl WorkoutSession {
    /// Setup 상태의 새 세션을 만듭니다.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            muscle_group: String::new(),
            phase: SessionPhase::Setup,
            exercises: Vec::new(),
            started_at: None,
        }
    }

    fn require(&self, phase: SessionPhase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                phase: self.phase,
                action,
            })
        }
    }

    fn exercise_mut(&mut self, index: usize) -> Result<&mut ExerciseEntry, SessionError> {
        self.exercises
            .get_mut(index)
            .ok_or(SessionError::ExerciseOutOfRange(index))
    }

    /// 0번 항목은 슈퍼세트가 될 수 없습니다 (앞 항목이 없으므로).
    fn normalize_supersets(&mut self) {
        if let Some(first) = self.exercises.first_mut() {
            first.is_superset = false;
        }
    }

    /// setup → active
    ///
    /// `seed`는 루틴이나 최근 세션에서 미리 만든 운동 항목입니다 (비어 있어도 됨).
    pub fn start(
        &mut self,
        muscle_group: &str,
        seed: Vec<ExerciseEntry>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.require(SessionPhase::Setup, "start")?;

        let muscle_group = muscle_group.trim();
        if muscle_group.is_empty() {
            return Err(SessionError::MissingMuscleGroup);
        }

        self.muscle_group = muscle_group.to_string();
        self.exercises = seed;
        self.normalize_supersets();
        self.started_at = Some(now);
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// 운동 항목을 맨 뒤에 추가하고 그 인덱스를 반환합니다.
    pub fn add_exercise(&mut self, entry: ExerciseEntry) -> Result<usize, SessionError> {
        self.require(SessionPhase::Active, "add an exercise")?;

        if entry.name.trim().is_empty() {
            return Err(SessionError::MissingExerciseName);
        }
        if entry.is_superset && self.exercises.is_empty() {
            return Err(SessionError::SupersetWithoutPredecessor);
        }

        self.exercises.push(entry);
        Ok(self.exercises.len() - 1)
    }

    pub fn remove_exercise(&mut self, index: usize) -> Result<ExerciseEntry, SessionError> {
        self.require(SessionPhase::Active, "remove an exercise")?;
        if index >= self.exercises.len() {
            return Err(SessionError::ExerciseOutOfRange(index));
        }

        let removed = self.exercises.remove(index);
        self.normalize_supersets();
        Ok(removed)
    }

    /// 인접한 항목과 자리를 바꿉니다. 새 인덱스를 반환합니다.
    pub fn move_exercise(
        &mut self,
        index: usize,
        direction: MoveDirection,
    ) -> Result<usize, SessionError> {
        self.require(SessionPhase::Active, "move an exercise")?;
        if index >= self.exercises.len() {
            return Err(SessionError::ExerciseOutOfRange(index));
        }

        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.exercises.len() => index + 1,
            _ => return Err(SessionError::CannotMove(index)),
        };

        self.exercises.swap(index, target);
        self.normalize_supersets();
        Ok(target)
    }

    pub fn set_superset(&mut self, index: usize, is_superset: bool) -> Result<(), SessionError> {
        self.require(SessionPhase::Active, "change a superset")?;
        if index == 0 && is_superset {
            return Err(SessionError::SupersetWithoutPredecessor);
        }

        self.exercise_mut(index)?.is_superset = is_superset;
        Ok(())
    }

    /// 세트를 추가하고 그 인덱스를 반환합니다.
    pub fn add_set(&mut self, exercise: usize, set: SetRecord) -> Result<usize, SessionError> {
        self.require(SessionPhase::Active, "add a set")?;

        let entry = self.exercise_mut(exercise)?;
        entry.sets.push(set);
        Ok(entry.sets.len() - 1)
    }

    /// 세트 전체를 교체합니다 (수정 다이얼로그).
    pub fn replace_set(
        &mut self,
        exercise: usize,
        index: usize,
        set: SetRecord,
    ) -> Result<(), SessionError> {
        self.require(SessionPhase::Active, "edit a set")?;

        let slot = self
            .exercise_mut(exercise)?
            .sets
            .get_mut(index)
            .ok_or(SessionError::SetOutOfRange {
                exercise,
                set: index,
            })?;
        *slot = set;
        Ok(())
    }

    pub fn remove_set(&mut self, exercise: usize, index: usize) -> Result<SetRecord, SessionError> {
        self.require(SessionPhase::Active, "remove a set")?;

        let entry = self.exercise_mut(exercise)?;
        if index >= entry.sets.len() {
            return Err(SessionError::SetOutOfRange {
                exercise,
                set: index,
            });
        }
        Ok(entry.sets.remove(index))
    }

    /// 시작 이후 경과한 초. 시작 전이면 0
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        self.started_at
            .map(|start| (now - start).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }

    /// 경과 시간을 분으로 반올림한 기본 운동 시간 (최소 1분)
    pub fn default_duration_minutes(&self, now: DateTime<Utc>) -> u32 {
        let minutes = (self.elapsed_seconds(now) + 30) / 60;
        u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
    }

    /// active → finishing
    ///
    /// 세트가 하나 이상 있는 운동이 없으면 거부하고 상태를 바꾸지 않습니다.
    pub fn begin_finish(&mut self, now: DateTime<Utc>) -> Result<u32, SessionError> {
        self.require(SessionPhase::Active, "finish")?;

        if !self.exercises.iter().any(|entry| !entry.sets.is_empty()) {
            return Err(SessionError::NothingToFinish);
        }

        self.phase = SessionPhase::Finishing;
        Ok(self.default_duration_minutes(now))
    }

    /// finishing → active (시간 확인 모달을 닫은 경우)
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.require(SessionPhase::Finishing, "resume")?;
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// 저장할 세션 본문을 만듭니다. 상태는 바꾸지 않습니다.
    ///
    /// 저장이 성공한 뒤 `mark_persisted()`를 호출해야 합니다.
    /// 저장이 실패하면 Finishing 상태가 유지되어 다시 시도할 수 있습니다.
    pub fn build_aggregate(
        &self,
        duration_minutes: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<WorkoutData, SessionError> {
        self.require(SessionPhase::Finishing, "complete")?;

        let duration_minutes = match duration_minutes {
            Some(0) => return Err(SessionError::InvalidDuration),
            Some(minutes) => minutes,
            None => self.default_duration_minutes(now),
        };

        Ok(WorkoutData {
            total_volume: total_volume(&self.exercises),
            exercises: self.exercises.clone(),
            duration_minutes,
        })
    }

    /// finishing → persisted
    pub fn mark_persisted(&mut self) -> Result<(), SessionError> {
        self.require(SessionPhase::Finishing, "complete")?;
        self.phase = SessionPhase::Persisted;
        Ok(())
    }

    /// setup/active 상태에서 세션을 버립니다. 확인 절차나 복구는 없습니다.
    pub fn cancel(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Setup | SessionPhase::Active => Ok(()),
            phase => Err(SessionError::InvalidTransition {
                phase,
                action: "cancel",
            }),
        }
    }

    /// 화면용 스냅샷: 세트마다 추정 1RM과 PR 여부를 계산해 붙입니다.
    pub fn view(&self, now: DateTime<Utc>) -> SessionView {
        let exercises = self
            .exercises
            .iter()
            .map(|entry| ExerciseView {
                name: entry.name.clone(),
                is_superset: entry.is_superset,
                previous: entry.previous,
                sets_goal: entry.sets_goal,
                best_set_index: best_set(&entry.sets).map(|(index, _)| index),
                sets: entry
                    .sets
                    .iter()
                    .map(|set| SetView {
                        set: set.clone(),
                        estimated_one_rep_max: round_display(estimated_one_rep_max(
                            set.weight, set.reps,
                        )),
                        is_pr: is_personal_record(set, entry.previous.as_ref()),
                    })
                    .collect(),
            })
            .collect();

        let elapsed_seconds = self.elapsed_seconds(now);

        SessionView {
            id: self.id.clone(),
            phase: self.phase,
            muscle_group: self.muscle_group.clone(),
            started_at: self.started_at,
            elapsed_seconds,
            elapsed: format_elapsed(elapsed_seconds),
            total_volume: total_volume(&self.exercises),
            exercises,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input(weight: f64, reps: u32) -> SetInput {
        SetInput {
            weight: Some(weight),
            reps: Some(reps),
            ..Default::default()
        }
    }

    fn active_session(now: DateTime<Utc>) -> WorkoutSession {
        let mut session = WorkoutSession::new("s1", "athlete-1");
        session.start("Chest", Vec::new(), now).unwrap();
        session
    }

    #[test]
    fn start_requires_muscle_group() {
        let mut session = WorkoutSession::new("s1", "athlete-1");
        assert_eq!(
            session.start("   ", Vec::new(), Utc::now()),
            Err(SessionError::MissingMuscleGroup)
        );
        assert_eq!(session.phase, SessionPhase::Setup);
    }

    #[test]
    fn start_clears_superset_on_first_seeded_entry() {
        let mut seeded = ExerciseEntry::new("Bench Press", None);
        seeded.is_superset = true;

        let mut session = WorkoutSession::new("s1", "athlete-1");
        session.start(" Chest ", vec![seeded], Utc::now()).unwrap();

        assert_eq!(session.phase, SessionPhase::Active);
        assert_eq!(session.muscle_group, "Chest");
        assert!(!session.exercises[0].is_superset);
    }

    #[test]
    fn finishing_without_sets_is_rejected() {
        let now = Utc::now();
        let mut session = active_session(now);
        assert_eq!(session.begin_finish(now), Err(SessionError::NothingToFinish));

        session
            .add_exercise(ExerciseEntry::new("Bench Press", None))
            .unwrap();
        assert_eq!(session.begin_finish(now), Err(SessionError::NothingToFinish));
        assert_eq!(session.phase, SessionPhase::Active);

        session.add_set(0, build_set(input(100.0, 5)).unwrap()).unwrap();
        assert!(session.begin_finish(now).is_ok());
        assert_eq!(session.phase, SessionPhase::Finishing);
    }

    #[test]
    fn full_lifecycle_builds_aggregate() {
        let start = Utc::now();
        let mut session = active_session(start);
        session
            .add_exercise(ExerciseEntry::new("Squat", None))
            .unwrap();
        for reps in [10, 8, 6] {
            session.add_set(0, build_set(input(80.0, reps)).unwrap()).unwrap();
        }

        let later = start + Duration::seconds(47 * 60 + 40);
        assert_eq!(session.begin_finish(later), Ok(48));

        let data = session.build_aggregate(None, later).unwrap();
        assert_eq!(data.total_volume, 1920.0);
        assert_eq!(data.duration_minutes, 48);
        assert_eq!(session.phase, SessionPhase::Finishing);

        let confirmed = session.build_aggregate(Some(50), later).unwrap();
        assert_eq!(confirmed.duration_minutes, 50);
        assert_eq!(
            session.build_aggregate(Some(0), later),
            Err(SessionError::InvalidDuration)
        );

        session.mark_persisted().unwrap();
        assert_eq!(session.phase, SessionPhase::Persisted);
        assert!(session.cancel().is_err());
    }

    #[test]
    fn editing_is_locked_outside_active() {
        let now = Utc::now();
        let mut session = WorkoutSession::new("s1", "athlete-1");
        assert!(matches!(
            session.add_exercise(ExerciseEntry::new("Row", None)),
            Err(SessionError::InvalidTransition { .. })
        ));

        session.start("Back", Vec::new(), now).unwrap();
        session.add_exercise(ExerciseEntry::new("Row", None)).unwrap();
        session.add_set(0, build_set(input(60.0, 10)).unwrap()).unwrap();
        session.begin_finish(now).unwrap();

        assert!(matches!(
            session.add_set(0, build_set(input(60.0, 10)).unwrap()),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(session.cancel().is_err());

        session.resume().unwrap();
        assert_eq!(session.add_set(0, build_set(input(60.0, 8)).unwrap()), Ok(1));
        assert!(session.cancel().is_ok());
    }

    #[test]
    fn superset_never_on_first_entry() {
        let now = Utc::now();
        let mut session = active_session(now);

        let mut first = ExerciseEntry::new("Bench Press", None);
        first.is_superset = true;
        assert_eq!(
            session.add_exercise(first),
            Err(SessionError::SupersetWithoutPredecessor)
        );

        session.add_exercise(ExerciseEntry::new("Bench Press", None)).unwrap();
        session.add_exercise(ExerciseEntry::new("Fly", None)).unwrap();
        assert_eq!(
            session.set_superset(0, true),
            Err(SessionError::SupersetWithoutPredecessor)
        );
        session.set_superset(1, true).unwrap();

        // 슈퍼세트 항목을 맨 위로 올리면 플래그가 해제됩니다.
        assert_eq!(session.move_exercise(1, MoveDirection::Up), Ok(0));
        assert!(!session.exercises[0].is_superset);

        session.set_superset(1, true).unwrap();
        session.remove_exercise(0).unwrap();
        assert_eq!(session.exercises[0].name, "Bench Press");
        assert!(!session.exercises[0].is_superset);
    }

    #[test]
    fn move_is_adjacent_only() {
        let now = Utc::now();
        let mut session = active_session(now);
        for name in ["A", "B", "C"] {
            session.add_exercise(ExerciseEntry::new(name, None)).unwrap();
        }

        assert_eq!(session.move_exercise(0, MoveDirection::Up), Err(SessionError::CannotMove(0)));
        assert_eq!(session.move_exercise(2, MoveDirection::Down), Err(SessionError::CannotMove(2)));
        assert_eq!(session.move_exercise(0, MoveDirection::Down), Ok(1));

        let names: Vec<&str> = session.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn sets_are_replaced_and_removed_by_index() {
        let now = Utc::now();
        let mut session = active_session(now);
        session.add_exercise(ExerciseEntry::new("Curl", None)).unwrap();
        session.add_set(0, build_set(input(15.0, 12)).unwrap()).unwrap();
        session.add_set(0, build_set(input(15.0, 10)).unwrap()).unwrap();

        session.replace_set(0, 1, build_set(input(17.5, 8)).unwrap()).unwrap();
        assert_eq!(session.exercises[0].sets[1].weight, 17.5);

        let removed = session.remove_set(0, 0).unwrap();
        assert_eq!(removed.reps, 12);
        assert_eq!(session.exercises[0].sets.len(), 1);

        assert_eq!(
            session.remove_set(0, 5),
            Err(SessionError::SetOutOfRange { exercise: 0, set: 5 })
        );
        assert_eq!(
            session.add_set(3, build_set(input(10.0, 10)).unwrap()),
            Err(SessionError::ExerciseOutOfRange(3))
        );
    }

    #[test]
    fn view_flags_records_against_previous_target() {
        let now = Utc::now();
        let mut session = active_session(now);
        let previous = Target {
            weight: 100.0,
            reps: 5,
        };
        session
            .add_exercise(ExerciseEntry::new("Bench Press", Some(previous)))
            .unwrap();
        for (weight, reps) in [(100.0, 5), (100.0, 6), (95.0, 8)] {
            session.add_set(0, build_set(input(weight, reps)).unwrap()).unwrap();
        }

        let view = session.view(now + Duration::seconds(65));
        let flags: Vec<bool> = view.exercises[0].sets.iter().map(|s| s.is_pr).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(view.exercises[0].best_set_index, Some(2));
        assert_eq!(view.elapsed, "01:05");
        assert_eq!(view.total_volume, 500.0 + 600.0 + 760.0);
    }

    #[test]
    fn weight_and_reps_are_required() {
        let no_weight = SetInput {
            weight: None,
            ..input(0.0, 5)
        };
        assert_eq!(
            build_set(no_weight),
            Err(SessionError::InvalidSet("weight is required".to_string()))
        );

        let no_reps = SetInput {
            reps: None,
            ..input(100.0, 0)
        };
        assert_eq!(
            build_set(no_reps),
            Err(SessionError::InvalidSet("reps is required".to_string()))
        );
    }

    #[test]
    fn zero_set_needs_a_technique() {
        assert!(matches!(build_set(input(0.0, 0)), Err(SessionError::InvalidSet(_))));
        assert!(matches!(build_set(input(-5.0, 5)), Err(SessionError::InvalidSet(_))));

        let hold = build_set(SetInput {
            techniques: vec![Technique::Static],
            technique_counts: [(Technique::Static, 30)].into_iter().collect(),
            ..input(0.0, 0)
        })
        .unwrap();
        assert_eq!(hold.technique_counts.get(&Technique::Static), Some(&30));

        let bodyweight = build_set(input(0.0, 12)).unwrap();
        assert_eq!(bodyweight.reps, 12);
    }

    #[test]
    fn build_set_normalizes_input() {
        let set = build_set(SetInput {
            tempo: Some("  ".to_string()),
            rest_minutes: Some(1.5),
            techniques: vec![Technique::ForcedReps, Technique::DropSet],
            technique_counts: [
                (Technique::ForcedReps, 2),
                (Technique::DropSet, 4),
                (Technique::Partial, 3),
            ]
            .into_iter()
            .collect(),
            extensions: vec![
                SetExtension::DropSet {
                    weight: 70.0,
                    reps: 8,
                },
                SetExtension::RestPause {
                    rest_time: 15,
                    reps: 3,
                },
                SetExtension::DropSet {
                    weight: 60.0,
                    reps: 10,
                },
            ],
            ..input(90.0, 8)
        })
        .unwrap();

        assert_eq!(set.tempo, DEFAULT_TEMPO);
        assert_eq!(set.rest_seconds, Some(90));
        assert_eq!(set.technique_counts.len(), 1);
        assert_eq!(set.technique_counts.get(&Technique::ForcedReps), Some(&2));
        assert_eq!(
            set.extensions,
            vec![
                SetExtension::DropSet {
                    weight: 60.0,
                    reps: 10
                },
                SetExtension::RestPause {
                    rest_time: 15,
                    reps: 3
                },
            ]
        );
    }
}
