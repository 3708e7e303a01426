//! # 진척도(progression) 목표 계산
//!
//! 과거 세션 이력에서 "넘어야 할 목표"를 찾습니다.
//!
//! ## 규칙
//! 1. 세션을 최신순으로 훑습니다 (호출하는 쪽이 최신순으로 넘겨줘야 함).
//! 2. 세션 안의 운동 항목 중 이름이 같은 것(대소문자/공백 무시)을 찾습니다.
//! 3. 세트가 하나도 없는 항목은 건너뜁니다.
//! 4. 처음 찾은 항목에서 추정 1RM이 가장 높은 세트를 목표로 삼고 멈춥니다.
//! 5. 끝까지 못 찾으면 None: 첫 세션이라는 뜻이며 에러가 아닙니다.

use crate::models::*;
use crate::services::metrics::{best_set, estimated_one_rep_max, round_display};

/// 이름 비교용 정규화: 앞뒤 공백 제거, 연속 공백 하나로, 소문자
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 운동 이름으로 최근 목표를 찾습니다.
///
/// `history`는 최신순이어야 합니다. 조회 범위(최근 N개 등)는 호출하는 쪽이 정합니다.
///
/// `impl IntoIterator<Item = &'a WorkoutData>`: Vec, 슬라이스, map 이터레이터 등
/// 무엇이든 받을 수 있는 제네릭 매개변수입니다.
pub fn resolve_target<'a>(
    history: impl IntoIterator<Item = &'a WorkoutData>,
    exercise_name: &str,
) -> Option<Target> {
    let wanted = normalize_name(exercise_name);

    // find_map: Some을 처음 반환하는 지점에서 순회를 멈춥니다.
    history.into_iter().find_map(|workout| {
        workout
            .exercises
            .iter()
            .filter(|entry| normalize_name(&entry.name) == wanted)
            .find_map(|entry| best_set(&entry.sets).map(|(_, set)| Target::from(set)))
    })
}

/// 같은 부위의 가장 최근 세션으로 새 세션의 운동 항목을 미리 채웁니다.
///
/// 이름과 슈퍼세트 구성만 가져오고 세트는 비워 둡니다.
/// 각 항목의 `previous`는 그 세션부터 과거 방향으로 찾은 목표입니다.
pub fn seed_from_history(history: &[WorkoutRecord], muscle_group: &str) -> Vec<ExerciseEntry> {
    let wanted = normalize_name(muscle_group);

    let Some(start) = history
        .iter()
        .position(|record| normalize_name(&record.muscle_group) == wanted)
    else {
        return Vec::new();
    };

    let latest = &history[start].data.0;
    let older = &history[start..];

    latest
        .exercises
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let previous = resolve_target(older.iter().map(|r| &r.data.0), &entry.name);
            ExerciseEntry {
                is_superset: index > 0 && entry.is_superset,
                ..ExerciseEntry::new(entry.name.clone(), previous)
            }
        })
        .collect()
}

/// 운동 하나의 세션별 최고 세트 추이를 만듭니다 (오래된 순).
///
/// `history`는 최신순으로 받고, 결과는 그래프에 그리기 좋게 오래된 순으로 뒤집습니다.
pub fn progression_trend(history: &[WorkoutRecord], exercise_name: &str) -> Vec<TrendPoint> {
    let wanted = normalize_name(exercise_name);

    let mut points: Vec<TrendPoint> = history
        .iter()
        .rev()
        .filter_map(|record| {
            let (_, set) = record
                .data
                .exercises
                .iter()
                .filter(|entry| normalize_name(&entry.name) == wanted)
                .find_map(|entry| best_set(&entry.sets))?;

            Some(TrendPoint {
                workout_id: record.id.clone(),
                workout_date: record.workout_date.clone(),
                weight: set.weight,
                reps: set.reps,
                estimated_one_rep_max: round_display(estimated_one_rep_max(set.weight, set.reps)),
                delta: None,
            })
        })
        .collect();

    for i in 1..points.len() {
        let change = points[i].estimated_one_rep_max - points[i - 1].estimated_one_rep_max;
        points[i].delta = Some(round_display(change));
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn set(weight: f64, reps: u32) -> SetRecord {
        SetRecord {
            weight,
            reps,
            tempo: DEFAULT_TEMPO.to_string(),
            rest_seconds: None,
            is_unilateral: false,
            techniques: Default::default(),
            technique_counts: Default::default(),
            extensions: Vec::new(),
        }
    }

    fn workout(id: &str, date: &str, muscle_group: &str, exercises: Vec<ExerciseEntry>) -> WorkoutRecord {
        WorkoutRecord {
            id: id.to_string(),
            user_id: "athlete-1".to_string(),
            log_type: "workout".to_string(),
            muscle_group: muscle_group.to_string(),
            workout_date: date.to_string(),
            data: Json(WorkoutData {
                exercises,
                total_volume: 0.0,
                duration_minutes: 60,
            }),
            discipline: None,
            created_at: date.to_string(),
        }
    }

    fn exercise(name: &str, sets: Vec<SetRecord>) -> ExerciseEntry {
        ExerciseEntry {
            sets,
            ..ExerciseEntry::new(name, None)
        }
    }

    #[test]
    fn unknown_exercise_has_no_target() {
        let history = vec![workout(
            "w1",
            "2026-03-01",
            "Chest",
            vec![exercise("Bench Press", vec![set(100.0, 5)])],
        )];
        let data: Vec<&WorkoutData> = history.iter().map(|w| &w.data.0).collect();

        assert_eq!(resolve_target(data.clone(), "Deadlift"), None);
        assert_eq!(resolve_target(Vec::<&WorkoutData>::new(), "Bench Press"), None);
    }

    #[test]
    fn newest_matching_session_wins_case_insensitively() {
        let history = vec![
            workout("w2", "2026-03-08", "Chest", vec![exercise("bench  press", vec![set(102.5, 4)])]),
            workout("w1", "2026-03-01", "Chest", vec![exercise("Bench Press", vec![set(110.0, 5)])]),
        ];

        let target = resolve_target(history.iter().map(|w| &w.data.0), " Bench Press ");
        assert_eq!(
            target,
            Some(Target {
                weight: 102.5,
                reps: 4
            })
        );
    }

    #[test]
    fn target_is_best_estimated_set_not_first_set() {
        let history = vec![workout(
            "w1",
            "2026-03-01",
            "Chest",
            vec![exercise(
                "Bench Press",
                vec![set(100.0, 3), set(90.0, 10), set(80.0, 12)],
            )],
        )];

        let target = resolve_target(history.iter().map(|w| &w.data.0), "Bench Press");
        assert_eq!(
            target,
            Some(Target {
                weight: 90.0,
                reps: 10
            })
        );
    }

    #[test]
    fn entries_without_sets_are_skipped() {
        let history = vec![
            workout("w2", "2026-03-08", "Chest", vec![exercise("Bench Press", Vec::new())]),
            workout("w1", "2026-03-01", "Chest", vec![exercise("Bench Press", vec![set(95.0, 6)])]),
        ];

        let target = resolve_target(history.iter().map(|w| &w.data.0), "Bench Press");
        assert_eq!(
            target,
            Some(Target {
                weight: 95.0,
                reps: 6
            })
        );
    }

    #[test]
    fn seeding_copies_latest_same_label_session() {
        let mut fly = exercise("Cable Fly", vec![set(20.0, 15)]);
        fly.is_superset = true;
        let history = vec![
            workout("w3", "2026-03-10", "Legs", vec![exercise("Squat", vec![set(140.0, 5)])]),
            workout(
                "w2",
                "2026-03-08",
                "chest",
                vec![exercise("Bench Press", Vec::new()), fly],
            ),
            workout("w1", "2026-03-01", "Chest", vec![exercise("Bench Press", vec![set(100.0, 5)])]),
        ];

        let seeded = seed_from_history(&history, "Chest");
        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].name, "Bench Press");
        assert!(seeded[0].sets.is_empty());
        assert!(!seeded[0].is_superset);
        assert_eq!(
            seeded[0].previous,
            Some(Target {
                weight: 100.0,
                reps: 5
            })
        );
        assert!(seeded[1].is_superset);
        assert_eq!(
            seeded[1].previous,
            Some(Target {
                weight: 20.0,
                reps: 15
            })
        );

        assert!(seed_from_history(&history, "Back").is_empty());
    }

    #[test]
    fn seeding_never_marks_first_entry_as_superset() {
        let mut first = exercise("Pullup", vec![set(0.0, 10)]);
        first.is_superset = true;
        let history = vec![workout("w1", "2026-03-01", "Back", vec![first])];

        let seeded = seed_from_history(&history, "Back");
        assert!(!seeded[0].is_superset);
    }

    #[test]
    fn trend_is_oldest_first_with_deltas() {
        let history = vec![
            workout("w3", "2026-03-15", "Chest", vec![exercise("Bench Press", vec![set(100.0, 6)])]),
            workout("w2", "2026-03-08", "Chest", vec![exercise("Fly", vec![set(20.0, 12)])]),
            workout("w1", "2026-03-01", "Chest", vec![exercise("Bench Press", vec![set(100.0, 3)])]),
        ];

        let trend = progression_trend(&history, "bench press");
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].workout_id, "w1");
        assert_eq!(trend[0].estimated_one_rep_max, 110.0);
        assert_eq!(trend[0].delta, None);
        assert_eq!(trend[1].workout_id, "w3");
        assert_eq!(trend[1].estimated_one_rep_max, 120.0);
        assert_eq!(trend[1].delta, Some(10.0));
    }
}
