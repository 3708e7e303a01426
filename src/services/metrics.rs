//! # 운동 지표 계산
//!
//! 세션 화면과 저장 시점에 쓰는 순수 함수들입니다 (부작용 없음).
//!
//! - `total_volume()`: Σ(무게 × 반복), 모든 운동의 모든 세트
//! - `estimated_one_rep_max()`: Epley 공식으로 1RM 추정
//! - `best_set()`: 추정 1RM이 가장 높은 세트 선택
//! - `is_personal_record()`: 이전 목표 대비 PR 여부
//! - `format_elapsed()`: 경과 시간 표시 문자열
//! - `summarize()`: 운동 후 요약

use crate::models::*;

/// Epley 공식의 분모: 1RM = weight × (1 + reps / 30)
const EPLEY_DIVISOR: f64 = 30.0;

/// 세트 하나의 볼륨 (무게 × 반복)
///
/// 연장(드롭 세트, 레스트 포즈)의 무게/반복은 포함하지 않습니다.
/// 한쪽 수행(unilateral) 세트도 한 번만 계산합니다.
pub fn set_volume(set: &SetRecord) -> f64 {
    // f64::from(u32): 손실 없는 정수 → 실수 변환
    set.weight * f64::from(set.reps)
}

pub fn exercise_volume(entry: &ExerciseEntry) -> f64 {
    entry.sets.iter().map(set_volume).sum()
}

/// 세션 전체 볼륨
///
/// # 예시
/// 세트 `[{80,10},{80,8},{80,6}]` → 800 + 640 + 480 = 1920
pub fn total_volume(exercises: &[ExerciseEntry]) -> f64 {
    exercises.iter().map(exercise_volume).sum()
}

/// 무게와 반복 횟수로 1회 최대 중량(1RM)을 추정합니다.
///
/// 무게가 같으면 반복이 많을수록, 반복이 같으면 무게가 무거울수록
/// 값이 엄격하게 커집니다 (무게 > 0 기준).
pub fn estimated_one_rep_max(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + f64::from(reps) / EPLEY_DIVISOR)
}

/// 표시용 반올림 (소수점 첫째 자리)
pub fn round_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 추정 1RM 기준으로 최고 세트를 고릅니다.
///
/// 원시 무게가 아니라 1RM으로 비교하므로, 가벼운 무게로 반복을 많이 한 세트가
/// 무거운 저반복 세트보다 선택될 수 있습니다. 동점이면 앞선 세트를 유지합니다.
///
/// 세트가 없으면 None을 반환합니다 (빈 목록에서 패닉하지 않음).
pub fn best_set(sets: &[SetRecord]) -> Option<(usize, &SetRecord)> {
    let mut best: Option<(usize, &SetRecord, f64)> = None;

    for (index, set) in sets.iter().enumerate() {
        let e1rm = estimated_one_rep_max(set.weight, set.reps);
        match best {
            Some((_, _, current)) if e1rm <= current => {}
            _ => best = Some((index, set, e1rm)),
        }
    }

    best.map(|(index, set, _)| (index, set))
}

/// 세트가 이전 목표를 넘어섰는지 판단합니다.
///
/// (무게, 반복)의 사전식(lexicographic) 비교입니다:
/// - 무게가 더 무거우면 PR
/// - 무게가 같고 반복이 더 많으면 PR
/// - 그 외(무게가 가벼우면 반복과 무관하게)는 PR 아님
///
/// 비교 대상은 저장된 `previous` 목표뿐이고, 같은 세션의 다른 세트와는 비교하지 않습니다.
/// 목표가 없으면(첫 세션) 어떤 세트도 PR로 표시하지 않습니다.
pub fn is_personal_record(set: &SetRecord, previous: Option<&Target>) -> bool {
    match previous {
        Some(target) => {
            set.weight > target.weight || (set.weight == target.weight && set.reps > target.reps)
        }
        None => false,
    }
}

/// 경과 초를 "MM:SS"(1시간 미만) 또는 "HH:MM:SS"로 변환합니다.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// 저장된 세션 본문으로 운동 후 요약을 만듭니다.
///
/// `total_volume`은 다시 계산하지 않고 캐시된 값을 그대로 씁니다.
pub fn summarize(data: &WorkoutData) -> WorkoutSummary {
    let personal_records = data
        .exercises
        .iter()
        .map(|entry| {
            entry
                .sets
                .iter()
                .filter(|set| is_personal_record(set, entry.previous.as_ref()))
                .count()
        })
        .sum();

    // filter_map: best_set이 None(세트 없음)인 항목은 건너뜁니다.
    let best_sets = data
        .exercises
        .iter()
        .filter_map(|entry| {
            best_set(&entry.sets).map(|(_, set)| ExerciseBest {
                name: entry.name.clone(),
                weight: set.weight,
                reps: set.reps,
                estimated_one_rep_max: round_display(estimated_one_rep_max(set.weight, set.reps)),
            })
        })
        .collect();

    WorkoutSummary {
        total_volume: data.total_volume,
        duration_minutes: data.duration_minutes,
        exercise_count: data.exercises.len(),
        set_count: data.exercises.iter().map(|e| e.sets.len()).sum(),
        personal_records,
        best_sets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn entry(name: &str, sets: Vec<SetRecord>, previous: Option<Target>) -> ExerciseEntry {
        ExerciseEntry {
            sets,
            ..ExerciseEntry::new(name, previous)
        }
    }

    #[test]
    fn total_volume_sums_weight_times_reps() {
        let exercises = vec![entry(
            "Squat",
            vec![set(80.0, 10), set(80.0, 8), set(80.0, 6)],
            None,
        )];
        assert_eq!(total_volume(&exercises), 1920.0);
    }

    #[test]
    fn total_volume_spans_every_exercise() {
        let exercises = vec![
            entry("Bench Press", vec![set(100.0, 5)], None),
            entry("Row", vec![set(60.0, 10), set(60.0, 10)], None),
        ];
        assert_eq!(total_volume(&exercises), 500.0 + 1200.0);
    }

    #[test]
    fn extensions_do_not_add_volume() {
        let mut drop = set(100.0, 8);
        drop.techniques.insert(Technique::DropSet);
        drop.extensions.push(SetExtension::DropSet {
            weight: 70.0,
            reps: 10,
        });
        drop.is_unilateral = true;

        assert_eq!(set_volume(&drop), 800.0);
    }

    #[test]
    fn missing_weight_or_reps_counts_as_zero() {
        let stored: SetRecord = serde_json::from_str(r#"{ "reps": 12 }"#).unwrap();
        assert_eq!(stored.weight, 0.0);
        assert_eq!(stored.tempo, DEFAULT_TEMPO);
        assert_eq!(set_volume(&stored), 0.0);
    }

    #[test]
    fn one_rep_max_follows_epley() {
        assert_eq!(estimated_one_rep_max(100.0, 0), 100.0);
        assert_eq!(round_display(estimated_one_rep_max(100.0, 5)), 116.7);
        assert_eq!(estimated_one_rep_max(90.0, 30), 180.0);
    }

    #[test]
    fn one_rep_max_is_strictly_increasing() {
        for reps in 0..20 {
            assert!(estimated_one_rep_max(60.0, reps + 1) > estimated_one_rep_max(60.0, reps));
        }
        let mut weight = 2.5;
        while weight < 300.0 {
            assert!(estimated_one_rep_max(weight + 2.5, 8) > estimated_one_rep_max(weight, 8));
            weight += 2.5;
        }
    }

    #[test]
    fn best_set_compares_estimated_max_not_weight() {
        let sets = vec![set(100.0, 3), set(85.0, 12)];
        // 100×(1+3/30)=110, 85×(1+12/30)=119
        let (index, best) = best_set(&sets).unwrap();
        assert_eq!(index, 1);
        assert_eq!(best.weight, 85.0);
    }

    #[test]
    fn best_set_keeps_first_on_tie() {
        let sets = vec![set(100.0, 5), set(100.0, 5)];
        assert_eq!(best_set(&sets).map(|(i, _)| i), Some(0));
        assert!(best_set(&[]).is_none());
    }

    #[test]
    fn personal_record_is_lexicographic() {
        let previous = Target {
            weight: 100.0,
            reps: 5,
        };
        assert!(is_personal_record(&set(102.5, 1), Some(&previous)));
        assert!(is_personal_record(&set(100.0, 6), Some(&previous)));
        assert!(!is_personal_record(&set(100.0, 5), Some(&previous)));
        assert!(!is_personal_record(&set(100.0, 4), Some(&previous)));
        assert!(!is_personal_record(&set(95.0, 20), Some(&previous)));
        assert!(!is_personal_record(&set(200.0, 1), None));
    }

    #[test]
    fn later_lighter_set_is_not_a_record_even_with_higher_estimate() {
        let previous = Target {
            weight: 100.0,
            reps: 5,
        };
        let logged = [set(100.0, 5), set(100.0, 6), set(95.0, 8)];
        let flags: Vec<bool> = logged
            .iter()
            .map(|s| is_personal_record(s, Some(&previous)))
            .collect();

        assert_eq!(flags, vec![false, true, false]);
        assert!(
            estimated_one_rep_max(95.0, 8) > estimated_one_rep_max(100.0, 5),
            "the third set estimates higher than the first one"
        );
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(3599), "59:59");
        assert_eq!(format_elapsed(3600), "01:00:00");
        assert_eq!(format_elapsed(5025), "01:23:45");
    }

    #[test]
    fn summary_counts_records_and_best_sets() {
        let previous = Some(Target {
            weight: 100.0,
            reps: 5,
        });
        let exercises = vec![
            entry("Bench Press", vec![set(100.0, 6), set(105.0, 3)], previous),
            entry("Curl", Vec::new(), None),
        ];
        let data = WorkoutData {
            total_volume: total_volume(&exercises),
            duration_minutes: 45,
            exercises,
        };

        let summary = summarize(&data);
        assert_eq!(summary.personal_records, 2);
        assert_eq!(summary.exercise_count, 2);
        assert_eq!(summary.set_count, 2);
        assert_eq!(summary.total_volume, 915.0);
        assert_eq!(summary.best_sets.len(), 1);
        assert_eq!(summary.best_sets[0].weight, 100.0);
    }
}
