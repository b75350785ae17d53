use std::collections::HashSet;

use itertools::Itertools;

use crate::models::{Exercise, ProgressionKind, ProgressionSuggestion, RepRange};
use crate::types::{Goal, GoalTag, Level, MuscleGroup};

/// How many exercises a session suggests per level.
pub fn exercise_count(level: Level) -> usize {
    match level {
        Level::Beginner => 3,
        Level::Intermediate => 4,
        Level::Advanced => 5,
    }
}

/// Default number of sets per exercise per level.
pub fn default_set_count(level: Level) -> u32 {
    match level {
        Level::Beginner => 3,
        Level::Intermediate | Level::Advanced => 4,
    }
}

/// Rest-time default between sets, in seconds, keyed by goal.
pub fn default_rest_seconds(goal: Goal) -> u32 {
    match goal.tag() {
        GoalTag::FatLoss => 45,
        GoalTag::Hypertrophy => 75,
        GoalTag::Strength => 150,
        GoalTag::General => 60,
        GoalTag::Endurance => 35,
    }
}

/// Target rep band per goal.
pub fn rep_range(goal: Goal) -> RepRange {
    match goal.tag() {
        GoalTag::FatLoss => RepRange { min: 12, max: 15, default: 12 },
        GoalTag::Hypertrophy => RepRange { min: 8, max: 12, default: 10 },
        GoalTag::Strength => RepRange { min: 3, max: 5, default: 5 },
        GoalTag::General => RepRange { min: 8, max: 12, default: 10 },
        GoalTag::Endurance => RepRange { min: 15, max: 20, default: 15 },
    }
}

/// Picks the exercises to suggest for a session. Deterministic and pure.
///
/// Ranking is one composite comparator rather than repeated re-sorts, so
/// the stability guarantees hold regardless of the sort algorithm:
/// 1. for beginners, easier equipment first (bodyweight → machine → cable
///    → dumbbells → barbell);
/// 2. exercises used in the recent workouts rank behind fresh ones
///    (deprioritized, never excluded);
/// 3. exercises tagged for the user's goal rank ahead;
/// 4. catalog order breaks remaining ties.
///
/// Result is capped at `exercise_count(level)` with duplicate names
/// collapsed to their first occurrence. An empty result is a valid
/// outcome when nothing matches the muscle-group/difficulty filter.
pub fn suggest_exercises(
    catalog: &[Exercise],
    muscle_groups: &[MuscleGroup],
    level: Level,
    goal: Goal,
    recent_exercise_ids: &[String],
) -> Vec<Exercise> {
    let recent: HashSet<&str> = recent_exercise_ids.iter().map(String::as_str).collect();
    let goal_tag = goal.tag();

    let mut pool: Vec<&Exercise> = catalog
        .iter()
        .filter(|e| muscle_groups.contains(&e.muscle_group))
        .filter(|e| level.allows(e.difficulty))
        .collect();

    pool.sort_by_key(|e| {
        let equipment_tier = if level == Level::Beginner {
            e.equipment.beginner_tier()
        } else {
            0
        };
        let is_recent = recent.contains(e.id.as_str());
        let misses_goal = !e.goal_tags.contains(&goal_tag);
        (equipment_tier, is_recent, misses_goal)
    });

    pool.into_iter()
        .unique_by(|e| e.name.clone())
        .take(exercise_count(level))
        .cloned()
        .collect()
}

/// Maps a subjective difficulty rating (1–5) to next session's weight and
/// reps. The deltas are fixed; the message is cosmetic. Unknown ratings
/// fall back to "maintain".
pub fn progression_suggestion(
    rating: Option<u8>,
    current_weight: f64,
    current_reps: u32,
) -> ProgressionSuggestion {
    match rating {
        Some(1) => ProgressionSuggestion {
            kind: ProgressionKind::IncreaseWeight,
            suggested_weight: current_weight + 2.5,
            suggested_reps: current_reps,
            message: "That was easy! Try adding 2.5kg next time.",
        },
        Some(2) => ProgressionSuggestion {
            kind: ProgressionKind::IncreaseSlightly,
            suggested_weight: current_weight + 1.25,
            suggested_reps: current_reps + 1,
            message: "Nice work! Try adding 1.25kg or 1 more rep next session.",
        },
        Some(3) => ProgressionSuggestion {
            kind: ProgressionKind::Maintain,
            suggested_weight: current_weight,
            suggested_reps: current_reps,
            message: "Perfect challenge level. Keep this up!",
        },
        Some(4) => ProgressionSuggestion {
            kind: ProgressionKind::MaintainRecover,
            suggested_weight: current_weight,
            suggested_reps: current_reps,
            message: "Tough session builds character. Same weight next time, you'll crush it.",
        },
        Some(5) => ProgressionSuggestion {
            kind: ProgressionKind::Decrease,
            suggested_weight: current_weight,
            suggested_reps: current_reps.saturating_sub(1).max(1),
            message: "Maximum effort! Consider slightly fewer reps or more rest next time.",
        },
        _ => ProgressionSuggestion {
            kind: ProgressionKind::Maintain,
            suggested_weight: current_weight,
            suggested_reps: current_reps,
            message: "",
        },
    }
}

/// Brzycki one-rep-max estimate, rounded to one decimal.
pub fn estimate_1rm(weight: f64, reps: u32) -> f64 {
    if weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    (weight * (36.0 / (37.0 - reps as f64)) * 10.0).round() / 10.0
}

/// Total tonnage of a slice of (weight, reps) pairs.
pub fn calculate_volume(sets: &[(f64, u32)]) -> f64 {
    sets.iter().map(|(w, r)| w * *r as f64).sum()
}

pub const SET_LOGGED_MESSAGES: &[&str] = &[
    "Set logged. You're stronger than yesterday.",
    "Nice one! Keep it up!",
    "That's the way! One set closer to your goals.",
    "Crushed it! Ready for the next one?",
    "Every set counts. You're doing amazing.",
];

pub const WORKOUT_COMPLETE_MESSAGES: &[&str] = &[
    "Workout complete! You showed up and that's what matters.",
    "Another session in the books. Be proud!",
    "Done! Your future self thanks you.",
    "Great work today. Rest, recover, repeat.",
];

pub const PR_ACHIEVED_MESSAGES: &[&str] = &[
    "NEW PERSONAL RECORD! You're officially stronger!",
    "PR ALERT! Look at you go!",
    "New record! The progress is real!",
];

/// Rotates through a message pool by seed. Cosmetic only.
pub fn encouraging_message(pool: &'static [&'static str], seed: usize) -> &'static str {
    pool[seed % pool.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Difficulty, Equipment, GoalTag};
    use chrono::Utc;

    fn ex(
        id: &str,
        name: &str,
        mg: MuscleGroup,
        equipment: Equipment,
        difficulty: Difficulty,
        tags: &[GoalTag],
    ) -> Exercise {
        Exercise {
            id: id.to_string(),
            name: name.to_string(),
            muscle_group: mg,
            equipment,
            difficulty,
            goal_tags: tags.to_vec(),
            rep_hint_min: None,
            rep_hint_max: None,
            is_custom: false,
            created_at: Utc::now(),
        }
    }

    fn chest_catalog() -> Vec<Exercise> {
        vec![
            ex("1", "Push-Up", MuscleGroup::Chest, Equipment::Bodyweight, Difficulty::Beginner, &[GoalTag::General]),
            ex("2", "Machine Press", MuscleGroup::Chest, Equipment::Machine, Difficulty::Beginner, &[GoalTag::Hypertrophy]),
            ex("3", "Incline Push-Up", MuscleGroup::Chest, Equipment::Bodyweight, Difficulty::Beginner, &[GoalTag::Hypertrophy]),
            ex("4", "Weighted Dip", MuscleGroup::Chest, Equipment::Bodyweight, Difficulty::Advanced, &[GoalTag::Strength]),
            ex("5", "Bench Press", MuscleGroup::Chest, Equipment::Barbell, Difficulty::Advanced, &[GoalTag::Strength]),
        ]
    }

    #[test]
    fn beginner_gets_three_beginner_chest_exercises_goal_tagged_first() {
        // Catalog: 5 chest exercises, 3 beginner, 2 advanced, none recent.
        let catalog = chest_catalog();
        let out = suggest_exercises(
            &catalog,
            &[MuscleGroup::Chest],
            Difficulty::Beginner,
            Goal::BuildMuscle,
            &[],
        );

        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|e| e.difficulty == Difficulty::Beginner));
        // Among the bodyweight pair, the hypertrophy-tagged one leads.
        let bodyweight: Vec<_> = out
            .iter()
            .filter(|e| e.equipment == Equipment::Bodyweight)
            .collect();
        assert_eq!(bodyweight[0].name, "Incline Push-Up");
    }

    #[test]
    fn beginner_equipment_preference_dominates() {
        let catalog = vec![
            ex("1", "Barbell Curl", MuscleGroup::Biceps, Equipment::Barbell, Difficulty::Beginner, &[GoalTag::Hypertrophy]),
            ex("2", "Band Curl", MuscleGroup::Biceps, Equipment::ResistanceBand, Difficulty::Beginner, &[]),
            ex("3", "Machine Curl", MuscleGroup::Biceps, Equipment::Machine, Difficulty::Beginner, &[]),
        ];
        let out = suggest_exercises(
            &catalog,
            &[MuscleGroup::Biceps],
            Difficulty::Beginner,
            Goal::BuildMuscle,
            &[],
        );

        // Machine (tier 1) beats band (tier 3) beats barbell (tier 4),
        // even though the barbell one matches the goal.
        let names: Vec<_> = out.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Machine Curl", "Band Curl", "Barbell Curl"]);
    }

    #[test]
    fn recent_exercises_rank_behind_but_are_not_excluded() {
        // Intermediate level so the equipment pass stays out of the way.
        let catalog = chest_catalog();
        let recent = vec!["3".to_string()];
        let out = suggest_exercises(
            &catalog,
            &[MuscleGroup::Chest],
            Difficulty::Intermediate,
            Goal::BuildMuscle,
            &recent,
        );

        assert_eq!(out.len(), 3);
        // The recently used hypertrophy push-up drops to the back.
        assert_eq!(out.last().map(|e| e.id.as_str()), Some("3"));
        assert_eq!(out[0].id, "2");
    }

    #[test]
    fn advanced_pool_includes_all_difficulties_and_caps_at_five() {
        let mut catalog = chest_catalog();
        catalog.push(ex("6", "Cable Fly", MuscleGroup::Chest, Equipment::Cable, Difficulty::Intermediate, &[GoalTag::Hypertrophy]));
        catalog.push(ex("7", "Decline Press", MuscleGroup::Chest, Equipment::Machine, Difficulty::Intermediate, &[]));

        let out = suggest_exercises(
            &catalog,
            &[MuscleGroup::Chest],
            Difficulty::Advanced,
            Goal::GetStrong,
            &[],
        );

        assert_eq!(out.len(), 5);
        // Strength-tagged exercises lead for a non-beginner.
        assert!(out[0].goal_tags.contains(&GoalTag::Strength));
        assert!(out[1].goal_tags.contains(&GoalTag::Strength));
    }

    #[test]
    fn duplicate_names_collapse_to_first_occurrence() {
        let catalog = vec![
            ex("1", "Push-Up", MuscleGroup::Chest, Equipment::Bodyweight, Difficulty::Beginner, &[GoalTag::Hypertrophy]),
            ex("2", "Push-Up", MuscleGroup::Chest, Equipment::Bodyweight, Difficulty::Beginner, &[]),
            ex("3", "Crunch", MuscleGroup::Core, Equipment::Bodyweight, Difficulty::Beginner, &[]),
        ];
        let out = suggest_exercises(
            &catalog,
            &[MuscleGroup::Chest, MuscleGroup::Core],
            Difficulty::Beginner,
            Goal::BuildMuscle,
            &[],
        );

        let names: Vec<_> = out.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Push-Up", "Crunch"]);
        assert_eq!(out[0].id, "1");
    }

    #[test]
    fn no_match_yields_empty_not_error() {
        let catalog = chest_catalog();
        let out = suggest_exercises(
            &catalog,
            &[MuscleGroup::Calves],
            Difficulty::Advanced,
            Goal::GeneralFitness,
            &[],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn rest_time_defaults_per_goal() {
        assert_eq!(default_rest_seconds(Goal::FatLoss), 45);
        assert_eq!(default_rest_seconds(Goal::BuildMuscle), 75);
        assert_eq!(default_rest_seconds(Goal::GetStrong), 150);
        assert_eq!(default_rest_seconds(Goal::GeneralFitness), 60);
        assert_eq!(default_rest_seconds(Goal::BuildEndurance), 35);
    }

    #[test]
    fn rep_ranges_per_goal() {
        assert_eq!(rep_range(Goal::FatLoss), RepRange { min: 12, max: 15, default: 12 });
        assert_eq!(rep_range(Goal::BuildMuscle), RepRange { min: 8, max: 12, default: 10 });
        assert_eq!(rep_range(Goal::GetStrong), RepRange { min: 3, max: 5, default: 5 });
        assert_eq!(rep_range(Goal::BuildEndurance), RepRange { min: 15, max: 20, default: 15 });
    }

    #[test]
    fn set_and_exercise_counts_per_level() {
        assert_eq!(default_set_count(Difficulty::Beginner), 3);
        assert_eq!(default_set_count(Difficulty::Intermediate), 4);
        assert_eq!(default_set_count(Difficulty::Advanced), 4);
        assert_eq!(exercise_count(Difficulty::Beginner), 3);
        assert_eq!(exercise_count(Difficulty::Intermediate), 4);
        assert_eq!(exercise_count(Difficulty::Advanced), 5);
    }

    #[test]
    fn progression_table_matches_design() {
        let s = progression_suggestion(Some(1), 50.0, 8);
        assert_eq!(s.kind, ProgressionKind::IncreaseWeight);
        assert_eq!(s.suggested_weight, 52.5);
        assert_eq!(s.suggested_reps, 8);

        let s = progression_suggestion(Some(2), 50.0, 8);
        assert_eq!(s.kind, ProgressionKind::IncreaseSlightly);
        assert_eq!(s.suggested_weight, 51.25);
        assert_eq!(s.suggested_reps, 9);

        let s = progression_suggestion(Some(3), 50.0, 8);
        assert_eq!(s.kind, ProgressionKind::Maintain);
        assert_eq!((s.suggested_weight, s.suggested_reps), (50.0, 8));

        let s = progression_suggestion(Some(4), 50.0, 8);
        assert_eq!(s.kind, ProgressionKind::MaintainRecover);
        assert_eq!((s.suggested_weight, s.suggested_reps), (50.0, 8));

        let s = progression_suggestion(Some(5), 50.0, 8);
        assert_eq!(s.kind, ProgressionKind::Decrease);
        assert_eq!((s.suggested_weight, s.suggested_reps), (50.0, 7));
    }

    #[test]
    fn decrease_floors_reps_at_one() {
        let s = progression_suggestion(Some(5), 20.0, 1);
        assert_eq!(s.suggested_reps, 1);
    }

    #[test]
    fn unknown_rating_maintains() {
        for rating in [None, Some(0), Some(6), Some(255)] {
            let s = progression_suggestion(rating, 42.0, 10);
            assert_eq!(s.kind, ProgressionKind::Maintain);
            assert_eq!((s.suggested_weight, s.suggested_reps), (42.0, 10));
        }
    }

    #[test]
    fn brzycki_estimate() {
        assert_eq!(estimate_1rm(100.0, 1), 100.0);
        assert_eq!(estimate_1rm(0.0, 10), 0.0);
        assert_eq!(estimate_1rm(50.0, 0), 0.0);
        // 80kg x 5 → 80 * 36/32 = 90.0
        assert_eq!(estimate_1rm(80.0, 5), 90.0);
    }

    #[test]
    fn volume_sums_weight_times_reps() {
        assert_eq!(calculate_volume(&[(40.0, 10), (50.0, 8)]), 800.0);
        assert_eq!(calculate_volume(&[]), 0.0);
    }
}
