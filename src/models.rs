use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, Equipment, Goal, GoalTag, Level, MuscleGroup};

/// A catalog entry. Immutable once created; user-created exercises are
/// appended to the same catalog with `is_custom = true` and participate in
/// suggestion ranking identically to seeded ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub equipment: Equipment,
    pub difficulty: Difficulty,
    pub goal_tags: Vec<GoalTag>,
    pub rep_hint_min: Option<u32>,
    pub rep_hint_max: Option<u32>,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}

/// The single per-device profile. Created at onboarding, mutated after
/// every finished workout, destroyed only by a full data reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub level: Level,
    pub goal: Goal,
    pub quiz_score: u32,
    pub streak_weeks: u32,
    pub streak_freeze_used: bool,
    pub first_pr_celebrated: bool,
    pub last_workout_date: Option<DateTime<Utc>>,
    pub total_workouts: u32,
    pub created_at: DateTime<Utc>,
}

/// A persisted workout. `finished_at` is `None` while the session is
/// active; duration is finalized at finish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub date: DateTime<Utc>,
    pub muscle_groups: Vec<MuscleGroup>,
    pub duration_min: u32,
    pub notes: String,
    pub profile_id: String,
    pub finished_at: Option<DateTime<Utc>>,
}

/// One logged set. The difficulty rating stays `None` until the user rates
/// the exercise, and only ever lands on its most recent set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedSet {
    pub id: String,
    pub workout_id: String,
    pub exercise_id: String,
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
    pub difficulty_rating: Option<u8>,
}

/// Append-only personal-record snapshot. The "current PR" for an exercise
/// is the record with the highest max weight, ties broken by latest date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: String,
    pub exercise_id: String,
    pub date: DateTime<Utc>,
    pub max_weight: f64,
    pub max_reps: u32,
    pub total_volume: f64,
    pub estimated_1rm: f64,
}

/// An exercise inside the live workout screen, with the sets logged so far.
#[derive(Debug, Clone)]
pub struct ActiveExercise {
    pub exercise: Exercise,
    pub sets: Vec<LoggedSet>,
}

impl ActiveExercise {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            sets: Vec::new(),
        }
    }

    pub fn next_set_number(&self) -> u32 {
        self.sets.len() as u32 + 1
    }

    /// The rater only appears once an exercise has at least two sets.
    pub fn can_rate(&self) -> bool {
        self.sets.len() >= 2
    }
}

/// In-memory mirror of the active session. Rebuilt from the store on each
/// invocation, discarded at finish or abandon.
#[derive(Debug, Clone)]
pub struct ActiveWorkout {
    pub workout: Workout,
    pub exercises: Vec<ActiveExercise>,
}

impl ActiveWorkout {
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    pub fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut ActiveExercise> {
        self.exercises
            .iter_mut()
            .find(|e| e.exercise.id == exercise_id)
    }
}

/// Target rep band for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepRange {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

/// What to try next session, derived from a subjective difficulty rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionSuggestion {
    pub kind: ProgressionKind,
    pub suggested_weight: f64,
    pub suggested_reps: u32,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionKind {
    IncreaseWeight,
    IncreaseSlightly,
    Maintain,
    MaintainRecover,
    Decrease,
}

/// TOML import format: a file of `[[exercise]]` tables.
#[derive(Deserialize)]
pub struct ExerciseImport {
    pub exercise: Vec<ExerciseDef>,
}

#[derive(Deserialize)]
pub struct ExerciseDef {
    pub name: String,
    pub muscle_group: String,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub goal_tags: Vec<String>,
    #[serde(default)]
    pub rep_hint_min: Option<u32>,
    #[serde(default)]
    pub rep_hint_max: Option<u32>,
}
