use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use crate::models::Exercise;
use crate::storage::Store;
use crate::types::{Difficulty, Equipment, GoalTag, MuscleGroup};

/// (name, muscle group, equipment, difficulty, goal tags, rep hints)
type SeedRow = (
    &'static str,
    MuscleGroup,
    Equipment,
    Difficulty,
    &'static [GoalTag],
    Option<(u32, u32)>,
);

use Difficulty::{Advanced, Beginner, Intermediate};
use Equipment::{Barbell, Bodyweight, Cable, Dumbbells, Kettlebell, Machine, None as NoEquip, ResistanceBand};
use GoalTag::{Endurance, FatLoss, General, Hypertrophy, Strength};
use MuscleGroup::*;

const SEED: &[SeedRow] = &[
    // Chest
    ("Push-Up", Chest, Bodyweight, Beginner, &[General, Endurance, FatLoss], Some((8, 15))),
    ("Incline Push-Up", Chest, Bodyweight, Beginner, &[General, Endurance], Some((10, 15))),
    ("Machine Chest Press", Chest, Machine, Beginner, &[General, Hypertrophy], Some((8, 12))),
    ("Dumbbell Bench Press", Chest, Dumbbells, Intermediate, &[Hypertrophy, Strength], Some((6, 12))),
    ("Barbell Bench Press", Chest, Barbell, Intermediate, &[Strength, Hypertrophy], Some((3, 8))),
    ("Cable Fly", Chest, Cable, Intermediate, &[Hypertrophy], Some((10, 15))),
    ("Weighted Dip", Chest, Bodyweight, Advanced, &[Strength, Hypertrophy], Some((5, 10))),
    // Back
    ("Lat Pulldown", Back, Machine, Beginner, &[General, Hypertrophy], Some((8, 12))),
    ("Seated Cable Row", Back, Cable, Beginner, &[General, Hypertrophy], Some((8, 12))),
    ("Dumbbell Row", Back, Dumbbells, Intermediate, &[Hypertrophy, Strength], Some((6, 12))),
    ("Barbell Row", Back, Barbell, Intermediate, &[Strength, Hypertrophy], Some((5, 10))),
    ("Pull-Up", Back, Bodyweight, Advanced, &[Strength, Hypertrophy], Some((4, 10))),
    ("Deadlift", Back, Barbell, Advanced, &[Strength], Some((3, 6))),
    // Shoulders
    ("Band Shoulder Press", Shoulders, ResistanceBand, Beginner, &[General, Endurance], Some((10, 15))),
    ("Machine Shoulder Press", Shoulders, Machine, Beginner, &[General, Hypertrophy], Some((8, 12))),
    ("Dumbbell Lateral Raise", Shoulders, Dumbbells, Intermediate, &[Hypertrophy], Some((10, 15))),
    ("Overhead Press", Shoulders, Barbell, Advanced, &[Strength, Hypertrophy], Some((4, 8))),
    // Biceps
    ("Band Curl", Biceps, ResistanceBand, Beginner, &[General, Endurance], Some((12, 15))),
    ("Cable Curl", Biceps, Cable, Beginner, &[General, Hypertrophy], Some((10, 15))),
    ("Dumbbell Curl", Biceps, Dumbbells, Intermediate, &[Hypertrophy], Some((8, 12))),
    ("Barbell Curl", Biceps, Barbell, Intermediate, &[Hypertrophy, Strength], Some((6, 10))),
    // Triceps
    ("Bench Dip", Triceps, Bodyweight, Beginner, &[General, Endurance], Some((8, 15))),
    ("Cable Pushdown", Triceps, Cable, Beginner, &[General, Hypertrophy], Some((10, 15))),
    ("Overhead Dumbbell Extension", Triceps, Dumbbells, Intermediate, &[Hypertrophy], Some((8, 12))),
    ("Close-Grip Bench Press", Triceps, Barbell, Advanced, &[Strength, Hypertrophy], Some((5, 8))),
    // Legs
    ("Bodyweight Squat", Legs, Bodyweight, Beginner, &[General, Endurance, FatLoss], Some((12, 20))),
    ("Leg Press", Legs, Machine, Beginner, &[General, Hypertrophy], Some((8, 15))),
    ("Goblet Squat", Legs, Dumbbells, Intermediate, &[Hypertrophy, General], Some((8, 12))),
    ("Barbell Back Squat", Legs, Barbell, Advanced, &[Strength, Hypertrophy], Some((3, 8))),
    ("Walking Lunge", Legs, Dumbbells, Intermediate, &[Hypertrophy, FatLoss], Some((10, 16))),
    // Glutes / hamstrings
    ("Glute Bridge", Glutes, Bodyweight, Beginner, &[General, Endurance], Some((12, 20))),
    ("Hip Thrust", Glutes, Barbell, Intermediate, &[Hypertrophy, Strength], Some((8, 12))),
    ("Romanian Deadlift", Glutes, Barbell, Intermediate, &[Strength, Hypertrophy], Some((6, 10))),
    ("Kettlebell Swing", Glutes, Kettlebell, Intermediate, &[FatLoss, Endurance], Some((12, 20))),
    // Core
    ("Plank", Core, Bodyweight, Beginner, &[General, Endurance], None),
    ("Crunch", Core, Bodyweight, Beginner, &[General, Endurance, FatLoss], Some((12, 20))),
    ("Cable Woodchop", Core, Cable, Intermediate, &[General, FatLoss], Some((10, 15))),
    ("Hanging Leg Raise", Core, Bodyweight, Advanced, &[Strength, Hypertrophy], Some((6, 12))),
    // Calves
    ("Standing Calf Raise", Calves, Bodyweight, Beginner, &[General, Endurance], Some((15, 20))),
    ("Machine Calf Raise", Calves, Machine, Intermediate, &[Hypertrophy], Some((10, 15))),
    // Full body / cardio
    ("Burpee", FullBody, Bodyweight, Intermediate, &[FatLoss, Endurance], Some((10, 15))),
    ("Thruster", FullBody, Dumbbells, Advanced, &[FatLoss, Strength], Some((8, 12))),
    ("Jumping Jack", Cardio, NoEquip, Beginner, &[FatLoss, Endurance], Some((20, 30))),
    ("Mountain Climber", Cardio, Bodyweight, Intermediate, &[FatLoss, Endurance], Some((15, 30))),
];

/// Seeds the exercise catalog if the table is empty. Returns the number of
/// exercises added, or 0 when the catalog was already populated.
pub async fn seed_exercises(store: &Store) -> Result<usize> {
    if store.exercise_count().await? > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    for &(name, muscle_group, equipment, difficulty, tags, hints) in SEED {
        let ex = Exercise {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            muscle_group,
            equipment,
            difficulty,
            goal_tags: tags.to_vec(),
            rep_hint_min: hints.map(|(min, _)| min),
            rep_hint_max: hints.map(|(_, max)| max),
            is_custom: false,
            created_at: now,
        };
        store.add_exercise(&ex).await?;
    }

    Ok(SEED.len())
}
