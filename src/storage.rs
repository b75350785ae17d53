use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Exercise, LoggedSet, ProgressRecord, UserProfile, Workout};
use crate::types::{Difficulty, Equipment, Goal, GoalTag, MuscleGroup};

/// Persistent record store. Every method is one logical read or
/// read-modify-write; failures bubble up and leave no partial state for
/// a single call (multi-row mutations run inside a transaction).
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

type ExerciseRow = (
    String,         // id
    String,         // name
    MuscleGroup,    // muscle_group
    Equipment,      // equipment
    Difficulty,     // difficulty
    String,         // goal_tags, comma-joined
    Option<i64>,    // rep_hint_min
    Option<i64>,    // rep_hint_max
    bool,           // is_custom
    DateTime<Utc>,  // created_at
);

fn exercise_from_row(row: ExerciseRow) -> Exercise {
    let (id, name, muscle_group, equipment, difficulty, tags, min, max, is_custom, created_at) =
        row;
    Exercise {
        id,
        name,
        muscle_group,
        equipment,
        difficulty,
        goal_tags: parse_goal_tags(&tags),
        rep_hint_min: min.map(|v| v as u32),
        rep_hint_max: max.map(|v| v as u32),
        is_custom,
        created_at,
    }
}

fn parse_goal_tags(raw: &str) -> Vec<GoalTag> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| GoalTag::from_str(s).ok())
        .collect()
}

fn join_goal_tags(tags: &[GoalTag]) -> String {
    tags.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_muscle_groups(raw: &str) -> Vec<MuscleGroup> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| MuscleGroup::from_str(s).ok())
        .collect()
}

fn join_muscle_groups(groups: &[MuscleGroup]) -> String {
    groups
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    //
    // Exercises
    //

    pub async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let rows = sqlx::query_as::<_, ExerciseRow>(
            r#"
            SELECT id, name, muscle_group, equipment, difficulty, goal_tags,
                   rep_hint_min, rep_hint_max, is_custom, created_at
            FROM exercises
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(exercise_from_row).collect())
    }

    /// Inserts an exercise and returns its id. Duplicate names are a
    /// constraint error surfaced to the caller.
    pub async fn add_exercise(&self, ex: &Exercise) -> Result<String> {
        sqlx::query(
            r#"
            INSERT INTO exercises
              (id, name, muscle_group, equipment, difficulty, goal_tags,
               rep_hint_min, rep_hint_max, is_custom, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&ex.id)
        .bind(&ex.name)
        .bind(ex.muscle_group)
        .bind(ex.equipment)
        .bind(ex.difficulty)
        .bind(join_goal_tags(&ex.goal_tags))
        .bind(ex.rep_hint_min.map(|v| v as i64))
        .bind(ex.rep_hint_max.map(|v| v as i64))
        .bind(ex.is_custom)
        .bind(ex.created_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert exercise `{}`", ex.name))?;

        Ok(ex.id.clone())
    }

    pub async fn exercise_count(&self) -> Result<i64> {
        Ok(sqlx::query_scalar("SELECT count(*) FROM exercises")
            .fetch_one(&self.pool)
            .await?)
    }

    //
    // Workouts
    //

    /// Completed and active workouts for a profile, newest first.
    pub async fn list_workouts(&self, profile_id: &str) -> Result<Vec<Workout>> {
        let rows = sqlx::query_as::<
            _,
            (
                String,
                DateTime<Utc>,
                String,
                i64,
                String,
                String,
                Option<DateTime<Utc>>,
            ),
        >(
            r#"
            SELECT id, date, muscle_groups, duration_min, notes, profile_id, finished_at
            FROM workouts
            WHERE profile_id = ?
            ORDER BY date DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, date, groups, duration, notes, profile_id, finished_at)| Workout {
                    id,
                    date,
                    muscle_groups: parse_muscle_groups(&groups),
                    duration_min: duration as u32,
                    notes,
                    profile_id,
                    finished_at,
                },
            )
            .collect())
    }

    /// The workout that has not been finished yet, if any. At most one
    /// exists at a time.
    pub async fn active_workout(&self) -> Result<Option<Workout>> {
        let row = sqlx::query_as::<
            _,
            (
                String,
                DateTime<Utc>,
                String,
                i64,
                String,
                String,
                Option<DateTime<Utc>>,
            ),
        >(
            r#"
            SELECT id, date, muscle_groups, duration_min, notes, profile_id, finished_at
            FROM workouts
            WHERE finished_at IS NULL
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(id, date, groups, duration, notes, profile_id, finished_at)| Workout {
                id,
                date,
                muscle_groups: parse_muscle_groups(&groups),
                duration_min: duration as u32,
                notes,
                profile_id,
                finished_at,
            },
        ))
    }

    pub async fn add_workout(&self, w: &Workout) -> Result<String> {
        sqlx::query(
            r#"
            INSERT INTO workouts (id, date, muscle_groups, duration_min, notes, profile_id, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&w.id)
        .bind(w.date)
        .bind(join_muscle_groups(&w.muscle_groups))
        .bind(w.duration_min as i64)
        .bind(&w.notes)
        .bind(&w.profile_id)
        .bind(w.finished_at)
        .execute(&self.pool)
        .await
        .context("failed to insert workout")?;

        Ok(w.id.clone())
    }

    pub async fn finish_workout(
        &self,
        id: &str,
        duration_min: u32,
        finished_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE workouts SET duration_min = ?, finished_at = ? WHERE id = ?")
            .bind(duration_min as i64)
            .bind(finished_at)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to finalize workout")?;
        Ok(())
    }

    /// Deletes a workout together with its sets and exercise list.
    pub async fn delete_workout(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM workout_sets WHERE workout_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM workout_exercises WHERE workout_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    //
    // Session exercise list (ordered)
    //

    pub async fn add_workout_exercise(&self, workout_id: &str, exercise_id: &str) -> Result<()> {
        let next_pos: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM workout_exercises WHERE workout_id = ?",
        )
        .bind(workout_id)
        .fetch_one(&self.pool)
        .await?;

        sqlx::query(
            "INSERT INTO workout_exercises (id, workout_id, exercise_id, position) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(workout_id)
        .bind(exercise_id)
        .bind(next_pos)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_workout_exercises(&self, workout_id: &str) -> Result<Vec<Exercise>> {
        let rows = sqlx::query_as::<_, ExerciseRow>(
            r#"
            SELECT e.id, e.name, e.muscle_group, e.equipment, e.difficulty, e.goal_tags,
                   e.rep_hint_min, e.rep_hint_max, e.is_custom, e.created_at
            FROM workout_exercises we
            JOIN exercises e ON e.id = we.exercise_id
            WHERE we.workout_id = ?
            ORDER BY we.position
            "#,
        )
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(exercise_from_row).collect())
    }

    //
    // Sets
    //

    pub async fn list_sets(&self, workout_id: &str) -> Result<Vec<LoggedSet>> {
        let rows = sqlx::query_as::<_, (String, String, String, i64, f64, i64, Option<i64>)>(
            r#"
            SELECT id, workout_id, exercise_id, set_number, weight, reps, difficulty_rating
            FROM workout_sets
            WHERE workout_id = ?
            ORDER BY exercise_id, set_number
            "#,
        )
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, workout_id, exercise_id, set_number, weight, reps, rating)| LoggedSet {
                    id,
                    workout_id,
                    exercise_id,
                    set_number: set_number as u32,
                    weight,
                    reps: reps as u32,
                    difficulty_rating: rating.map(|r| r as u8),
                },
            )
            .collect())
    }

    /// Exercise ids touched by the most recent `limit` completed workouts.
    pub async fn recent_exercise_ids(&self, profile_id: &str, limit: u32) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT ws.exercise_id
            FROM workout_sets ws
            JOIN (
                SELECT id FROM workouts
                WHERE profile_id = ? AND finished_at IS NOT NULL
                ORDER BY date DESC
                LIMIT ?
            ) recent ON recent.id = ws.workout_id
            "#,
        )
        .bind(profile_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn add_set(&self, set: &LoggedSet) -> Result<String> {
        sqlx::query(
            r#"
            INSERT INTO workout_sets
              (id, workout_id, exercise_id, set_number, weight, reps, difficulty_rating)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&set.id)
        .bind(&set.workout_id)
        .bind(&set.exercise_id)
        .bind(set.set_number as i64)
        .bind(set.weight)
        .bind(set.reps as i64)
        .bind(set.difficulty_rating.map(|r| r as i64))
        .execute(&self.pool)
        .await
        .context("failed to insert set")?;

        Ok(set.id.clone())
    }

    pub async fn update_set_rating(&self, set_id: &str, rating: u8) -> Result<()> {
        sqlx::query("UPDATE workout_sets SET difficulty_rating = ? WHERE id = ?")
            .bind(rating as i64)
            .bind(set_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Clears a workout's sets while keeping the workout row itself.
    pub async fn delete_sets_for_workout(&self, workout_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM workout_sets WHERE workout_id = ?")
            .bind(workout_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    //
    // Progress records
    //

    pub async fn list_progress_records(
        &self,
        exercise_id: Option<&str>,
    ) -> Result<Vec<ProgressRecord>> {
        let rows = match exercise_id {
            Some(ex_id) => {
                sqlx::query_as::<_, (String, String, DateTime<Utc>, f64, i64, f64, f64)>(
                    r#"
                    SELECT id, exercise_id, date, max_weight, max_reps, total_volume, estimated_1rm
                    FROM progress_records
                    WHERE exercise_id = ?
                    ORDER BY date
                    "#,
                )
                .bind(ex_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, (String, String, DateTime<Utc>, f64, i64, f64, f64)>(
                    r#"
                    SELECT id, exercise_id, date, max_weight, max_reps, total_volume, estimated_1rm
                    FROM progress_records
                    ORDER BY date
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(
                |(id, exercise_id, date, max_weight, max_reps, total_volume, estimated_1rm)| {
                    ProgressRecord {
                        id,
                        exercise_id,
                        date,
                        max_weight,
                        max_reps: max_reps as u32,
                        total_volume,
                        estimated_1rm,
                    }
                },
            )
            .collect())
    }

    pub async fn add_progress_record(&self, record: &ProgressRecord) -> Result<String> {
        sqlx::query(
            r#"
            INSERT INTO progress_records
              (id, exercise_id, date, max_weight, max_reps, total_volume, estimated_1rm)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(&record.exercise_id)
        .bind(record.date)
        .bind(record.max_weight)
        .bind(record.max_reps as i64)
        .bind(record.total_volume)
        .bind(record.estimated_1rm)
        .execute(&self.pool)
        .await
        .context("failed to insert progress record")?;

        Ok(record.id.clone())
    }

    //
    // Profile
    //

    pub async fn get_profile(&self) -> Result<Option<UserProfile>> {
        let row = sqlx::query_as::<
            _,
            (
                String,
                String,
                Difficulty,
                Goal,
                i64,
                i64,
                bool,
                bool,
                Option<DateTime<Utc>>,
                i64,
                DateTime<Utc>,
            ),
        >(
            r#"
            SELECT id, name, level, goal, quiz_score, streak_weeks, streak_freeze_used,
                   first_pr_celebrated, last_workout_date, total_workouts, created_at
            FROM user_profile
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(
                id,
                name,
                level,
                goal,
                quiz_score,
                streak_weeks,
                streak_freeze_used,
                first_pr_celebrated,
                last_workout_date,
                total_workouts,
                created_at,
            )| UserProfile {
                id,
                name,
                level,
                goal,
                quiz_score: quiz_score as u32,
                streak_weeks: streak_weeks as u32,
                streak_freeze_used,
                first_pr_celebrated,
                last_workout_date,
                total_workouts: total_workouts as u32,
                created_at,
            },
        ))
    }

    pub async fn create_profile(&self, profile: &UserProfile) -> Result<String> {
        sqlx::query(
            r#"
            INSERT INTO user_profile
              (id, name, level, goal, quiz_score, streak_weeks, streak_freeze_used,
               first_pr_celebrated, last_workout_date, total_workouts, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(profile.level)
        .bind(profile.goal)
        .bind(profile.quiz_score as i64)
        .bind(profile.streak_weeks as i64)
        .bind(profile.streak_freeze_used)
        .bind(profile.first_pr_celebrated)
        .bind(profile.last_workout_date)
        .bind(profile.total_workouts as i64)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await
        .context("failed to create profile")?;

        Ok(profile.id.clone())
    }

    /// Writes back every mutable profile field.
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_profile
            SET name = ?, level = ?, goal = ?, quiz_score = ?, streak_weeks = ?,
                streak_freeze_used = ?, first_pr_celebrated = ?, last_workout_date = ?,
                total_workouts = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.name)
        .bind(profile.level)
        .bind(profile.goal)
        .bind(profile.quiz_score as i64)
        .bind(profile.streak_weeks as i64)
        .bind(profile.streak_freeze_used)
        .bind(profile.first_pr_celebrated)
        .bind(profile.last_workout_date)
        .bind(profile.total_workouts as i64)
        .bind(&profile.id)
        .execute(&self.pool)
        .await
        .context("failed to update profile")?;

        Ok(())
    }

    pub async fn delete_profile(&self) -> Result<()> {
        sqlx::query("DELETE FROM user_profile")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    //
    // Whole-database reset
    //

    /// Irreversibly clears every table.
    pub async fn reset_all_data(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for table in [
            "workout_sets",
            "workout_exercises",
            "workouts",
            "progress_records",
            "user_profile",
            "exercises",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
