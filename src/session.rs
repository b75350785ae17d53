use anyhow::{Result, bail};
use chrono::Utc;
use uuid::Uuid;

use crate::models::{ActiveExercise, ActiveWorkout, Exercise, LoggedSet, UserProfile, Workout};
use crate::progress::{self, CompletionUpdate, PrOutcome};
use crate::storage::Store;
use crate::suggestions::suggest_exercises;
use crate::types::MuscleGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Active,
    Finished,
    Discarded,
}

#[derive(Debug)]
pub struct LogSetOutcome {
    pub set: LoggedSet,
    pub pr: PrOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOutcome {
    /// No active session: silently ignored.
    NoSession,
    /// Exercise not in the session or fewer than two sets logged yet.
    NotAvailable,
    Rated,
}

#[derive(Debug, Clone, Copy)]
pub struct FinishOutcome {
    pub duration_min: u32,
    pub update: CompletionUpdate,
}

/// Owns the in-progress workout. All mutations go through the named
/// transitions below; operations that need an Active session are no-ops
/// without one rather than errors.
pub struct SessionMachine {
    store: Store,
    state: SessionState,
    active: Option<ActiveWorkout>,
}

impl SessionMachine {
    /// Rebuilds the machine from the store: if an unfinished workout
    /// exists it becomes the Active session.
    pub async fn load(store: Store) -> Result<Self> {
        let Some(workout) = store.active_workout().await? else {
            return Ok(Self {
                store,
                state: SessionState::NotStarted,
                active: None,
            });
        };

        let exercises = store.list_workout_exercises(&workout.id).await?;
        let sets = store.list_sets(&workout.id).await?;

        let mut active_exercises: Vec<ActiveExercise> =
            exercises.into_iter().map(ActiveExercise::new).collect();
        for set in sets {
            if let Some(ex) = active_exercises
                .iter_mut()
                .find(|e| e.exercise.id == set.exercise_id)
            {
                ex.sets.push(set);
            }
        }
        for ex in &mut active_exercises {
            ex.sets.sort_by_key(|s| s.set_number);
        }

        Ok(Self {
            store,
            state: SessionState::Active,
            active: Some(ActiveWorkout {
                workout,
                exercises: active_exercises,
            }),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        self.active.as_ref()
    }

    /// Confirming a non-empty muscle-group selection starts the session:
    /// the suggestion engine runs against the last three completed
    /// workouts' exercises and the workout row is created immediately.
    pub async fn start(
        &mut self,
        profile: &UserProfile,
        muscle_groups: &[MuscleGroup],
    ) -> Result<&ActiveWorkout> {
        if self.active.is_some() {
            bail!("a workout is already in progress");
        }
        if muscle_groups.is_empty() {
            bail!("pick at least one muscle group");
        }

        let catalog = self.store.list_exercises().await?;
        let recent = self.store.recent_exercise_ids(&profile.id, 3).await?;
        let suggested = suggest_exercises(
            &catalog,
            muscle_groups,
            profile.level,
            profile.goal,
            &recent,
        );

        let workout = Workout {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            muscle_groups: muscle_groups.to_vec(),
            duration_min: 0,
            notes: String::new(),
            profile_id: profile.id.clone(),
            finished_at: None,
        };
        self.store.add_workout(&workout).await?;
        for ex in &suggested {
            self.store.add_workout_exercise(&workout.id, &ex.id).await?;
        }

        self.state = SessionState::Active;
        let active = self.active.insert(ActiveWorkout {
            workout,
            exercises: suggested.into_iter().map(ActiveExercise::new).collect(),
        });

        Ok(active)
    }

    /// Appends an exercise to the active list. Never removes anything.
    /// Returns false (no-op) without an active session.
    pub async fn add_exercise(&mut self, exercise: Exercise) -> Result<bool> {
        let Some(active) = self.active.as_mut() else {
            return Ok(false);
        };

        self.store
            .add_workout_exercise(&active.workout.id, &exercise.id)
            .await?;
        active.exercises.push(ActiveExercise::new(exercise));
        Ok(true)
    }

    /// Logs a set with the next sequential set number for the exercise and
    /// runs the PR check. The in-memory list only advances after the store
    /// write succeeded, so a failed write never shows a phantom set.
    pub async fn log_set(
        &mut self,
        profile: &mut UserProfile,
        exercise_id: &str,
        weight: f64,
        reps: u32,
    ) -> Result<Option<LogSetOutcome>> {
        let Some(active) = self.active.as_mut() else {
            return Ok(None);
        };
        let workout_id = active.workout.id.clone();
        let Some(ex) = active.exercise_mut(exercise_id) else {
            return Ok(None);
        };

        let set = LoggedSet {
            id: Uuid::new_v4().to_string(),
            workout_id,
            exercise_id: exercise_id.to_string(),
            set_number: ex.next_set_number(),
            weight,
            reps,
            difficulty_rating: None,
        };
        self.store.add_set(&set).await?;
        ex.sets.push(set.clone());

        let pr = progress::record_set_progress(&self.store, profile, exercise_id, weight, reps)
            .await?;

        Ok(Some(LogSetOutcome { set, pr }))
    }

    /// Attaches a rating to the most recently logged set of an exercise.
    /// Ratings only open up once the exercise has two or more sets.
    pub async fn rate_difficulty(&mut self, exercise_id: &str, rating: u8) -> Result<RateOutcome> {
        let Some(active) = self.active.as_mut() else {
            return Ok(RateOutcome::NoSession);
        };
        let Some(ex) = active.exercise_mut(exercise_id) else {
            return Ok(RateOutcome::NotAvailable);
        };
        if !ex.can_rate() {
            return Ok(RateOutcome::NotAvailable);
        }

        let Some(last) = ex.sets.last_mut() else {
            return Ok(RateOutcome::NotAvailable);
        };
        self.store.update_set_rating(&last.id, rating).await?;
        last.difficulty_rating = Some(rating);

        Ok(RateOutcome::Rated)
    }

    /// Finalizes the duration, runs the streak update and clears the
    /// active workout. No-op without an active session.
    pub async fn finish(&mut self, profile: &mut UserProfile) -> Result<Option<FinishOutcome>> {
        let Some(active) = self.active.as_ref() else {
            return Ok(None);
        };

        let now = Utc::now();
        let duration_min =
            ((now - active.workout.date).num_seconds() as f64 / 60.0).round() as u32;
        self.store
            .finish_workout(&active.workout.id, duration_min, now)
            .await?;

        // The streak update observes the finalized duration write above.
        let update = progress::completion_update(profile, now);
        profile.total_workouts = update.total_workouts;
        profile.streak_weeks = update.streak_weeks;
        profile.streak_freeze_used = update.streak_freeze_used;
        profile.last_workout_date = Some(now);
        self.store.update_profile(profile).await?;

        self.state = SessionState::Finished;
        self.active = None;

        Ok(Some(FinishOutcome {
            duration_min,
            update,
        }))
    }

    /// Deletes the workout and every logged set. The caller is responsible
    /// for confirming with the user when sets exist. No-op without an
    /// active session.
    pub async fn discard(&mut self) -> Result<bool> {
        let Some(active) = self.active.as_ref() else {
            return Ok(false);
        };

        self.store.delete_workout(&active.workout.id).await?;
        self.state = SessionState::Discarded;
        self.active = None;
        Ok(true)
    }
}
