use std::str::FromStr;

use anyhow::Result;
use sqlx::{
    Executor, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub type DB = SqlitePool;

pub async fn open(path: &str) -> Result<DB> {
    let opts = SqliteConnectOptions::from_str(path)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory pool for tests.
#[cfg(test)]
pub async fn open_in_memory() -> Result<DB> {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &DB) -> Result<()> {
    // Raw (unprepared) execution so the whole multi-statement schema runs.
    pool.execute(SCHEMA).await?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS exercises (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    muscle_group  TEXT NOT NULL,
    equipment     TEXT NOT NULL,
    difficulty    TEXT NOT NULL,
    goal_tags     TEXT NOT NULL DEFAULT '',
    rep_hint_min  INTEGER,
    rep_hint_max  INTEGER,
    is_custom     INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_profile (
    id                  TEXT PRIMARY KEY,
    name                TEXT NOT NULL,
    level               TEXT NOT NULL,
    goal                TEXT NOT NULL,
    quiz_score          INTEGER NOT NULL DEFAULT 0,
    streak_weeks        INTEGER NOT NULL DEFAULT 0,
    streak_freeze_used  INTEGER NOT NULL DEFAULT 0,
    first_pr_celebrated INTEGER NOT NULL DEFAULT 0,
    last_workout_date   TEXT,
    total_workouts      INTEGER NOT NULL DEFAULT 0,
    created_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workouts (
    id             TEXT PRIMARY KEY,
    date           TEXT NOT NULL,
    muscle_groups  TEXT NOT NULL DEFAULT '',
    duration_min   INTEGER NOT NULL DEFAULT 0,
    notes          TEXT NOT NULL DEFAULT '',
    profile_id     TEXT NOT NULL,
    finished_at    TEXT
);

CREATE TABLE IF NOT EXISTS workout_exercises (
    id          TEXT PRIMARY KEY,
    workout_id  TEXT NOT NULL,
    exercise_id TEXT NOT NULL,
    position    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS workout_sets (
    id                TEXT PRIMARY KEY,
    workout_id        TEXT NOT NULL,
    exercise_id       TEXT NOT NULL,
    set_number        INTEGER NOT NULL,
    weight            REAL NOT NULL,
    reps              INTEGER NOT NULL,
    difficulty_rating INTEGER
);

CREATE TABLE IF NOT EXISTS progress_records (
    id            TEXT PRIMARY KEY,
    exercise_id   TEXT NOT NULL,
    date          TEXT NOT NULL,
    max_weight    REAL NOT NULL,
    max_reps      INTEGER NOT NULL,
    total_volume  REAL NOT NULL,
    estimated_1rm REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_workout_sets_workout ON workout_sets(workout_id);
CREATE INDEX IF NOT EXISTS idx_progress_exercise ON progress_records(exercise_id);
"#;
