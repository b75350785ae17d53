use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use uuid::Uuid;

use crate::cli::OnboardArgs;
use crate::models::UserProfile;
use crate::storage::Store;
use crate::suggestions::{default_rest_seconds, default_set_count, rep_range};
use crate::types::Difficulty;

pub async fn handle(args: OnboardArgs, store: &Store) -> Result<()> {
    if store.get_profile().await?.is_some() {
        if !args.force {
            println!(
                "{} a profile already exists — re-run with --force to retake the quiz",
                "warning:".yellow().bold()
            );
            return Ok(());
        }
        store.delete_profile().await?;
    }

    let level = Difficulty::from_quiz_score(args.score);
    let profile = UserProfile {
        id: Uuid::new_v4().to_string(),
        name: args.name.clone(),
        level,
        goal: args.goal,
        quiz_score: args.score.min(10),
        streak_weeks: 0,
        streak_freeze_used: false,
        first_pr_celebrated: false,
        last_workout_date: None,
        total_workouts: 0,
        created_at: Utc::now(),
    };
    store.create_profile(&profile).await?;

    let range = rep_range(args.goal);
    println!(
        "{} welcome, {}! You're starting as {}",
        "ok:".green().bold(),
        args.name.bold(),
        level.to_string().cyan().bold()
    );
    println!(
        "  goal: {} — {} sets of {}-{} reps, {}s rest between sets",
        args.goal,
        default_set_count(level),
        range.min,
        range.max,
        default_rest_seconds(args.goal)
    );

    Ok(())
}
