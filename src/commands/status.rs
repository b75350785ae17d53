use std::collections::HashMap;

use anyhow::Result;
use chrono::{Duration, Utc};
use colored::Colorize;
use itertools::Itertools;

use crate::progress::{current_pr, week_key};
use crate::storage::Store;
use crate::utils::format_date;

pub async fn handle(store: &Store) -> Result<()> {
    let Some(profile) = store.get_profile().await? else {
        println!(
            "{} no profile yet — run `gymsprout onboard` first",
            "error:".red().bold()
        );
        return Ok(());
    };

    let now = Utc::now();
    let workouts = store.list_workouts(&profile.id).await?;
    let finished: Vec<_> = workouts
        .iter()
        .filter(|w| w.finished_at.is_some())
        .collect();

    let this_week = finished
        .iter()
        .filter(|w| week_key(w.date) == week_key(now))
        .count();
    let this_month = finished
        .iter()
        .filter(|w| now - w.date <= Duration::days(30))
        .count();

    println!(
        "{} {} ({}, goal: {})",
        "Profile:".cyan().bold(),
        profile.name.bold(),
        profile.level,
        profile.goal
    );
    println!(
        "{} {} week{}{}",
        "Streak:".cyan().bold(),
        profile.streak_weeks.to_string().bold(),
        if profile.streak_weeks == 1 { "" } else { "s" },
        if profile.streak_freeze_used {
            " (freeze used)".dimmed().to_string()
        } else {
            String::new()
        }
    );
    println!(
        "{} {} total · {} this week · {} in the last 30 days",
        "Workouts:".cyan().bold(),
        profile.total_workouts,
        this_week,
        this_month
    );
    if let Some(last) = profile.last_workout_date {
        println!("{} {}", "Last workout:".cyan().bold(), format_date(last));
    }

    print_top_prs(store).await?;
    print_volume_by_week(store, &profile.id).await?;

    Ok(())
}

/// The three heaviest current PRs across the catalog.
async fn print_top_prs(store: &Store) -> Result<()> {
    let records = store.list_progress_records(None).await?;
    if records.is_empty() {
        return Ok(());
    }

    let names: HashMap<String, String> = store
        .list_exercises()
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    let top = records
        .iter()
        .into_group_map_by(|r| r.exercise_id.clone())
        .into_iter()
        .filter_map(|(ex_id, recs)| {
            let recs: Vec<_> = recs.into_iter().cloned().collect();
            current_pr(&recs).cloned().map(|pr| (ex_id, pr))
        })
        .sorted_by(|a, b| {
            b.1.max_weight
                .partial_cmp(&a.1.max_weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .take(3)
        .collect::<Vec<_>>();

    println!("\n{}", "Personal records:".cyan().bold());
    for (ex_id, pr) in top {
        let name = names.get(&ex_id).map(String::as_str).unwrap_or("(removed)");
        println!(
            "  {} — {}kg x {} (est. 1RM {:.1}kg, {})",
            name.bold(),
            pr.max_weight,
            pr.max_reps,
            pr.estimated_1rm,
            format_date(pr.date)
        );
    }

    Ok(())
}

/// Total volume per ISO week over the last four weeks, oldest first.
async fn print_volume_by_week(store: &Store, profile_id: &str) -> Result<()> {
    let now = Utc::now();
    let cutoff = now - Duration::days(28);

    let mut volume: HashMap<(i32, u32), f64> = HashMap::new();
    for workout in store.list_workouts(profile_id).await? {
        if workout.finished_at.is_none() || workout.date < cutoff {
            continue;
        }
        let sets = store.list_sets(&workout.id).await?;
        let total = crate::suggestions::calculate_volume(
            &sets.iter().map(|s| (s.weight, s.reps)).collect::<Vec<_>>(),
        );
        *volume.entry(week_key(workout.date)).or_insert(0.0) += total;
    }

    if volume.is_empty() {
        return Ok(());
    }

    println!("\n{}", "Volume (last 4 weeks):".cyan().bold());
    for (week, total) in volume.into_iter().sorted_by_key(|(k, _)| *k) {
        println!("  {}-W{:02}  {:>8.0} kg", week.0, week.1, total);
    }

    Ok(())
}
