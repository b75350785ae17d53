use std::fs;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use uuid::Uuid;

use crate::cli::ExerciseCmd;
use crate::models::{Exercise, ExerciseImport};
use crate::storage::Store;
use crate::types::{
    Difficulty, Equipment, GoalTag, best_muscle_group_suggestion, canonical_muscle_group,
};

pub async fn handle(cmd: ExerciseCmd, store: &Store) -> Result<()> {
    match cmd {
        ExerciseCmd::Add {
            name,
            muscle,
            equipment,
            difficulty,
            tags,
        } => {
            let Some(muscle_group) = canonical_muscle_group(&muscle) else {
                print_unknown_muscle(&muscle);
                return Ok(());
            };

            let mut goal_tags = Vec::new();
            for tag in &tags {
                match GoalTag::from_str(tag) {
                    Ok(t) => goal_tags.push(t),
                    Err(_) => {
                        println!("{} unknown goal tag: {}", "error:".red().bold(), tag);
                        return Ok(());
                    }
                }
            }
            if goal_tags.is_empty() {
                goal_tags.push(GoalTag::General);
            }

            let ex = Exercise {
                id: Uuid::new_v4().to_string(),
                name: name.clone(),
                muscle_group,
                equipment,
                difficulty,
                goal_tags,
                rep_hint_min: None,
                rep_hint_max: None,
                is_custom: true,
                created_at: Utc::now(),
            };
            store.add_exercise(&ex).await?;

            println!(
                "{} added {} ({}, {}, {})",
                "ok:".green().bold(),
                name.bold(),
                muscle_group,
                equipment,
                difficulty
            );
        }

        ExerciseCmd::List { muscle } => {
            let filter = match muscle {
                Some(ref m) => match canonical_muscle_group(m) {
                    Some(mg) => Some(mg),
                    None => {
                        print_unknown_muscle(m);
                        return Ok(());
                    }
                },
                None => None,
            };

            let exercises = store.list_exercises().await?;
            let mut shown = 0usize;
            for (i, ex) in exercises.iter().enumerate() {
                if let Some(mg) = filter {
                    if ex.muscle_group != mg {
                        continue;
                    }
                }
                shown += 1;

                let custom = if ex.is_custom {
                    " (custom)".dimmed().to_string()
                } else {
                    String::new()
                };
                println!(
                    "{} {} — {} · {} · {}{}",
                    format!("{:>3}", i + 1).yellow(),
                    ex.name.bold(),
                    ex.muscle_group,
                    ex.equipment,
                    ex.difficulty,
                    custom
                );
            }

            if shown == 0 {
                println!("{} no exercises found", "info:".blue().bold());
            }
        }

        ExerciseCmd::Import { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {file}"))?;
            let import: ExerciseImport =
                toml::from_str(&content).with_context(|| format!("invalid TOML in {file}"))?;

            let existing: Vec<String> = store
                .list_exercises()
                .await?
                .into_iter()
                .map(|e| e.name.to_lowercase())
                .collect();

            let mut inserted = 0usize;
            let mut skipped = 0usize;
            for def in import.exercise {
                if existing.contains(&def.name.to_lowercase()) {
                    println!("{} skipping duplicate: {}", "info:".blue().bold(), def.name);
                    skipped += 1;
                    continue;
                }

                let Some(muscle_group) = canonical_muscle_group(&def.muscle_group) else {
                    println!(
                        "{} skipping {}: unknown muscle group `{}`",
                        "warning:".yellow().bold(),
                        def.name,
                        def.muscle_group
                    );
                    skipped += 1;
                    continue;
                };

                let equipment = def
                    .equipment
                    .as_deref()
                    .map(Equipment::from_str)
                    .transpose()
                    .map_err(|e| anyhow::anyhow!(e))?
                    .unwrap_or(Equipment::None);
                let difficulty = def
                    .difficulty
                    .as_deref()
                    .map(Difficulty::from_str)
                    .transpose()
                    .map_err(|e| anyhow::anyhow!(e))?
                    .unwrap_or(Difficulty::Beginner);

                let mut goal_tags: Vec<GoalTag> = def
                    .goal_tags
                    .iter()
                    .filter_map(|t| GoalTag::from_str(t).ok())
                    .collect();
                if goal_tags.is_empty() {
                    goal_tags.push(GoalTag::General);
                }

                let ex = Exercise {
                    id: Uuid::new_v4().to_string(),
                    name: def.name,
                    muscle_group,
                    equipment,
                    difficulty,
                    goal_tags,
                    rep_hint_min: def.rep_hint_min,
                    rep_hint_max: def.rep_hint_max,
                    is_custom: true,
                    created_at: Utc::now(),
                };
                store.add_exercise(&ex).await?;
                inserted += 1;
            }

            println!(
                "{} imported {} exercise{}, skipped {}",
                "ok:".green().bold(),
                inserted,
                if inserted == 1 { "" } else { "s" },
                skipped
            );
        }
    }

    Ok(())
}

fn print_unknown_muscle(input: &str) {
    println!("{} unknown muscle group: {}", "error:".red().bold(), input);
    if let Some(suggestion) = best_muscle_group_suggestion(input) {
        println!("{} did you mean {}?", "info:".blue().bold(), suggestion.bold());
    }
}
