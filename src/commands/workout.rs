use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::cli::WorkoutCmd;
use crate::session::{RateOutcome, SessionMachine};
use crate::settings::Settings;
use crate::storage::Store;
use crate::suggestions::{
    self, PR_ACHIEVED_MESSAGES, SET_LOGGED_MESSAGES, WORKOUT_COMPLETE_MESSAGES,
    default_rest_seconds, default_set_count, encouraging_message, rep_range,
};
use crate::timer::RestTimer;
use crate::utils::format_seconds;

pub async fn handle(cmd: WorkoutCmd, store: &Store, settings: &Settings) -> Result<()> {
    let Some(mut profile) = store.get_profile().await? else {
        println!(
            "{} no profile yet — run `gymsprout onboard` first",
            "error:".red().bold()
        );
        return Ok(());
    };

    let mut machine = SessionMachine::load(store.clone()).await?;

    match cmd {
        WorkoutCmd::Start { muscles } => {
            if machine.active().is_some() {
                println!(
                    "{} a workout is already in progress — `workout show` to see it",
                    "error:".red().bold()
                );
                return Ok(());
            }

            let active = machine.start(&profile, &muscles).await?;
            let range = rep_range(profile.goal);
            let sets = default_set_count(profile.level);

            println!(
                "{} {} workout started",
                "ok:".green().bold(),
                muscles
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
                    .bold()
            );

            if active.exercises.is_empty() {
                println!(
                    "{} no exercises match those muscle groups at your level — add some with `workout add-ex`",
                    "info:".blue().bold()
                );
                return Ok(());
            }

            println!("{}", "Suggested:".cyan().bold());
            for (i, ex) in active.exercises.iter().enumerate() {
                println!(
                    "{} • {} ({}) — {} sets of {}-{} reps",
                    format!("{}", i + 1).yellow(),
                    ex.exercise.name.bold(),
                    ex.exercise.equipment,
                    sets,
                    range.min,
                    range.max
                );
            }
            println!(
                "\nrest {}s between sets. Log with `workout log <EXERCISE> <WEIGHT> <REPS>`",
                default_rest_seconds(profile.goal)
            );
        }

        WorkoutCmd::Show => {
            let Some(active) = machine.active() else {
                println!("{} no active workout", "error:".red().bold());
                return Ok(());
            };

            let elapsed = chrono::Utc::now() - active.workout.date;
            println!(
                "{} {} (started {}, {} sets so far)",
                "Workout:".cyan().bold(),
                active
                    .workout
                    .muscle_groups
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
                    .bold(),
                active.workout.date.format("%H:%M"),
                active.total_sets()
            );
            println!("{} {}", "Elapsed:".cyan().bold(), crate::utils::format_duration(elapsed));

            for (i, ex) in active.exercises.iter().enumerate() {
                println!("\n{} {}", format!("{}.", i + 1).yellow(), ex.exercise.name.bold());
                for set in &ex.sets {
                    let rating = set
                        .difficulty_rating
                        .map(|r| format!(" (felt {}/5)", r))
                        .unwrap_or_default();
                    println!(
                        "  Set {}: {}kg x {}{}",
                        set.set_number, set.weight, set.reps, rating
                    );
                }
                if ex.sets.is_empty() {
                    println!("  {}", "no sets yet".dimmed());
                }
            }
        }

        WorkoutCmd::Log {
            exercise,
            weight,
            reps,
        } => {
            let Some(exercise_id) = resolve_index(&machine, exercise) else {
                return Ok(());
            };

            // Clamp at the boundary so the core only sees valid input.
            let weight = weight.max(0.0);
            let reps = reps.max(1) as u32;

            let Some(out) = machine
                .log_set(&mut profile, &exercise_id, weight, reps)
                .await?
            else {
                println!("{} no active workout", "error:".red().bold());
                return Ok(());
            };

            let seed = machine.active().map(|a| a.total_sets()).unwrap_or(0);
            println!(
                "{} set {} — {}kg x {}. {}",
                "ok:".green().bold(),
                out.set.set_number,
                out.set.weight,
                out.set.reps,
                encouraging_message(SET_LOGGED_MESSAGES, seed)
            );

            if out.pr.celebrated {
                println!(
                    "{} {}",
                    "PR!".magenta().bold(),
                    encouraging_message(PR_ACHIEVED_MESSAGES, seed)
                );
            }
            if let Some(milestone) = out.pr.milestone {
                println!("{} {}", "milestone:".magenta().bold(), milestone.headline());
            }

            if settings.rest_auto_start() {
                run_rest_countdown(default_rest_seconds(profile.goal)).await;
            }
        }

        WorkoutCmd::Rate { exercise, rating } => {
            if !(1..=5).contains(&rating) {
                println!("{} rating must be 1-5", "error:".red().bold());
                return Ok(());
            }
            let Some(exercise_id) = resolve_index(&machine, exercise) else {
                return Ok(());
            };

            match machine.rate_difficulty(&exercise_id, rating).await? {
                RateOutcome::NoSession => {
                    println!("{} no active workout", "error:".red().bold());
                }
                RateOutcome::NotAvailable => {
                    println!(
                        "{} log at least two sets of an exercise before rating it",
                        "info:".blue().bold()
                    );
                }
                RateOutcome::Rated => {
                    // Rating landed on the last set; use it for next time's hint.
                    let (w, r) = machine
                        .active()
                        .and_then(|a| a.exercises.iter().find(|e| e.exercise.id == exercise_id))
                        .and_then(|e| e.sets.last())
                        .map(|s| (s.weight, s.reps))
                        .unwrap_or((0.0, 1));

                    let hint = suggestions::progression_suggestion(Some(rating), w, r);
                    println!("{} rated {}/5", "ok:".green().bold(), rating);
                    println!(
                        "  next time: {}kg x {} — {}",
                        hint.suggested_weight, hint.suggested_reps, hint.message
                    );
                }
            }
        }

        WorkoutCmd::AddEx { exercise } => {
            if machine.active().is_none() {
                println!("{} no active workout", "error:".red().bold());
                return Ok(());
            }

            let library = store.list_exercises().await?;
            let found = if let Ok(idx) = exercise.parse::<usize>() {
                idx.checked_sub(1).and_then(|i| library.get(i)).cloned()
            } else {
                library
                    .iter()
                    .find(|e| e.name.eq_ignore_ascii_case(&exercise))
                    .cloned()
            };

            let Some(ex) = found else {
                println!(
                    "{} no exercise `{}` — see `ex list`",
                    "error:".red().bold(),
                    exercise
                );
                return Ok(());
            };

            let name = ex.name.clone();
            machine.add_exercise(ex).await?;
            println!("{} added {}", "ok:".green().bold(), name.bold());
        }

        WorkoutCmd::Rest { seconds } => {
            let secs = seconds.unwrap_or_else(|| {
                if settings.map.contains_key(crate::settings::KEY_REST_DEFAULT_SECS) {
                    settings.rest_default_secs()
                } else {
                    default_rest_seconds(profile.goal)
                }
            });
            run_rest_countdown(secs).await;
        }

        WorkoutCmd::Finish => {
            let Some(out) = machine.finish(&mut profile).await? else {
                println!("{} no active workout to finish", "error:".red().bold());
                return Ok(());
            };

            println!(
                "{} finished in {} minutes. {}",
                "ok:".green().bold(),
                out.duration_min,
                encouraging_message(WORKOUT_COMPLETE_MESSAGES, out.update.total_workouts as usize)
            );
            println!(
                "  streak: {} week{} · total workouts: {}",
                out.update.streak_weeks.to_string().cyan().bold(),
                if out.update.streak_weeks == 1 { "" } else { "s" },
                out.update.total_workouts
            );
            if let Some(milestone) = out.update.milestone {
                println!("{} {}", "milestone:".magenta().bold(), milestone.headline());
            }
        }

        WorkoutCmd::Discard { yes } => {
            let Some(active) = machine.active() else {
                println!("{} no active workout to discard", "error:".red().bold());
                return Ok(());
            };

            let sets = active.total_sets();
            if sets > 0 && !yes {
                println!(
                    "{} you have logged {} set{} — re-run with --yes to discard them",
                    "warning:".yellow().bold(),
                    sets,
                    if sets == 1 { "" } else { "s" }
                );
                return Ok(());
            }

            machine.discard().await?;
            println!("{} workout discarded", "ok:".green().bold());
        }
    }

    Ok(())
}

/// 1-based index into the active exercise list, with a friendly error.
fn resolve_index(machine: &SessionMachine, index: usize) -> Option<String> {
    let Some(active) = machine.active() else {
        println!("{} no active workout", "error:".red().bold());
        return None;
    };
    match index
        .checked_sub(1)
        .and_then(|i| active.exercises.get(i))
    {
        Some(ex) => Some(ex.exercise.id.clone()),
        None => {
            println!(
                "{} no exercise at index {} — see `workout show`",
                "error:".red().bold(),
                index
            );
            None
        }
    }
}

/// Counts the rest down on one line; purely cosmetic.
async fn run_rest_countdown(seconds: u32) {
    if seconds == 0 {
        return;
    }

    let mut timer = RestTimer::default();
    timer.start(seconds);
    println!(
        "{} resting {} (Ctrl-C to skip)",
        "rest:".cyan().bold(),
        format_seconds(seconds)
    );

    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let expired = timer.tick();
        print!("\r  {} remaining ", format_seconds(timer.seconds_left()));
        use std::io::Write;
        let _ = std::io::stdout().flush();
        if expired {
            println!("\n{} rest over — back to it!", "ok:".green().bold());
            break;
        }
        if !timer.is_running() {
            break;
        }
    }
}
