use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use crate::models::{ProgressRecord, UserProfile};
use crate::storage::Store;
use crate::suggestions::estimate_1rm;
use crate::types::Milestone;

/// ISO-8601 week key (Monday-start, first week containing Jan 4th).
/// Comparing `(iso_year, iso_week)` pairs keeps "one streak increment per
/// calendar week" correct across year boundaries.
pub fn week_key(date: DateTime<Utc>) -> (i32, u32) {
    let iso = date.iso_week();
    (iso.year(), iso.week())
}

/// Whole days elapsed between two instants, floored.
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_days()
}

/// The current PR for an exercise: highest max weight, ties broken by the
/// latest date.
pub fn current_pr(records: &[ProgressRecord]) -> Option<&ProgressRecord> {
    records.iter().max_by(|a, b| {
        a.max_weight
            .partial_cmp(&b.max_weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.date.cmp(&b.date))
    })
}

/// Decides whether a logged set earns a new progress record. Returns the
/// record to append, or `None` when neither weight nor reps improved.
pub fn decide_pr(
    existing: &[ProgressRecord],
    exercise_id: &str,
    weight: f64,
    reps: u32,
    now: DateTime<Utc>,
) -> Option<ProgressRecord> {
    // Best existing record by max weight; first one wins ties.
    let best = existing.iter().fold(None::<&ProgressRecord>, |acc, r| match acc {
        None => Some(r),
        Some(b) if r.max_weight > b.max_weight => Some(r),
        Some(b) => Some(b),
    });

    let (max_weight, max_reps) = match best {
        None => (weight, reps),
        Some(b) if weight > b.max_weight || reps > b.max_reps => {
            (weight.max(b.max_weight), reps.max(b.max_reps))
        }
        Some(_) => return None,
    };

    Some(ProgressRecord {
        id: Uuid::new_v4().to_string(),
        exercise_id: exercise_id.to_string(),
        date: now,
        max_weight,
        max_reps,
        total_volume: weight * reps as f64,
        estimated_1rm: estimate_1rm(weight, reps),
    })
}

#[derive(Debug, Clone)]
pub struct PrOutcome {
    pub record: Option<ProgressRecord>,
    /// Celebration is suppressed for the whole of the very first workout.
    pub celebrated: bool,
    pub milestone: Option<Milestone>,
}

/// PR check for one logged set: reads the exercise's records, appends a new
/// one when the set qualifies, and raises the one-time first-PR milestone.
/// The profile flag write happens only after the record write succeeded.
pub async fn record_set_progress(
    store: &Store,
    profile: &mut UserProfile,
    exercise_id: &str,
    weight: f64,
    reps: u32,
) -> Result<PrOutcome> {
    let existing = store.list_progress_records(Some(exercise_id)).await?;
    let record = decide_pr(&existing, exercise_id, weight, reps, Utc::now());

    let Some(record) = record else {
        return Ok(PrOutcome { record: None, celebrated: false, milestone: None });
    };

    store.add_progress_record(&record).await?;

    let celebrated = profile.total_workouts > 0;
    let milestone = if celebrated && !profile.first_pr_celebrated {
        profile.first_pr_celebrated = true;
        store.update_profile(profile).await?;
        Some(Milestone::FirstPr)
    } else {
        None
    };

    Ok(PrOutcome {
        record: Some(record),
        celebrated,
        milestone,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionUpdate {
    pub total_workouts: u32,
    pub streak_weeks: u32,
    pub streak_freeze_used: bool,
    pub milestone: Option<Milestone>,
}

/// Streak and milestone bookkeeping for one workout completion.
///
/// - gap ≤ 7 days: the streak continues and increments once per new ISO
///   week, so several workouts in the same week count once;
/// - gap ≤ 14 days with the freeze available: the freeze is consumed and
///   the streak still increments (one grace week);
/// - anything longer resets the streak to 1 and hands the freeze back.
pub fn completion_update(profile: &UserProfile, now: DateTime<Utc>) -> CompletionUpdate {
    let total_workouts = profile.total_workouts + 1;
    let prev_streak = profile.streak_weeks;
    let mut freeze_used = profile.streak_freeze_used;

    let days_since = profile
        .last_workout_date
        .map(|last| days_between(last, now))
        .unwrap_or(i64::MAX);

    let streak_weeks = match profile.last_workout_date {
        None => 1,
        Some(last) => {
            if days_since <= 7 {
                if week_key(now) > week_key(last) {
                    prev_streak + 1
                } else {
                    prev_streak.max(1)
                }
            } else if days_since <= 14 && !freeze_used {
                freeze_used = true;
                prev_streak + 1
            } else {
                // Streak reset makes the freeze available again.
                freeze_used = false;
                1
            }
        }
    };

    // First match wins; at most one milestone per completion.
    let milestone = if total_workouts == 1 {
        Some(Milestone::FirstWorkout)
    } else if streak_weeks == 1 && prev_streak == 0 && days_since > 7 {
        Some(Milestone::ComeBack)
    } else if streak_weeks == 4 {
        Some(Milestone::FirstMonth)
    } else if streak_weeks == 12 {
        Some(Milestone::ThreeMonths)
    } else {
        None
    };

    CompletionUpdate {
        total_workouts,
        streak_weeks,
        streak_freeze_used: freeze_used,
        milestone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Difficulty, Goal};
    use chrono::{Duration, TimeZone};

    fn profile(
        streak: u32,
        freeze_used: bool,
        last: Option<DateTime<Utc>>,
        total: u32,
    ) -> UserProfile {
        UserProfile {
            id: "p1".into(),
            name: "Alex".into(),
            level: Difficulty::Beginner,
            goal: Goal::BuildMuscle,
            quiz_score: 3,
            streak_weeks: streak,
            streak_freeze_used: freeze_used,
            first_pr_celebrated: false,
            last_workout_date: last,
            total_workouts: total,
            created_at: Utc::now(),
        }
    }

    fn record(weight: f64, reps: u32, days_ago: i64) -> ProgressRecord {
        ProgressRecord {
            id: Uuid::new_v4().to_string(),
            exercise_id: "ex1".into(),
            date: Utc::now() - Duration::days(days_ago),
            max_weight: weight,
            max_reps: reps,
            total_volume: weight * reps as f64,
            estimated_1rm: 0.0,
        }
    }

    //
    // PR decisions
    //

    #[test]
    fn first_set_always_creates_a_record() {
        let rec = decide_pr(&[], "ex1", 40.0, 10, Utc::now()).unwrap();
        assert_eq!(rec.max_weight, 40.0);
        assert_eq!(rec.max_reps, 10);
        assert_eq!(rec.total_volume, 400.0);
        assert!(rec.estimated_1rm > 40.0);
    }

    #[test]
    fn no_record_when_nothing_improved() {
        let existing = vec![record(40.0, 10, 3)];
        assert!(decide_pr(&existing, "ex1", 35.0, 8, Utc::now()).is_none());
        assert!(decide_pr(&existing, "ex1", 40.0, 10, Utc::now()).is_none());
    }

    #[test]
    fn heavier_weight_creates_record_with_componentwise_max() {
        let existing = vec![record(40.0, 10, 3)];
        let rec = decide_pr(&existing, "ex1", 42.5, 6, Utc::now()).unwrap();
        assert_eq!(rec.max_weight, 42.5);
        // Reps carry the previous best forward.
        assert_eq!(rec.max_reps, 10);
        // Volume reflects the actual set, not the maxima.
        assert_eq!(rec.total_volume, 255.0);
    }

    #[test]
    fn more_reps_alone_also_qualifies() {
        let existing = vec![record(40.0, 10, 3)];
        let rec = decide_pr(&existing, "ex1", 38.0, 12, Utc::now()).unwrap();
        assert_eq!(rec.max_weight, 40.0);
        assert_eq!(rec.max_reps, 12);
    }

    #[test]
    fn best_is_highest_weight_first_on_ties() {
        // Two records share the top weight but differ in reps; the first
        // one is the comparison baseline.
        let mut older = record(50.0, 12, 10);
        older.max_reps = 12;
        let newer = record(50.0, 8, 2);
        let existing = vec![older, newer];

        // 50kg x 10 beats neither weight (50) nor the baseline reps (12).
        assert!(decide_pr(&existing, "ex1", 50.0, 10, Utc::now()).is_none());
    }

    #[test]
    fn max_weight_is_monotone_across_created_records() {
        let mut existing: Vec<ProgressRecord> = Vec::new();
        let sets = [(40.0, 10u32), (35.0, 12), (45.0, 6), (44.0, 20), (45.0, 6)];
        for (w, r) in sets {
            if let Some(rec) = decide_pr(&existing, "ex1", w, r, Utc::now()) {
                existing.push(rec);
            }
        }
        let weights: Vec<f64> = existing.iter().map(|r| r.max_weight).collect();
        assert!(weights.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(current_pr(&existing).unwrap().max_weight, 45.0);
    }

    #[test]
    fn current_pr_breaks_weight_ties_by_latest_date() {
        let older = record(50.0, 8, 10);
        let newer = record(50.0, 5, 1);
        let newer_id = newer.id.clone();
        let pr = current_pr(&[older, newer]).unwrap().id.clone();
        assert_eq!(pr, newer_id);
    }

    //
    // Streaks
    //

    #[test]
    fn first_ever_workout_starts_streak_at_one() {
        let upd = completion_update(&profile(0, false, None, 0), Utc::now());
        assert_eq!(upd.streak_weeks, 1);
        assert_eq!(upd.total_workouts, 1);
        assert_eq!(upd.milestone, Some(Milestone::FirstWorkout));
    }

    #[test]
    fn same_iso_week_does_not_double_count() {
        // Wednesday then Friday of the same ISO week.
        let wed = Utc.with_ymd_and_hms(2026, 8, 19, 18, 0, 0).unwrap();
        let fri = Utc.with_ymd_and_hms(2026, 8, 21, 18, 0, 0).unwrap();
        let upd = completion_update(&profile(3, false, Some(wed), 10), fri);
        assert_eq!(upd.streak_weeks, 3);
        assert!(upd.milestone.is_none());
    }

    #[test]
    fn next_iso_week_increments_once() {
        let fri = Utc.with_ymd_and_hms(2026, 8, 21, 18, 0, 0).unwrap();
        let mon = Utc.with_ymd_and_hms(2026, 8, 24, 7, 0, 0).unwrap();
        let upd = completion_update(&profile(3, false, Some(fri), 10), mon);
        assert_eq!(upd.streak_weeks, 4);
        assert_eq!(upd.milestone, Some(Milestone::FirstMonth));
    }

    #[test]
    fn year_boundary_still_counts_as_a_new_week() {
        // 2026-12-30 is ISO week 53 of 2026; 2027-01-04 is week 1 of 2027.
        let dec = Utc.with_ymd_and_hms(2026, 12, 30, 12, 0, 0).unwrap();
        let jan = Utc.with_ymd_and_hms(2027, 1, 4, 12, 0, 0).unwrap();
        assert!(week_key(jan) > week_key(dec));
        let upd = completion_update(&profile(5, false, Some(dec), 20), jan);
        assert_eq!(upd.streak_weeks, 6);
    }

    #[test]
    fn freeze_covers_a_ten_day_gap_once() {
        let now = Utc::now();
        let last = now - Duration::days(10);
        let upd = completion_update(&profile(2, false, Some(last), 8), now);
        assert_eq!(upd.streak_weeks, 3);
        assert!(upd.streak_freeze_used);
    }

    #[test]
    fn used_freeze_means_long_gap_resets() {
        let now = Utc::now();
        let last = now - Duration::days(10);
        let upd = completion_update(&profile(5, true, Some(last), 8), now);
        assert_eq!(upd.streak_weeks, 1);
        // Reset hands the freeze back for the next cycle.
        assert!(!upd.streak_freeze_used);
    }

    #[test]
    fn gap_over_two_weeks_resets_regardless_of_freeze() {
        let now = Utc::now();
        let last = now - Duration::days(20);
        for freeze in [false, true] {
            let upd = completion_update(&profile(7, freeze, Some(last), 30), now);
            assert_eq!(upd.streak_weeks, 1);
            assert!(!upd.streak_freeze_used);
        }
    }

    #[test]
    fn twelve_week_streak_milestone() {
        let fri = Utc.with_ymd_and_hms(2026, 8, 21, 18, 0, 0).unwrap();
        let mon = Utc.with_ymd_and_hms(2026, 8, 24, 7, 0, 0).unwrap();
        let upd = completion_update(&profile(11, false, Some(fri), 40), mon);
        assert_eq!(upd.streak_weeks, 12);
        assert_eq!(upd.milestone, Some(Milestone::ThreeMonths));
    }

    #[test]
    fn come_back_after_long_absence_with_zeroed_streak() {
        let now = Utc::now();
        let last = now - Duration::days(30);
        let upd = completion_update(&profile(0, false, Some(last), 5), now);
        assert_eq!(upd.streak_weeks, 1);
        assert_eq!(upd.milestone, Some(Milestone::ComeBack));
    }

    //
    // PR celebration wiring
    //

    #[tokio::test]
    async fn pr_celebration_suppressed_on_first_workout() {
        let store = Store::new(crate::db::open_in_memory().await.unwrap());
        let mut p = profile(0, false, None, 0);
        store.create_profile(&p).await.unwrap();

        let out = record_set_progress(&store, &mut p, "ex1", 40.0, 10)
            .await
            .unwrap();
        assert!(out.record.is_some());
        assert!(!out.celebrated);
        assert!(out.milestone.is_none());
        assert!(!p.first_pr_celebrated);
    }

    #[tokio::test]
    async fn first_celebrated_pr_raises_milestone_exactly_once() {
        let store = Store::new(crate::db::open_in_memory().await.unwrap());
        let mut p = profile(1, false, Some(Utc::now()), 1);
        store.create_profile(&p).await.unwrap();

        let first = record_set_progress(&store, &mut p, "ex1", 40.0, 10)
            .await
            .unwrap();
        assert!(first.celebrated);
        assert_eq!(first.milestone, Some(Milestone::FirstPr));

        let second = record_set_progress(&store, &mut p, "ex1", 45.0, 10)
            .await
            .unwrap();
        assert!(second.celebrated);
        assert!(second.milestone.is_none());

        // The flag survives a reload.
        let reloaded = store.get_profile().await.unwrap().unwrap();
        assert!(reloaded.first_pr_celebrated);
    }

    #[tokio::test]
    async fn non_improving_set_writes_nothing() {
        let store = Store::new(crate::db::open_in_memory().await.unwrap());
        let mut p = profile(1, false, Some(Utc::now()), 1);
        store.create_profile(&p).await.unwrap();

        record_set_progress(&store, &mut p, "ex1", 40.0, 10)
            .await
            .unwrap();
        let out = record_set_progress(&store, &mut p, "ex1", 35.0, 8)
            .await
            .unwrap();
        assert!(out.record.is_none());
        assert_eq!(
            store.list_progress_records(Some("ex1")).await.unwrap().len(),
            1
        );
    }
}
