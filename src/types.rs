use once_cell::sync::Lazy;
use std::{collections::HashSet, fmt::Display, str::FromStr};
use strsim::jaro_winkler;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Legs,
    Glutes,
    Core,
    Calves,
    FullBody,
    Cardio,
}

impl Display for MuscleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Triceps => "triceps",
            Self::Legs => "legs",
            Self::Glutes => "glutes",
            Self::Core => "core",
            Self::Calves => "calves",
            Self::FullBody => "full_body",
            Self::Cardio => "cardio",
        };

        write!(f, "{}", s)
    }
}

impl FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chest" => Ok(Self::Chest),
            "back" => Ok(Self::Back),
            "shoulders" => Ok(Self::Shoulders),
            "biceps" => Ok(Self::Biceps),
            "triceps" => Ok(Self::Triceps),
            "legs" => Ok(Self::Legs),
            "glutes" => Ok(Self::Glutes),
            "core" => Ok(Self::Core),
            "calves" => Ok(Self::Calves),
            "full_body" => Ok(Self::FullBody),
            "cardio" => Ok(Self::Cardio),
            _ => Err(format!("unknown muscle group: {s}")),
        }
    }
}

pub static ALLOWED_MUSCLE_GROUPS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "chest",
        "back",
        "shoulders",
        "biceps",
        "triceps",
        "legs",
        "glutes",
        "core",
        "calves",
        "full_body",
        "cardio",
    ])
});

/// Returns the canonical muscle group or `None` if the name is not allowed.
pub fn canonical_muscle_group<S: AsRef<str>>(m: S) -> Option<MuscleGroup> {
    let lowered = m.as_ref().trim().to_ascii_lowercase();
    <MuscleGroup as FromStr>::from_str(&lowered).ok()
}

/// Return the closest allowed muscle group for `input`
/// if similarity ≥ 0.80 *and* clearly better than the runner-up.
/// Otherwise return `None` (no suggestion shown).
pub fn best_muscle_group_suggestion(input: &str) -> Option<&'static str> {
    let inp = input.to_ascii_lowercase();
    if inp.trim().is_empty() {
        return None;
    }

    // Collect (muscle group, score) pairs.
    let mut scores: Vec<(&'static str, f64)> = ALLOWED_MUSCLE_GROUPS
        .iter()
        .copied()
        .map(|m| (m, jaro_winkler(&inp, m)))
        .collect();

    // Highest score first.
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (best, best_score) = scores[0];
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Bodyweight,
    Machine,
    Cable,
    Dumbbells,
    Barbell,
    Kettlebell,
    ResistanceBand,
    Other,
    None,
}

impl Display for Equipment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Bodyweight => "bodyweight",
            Self::Machine => "machine",
            Self::Cable => "cable",
            Self::Dumbbells => "dumbbells",
            Self::Barbell => "barbell",
            Self::Kettlebell => "kettlebell",
            Self::ResistanceBand => "resistance_band",
            Self::Other => "other",
            Self::None => "none",
        };

        write!(f, "{}", s)
    }
}

impl FromStr for Equipment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bodyweight" => Ok(Self::Bodyweight),
            "machine" => Ok(Self::Machine),
            "cable" => Ok(Self::Cable),
            "dumbbells" => Ok(Self::Dumbbells),
            "barbell" => Ok(Self::Barbell),
            "kettlebell" => Ok(Self::Kettlebell),
            "resistance_band" => Ok(Self::ResistanceBand),
            "other" => Ok(Self::Other),
            "none" => Ok(Self::None),
            _ => Err(format!("unknown equipment: {s}")),
        }
    }
}

impl Equipment {
    /// Beginner equipment preference tier: lower sorts first.
    /// Anything outside the explicit ladder ranks alongside dumbbells.
    pub fn beginner_tier(self) -> u8 {
        match self {
            Self::Bodyweight | Self::None => 0,
            Self::Machine => 1,
            Self::Cable => 2,
            Self::Dumbbells => 3,
            Self::Barbell => 4,
            Self::Kettlebell | Self::ResistanceBand | Self::Other => 3,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Deserialize, Type,
)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };

        write!(f, "{}", s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("unknown difficulty: {s}")),
        }
    }
}

/// Experience level shares the beginner/intermediate/advanced ladder.
pub type Level = Difficulty;

impl Difficulty {
    /// Difficulty inclusion policy for a user level: each level trains at
    /// its own tier and every tier below it.
    pub fn allows(self, difficulty: Difficulty) -> bool {
        difficulty <= self
    }

    /// Quiz score → experience level. The quiz caps its score at 10.
    pub fn from_quiz_score(score: u32) -> Self {
        let score = score.min(10);
        if score <= 4 {
            Self::Beginner
        } else if score <= 7 {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    FatLoss,
    BuildMuscle,
    GetStrong,
    GeneralFitness,
    BuildEndurance,
}

impl Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FatLoss => "Fat Loss",
            Self::BuildMuscle => "Build Muscle",
            Self::GetStrong => "Get Strong",
            Self::GeneralFitness => "General Fitness",
            Self::BuildEndurance => "Build Endurance",
        };

        write!(f, "{}", s)
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fat-loss" => Ok(Self::FatLoss),
            "build-muscle" => Ok(Self::BuildMuscle),
            "get-strong" => Ok(Self::GetStrong),
            "general-fitness" => Ok(Self::GeneralFitness),
            "build-endurance" => Ok(Self::BuildEndurance),
            _ => Err(format!("unknown goal: {s}")),
        }
    }
}

impl Goal {
    /// The goal tag exercises are matched against for this goal.
    pub fn tag(self) -> GoalTag {
        match self {
            Self::FatLoss => GoalTag::FatLoss,
            Self::BuildMuscle => GoalTag::Hypertrophy,
            Self::GetStrong => GoalTag::Strength,
            Self::GeneralFitness => GoalTag::General,
            Self::BuildEndurance => GoalTag::Endurance,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTag {
    FatLoss,
    Hypertrophy,
    Strength,
    General,
    Endurance,
}

impl Display for GoalTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FatLoss => "fat_loss",
            Self::Hypertrophy => "hypertrophy",
            Self::Strength => "strength",
            Self::General => "general",
            Self::Endurance => "endurance",
        };

        write!(f, "{}", s)
    }
}

impl FromStr for GoalTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fat_loss" => Ok(Self::FatLoss),
            "hypertrophy" => Ok(Self::Hypertrophy),
            "strength" => Ok(Self::Strength),
            "general" => Ok(Self::General),
            "endurance" => Ok(Self::Endurance),
            _ => Err(format!("unknown goal tag: {s}")),
        }
    }
}

/// Milestones surfaced at most once per workout completion, plus the
/// independent first-PR celebration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Milestone {
    FirstWorkout,
    ComeBack,
    FirstMonth,
    ThreeMonths,
    FirstPr,
}

impl Milestone {
    pub fn headline(self) -> &'static str {
        match self {
            Self::FirstWorkout => "First workout done! The hardest part is behind you.",
            Self::ComeBack => "Welcome back! Showing up again is what counts.",
            Self::FirstMonth => "Four-week streak! You've built a real habit.",
            Self::ThreeMonths => "Twelve-week streak! Consistency is your superpower.",
            Self::FirstPr => "First personal record on the books!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_inclusion_ladder() {
        assert!(Difficulty::Beginner.allows(Difficulty::Beginner));
        assert!(!Difficulty::Beginner.allows(Difficulty::Intermediate));
        assert!(Difficulty::Intermediate.allows(Difficulty::Beginner));
        assert!(!Difficulty::Intermediate.allows(Difficulty::Advanced));
        assert!(Difficulty::Advanced.allows(Difficulty::Beginner));
        assert!(Difficulty::Advanced.allows(Difficulty::Advanced));
    }

    #[test]
    fn quiz_score_classification() {
        assert_eq!(Difficulty::from_quiz_score(0), Difficulty::Beginner);
        assert_eq!(Difficulty::from_quiz_score(4), Difficulty::Beginner);
        assert_eq!(Difficulty::from_quiz_score(5), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_quiz_score(7), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_quiz_score(8), Difficulty::Advanced);
        // Raw scores above the quiz cap clamp down before classification.
        assert_eq!(Difficulty::from_quiz_score(12), Difficulty::Advanced);
    }

    #[test]
    fn goal_maps_to_tag() {
        assert_eq!(Goal::FatLoss.tag(), GoalTag::FatLoss);
        assert_eq!(Goal::BuildMuscle.tag(), GoalTag::Hypertrophy);
        assert_eq!(Goal::GetStrong.tag(), GoalTag::Strength);
        assert_eq!(Goal::GeneralFitness.tag(), GoalTag::General);
        assert_eq!(Goal::BuildEndurance.tag(), GoalTag::Endurance);
    }

    #[test]
    fn beginner_equipment_tiers() {
        assert_eq!(Equipment::Bodyweight.beginner_tier(), 0);
        assert_eq!(Equipment::None.beginner_tier(), 0);
        assert_eq!(Equipment::Machine.beginner_tier(), 1);
        assert_eq!(Equipment::Cable.beginner_tier(), 2);
        assert_eq!(Equipment::Barbell.beginner_tier(), 4);
        // Off-ladder equipment ranks with dumbbells.
        assert_eq!(Equipment::Kettlebell.beginner_tier(), 3);
    }

    #[test]
    fn muscle_group_round_trip() {
        for name in ALLOWED_MUSCLE_GROUPS.iter() {
            let mg = canonical_muscle_group(name).unwrap();
            assert_eq!(mg.to_string(), *name);
        }
        assert!(canonical_muscle_group("quadzilla").is_none());
    }

    #[test]
    fn muscle_group_typo_suggestion() {
        assert_eq!(best_muscle_group_suggestion("chst"), Some("chest"));
        assert_eq!(best_muscle_group_suggestion("glutez"), Some("glutes"));
        assert_eq!(best_muscle_group_suggestion("zzz"), None);
    }
}
