use clap::{Args, Parser, Subcommand};

use crate::types::{Difficulty, Equipment, Goal, MuscleGroup};

#[derive(Parser)]
#[command(name = "gymsprout", version, about = "CLI workout buddy")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create your profile from the onboarding quiz result
    Onboard(OnboardArgs),

    /// Workout-session commands
    #[command(subcommand, visible_alias = "w")]
    Workout(WorkoutCmd),

    /// Exercise library management
    #[command(subcommand, visible_alias = "ex")]
    Exercise(ExerciseCmd),

    /// Show streak, totals and recent personal records
    #[command(visible_alias = "st")]
    Status,

    /// View or edit gymsprout settings
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Db operations
    #[command(subcommand)]
    Db(DbCmd),
}

#[derive(Args)]
pub struct OnboardArgs {
    /// Your name
    #[arg(long)]
    pub name: String,

    /// Quiz score (0-10), decides your experience level
    #[arg(long)]
    pub score: u32,

    /// Primary training goal
    #[arg(long)]
    pub goal: Goal,

    /// Replace an existing profile (quiz retake)
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum WorkoutCmd {
    /// Start a workout for one or more muscle groups
    #[command(visible_alias = "s")]
    Start {
        /// Target muscle groups
        #[arg(value_name = "MUSCLE", required = true)]
        muscles: Vec<MuscleGroup>,
    },

    /// Show the current workout
    #[command(visible_alias = "i")]
    Show,

    /// Log a set - Usage: workout log EXERCISE WEIGHT REPS
    #[command(visible_alias = "l")]
    #[command(override_usage = "workout log <EXERCISE> <WEIGHT> <REPS>")]
    Log {
        /// Exercise index (as shown in `workout show`)
        #[arg(value_name = "EXERCISE")]
        exercise: usize,

        /// Weight in kg (negative values clamp to 0)
        #[arg(value_name = "WEIGHT")]
        weight: f64,

        /// Number of reps (at least 1)
        #[arg(value_name = "REPS")]
        reps: i64,
    },

    /// Rate how the last set of an exercise felt (1=too easy .. 5=maximum)
    #[command(visible_alias = "r")]
    Rate {
        /// Exercise index
        #[arg(value_name = "EXERCISE")]
        exercise: usize,

        /// Difficulty rating 1-5
        #[arg(value_name = "RATING")]
        rating: u8,
    },

    /// Add an exercise to the current workout
    AddEx {
        /// Exercise index (from `ex list`) or exact name
        exercise: String,
    },

    /// Run a rest countdown (defaults to your goal's rest time)
    Rest {
        /// Seconds to count down
        #[arg(value_name = "SECONDS")]
        seconds: Option<u32>,
    },

    /// Finish the current workout
    #[command(visible_alias = "f")]
    Finish,

    /// Discard the current workout and its sets
    #[command(visible_alias = "d")]
    Discard {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExerciseCmd {
    /// Add a custom exercise
    #[command(visible_alias = "a")]
    Add {
        /// Exercise name
        name: String,

        /// Muscle group
        #[arg(short, long)]
        muscle: String,

        /// Equipment used
        #[arg(short, long, value_enum, default_value_t = Equipment::None)]
        equipment: Equipment,

        /// Difficulty tier
        #[arg(short, long, value_enum, default_value_t = Difficulty::Beginner)]
        difficulty: Difficulty,

        /// Goal tags (fat_loss, hypertrophy, strength, general, endurance)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
    },

    /// List exercises
    #[command(visible_alias = "l")]
    List {
        /// Filter by muscle group
        #[arg(short, long)]
        muscle: Option<String>,
    },

    /// Import exercises from a TOML file
    #[command(visible_alias = "i")]
    Import {
        /// Path to TOML file
        file: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum DbCmd {
    /// Irreversibly wipe every table (profile, workouts, records, catalog)
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
