use clap::{Args, Parser, Subcommand};
use recur_core::calendar::DayOfWeek;
use recur_core::rule::IntervalUnit;
use std::path::PathBuf;

/// Preview recurrence rules and reschedule recurring tasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the next occurrence of a rule
    Next(NextCommand),
    /// List upcoming occurrences of a rule
    Preview(PreviewCommand),
    /// Validate a rule and print it in readable form
    Describe(DescribeCommand),
    /// Complete a task and draft its next instance
    Complete(CompleteCommand),
}

/// A rule given either as a file or through shorthand flags
#[derive(Args, Debug, Clone)]
pub struct RuleArgs {
    /// Rule file (TOML or JSON)
    #[arg(
        long,
        conflicts_with_all = ["every", "interval", "on", "day", "nth", "until", "count"]
    )]
    pub rule: Option<PathBuf>,

    /// Interval unit (minute, hour, day, week, month, quarter, half_year, year)
    #[arg(long, required_unless_present = "rule")]
    pub every: Option<IntervalUnit>,

    /// Number of units between occurrences
    #[arg(long)]
    pub interval: Option<i64>,

    /// Days of week for weekly rules (mon,tue,wed,thu,fri,sat,sun)
    #[arg(long, value_delimiter = ',')]
    pub on: Vec<DayOfWeek>,

    /// Day of month for monthly rules
    #[arg(long, conflicts_with = "nth")]
    pub day: Option<u32>,

    /// Nth weekday for monthly rules (e.g. 'second:sunday', 'last:fri')
    #[arg(long)]
    pub nth: Option<String>,

    /// Last date occurrences may fall on (e.g. '2025-12-31')
    #[arg(long)]
    pub until: Option<String>,

    /// Maximum number of occurrences
    #[arg(long)]
    pub count: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct NextCommand {
    #[command(flatten)]
    pub rule: RuleArgs,

    /// Base date (defaults to now)
    #[arg(long)]
    pub from: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    #[command(flatten)]
    pub rule: RuleArgs,

    /// Base date (defaults to now)
    #[arg(long)]
    pub from: Option<String>,

    /// How many occurrences to list (defaults to the configured preview_count)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct DescribeCommand {
    #[command(flatten)]
    pub rule: RuleArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct CompleteCommand {
    /// Task file (TOML or JSON)
    #[arg(long)]
    pub task: PathBuf,

    /// Completion time (defaults to now)
    #[arg(long)]
    pub now: Option<String>,
}
