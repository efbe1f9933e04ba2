use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mutabaah", version, author, about = "A terminal companion for tracking daily prayer observance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// First-run setup (location, timezone, backend, calculation method)
    Setup {
        /// Reset existing configuration
        #[arg(long)]
        reset: bool,
    },
    /// Show today's prayer times and countdown to next prayer
    Times,
    /// Show today's schedule with recorded statuses
    Today,
    /// Check a prayer: classify it against the current moment and record it
    Check {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
    },
    /// Show this month's recorded prayers
    Month {
        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month to show, 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },
}
