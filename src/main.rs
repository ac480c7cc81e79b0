mod calc;
mod cmd;
mod data;
mod error;

use calc::RankingMode;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ptoplan", about = "plan time off around weekends and holidays")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize data files with sample settings
    Init,
    /// Suggest leave days that bridge weekends and holidays
    Suggest {
        /// Leave days to plan with (default: projected balance as of today)
        #[arg(short, long)]
        budget: Option<f64>,
        /// Ranking mode: efficiency, longest, earliest or least-pto
        #[arg(short, long)]
        mode: Option<RankingMode>,
        /// Maximum number of breaks to suggest
        #[arg(long)]
        max_suggestions: Option<u32>,
        /// Earliest break start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest break end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Show the leave balance as of a date
    Balance {
        /// Target date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Number of months to forecast after the target date
        #[arg(long, default_value_t = 6)]
        forecast: u32,
    },
    /// Book leave on every working day in a date range
    Book {
        /// First day (YYYY-MM-DD)
        from: NaiveDate,
        /// Last day (YYYY-MM-DD, default: same as first day)
        to: Option<NaiveDate>,
        /// Amount per day in the tracking unit (default: one day)
        #[arg(short, long)]
        amount: Option<f64>,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List all booked leave
    Leave,
    /// List all holidays
    Holidays,
    /// List all accrual rules
    Rules,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    match cli.command {
        None => cmd::suggest::run(&cmd::suggest::SuggestOptions::default()),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Suggest {
            budget,
            mode,
            max_suggestions,
            from,
            to,
        }) => cmd::suggest::run(&cmd::suggest::SuggestOptions {
            budget,
            mode,
            max_suggestions,
            from,
            to,
        }),
        Some(Commands::Balance { date, forecast }) => cmd::balance::run(date, forecast),
        Some(Commands::Book {
            from,
            to,
            amount,
            note,
        }) => cmd::leave::book(from, to, amount, note.as_deref()),
        Some(Commands::Leave) => cmd::leave::run(),
        Some(Commands::Holidays) => cmd::holidays::run(),
        Some(Commands::Rules) => cmd::rules::run(),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
