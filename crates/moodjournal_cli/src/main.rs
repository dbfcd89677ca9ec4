//! Command-line front end for the mood journal.
//!
//! # Responsibility
//! - Map subcommands onto `moodjournal_core` use-cases.
//! - Render the trend, headline metric and reflection as plain text.
//! - Report corrupted or partially loaded journals instead of hiding them.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use moodjournal_core::db::open_db;
use moodjournal_core::{
    init_logging, CsvEntryRepository, EntryRepository, EntryStore, JournalConfig, JournalEntry,
    JournalService, JournalSession, LoadPolicy, MoodDashboard, Reflection, SentimentOutcome,
    SentimentScorer, SqliteEntryRepository, StorageBackend,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const BAR_GLYPH_POSITIVE: char = '+';
const BAR_GLYPH_NEGATIVE: char = '-';

#[derive(Debug, Parser)]
#[command(name = "moodjournal", version, about = "A calm space to track your daily mood")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Journal file (CSV) or database (SQLite).
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[arg(long, value_enum, global = true)]
    backend: Option<BackendArg>,
    /// Load readable records even if some are corrupted, listing the rest.
    #[arg(long, global = true)]
    skip_invalid: bool,
    /// JSON lexicon replacing the built-in word lists.
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Csv,
    Sqlite,
}

impl From<BackendArg> for StorageBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Csv => Self::Csv,
            BackendArg::Sqlite => Self::Sqlite,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save today's (or a given day's) entry, replacing any entry for that date.
    Log(LogArgs),
    /// Show the mood index over time.
    Trend,
    /// Show the latest entry and feedback on its text.
    Reflect,
    /// Score arbitrary text without touching the journal.
    Score {
        #[arg(required = true)]
        text: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct LogArgs {
    /// Entry date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// -5 = very low, +5 = very positive.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    positivity: i32,
    /// 0 = calm, 10 = extremely stressed.
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    stress: i32,
    /// 0 = exhausted, 10 = full of energy.
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    energy: i32,
    /// What happened today? (optional)
    #[arg(long, default_value = "")]
    description: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }
    let scorer = SentimentScorer::new(config.lexicon()?);
    let data_path = config.resolved_data_path();
    info!(
        "event=cli_start module=cli status=ok backend={:?} data={} lexicon={}",
        config.backend,
        data_path.display(),
        scorer.lexicon().version()
    );

    match config.backend {
        StorageBackend::Csv => {
            let repo = CsvEntryRepository::new(&data_path);
            let store = EntryStore::with_policy(repo, config.load_policy);
            execute(JournalService::new(store, scorer), cli.command)
        }
        StorageBackend::Sqlite => {
            let mut conn = open_db(&data_path)?;
            let repo = SqliteEntryRepository::try_new(&mut conn)?;
            let store = EntryStore::with_policy(repo, config.load_policy);
            execute(JournalService::new(store, scorer), cli.command)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<JournalConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => JournalConfig::load(path)?,
        None => JournalConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_path = Some(data.clone());
    }
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    if cli.skip_invalid {
        config.load_policy = LoadPolicy::SkipInvalid;
    }
    if let Some(lexicon) = &cli.lexicon {
        config.lexicon_path = Some(lexicon.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn execute<R: EntryRepository>(
    mut service: JournalService<R>,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    if let Command::Score { text } = &command {
        print_outcome(service.scorer().score(&text.join(" ")));
        return Ok(());
    }

    let session = service.open_session()?;
    report_load_problems(&session);

    match command {
        Command::Log(args) => {
            let date = args.date.unwrap_or_else(|| Local::now().date_naive());
            let entry = JournalEntry::new(
                date,
                args.positivity,
                args.stress,
                args.energy,
                args.description,
            )?;
            let session = service.submit(&session, entry)?;
            println!("Your entry for {date} has been saved.");
            report_dropped(&session);
            print_summary(&service.dashboard(&session));
        }
        Command::Trend => {
            let dashboard = service.dashboard(&session);
            if dashboard.points.is_empty() {
                println!("No entries yet. Log your first day with `moodjournal log`.");
                return Ok(());
            }
            print_trend(&dashboard);
            print_summary(&dashboard);
        }
        Command::Reflect => match service.dashboard(&session).reflection {
            Some(reflection) => print_reflection(&session, &reflection),
            None => println!("No entries yet. Log your first day with `moodjournal log`."),
        },
        Command::Score { .. } => {}
    }
    Ok(())
}

fn report_load_problems(session: &JournalSession) {
    if let Some(err) = session.corruption() {
        eprintln!("warning: {err}");
        eprintln!("warning: showing an empty journal; the stored data was left untouched");
    }
    for issue in session.skipped() {
        eprintln!("warning: skipped {issue}");
    }
}

fn report_dropped(session: &JournalSession) {
    if session.dropped().is_empty() {
        return;
    }
    eprintln!(
        "warning: removed {} unreadable record(s) from storage:",
        session.dropped().len()
    );
    for issue in session.dropped() {
        eprintln!("warning:   {issue}");
    }
}

fn print_trend(dashboard: &MoodDashboard) {
    println!("Overall mood over time (0 = neutral)");
    for point in &dashboard.points {
        println!(
            "{}  {:>6.1}  {}",
            point.date.format("%b %d %Y"),
            point.mood_index,
            bar(point.mood_index)
        );
    }
}

fn bar(value: f64) -> String {
    let glyph = if value < 0.0 {
        BAR_GLYPH_NEGATIVE
    } else {
        BAR_GLYPH_POSITIVE
    };
    let width = value.abs().round() as usize;
    std::iter::repeat(glyph).take(width).collect()
}

fn print_summary(dashboard: &MoodDashboard) {
    let Some(summary) = dashboard.summary else {
        return;
    };
    match summary.delta {
        Some(delta) => println!("Latest mood index: {:.1} (change {:+.1})", summary.latest, delta),
        None => println!("Latest mood index: {:.1}", summary.latest),
    }
}

fn print_reflection(session: &JournalSession, reflection: &Reflection) {
    println!("Reflection for {}", reflection.date);
    println!("{}", reflection.feedback.headline);
    if !reflection.feedback.detail.is_empty() {
        println!("{}", reflection.feedback.detail);
    }
    let text = session
        .latest()
        .map(|entry| entry.description.as_str())
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("No description added.");
    println!();
    println!("{text}");
}

fn print_outcome(outcome: SentimentOutcome) {
    match outcome {
        SentimentOutcome::Empty => println!("empty"),
        SentimentOutcome::Scored { score, label } => println!("{label} ({score:+})"),
    }
}

#[cfg(test)]
mod tests {
    use super::{bar, resolve_config, Cli};
    use clap::Parser;
    use moodjournal_core::{LoadPolicy, StorageBackend};

    #[test]
    fn bar_width_tracks_magnitude_and_sign() {
        assert_eq!(bar(3.0), "+++");
        assert_eq!(bar(-2.0), "--");
        assert_eq!(bar(0.0), "");
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "moodjournal",
            "--backend",
            "sqlite",
            "--data",
            "journal.db",
            "--skip-invalid",
            "trend",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(config.load_policy, LoadPolicy::SkipInvalid);
        assert_eq!(config.resolved_data_path().to_str(), Some("journal.db"));
    }

    #[test]
    fn sqlite_backend_without_data_uses_database_default() {
        let cli = Cli::try_parse_from(["moodjournal", "--backend", "sqlite", "trend"]).unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.resolved_data_path().to_str(), Some("mood_data.db"));
    }

    #[test]
    fn log_accepts_negative_positivity() {
        let cli = Cli::try_parse_from([
            "moodjournal",
            "log",
            "--date",
            "2024-03-01",
            "--positivity",
            "-3",
        ])
        .unwrap();
        match cli.command {
            super::Command::Log(args) => {
                assert_eq!(args.positivity, -3);
                assert_eq!(args.stress, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
