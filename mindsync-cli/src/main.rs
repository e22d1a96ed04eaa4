use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use mindsync_core::{
    parse_timezone, Classifier, DayStart, EmotionClassifier, Pipeline, PlanOutcome, RawTask,
    Strategy,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

mod calendar;
mod config;
mod state;

use config::Config;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MINDSYNC_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "mindsync", version = VERSION, about = "Emotion-aware day scheduler")]
struct Cli {
    /// Log at debug level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the mood of a piece of text
    Classify {
        /// Text describing how you feel
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a time-blocked schedule from a mood and a task list
    Plan {
        /// How are you feeling today?
        #[arg(long, default_value = "")]
        mood: String,

        /// Task as NAME=H:MM, NAME=1h30m or NAME=45m (repeatable)
        #[arg(long = "task", value_name = "SPEC")]
        tasks: Vec<String>,

        /// JSON array of {"name", "hours", "minutes"} rows
        #[arg(long)]
        tasks_file: Option<PathBuf>,

        /// Day start as HH:MM (default: config schedule.start)
        #[arg(long)]
        start: Option<String>,

        /// Minutes between tasks (default: config schedule.gap_minutes)
        #[arg(long, allow_negative_numbers = true)]
        gap: Option<i64>,

        /// Date to schedule, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Override the mood-derived ordering
        #[arg(long)]
        strategy: Option<Strategy>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Don't overwrite the saved schedule
        #[arg(long)]
        no_save: bool,
    },

    /// Export the last saved schedule
    Calendar {
        #[command(subcommand)]
        command: CalendarCommand,
    },

    /// Manage ~/.mindsync/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CalendarCommand {
    /// Write the saved schedule as an .ics file (stdout by default)
    ExportIcs {
        /// Convert times to UTC from this IANA zone; floating local times if omitted
        #[arg(long)]
        tz: Option<String>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print remote calendar insert bodies for the saved schedule
    Payload {
        /// IANA zone (default: config schedule.timezone)
        #[arg(long)]
        tz: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Ics,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config();
    init_logging(match (&cfg, cli.verbose) {
        (_, true) => "debug",
        (Ok(c), false) => c.logging.level.as_str(),
        (Err(_), false) => "warn",
    });

    match cli.command {
        Command::Classify { text, json } => {
            let cfg = cfg?;
            let classifier = Classifier::probe(cfg.classifier.model_path.as_deref());
            let r = classifier.classify(&text.join(" "));
            if json {
                println!("{}", serde_json::to_string_pretty(&r)?);
            } else {
                println!(
                    "Detected mood: {} {} ({}%)",
                    r.friendly_name,
                    r.icon,
                    r.confidence_percent()
                );
                println!("{}", r.motivation());
            }
        }

        Command::Plan {
            mood,
            tasks,
            tasks_file,
            start,
            gap,
            date,
            strategy,
            format,
            no_save,
        } => {
            let cfg = cfg?;
            cfg.validate()?;

            let raw = collect_tasks(tasks_file.as_deref(), &tasks)?;
            if raw.is_empty() {
                warn!("no tasks given; add --task \"Name=H:MM\" or --tasks-file tasks.json");
            }

            let start = start.as_deref().unwrap_or(&cfg.schedule.start);
            let start: DayStart = start.parse()?;
            let gap = gap.unwrap_or(cfg.schedule.gap_minutes);
            let day = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            let classifier = Classifier::probe(cfg.classifier.model_path.as_deref());
            debug!(kind = classifier.kind(), "classifier selected");
            let pipeline = Pipeline::new(classifier, day);

            let outcome = match strategy {
                Some(s) => pipeline.run_with_strategy(&mood, &raw, start, gap, s)?,
                None => pipeline.run(&mood, &raw, start, gap)?,
            };

            print_outcome(&outcome, format, &cfg)?;

            if !no_save {
                let p = state::schedule_path()?;
                state::write_schedule(&p, &state::SavedSchedule::new(outcome))?;
                debug!(path = %p.display(), "schedule saved");
            }
        }

        Command::Calendar { command } => {
            let saved = state::read_schedule(&state::schedule_path()?)?;
            let events = &saved.outcome.events;

            match command {
                CalendarCommand::ExportIcs { tz, out } => {
                    let tz = tz.as_deref().map(parse_timezone).transpose()?;
                    let ics = calendar::events_to_ics(events, tz)?;
                    match out {
                        Some(p) => {
                            fs::write(&p, ics).with_context(|| format!("write {}", p.display()))?;
                            println!("Wrote {} events to {}", events.len(), p.display());
                        }
                        None => print!("{}", ics),
                    }
                }
                CalendarCommand::Payload { tz } => {
                    let tz = match tz {
                        Some(tz) => tz,
                        None => cfg?.schedule.timezone,
                    };
                    let payloads = calendar::remote_payloads(events, &tz)?;
                    println!("{}", serde_json::to_string_pretty(&payloads)?);
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = cfg?;
                println!("# {}", config::config_path()?.display());
                if let Err(e) = cfg.validate() {
                    println!("# invalid: {e:#}");
                }
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// Rows from the JSON file first, then `--task` specs, in order.
fn collect_tasks(file: Option<&Path>, specs: &[String]) -> Result<Vec<RawTask>> {
    let mut raw: Vec<RawTask> = match file {
        Some(p) => {
            let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?
        }
        None => Vec::new(),
    };

    for spec in specs {
        raw.push(RawTask::parse_spec(spec)?);
    }
    Ok(raw)
}

fn print_outcome(outcome: &PlanOutcome, format: OutputFormat, cfg: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Ics => {
            let tz = parse_timezone(&cfg.schedule.timezone)?;
            print!("{}", calendar::events_to_ics(&outcome.events, Some(tz))?);
        }
        OutputFormat::Table => {
            let e = &outcome.emotion;
            println!(
                "Detected mood: {} {} ({}%)",
                e.friendly_name,
                e.icon,
                e.confidence_percent()
            );
            println!("{}", e.motivation());
            println!("Strategy: {} ({})\n", outcome.strategy, outcome.strategy.announcement());
            print!("{}", calendar::render_agenda(&outcome.events));
        }
    }
    Ok(())
}

/// Logs go to stderr so JSON/ICS output on stdout stays clean.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("mindsync={level},mindsync_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
