//! `afk` — turn an away phrase into a start/end time range.
//!
//! ```text
//! $ afk --utc-offset +05:30 afk from 4pm for 1 hr
//! 2024-03-15T16:00:00+05:30	2024-03-15T17:00:00+05:30
//! ```

use afk_engine::{parse_utc_offset, resolve_with, EnglishExtractor, TimeRange};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "afk",
    version,
    about = "Turn an away phrase into a start/end time range"
)]
struct Cli {
    /// UTC offset as seconds ("19800") or "+HH:MM"
    #[arg(
        long,
        env = "AFK_UTC_OFFSET",
        default_value = "0",
        allow_hyphen_values = true
    )]
    utc_offset: String,

    /// Reference instant (RFC 3339) instead of the system clock
    #[arg(long)]
    now: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log more (-v info, -vv debug); otherwise RUST_LOG applies
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// The phrase, e.g. `afk for 2 hours`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    phrase: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `start<TAB>end`, RFC 3339
    Text,
    /// `{"start": ..., "end": ...}`
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let phrase = cli.phrase.join(" ");
    let offset = parse_utc_offset(&cli.utc_offset).context("invalid --utc-offset")?;
    let now = match cli.now.as_deref() {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid --now value '{s}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let reference = now.with_timezone(&offset);
    tracing::debug!(%phrase, %reference, "resolving");

    let range = resolve_with(&EnglishExtractor::new(), &phrase, &reference)
        .with_context(|| format!("could not resolve '{phrase}'"))?;

    println!("{}", render(&range, cli.format)?);
    Ok(())
}

fn render(range: &TimeRange, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(range.to_string()),
        OutputFormat::Json => serde_json::to_string(range).context("failed to encode range"),
    }
}

/// Log to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
