use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use clap::Parser;
use std::io::{self, BufRead, BufReader, Write};
use tokio::time::Instant;
use tracing::{error, info, warn};

use storyline::config::{Config, ResolveOptions};
use storyline::logging::configure_logging;
use storyline::{Database, IncomingArticle, StoryResolver};

/// Resolves a batch of articles into stories.
///
/// Reads one JSON article per line from a file (or stdin), resolves each and
/// prints one JSON decision per line on stdout. Lines that fail are logged and
/// counted; processing continues.
///
/// Usage:
///    cargo run --bin ingest_articles -- articles.ndjson
///    cat articles.ndjson | cargo run --bin ingest_articles
#[derive(Parser)]
#[clap(name = "ingest-articles", about = "Resolve articles into stories")]
struct Cli {
    /// Newline-delimited JSON input; stdin when omitted
    input: Option<String>,

    /// Override the configured database path
    #[clap(short, long)]
    database: Option<String>,

    /// Recency window in hours (STORY_RECENCY_HOURS)
    #[clap(long)]
    recency_hours: Option<i64>,

    /// Trigram weight (STORY_W_TRGM)
    #[clap(long)]
    w_trgm: Option<f64>,

    /// Full-text weight (STORY_W_FT)
    #[clap(long)]
    w_ft: Option<f64>,

    /// Trigram floor (STORY_MIN_TRGM)
    #[clap(long)]
    min_trgm: Option<f64>,

    /// Raw full-text floor (STORY_MIN_TS)
    #[clap(long)]
    min_ts: Option<f64>,

    /// Combined score needed to join a story (STORY_MIN_SCORE)
    #[clap(long)]
    min_score: Option<f64>,

    /// Candidate stories needed before full-text normalization (STORY_MIN_CANDIDATES)
    #[clap(long)]
    min_candidates: Option<usize>,
}

impl Cli {
    /// Flags given on the command line win over the environment.
    fn apply_overrides(&self, options: &mut ResolveOptions) -> Result<()> {
        if let Some(hours) = self.recency_hours {
            options.recency_window = Duration::try_hours(hours)
                .ok_or_else(|| anyhow!("--recency-hours {} is out of range", hours))?;
        }
        if let Some(value) = self.w_trgm {
            options.w_trgm = value;
        }
        if let Some(value) = self.w_ft {
            options.w_ft = value;
        }
        if let Some(value) = self.min_trgm {
            options.min_trgm = value;
        }
        if let Some(value) = self.min_ts {
            options.min_ts = value;
        }
        if let Some(value) = self.min_score {
            options.min_score = value;
        }
        if let Some(value) = self.min_candidates {
            options.min_candidates = value;
        }
        options.validate()?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let mut config = Config::from_env()?;
    configure_logging(&config.log_dir, "ingest_articles.log", true);
    args.apply_overrides(&mut config.options)?;

    let database_path = args.database.unwrap_or(config.database_path);
    let db = Database::new(&database_path)
        .await
        .with_context(|| format!("failed to open database {}", database_path))?;
    let resolver = StoryResolver::new(db.clone());

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("failed to open {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let start_time = Instant::now();
    let mut stdout = io::stdout().lock();
    let mut matched = 0;
    let mut created = 0;
    let mut failed = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let article: IncomingArticle = match serde_json::from_str(&line) {
            Ok(article) => article,
            Err(e) => {
                warn!("Line {}: not a valid article: {}", line_number, e);
                failed += 1;
                continue;
            }
        };

        match resolver.resolve_and_store(&article, &config.options).await {
            Ok(result) => {
                if result.matched {
                    matched += 1;
                } else {
                    created += 1;
                }
                writeln!(stdout, "{}", serde_json::to_string(&result)?)?;
            }
            Err(e) => {
                error!("Line {}: failed to resolve {}: {}", line_number, article.url, e);
                failed += 1;
            }
        }
    }

    stdout.flush()?;
    db.close().await;

    info!("Ingestion completed in {:.2?}", start_time.elapsed());
    info!("Summary:");
    info!("  Joined existing stories: {}", matched);
    info!("  New stories created: {}", created);
    info!("  Failed: {}", failed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_options() {
        let args = Cli::parse_from([
            "ingest_articles",
            "articles.ndjson",
            "--min-score",
            "0.6",
            "--recency-hours",
            "48",
            "--min-candidates",
            "3",
        ]);
        let mut options = ResolveOptions::default();
        args.apply_overrides(&mut options).unwrap();

        assert_eq!(args.input.as_deref(), Some("articles.ndjson"));
        assert_eq!(options.min_score, 0.6);
        assert_eq!(options.recency_window, Duration::hours(48));
        assert_eq!(options.min_candidates, 3);
        assert_eq!(options.w_trgm, ResolveOptions::default().w_trgm);
    }

    #[test]
    fn test_invalid_flag_values_are_rejected() {
        let args = Cli::parse_from(["ingest_articles", "--w-ft=-0.5"]);
        assert!(args.apply_overrides(&mut ResolveOptions::default()).is_err());

        let args = Cli::parse_from(["ingest_articles", "--recency-hours", "0"]);
        assert!(args.apply_overrides(&mut ResolveOptions::default()).is_err());
    }
}
