use anyhow::{bail, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row as PrettyRow, Table};

use storyline::config::Config;
use storyline::logging::configure_logging;
use storyline::text::{Language, LexicalScorerFactory, ResolvedLanguage, ScorerFactory};
use storyline::Database;

#[derive(Parser)]
#[clap(name = "story-manager", about = "Inspect stories and tune scoring")]
struct Cli {
    /// Override the configured database path
    #[clap(short, long, global = true)]
    database: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the most recently updated stories
    List {
        /// Number of stories to show
        #[clap(short, long, default_value = "10")]
        limit: i64,
    },

    /// Show one story and its articles
    Show {
        /// Cluster ID
        #[clap(required = true)]
        id: i64,

        /// Number of articles to show
        #[clap(short, long, default_value = "20")]
        limit: usize,
    },

    /// Score two texts with both signals
    Score {
        /// Incoming text
        #[clap(required = true)]
        text_a: String,

        /// Stored text
        #[clap(required = true)]
        text_b: String,

        /// Text search configuration (name, ISO code or "auto")
        #[clap(short, long, default_value = "")]
        language: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = Config::from_env()?;
    configure_logging(&config.log_dir, "manage_stories.log", false);

    match args.command {
        Commands::List { limit } => {
            let db = open_database(args.database, &config).await?;
            list_stories(&db, limit).await?;
            db.close().await;
        }
        Commands::Show { id, limit } => {
            let db = open_database(args.database, &config).await?;
            show_story(&db, id, limit).await?;
            db.close().await;
        }
        Commands::Score {
            text_a,
            text_b,
            language,
        } => {
            score_texts(&text_a, &text_b, &language);
        }
    }

    Ok(())
}

async fn open_database(path: Option<String>, config: &Config) -> Result<Database> {
    let database_path = path.unwrap_or_else(|| config.database_path.clone());
    Ok(Database::new(&database_path).await?)
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}

/// Lists stories in a formatted table
async fn list_stories(db: &Database, limit: i64) -> Result<()> {
    if limit <= 0 {
        bail!("limit must be positive");
    }

    let stories = db.list_recent_clusters(limit).await?;
    if stories.is_empty() {
        println!("No stories yet");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("ID"),
        Cell::new("First Published"),
        Cell::new("Updated"),
        Cell::new("Language"),
        Cell::new("Articles"),
        Cell::new("Weight"),
    ]));

    for story in stories {
        table.add_row(PrettyRow::new(vec![
            Cell::new(&story.cluster.id.to_string()),
            Cell::new(&format_time(&story.cluster.first_published_at)),
            Cell::new(&format_time(&story.cluster.last_updated_at)),
            Cell::new(&story.cluster.language),
            Cell::new(&story.article_count.to_string()),
            Cell::new(&story.cluster.weight.to_string()),
        ]));
    }

    table.printstd();
    Ok(())
}

/// Shows one story with its newest articles
async fn show_story(db: &Database, cluster_id: i64, limit: usize) -> Result<()> {
    let cluster = match db.get_cluster(cluster_id).await? {
        Some(cluster) => cluster,
        None => {
            println!("❌ Story {} not found", cluster_id);
            return Ok(());
        }
    };
    let articles = db.list_cluster_articles(cluster_id).await?;

    println!("📰 Story #{}", cluster.id);
    println!("  First published: {}", format_time(&cluster.first_published_at));
    println!("  Last updated:    {}", format_time(&cluster.last_updated_at));
    println!("  Language:        {}", cluster.language);
    println!("  Weight:          {}", cluster.weight);
    println!("  Articles:        {}", articles.len());

    if articles.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("ID"),
        Cell::new("Source"),
        Cell::new("Published"),
        Cell::new("Title"),
        Cell::new("URL"),
    ]));

    for article in articles.iter().take(limit) {
        table.add_row(PrettyRow::new(vec![
            Cell::new(&article.id.to_string()),
            Cell::new(&article.source_id.to_string()),
            Cell::new(&format_time(&article.published_at)),
            Cell::new(&preview(&article.title, 60)),
            Cell::new(&article.url),
        ]));
    }

    table.printstd();
    if articles.len() > limit {
        println!("  ... and {} more", articles.len() - limit);
    }

    Ok(())
}

/// Prints both raw signals for a pair of texts.
fn score_texts(text_a: &str, text_b: &str, language: &str) {
    let factory = LexicalScorerFactory;
    let resolved = ResolvedLanguage::resolve(language, text_a);

    let trigram = factory.trigram().score(text_a, text_b);
    let full_text = match &resolved {
        ResolvedLanguage::Known(language) => factory
            .full_text(*language)
            .ok()
            .map(|scorer| scorer.score(text_a, text_b)),
        ResolvedLanguage::Unsupported(_) => None,
    };

    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![Cell::new("Signal"), Cell::new("Score")]));
    table.add_row(PrettyRow::new(vec![
        Cell::new("language"),
        Cell::new(resolved.tag()),
    ]));
    table.add_row(PrettyRow::new(vec![
        Cell::new("trigram"),
        Cell::new(&format!("{:.4}", trigram)),
    ]));
    table.add_row(PrettyRow::new(vec![
        Cell::new("full_text (raw)"),
        Cell::new(&full_text.map_or("unavailable".to_string(), |s| format!("{:.4}", s))),
    ]));
    table.printstd();

    if resolved == ResolvedLanguage::Known(Language::Simple) {
        println!("Note: 'simple' does not stem; inflected forms will not match");
    }
}
