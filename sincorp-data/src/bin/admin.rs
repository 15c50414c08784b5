use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use sincorp_core::calculations::common::{format_date, parse_date};
use sincorp_core::calculations::{format_money, parse_money, to_words};
use sincorp_core::db::{DbConfig, RepositoryRegistry};
use sincorp_core::print::{DocumentRenderer, PrintableDocument, TextRenderer};
use sincorp_core::{DocumentId, DocumentKind, DocumentRepository, FieldUpdate};
use sincorp_data::LineItemLoader;
use sincorp_data::logging::init_logging;
use sincorp_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Sincorp back-office: import, list, print and delete quotes, statements,
/// delivery notes and receipts.
#[derive(Debug, Parser)]
#[command(name = "sincorp-admin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Database backend to use.
    #[arg(long, global = true, default_value = "sqlite")]
    backend: String,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `sincorp.db`) or `:memory:`.
    #[arg(long, global = true, env = "SINCORP_DB", default_value = "sincorp.db")]
    db: String,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a quote, statement or delivery note from a CSV of line items.
    ///
    /// Columns: date, description, quantity, unit_price, amount, unit, comments.
    Import {
        #[arg(long, value_parser = parse_kind)]
        kind: DocumentKind,

        /// CSV file with one line item per row.
        #[arg(short, long)]
        file: PathBuf,

        /// Document date (dd/mm/yyyy or yyyy-mm-dd); today when omitted.
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Document number as printed.
        #[arg(long)]
        number: Option<String>,

        #[arg(long)]
        client: Option<String>,
    },

    /// List documents of one kind, newest first.
    List {
        #[arg(long, value_parser = parse_kind)]
        kind: DocumentKind,
    },

    /// Print one document.
    Show {
        #[arg(long, value_parser = parse_kind)]
        kind: DocumentKind,

        #[arg(long)]
        id: DocumentId,

        /// Write the rendered document here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete one document.
    Delete {
        #[arg(long, value_parser = parse_kind)]
        kind: DocumentKind,

        #[arg(long)]
        id: DocumentId,
    },

    /// Spell an amount in Spanish, as printed on receipts.
    Words {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Format an amount the way documents print it.
    Money {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
}

fn parse_kind(s: &str) -> Result<DocumentKind, String> {
    DocumentKind::parse(s).ok_or_else(|| {
        format!("unknown document kind '{s}' (quote, statement, delivery-note, receipt)")
    })
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("invalid date '{s}' (expected dd/mm/yyyy)"))
}

// ─── commands ────────────────────────────────────────────────────────────────

fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

async fn open_store(cli: &Cli) -> Result<Box<dyn DocumentRepository>> {
    let db_config = DbConfig {
        backend: cli.backend.clone(),
        connection_string: cli.db.clone(),
    };

    let registry = build_registry();
    debug!(
        backend = %db_config.backend,
        available = ?registry.available_backends(),
        "connecting to document store"
    );
    registry
        .create(&db_config)
        .await
        .with_context(|| {
            format!(
                "Failed to open {} store: {}",
                db_config.backend, db_config.connection_string
            )
        })
}

async fn import(
    repo: &dyn DocumentRepository,
    kind: DocumentKind,
    file: &Path,
    date: Option<NaiveDate>,
    number: Option<String>,
    client: Option<String>,
) -> Result<()> {
    let reader = File::open(file).with_context(|| format!("Failed to open: {}", file.display()))?;
    let records = LineItemLoader::parse(reader)
        .with_context(|| format!("Failed to parse CSV: {}", file.display()))?;
    info!(count = records.len(), file = %file.display(), "parsed line items");

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let mut editor = LineItemLoader::build(kind, &records, date)
        .with_context(|| format!("Failed to build {} from {}", kind.label(), file.display()))?;
    if let Some(number) = number {
        editor.on_field_change(FieldUpdate::Number(number))?;
    }
    if let Some(client) = client {
        editor.on_field_change(FieldUpdate::ClientName(client))?;
    }

    let id = editor
        .save(repo)
        .await
        .context("Failed to save imported document")?;
    println!(
        "{} #{id} creado con {} ítems, total {}",
        kind.label(),
        records.len(),
        format_money(Some(editor.payload().total()))
    );
    Ok(())
}

async fn list(
    repo: &dyn DocumentRepository,
    kind: DocumentKind,
) -> Result<()> {
    let documents = repo
        .list_ordered_by_creation(kind.collection())
        .await
        .with_context(|| format!("Failed to list {}", kind.collection().as_str()))?;

    if documents.is_empty() {
        println!("No hay documentos en {}.", kind.collection().as_str());
        return Ok(());
    }
    for doc in documents {
        let payload = &doc.payload;
        println!(
            "{:>5}  {}  {:<14}  {:<30}  {:>16}  {}",
            doc.id,
            format_date(payload.meta.date),
            payload.meta.number,
            payload.client.name,
            format_money(Some(payload.total())),
            payload.meta.status.label(),
        );
    }
    Ok(())
}

async fn show(
    repo: &dyn DocumentRepository,
    kind: DocumentKind,
    id: DocumentId,
    output: Option<&Path>,
) -> Result<()> {
    let stored = repo
        .get_by_id(kind.collection(), id)
        .await
        .with_context(|| format!("Failed to load {} #{id}", kind.label()))?;

    let renderer = TextRenderer;
    let bytes = renderer
        .render(&PrintableDocument::from_payload(&stored.payload))
        .context("Failed to render document")?;

    match output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            info!(path = %path.display(), content_type = renderer.content_type(), "document written");
        }
        None => std::io::stdout()
            .write_all(&bytes)
            .context("Failed to write to stdout")?,
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    match &cli.command {
        Command::Words { amount } => {
            let amount = parse_money(amount)?;
            println!("{}", to_words(amount)?);
        }
        Command::Money { amount } => {
            let amount = parse_money(amount)?;
            println!("{}", format_money(Some(amount)));
        }
        Command::Import {
            kind,
            file,
            date,
            number,
            client,
        } => {
            let repo = open_store(&cli).await?;
            import(repo.as_ref(), *kind, file, *date, number.clone(), client.clone()).await?;
        }
        Command::List { kind } => {
            let repo = open_store(&cli).await?;
            list(repo.as_ref(), *kind).await?;
        }
        Command::Show { kind, id, output } => {
            let repo = open_store(&cli).await?;
            show(repo.as_ref(), *kind, *id, output.as_deref()).await?;
        }
        Command::Delete { kind, id } => {
            let repo = open_store(&cli).await?;
            repo.delete(kind.collection(), *id)
                .await
                .with_context(|| format!("Failed to delete {} #{id}", kind.label()))?;
            println!("{} #{id} eliminado.", kind.label());
        }
    }

    Ok(())
}
