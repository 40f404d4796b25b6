//! bibref CLI - manage a bibliographic reference store and export BibTeX

use anyhow::Context;
use bibref::config::{self, DATABASE_URI_ENV};
use bibref::seed::{self, SeedReport};
use bibref::storage::SqliteStore;
use bibref::ui::{self, Icons};
use bibref::{bibtex, Reference};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bibref")]
#[command(version)]
#[command(about = "Bibliographic reference store with citation tags and BibTeX export")]
#[command(long_about = r#"
bibref keeps citation records in a SQLite database and renders them as BibTeX.

The database is chosen from --database, then $BIBREF_DATABASE_URI (a .env file
is honoured), then the `database` key of bibref.toml, then sqlite:///app.db.

Example usage:
  bibref add --type Book --author "Ada Lovelace" --title "Notes" --year 1843
  bibref list
  bibref bibtex 1
  bibref export --output refs.bib
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputMode::Text)]
    format: OutputMode,

    /// Database URI, e.g. sqlite:///app.db
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn is_human(self) -> bool {
        self == OutputMode::Text
    }
}

#[derive(Args, Debug, Default)]
struct ReferenceFields {
    /// Author in "First Last" form
    #[arg(long)]
    author: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    booktitle: Option<String>,

    #[arg(long)]
    year: Option<i64>,

    #[arg(long)]
    pages: Option<i64>,

    /// Reference type, by name or id
    #[arg(short = 't', long = "type")]
    ref_type: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and seed the reference types
    Init,

    /// List reference types
    Types,

    /// Add a reference
    Add {
        /// Explicit id (assigned automatically when omitted)
        #[arg(long)]
        id: Option<i64>,

        #[command(flatten)]
        fields: ReferenceFields,
    },

    /// Update fields of a stored reference
    Update {
        id: i64,

        #[command(flatten)]
        fields: ReferenceFields,
    },

    /// Delete a reference
    Remove { id: i64 },

    /// List all references
    List {
        /// Only references of this type (name or id)
        #[arg(short = 't', long = "type")]
        ref_type: Option<String>,
    },

    /// Show one reference
    Show { id: i64 },

    /// Print the citation tag of a reference
    Tag { id: i64 },

    /// Print one reference as BibTeX
    Bibtex { id: i64 },

    /// Print every reference as BibTeX
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show row counts
    Stats,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a bibref.toml pointing at the current database
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    config::load_dotenv();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let env_uri = std::env::var(DATABASE_URI_ENV).ok();

    if let Commands::Config { action: ConfigAction::Init { force } } = cli.command {
        let new_config = config::init_config(
            &config_path,
            cli.database.as_deref(),
            env_uri.as_deref(),
            force,
        )?;
        return emit(cli.format, "config", &new_config, || {
            ui::success(&format!("Wrote {}", config_path.display()));
        });
    }

    let file_config = config::load_config(Some(&config_path))?;
    let uri = config::resolve_database_uri(
        cli.database.as_deref(),
        env_uri.as_deref(),
        file_config.as_ref(),
    )?;

    config::ensure_db_dir(&uri)?;
    let (store, report) = seed::open_and_seed(&uri)
        .with_context(|| format!("failed to initialize store at {}", uri))?;
    tracing::debug!("Using database {}", uri);

    let mode = cli.format;
    match cli.command {
        Commands::Init => emit(mode, "init", &report, || print_seed_report(&uri, &report))?,

        Commands::Types => {
            let types = store.list_types()?;
            emit(mode, "types", &types, || {
                ui::header("Reference types");
                println!("{}", ui::types_table(&types));
            })?;
        }

        Commands::Add { id, fields } => {
            let mut reference = Reference { id, ..Reference::new() };
            apply_fields(&store, &mut reference, fields)?;
            let new_id = store.insert_reference(&reference)?;
            reference.id = Some(new_id);
            emit(mode, "reference", &reference, || {
                ui::success(&format!("{} Added reference {} ({})", Icons::NEW, new_id, reference.tag()));
            })?;
        }

        Commands::Update { id, fields } => {
            let mut reference = fetch(&store, id)?;
            apply_fields(&store, &mut reference, fields)?;
            store.update_reference(id, &reference)?;
            emit(mode, "reference", &reference, || {
                ui::success(&format!("Updated reference {} ({})", id, reference.tag()));
            })?;
        }

        Commands::Remove { id } => {
            store.delete_reference(id)?;
            emit(mode, "removed", &id, || {
                ui::success(&format!("{} Removed reference {}", Icons::DEL, id));
            })?;
        }

        Commands::List { ref_type } => {
            let references = match ref_type {
                Some(t) => store.find_references_by_type(store.resolve_type(&t)?.id)?,
                None => store.list_references()?,
            };
            let type_names = store.reference_type_names(&references)?;
            emit(mode, "references", &references, || {
                if references.is_empty() {
                    println!("∅ No references stored.");
                    return;
                }
                println!("{}", ui::references_table(&references, &type_names));
            })?;
        }

        Commands::Show { id } => {
            let reference = fetch(&store, id)?;
            let type_name = store.reference_type(&reference)?.map(|t| t.name);
            emit(mode, "reference", &reference, || {
                ui::header(&format!("Reference {}", id));
                ui::summary_row("Tag:", &reference.tag());
                ui::summary_row("Type:", type_name.as_deref().unwrap_or("?"));
                ui::summary_row("Author:", reference.author.as_deref().unwrap_or(""));
                ui::summary_row("Title:", reference.title.as_deref().unwrap_or(""));
                ui::summary_row("Booktitle:", reference.booktitle.as_deref().unwrap_or(""));
                ui::summary_row("Year:", &reference.year.map(|y| y.to_string()).unwrap_or_default());
                ui::summary_row("Pages:", &reference.pages.map(|p| p.to_string()).unwrap_or_default());
            })?;
        }

        Commands::Tag { id } => {
            let tag = fetch(&store, id)?.tag();
            emit(mode, "tag", &tag, || println!("{}", tag))?;
        }

        Commands::Bibtex { id } => {
            let entry = fetch(&store, id)?.to_bibtex(&store)?;
            emit(mode, "bibtex", &entry, || println!("{}", entry))?;
        }

        Commands::Export { output } => {
            let exported = bibtex::export_all(&store)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{}\n", exported))
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    let count = store.count_references()?;
                    emit(mode, "export", &path, || {
                        ui::success(&format!("Exported {} references to {}", count, path.display()));
                    })?;
                }
                None => emit(mode, "bibtex", &exported, || println!("{}", exported))?,
            }
        }

        Commands::Stats => {
            let stats = store.stats()?;
            emit(mode, "stats", &stats, || {
                ui::header(&format!("{} bibref statistics ({})", Icons::STATS, uri));
                let types = stats.types.to_string();
                let references = stats.references.to_string();
                println!("{}", ui::stats_table(&[("Types", types.as_str()), ("References", references.as_str())]));
            })?;
        }

        Commands::Config { .. } => unreachable!("handled before opening the store"),
    }

    Ok(())
}

/// Print human output, or wrap `data` in a JSON envelope.
fn emit<T: serde::Serialize>(
    mode: OutputMode,
    kind: &str,
    data: &T,
    human: impl FnOnce(),
) -> anyhow::Result<()> {
    if mode.is_human() {
        human();
    } else {
        let envelope = serde_json::json!({ "ok": true, "kind": kind, "data": data });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn fetch(store: &SqliteStore, id: i64) -> anyhow::Result<Reference> {
    store
        .get_reference(id)?
        .ok_or(bibref::Error::ReferenceNotFound(id))
        .map_err(Into::into)
}

fn apply_fields(store: &SqliteStore, reference: &mut Reference, fields: ReferenceFields) -> anyhow::Result<()> {
    if let Some(name_or_id) = fields.ref_type {
        reference.type_id = Some(store.resolve_type(&name_or_id)?.id);
    }
    if fields.author.is_some() {
        reference.author = fields.author;
    }
    if fields.title.is_some() {
        reference.title = fields.title;
    }
    if fields.booktitle.is_some() {
        reference.booktitle = fields.booktitle;
    }
    if fields.year.is_some() {
        reference.year = fields.year;
    }
    if fields.pages.is_some() {
        reference.pages = fields.pages;
    }
    if reference.type_id.is_none() {
        ui::warn("No --type given; this reference cannot be exported to BibTeX");
    }
    Ok(())
}

fn print_seed_report(uri: &bibref::DatabaseUri, report: &SeedReport) {
    ui::header(&format!("{} Initialized {}", Icons::DATABASE, uri));
    for name in &report.inserted {
        ui::summary_row(&format!("{} seeded", Icons::SEED), name);
    }
    for name in &report.skipped {
        ui::summary_row("present", &ui::dim(name));
    }
    ui::info("Seed", &report.to_string());
}
