//! `jobtrack`: command-line front end for the job application table.

use anyhow::Context;
use chrono::Local;
use clap::CommandFactory;
use clap::Parser;
use jobtrack_store::Category;
use jobtrack_store::Record;
use jobtrack_store::StoreError;
use jobtrack_store::factory;
use jobtrack_store::types::NOT_FOLLOWED_UP;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod render;

use config::Config;
use render::render_record;
use render::render_table;

/// Track job applications in a CSV table.
#[derive(Debug, Parser)]
#[command(name = "jobtrack", version, about)]
pub struct Cli {
    /// Table file (overrides JOBTRACK_FILE and the config file)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Config file (default: $JOBTRACK_HOME/config.toml or ~/.jobtrack/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Create the table file if it does not exist yet.
    Init,
    /// Show all applications in the order they were added.
    #[command(visible_alias = "ls")]
    List {
        /// Print a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Record a new application.
    Add(AddArgs),
    /// Change fields of the application at POSITION.
    Edit {
        position: usize,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete the application at POSITION.
    Rm {
        position: usize,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show counts by category and status.
    Stats,
    /// Write all applications to stdout as JSON Lines.
    Export,
    /// Append applications read from stdin as JSON Lines.
    Import,
    /// Print a shell completion script.
    Completion {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Field values for a new application. Text fields left out are sent to
/// the store empty, which reports every missing one at once.
#[derive(Debug, clap::Args)]
pub struct AddArgs {
    /// Date applied, YYYY-MM-DD [default: today]
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, default_value = "")]
    pub company: String,
    /// Job title
    #[arg(long = "position", default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub status: String,
    #[arg(long, default_value_t = Category::Tech)]
    pub category: Category,
    /// Follow-up date, YYYY-MM-DD [default: N/A]
    #[arg(long)]
    pub followed_up: Option<String>,
    #[arg(long = "website", default_value = "")]
    pub company_website: String,
}

impl AddArgs {
    fn into_record(self) -> Record {
        Record {
            date: self.date.unwrap_or_else(today),
            company: self.company,
            position: self.title,
            status: self.status,
            category: self.category,
            followed_up: self
                .followed_up
                .unwrap_or_else(|| NOT_FOLLOWED_UP.to_string()),
            company_website: self.company_website,
        }
    }
}

/// Fields to change on an existing application; anything omitted is kept.
#[derive(Debug, clap::Args)]
pub struct EditArgs {
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    /// Job title
    #[arg(long = "position")]
    pub title: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub followed_up: Option<String>,
    /// Reset the follow-up date to N/A
    #[arg(long, conflicts_with = "followed_up")]
    pub clear_follow_up: bool,
    #[arg(long = "website")]
    pub company_website: Option<String>,
}

impl EditArgs {
    fn apply(self, mut record: Record) -> Record {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(company) = self.company {
            record.company = company;
        }
        if let Some(title) = self.title {
            record.position = title;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(followed_up) = self.followed_up {
            record.followed_up = followed_up;
        }
        if self.clear_follow_up {
            record.followed_up = NOT_FOLLOWED_UP.to_string();
        }
        if let Some(website) = self.company_website {
            record.company_website = website;
        }
        record
    }
}

/// Execute one command against the configured table.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(cli.log_level.as_deref().or(config.log_level.as_deref()));

    let mut out = std::io::stdout().lock();
    let path = factory::resolve_path(cli.file, config.file);
    // Opening initializes the table, so only commands that touch it do so.
    let open = || {
        tracing::debug!(path = %path.display(), "using table");
        factory::open_store(&path)
    };

    match cli.cmd {
        Command::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "jobtrack", &mut out);
        }
        Command::Init => {
            open()?;
            writeln!(out, "Table ready at {}", path.display())?;
        }
        Command::List { json } => {
            let records = open()?.list()?;
            if json {
                serde_json::to_writer_pretty(&mut out, &records)?;
                writeln!(out)?;
            } else {
                write!(out, "{}", render_table(&records))?;
            }
        }
        Command::Add(args) => {
            let store = open()?;
            store.append(args.into_record())?;
            let records = store.list()?;
            let position = records.len().saturating_sub(1);
            writeln!(out, "Added application at position {position}")?;
            write!(out, "{}", render_table(&records))?;
        }
        Command::Edit { position, fields } => {
            let store = open()?;
            let records = store.list()?;
            let current = records
                .get(position)
                .cloned()
                .ok_or(StoreError::OutOfRange {
                    position,
                    len: records.len(),
                })?;
            store.update(position, fields.apply(current))?;
            writeln!(out, "Updated application at position {position}")?;
            write!(out, "{}", render_table(&store.list()?))?;
        }
        Command::Rm { position, yes } => {
            let store = open()?;
            let records = store.list()?;
            let record = records.get(position).ok_or(StoreError::OutOfRange {
                position,
                len: records.len(),
            })?;
            write!(out, "{}", render_record(position, record))?;
            if !yes && !confirm(&mut out, "Delete this application? [y/N] ")? {
                writeln!(out, "Aborted, nothing deleted.")?;
                return Ok(());
            }
            store.delete(position)?;
            writeln!(out, "Deleted application at position {position}")?;
            write!(out, "{}", render_table(&store.list()?))?;
        }
        Command::Stats => {
            serde_json::to_writer_pretty(&mut out, &open()?.stats()?)?;
            writeln!(out)?;
        }
        Command::Export => {
            open()?.export(&mut out)?;
        }
        Command::Import => {
            let n = open()?.import(&mut std::io::stdin().lock())?;
            writeln!(out, "Imported {n} applications")?;
        }
    }
    Ok(())
}

/// Exit status for a failed run: 2 when the user can fix the input, else 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StoreError>() {
        Some(e) if e.is_user_error() => 2,
        _ => 1,
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("warn")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn confirm(out: &mut impl Write, prompt: &str) -> anyhow::Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
