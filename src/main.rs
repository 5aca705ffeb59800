use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tracker_sync::edit;
use tracker_sync::model::{RowKey, TrackerTable};
use tracker_sync::report::{self, GroupField};
use tracker_sync::session::{self, Credentials, Session};
use tracker_sync::store::{
    CachedStore, GithubStore, SheetsStore, TableStore, UrlFormat, UrlStore,
};
use tracker_sync::{Result, TrackerError, config, sync};

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;

    if let Command::HashPassword { password } = &cli.command {
        println!("{}", session::password_digest(password));
        return Ok(());
    }

    let mut store = CachedStore::new(build_store(&cli.source)?);
    match cli.command {
        Command::Show { json } => show(&mut store, json),
        Command::Report { by, json } => run_report(&mut store, &by, json),
        Command::SetStatus { key, status } => {
            execute_edit(&mut store, |table| {
                edit::set_status(table, &key.to_key(), &status)
            })
        }
        Command::SetComment { key, comment } => {
            execute_edit(&mut store, |table| {
                edit::set_comment(table, &key.to_key(), &comment)
            })
        }
        Command::ResetRow { key } => {
            execute_edit(&mut store, |table| edit::reset_row(table, &key.to_key()))
        }
        Command::DeleteRow { key } => {
            execute_edit(&mut store, |table| edit::delete_row(table, &key.to_key()))
        }
        Command::ResetAll => execute_edit(&mut store, |table| {
            edit::reset_all(table);
            Ok(table.len())
        }),
        Command::HashPassword { .. } => unreachable!("handled above"),
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| TrackerError::Logging(error.to_string()))
}

fn build_store(source: &SourceArgs) -> Result<Box<dyn TableStore>> {
    match source.backend {
        Backend::Github => {
            let owner = require_arg(&source.owner, "--owner")?;
            let repo = require_arg(&source.repo, "--repo")?;
            let file = require_arg(&source.file, "--file")?;
            let token = config::require_env(config::GITHUB_TOKEN)?;
            Ok(Box::new(GithubStore::new(
                owner,
                repo,
                file,
                source.branch.clone(),
                token,
            )))
        }
        Backend::Sheets => {
            let spreadsheet_id = require_arg(&source.spreadsheet_id, "--spreadsheet-id")?;
            let token = config::require_env(config::SHEETS_TOKEN)?;
            Ok(Box::new(SheetsStore::new(
                spreadsheet_id,
                source.range.clone(),
                token,
            )))
        }
        Backend::ExcelUrl => {
            let url = require_arg(&source.url, "--url")?;
            Ok(Box::new(UrlStore::new(url, UrlFormat::Xlsx)))
        }
        Backend::CsvUrl => {
            let url = require_arg(&source.url, "--url")?;
            Ok(Box::new(UrlStore::new(url, UrlFormat::Csv)))
        }
    }
}

fn require_arg<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value.as_deref().ok_or_else(|| {
        TrackerError::Parse(format!("{name} is required for the selected backend"))
    })
}

/// Checks the operator credential before any mutating interaction. The
/// username/password pair comes from `TRACKER_USER`/`TRACKER_PASSWORD`, the
/// reference credential from the static table in the environment.
fn authenticate() -> Result<Session> {
    let credentials = Credentials::from_env()?;
    let username = config::require_env("TRACKER_USER")?;
    let password = config::require_env("TRACKER_PASSWORD")?;
    credentials.login(&username, &password)
}

fn execute_edit(
    store: &mut impl TableStore,
    apply: impl FnOnce(&mut TrackerTable) -> Result<usize>,
) -> Result<()> {
    let session = authenticate()?;
    let (mut table, handle) = sync::load_tracker(store)?;
    let touched = apply(&mut table)?;
    sync::save_tracker(store, &table, &handle)?;
    println!("updated {touched} row(s) as {}", session.username());
    session.logout();
    Ok(())
}

fn show(store: &mut impl TableStore, json: bool) -> Result<()> {
    let (table, _) = sync::load_tracker(store)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }
    let raw = table.to_raw();
    let widths: Vec<usize> = raw
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            raw.rows
                .iter()
                .map(|row| row[idx].len())
                .chain([column.len()])
                .max()
                .unwrap_or(0)
        })
        .collect();
    print_record(&raw.columns, &widths);
    for row in &raw.rows {
        print_record(row, &widths);
    }
    Ok(())
}

fn print_record(cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", line.trim_end());
}

fn run_report(store: &mut impl TableStore, by: &[String], json: bool) -> Result<()> {
    let fields: Vec<GroupField> = by
        .iter()
        .map(|name| name.parse())
        .collect::<Result<Vec<_>>>()?;
    let (table, _) = sync::load_tracker(store)?;
    let counts = report::count_by(&table, &fields);
    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }
    for bucket in counts {
        println!(
            "{}: {} = {}",
            bucket.group.join(", "),
            bucket.status,
            bucket.count
        );
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Load, edit, and persist a mentor/resource/week tracker table."
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Remote backend holding the tracker table.
    #[arg(long, value_enum, default_value_t = Backend::Github)]
    backend: Backend,

    /// Static URL for the excel-url and csv-url backends.
    #[arg(long)]
    url: Option<String>,

    /// Repository owner for the github backend.
    #[arg(long)]
    owner: Option<String>,

    /// Repository name for the github backend.
    #[arg(long)]
    repo: Option<String>,

    /// File path within the repository for the github backend.
    #[arg(long)]
    file: Option<String>,

    /// Branch for the github backend.
    #[arg(long, default_value = "main")]
    branch: String,

    /// Spreadsheet identifier for the sheets backend.
    #[arg(long)]
    spreadsheet_id: Option<String>,

    /// Worksheet range for the sheets backend.
    #[arg(long, default_value = "Sheet1")]
    range: String,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Backend {
    /// Commit-based file in a GitHub repository.
    Github,
    /// Live Google Sheet via the values API.
    Sheets,
    /// Read-only xlsx file behind a static URL.
    ExcelUrl,
    /// Read-only published CSV export.
    CsvUrl,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Github => write!(f, "github"),
            Backend::Sheets => write!(f, "sheets"),
            Backend::ExcelUrl => write!(f, "excel-url"),
            Backend::CsvUrl => write!(f, "csv-url"),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the tracker table.
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Print completion counts grouped by the given fields.
    Report {
        /// Comma-separated group fields: mentor, resource, schedule.
        #[arg(long, value_delimiter = ',', default_value = "mentor")]
        by: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Set the status of the rows matching a composite key.
    SetStatus {
        #[command(flatten)]
        key: KeyArgs,

        /// "Completed" or "Not Completed".
        #[arg(long)]
        status: String,
    },

    /// Set the comment of the rows matching a composite key.
    SetComment {
        #[command(flatten)]
        key: KeyArgs,

        /// New comment; an empty string clears it.
        #[arg(long)]
        comment: String,
    },

    /// Clear status and comment for the rows matching a composite key.
    ResetRow {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Delete the rows matching a composite key.
    DeleteRow {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Clear status and comment for every row.
    ResetAll,

    /// Print the SHA-256 digest used by the credential table.
    HashPassword { password: String },
}

#[derive(clap::Args)]
struct KeyArgs {
    #[arg(long)]
    mentor: String,

    #[arg(long)]
    resource: String,

    #[arg(long)]
    schedule: String,
}

impl KeyArgs {
    fn to_key(&self) -> RowKey {
        RowKey::new(
            self.mentor.clone(),
            self.resource.clone(),
            self.schedule.clone(),
        )
    }
}
