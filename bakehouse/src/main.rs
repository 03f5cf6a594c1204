//! Bakehouse admin CLI.
//!
//! Operational tasks around the store document that do not belong in the
//! HTTP API:
//!
//! 1. **`setup-db`**: create the `store_data` table (and optionally write the
//!    seed document).
//! 2. **`inspect`**: summarize the stored document, or an export file, without
//!    writing anything.
//! 3. **`import`**: replace the stored document with an export file.
//! 4. **`hash-password`**: produce a bcrypt hash for `ADMIN_PASSWORD_HASH`.
//! 5. **`check-config`**: show which environment settings are present.
//!
//! Database access uses the same connection variables as the server (see
//! [`storefront::config`]).

use std::io::BufRead;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storefront::{AdminCredential, AuthError, PersistenceError, PgConnectionProvider};

mod commands;

/// Top-level CLI arguments.
#[derive(Parser)]
#[command(name = "bakehouse", about = "Storefront database and admin tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store table.
    SetupDb {
        /// Also write the seed document if no row exists yet.
        #[arg(long)]
        seed: bool,
    },

    /// Summarize the stored document (read-only).
    Inspect {
        /// Inspect an exported JSON file instead of the database.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Replace the stored document with an exported JSON file.
    ///
    /// Older exports are migrated first. Refuses to overwrite an existing
    /// document unless `--force` is given.
    Import {
        #[arg(short, long)]
        file: PathBuf,

        /// Overwrite an existing document.
        #[arg(long)]
        force: bool,
    },

    /// Print a bcrypt hash of a password.
    ///
    /// Reads the password from the first line of stdin when not given.
    HashPassword { password: Option<String> },

    /// Show which configuration variables are set.
    CheckConfig,
}

/// Error type for CLI operations.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no database connection string is set")]
    NoDatabase,

    /// Import target already holds a document and `--force` was not given.
    #[error("a store document already exists; pass --force to overwrite it")]
    DocumentExists,

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read password: {0}")]
    Stdin(#[from] std::io::Error),

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("password must not be empty")]
    EmptyPassword,
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn read_password(arg: Option<String>) -> Result<String, CliError> {
    let password = match arg {
        Some(password) => password,
        None => {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        return Err(CliError::EmptyPassword);
    }
    Ok(password)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so reports can be piped
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::SetupDb { seed } => {
            let provider = PgConnectionProvider::from_env();
            print_lines(&commands::setup_db(&provider, seed).await?);
        }
        Commands::Inspect { file } => {
            let summary = match file {
                Some(path) => commands::summarize(Some(commands::read_document_file(&path)?))?,
                None => commands::inspect(&PgConnectionProvider::from_env()).await?,
            };
            print_lines(&summary.lines());
        }
        Commands::Import { file, force } => {
            let raw = commands::read_document_file(&file)?;
            let provider = PgConnectionProvider::from_env();
            let summary = commands::import(&provider, raw, force).await?;
            println!("Imported {}", file.display());
            print_lines(&summary.lines());
        }
        Commands::HashPassword { password } => {
            let password = read_password(password)?;
            println!("{}", storefront::auth::hash_password(&password)?);
        }
        Commands::CheckConfig => {
            let provider = PgConnectionProvider::from_env();
            let credential = AdminCredential::from_env();
            print_lines(&commands::config_report(
                &storefront::config::env_presence(),
                provider.selected().map(|c| c.source),
                storefront::config::is_production(),
                credential.kind(),
            ));
        }
    }

    Ok(())
}
