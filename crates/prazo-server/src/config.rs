//! Server configuration.
//!
//! Every setting is a flag or an environment variable, so the service runs
//! from plain env configuration with no config file.

use std::path::PathBuf;

use clap::Parser;

/// HTTP API serving timeline records from the backing spreadsheet.
#[derive(Debug, Parser)]
#[command(name = "prazo", version, about)]
pub struct Settings {
    /// Identifier of the backing spreadsheet
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: String,

    /// Path to the service-account key file
    #[arg(long, env = "GOOGLE_CREDS_FILE", default_value = "credentials.json")]
    pub creds_file: PathBuf,

    /// Bind address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Name of the projects sheet
    #[arg(long, env = "PROJECTS_SHEET", default_value = "PRINCIPAL")]
    pub projects_sheet: String,

    /// Name of the tasks sheet
    #[arg(long, env = "TASKS_SHEET", default_value = "SUBTAREFA")]
    pub tasks_sheet: String,
}
