//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use diagnosa_store::Table;

/// Diagnosa CLI - Naive Bayes symptom questionnaire and case base.
#[derive(Debug, Parser)]
#[command(name = "diagnosa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Database path (overrides the configuration file)
    #[arg(short, long, global = true, env = "DIAGNOSA_DB")]
    pub database: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (codes and IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer the questionnaire and diagnose (interactive unless --answers is given)
    Diagnose(DiagnoseArgs),

    /// Print the symptom questionnaire
    Questions,

    /// List the disease catalog
    Diseases,

    /// Show one disease with its details
    Disease(DiseaseArgs),

    /// List stored cases
    Cases(CasesArgs),

    /// Show row counts for every table
    Stats,

    /// Import diseases and cases from a JSON seed file
    Import(ImportArgs),

    /// Export a table as JSON records
    Export(ExportArgs),
}

/// Arguments for the diagnose command.
#[derive(Debug, Default, Parser)]
pub struct DiagnoseArgs {
    /// Answers in questionnaire order: one of y/n/? per symptom (e.g. "yyn?n...")
    /// or a comma-separated list (e.g. "yes,no,unknown,...")
    #[arg(short, long)]
    pub answers: Option<String>,

    /// Record the diagnosis as a new case
    #[arg(short, long)]
    pub save: bool,
}

/// Arguments for the disease command.
#[derive(Debug, Parser)]
pub struct DiseaseArgs {
    /// Disease code (e.g. P01)
    pub code: String,
}

/// Arguments for the cases command.
#[derive(Debug, Parser)]
pub struct CasesArgs {
    /// Filter by disease code
    #[arg(long)]
    pub disease: Option<String>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// JSON seed file
    pub file: Option<String>,

    /// Read the seed from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Table to export
    #[arg(value_enum)]
    pub table: TableArg,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Table argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TableArg {
    /// Historical cases
    Cases,
    /// Disease catalog
    Diseases,
    /// Disease details
    DiseaseDetails,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<TableArg> for Table {
    fn from(table: TableArg) -> Self {
        match table {
            TableArg::Cases => Table::Cases,
            TableArg::Diseases => Table::Diseases,
            TableArg::DiseaseDetails => Table::DiseaseDetails,
        }
    }
}
