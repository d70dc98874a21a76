//! Catalog and questionnaire listing commands.

use crate::cli::DiseaseArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use diagnosa_domain::traits::CaseBase;
use diagnosa_domain::DiseaseCode;
use diagnosa_store::SqliteStore;

/// Execute the questions command.
pub fn execute_questions(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_questions(store.schema())?);
    Ok(())
}

/// Execute the diseases command.
pub fn execute_diseases(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let diseases = store.fetch_diseases()?;
    println!("{}", formatter.format_diseases(&diseases)?);
    Ok(())
}

/// Execute the disease command.
pub fn execute_disease(args: DiseaseArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let code = DiseaseCode::new(args.code.trim());
    let disease = store
        .fetch_diseases()?
        .into_iter()
        .find(|d| d.code == code)
        .ok_or_else(|| CliError::NotFound(format!("disease {}", code)))?;

    let details = store.disease_details(&code)?;
    println!("{}", formatter.format_disease(&disease, details.as_ref())?);
    Ok(())
}
