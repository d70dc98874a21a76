//! Cases command implementation.

use crate::cli::CasesArgs;
use crate::error::Result;
use crate::output::Formatter;
use diagnosa_domain::traits::{CaseBase, CaseQuery};
use diagnosa_domain::DiseaseCode;
use diagnosa_store::SqliteStore;

/// Execute the cases command.
pub fn execute_cases(args: CasesArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let query = CaseQuery {
        disease: args.disease.map(DiseaseCode::new),
        limit: args.limit,
    };

    let cases = store.query_cases(&query)?;
    println!("{}", formatter.format_cases(&cases, store.schema())?);
    Ok(())
}
