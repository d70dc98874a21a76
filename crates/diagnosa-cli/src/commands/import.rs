//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use diagnosa_store::{Seed, SqliteStore};
use std::io::{self, Read};

/// Execute the import command.
pub fn execute_import(args: ImportArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    // Read the seed from file or stdin
    let seed: Seed = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        serde_json::from_str(&buffer)?
    } else if let Some(file_path) = args.file {
        Seed::from_path(file_path)?
    } else {
        return Err(CliError::InvalidInput(
            "Must specify either a file or --stdin".to_string(),
        ));
    };

    if seed.diseases.is_empty() && seed.cases.is_empty() {
        return Err(CliError::InvalidInput("Seed contains no diseases or cases".to_string()));
    }

    let summary = store.import_seed(&seed)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Imported {} disease(s), {} detail record(s), {} case(s)",
            summary.diseases, summary.details, summary.cases
        ))
    );

    Ok(())
}
