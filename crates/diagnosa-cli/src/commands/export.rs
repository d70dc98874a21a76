//! Export command implementation.

use crate::cli::ExportArgs;
use crate::error::Result;
use crate::output::Formatter;
use diagnosa_store::{SqliteStore, Table};
use std::fs;

/// Execute the export command.
pub fn execute_export(args: ExportArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let table: Table = args.table.into();
    let records = store.export_table(table)?;
    let json = serde_json::to_string_pretty(&records)?;

    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            let rows = records.as_array().map(|r| r.len()).unwrap_or(0);
            eprintln!(
                "{}",
                formatter.success(&format!("Exported {} row(s) from {} to {}", rows, table, path))
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
