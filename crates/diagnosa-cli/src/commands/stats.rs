//! Stats command implementation.

use crate::error::Result;
use crate::output::Formatter;
use diagnosa_store::SqliteStore;

/// Execute the stats command.
pub fn execute_stats(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let counts = store.row_counts()?;
    println!("{}", formatter.format_stats(&counts)?);
    Ok(())
}
