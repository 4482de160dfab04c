//! Column pruning: drops free-text and other non-analytic columns.

use tracing::{debug, warn};

use crate::table::Table;

/// Drops the named non-analytic columns.
///
/// Names absent from the table are skipped with a warning rather than
/// failing the run, the same policy every other stage applies to columns
/// the config names but the file lacks.
pub fn prune(mut table: Table, columns: &[String]) -> Table {
    for name in columns {
        if table.remove_column(name).is_some() {
            debug!(column = %name, "Column removed");
        } else {
            warn!(column = %name, "Column to prune not present, skipping");
        }
    }
    table
}
