//! Short-lived `DuckDB` connections for the location namespace.
//!
//! No connection outlives a single cache call: each operation opens the file,
//! runs its statements and drops the handle before returning.

use std::path::Path;

use ::duckdb::{Connection, ToSql};

/// Open and configure a connection to the cache file.
pub(crate) fn open_connection(path: &Path) -> Result<Connection, ::duckdb::Error> {
    let connection = Connection::open(path)?;
    connection.execute_batch("PRAGMA disable_progress_bar;")?;
    Ok(connection)
}

pub(crate) fn ensure_namespace(connection: &Connection, table: &str) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
         postcode VARCHAR PRIMARY KEY, \
         payload VARCHAR NOT NULL)"
    ))
}

pub(crate) fn select_payload(
    connection: &Connection,
    table: &str,
    postcode: &str,
) -> Result<Option<String>, ::duckdb::Error> {
    let mut statement =
        connection.prepare(&format!("SELECT payload FROM {table} WHERE postcode = ?"))?;
    let params: [&dyn ToSql; 1] = [&postcode];
    let mut rows = statement.query(params.as_slice())?;

    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

pub(crate) fn upsert_payload(
    connection: &Connection,
    table: &str,
    postcode: &str,
    payload: &str,
) -> Result<(), ::duckdb::Error> {
    let params: [&dyn ToSql; 2] = [&postcode, &payload];
    connection.execute(
        &format!("INSERT OR REPLACE INTO {table} (postcode, payload) VALUES (?, ?)"),
        params.as_slice(),
    )?;
    Ok(())
}

pub(crate) fn delete_payload(
    connection: &Connection,
    table: &str,
    postcode: &str,
) -> Result<bool, ::duckdb::Error> {
    let params: [&dyn ToSql; 1] = [&postcode];
    let removed = connection.execute(
        &format!("DELETE FROM {table} WHERE postcode = ?"),
        params.as_slice(),
    )?;
    Ok(removed > 0)
}

/// Namespaces become table identifiers, so only plain lowercase identifiers are accepted.
pub(crate) fn is_valid_namespace(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_lowercase() || first == '_')
        && chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_validation_rejects_sql_fragments() {
        assert!(is_valid_namespace("ue_postcodes"));
        assert!(is_valid_namespace("_cache2"));
        assert!(!is_valid_namespace(""));
        assert!(!is_valid_namespace("2cache"));
        assert!(!is_valid_namespace("ue; DROP TABLE x"));
        assert!(!is_valid_namespace("UE_Postcodes"));
    }
}
