//! Batched bulk insertion
//!
//! Records are partitioned into consecutive bounded-size batches, each
//! mapped to one executor call, issued strictly sequentially: batch i+1
//! does not start until batch i's statement has completed. There is no
//! cross-batch transaction, so a failing batch leaves previously committed
//! batches intact.

use crate::error::{Result, StagedbError};
use crate::sql::{InsertBuilder, SqlValue};
use crate::stage::StageHandle;

/// Insert `rows` into `table` using one multi-row INSERT per batch.
///
/// Returns the count of records submitted; it is not verified against the
/// rows actually inserted. Callers that need verification issue a count
/// query afterwards.
pub fn insert_batched(
    handle: &StageHandle,
    table: &str,
    columns: &[&str],
    rows: &[Vec<SqlValue>],
    batch_size: usize,
) -> Result<usize> {
    if batch_size == 0 {
        return Err(StagedbError::invalid_input(
            "batch size must be greater than 0",
        ));
    }
    if rows.is_empty() {
        return Ok(0);
    }

    let builder = InsertBuilder::new(table, columns);
    for batch in rows.chunks(batch_size) {
        handle.execute(&builder.multi_row(batch))?;
        log::debug!("Inserted batch of {} rows into {}", batch.len(), table);
    }

    Ok(rows.len())
}

/// Insert `rows` using one INSERT statement per record, concatenating the
/// statements of each batch into a single executor call.
///
/// Semantically equivalent to [`insert_batched`]: identical input yields
/// identical final row counts. The per-record statement shape allows each
/// row to carry values resolved earlier (typically a foreign key).
pub fn insert_each_batched(
    handle: &StageHandle,
    table: &str,
    columns: &[&str],
    rows: &[Vec<SqlValue>],
    batch_size: usize,
) -> Result<usize> {
    if batch_size == 0 {
        return Err(StagedbError::invalid_input(
            "batch size must be greater than 0",
        ));
    }
    if rows.is_empty() {
        return Ok(0);
    }

    let builder = InsertBuilder::new(table, columns);
    for batch in rows.chunks(batch_size) {
        let statements: Vec<String> = batch.iter().map(|row| builder.single_row(row)).collect();
        handle.execute(&statements.join(";\n"))?;
        log::debug!(
            "Inserted batch of {} single-row statements into {}",
            batch.len(),
            table
        );
    }

    Ok(rows.len())
}
