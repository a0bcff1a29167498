//! CSV export of the contribution history. Rendering and download
//! plumbing live outside this core; this module only produces the rows.

use std::io::Write;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::TransactionWithUser;

const HEADERS: [&str; 6] = ["id", "date", "user", "amount", "notes", "image_url"];

/// Writes the contribution history as CSV, one row per transaction in the
/// order given (callers pass the newest-first export list).
pub fn write_csv<W: Write>(rows: &[TransactionWithUser], writer: W) -> ServiceResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HEADERS).map_err(csv_error)?;
    for row in rows {
        let tx = &row.transaction;
        out.write_record([
            tx.id.to_string(),
            tx.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.user_name().to_string(),
            tx.amount.to_string(),
            tx.notes.clone().unwrap_or_default(),
            tx.image_url.clone().unwrap_or_default(),
        ])
        .map_err(csv_error)?;
    }
    out.flush().map_err(|err| {
        ServiceError::Store(crate::errors::StoreError::Io(err))
    })?;
    Ok(())
}

/// Renders the history to an in-memory CSV string.
pub fn to_csv_string(rows: &[TransactionWithUser]) -> ServiceResult<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| ServiceError::Store(crate::errors::StoreError::Serde(err.to_string())))
}

fn csv_error(err: csv::Error) -> ServiceError {
    ServiceError::Store(crate::errors::StoreError::Backend(err.to_string()))
}
