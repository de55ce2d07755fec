use csv::{Terminator, WriterBuilder};
use log::debug;
use std::sync::Arc;

use super::export_model::{csv_record, ExportRow, EXPORT_HEADER};
use crate::errors::{Error, Result};
use crate::transactions::{TransactionFilter, TransactionRepositoryTrait};

pub trait ExportServiceTrait: Send + Sync {
    /// The filtered transactions as CSV text with a header row.
    fn export_csv(&self, user_id: &str, filter: &TransactionFilter) -> Result<String>;

    fn export_json(&self, user_id: &str, filter: &TransactionFilter) -> Result<Vec<ExportRow>>;
}

pub struct ExportService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl ExportService {
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        Self {
            transaction_repository,
        }
    }
}

impl ExportServiceTrait for ExportService {
    fn export_csv(&self, user_id: &str, filter: &TransactionFilter) -> Result<String> {
        let rows = self.transaction_repository.list(user_id, filter)?;
        debug!("Exporting {} transactions as CSV for user {}", rows.len(), user_id);

        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;
        for details in &rows {
            writer.write_record(csv_record(details))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Unexpected(format!("CSV export failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::Unexpected(e.to_string()))
    }

    fn export_json(&self, user_id: &str, filter: &TransactionFilter) -> Result<Vec<ExportRow>> {
        let rows = self.transaction_repository.list(user_id, filter)?;
        Ok(rows.iter().map(ExportRow::from).collect())
    }
}
