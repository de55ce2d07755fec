//! Transaction export to CSV and JSON.

mod export_model;
mod export_service;


pub use export_model::{suggested_file_name, ExportFormat, ExportRow, EXPORT_HEADER};
pub use export_service::{ExportService, ExportServiceTrait};
