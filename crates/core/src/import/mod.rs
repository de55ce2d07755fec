//! CSV import of transactions.

mod amount_parser;
mod csv_reader;
mod import_model;
mod import_service;
mod import_traits;


pub use amount_parser::parse_amount;
pub use csv_reader::{read_csv, CsvRow, CsvTable};
pub use import_model::{ImportColumns, ImportConfig, ImportResult, ImportRowError};
pub use import_service::ImportService;
pub use import_traits::ImportServiceTrait;
