//! Data module - CSV loading and processing

mod loader;
mod processor;

pub use loader::{CsvTable, LoaderError};
pub use processor::{DataProcessor, ProcessorError};
