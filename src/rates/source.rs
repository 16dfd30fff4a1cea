use crate::error::InvoiceError;
use crate::rates::TaxRateTable;
use std::fs::File;
use std::path::PathBuf;

/// Where the tax rate table comes from. Called once per tax calculation.
pub trait RateSource {
    fn load(&self) -> Result<TaxRateTable, InvoiceError>;
}

/// Rate table read from a CSV file on every load
#[derive(Debug, Clone)]
pub struct CsvRateSource {
    path: PathBuf,
}

impl CsvRateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RateSource for CsvRateSource {
    fn load(&self) -> Result<TaxRateTable, InvoiceError> {
        let file = File::open(&self.path).map_err(|e| {
            InvoiceError::RateTable(format!("cannot open {}: {}", self.path.display(), e))
        })?;
        let table = TaxRateTable::from_reader(file)?;
        tracing::debug!("Loaded {} tax rates from {}", table.len(), self.path.display());
        Ok(table)
    }
}

/// Fixed in-memory table
impl RateSource for TaxRateTable {
    fn load(&self) -> Result<TaxRateTable, InvoiceError> {
        Ok(self.clone())
    }
}
