pub mod source;
pub mod table;

pub use source::{CsvRateSource, RateSource};
pub use table::{normalize_percentage, TaxRate, TaxRateTable};
