pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod rates;
pub mod render;
pub mod service;

pub use config::AppConfig;
pub use error::{InputError, InvoiceError};
pub use events::{EventSink, InvoiceEvent, TracingSink};
pub use rates::{CsvRateSource, RateSource, TaxRateTable};
pub use render::PdfRenderer;
pub use service::{InvoiceAssembler, TaxCalculator};
