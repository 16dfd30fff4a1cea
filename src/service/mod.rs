pub mod assembler;
pub mod tax;

pub use assembler::{fold_line_items, InvoiceAssembler};
pub use tax::TaxCalculator;
