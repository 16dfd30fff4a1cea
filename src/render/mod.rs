pub mod document;
pub mod pdf;

pub use document::{format_money, InvoiceDocument, Row, SummaryLabel};
pub use pdf::{render_pdf, PdfRenderer, RenderedPdf};

use crate::error::InvoiceError;
use std::path::Path;

/// Output backend for a laid-out invoice
pub trait DocumentRenderer {
    fn render(&self, document: &InvoiceDocument, path: &Path) -> Result<(), InvoiceError>;
}
