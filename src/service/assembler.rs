use crate::error::InvoiceError;
use crate::events::{EventSink, InvoiceEvent};
use crate::models::{Invoice, InvoiceId, LineSnapshot};
use crate::rates::RateSource;
use crate::render::{DocumentRenderer, InvoiceDocument};
use crate::service::TaxCalculator;
use bigdecimal::{BigDecimal, Zero};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Fold the line items into per-item cumulative snapshots.
///
/// For each item: remember the running subtotal, add `quantity × unit_price`,
/// then tax the updated subtotal.
pub fn fold_line_items<S: RateSource>(
    invoice: &Invoice,
    calculator: &TaxCalculator<S>,
    sink: &dyn EventSink,
) -> Result<Vec<LineSnapshot>, InvoiceError> {
    let state = invoice.customer().address.state.as_str();
    let mut subtotal = BigDecimal::zero();
    let mut snapshots = Vec::with_capacity(invoice.items().len());

    for item in invoice.items() {
        let subtotal_before = subtotal.clone();
        subtotal = &subtotal + item.amount();

        let tax = calculator.calculate_tax(state, &subtotal)?;
        sink.record(&InvoiceEvent::TaxComputed {
            state: state.to_string(),
            subtotal: subtotal.to_string(),
            tax: tax.to_string(),
        });

        let total = &subtotal + &tax;
        snapshots.push(LineSnapshot {
            item: item.clone(),
            subtotal_before,
            subtotal: subtotal.clone(),
            tax,
            total,
        });
    }

    Ok(snapshots)
}

/// Turns an invoice into a verified document on disk
pub struct InvoiceAssembler<S: RateSource, R: DocumentRenderer> {
    calculator: TaxCalculator<S>,
    renderer: R,
    output_dir: PathBuf,
}

impl<S: RateSource, R: DocumentRenderer> InvoiceAssembler<S, R> {
    pub fn new(calculator: TaxCalculator<S>, renderer: R, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            calculator,
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// `<output_dir>/<id>/<id>.pdf`
    pub fn output_path(&self, id: &InvoiceId) -> PathBuf {
        self.output_dir
            .join(id.as_str())
            .join(format!("{}.pdf", id.as_str()))
    }

    /// Compute totals, render and write the document, then check it landed.
    pub fn generate(&self, invoice: &Invoice, sink: &dyn EventSink) -> Result<PathBuf, InvoiceError> {
        // 1. Every tax lookup happens before anything touches the disk
        let snapshots = fold_line_items(invoice, &self.calculator, sink)?;

        // 2. Layout
        let document = InvoiceDocument::build(invoice, &snapshots, Local::now().date_naive());

        // 3. Write
        let path = self.output_path(invoice.id());
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        self.renderer.render(&document, &path)?;

        // 4. Verify
        verify_written(invoice.id(), &path)?;
        sink.record(&InvoiceEvent::InvoiceWritten {
            invoice_id: invoice.id().to_string(),
            path: path.display().to_string(),
        });

        Ok(path)
    }
}

fn verify_written(id: &InvoiceId, path: &Path) -> Result<(), InvoiceError> {
    if path.is_file() {
        return Ok(());
    }
    tracing::error!("Failed to generate invoice {}.", id);
    Err(InvoiceError::WriteVerificationFailed(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::testing::RecordingSink;
    use crate::models::{Address, Customer, LineItem, StateCode, ZipCode};
    use crate::rates::TaxRateTable;
    use crate::render::{Row, SummaryLabel};
    use chrono::NaiveDate;
    use std::cell::Cell;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("decimal")
    }

    fn calculator() -> TaxCalculator<TaxRateTable> {
        TaxCalculator::new(TaxRateTable::from_state_rates([("CA", dec("7.25"))]))
    }

    fn invoice_for(state: &str) -> Invoice {
        let customer = Customer {
            name: "Ada Lovelace".into(),
            address: Address {
                street: "12 Analytical Way".into(),
                city: "Sacramento".into(),
                state: StateCode::parse(state).expect("state"),
                zip: ZipCode::new(95814).expect("zip"),
            },
        };
        let items = vec![
            LineItem::new("A", 2, dec("10.00")).expect("item"),
            LineItem::new("B", 1, dec("5.00")).expect("item"),
        ];
        Invoice::new(InvoiceId::from("GS-12345"), customer, items).expect("invoice")
    }

    /// Renderer stub that optionally creates the target file
    struct StubRenderer {
        write_file: bool,
        calls: Cell<usize>,
    }

    impl StubRenderer {
        fn new(write_file: bool) -> Self {
            Self { write_file, calls: Cell::new(0) }
        }
    }

    impl DocumentRenderer for StubRenderer {
        fn render(&self, _document: &InvoiceDocument, path: &Path) -> Result<(), InvoiceError> {
            self.calls.set(self.calls.get() + 1);
            if self.write_file {
                fs::write(path, b"%PDF-stub")?;
            }
            Ok(())
        }
    }

    #[test]
    fn fold_accumulates_subtotal_tax_and_total() {
        let sink = RecordingSink::default();
        let snaps = fold_line_items(&invoice_for("CA"), &calculator(), &sink).expect("fold");

        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].subtotal_before, dec("0"));
        assert_eq!(snaps[0].subtotal, dec("20.00"));
        assert_eq!(snaps[0].tax, dec("1.45"));
        assert_eq!(snaps[0].total, dec("21.45"));

        let last = &snaps[1];
        assert_eq!(last.subtotal_before, dec("20.00"));
        assert_eq!(last.subtotal, dec("25.00"));
        assert_eq!(last.tax, dec("1.81"));
        assert_eq!(last.total, dec("26.81"));

        for snap in &snaps {
            assert_eq!(snap.total, &snap.subtotal + &snap.tax);
        }
        assert_eq!(sink.take().len(), 2);
    }

    #[test]
    fn fold_fails_on_unknown_state() {
        let sink = RecordingSink::default();
        let err = fold_line_items(&invoice_for("ZZ"), &calculator(), &sink).unwrap_err();
        assert!(matches!(err, InvoiceError::UnknownJurisdiction(s) if s == "ZZ"));
    }

    #[test]
    fn document_shows_subtotal_before_each_item() {
        let invoice = invoice_for("CA");
        let snaps = fold_line_items(&invoice, &calculator(), &RecordingSink::default()).expect("fold");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        let doc = InvoiceDocument::build(&invoice, &snaps, date);

        let summaries: Vec<_> = doc.summaries().collect();
        assert_eq!(
            summaries,
            vec![
                (SummaryLabel::Subtotal, "$0.00"),
                (SummaryLabel::Tax, "$1.45"),
                (SummaryLabel::Total, "$21.45"),
                (SummaryLabel::Subtotal, "$20.00"),
                (SummaryLabel::Tax, "$1.81"),
                (SummaryLabel::Total, "$26.81"),
            ]
        );
    }

    #[test]
    fn document_header_lists_customer_details() {
        let invoice = invoice_for("CA");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        let doc = InvoiceDocument::build(&invoice, &[], date);

        assert_eq!(doc.rows[0], Row::Title("Invoice".into()));
        assert!(doc.rows.contains(&Row::Detail("Invoice No: GS-12345".into())));
        assert!(doc.rows.contains(&Row::Detail("Date: 2024-03-01".into())));
        assert!(doc.rows.contains(&Row::Detail("Customer State: CA".into())));
        assert!(doc.rows.contains(&Row::Detail("Customer Zip Code: 95814".into())));
        assert_eq!(doc.rows.last(), Some(&Row::TableHeader));
    }

    #[test]
    fn item_rows_precede_their_summary_block() {
        let invoice = invoice_for("CA");
        let snaps = fold_line_items(&invoice, &calculator(), &RecordingSink::default()).expect("fold");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        let doc = InvoiceDocument::build(&invoice, &snaps, date);

        let header = doc.rows.iter().position(|r| *r == Row::TableHeader).expect("header");
        let body = &doc.rows[header + 1..];
        assert_eq!(
            body[0],
            Row::Item { name: "A".into(), quantity: "2".into(), price: "$10.00".into() }
        );
        assert_eq!(body[1], Row::Spacer);
        assert!(matches!(body[2], Row::Summary { label: SummaryLabel::Subtotal, .. }));
        assert_eq!(
            body[5],
            Row::Item { name: "B".into(), quantity: "1".into(), price: "$5.00".into() }
        );
        assert_eq!(body.len(), 10);
    }

    #[test]
    fn generate_writes_under_invoice_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assembler = InvoiceAssembler::new(calculator(), StubRenderer::new(true), dir.path());
        let sink = RecordingSink::default();

        let path = assembler.generate(&invoice_for("CA"), &sink).expect("generate");
        assert_eq!(path, dir.path().join("GS-12345").join("GS-12345.pdf"));
        assert!(path.is_file());
        assert!(sink
            .take()
            .iter()
            .any(|e| matches!(e, InvoiceEvent::InvoiceWritten { invoice_id, .. } if invoice_id == "GS-12345")));
    }

    #[test]
    fn missing_output_fails_verification() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assembler = InvoiceAssembler::new(calculator(), StubRenderer::new(false), dir.path());

        let err = assembler
            .generate(&invoice_for("CA"), &RecordingSink::default())
            .unwrap_err();
        assert!(matches!(err, InvoiceError::WriteVerificationFailed(id) if id == "GS-12345"));
    }

    #[test]
    fn unknown_state_never_reaches_the_renderer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let renderer = StubRenderer::new(true);
        let assembler = InvoiceAssembler::new(calculator(), renderer, dir.path());

        let err = assembler
            .generate(&invoice_for("ZZ"), &RecordingSink::default())
            .unwrap_err();
        assert!(matches!(err, InvoiceError::UnknownJurisdiction(_)));
        assert_eq!(assembler.renderer.calls.get(), 0);
        assert!(!dir.path().join("GS-12345").exists());
    }
}
