use crate::error::InvoiceError;
use crate::render::{DocumentRenderer, InvoiceDocument, Row};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use std::fs;
use std::path::Path;

// A4, millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const ROW_HEIGHT: f32 = 10.0;
const TITLE_HEIGHT: f32 = 16.0;

const FONT_SIZE: f32 = 12.0;
const TITLE_FONT_SIZE: f32 = 20.0;
const PT_TO_MM: f32 = 0.3528;
// Average Helvetica glyph width relative to the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const ITEM_COLUMNS: [f32; 3] = [95.0, 35.0, 60.0];
const SUMMARY_COLUMNS: [f32; 2] = [130.0, 60.0];

/// A rendered PDF and the number of pages it spans
#[derive(Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Writes invoices as A4 PDFs using the built-in Helvetica fonts
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn render(&self, document: &InvoiceDocument, path: &Path) -> Result<(), InvoiceError> {
        let rendered = render_pdf(document)?;
        fs::write(path, &rendered.bytes)?;
        tracing::debug!("Wrote {} page(s) to {}", rendered.pages, path.display());
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Weight {
    Regular,
    Bold,
}

/// Cursor over the pages of one document
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance from the top edge of the current page
    cursor: f32,
    pages: usize,
    in_table: bool,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, InvoiceError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);
        layer.set_outline_thickness(0.3);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: MARGIN,
            pages: 1,
            in_table: false,
        })
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.layer.set_outline_thickness(0.3);
        self.cursor = MARGIN;
    }

    /// Break the page if `height` does not fit. Returns true on a break.
    fn ensure_room(&mut self, height: f32) -> bool {
        if self.cursor + height > PAGE_HEIGHT - MARGIN {
            self.new_page();
            return true;
        }
        false
    }

    fn font(&self, weight: Weight) -> &IndirectFontRef {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    /// Text centred horizontally in `[x, x + width]` on the current row
    fn text(&self, x: f32, width: f32, height: f32, text: &str, size: f32, weight: Weight) {
        let text_width = text.chars().count() as f32 * size * PT_TO_MM * AVG_GLYPH_WIDTH;
        let left = x + ((width - text_width) / 2.0).max(1.0);
        let top = PAGE_HEIGHT - self.cursor;
        let baseline = top - height / 2.0 - size * PT_TO_MM / 3.0;
        self.layer
            .use_text(text, size, Mm(left), Mm(baseline), self.font(weight));
    }

    fn border(&self, x: f32, width: f32, height: f32) {
        let top = PAGE_HEIGHT - self.cursor;
        let bottom = top - height;
        let corner = |x: f32, y: f32| (Point::new(Mm(x), Mm(y)), false);
        self.layer.add_line(Line {
            points: vec![
                corner(x, top),
                corner(x + width, top),
                corner(x + width, bottom),
                corner(x, bottom),
            ],
            is_closed: true,
        });
    }

    /// One row of bordered cells laid out left to right
    fn bordered_row(&mut self, cells: &[(f32, &str)], weight: Weight) {
        let mut x = MARGIN;
        for (width, text) in cells {
            self.border(x, *width, ROW_HEIGHT);
            self.text(x, *width, ROW_HEIGHT, text, FONT_SIZE, weight);
            x += width;
        }
        self.cursor += ROW_HEIGHT;
    }

    fn table_header(&mut self) {
        let [name, qty, price] = ITEM_COLUMNS;
        self.bordered_row(
            &[(name, "Item Name"), (qty, "Quantity"), (price, "Price")],
            Weight::Bold,
        );
    }

    fn row(&mut self, row: &Row) {
        match row {
            Row::Title(title) => {
                self.ensure_room(TITLE_HEIGHT);
                self.text(MARGIN, CONTENT_WIDTH, TITLE_HEIGHT, title, TITLE_FONT_SIZE, Weight::Bold);
                self.cursor += TITLE_HEIGHT;
            }
            Row::Detail(text) => {
                self.ensure_room(ROW_HEIGHT);
                self.text(MARGIN, CONTENT_WIDTH, ROW_HEIGHT, text, FONT_SIZE, Weight::Regular);
                self.cursor += ROW_HEIGHT;
            }
            Row::TableHeader => {
                self.ensure_room(ROW_HEIGHT);
                self.table_header();
                self.in_table = true;
            }
            Row::Item { name, quantity, price } => {
                // repeat the column header at the top of a continuation page
                if self.ensure_room(ROW_HEIGHT) && self.in_table {
                    self.table_header();
                }
                let [name_w, qty_w, price_w] = ITEM_COLUMNS;
                self.bordered_row(
                    &[(name_w, name.as_str()), (qty_w, quantity.as_str()), (price_w, price.as_str())],
                    Weight::Regular,
                );
            }
            Row::Spacer => {
                if !self.ensure_room(ROW_HEIGHT) {
                    self.cursor += ROW_HEIGHT;
                }
            }
            Row::Summary { label, amount } => {
                self.ensure_room(ROW_HEIGHT);
                let [label_w, amount_w] = SUMMARY_COLUMNS;
                self.bordered_row(
                    &[(label_w, label.as_str()), (amount_w, amount.as_str())],
                    Weight::Regular,
                );
            }
        }
    }

    fn finish(self) -> Result<RenderedPdf, InvoiceError> {
        let pages = self.pages;
        let bytes = self.doc.save_to_bytes()?;
        Ok(RenderedPdf { bytes, pages })
    }
}

/// Lay out every row, breaking pages as needed, and serialize the PDF.
pub fn render_pdf(document: &InvoiceDocument) -> Result<RenderedPdf, InvoiceError> {
    let mut writer = PageWriter::new(&document.title)?;
    for row in &document.rows {
        writer.row(row);
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SummaryLabel;

    fn document(items: usize) -> InvoiceDocument {
        let mut rows = vec![
            Row::Title("Invoice".into()),
            Row::Detail("Invoice No: GS-10001".into()),
            Row::TableHeader,
        ];
        for i in 0..items {
            rows.push(Row::Item {
                name: format!("Item {i}"),
                quantity: "1".into(),
                price: "$1.00".into(),
            });
            rows.push(Row::Spacer);
            rows.push(Row::Summary { label: SummaryLabel::Subtotal, amount: "$0.00".into() });
            rows.push(Row::Summary { label: SummaryLabel::Tax, amount: "$0.07".into() });
            rows.push(Row::Summary { label: SummaryLabel::Total, amount: "$1.07".into() });
        }
        InvoiceDocument { title: "Invoice GS-10001".into(), rows }
    }

    #[test]
    fn renders_a_pdf() {
        let pdf = render_pdf(&document(1)).expect("render");
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.pages, 1);
    }

    #[test]
    fn long_invoices_span_pages() {
        // five 10mm rows per item, roughly five items per page
        let pdf = render_pdf(&document(20)).expect("render");
        assert!(pdf.pages > 1, "expected several pages, got {}", pdf.pages);
    }

    #[test]
    fn renderer_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.pdf");
        PdfRenderer.render(&document(2), &path).expect("render");
        assert!(path.is_file());
    }
}
