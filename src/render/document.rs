use crate::models::{Invoice, LineSnapshot};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// Summary row kinds printed after every item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLabel {
    Subtotal,
    Tax,
    Total,
}

impl SummaryLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLabel::Subtotal => "Subtotal",
            SummaryLabel::Tax => "Tax",
            SummaryLabel::Total => "Total",
        }
    }
}

/// Layout-independent document row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Title(String),
    Detail(String),
    TableHeader,
    Item { name: String, quantity: String, price: String },
    Spacer,
    Summary { label: SummaryLabel, amount: String },
}

/// Rows of one invoice, in print order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub title: String,
    pub rows: Vec<Row>,
}

/// `$1234.50`
pub fn format_money(value: &BigDecimal) -> String {
    format!("${}", value.round(2).with_scale(2))
}

impl InvoiceDocument {
    /// Lay out the header block, then one item row followed by its
    /// Subtotal/Tax/Total block per snapshot.
    ///
    /// The Subtotal row carries the subtotal *before* the item; Tax and
    /// Total carry the values after it.
    pub fn build(invoice: &Invoice, snapshots: &[LineSnapshot], issued_on: NaiveDate) -> Self {
        let customer = invoice.customer();
        let address = &customer.address;

        let mut rows = vec![
            Row::Title("Invoice".to_string()),
            Row::Detail(format!("Invoice No: {}", invoice.id())),
            Row::Detail(format!("Date: {}", issued_on.format("%Y-%m-%d"))),
            Row::Detail(format!("Customer Name: {}", customer.name)),
            Row::Detail(format!("Customer Street Address: {}", address.street)),
            Row::Detail(format!("Customer City: {}", address.city)),
            Row::Detail(format!("Customer State: {}", address.state)),
            Row::Detail(format!("Customer Zip Code: {}", address.zip)),
            Row::Detail("Items".to_string()),
            Row::TableHeader,
        ];

        for snap in snapshots {
            rows.push(Row::Item {
                name: snap.item.name().to_string(),
                quantity: snap.item.quantity().to_string(),
                price: format_money(snap.item.unit_price()),
            });
            rows.push(Row::Spacer);
            rows.push(Row::Summary {
                label: SummaryLabel::Subtotal,
                amount: format_money(&snap.subtotal_before),
            });
            rows.push(Row::Summary {
                label: SummaryLabel::Tax,
                amount: format_money(&snap.tax),
            });
            rows.push(Row::Summary {
                label: SummaryLabel::Total,
                amount: format_money(&snap.total),
            });
        }

        Self {
            title: format!("Invoice {}", invoice.id()),
            rows,
        }
    }

    /// Summary rows only, as `(label, amount)`
    pub fn summaries(&self) -> impl Iterator<Item = (SummaryLabel, &str)> {
        self.rows.iter().filter_map(|row| match row {
            Row::Summary { label, amount } => Some((*label, amount.as_str())),
            _ => None,
        })
    }
}
