use crate::error::InvoiceError;
use crate::models::{Customer, LineItem};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const SUFFIX_MIN: u32 = 10_001;
const SUFFIX_MAX: u32 = 99_999;

/// Invoice number in the form `PREFIX-NNNNN`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
    /// Random 5-digit suffix. No check against earlier runs.
    pub fn generate<R: Rng>(prefix: &str, rng: &mut R) -> Self {
        let suffix = rng.gen_range(SUFFIX_MIN..=SUFFIX_MAX);
        Self(format!("{prefix}-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InvoiceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Invoice header plus its ordered line items.
///
/// Subtotal, tax and total are not stored here; they only exist as
/// [`LineSnapshot`](crate::models::LineSnapshot)s produced by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    customer: Customer,
    items: Vec<LineItem>,
}

impl Invoice {
    pub fn new(id: InvoiceId, customer: Customer, items: Vec<LineItem>) -> Result<Self, InvoiceError> {
        if items.is_empty() {
            return Err(InvoiceError::EmptyInvoice(id.to_string()));
        }
        Ok(Self { id, customer, items })
    }

    pub fn id(&self) -> &InvoiceId {
        &self.id
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }
}
