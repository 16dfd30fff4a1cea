use crate::models::LineItem;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Cumulative totals right after one line item has been processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub item: LineItem,
    /// Running subtotal before this item was added
    pub subtotal_before: BigDecimal,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    /// Always `subtotal + tax`
    pub total: BigDecimal,
}
