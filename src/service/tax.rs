use crate::error::InvoiceError;
use crate::rates::RateSource;
use bigdecimal::BigDecimal;

/// Decimal places tax amounts are rounded to
pub const TAX_SCALE: i64 = 2;

/// State sales tax calculator
pub struct TaxCalculator<S: RateSource> {
    source: S,
}

impl<S: RateSource> TaxCalculator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// `round(subtotal * rate / 100, 2)`, rate looked up case-insensitively.
    ///
    /// The table is reloaded on every call.
    pub fn calculate_tax(&self, state: &str, subtotal: &BigDecimal) -> Result<BigDecimal, InvoiceError> {
        let table = self.source.load()?;
        let Some(rate) = table.get(state) else {
            tracing::error!("No tax rate found for state {}.", state);
            return Err(InvoiceError::UnknownJurisdiction(state.to_string()));
        };

        let tax = (subtotal * &rate.state_rate / BigDecimal::from(100)).round(TAX_SCALE);
        Ok(tax)
    }
}
