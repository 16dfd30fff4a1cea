use crate::error::InputError;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// One purchased product or service. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    name: String,
    quantity: u32,
    unit_price: BigDecimal,
}

impl LineItem {
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit_price: BigDecimal,
    ) -> Result<Self, InputError> {
        if quantity == 0 {
            return Err(InputError::NonPositiveQuantity);
        }
        if unit_price <= BigDecimal::zero() {
            return Err(InputError::NonPositivePrice);
        }
        Ok(Self {
            name: name.into(),
            quantity,
            unit_price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }

    /// quantity × unit_price
    pub fn amount(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.unit_price
    }
}
