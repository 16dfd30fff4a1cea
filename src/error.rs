use thiserror::Error;

/// Recoverable input problems. The prompt loops reprompt on these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Zip code must be a 5 digit number.")]
    InvalidZip,

    #[error("Quantity must be a whole number, got '{0}'.")]
    InvalidQuantity(String),

    #[error("Quantity must be a positive integer.")]
    NonPositiveQuantity,

    #[error("Price must be a number, got '{0}'.")]
    InvalidPrice(String),

    #[error("Price must not be zero and must be positive.")]
    NonPositivePrice,

    #[error("Invalid input. Please enter 'yes' or 'no'.")]
    InvalidConfirmation,
}

/// Fatal errors that end an invoice run.
#[derive(Error, Debug)]
pub enum InvoiceError {
    /// The state must be exactly two letters. Never truncated.
    #[error("State must be a 2 character abbreviation, got '{0}'.")]
    InvalidStateCode(String),

    #[error("No tax rate found for state {0}.")]
    UnknownJurisdiction(String),

    #[error("Failed to generate invoice {0}. Please check the logs for more details.")]
    WriteVerificationFailed(String),

    #[error("invoice {0} has no line items")]
    EmptyInvoice(String),

    #[error(transparent)]
    InvalidLineItem(#[from] InputError),

    #[error("input closed before {0} was entered")]
    InputClosed(&'static str),

    #[error("tax rate table: {0}")]
    RateTable(String),

    #[error("pdf rendering failed: {0}")]
    Render(#[from] printpdf::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl From<csv::Error> for InvoiceError {
    fn from(e: csv::Error) -> Self {
        InvoiceError::RateTable(e.to_string())
    }
}
