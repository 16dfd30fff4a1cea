use std::fmt;

/// Domain events worth keeping in the run log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceEvent {
    RunStarted,
    InputRejected { field: &'static str, reason: String },
    ItemAdded { name: String, quantity: u32 },
    TaxComputed { state: String, subtotal: String, tax: String },
    InvoiceWritten { invoice_id: String, path: String },
    RunFailed { reason: String },
}

impl InvoiceEvent {
    pub fn is_error(&self) -> bool {
        matches!(self, InvoiceEvent::InputRejected { .. } | InvoiceEvent::RunFailed { .. })
    }
}

impl fmt::Display for InvoiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceEvent::RunStarted => write!(f, "Invoice generation started."),
            InvoiceEvent::InputRejected { field, reason } => write!(f, "Rejected {field}: {reason}"),
            InvoiceEvent::ItemAdded { name, quantity } => write!(f, "Added item '{name}' x{quantity}"),
            InvoiceEvent::TaxComputed { state, subtotal, tax } => {
                write!(f, "Tax for {state} on subtotal {subtotal}: {tax}")
            }
            InvoiceEvent::InvoiceWritten { invoice_id, path } => {
                write!(f, "Invoice {invoice_id} generated successfully at {path}.")
            }
            InvoiceEvent::RunFailed { reason } => write!(f, "An error occurred: {reason}"),
        }
    }
}

/// Receives events; never influences control flow.
pub trait EventSink {
    fn record(&self, event: &InvoiceEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &InvoiceEvent) {
        match event {
            e if e.is_error() => tracing::error!("{}", e),
            e @ InvoiceEvent::TaxComputed { .. } => tracing::debug!("{}", e),
            e => tracing::info!("{}", e),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Keeps every event for assertions
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub events: RefCell<Vec<InvoiceEvent>>,
    }

    impl EventSink for RecordingSink {
        fn record(&self, event: &InvoiceEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    impl RecordingSink {
        pub fn take(&self) -> Vec<InvoiceEvent> {
            self.events.borrow_mut().drain(..).collect()
        }
    }
}
