pub mod customer;
pub mod invoice;
pub mod line_item;
pub mod snapshot;

pub use customer::{Address, Customer, StateCode, ZipCode};
pub use invoice::{Invoice, InvoiceId};
pub use line_item::LineItem;
pub use snapshot::LineSnapshot;
