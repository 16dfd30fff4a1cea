pub mod normalize;
pub mod prompt;

pub use prompt::{parse_confirmation, parse_price, parse_quantity, parse_zip, Prompter};
