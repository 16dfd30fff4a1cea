use crate::cli::normalize::{capitalize, title_case};
use crate::error::{InputError, InvoiceError};
use crate::events::{EventSink, InvoiceEvent};
use crate::models::{Address, Customer, LineItem, StateCode, ZipCode};
use bigdecimal::{BigDecimal, Zero};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Exactly five ASCII digits, not all zero
pub fn parse_zip(raw: &str) -> Result<ZipCode, InputError> {
    let raw = raw.trim();
    if raw.len() != 5 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidZip);
    }
    raw.parse::<u32>()
        .ok()
        .and_then(ZipCode::new)
        .ok_or(InputError::InvalidZip)
}

/// Positive whole number
pub fn parse_quantity(raw: &str) -> Result<u32, InputError> {
    let raw = raw.trim();
    let value: i64 = raw
        .parse()
        .map_err(|_| InputError::InvalidQuantity(raw.to_string()))?;
    if value <= 0 {
        return Err(InputError::NonPositiveQuantity);
    }
    u32::try_from(value).map_err(|_| InputError::InvalidQuantity(raw.to_string()))
}

/// Plain `digits[.digits]`; no sign or exponent
fn is_plain_decimal(s: &str) -> bool {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    !(whole.is_empty() && frac.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

/// Positive decimal, an optional leading `$` is accepted
pub fn parse_price(raw: &str) -> Result<BigDecimal, InputError> {
    let raw = raw.trim();
    let number = raw.strip_prefix('$').unwrap_or(raw).trim();
    if let Some(unsigned) = number.strip_prefix('-') {
        if is_plain_decimal(unsigned) {
            return Err(InputError::NonPositivePrice);
        }
        return Err(InputError::InvalidPrice(raw.to_string()));
    }
    if !is_plain_decimal(number) {
        return Err(InputError::InvalidPrice(raw.to_string()));
    }
    let value = BigDecimal::from_str(number)
        .map_err(|_| InputError::InvalidPrice(raw.to_string()))?;
    if value <= BigDecimal::zero() {
        return Err(InputError::NonPositivePrice);
    }
    Ok(value)
}

/// `yes` -> true, `no` -> false, case-insensitive
pub fn parse_confirmation(raw: &str) -> Result<bool, InputError> {
    match raw.trim().to_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(InputError::InvalidConfirmation),
    }
}

/// Interactive prompts over any line-based reader/writer pair
pub struct Prompter<'a, R, W> {
    input: R,
    output: W,
    sink: &'a dyn EventSink,
}

impl<'a, R: BufRead, W: Write> Prompter<'a, R, W> {
    pub fn new(input: R, output: W, sink: &'a dyn EventSink) -> Self {
        Self { input, output, sink }
    }

    /// Print `question` and read one line. EOF is fatal.
    fn ask(&mut self, question: &str, field: &'static str) -> Result<String, InvoiceError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InvoiceError::InputClosed(field));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until `parse` accepts the answer. Rejections are printed and recorded.
    fn ask_until<T>(
        &mut self,
        question: &str,
        field: &'static str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<T, InvoiceError> {
        loop {
            let answer = self.ask(question, field)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    self.sink.record(&InvoiceEvent::InputRejected {
                        field,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    /// Name, street, city, state and zip.
    ///
    /// A state that is not two letters aborts before the zip is asked for.
    pub fn read_customer(&mut self) -> Result<Customer, InvoiceError> {
        let name = title_case(self.ask("Enter Customer Name: ", "customer name")?.trim());
        let street = title_case(self.ask("Enter Customer Street Address: ", "street address")?.trim());
        let city = capitalize(self.ask("Enter Customer City: ", "city")?.trim());
        let state = StateCode::parse(&self.ask("Enter Customer State: ", "state")?)?;
        let zip = self.ask_until("Enter Customer Zip Code: ", "zip code", parse_zip)?;

        Ok(Customer {
            name,
            address: Address {
                street,
                city,
                state,
                zip,
            },
        })
    }

    /// At least one item; keeps going while the user answers `yes`.
    pub fn read_items(&mut self) -> Result<Vec<LineItem>, InvoiceError> {
        let mut items = Vec::new();
        loop {
            let name = self.ask("Enter Item Name: ", "item name")?.trim().to_string();
            let quantity = self.ask_until("Enter Item Quantity: ", "quantity", parse_quantity)?;
            let price = self.ask_until("Enter Item Price: ", "price", parse_price)?;

            let item = LineItem::new(name, quantity, price)?;
            self.sink.record(&InvoiceEvent::ItemAdded {
                name: item.name().to_string(),
                quantity: item.quantity(),
            });
            items.push(item);

            let more = self.ask_until(
                "Do you want to add more items? (yes/no): ",
                "confirmation",
                parse_confirmation,
            )?;
            if !more {
                return Ok(items);
            }
        }
    }
}
