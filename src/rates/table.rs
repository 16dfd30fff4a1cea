use crate::error::InvoiceError;
use bigdecimal::BigDecimal;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

pub const ABBREVIATION_COLUMN: &str = "Abbrv";
pub const STATE_RATE_COLUMN: &str = "State Tax Rate";
pub const AVG_LOCAL_RATE_COLUMN: &str = "Avg. Local Tax Rate";
pub const COMBINED_RATE_COLUMN: &str = "Combined Rate";
pub const MAX_LOCAL_RATE_COLUMN: &str = "Max Local Tax Rate";

/// One row of the rate table. Rates are percentages (7.25 means 7.25%).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxRate {
    pub state: String,
    pub state_rate: BigDecimal,
    pub avg_local_rate: Option<BigDecimal>,
    pub combined_rate: Option<BigDecimal>,
    pub max_local_rate: Option<BigDecimal>,
}

/// State code -> rate row, keys stored uppercase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRateTable {
    rates: HashMap<String, TaxRate>,
}

/// Strip quotes, whitespace and a trailing `%` from a percentage cell.
pub fn normalize_percentage(raw: &str) -> Result<BigDecimal, InvoiceError> {
    let cleaned = raw.replace('"', "");
    let cleaned = cleaned.trim().trim_end_matches('%').trim();
    BigDecimal::from_str(cleaned)
        .map_err(|_| InvoiceError::RateTable(format!("invalid percentage '{raw}'")))
}

/// Column positions resolved from the header row. First occurrence wins.
struct Columns {
    abbreviation: usize,
    state_rate: usize,
    avg_local_rate: Option<usize>,
    combined_rate: Option<usize>,
    max_local_rate: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, InvoiceError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let required = |name: &str| {
            find(name).ok_or_else(|| InvoiceError::RateTable(format!("missing column '{name}'")))
        };

        Ok(Self {
            abbreviation: required(ABBREVIATION_COLUMN)?,
            state_rate: required(STATE_RATE_COLUMN)?,
            avg_local_rate: find(AVG_LOCAL_RATE_COLUMN),
            combined_rate: find(COMBINED_RATE_COLUMN),
            max_local_rate: find(MAX_LOCAL_RATE_COLUMN),
        })
    }
}

fn optional_rate(
    record: &csv::StringRecord,
    column: Option<usize>,
) -> Result<Option<BigDecimal>, InvoiceError> {
    match column.and_then(|idx| record.get(idx)) {
        Some(cell) if !cell.trim().is_empty() => normalize_percentage(cell).map(Some),
        _ => Ok(None),
    }
}

impl TaxRateTable {
    /// Parse a CSV table with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InvoiceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let columns = Columns::resolve(rdr.headers()?)?;

        let mut rates = HashMap::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            let state = record
                .get(columns.abbreviation)
                .map(|s| s.trim().to_ascii_uppercase())
                .unwrap_or_default();
            if state.is_empty() {
                tracing::warn!("rate table row {} has no state abbreviation, skipping", idx + 1);
                continue;
            }

            let state_rate = record
                .get(columns.state_rate)
                .ok_or_else(|| {
                    InvoiceError::RateTable(format!("row {} is missing '{STATE_RATE_COLUMN}'", idx + 1))
                })
                .and_then(normalize_percentage)?;

            let rate = TaxRate {
                state: state.clone(),
                state_rate,
                avg_local_rate: optional_rate(&record, columns.avg_local_rate)?,
                combined_rate: optional_rate(&record, columns.combined_rate)?,
                max_local_rate: optional_rate(&record, columns.max_local_rate)?,
            };
            rates.entry(state).or_insert(rate);
        }

        Ok(Self { rates })
    }

    /// Build a table directly from `(state, percentage)` pairs.
    pub fn from_state_rates<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, BigDecimal)>,
        S: AsRef<str>,
    {
        let rates = rows
            .into_iter()
            .map(|(state, state_rate)| {
                let state = state.as_ref().trim().to_ascii_uppercase();
                let rate = TaxRate {
                    state: state.clone(),
                    state_rate,
                    avg_local_rate: None,
                    combined_rate: None,
                    max_local_rate: None,
                };
                (state, rate)
            })
            .collect();
        Self { rates }
    }

    /// Case-insensitive lookup
    pub fn get(&self, state: &str) -> Option<&TaxRate> {
        self.rates.get(&state.trim().to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}
