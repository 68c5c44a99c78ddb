//! Normalization of the free text fields before they are encoded.

use super::constants::{MAX_MERCHANT_CITY_LEN, MAX_MERCHANT_NAME_LEN, MAX_TXID_LEN};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper-case and cut to the recommended 25 chars
pub fn sanitize_merchant_name(name: &str) -> String {
    upper_truncated(name, MAX_MERCHANT_NAME_LEN)
}

/// Upper-case and cut to the recommended 15 chars
pub fn sanitize_merchant_city(city: &str) -> String {
    upper_truncated(city, MAX_MERCHANT_CITY_LEN)
}

/// Empty txids count as absent. Longer ones are cut to 25 chars.
pub fn sanitize_txid(txid: Option<&str>) -> Option<String> {
    let txid = txid?;
    if txid.is_empty() {
        return None;
    }
    Some(txid.chars().take(MAX_TXID_LEN).collect())
}

// Upper-casing can grow a string ('ß' -> "SS"), so truncate afterwards
fn upper_truncated(value: &str, max_chars: usize) -> String {
    value.to_uppercase().chars().take(max_chars).collect()
}

/// Amount as supplied by the caller: a number or free text such as "10,50"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<u32> for AmountInput {
    fn from(value: u32) -> Self {
        AmountInput::Number(value as f64)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        AmountInput::Text(value)
    }
}

/// Non-negative BRL amount held in centavos
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    pub fn from_centavos(centavos: u64) -> Self {
        Self(centavos)
    }

    /// Round the exact binary value to centavos, ties away from zero.
    /// None for negative or non-finite values.
    pub fn from_reais(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let exact = Decimal::from_f64_retain(value)?;
        let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let centavos = rounded.checked_mul(Decimal::ONE_HUNDRED)?.trunc().to_u64()?;
        Some(Self(centavos))
    }

    pub fn centavos(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Result of reading an optional amount
#[derive(Debug, Clone, PartialEq)]
pub enum AmountOutcome {
    Parsed(Amount),
    Absent,
    /// Carries the input as given
    Invalid(String),
}

impl AmountOutcome {
    /// Permissive policy: an unreadable amount is treated as no amount at all
    pub fn into_amount(self) -> Option<Amount> {
        match self {
            AmountOutcome::Parsed(amount) => Some(amount),
            AmountOutcome::Absent => None,
            AmountOutcome::Invalid(raw) => {
                tracing::debug!("Ignoring unreadable amount {:?}, omitting field 54", raw);
                None
            }
        }
    }
}

/// Read an optional amount. Text accepts a comma as decimal separator.
///
/// Empty or whitespace-only text is `Absent`, so no field 54 is emitted
/// rather than a zero amount.
pub fn parse_amount(input: Option<&AmountInput>) -> AmountOutcome {
    match input {
        None => AmountOutcome::Absent,
        Some(AmountInput::Number(value)) => match Amount::from_reais(*value) {
            Some(amount) => AmountOutcome::Parsed(amount),
            None => AmountOutcome::Invalid(value.to_string()),
        },
        Some(AmountInput::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return AmountOutcome::Absent;
            }

            let normalized = trimmed.replacen(',', ".", 1);
            match normalized.parse::<f64>().ok().and_then(Amount::from_reais) {
                Some(amount) => AmountOutcome::Parsed(amount),
                None => AmountOutcome::Invalid(text.clone()),
            }
        }
    }
}
