use crate::types::errors::MonetaryError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const DECIMAL_PLACES: u32 = 2;

/// A non-negative claim amount with at most two decimal places.
///
/// The validated input text is kept verbatim for display and serialization, so `"0012.50"`
/// renders as `0012.50`. Arithmetic, equality and ordering use the numeric value.
#[derive(Debug, Clone)]
pub struct Monetary {
    value: Decimal,
    text: Box<str>
}

impl Monetary {
    fn from_decimal(value: Decimal) -> Self {
        Self { text: value.to_string().into_boxed_str(), value }
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Arithmetic mean rounded to exactly two decimal places, midpoint away from zero.
    ///
    /// Returns `None` for an empty slice or when the running sum overflows.
    pub fn mean(values: &[Monetary]) -> Option<Monetary> {
        if values.is_empty() {
            return None;
        }

        let total = values.iter().try_fold(Decimal::ZERO, |sum, value| sum.checked_add(value.value))?;
        let mean = total.checked_div(Decimal::from(values.len()))?;

        let mut mean = mean.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        mean.rescale(DECIMAL_PLACES);

        Some(Monetary::from_decimal(mean))
    }

    /// Serializes the amount as a JSON number instead of its textual form.
    pub fn serialize_number<S>(value: &Monetary, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number = value.value.to_f64()
            .ok_or_else(|| ser::Error::custom(format!("Monetary value {value} is not representable as a number")))?;

        serializer.serialize_f64(number)
    }
}

impl Display for Monetary {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

impl PartialEq for Monetary {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Monetary {}

impl PartialOrd for Monetary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Monetary {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Monetary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl FromStr for Monetary {
    type Err = MonetaryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(MonetaryError::InvalidFormat("Value is an empty string".to_string()));
        }

        let (integer, fraction) = match value.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (value, None)
        };

        if integer.is_empty() || !integer.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(MonetaryError::InvalidFormat(format!("Value has an invalid integer part: {value:?}")));
        }

        if let Some(fraction) = fraction {
            if fraction.len() != DECIMAL_PLACES as usize || !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(MonetaryError::InvalidFormat(format!("Value must have exactly {DECIMAL_PLACES} decimal places: {value:?}")));
            }
        }

        let decimal = Decimal::from_str_exact(value).map_err(|_| MonetaryError::Overflow)?;

        Ok(Monetary { value: decimal, text: value.into() })
    }
}

impl Serialize for Monetary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Monetary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Monetary::from_str(&value).map_err(de::Error::custom)
    }
}
