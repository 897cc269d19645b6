//! Transfer-limit and usage-counter types.
//!
//! Limits and counters are persisted as jsonb blobs keyed by channel name, so
//! adding a channel is a code change, never a schema migration. The blobs are
//! parsed into these types on read; a malformed blob is a hard error for the
//! caller to classify, never a panic.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A transfer category with independent limits and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Transfers,
    Bills,
    Ussd,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Transfers, Channel::Bills, Channel::Ussd];

    /// Channel name as it appears in the jsonb blobs and request bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Transfers => "transfers",
            Channel::Bills => "bills",
            Channel::Ussd => "ussd",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "transfers" => Some(Channel::Transfers),
            "bills" => Some(Channel::Bills),
            "ussd" => Some(Channel::Ussd),
            _ => None,
        }
    }
}

/// Per-channel ceilings: `single` caps one transaction, `daily` caps the
/// cumulative amount for the current calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelLimit {
    pub single: Decimal,
    pub daily: Decimal,
}

/// Channel limits for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub transfers: ChannelLimit,
    pub bills: ChannelLimit,
    pub ussd: ChannelLimit,
}

/// Cumulative amount moved per channel for the current calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub transfers: Decimal,
    pub bills: Decimal,
    pub ussd: Decimal,
}

/// Default limits blob, bit-compatible with the legacy system.
pub const DEFAULT_LIMITS_JSON: &str = r#"{"transfers":{"single":200000,"daily":600000},"bills":{"single":100000,"daily":200000},"ussd":{"single":10000,"daily":20000}}"#;

/// Default (all-zero) counter blob.
pub const DEFAULT_COUNTER_JSON: &str = r#"{"transfers":0,"bills":0,"ussd":0}"#;

/// A limits/counter blob that does not have the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("`{0}` is not a valid amount")]
    BadAmount(String),
}

/// Extract an exact decimal from a JSON number or string.
///
/// Goes through the number's text rendering instead of `f64` so currency
/// values keep their exact decimal representation.
fn decimal_at(value: &serde_json::Value, path: &str) -> Result<Decimal, BlobError> {
    let field = value
        .pointer(path)
        .ok_or_else(|| BlobError::MissingField(path.to_owned()))?;
    let text = match field {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => return Err(BlobError::BadAmount(path.to_owned())),
    };
    Decimal::from_str(&text).map_err(|_| BlobError::BadAmount(path.to_owned()))
}

impl Limits {
    /// Parse a persisted limits blob.
    pub fn from_blob(value: &serde_json::Value) -> Result<Self, BlobError> {
        let channel = |name: &str| -> Result<ChannelLimit, BlobError> {
            Ok(ChannelLimit {
                single: decimal_at(value, &format!("/{name}/single"))?,
                daily: decimal_at(value, &format!("/{name}/daily"))?,
            })
        };
        Ok(Limits {
            transfers: channel("transfers")?,
            bills: channel("bills")?,
            ussd: channel("ussd")?,
        })
    }

    pub fn channel(&self, channel: Channel) -> ChannelLimit {
        match channel {
            Channel::Transfers => self.transfers,
            Channel::Bills => self.bills,
            Channel::Ussd => self.ussd,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            transfers: ChannelLimit {
                single: Decimal::from(200_000),
                daily: Decimal::from(600_000),
            },
            bills: ChannelLimit {
                single: Decimal::from(100_000),
                daily: Decimal::from(200_000),
            },
            ussd: ChannelLimit {
                single: Decimal::from(10_000),
                daily: Decimal::from(20_000),
            },
        }
    }
}

impl Counter {
    /// Parse a persisted counter blob.
    pub fn from_blob(value: &serde_json::Value) -> Result<Self, BlobError> {
        Ok(Counter {
            transfers: decimal_at(value, "/transfers")?,
            bills: decimal_at(value, "/bills")?,
            ussd: decimal_at(value, "/ussd")?,
        })
    }

    pub fn channel(&self, channel: Channel) -> Decimal {
        match channel {
            Channel::Transfers => self.transfers,
            Channel::Bills => self.bills,
            Channel::Ussd => self.ussd,
        }
    }

    pub fn zero() -> Self {
        Counter {
            transfers: Decimal::ZERO,
            bills: Decimal::ZERO,
            ussd: Decimal::ZERO,
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Counter::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_default_limits_blob() {
        let value: serde_json::Value = serde_json::from_str(DEFAULT_LIMITS_JSON).unwrap();
        let limits = Limits::from_blob(&value).unwrap();
        assert_eq!(limits, Limits::default());
    }

    #[test]
    fn should_parse_default_counter_blob() {
        let value: serde_json::Value = serde_json::from_str(DEFAULT_COUNTER_JSON).unwrap();
        let counter = Counter::from_blob(&value).unwrap();
        assert_eq!(counter, Counter::zero());
    }

    #[test]
    fn should_round_trip_counter_with_fractional_amounts() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"transfers":500000.50,"bills":0.01,"ussd":0}"#).unwrap();
        let counter = Counter::from_blob(&value).unwrap();
        assert_eq!(counter.transfers, Decimal::from_str("500000.50").unwrap());
        assert_eq!(counter.bills, Decimal::from_str("0.01").unwrap());
        assert_eq!(counter.ussd, Decimal::ZERO);
    }

    #[test]
    fn should_accept_string_amounts() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"transfers":"1500","bills":"0","ussd":"0"}"#).unwrap();
        let counter = Counter::from_blob(&value).unwrap();
        assert_eq!(counter.transfers, Decimal::from(1_500));
    }

    #[test]
    fn should_reject_missing_channel() {
        let value: serde_json::Value = serde_json::from_str(r#"{"transfers":0}"#).unwrap();
        assert!(matches!(
            Counter::from_blob(&value),
            Err(BlobError::MissingField(_))
        ));
    }

    #[test]
    fn should_reject_non_numeric_amount() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"transfers":true,"bills":0,"ussd":0}"#).unwrap();
        assert!(matches!(
            Counter::from_blob(&value),
            Err(BlobError::BadAmount(_))
        ));
    }

    #[test]
    fn should_parse_channel_names() {
        assert_eq!(Channel::from_name("transfers"), Some(Channel::Transfers));
        assert_eq!(Channel::from_name("bills"), Some(Channel::Bills));
        assert_eq!(Channel::from_name("ussd"), Some(Channel::Ussd));
        assert_eq!(Channel::from_name("ibank"), None);
    }

    #[test]
    fn should_expose_limits_by_channel() {
        let limits = Limits::default();
        assert_eq!(limits.channel(Channel::Transfers).single, Decimal::from(200_000));
        assert_eq!(limits.channel(Channel::Ussd).daily, Decimal::from(20_000));
    }
}
