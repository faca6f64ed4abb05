// src/dtos/mod.rs
pub mod commission;
pub mod history;
pub mod marketplace;
pub mod pricing;
pub mod shipping;
pub mod user;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Deserializes a monetary/percentage field from either a JSON number or a
/// string. String inputs may use a comma as the decimal separator (regional
/// convention), which is normalized to a dot before parsing. Never goes
/// through floating point.
pub fn de_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    let normalized = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(t) => t.trim().replace(',', "."),
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| serde::de::Error::custom(format!("invalid decimal value: {normalized:?}")))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "super::de_decimal")]
        amount: rust_decimal::Decimal,
    }

    #[test]
    fn accepts_json_numbers() {
        let p: Payload = serde_json::from_str(r#"{"amount": 10.5}"#).unwrap();
        assert_eq!(p.amount, dec!(10.5));
    }

    #[test]
    fn accepts_dot_strings() {
        let p: Payload = serde_json::from_str(r#"{"amount": "8.49"}"#).unwrap();
        assert_eq!(p.amount, dec!(8.49));
    }

    #[test]
    fn normalizes_comma_separator() {
        let p: Payload = serde_json::from_str(r#"{"amount": "10,50"}"#).unwrap();
        assert_eq!(p.amount, dec!(10.50));
    }

    #[test]
    fn trims_whitespace() {
        let p: Payload = serde_json::from_str(r#"{"amount": " 99,90 "}"#).unwrap();
        assert_eq!(p.amount, dec!(99.90));
    }

    #[test]
    fn rejects_non_numeric_strings() {
        let err = serde_json::from_str::<Payload>(r#"{"amount": "abc"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid decimal value"));
    }
}
