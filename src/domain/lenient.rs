//! Field deserializers for service exports that send `null`, quoted numbers
//! or placeholder text where a number belongs.
//!
//! Numbers read from text the same way the CSV adapter reads cells, and
//! anything unreadable becomes zero (or `None` for optional fields).

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Loose {
    fn as_number(&self) -> Option<f64> {
        match self {
            Loose::Number(v) => Some(*v),
            Loose::Text(s) => s.trim().parse().ok(),
            Loose::Other(_) => None,
        }
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?.as_number().unwrap_or(0.0))
}

pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?.as_number())
}

/// Whole non-negative count. Fractions, negatives and junk read as zero.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Loose::deserialize(deserializer)?.as_number().unwrap_or(0.0);
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Ok(0)
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s,
        Loose::Number(v) => v.to_string(),
        Loose::Other(_) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "number")]
        price: f64,
        #[serde(default, deserialize_with = "optional_number")]
        exit: Option<f64>,
        #[serde(default, deserialize_with = "count")]
        wins: u32,
        #[serde(default, deserialize_with = "text")]
        notes: String,
    }

    fn row(json: &str) -> Row {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn plain_values_pass_through() {
        let r = row(r#"{"price": 12.5, "exit": 13, "wins": 4, "notes": "ok"}"#);
        assert_eq!(r.price, 12.5);
        assert_eq!(r.exit, Some(13.0));
        assert_eq!(r.wins, 4);
        assert_eq!(r.notes, "ok");
    }

    #[test]
    fn nulls_degrade() {
        let r = row(r#"{"price": null, "exit": null, "wins": null, "notes": null}"#);
        assert_eq!(r.price, 0.0);
        assert_eq!(r.exit, None);
        assert_eq!(r.wins, 0);
        assert_eq!(r.notes, "");
    }

    #[test]
    fn quoted_numbers_are_read() {
        let r = row(r#"{"price": " 42000.5 ", "exit": "-3", "wins": "7"}"#);
        assert_eq!(r.price, 42_000.5);
        assert_eq!(r.exit, Some(-3.0));
        assert_eq!(r.wins, 7);
    }

    #[test]
    fn junk_degrades() {
        let r = row(r#"{"price": "n/a", "exit": [1], "wins": 1.5, "notes": {"a": 1}}"#);
        assert_eq!(r.price, 0.0);
        assert_eq!(r.exit, None);
        assert_eq!(r.wins, 0);
        assert_eq!(r.notes, "");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let r = row("{}");
        assert_eq!(r.price, 0.0);
        assert_eq!(r.exit, None);
        assert_eq!(r.wins, 0);
    }
}
