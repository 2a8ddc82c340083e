use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// An enum value as the backend sends it: write DTOs carry numeric codes,
/// read DTOs carry the variant name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CodeOrName {
    Code(i64),
    Name(String),
}

/// Parse a backend date. Accepts RFC 3339 timestamps, naive ISO timestamps
/// (with or without fractional seconds) and plain `YYYY-MM-DD` dates.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Format a date the way the backend expects it in request bodies and queries.
pub fn to_iso(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

/// `#[serde(with = "wire::date")]` for `NaiveDate` fields.
pub mod date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::to_iso(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{raw}'")))
    }
}

/// Finite and non-negative: the only shape a money amount may take.
pub(crate) fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
