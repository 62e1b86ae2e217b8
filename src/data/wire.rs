//! Serde adapters for the backend's loose date handling.
//!
//! Dates go out as `YYYY-MM-DD`. They come back either like that or as a
//! full timestamp (`2023-01-10T03:00:00.000Z`), in which case only the date
//! part counts.

use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serializer, de::Error};

pub fn parse_date(raw: &str) -> Result<Date, jiff::Error> {
    let raw = raw.trim();
    let date_part = raw.split_once('T').map_or(raw, |(date, _time)| date);
    date_part.parse()
}

pub fn display_date(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

pub fn input_date(date: Date) -> String {
    date.strftime("%Y-%m-%d").to_string()
}

pub mod date {
    use super::*;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&input_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(D::Error::custom)
    }
}

pub mod optional_date {
    use super::*;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&input_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse_date(&raw).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn timestamps_keep_only_the_date() {
        assert_eq!(parse_date("2023-01-10T03:00:00.000Z").unwrap(), date(2023, 1, 10));
        assert_eq!(parse_date("1995-03-15").unwrap(), date(1995, 3, 15));
        assert!(parse_date("15/03/1995").is_err());
    }

    #[test]
    fn dates_render_brazilian_style() {
        assert_eq!(display_date(date(2024, 2, 5)), "05/02/2024");
        assert_eq!(input_date(date(2024, 2, 5)), "2024-02-05");
    }
}
