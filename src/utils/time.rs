use serde::{Deserialize, Deserializer, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Deserialize an RFC 3339 formatted string into an OffsetDateTime
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom)
}

/// Serialize an OffsetDateTime into an RFC 3339 formatted string
pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = datetime
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&s)
}

/// Format an OffsetDateTime as an RFC 3339 string, or None if formatting fails.
pub fn to_rfc3339(datetime: OffsetDateTime) -> Option<String> {
    datetime.format(&Rfc3339).ok()
}

/// Convert an epoch seconds/nanoseconds pair into an OffsetDateTime.
///
/// Document stores commonly serialize timestamps this way. Returns None when
/// the seconds value falls outside the representable range.
pub fn from_epoch_pair(seconds: i64, nanoseconds: i64) -> Option<OffsetDateTime> {
    let nanos = i128::from(seconds) * 1_000_000_000 + i128::from(nanoseconds);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_pair_round_trips_through_rfc3339() {
        let dt = from_epoch_pair(1_700_000_000, 0).unwrap();
        assert_eq!(to_rfc3339(dt).unwrap(), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn epoch_pair_out_of_range() {
        assert!(from_epoch_pair(i64::MAX, 0).is_none());
    }
}
