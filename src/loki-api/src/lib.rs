use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

pub mod response;

pub use response::{MatrixSeries, QueryRangeData, QueryRangeResponse, ResultType, Stream};

/// GET /loki/api/v1/query_range
///
/// See <https://grafana.com/docs/loki/latest/reference/loki-http-api/#query-logs-within-a-range-of-time>
pub const QUERY_RANGE_PATH: &str = "/loki/api/v1/query_range";

/// Sort order of returned log entries
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Oldest entries first
    Forward,
    /// Newest entries first
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected `direction` input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction {0:?}: expected \"forward\" or \"backward\"")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = ParseDirectionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Direction {
    type Error = ParseDirectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parameters of a single range query.
///
/// Only `query` is required. Every other field is left out of the request
/// when unset, so the server-side defaults apply (limit 100, start one hour
/// ago, end now, direction backward).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryRangeRequest {
    /// LogQL expression, sent as-is
    pub query: String,
    pub limit: Option<NonZeroU32>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub direction: Option<Direction>,
}

impl QueryRangeRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
            start: None,
            end: None,
            direction: None,
        }
    }

    /// Maximum number of entries to return. A limit of `0` leaves the
    /// parameter out.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = NonZeroU32::new(limit);
        self
    }

    pub fn start<Tz: TimeZone>(mut self, start: DateTime<Tz>) -> Self {
        self.start = Some(start.with_timezone(&Utc));
        self
    }

    pub fn end<Tz: TimeZone>(mut self, end: DateTime<Tz>) -> Self {
        self.end = Some(end.with_timezone(&Utc));
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Set the direction from its wire name, rejecting anything other than
    /// `forward` or `backward`.
    pub fn try_direction(mut self, direction: &str) -> Result<Self, ParseDirectionError> {
        self.direction = Some(direction.parse()?);
        Ok(self)
    }

    /// Query-string pairs for the request, in a stable order, with unset
    /// parameters omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query", self.query.clone())];
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(start) = &self.start {
            pairs.push(("start", format_timestamp(start)));
        }
        if let Some(end) = &self.end {
            pairs.push(("end", format_timestamp(end)));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction", direction.as_str().to_string()));
        }
        pairs
    }
}

/// RFC 3339 in UTC with a `Z` suffix, e.g. `2023-12-31T22:00:00Z`.
///
/// Whole seconds carry no fraction. Any sub-second part is written with six
/// digits, or nine when it is finer than a microsecond.
pub fn format_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>) -> String {
    let utc = ts.with_timezone(&Utc);
    let format = match utc.nanosecond() {
        0 => SecondsFormat::Secs,
        nanos if nanos % 1_000 == 0 => SecondsFormat::Micros,
        _ => SecondsFormat::Nanos,
    };
    utc.to_rfc3339_opts(format, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn param<'a>(pairs: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("forward".parse::<Direction>(), Ok(Direction::Forward));
        assert_eq!("backward".parse::<Direction>(), Ok(Direction::Backward));
        assert_eq!(
            Direction::try_from("sideways"),
            Err(ParseDirectionError("sideways".to_string()))
        );
        // Wire names are exact
        assert!("FORWARD".parse::<Direction>().is_err());
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&Direction::Backward).unwrap(),
            "\"backward\""
        );
        let parsed: Direction = serde_json::from_str("\"forward\"").unwrap();
        assert_eq!(parsed, Direction::Forward);
    }

    #[test]
    fn test_only_query_by_default() {
        let request = QueryRangeRequest::new(r#"{app="shop"} |= "error""#);

        assert_eq!(
            request.query_pairs(),
            vec![("query", r#"{app="shop"} |= "error""#.to_string())]
        );
    }

    #[test]
    fn test_limit() {
        let pairs = QueryRangeRequest::new("{}").limit(50).query_pairs();
        assert_eq!(param(&pairs, "limit"), Some("50"));

        let pairs = QueryRangeRequest::new("{}").limit(0).query_pairs();
        assert_eq!(param(&pairs, "limit"), None);
    }

    #[test]
    fn test_timestamps_are_converted_to_utc() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let start = plus_two.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 6, 30, 0).unwrap();

        let pairs = QueryRangeRequest::new("{}").start(start).end(end).query_pairs();

        assert_eq!(param(&pairs, "start"), Some("2023-12-31T22:00:00Z"));
        assert_eq!(param(&pairs, "end"), Some("2024-01-01T06:30:00Z"));
    }

    #[test]
    fn test_timestamp_keeps_sub_second_precision() {
        let ts = Utc
            .with_ymd_and_hms(2024, 5, 17, 8, 15, 42)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();

        assert_eq!(format_timestamp(&ts), "2024-05-17T08:15:42.123456Z");
    }

    #[test]
    fn test_timestamp_fraction_digits() {
        let base = Utc.with_ymd_and_hms(2024, 5, 17, 8, 15, 42).unwrap();

        let millis = base + chrono::Duration::milliseconds(123);
        assert_eq!(format_timestamp(&millis), "2024-05-17T08:15:42.123000Z");

        let nanos = base + chrono::Duration::nanoseconds(5);
        assert_eq!(format_timestamp(&nanos), "2024-05-17T08:15:42.000000005Z");
    }

    #[test]
    fn test_try_direction() {
        let request = QueryRangeRequest::new("{}").try_direction("forward").unwrap();
        assert_eq!(param(&request.query_pairs(), "direction"), Some("forward"));

        let err = QueryRangeRequest::new("{}").try_direction("up").unwrap_err();
        assert_eq!(err, ParseDirectionError("up".to_string()));
    }

    #[test]
    fn test_pair_order() {
        let request = QueryRangeRequest::new("{}")
            .direction(Direction::Backward)
            .end(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
            .start(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .limit(10);

        let keys: Vec<_> = request.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["query", "limit", "start", "end", "direction"]);
    }
}
