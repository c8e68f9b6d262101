// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use crate::{Error, Result};
use chrono::Utc;

/// The date time used by driftsign, UTC only.
pub type DateTime = chrono::DateTime<Utc>;

/// Returns the current UTC wall-clock time.
///
/// Signing code should not call this directly; the signing timestamp comes
/// from [`crate::SystemClock::now`] so the persisted offset is applied.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a date time into the compact date form: `20220313`.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a date time into the compact ISO 8601 form: `20220313T072004Z`.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format a date time into an RFC 2822 HTTP date: `Sun, 13 Mar 2022 07:20:04 +0000`.
pub fn format_http_date(t: DateTime) -> String {
    t.to_rfc2822()
}

/// Parse an HTTP `Date` header (RFC 2822) into a date time.
pub fn parse_http_date(s: &str) -> Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s)
        .map_err(|e| Error::unexpected(format!("invalid http date {s:?}")).with_source(e))?;
    Ok(t.with_timezone(&Utc))
}

/// Parse a compact ISO 8601 timestamp (`20220313T072004Z`) into a date time.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    let t = chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ")
        .map_err(|e| Error::unexpected(format!("invalid iso8601 date {s:?}")).with_source(e))?;
    Ok(t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixture() -> DateTime {
        Utc.with_ymd_and_hms(2022, 3, 13, 7, 20, 4).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(fixture()), "20220313");
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(format_iso8601(fixture()), "20220313T072004Z");
    }

    #[test]
    fn test_parse_iso8601_round_trip() {
        assert_eq!(parse_iso8601("20220313T072004Z").unwrap(), fixture());
    }

    #[test]
    fn test_parse_http_date() {
        let t = parse_http_date("Sun, 13 Mar 2022 07:20:04 GMT").unwrap();
        assert_eq!(t, fixture());
    }

    #[test]
    fn test_parse_http_date_rejects_garbage() {
        assert!(parse_http_date("not a date").is_err());
    }

    #[test]
    fn test_http_date_round_trip() {
        let t = fixture();
        assert_eq!(parse_http_date(&format_http_date(t)).unwrap(), t);
    }
}
