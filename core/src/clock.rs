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

//! Clock skew tracking.
//!
//! Services reject signatures whose embedded timestamp drifts more than a
//! few minutes from their own clock. When the local clock is off, every
//! request would fail with an expired or not-yet-valid signature. This
//! module measures the drift from a trusted server timestamp (usually the
//! HTTP `Date` response header) and persists a correction offset that all
//! subsequent signing operations apply to their wall-clock reads.

use crate::time::{now, parse_http_date, DateTime};
use crate::Error;
use chrono::TimeDelta;
use http::header::DATE;
use http::HeaderMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Drift below this is accepted by services, observed at 5 minutes.
pub const SKEW_THRESHOLD_MS: i64 = 300_000;

/// Check whether the corrected local clock drifts from `server_time` by at
/// least [`SKEW_THRESHOLD_MS`], in either direction.
pub fn is_clock_skewed(server_time: DateTime, offset_ms: i64) -> bool {
    skewed_at(server_time, offset_ms, now())
}

/// Compute the offset to persist after observing `server_time`.
///
/// Pure: returns `offset_ms` unchanged while the drift stays under the
/// threshold, and `server_time - now` once it crosses it. Callers persist
/// the result, typically through [`SystemClock::observe`].
pub fn updated_offset(server_time: DateTime, offset_ms: i64) -> i64 {
    updated_offset_at(server_time, offset_ms, now())
}

fn skewed_at(server_time: DateTime, offset_ms: i64, now: DateTime) -> bool {
    let drift = now.timestamp_millis() + offset_ms - server_time.timestamp_millis();
    drift.abs() >= SKEW_THRESHOLD_MS
}

fn updated_offset_at(server_time: DateTime, offset_ms: i64, now: DateTime) -> i64 {
    if skewed_at(server_time, offset_ms, now) {
        server_time.timestamp_millis() - now.timestamp_millis()
    } else {
        offset_ms
    }
}

/// A shared clock that applies a persisted skew correction.
///
/// One instance belongs to one client configuration and is cloned into every
/// signer built from it; clones share the same offset. The offset is a plain
/// scalar updated with last-writer-wins semantics: concurrent request
/// completions may race on it, which is tolerable because skew correction is
/// an approximate, eventually-consistent adjustment.
#[derive(Clone, Debug, Default)]
pub struct SystemClock {
    offset_ms: Arc<AtomicI64>,
}

impl SystemClock {
    /// Create a clock with a zero offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock with a caller-supplied initial offset in milliseconds.
    pub fn with_offset(offset_ms: i64) -> Self {
        let clock = Self::new();
        clock.set_offset(offset_ms);
        clock
    }

    /// The current correction offset in milliseconds.
    pub fn offset(&self) -> i64 {
        self.offset_ms.load(Ordering::Relaxed)
    }

    /// Overwrite the correction offset.
    pub fn set_offset(&self, offset_ms: i64) {
        self.offset_ms.store(offset_ms, Ordering::Relaxed);
    }

    /// The corrected time: wall clock plus the persisted offset.
    ///
    /// Every signing timestamp must come from here so that signatures stay
    /// inside the service's skew window.
    pub fn now(&self) -> DateTime {
        now() + TimeDelta::milliseconds(self.offset())
    }

    /// Observe a trusted server timestamp and persist the corrected offset.
    ///
    /// Returns `true` when the offset actually changed. Re-observing the
    /// same timestamp converges: once corrected, the drift falls back under
    /// the threshold and later calls leave the offset alone.
    pub fn observe(&self, server_time: DateTime) -> bool {
        let current = self.offset();
        let next = updated_offset(server_time, current);
        if next == current {
            return false;
        }

        self.set_offset(next);
        true
    }

    /// Success-path hook: observe the `Date` header of a server response.
    ///
    /// A missing or unparseable header is ignored; failing a healthy request
    /// over a malformed date would be worse than keeping a stale offset.
    pub fn observe_headers(&self, headers: &HeaderMap) -> bool {
        let Some(value) = headers.get(DATE) else {
            return false;
        };

        let date = value
            .to_str()
            .map_err(Error::from)
            .and_then(parse_http_date);
        match date {
            Ok(server_time) => self.observe(server_time),
            Err(err) => {
                log::warn!("ignoring unparseable date header: {err:?}");
                false
            }
        }
    }

    /// Failure-path hook: observe a server timestamp carried by a failed
    /// response, then hand the error back for propagation.
    ///
    /// The error is returned otherwise unchanged; when the observation moved
    /// the offset it is annotated via [`Error::with_clock_skew_corrected`].
    /// The corrected offset only benefits future signing attempts; whether
    /// to retry the failed request is the caller's policy.
    pub fn correct_error(&self, err: Error, server_time: Option<DateTime>) -> Error {
        match server_time {
            Some(t) if self.observe(t) => err.with_clock_skew_corrected(),
            _ => err,
        }
    }
}
