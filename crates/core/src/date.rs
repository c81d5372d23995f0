//! Day-precision date keys for the last-modified index
//!
//! Modification timestamps arrive as strings in several shapes (RFC 3339 with
//! an offset, naive `T`-separated datetimes, bare dates). The index only cares
//! about the calendar day, so every accepted stamp collapses to a `DateKey`.
//!
//! ## Precision
//!
//! A key is the packed decimal `YYYYMMDD` form of the date. Packing keeps keys
//! `Copy`, makes ordering a plain integer comparison, and renders back to the
//! canonical eight-digit form without allocation.
//!
//! ## Offsets
//!
//! Stamps that carry a UTC offset keep the date *as written*. A stamp of
//! `2010-01-01T23:30:00-05:00` buckets under `20100101`, not under the UTC
//! day it happens to fall on.
//!
//! ## Usage
//!
//! ```
//! use gazetteer_core::DateKey;
//!
//! let key = DateKey::parse_stamp("2011-03-09T20:59:59Z").unwrap();
//! assert_eq!(key.to_string(), "20110309");
//! assert!(key > DateKey::EPOCH);
//! ```

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Day-precision date key in packed `YYYYMMDD` form
///
/// ## Invariants
///
/// - Keys are always packed from a calendar-valid date
/// - Keys are comparable and orderable; later days compare greater
/// - `DateKey::EPOCH` (1970-01-01) is the watermark of an index with no
///   entries; stamps before 1970 pack to smaller keys and sort below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(u32);

impl DateKey {
    /// Unix epoch (1970-01-01), the empty-index watermark
    pub const EPOCH: DateKey = DateKey(19_700_101);

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Pack a calendar date into a key
    ///
    /// Returns `None` for years outside `0..=9999`, which do not fit the
    /// eight-digit form.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        let year = date.year();
        if !(0..=9999).contains(&year) {
            return None;
        }
        Some(DateKey(year as u32 * 10_000 + date.month() * 100 + date.day()))
    }

    /// Build a key directly from calendar components
    ///
    /// Returns `None` if the components do not name a real date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::from_date)
    }

    /// Parse a modification stamp down to its calendar day
    ///
    /// Accepts, in order of preference:
    /// - RFC 3339 with an offset (`2011-03-09T20:59:59Z`)
    /// - Naive `T`-separated datetimes, with or without fractional seconds
    /// - Naive space-separated datetimes
    /// - Bare `YYYY-MM-DD` dates
    ///
    /// Returns `None` when the stamp matches none of these shapes.
    pub fn parse_stamp(stamp: &str) -> Option<Self> {
        let stamp = stamp.trim();
        let date = DateTime::parse_from_rfc3339(stamp)
            .map(|dt| dt.date_naive())
            .or_else(|_| {
                NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date())
            })
            .or_else(|_| {
                NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date())
            })
            .or_else(|_| NaiveDate::parse_from_str(stamp, "%Y-%m-%d"))
            .ok()?;
        Self::from_date(date)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the packed `YYYYMMDD` value
    #[inline]
    pub const fn as_number(&self) -> u32 {
        self.0
    }

    /// Check if this key is the epoch sentinel
    #[inline]
    pub fn is_epoch(&self) -> bool {
        *self == DateKey::EPOCH
    }
}

impl Default for DateKey {
    fn default() -> Self {
        DateKey::EPOCH
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
