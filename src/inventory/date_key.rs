//! Acquisition date extraction from marker keys.
//!
//! Marker keys follow the tile layout
//! `tiles/{utm_zone}/{latitude_band}/{grid_square}/{year}/{month}/{day}/...`
//! with month and day written without zero padding, e.g.
//! `tiles/33/T/WN/2023/3/5/0/productInfo.json`.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SplitError};

static TILE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^tiles/\d{1,2}/[A-Z]/[A-Z]{2}/(\d{4})/(\d{1,2})/(\d{1,2})/")
        .expect("tile date pattern is valid")
});

/// Calendar date a marker row is attributed to.
///
/// Renders as `YYYY-MM-DD` and orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Extract the acquisition date from a marker key.
    ///
    /// Fails with `PatternMismatch` when the key is outside the tile layout
    /// or names a day that does not exist.
    pub fn from_key(key: &str) -> Result<Self> {
        let caps = TILE_DATE
            .captures(key)
            .ok_or_else(|| SplitError::pattern_mismatch(key))?;

        let year: i32 = caps[1]
            .parse()
            .map_err(|_| SplitError::pattern_mismatch(key))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| SplitError::pattern_mismatch(key))?;
        let day: u32 = caps[3]
            .parse()
            .map_err(|_| SplitError::pattern_mismatch(key))?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| SplitError::pattern_mismatch(key))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `(YYYY, MM, DD)` path segments, month and day zero-padded
    pub fn path_segments(&self) -> (String, String, String) {
        (
            format!("{:04}", self.0.year()),
            format!("{:02}", self.0.month()),
            format!("{:02}", self.0.day()),
        )
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, m, d) = self.path_segments();
        write!(f, "{}-{}-{}", y, m, d)
    }
}
