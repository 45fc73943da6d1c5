//! Payout timestamp parsing and display.
//!
//! Two feed formats exist and are deliberately kept apart:
//!
//! * Polygonscan exports carry `"DateTime (UTC)"` in an ISO-like UTC form,
//!   parsed by [`parse_utc_timestamp`].
//! * Send reports carry `sentDate` as `DD/MM/YYYY, HH:mm:ss` wall-clock time
//!   at the display offset, parsed by [`parse_report_timestamp`].
//!
//! Both produce a `DateTime<Utc>`. Display always goes through
//! [`format_display`], which renders `DD/MM/YYYY HH:mm:ss` at a fixed offset
//! so output never depends on the host locale or timezone.

use {
    chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc},
    serde::Serialize,
    std::fmt,
};

/// Display format for payout dates.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Send-report `sentDate` format.
pub const REPORT_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Rendered when no payout date is known.
pub const NOT_AVAILABLE: &str = "N/A";

const SECONDS_PER_HOUR: i32 = 3_600;

const UTC_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// `hours` east of UTC, or `None` outside -23..=23.
pub fn display_offset(hours: i32) -> Option<FixedOffset> {
    hours
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(FixedOffset::east_opt)
}

pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Parse a Polygonscan `"DateTime (UTC)"` value.
///
/// Accepted: RFC 3339 with any offset, or `YYYY-MM-DD HH:MM:SS` (space or
/// `T` separator, optional fractional seconds) optionally followed by `Z`
/// or ` UTC`. Naive forms are taken as UTC.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = trimmed
        .strip_suffix("UTC")
        .or_else(|| trimmed.strip_suffix('Z'))
        .unwrap_or(trimmed)
        .trim_end();

    UTC_NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a send-report `sentDate` (`DD/MM/YYYY, HH:mm:ss`) recorded as wall
/// clock time at `offset`.
pub fn parse_report_timestamp(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), REPORT_FORMAT).ok()?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

/// Render `instant` as `DD/MM/YYYY HH:mm:ss` at `offset`.
pub fn format_display(instant: &DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
}

/// Most recent payout seen for a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "at", rename_all = "kebab-case")]
pub enum LastPayout {
    At(DateTime<Utc>),
    /// No matched payout carried a usable timestamp (or nothing matched).
    #[default]
    NotAvailable,
}

impl LastPayout {
    /// Keep whichever of `self` and `candidate` is later.
    pub fn observe(self, candidate: Option<DateTime<Utc>>) -> Self {
        match (self, candidate) {
            (LastPayout::At(current), Some(seen)) if seen > current => LastPayout::At(seen),
            (LastPayout::NotAvailable, Some(seen)) => LastPayout::At(seen),
            (unchanged, _) => unchanged,
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            LastPayout::At(instant) => Some(*instant),
            LastPayout::NotAvailable => None,
        }
    }

    /// `DD/MM/YYYY HH:mm:ss` at `offset`, or `"N/A"`.
    pub fn display(&self, offset: FixedOffset) -> String {
        match self {
            LastPayout::At(instant) => format_display(instant, offset),
            LastPayout::NotAvailable => NOT_AVAILABLE.to_string(),
        }
    }
}

impl fmt::Display for LastPayout {
    /// UTC rendering; use [`LastPayout::display`] for the member-facing offset.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(utc_offset()))
    }
}
