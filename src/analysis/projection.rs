// Naive linear disk-exhaustion projection: the current usage ratio is assumed
// to have accumulated over a flat 30-day window, and to keep growing at that
// rate.

use chrono::{DateTime, Duration, Utc};

use crate::models::ServerResource;

const ACCUMULATION_WINDOW_DAYS: f64 = 30.0;

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskProjection {
    /// Zero usage projects a zero fill rate; the disk never fills.
    NeverFull,
    FullBy(DateTime<Utc>),
}

impl DiskProjection {
    pub fn full_date(self) -> Option<DateTime<Utc>> {
        match self {
            DiskProjection::NeverFull => None,
            DiskProjection::FullBy(date) => Some(date),
        }
    }
}

/// `rate = (used/total) / 30` per day; days until full = `(1 - used/total) / rate`.
/// Samples with no usage (or no capacity) yield `NeverFull` rather than the
/// non-finite date the division would produce, and so does any projection that
/// lands past the representable date range (a near-zero ratio projects
/// millions of years out).
pub fn project_disk_full(sample: &ServerResource, now: DateTime<Utc>) -> DiskProjection {
    if sample.total_disk <= 0.0 || sample.used_disk <= 0.0 {
        return DiskProjection::NeverFull;
    }
    let ratio = sample.used_disk / sample.total_disk;
    let usage_rate = ratio / ACCUMULATION_WINDOW_DAYS;
    let days_until_full = (1.0 - ratio) / usage_rate;
    let millis = days_until_full * MS_PER_DAY;
    if !millis.is_finite() || millis >= i64::MAX as f64 {
        return DiskProjection::NeverFull;
    }
    match now.checked_add_signed(Duration::milliseconds(millis as i64)) {
        Some(date) => DiskProjection::FullBy(date),
        None => DiskProjection::NeverFull,
    }
}

/// Orders rows by projected full date, recomputing the projection for both
/// compared rows (no caching). `NeverFull` sorts last; ties keep their input
/// order (stable sort).
pub fn sort_by_projected_full_date(rows: &mut [&ServerResource], now: DateTime<Utc>) {
    rows.sort_by(|a, b| {
        let da = project_disk_full(a, now).full_date();
        let db = project_disk_full(b, now).full_date();
        match (da, db) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}
