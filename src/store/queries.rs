//! Read-side queries used by reporting.
//!
//! Observations are stored in UTC; every query here takes the display offset
//! explicitly and buckets rows into calendar days local to that offset.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone,
    Utc,
};
use rusqlite::params;
use serde::Serialize;

use crate::store::observation::{format_observed_at, parse_observed_at, StoreResult};
use crate::store::sqlite::ObservationStore;

/// One point in a day-detail series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayEntry {
    /// Observation time rendered in the display offset.
    pub observed_at: String,
    pub origin: String,
    pub duration_seconds: u32,
}

/// A row as read from the destination index.
struct TimedRow {
    observed_at: DateTime<Utc>,
    origin: String,
    duration_seconds: u32,
}

impl ObservationStore {
    /// Distinct destinations, sorted.
    pub fn destinations(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT destination FROM travel_times ORDER BY destination")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Local years holding at least one observation, sorted.
    ///
    /// Works on hour buckets, so offsets with a minutes component can report
    /// a neighbouring year for rows within the first hour of January 1st.
    pub fn years(&self, offset: FixedOffset) -> StoreResult<Vec<i32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT substr(observed_at, 1, 13) FROM travel_times")?;
        let buckets = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut years = BTreeSet::new();
        for bucket in buckets {
            let bucket = bucket?;
            let Ok(start) =
                NaiveDateTime::parse_from_str(&format!("{bucket}:00:00"), "%Y-%m-%dT%H:%M:%S")
            else {
                tracing::warn!(bucket = %bucket, "Skipping unparseable observed_at bucket");
                continue;
            };
            let start = Utc.from_utc_datetime(&start);
            years.insert(start.with_timezone(&offset).year());
            years.insert((start + Duration::seconds(3599)).with_timezone(&offset).year());
        }
        Ok(years.into_iter().collect())
    }

    /// Maximum duration per local day for `destination` during local `year`.
    pub fn calendar(
        &self,
        destination: &str,
        year: i32,
        offset: FixedOffset,
    ) -> StoreResult<BTreeMap<NaiveDate, u32>> {
        let (Some(start), Some(end)) = (
            local_midnight(NaiveDate::from_ymd_opt(year, 1, 1), offset),
            local_midnight(
                year.checked_add(1).and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1)),
                offset,
            ),
        ) else {
            return Ok(BTreeMap::new());
        };

        let mut days: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for row in self.rows_between(destination, Some((start, end)))? {
            let day = row.observed_at.with_timezone(&offset).date_naive();
            let max = days.entry(day).or_insert(row.duration_seconds);
            *max = (*max).max(row.duration_seconds);
        }
        Ok(days)
    }

    /// Observations for `destination` on local `date`, oldest first.
    pub fn day(
        &self,
        destination: &str,
        date: NaiveDate,
        offset: FixedOffset,
    ) -> StoreResult<Vec<DayEntry>> {
        let (Some(start), Some(end)) = (
            local_midnight(Some(date), offset),
            local_midnight(date.succ_opt(), offset),
        ) else {
            return Ok(Vec::new());
        };

        Ok(self
            .rows_between(destination, Some((start, end)))?
            .into_iter()
            .map(|row| row.into_entry(offset))
            .collect())
    }

    /// Every observation for `destination`, grouped by local day.
    pub fn day_details(
        &self,
        destination: &str,
        offset: FixedOffset,
    ) -> StoreResult<BTreeMap<NaiveDate, Vec<DayEntry>>> {
        let mut days: BTreeMap<NaiveDate, Vec<DayEntry>> = BTreeMap::new();
        for row in self.rows_between(destination, None)? {
            let day = row.observed_at.with_timezone(&offset).date_naive();
            days.entry(day).or_default().push(row.into_entry(offset));
        }
        Ok(days)
    }

    /// Rows for `destination` ordered by time, optionally limited to
    /// `[start, end)`. Uses the (destination, observed_at) index.
    fn rows_between(
        &self,
        destination: &str,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> StoreResult<Vec<TimedRow>> {
        let (start, end) = match window {
            Some((start, end)) => (format_observed_at(&start), format_observed_at(&end)),
            None => (String::new(), "\u{10FFFF}".to_string()),
        };

        let mut stmt = self.conn.prepare_cached(
            "SELECT observed_at, origin, duration_seconds
             FROM travel_times
             WHERE destination = ?1 AND observed_at >= ?2 AND observed_at < ?3
             ORDER BY observed_at, id",
        )?;
        let rows = stmt.query_map(params![destination, start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (raw, origin, duration_seconds) = row?;
            match parse_observed_at(&raw) {
                Some(observed_at) => out.push(TimedRow {
                    observed_at,
                    origin,
                    duration_seconds,
                }),
                None => tracing::warn!(observed_at = %raw, "Skipping row with unparseable timestamp"),
            }
        }
        Ok(out)
    }
}

impl TimedRow {
    fn into_entry(self, offset: FixedOffset) -> DayEntry {
        DayEntry {
            observed_at: self
                .observed_at
                .with_timezone(&offset)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            origin: self.origin,
            duration_seconds: self.duration_seconds,
        }
    }
}

/// UTC instant of local midnight starting `date` in `offset`.
fn local_midnight(date: Option<NaiveDate>, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let midnight = date?.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|at| at.with_timezone(&Utc))
}
