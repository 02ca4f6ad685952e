//! Data structures exchanged between the aggregation and rendering stages.
//!
//! Records come from the work-entry service already scoped to one employee.  The aggregate keeps
//! status codes in the order they were first seen; that order drives the summary text, the table
//! and the bar chart, while the doughnut chart reorders codes on its own.

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::EmptyInputError;
use crate::status::{StatusCode, StatusLabelMap};

/// One employee-day of attendance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Calendar year.
    pub year: i32,
    /// Month of the year (1-12).
    pub month: u32,
    /// Day of the month (1-31).
    pub day_of_month: u32,
    /// Attendance status code, see [`crate::status`].
    pub status_code: StatusCode,
    /// Check-in time, if any.
    #[serde(default)]
    pub check_in: Option<NaiveDateTime>,
    /// Check-out time, if any.
    #[serde(default)]
    pub check_out: Option<NaiveDateTime>,
}

impl AttendanceRecord {
    /// Creates a record without check-in/check-out times.
    pub fn new(year: i32, month: u32, day_of_month: u32, status_code: StatusCode) -> Self {
        Self {
            year,
            month,
            day_of_month,
            status_code,
            check_in: None,
            check_out: None,
        }
    }

    /// Sets the check-in/check-out times and returns the updated record.
    pub fn with_times(
        mut self,
        check_in: Option<NaiveDateTime>,
        check_out: Option<NaiveDateTime>,
    ) -> Self {
        self.check_in = check_in;
        self.check_out = check_out;
        self
    }

    /// Returns whether the record falls into the given period.
    pub fn is_in_period(&self, year: i32, month: u32) -> bool {
        self.year == year && self.month == month
    }
}

/// Day count per status code, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusCountMap {
    entries: Vec<(StatusCode, u64)>,
}

impl StatusCountMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one day to `code`.
    pub fn increment(&mut self, code: StatusCode) {
        self.add(code, 1);
    }

    /// Adds `days` to `code`, appending the code if it was not present yet.
    ///
    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, code: StatusCode, days: u64) {
        match self.entries.iter_mut().find(|(candidate, _)| *candidate == code) {
            Some((_, count)) => *count = count.saturating_add(days),
            None => self.entries.push((code, days)),
        }
    }

    /// Returns the count for `code`, if present.
    pub fn get(&self, code: StatusCode) -> Option<u64> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(_, count)| *count)
    }

    /// Iterates `(code, count)` pairs in natural order.
    pub fn iter(&self) -> impl Iterator<Item = (StatusCode, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Status codes in natural order.
    pub fn codes(&self) -> Vec<StatusCode> {
        self.entries.iter().map(|(code, _)| *code).collect()
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no code is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, (_, count)| sum.saturating_add(*count))
    }

    /// Largest single count, `None` for an empty map.
    pub fn max_count(&self) -> Option<u64> {
        self.entries.iter().map(|(_, count)| *count).max()
    }
}

impl FromIterator<(StatusCode, u64)> for StatusCountMap {
    fn from_iter<I: IntoIterator<Item = (StatusCode, u64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (code, days) in iter {
            map.add(code, days);
        }
        map
    }
}

impl Serialize for StatusCountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, count) in &self.entries {
            map.serialize_entry(code, count)?;
        }
        map.end()
    }
}

/// Aggregated attendance for one employee and month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    status_count_map: StatusCountMap,
    summary_text: String,
    year: i32,
    month: u32,
}

impl AttendanceReport {
    /// Builds a report from an existing aggregate.
    ///
    /// An empty map is rejected with [`EmptyInputError`]; zero counts are accepted here and
    /// surface later as a chart rendering failure.
    pub fn from_counts(
        year: i32,
        month: u32,
        counts: StatusCountMap,
        labels: &StatusLabelMap,
    ) -> Result<Self, EmptyInputError> {
        if counts.is_empty() {
            return Err(EmptyInputError { year, month });
        }

        let summary_text = summary_text(year, month, &counts, labels);
        Ok(Self {
            status_count_map: counts,
            summary_text,
            year,
            month,
        })
    }

    /// The status count map in natural order.
    pub fn status_count_map(&self) -> &StatusCountMap {
        &self.status_count_map
    }

    /// Multi-line, markdown-style summary.
    pub fn summary_text(&self) -> &str {
        &self.summary_text
    }

    /// Summary lines without the trailing blank separator.
    pub fn summary_lines(&self) -> Vec<&str> {
        self.summary_text.lines().collect()
    }

    /// Reporting year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Reporting month.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Serializes the report as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn summary_text(year: i32, month: u32, counts: &StatusCountMap, labels: &StatusLabelMap) -> String {
    let mut text = format!("{}년 {}월 근태 통계 요약\n\n", year, month);
    for (code, days) in counts.iter() {
        text.push_str(&format!("- [{}]: {}일\n", labels.label_for(code), days));
    }
    text
}
