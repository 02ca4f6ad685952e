//! Turns daily attendance records into a per-status aggregate.

use log::{debug, info, warn};

use crate::error::EmptyInputError;
use crate::model::{AttendanceRecord, AttendanceReport, StatusCountMap};
use crate::status::StatusLabelMap;

/// Groups attendance records by status code and writes the summary text.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttendanceAggregator {
    labels: StatusLabelMap,
}

impl AttendanceAggregator {
    /// Creates an aggregator resolving labels through `labels`.
    pub fn new(labels: StatusLabelMap) -> Self {
        Self { labels }
    }

    /// Aggregates records that are already scoped to `year`/`month`.
    ///
    /// Fails with [`EmptyInputError`] when `records` is empty.  Codes without a label are counted
    /// under their raw value.
    pub fn aggregate(
        &self,
        year: i32,
        month: u32,
        records: &[AttendanceRecord],
    ) -> Result<AttendanceReport, EmptyInputError> {
        if records.is_empty() {
            warn!("No attendance records for {}-{:02}", year, month);
            return Err(EmptyInputError { year, month });
        }

        let mut counts = StatusCountMap::new();
        for record in records {
            if !self.labels.is_known(record.status_code) {
                warn!(
                    "Unknown attendance status code {} on {}-{:02}-{:02}",
                    record.status_code, record.year, record.month, record.day_of_month
                );
            }
            counts.increment(record.status_code);
        }

        debug!("Status counts for {}-{:02}: {:?}", year, month, counts);
        AttendanceReport::from_counts(year, month, counts, &self.labels)
    }

    /// Keeps only the records of `year`/`month` and aggregates them.
    ///
    /// Upstream services hand out a rolling window of records; an empty result after filtering is
    /// reported as [`EmptyInputError`].
    pub fn aggregate_period(
        &self,
        year: i32,
        month: u32,
        records: &[AttendanceRecord],
    ) -> Result<AttendanceReport, EmptyInputError> {
        let filtered: Vec<AttendanceRecord> = records
            .iter()
            .filter(|record| record.is_in_period(year, month))
            .cloned()
            .collect();
        info!(
            "{} of {} attendance records fall into {}-{:02}",
            filtered.len(),
            records.len(),
            year,
            month
        );
        self.aggregate(year, month, &filtered)
    }

    /// The label map used for summaries.
    pub fn labels(&self) -> &StatusLabelMap {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(codes: &[i64]) -> Vec<AttendanceRecord> {
        codes
            .iter()
            .enumerate()
            .map(|(day, code)| AttendanceRecord::new(2025, 6, day as u32 + 1, *code))
            .collect()
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = AttendanceAggregator::default()
            .aggregate(2025, 6, &[])
            .unwrap_err();
        assert_eq!(err, EmptyInputError { year: 2025, month: 6 });
    }

    #[test]
    fn counts_days_per_status() {
        let report = AttendanceAggregator::default()
            .aggregate(2025, 6, &records(&[1, 1, 2, 1, 3, 1, 2, 1]))
            .unwrap();

        let counts: Vec<_> = report.status_count_map().iter().collect();
        assert_eq!(counts, vec![(1, 5), (2, 2), (3, 1)]);
        assert_eq!(
            report.summary_lines(),
            vec![
                "2025년 6월 근태 통계 요약",
                "",
                "- [출근]: 5일",
                "- [지각]: 2일",
                "- [결근]: 1일",
            ]
        );
    }

    #[test]
    fn unknown_codes_keep_their_raw_key() {
        let report = AttendanceAggregator::default()
            .aggregate(2025, 6, &records(&[9, 1, 9]))
            .unwrap();

        assert_eq!(report.status_count_map().get(9), Some(2));
        assert!(report.summary_text().contains("- [기타]: 2일"));
    }

    #[test]
    fn period_filter_drops_other_months() {
        let mut input = records(&[1, 2]);
        input.push(AttendanceRecord::new(2025, 5, 30, 3));
        input.push(AttendanceRecord::new(2024, 6, 3, 3));

        let report = AttendanceAggregator::default()
            .aggregate_period(2025, 6, &input)
            .unwrap();
        assert_eq!(report.status_count_map().codes(), vec![1, 2]);

        let err = AttendanceAggregator::default()
            .aggregate_period(2023, 1, &input)
            .unwrap_err();
        assert_eq!(err, EmptyInputError { year: 2023, month: 1 });
    }
}
