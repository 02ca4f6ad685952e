//! Attendance status codes and their display labels and colours.
//!
//! Codes are small integers handed over by the work-entry service.  The lookup is total: any code
//! without an entry resolves to the fallback bucket, so chart rendering never has to deal with an
//! unknown code.

use image::Rgb;

/// Raw attendance status code as delivered by upstream services.
pub type StatusCode = i64;

/// Codes laid out by the doughnut chart, in this order.
pub const CANONICAL_ORDER: [StatusCode; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

/// Label and colour for a single status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusStyle {
    /// Human readable label.
    pub label: &'static str,
    /// Fill colour used by both charts.
    pub color: Rgb<u8>,
}

impl StatusStyle {
    /// Creates a new style entry.
    pub const fn new(label: &'static str, color: [u8; 3]) -> Self {
        Self {
            label,
            color: Rgb(color),
        }
    }
}

const STANDARD_ENTRIES: &[(StatusCode, StatusStyle)] = &[
    (1, StatusStyle::new("출근", [54, 162, 235])),
    (2, StatusStyle::new("지각", [255, 159, 64])),
    (3, StatusStyle::new("결근", [255, 99, 132])),
    (4, StatusStyle::new("외근", [75, 192, 192])),
    (5, StatusStyle::new("연차", [153, 102, 255])),
    (6, StatusStyle::new("질병", [201, 203, 207])),
    (7, StatusStyle::new("반차", [255, 205, 86])),
    (8, StatusStyle::new("상(喪)", [99, 110, 114])),
];

const STANDARD_FALLBACK: StatusStyle = StatusStyle::new("기타", [160, 160, 160]);

/// Immutable status code lookup.
///
/// The map is cheap to copy and carries no interior state, so a single instance can be shared by
/// every report rendered in the process.  Alternate label sets can be injected through
/// [`StatusLabelMap::new`].
#[derive(Clone, Copy, Debug)]
pub struct StatusLabelMap {
    entries: &'static [(StatusCode, StatusStyle)],
    fallback: StatusStyle,
}

impl StatusLabelMap {
    /// Creates a lookup over `entries`, resolving every other code to `fallback`.
    pub const fn new(entries: &'static [(StatusCode, StatusStyle)], fallback: StatusStyle) -> Self {
        Self { entries, fallback }
    }

    /// The Korean label set used by the HR service.
    pub const fn standard() -> Self {
        Self::new(STANDARD_ENTRIES, STANDARD_FALLBACK)
    }

    /// Returns the style for `code`, or the fallback style.
    pub fn style_for(&self, code: StatusCode) -> StatusStyle {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(_, style)| *style)
            .unwrap_or(self.fallback)
    }

    /// Returns the label for `code`.
    pub fn label_for(&self, code: StatusCode) -> &'static str {
        self.style_for(code).label
    }

    /// Returns the chart colour for `code`.
    pub fn color_for(&self, code: StatusCode) -> Rgb<u8> {
        self.style_for(code).color
    }

    /// Returns whether `code` has a dedicated entry.
    pub fn is_known(&self, code: StatusCode) -> bool {
        self.entries.iter().any(|(candidate, _)| *candidate == code)
    }

    /// The style used for codes without an entry.
    pub fn fallback(&self) -> StatusStyle {
        self.fallback
    }
}

impl Default for StatusLabelMap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_labels_cover_all_canonical_codes() {
        let labels = StatusLabelMap::standard();
        let names: Vec<_> = CANONICAL_ORDER
            .iter()
            .map(|code| labels.label_for(*code))
            .collect();
        assert_eq!(
            names,
            ["출근", "지각", "결근", "외근", "연차", "질병", "반차", "상(喪)"]
        );
        assert!(CANONICAL_ORDER.iter().all(|code| labels.is_known(*code)));
    }

    #[test]
    fn unknown_codes_fall_back() {
        let labels = StatusLabelMap::standard();
        for code in [0, -3, 9, 42, i64::MAX] {
            assert_eq!(labels.label_for(code), "기타");
            assert_eq!(labels.color_for(code), labels.fallback().color);
            assert!(!labels.is_known(code));
        }
    }

    #[test]
    fn alternate_label_sets_can_be_injected() {
        const ENTRIES: &[(StatusCode, StatusStyle)] =
            &[(1, StatusStyle::new("present", [0, 128, 0]))];
        let labels = StatusLabelMap::new(ENTRIES, StatusStyle::new("other", [1, 2, 3]));

        assert_eq!(labels.label_for(1), "present");
        assert_eq!(labels.label_for(2), "other");
        assert_eq!(labels.color_for(2), Rgb([1, 2, 3]));
    }
}
