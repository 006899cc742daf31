//! Share record.

use std::cmp::Ordering;
use std::fmt;

/// Column names of the CSV output, in field order.
pub const CSV_HEADER: [&str; 6] = [
    "name",
    "latestPrice",
    "change",
    "change3Months",
    "change6Months",
    "change1Year",
];

/// One row of the components table: a traded entity and its price movements.
///
/// Values are immutable once built. The row extractor only constructs a
/// `Share` after every numeric cell has parsed to a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    name: String,
    latest_price: f64,
    change: f64,
    change_3_months: f64,
    change_6_months: f64,
    change_1_year: f64,
}

impl Share {
    pub fn new(
        name: impl Into<String>,
        latest_price: f64,
        change: f64,
        change_3_months: f64,
        change_6_months: f64,
        change_1_year: f64,
    ) -> Self {
        Self {
            name: name.into(),
            latest_price,
            change,
            change_3_months,
            change_6_months,
            change_1_year,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Most recent trade price.
    pub fn latest_price(&self) -> f64 {
        self.latest_price
    }

    /// Daily change in percent.
    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn change_3_months(&self) -> f64 {
        self.change_3_months
    }

    pub fn change_6_months(&self) -> f64 {
        self.change_6_months
    }

    pub fn change_1_year(&self) -> f64 {
        self.change_1_year
    }

    /// Orders shares by ascending daily change.
    ///
    /// The difference is truncated toward zero before comparing, so shares
    /// whose daily changes differ by less than 1.0 compare as equal. This is
    /// not a total order; use it with a stable sort only.
    pub fn compare_change(&self, other: &Share) -> Ordering {
        let diff = (self.change - other.change) as i64;
        diff.cmp(&0)
    }

    /// Fields rendered for one CSV row, in [`CSV_HEADER`] order.
    pub fn csv_fields(&self) -> [String; 6] {
        [
            self.name.clone(),
            format_number(self.latest_price),
            format_number(self.change),
            format_number(self.change_3_months),
            format_number(self.change_6_months),
            format_number(self.change_1_year),
        ]
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[name: {} | latestPrice: {} | change: {} | change 3 Mo: {} | change 6 Mo: {} | change 1 Y: {}]",
            self.name,
            format_number(self.latest_price),
            format_number(self.change),
            format_number(self.change_3_months),
            format_number(self.change_6_months),
            format_number(self.change_1_year),
        )
    }
}

/// Shortest round-trip rendering, keeping one decimal place on integral values.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Share {
        Share::new("Acme", 101.5, -0.5, 1.2, 3.4, 10.0)
    }

    fn with_change(change: f64) -> Share {
        Share::new("X", 1.0, change, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_csv_fields() {
        assert_eq!(acme().csv_fields().join(","), "Acme,101.5,-0.5,1.2,3.4,10.0");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234.5), "1234.5");
        assert_eq!(format_number(10.0), "10.0");
        assert_eq!(format_number(-3.0), "-3.0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(1e15), "1000000000000000.0");
        assert_eq!(format_number(2e20), "200000000000000000000.0");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            acme().to_string(),
            "[name: Acme | latestPrice: 101.5 | change: -0.5 | change 3 Mo: 1.2 | change 6 Mo: 3.4 | change 1 Y: 10.0]"
        );
    }

    #[test]
    fn test_sort_by_change() {
        let mut shares = vec![with_change(-1.0), with_change(2.0), with_change(0.4)];
        shares.sort_by(Share::compare_change);

        let changes: Vec<f64> = shares.iter().map(Share::change).collect();
        assert_eq!(changes, vec![-1.0, 0.4, 2.0]);
    }

    #[test]
    fn test_compare_change_truncates() {
        assert_eq!(with_change(0.9).compare_change(&with_change(0.0)), Ordering::Equal);
        assert_eq!(with_change(1.0).compare_change(&with_change(0.0)), Ordering::Greater);
        assert_eq!(with_change(-2.5).compare_change(&with_change(0.0)), Ordering::Less);
    }
}
