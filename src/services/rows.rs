// src/services/rows.rs

//! Table row to [`Share`] extraction.

use scraper::{ElementRef, Selector};
use thiserror::Error;

use crate::error::Result;
use crate::models::{ColumnMap, Share, SourceConfig};
use crate::services::cells::{CellError, CellFormat, CellParser};
use crate::utils::parse_selector;

/// Why a row produced no share.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    /// Header, footer, or spacer row without a name
    #[error("row has no name")]
    Blank,

    #[error("column {index} is missing")]
    MissingColumn { name: String, index: usize },

    #[error("column {index}: {source}")]
    Malformed {
        name: String,
        index: usize,
        source: CellError,
    },
}

impl RowError {
    /// Log the skipped row; blank rows are expected and only show at debug.
    pub fn report(&self) {
        match self {
            RowError::Blank => log::debug!("Skipping row without a name"),
            RowError::MissingColumn { name, .. } | RowError::Malformed { name, .. } => {
                log::warn!("Problem with: {} ({})", name, self)
            }
        }
    }
}

/// Builds shares from the rows of the components table.
pub struct RowExtractor {
    cells: Selector,
    name: Selector,
    parser: CellParser,
    columns: ColumnMap,
}

impl RowExtractor {
    pub fn new(cells: Selector, name: Selector, span: Selector, columns: ColumnMap) -> Self {
        Self {
            cells,
            name,
            parser: CellParser::new(span),
            columns,
        }
    }

    /// Compile the row selectors from the source configuration.
    pub fn from_config(source: &SourceConfig, columns: ColumnMap) -> Result<Self> {
        Ok(Self::new(
            parse_selector(&source.cell_selector)?,
            parse_selector(&source.name_selector)?,
            parse_selector(&source.span_selector)?,
            columns,
        ))
    }

    /// Extract a share, or `None` when the row is blank or malformed.
    pub fn extract_share(&self, row: ElementRef<'_>) -> Option<Share> {
        self.extract(row)
            .inspect_err(RowError::report)
            .ok()
    }

    /// Extract a share, reporting why the row was skipped.
    ///
    /// Every numeric column must parse; a row never yields a partial share.
    pub fn extract(&self, row: ElementRef<'_>) -> std::result::Result<Share, RowError> {
        let cells: Vec<ElementRef<'_>> = row.select(&self.cells).collect();

        let name = cells
            .get(self.columns.name)
            .and_then(|cell| cell.select(&self.name).next())
            .map(|anchor| anchor.text().collect::<String>())
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            return Err(RowError::Blank);
        }

        let field = |index: usize, format: CellFormat| -> std::result::Result<f64, RowError> {
            let cell = cells.get(index).ok_or_else(|| RowError::MissingColumn {
                name: name.clone(),
                index,
            })?;
            self.parser
                .parse(*cell, format)
                .map_err(|source| RowError::Malformed {
                    name: name.clone(),
                    index,
                    source,
                })
        };

        let latest_price = field(self.columns.latest_price, CellFormat::Grouped)?;
        let change = field(self.columns.change, CellFormat::Span)?;
        let change_3_months = field(self.columns.change_3_months, CellFormat::Span)?;
        let change_6_months = field(self.columns.change_6_months, CellFormat::Span)?;
        let change_1_year = field(self.columns.change_1_year, CellFormat::Span)?;

        Ok(Share::new(
            name,
            latest_price,
            change,
            change_3_months,
            change_6_months,
            change_1_year,
        ))
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn extractor() -> RowExtractor {
        RowExtractor::from_config(&SourceConfig::default(), ColumnMap::default()).unwrap()
    }

    fn pct(value: &str) -> String {
        format!("<td><span>{value}</span>%</td>")
    }

    fn row_html(name: &str, price: &str, change: &str, m3: &str, m6: &str, y1: &str) -> String {
        format!(
            "<tr><td><a href=\"/stocks/x\">{name}</a></td><td>{price}<br>USD</td><td>prev</td>{}<td>time</td>{}{}{}</tr>",
            pct(change),
            pct(m3),
            pct(m6),
            pct(y1)
        )
    }

    fn with_row<T>(row: &str, f: impl FnOnce(ElementRef<'_>) -> T) -> T {
        let html = Html::parse_document(&format!("<table><tbody>{row}</tbody></table>"));
        let tr = parse_selector("tbody tr").unwrap();
        let row = html.select(&tr).next().unwrap();
        f(row)
    }

    #[test]
    fn test_valid_row() {
        let row = row_html("Apple Inc.", "1,234.56", "-0.42", "3.1", "12.75", "-8");
        let share = with_row(&row, |r| extractor().extract_share(r)).unwrap();

        assert_eq!(share, Share::new("Apple Inc.", 1234.56, -0.42, 3.1, 12.75, -8.0));
    }

    #[test]
    fn test_name_is_trimmed() {
        let row = row_html("\n  3M  \n", "99", "1", "2", "3", "4");
        let share = with_row(&row, |r| extractor().extract_share(r)).unwrap();
        assert_eq!(share.name(), "3M");
    }

    #[test]
    fn test_blank_name_skipped() {
        let row = row_html("", "99", "1", "2", "3", "4");
        assert_eq!(with_row(&row, |r| extractor().extract(r)), Err(RowError::Blank));
    }

    #[test]
    fn test_row_without_anchor_is_blank() {
        let row = "<tr><td>Name</td><td>Price</td></tr>";
        assert_eq!(with_row(row, |r| extractor().extract(r)), Err(RowError::Blank));
    }

    #[test]
    fn test_any_bad_numeric_cell_drops_row() {
        let rows = [
            row_html("A", "n/a", "1", "2", "3", "4"),
            row_html("B", "1", "-", "2", "3", "4"),
            row_html("C", "1", "2", "x", "3", "4"),
            row_html("D", "1", "2", "3", "", "4"),
            row_html("E", "1", "2", "3", "4", "abc"),
        ];
        for row in &rows {
            let result = with_row(row, |r| extractor().extract(r));
            assert!(matches!(result, Err(RowError::Malformed { .. })), "{row}");
            assert!(with_row(row, |r| extractor().extract_share(r)).is_none());
        }
    }

    #[test]
    fn test_short_row_is_missing_column() {
        let row = "<tr><td><a>Acme</a></td><td>10</td></tr>";
        let result = with_row(row, |r| extractor().extract(r));
        assert_eq!(
            result,
            Err(RowError::MissingColumn {
                name: "Acme".to_string(),
                index: 3
            })
        );
    }

    #[test]
    fn test_message_leaves_name_to_report() {
        let row = row_html("Acme", "n/a", "1", "2", "3", "4");
        let err = with_row(&row, |r| extractor().extract(r)).unwrap_err();
        assert_eq!(err.to_string(), "column 1: 'n/a' is not a number");
    }

    #[test]
    fn test_custom_column_map() {
        let columns = ColumnMap {
            name: 0,
            latest_price: 1,
            change: 2,
            change_3_months: 3,
            change_6_months: 4,
            change_1_year: 5,
        };
        let extractor = RowExtractor::from_config(&SourceConfig::default(), columns).unwrap();
        let row = format!(
            "<tr><td><a>Acme</a></td><td>101.5</td>{}{}{}{}</tr>",
            pct("-0.5"),
            pct("1.2"),
            pct("3.4"),
            pct("10")
        );
        let share = with_row(&row, |r| extractor.extract_share(r)).unwrap();

        assert_eq!(share.csv_fields().join(","), "Acme,101.5,-0.5,1.2,3.4,10.0");
    }
}
