// Result table loaded from the downloaded Enrichr export.
//
// Columns belong to the server; the only ones read by name are the term
// name, adjusted p-value and combined score used for plotting.

use crate::error::{EnrichrError, Result};
use std::io::Read;
use std::path::Path;

pub const TERM_COLUMN: &str = "Term";
pub const ADJUSTED_P_COLUMN: &str = "Adjusted P-value";
pub const COMBINED_SCORE_COLUMN: &str = "Combined Score";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// One enriched term as needed for the bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTerm {
    pub term: String,
    pub adjusted_p_value: f64,
    pub combined_score: Option<f64>,
}

impl ResultTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| EnrichrError::io(path, e))?;
        Self::from_reader(file)
    }

    /// Parse tab-separated text with a header row. Quotes carry no meaning
    /// in Enrichr exports, so they are kept as literal characters.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let rows = rdr
            .records()
            .map(|rec| rec.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, _>>()?;
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of column `name`, with an empty string for short rows.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Extract every row with a parseable adjusted p-value.
    pub fn terms(&self) -> Result<Vec<EnrichedTerm>> {
        let term_idx = self.require_column(TERM_COLUMN)?;
        let p_idx = self.require_column(ADJUSTED_P_COLUMN)?;
        let score_idx = self.column_index(COMBINED_SCORE_COLUMN);

        Ok(self
            .rows
            .iter()
            .filter_map(|row| {
                let adjusted_p_value = row.get(p_idx)?.trim().parse::<f64>().ok()?;
                Some(EnrichedTerm {
                    term: row.get(term_idx)?.clone(),
                    adjusted_p_value,
                    combined_score: score_idx
                        .and_then(|i| row.get(i))
                        .and_then(|v| v.trim().parse().ok()),
                })
            })
            .collect())
    }

    /// Terms with adjusted p-value at or below `cutoff`, most significant
    /// first, at most `top` of them.
    pub fn significant_terms(&self, cutoff: f64, top: usize) -> Result<Vec<EnrichedTerm>> {
        let mut terms: Vec<EnrichedTerm> = self
            .terms()?
            .into_iter()
            .filter(|t| t.adjusted_p_value <= cutoff)
            .collect();
        terms.sort_by(|a, b| a.adjusted_p_value.total_cmp(&b.adjusted_p_value));
        terms.truncate(top);
        Ok(terms)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| EnrichrError::plot(format!("result table has no '{}' column", name)))
    }
}
