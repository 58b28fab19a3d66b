// Gene list input: the shapes a caller may hand us and how each one is
// flattened into the newline-delimited text the add-list endpoint expects.

use crate::error::{EnrichrError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneList {
    /// Plain identifiers, one per line.
    Genes(Vec<String>),
    /// Rows of cells. One column is a plain list, two columns are
    /// identifier + weight, three or more are BED-style intervals.
    Table(Vec<Vec<String>>),
    /// Pre-formatted flat file, submitted verbatim.
    Path(PathBuf),
}

impl GeneList {
    /// Parse tab- or comma-separated text into a `Table`. Blank lines are
    /// dropped; each line is split on tabs if it has any, commas otherwise.
    pub fn from_delimited(text: &str) -> Self {
        let rows = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let sep = if line.contains('\t') { '\t' } else { ',' };
                line.split(sep).map(|cell| cell.trim().to_string()).collect()
            })
            .collect();
        GeneList::Table(rows)
    }

    /// Flatten into one record per line.
    pub fn to_blob(&self) -> Result<String> {
        match self {
            GeneList::Genes(genes) => Ok(genes.join("\n")),
            GeneList::Table(rows) => Ok(table_to_blob(rows)),
            GeneList::Path(path) => {
                std::fs::read_to_string(path).map_err(|e| EnrichrError::io(path, e))
            }
        }
    }
}

fn table_to_blob(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let lines: Vec<String> = match width {
        0 => Vec::new(),
        1 => rows
            .iter()
            .filter_map(|row| row.first().cloned())
            .collect(),
        2 => rows.iter().map(|row| row.join(",")).collect(),
        _ => rows
            .iter()
            .map(|row| row.iter().take(3).cloned().collect::<Vec<_>>().join("\t"))
            .collect(),
    };
    lines.join("\n")
}

impl From<Vec<String>> for GeneList {
    fn from(genes: Vec<String>) -> Self {
        GeneList::Genes(genes)
    }
}

impl From<Vec<&str>> for GeneList {
    fn from(genes: Vec<&str>) -> Self {
        GeneList::Genes(genes.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Vec<String>>> for GeneList {
    fn from(rows: Vec<Vec<String>>) -> Self {
        GeneList::Table(rows)
    }
}

impl From<PathBuf> for GeneList {
    fn from(path: PathBuf) -> Self {
        GeneList::Path(path)
    }
}

impl From<&Path> for GeneList {
    fn from(path: &Path) -> Self {
        GeneList::Path(path.to_path_buf())
    }
}
