//! Spreadsheet column labels.
//!
//! Labels use bijective base-26 naming: `A`..`Z`, `AA`..`ZZ`, `AAA`.. up to
//! the xlsx column limit `XFD`.

/// Number of columns an xlsx worksheet can hold.
pub const MAX_COLUMNS: usize = 16_384;

/// Precomputed, read-only list of column labels indexed by zero-based position.
#[derive(Debug, Clone)]
pub struct ColumnLabels {
    labels: Vec<String>,
}

impl ColumnLabels {
    /// Generates the full label table for [`MAX_COLUMNS`] columns.
    pub fn new() -> Self {
        Self::with_capacity(MAX_COLUMNS)
    }

    /// Generates labels for the first `capacity` columns.
    pub fn with_capacity(capacity: usize) -> Self {
        let labels = (0..capacity).map(column_name).collect();
        Self { labels }
    }

    /// Returns the label for a zero-based column index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of labels in the table.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns an A1-style reference such as `AB12`.
    pub fn cell_ref(&self, index: usize, row: u32) -> Option<String> {
        self.get(index).map(|label| format!("{label}{row}"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self::new()
    }
}

fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    // Only ASCII uppercase letters are pushed.
    letters.into_iter().map(char::from).collect()
}
