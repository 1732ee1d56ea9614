//! Local handle to a frame stored on the H2O cluster.

use crate::core::error::{H2oAutoMLError, Result};
use crate::core::types::ColumnRef;
use serde::{Deserialize, Serialize};

/// A remote frame: its key plus the schema needed to validate column
/// references locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    id: String,
    columns: Vec<String>,
    rows: Option<u64>,
}

impl Frame {
    /// Describe a frame by id and ordered column names.
    pub fn new<S, I, C>(id: S, columns: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Frame {
            id: id.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: None,
        }
    }

    /// Attach a known row count.
    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Frame key on the cluster
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Column names in frame order
    pub fn names(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows, when known
    pub fn nrows(&self) -> Option<u64> {
        self.rows
    }

    /// Whether a column with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Resolve a column reference to a column name.
    ///
    /// Indices must satisfy `-ncols <= index < ncols`; negative indices count
    /// from the end. Names must exist in the frame.
    pub fn resolve_column(&self, column: &ColumnRef) -> Result<String> {
        match column {
            ColumnRef::Index(index) => self.resolve_index(*index),
            ColumnRef::Name(name) => {
                if self.contains(name) {
                    Ok(name.clone())
                } else {
                    Err(H2oAutoMLError::column_not_found(name.clone()))
                }
            }
        }
    }

    fn resolve_index(&self, index: i64) -> Result<String> {
        let ncols = self.ncols() as i64;
        if !(-ncols <= index && index < ncols) {
            return Err(H2oAutoMLError::column_index_out_of_bounds(index, self.ncols()));
        }
        let position = if index < 0 { ncols + index } else { index };
        Ok(self.columns[position as usize].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new("train.hex", ["a", "b", "target"])
    }

    #[test]
    fn test_frame_accessors() {
        let frame = frame().with_rows(100);
        assert_eq!(frame.id(), "train.hex");
        assert_eq!(frame.ncols(), 3);
        assert_eq!(frame.nrows(), Some(100));
        assert!(frame.contains("b"));
        assert!(!frame.contains("z"));
    }

    #[test]
    fn test_resolve_positive_and_negative_indices() {
        let frame = frame();
        assert_eq!(frame.resolve_column(&ColumnRef::Index(0)).unwrap(), "a");
        assert_eq!(frame.resolve_column(&ColumnRef::Index(2)).unwrap(), "target");
        assert_eq!(frame.resolve_column(&ColumnRef::Index(-1)).unwrap(), "target");
        assert_eq!(frame.resolve_column(&ColumnRef::Index(-3)).unwrap(), "a");
    }

    #[test]
    fn test_resolve_out_of_bounds() {
        let frame = frame();
        for index in [3, 4, -4, i64::MIN, i64::MAX] {
            let err = frame.resolve_column(&ColumnRef::Index(index)).unwrap_err();
            assert!(matches!(
                err,
                H2oAutoMLError::ColumnIndexOutOfBounds { ncols: 3, .. }
            ));
        }
    }

    #[test]
    fn test_huge_unsigned_index_does_not_wrap() {
        let column = ColumnRef::from(usize::MAX);
        assert_eq!(column, ColumnRef::Index(i64::MAX));

        let err = frame().resolve_column(&column).unwrap_err();
        assert!(matches!(
            err,
            H2oAutoMLError::ColumnIndexOutOfBounds { index: i64::MAX, ncols: 3 }
        ));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let err = frame().resolve_column(&ColumnRef::from("z")).unwrap_err();
        assert_eq!(err.to_string(), "Column z does not exist in the training frame");
    }
}
