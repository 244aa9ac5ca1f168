//! Frame container and builder.

use ndarray::Array1;

use super::column::{Column, LogicalType, StrColumn};

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while assembling a [`Frame`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum FrameError {
    #[error("column `{name}` has {got} rows, expected {expected}")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("duplicate column name `{name}`")]
    DuplicateColumnName { name: String },
}

// =============================================================================
// Frame
// =============================================================================

/// A named collection of equally sized typed columns.
///
/// Training frames carry the boolean label as the last column; prediction
/// frames carry feature columns only.
///
/// # Example
///
/// ```
/// use ftrl::{Frame, LogicalType};
///
/// let frame = Frame::builder()
///     .bool_column("clicked", vec![true, false])
///     .int_column("impressions", vec![3, 7])
///     .build()
///     .unwrap();
///
/// assert_eq!(frame.n_rows(), 2);
/// assert_eq!(frame.n_cols(), 2);
/// assert_eq!(frame.logical_type(1), LogicalType::Int);
/// ```
#[derive(Clone, Debug)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    /// Assemble a frame from named columns.
    ///
    /// All columns must have equal length; names must be unique.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self, FrameError> {
        let mut builder = FrameBuilder::new();
        for (name, column) in columns {
            builder = builder.column(name, column);
        }
        builder.build()
    }

    /// Create a builder for incremental construction.
    pub fn builder() -> FrameBuilder {
        FrameBuilder::new()
    }

    /// Build a single real-valued column frame.
    ///
    /// This is the result shape produced by the prediction driver.
    pub fn single_real(name: impl Into<String>, values: Array1<f64>) -> Self {
        let n_rows = values.len();
        Self {
            names: vec![name.into()],
            columns: vec![Column::Real(values)],
            n_rows,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Name of column `index`.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Column `index`.
    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    /// Logical type of column `index`.
    pub fn logical_type(&self, index: usize) -> LogicalType {
        self.columns[index].logical_type()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Incremental [`Frame`] construction.
#[derive(Debug, Default)]
pub struct FrameBuilder {
    columns: Vec<(String, Column)>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column of any type.
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    /// Add a boolean column.
    pub fn bool_column(self, name: impl Into<String>, values: Vec<bool>) -> Self {
        self.column(name, Column::from(values))
    }

    /// Add an integer column.
    pub fn int_column(self, name: impl Into<String>, values: Vec<i32>) -> Self {
        self.column(name, Column::from(values))
    }

    /// Add a real column.
    pub fn real_column(self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.column(name, Column::from(values))
    }

    /// Add a string column.
    pub fn str_column(self, name: impl Into<String>, values: StrColumn) -> Self {
        self.column(name, Column::from(values))
    }

    /// Validate lengths and names, producing the frame.
    pub fn build(self) -> Result<Frame, FrameError> {
        let n_rows = self.columns.first().map_or(0, |(_, col)| col.len());

        let mut names = Vec::with_capacity(self.columns.len());
        let mut columns = Vec::with_capacity(self.columns.len());

        for (name, column) in self.columns {
            if column.len() != n_rows {
                return Err(FrameError::ColumnLengthMismatch {
                    name,
                    expected: n_rows,
                    got: column.len(),
                });
            }
            if names.contains(&name) {
                return Err(FrameError::DuplicateColumnName { name });
            }
            names.push(name);
            columns.push(column);
        }

        Ok(Frame {
            names,
            columns,
            n_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_mixed_frame() {
        let frame = Frame::builder()
            .bool_column("flag", vec![true, false, true])
            .int_column("count", vec![1, 2, 3])
            .real_column("score", vec![0.1, 0.2, 0.3])
            .str_column("tag", StrColumn::from_strings(&["a", "b", "c"]))
            .build()
            .unwrap();

        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.n_cols(), 4);
        assert_eq!(frame.name(3), "tag");
        assert_eq!(frame.logical_type(0), LogicalType::Bool);
        assert_eq!(frame.logical_type(2), LogicalType::Real);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = Frame::builder()
            .bool_column("flag", vec![true, false])
            .int_column("count", vec![1])
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            FrameError::ColumnLengthMismatch { expected: 2, got: 1, .. }
        ));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = Frame::builder()
            .int_column("x", vec![1])
            .real_column("x", vec![1.0])
            .build()
            .unwrap_err();

        assert!(matches!(err, FrameError::DuplicateColumnName { .. }));
    }

    #[test]
    fn single_real_result_frame() {
        let frame = Frame::single_real("target", Array1::from(vec![0.25, 0.75]));
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.n_cols(), 1);
        assert_eq!(frame.name(0), "target");
        assert_eq!(frame.logical_type(0), LogicalType::Real);
    }

    #[test]
    fn empty_builder_builds_empty_frame() {
        let frame = Frame::builder().build().unwrap();
        assert_eq!(frame.n_rows(), 0);
        assert_eq!(frame.n_cols(), 0);
    }
}
