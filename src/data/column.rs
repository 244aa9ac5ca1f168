//! Column storage and logical types.

use std::fmt;

use ndarray::Array1;

// =============================================================================
// Logical Types
// =============================================================================

/// Logical type of a column, as exposed by the table engine.
///
/// The FTRL kernel supports `Bool`, `Int`, `Real`, and `Str`; any other type
/// is rejected during row encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalType {
    Bool,
    Int,
    Real,
    Str,
    DateTime,
}

impl LogicalType {
    /// Lowercase type name for error messages.
    pub fn name(self) -> &'static str {
        match self {
            LogicalType::Bool => "bool",
            LogicalType::Int => "int",
            LogicalType::Real => "real",
            LogicalType::Str => "str",
            LogicalType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// String Column
// =============================================================================

/// String column backed by one shared byte buffer.
///
/// Element `i` is the byte range `bytes[offsets[i]..offsets[i + 1]]`;
/// `offsets` has `len + 1` entries starting at 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrColumn {
    offsets: Vec<u32>,
    bytes: Vec<u8>,
}

impl StrColumn {
    /// Create an empty string column.
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            bytes: Vec::new(),
        }
    }

    /// Build a column from string values.
    pub fn from_strings<S: AsRef<str>>(values: &[S]) -> Self {
        let mut col = Self::new();
        for value in values {
            col.push(value.as_ref());
        }
        col
    }

    /// Append one value.
    pub fn push(&mut self, value: &str) {
        self.bytes.extend_from_slice(value.as_bytes());
        self.offsets.push(self.bytes.len() as u32);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the column holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte content of element `row`.
    #[inline]
    pub fn value(&self, row: usize) -> &[u8] {
        let start = self.offsets[row] as usize;
        let end = self.offsets[row + 1] as usize;
        &self.bytes[start..end]
    }
}

impl<S: AsRef<str>> FromIterator<S> for StrColumn {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut col = Self::new();
        for value in iter {
            col.push(value.as_ref());
        }
        col
    }
}

// =============================================================================
// Column
// =============================================================================

/// A typed column of values.
#[derive(Clone, Debug)]
pub enum Column {
    Bool(Array1<bool>),
    Int(Array1<i32>),
    Real(Array1<f64>),
    Str(StrColumn),
    /// Epoch timestamps. Present so the engine surface is realistic; the
    /// FTRL kernel rejects it as unsupported.
    DateTime(Array1<i64>),
}

impl Column {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Bool(values) => values.len(),
            Column::Int(values) => values.len(),
            Column::Real(values) => values.len(),
            Column::Str(values) => values.len(),
            Column::DateTime(values) => values.len(),
        }
    }

    /// Whether the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column's logical type.
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Column::Bool(_) => LogicalType::Bool,
            Column::Int(_) => LogicalType::Int,
            Column::Real(_) => LogicalType::Real,
            Column::Str(_) => LogicalType::Str,
            Column::DateTime(_) => LogicalType::DateTime,
        }
    }

    /// Boolean values, if this is a boolean column.
    pub fn as_bool(&self) -> Option<&Array1<bool>> {
        match self {
            Column::Bool(values) => Some(values),
            _ => None,
        }
    }

    /// Real values, if this is a real column.
    pub fn as_real(&self) -> Option<&Array1<f64>> {
        match self {
            Column::Real(values) => Some(values),
            _ => None,
        }
    }
}

impl From<Vec<bool>> for Column {
    fn from(values: Vec<bool>) -> Self {
        Column::Bool(Array1::from(values))
    }
}

impl From<Vec<i32>> for Column {
    fn from(values: Vec<i32>) -> Self {
        Column::Int(Array1::from(values))
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Real(Array1::from(values))
    }
}

impl From<StrColumn> for Column {
    fn from(values: StrColumn) -> Self {
        Column::Str(values)
    }
}
