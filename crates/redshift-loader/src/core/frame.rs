//! In-memory tabular dataset types.
//!
//! A [`Frame`] is an ordered sequence of named, typed columns with values
//! aligned by row index. It is the unit of work for the whole pipeline:
//! validation, reconciliation, staging and statement generation all operate
//! on frames.

use chrono::NaiveDateTime;

use crate::error::{LoadError, Result};

/// Native type tag of a frame column.
///
/// These are the tags the type mapper understands; anything the caller
/// cannot classify belongs under [`DType::Object`] and falls through to the
/// unbounded-text mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 64-bit signed integer.
    Int64,
    /// 32-bit (or narrower) signed integer.
    Int32,
    /// Floating point.
    Float64,
    /// Boolean.
    Bool,
    /// Timestamp without timezone.
    Timestamp,
    /// Text data.
    Text,
    /// Anything else (mixed/object columns).
    Object,
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value. Serialized as an empty field.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Value {
    /// Render the value as staged text (before any CSV quoting).
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Timestamp(v) => v.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Text(v) => v.clone(),
        }
    }
}

/// A named, typed column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Native type tag.
    pub dtype: DType,

    /// One value per row.
    pub values: Vec<Value>,
}

impl Column {
    /// Create a column from a name, type tag and values.
    pub fn new(name: impl Into<String>, dtype: DType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }
}

/// An ordered collection of equal-length columns.
///
/// Invariants (enforced by [`Frame::push_column`]):
/// - every column has the same number of values;
/// - column names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
    index_name: Option<String>,
}

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the materialized index column.
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Build a frame from columns, checking the shape invariants.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut frame = Self::new();
        for column in columns {
            frame.push_column(column)?;
        }
        Ok(frame)
    }

    /// Construct from already-validated parts.
    ///
    /// Callers must uphold the equal-length and unique-name invariants.
    pub(crate) fn from_parts(columns: Vec<Column>, index_name: Option<String>) -> Self {
        Self {
            columns,
            index_name,
        }
    }

    /// Append a column, enforcing the shape invariants.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(LoadError::Frame(format!(
                "duplicate column name '{}'",
                column.name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.values.len() != column.values.len() {
                return Err(LoadError::Frame(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.values.len(),
                    first.values.len()
                )));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Mutable access to the columns, for in-place renames.
    ///
    /// Must not be used to change row counts or introduce duplicate names.
    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows (zero for a frame with no columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Whether the frame has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolved name of the index column: the caller-supplied index name,
    /// or literally `index`.
    pub fn index_name(&self) -> &str {
        self.index_name.as_deref().unwrap_or("index")
    }

    /// Type tag of the materialized index column (the row number).
    pub fn index_dtype(&self) -> DType {
        DType::Int64
    }
}
