//! Schema reconciliation between an incoming frame and a reference schema.
//!
//! When appending to an existing table the incoming frame is reshaped to the
//! table's column set and order: incoming-only columns are dropped (schema
//! drift on append is silently lossy by design), missing columns are added
//! filled with type-appropriate defaults, and the result follows the
//! reference order exactly.

use crate::core::{Column, DType, Frame, Value};

/// Default fill value for a column type.
pub fn default_value(dtype: DType) -> Value {
    match dtype {
        DType::Text | DType::Object => Value::Text("na".to_string()),
        DType::Int64 | DType::Int32 => Value::Int(0),
        DType::Bool => Value::Bool(false),
        DType::Float64 => Value::Float(0.0),
        _ => Value::Int(0),
    }
}

/// Reshape `frame` to match the column set and order of `reference`.
///
/// A missing or column-less reference leaves the frame unchanged
/// (reconciliation is only meaningful when appending to an existing table).
/// Row count and the values of surviving columns are never modified.
pub fn reconcile(frame: Frame, reference: Option<&Frame>) -> Frame {
    let Some(reference) = reference.filter(|r| !r.is_empty()) else {
        return frame;
    };

    let rows = frame.row_count();
    let index_name = if frame.index_name() == "index" {
        None
    } else {
        Some(frame.index_name().to_string())
    };

    let columns = reference
        .columns()
        .iter()
        .map(|ref_col| match frame.column(&ref_col.name) {
            Some(col) => col.clone(),
            None => Column::new(
                ref_col.name.clone(),
                ref_col.dtype,
                vec![default_value(ref_col.dtype); rows],
            ),
        })
        .collect();

    // Reference column names are unique and every column is `rows` long,
    // so the frame invariants hold by construction.
    Frame::from_parts(columns, index_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, dtype: DType, values: Vec<Value>) -> Column {
        Column::new(name, dtype, values)
    }

    fn incoming() -> Frame {
        Frame::from_columns(vec![
            column("a", DType::Int32, vec![Value::Int(1), Value::Int(2)]),
            column(
                "b",
                DType::Text,
                vec![Value::Text("x".into()), Value::Text("y".into())],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_no_reference_is_identity() {
        let frame = incoming();
        let result = reconcile(frame.clone(), None);
        assert_eq!(result, frame);
    }

    #[test]
    fn test_empty_reference_is_identity() {
        let frame = incoming();
        let empty = Frame::new();
        let result = reconcile(frame.clone(), Some(&empty));
        assert_eq!(result, frame);
    }

    #[test]
    fn test_result_matches_reference_shape() {
        let reference = Frame::from_columns(vec![
            column("b", DType::Text, vec![Value::Text("na".into())]),
            column("c", DType::Float64, vec![Value::Float(0.0)]),
            column("a", DType::Int32, vec![Value::Int(0)]),
        ])
        .unwrap();

        let result = reconcile(incoming(), Some(&reference));
        assert_eq!(result.column_names(), vec!["b", "c", "a"]);
        assert_eq!(result.row_count(), 2);
    }

    #[test]
    fn test_incoming_only_columns_are_dropped() {
        let reference =
            Frame::from_columns(vec![column("a", DType::Int32, vec![Value::Int(0)])]).unwrap();

        let result = reconcile(incoming(), Some(&reference));
        assert_eq!(result.column_names(), vec!["a"]);
        assert!(result.column("b").is_none());
    }

    #[test]
    fn test_missing_columns_filled_with_defaults() {
        let reference = Frame::from_columns(vec![
            column("a", DType::Int32, vec![Value::Int(0)]),
            column("label", DType::Text, vec![Value::Text("na".into())]),
            column("flag", DType::Bool, vec![Value::Bool(false)]),
            column("ratio", DType::Float64, vec![Value::Float(0.0)]),
        ])
        .unwrap();

        let result = reconcile(incoming(), Some(&reference));
        let label = result.column("label").unwrap();
        assert_eq!(
            label.values,
            vec![Value::Text("na".into()), Value::Text("na".into())]
        );
        let flag = result.column("flag").unwrap();
        assert_eq!(flag.values, vec![Value::Bool(false), Value::Bool(false)]);
        let ratio = result.column("ratio").unwrap();
        assert_eq!(ratio.values, vec![Value::Float(0.0), Value::Float(0.0)]);
    }

    #[test]
    fn test_surviving_values_unchanged() {
        let reference = Frame::from_columns(vec![
            column("b", DType::Text, vec![Value::Text("na".into())]),
            column("a", DType::Int32, vec![Value::Int(0)]),
        ])
        .unwrap();

        let result = reconcile(incoming(), Some(&reference));
        assert_eq!(
            result.column("a").unwrap().values,
            vec![Value::Int(1), Value::Int(2)]
        );
        assert_eq!(
            result.column("b").unwrap().values,
            vec![Value::Text("x".into()), Value::Text("y".into())]
        );
    }

    #[test]
    fn test_default_value_table() {
        assert_eq!(default_value(DType::Text), Value::Text("na".into()));
        assert_eq!(default_value(DType::Object), Value::Text("na".into()));
        assert_eq!(default_value(DType::Int64), Value::Int(0));
        assert_eq!(default_value(DType::Int32), Value::Int(0));
        assert_eq!(default_value(DType::Bool), Value::Bool(false));
        assert_eq!(default_value(DType::Float64), Value::Float(0.0));
        assert_eq!(default_value(DType::Timestamp), Value::Int(0));
    }
}
