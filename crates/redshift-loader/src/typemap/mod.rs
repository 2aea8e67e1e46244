//! Type mapping from native column tags to Redshift column types.

use std::collections::HashSet;

use crate::core::{DType, Frame};

/// Semi-structured Redshift type used for designated JSON columns.
pub const SEMI_STRUCTURED_TYPE: &str = "SUPER";

/// Map a native type tag to a Redshift column type keyword.
///
/// Total function: tags without a specific mapping fall through to the
/// unbounded text type.
pub fn redshift_type(dtype: DType) -> &'static str {
    match dtype {
        DType::Int64 => "BIGINT",
        DType::Int32 => "INTEGER",
        DType::Float64 => "REAL",
        DType::Timestamp => "TIMESTAMP",
        DType::Bool => "BOOLEAN",
        _ => "VARCHAR(MAX)",
    }
}

/// Compute the Redshift type keyword for every column of a frame, in order.
///
/// Columns named in `json_columns` map to [`SEMI_STRUCTURED_TYPE`] regardless
/// of their native tag. When `index` is set, the index column's type is
/// prepended.
pub fn column_types(frame: &Frame, index: bool, json_columns: &HashSet<String>) -> Vec<String> {
    let mut types: Vec<String> = frame
        .columns()
        .iter()
        .map(|col| {
            if json_columns.contains(&col.name) {
                SEMI_STRUCTURED_TYPE.to_string()
            } else {
                redshift_type(col.dtype).to_string()
            }
        })
        .collect();
    if index {
        types.insert(0, redshift_type(frame.index_dtype()).to_string());
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, Value};

    #[test]
    fn test_redshift_type_totality() {
        assert_eq!(redshift_type(DType::Int64), "BIGINT");
        assert_eq!(redshift_type(DType::Int32), "INTEGER");
        assert_eq!(redshift_type(DType::Float64), "REAL");
        assert_eq!(redshift_type(DType::Timestamp), "TIMESTAMP");
        assert_eq!(redshift_type(DType::Bool), "BOOLEAN");
        assert_eq!(redshift_type(DType::Text), "VARCHAR(MAX)");
        assert_eq!(redshift_type(DType::Object), "VARCHAR(MAX)");
    }

    fn sample_frame() -> Frame {
        Frame::from_columns(vec![
            Column::new("a", DType::Int32, vec![Value::Int(1)]),
            Column::new("b", DType::Text, vec![Value::Text("x".into())]),
        ])
        .unwrap()
    }

    #[test]
    fn test_column_types_in_order() {
        let frame = sample_frame();
        let types = column_types(&frame, false, &HashSet::new());
        assert_eq!(types, vec!["INTEGER", "VARCHAR(MAX)"]);
    }

    #[test]
    fn test_column_types_with_index() {
        let frame = sample_frame();
        let types = column_types(&frame, true, &HashSet::new());
        assert_eq!(types, vec!["BIGINT", "INTEGER", "VARCHAR(MAX)"]);
    }

    #[test]
    fn test_json_column_override() {
        let frame = sample_frame();
        let json: HashSet<String> = ["a".to_string()].into_iter().collect();
        let types = column_types(&frame, false, &json);
        assert_eq!(types, vec!["SUPER", "VARCHAR(MAX)"]);
    }
}
