use crate::models::{ColumnKind, NumericKind, Value};
use crate::readers::is_missing_marker;

/// Decide how a column is filled. Numeric is checked first: every present
/// value must parse as a finite number. A column with no present values is
/// numeric.
pub fn classify_column(values: &[Value]) -> ColumnKind {
    let mut kind = NumericKind::Integer;

    for value in values {
        match value {
            Value::Null => {}
            Value::Integer(_) => {}
            Value::Real(v) => {
                if !v.is_finite() {
                    return ColumnKind::Textual;
                }
                kind = NumericKind::Real;
            }
            Value::Text(s) => {
                if is_missing_marker(s) {
                    continue;
                }
                match parse_number(s) {
                    Some(NumericKind::Integer) => {}
                    Some(NumericKind::Real) => kind = NumericKind::Real,
                    None => return ColumnKind::Textual,
                }
            }
        }
    }

    ColumnKind::Numeric(kind)
}

/// Which numeric kind `raw` parses as, if any.
pub fn parse_number(raw: &str) -> Option<NumericKind> {
    let trimmed = raw.trim();
    if trimmed.parse::<i64>().is_ok() {
        return Some(NumericKind::Integer);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(NumericKind::Real),
        _ => None,
    }
}
