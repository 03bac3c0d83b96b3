//! Cell and column normalization for result comparison.
//!
//! Both sides of a comparison go through exactly the same functions, so rounding is
//! symmetric: numbers are rounded to two decimals half away from zero and rendered with the
//! shortest `Display` form (`5.0` becomes `"5"`, `18.005001` becomes `"18.01"`).

use crate::types::CellValue;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Canonical token for SQL `NULL` and missing cells.
pub const NULL_TOKEN: &str = "NULL";

/// Case-folds and trims a column name.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Renders a cell into its comparison form.
pub fn normalize_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => NULL_TOKEN.to_string(),
        CellValue::Number(n) => normalize_number(*n),
        CellValue::Text(s) => s.clone(),
        CellValue::Boolean(b) => b.to_string(),
    }
}

fn normalize_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let rounded = (n * 100.0).round() / 100.0;
    // -0.0 and 0.0 must render identically
    if rounded == 0.0 {
        return "0".to_string();
    }
    rounded.to_string()
}

/// Reorders the submitted row into the reference column order and normalizes every cell.
///
/// `submitted_index` maps a normalized column name to its position in the submitted result.
/// Reference columns without a submitted counterpart become [`NULL_TOKEN`].
pub fn align_row(
    row: &[CellValue],
    reference_columns: &[String],
    submitted_index: &HashMap<String, usize>,
) -> Vec<String> {
    reference_columns
        .iter()
        .map(|col| {
            submitted_index
                .get(col)
                .and_then(|&i| row.get(i))
                .map(normalize_cell)
                .unwrap_or_else(|| NULL_TOKEN.to_string())
        })
        .collect()
}

/// Lexicographic row ordering, first column first.
pub fn compare_rows(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    a.len().cmp(&b.len())
}
