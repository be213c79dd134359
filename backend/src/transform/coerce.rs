//! Metric cell coercion.

/// Convert a metric cell to a finite number.
///
/// Missing cells, blanks, NaN markers, infinities and anything that does not
/// parse all come back as `None`. Never fails.
pub fn safe_float(cell: Option<&str>) -> Option<f64> {
    let raw = cell?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
