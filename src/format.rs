/// Placeholder for absent or zero values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Decimal places shown for every numeric cell.
pub const DECIMALS: usize = 4;

/// Absent and zero values are both treated as "no value".
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && v.is_finite())
}

pub fn format_price(value: Option<f64>) -> String {
    match present(value) {
        Some(v) => format!("${:.*}", DECIMALS, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_text(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}
