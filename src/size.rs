//! Human-readable byte sizes

use crate::error::ConfigError;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with binary multiples, e.g. `1.50 KB`.
///
/// Plain bytes are printed without decimals.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// Parse a size string like "100", "10MB", "1.5G" or "512 kb" into bytes.
///
/// Units are binary (1KB = 1024). Single-letter forms (K, M, G, T, P) are
/// accepted as well.
pub fn parse_size(input: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidSize {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let s = input.trim().to_uppercase();
    if s.is_empty() {
        return Err(invalid("empty size"));
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().map_err(|_| invalid("number out of range"));
    }

    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (num_str, unit_str) = s.split_at(split);
    let unit_str = unit_str.trim();

    let multiplier: u64 = match unit_str {
        "B" => 1,
        "K" | "KB" => 1 << 10,
        "M" | "MB" => 1 << 20,
        "G" | "GB" => 1 << 30,
        "T" | "TB" => 1 << 40,
        "P" | "PB" => 1 << 50,
        "" => return Err(invalid("missing unit")),
        _ => {
            return Err(invalid(&format!(
                "unknown unit '{}', use one of {}",
                unit_str,
                UNITS.join(", ")
            )));
        }
    };

    let number: f64 = num_str
        .parse()
        .map_err(|_| invalid(&format!("invalid number '{}'", num_str)))?;

    let bytes = number * multiplier as f64;
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(invalid("number out of range"));
    }

    Ok(bytes as u64)
}
