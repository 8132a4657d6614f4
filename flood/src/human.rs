const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Formats the given number of bytes using binary prefixes.
///
/// The value is scaled by powers of 1024 and printed with 3 decimal places,
/// except zero, which is always "0B".
pub fn readable_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut v = bytes as f64;
    let mut idx = 0;
    while v >= 1024.0 && idx < UNITS.len() - 1 {
        v /= 1024.0;
        idx += 1;
    }

    format!("{:.3}{}", v, UNITS[idx])
}
