//! Turns raw byte counters into what a progress display shows.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable size with two decimals, stepping through binary units.
/// Values that would print as `1024.00` move up to the next unit.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in UNITS {
        if round2(size) < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Floor percentage of `received` out of `total`; `None` while the total is
/// unknown.
pub fn percent(received: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let pct = u128::from(received) * 100 / u128::from(total);
    Some(u8::try_from(pct.min(100)).unwrap_or(100))
}

/// Item-count based batch progress.
pub fn batch_percent(processed: usize, total: usize) -> Option<u8> {
    percent(processed as u64, total as u64)
}

/// `(received, total)` rendered as `"a / b"`.
pub fn size_pair(received: u64, total: u64) -> String {
    format!("{} / {}", format_size(received), format_size(total))
}
