//! Time display formatting

/// Format seconds as `minutes:seconds`
///
/// Minutes are not wrapped into hours (`3600.0` formats as `60:00`), seconds
/// are zero-padded to two digits. Negative and non-finite input formats as
/// `0:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    };

    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes}:{secs:02}")
}

/// Format a progress label: `current / duration`, or just `current` while the
/// duration is unknown
pub fn format_progress(current: f64, duration: Option<f64>) -> String {
    match duration {
        Some(total) if total.is_finite() => {
            format!("{} / {}", format_time(current), format_time(total))
        }
        _ => format_time(current),
    }
}
