/// Formats seconds as `m:ss`.
///
/// Minutes are unpadded and may exceed 59; seconds are zero-padded. Both are floored.
/// Negative or non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}
