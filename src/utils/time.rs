/// Format a playback position in seconds for the seek bar.
///
/// Positions under an hour render as `m:ss`, longer ones as `h:mm:ss`.
/// Negative or non-finite input renders as `0:00`.
pub fn format_position(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
