//! Clock and cycle-progress text shown by every front end.

/// Number of work sessions in one cycle; the last one earns a long break.
pub const CYCLE_LEN: u32 = 4;

/// Format elapsed seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours; durations past 99 minutes simply
/// widen the minutes field.
pub fn format_clock(elapsed_secs: u64) -> String {
    let minutes = elapsed_secs / 60;
    let seconds = elapsed_secs % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Position within the current cycle, `0..=4`.
///
/// Zero only before the first work session has finished; afterwards a
/// full cycle reads 4 rather than wrapping to 0.
pub fn cycle_position(session_count: u32) -> u32 {
    match session_count % CYCLE_LEN {
        0 if session_count == 0 => 0,
        0 => CYCLE_LEN,
        n => n,
    }
}

/// Format cycle progress as `N/4`.
pub fn format_progress(session_count: u32) -> String {
    format!("{}/{}", cycle_position(session_count), CYCLE_LEN)
}
