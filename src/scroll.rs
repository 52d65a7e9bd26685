//! Scroll window over the sorted/filtered rows.
//!
//! Offsets handed out by this module are always inside
//! `[0, max(0, total_rows - visible_rows)]`.

/// Largest offset that still fills the window.
pub fn max_offset(total_rows: usize, visible_rows: usize) -> usize {
    total_rows.saturating_sub(visible_rows)
}

pub fn clamp(offset: usize, total_rows: usize, visible_rows: usize) -> usize {
    offset.min(max_offset(total_rows, visible_rows))
}

/// Rows currently in view. Tolerates an unclamped offset.
pub fn visible<T>(rows: &[T], offset: usize, visible_rows: usize) -> &[T] {
    let start = clamp(offset, rows.len(), visible_rows);
    let end = (start + visible_rows).min(rows.len());
    &rows[start..end]
}

/// Applies wheel ticks. Positive deltas scroll up (towards row 0).
pub fn scroll_by(offset: usize, wheel_ticks: i32, step: usize, total_rows: usize, visible_rows: usize) -> usize {
    let distance = (wheel_ticks.unsigned_abs() as usize).saturating_mul(step);
    let moved = if wheel_ticks > 0 {
        offset.saturating_sub(distance)
    } else {
        offset.saturating_add(distance)
    };
    clamp(moved, total_rows, visible_rows)
}

/// Maps a pointer position on the scrollbar track linearly onto the offset range.
pub fn offset_for_handle(pointer: i32, track_start: i32, track_length: i32, total_rows: usize, visible_rows: usize) -> usize {
    let max = max_offset(total_rows, visible_rows);
    if max == 0 || track_length <= 0 {
        return 0;
    }
    let along = i64::from(pointer) - i64::from(track_start);
    let fraction = (along as f64 / f64::from(track_length)).clamp(0.0, 1.0);
    clamp((fraction * max as f64).round() as usize, total_rows, visible_rows)
}

/// Handle position as a fraction of the track, for drawing.
pub fn handle_fraction(offset: usize, total_rows: usize, visible_rows: usize) -> f32 {
    let max = max_offset(total_rows, visible_rows);
    if max == 0 {
        0.0
    } else {
        clamp(offset, total_rows, visible_rows) as f32 / max as f32
    }
}
