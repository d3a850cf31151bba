//! Pure progress math for rendering the hourglass

use serde::{Deserialize, Serialize};

/// Bottom fill above which the sand pile surface is drawn
pub const SURFACE_THRESHOLD_PERCENT: f64 = 15.0;

/// Percentage of the run still remaining, clamped to `0..=100`.
///
/// Returns `None` for a zero total instead of dividing by zero.
pub fn percent_remaining(remaining_seconds: u64, total_seconds: u64) -> Option<f64> {
    if total_seconds == 0 {
        return None;
    }
    let percentage = remaining_seconds as f64 / total_seconds as f64 * 100.0;
    Some(percentage.clamp(0.0, 100.0))
}

/// Complement of [`percent_remaining`]
pub fn percent_filled(remaining_seconds: u64, total_seconds: u64) -> Option<f64> {
    percent_remaining(remaining_seconds, total_seconds).map(|p| 100.0 - p)
}

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Fill levels of both hourglass chambers, with the drawing rules derived
/// from them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourglassFill {
    /// Sand left in the upper chamber, in percent
    pub top_percent: f64,
    /// Sand collected in the lower chamber, in percent
    pub bottom_percent: f64,
    pub top_visible: bool,
    pub bottom_visible: bool,
    /// Sand pile surface is drawn once the lower chamber passes
    /// [`SURFACE_THRESHOLD_PERCENT`]
    pub show_surface: bool,
    /// Vertical offset, in percent from the top, where the upper sand begins
    pub top_clip_percent: f64,
}

impl HourglassFill {
    pub fn from_counts(remaining_seconds: u64, total_seconds: u64) -> Option<Self> {
        let top_percent = percent_remaining(remaining_seconds, total_seconds)?;
        let bottom_percent = percent_filled(remaining_seconds, total_seconds)?;
        Some(Self {
            top_percent,
            bottom_percent,
            top_visible: top_percent > 0.0,
            bottom_visible: bottom_percent > 0.0,
            show_surface: bottom_percent > SURFACE_THRESHOLD_PERCENT,
            top_clip_percent: 100.0 - top_percent,
        })
    }

    /// Single-line text gauge, `width` cells wide
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.bottom_percent / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_has_no_percentage() {
        assert_eq!(percent_remaining(0, 0), None);
        assert_eq!(percent_filled(10, 0), None);
        assert!(HourglassFill::from_counts(0, 0).is_none());
    }

    #[test]
    fn percentage_is_clamped() {
        assert_eq!(percent_remaining(300, 300), Some(100.0));
        assert_eq!(percent_remaining(150, 300), Some(50.0));
        assert_eq!(percent_remaining(0, 300), Some(0.0));
        assert_eq!(percent_remaining(400, 300), Some(100.0));
    }

    #[test]
    fn added_time_changes_the_denominator() {
        // 60 of 120 left, then 60 seconds added
        assert_eq!(percent_remaining(60, 120), Some(50.0));
        let after = percent_remaining(120, 180).unwrap();
        assert!((after - 66.67).abs() < 0.01);
    }

    #[test]
    fn chambers_follow_remaining_time() {
        let full = HourglassFill::from_counts(240, 240).unwrap();
        assert!(full.top_visible);
        assert!(!full.bottom_visible);
        assert!(!full.show_surface);
        assert_eq!(full.top_clip_percent, 0.0);

        let late = HourglassFill::from_counts(60, 240).unwrap();
        assert_eq!(late.bottom_percent, 75.0);
        assert!(late.show_surface);
        assert_eq!(late.top_clip_percent, 75.0);

        let empty = HourglassFill::from_counts(0, 240).unwrap();
        assert!(!empty.top_visible);
        assert!(empty.bottom_visible);
    }

    #[test]
    fn surface_needs_enough_sand_below() {
        let below = HourglassFill::from_counts(7, 8).unwrap();
        assert_eq!(below.bottom_percent, 12.5);
        assert!(!below.show_surface);
        let above = HourglassFill::from_counts(6, 8).unwrap();
        assert!(above.show_surface);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(300), "05:00");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn bar_width() {
        let half = HourglassFill::from_counts(50, 100).unwrap();
        assert_eq!(half.bar(10), "█████░░░░░");
        let done = HourglassFill::from_counts(0, 100).unwrap();
        assert_eq!(done.bar(4), "████");
    }
}
