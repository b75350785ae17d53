use chrono::{DateTime, Utc};

pub fn format_duration(duration: chrono::Duration) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    let seconds = duration.num_seconds() % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// mm:ss for rest-timer style displays.
pub fn format_seconds(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats_hms() {
        assert_eq!(format_duration(chrono::Duration::seconds(3725)), "01:02:05");
    }

    #[test]
    fn seconds_format_mmss() {
        assert_eq!(format_seconds(0), "00:00");
        assert_eq!(format_seconds(75), "01:15");
        assert_eq!(format_seconds(150), "02:30");
    }
}
