//! Restaurant opening hours.
//!
//! The weekly schedule is fixed and evaluated in the restaurant's local
//! timezone, so DST transitions never shift the lunch window. "Open" means
//! strictly inside a window; sitting exactly on a boundary counts as closed.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::Serialize;

/// The restaurant's local timezone.
pub const RESTAURANT_TZ: Tz = chrono_tz::Europe::Berlin;

/// Half-open service window in minutes since local midnight.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: u32,
    end: u32,
}

const fn w(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Window {
    Window {
        start: start_h * 60 + start_m,
        end: end_h * 60 + end_m,
    }
}

const LUNCH: Window = w(11, 30, 14, 30);
const DINNER: Window = w(17, 30, 21, 30);
const SAT_DAY: Window = w(11, 30, 17, 30);
const SAT_EVENING: Window = w(17, 30, 22, 30);

/// Weekly schedule indexed by `Weekday::num_days_from_monday`.
/// Monday is the weekly closing day.
const SCHEDULE: [&[Window]; 7] = [
    &[],                       // Monday
    &[LUNCH, DINNER],          // Tuesday
    &[LUNCH, DINNER],          // Wednesday
    &[LUNCH, DINNER],          // Thursday
    &[LUNCH, DINNER],          // Friday
    &[SAT_DAY, SAT_EVENING],   // Saturday
    &[LUNCH, DINNER],          // Sunday
];

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// One day of the published schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub day: &'static str,
    /// `["11:30", "14:30"]` pairs; empty on closing days.
    pub windows: Vec<[String; 2]>,
}

/// Current opening status plus the published weekly schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub is_open: bool,
    /// Next opening time in RFC 3339, absent only if the schedule is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_opening: Option<String>,
    pub schedule: Vec<DaySchedule>,
}

fn fmt_minutes(total: u32) -> String {
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Whether the restaurant is open at the given local instant.
#[must_use]
pub fn is_open_at(now: DateTime<Tz>) -> bool {
    let minutes = now.hour() * 60 + now.minute();
    let today = SCHEDULE[now.weekday().num_days_from_monday() as usize];
    today.iter().any(|win| win.start < minutes && minutes < win.end)
}

/// The next instant the restaurant opens, scanning up to a week ahead.
///
/// When called during an open window this still returns the next window's
/// start, which is what the storefront banner wants while open.
#[must_use]
pub fn next_opening_after(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    for day_offset in 0..=7_i64 {
        let date = now.date_naive() + Duration::days(day_offset);
        let windows = SCHEDULE[date.weekday().num_days_from_monday() as usize];

        for win in windows {
            let time = NaiveTime::from_num_seconds_from_midnight_opt(win.start * 60, 0)?;
            // A nonexistent local time (spring-forward gap) skips the window.
            let Some(candidate) = RESTAURANT_TZ
                .from_local_datetime(&date.and_time(time))
                .earliest()
            else {
                continue;
            };
            if candidate > now {
                return Some(candidate);
            }
        }
    }
    None
}

/// The published weekly schedule.
#[must_use]
pub fn weekly_schedule() -> Vec<DaySchedule> {
    SCHEDULE
        .iter()
        .zip(DAY_NAMES)
        .map(|(windows, day)| DaySchedule {
            day,
            windows: windows
                .iter()
                .map(|win| [fmt_minutes(win.start), fmt_minutes(win.end)])
                .collect(),
        })
        .collect()
}

/// Full opening-hours block for `GET /v1/info`.
#[must_use]
pub fn opening_hours(now: DateTime<Tz>) -> OpeningHours {
    OpeningHours {
        is_open: is_open_at(now),
        next_opening: next_opening_after(now).map(|dt| dt.to_rfc3339()),
        schedule: weekly_schedule(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn berlin(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        RESTAURANT_TZ.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_open_during_tuesday_lunch() {
        // 2026-08-25 is a Tuesday.
        assert!(is_open_at(berlin(2026, 8, 25, 12, 0)));
    }

    #[test]
    fn test_boundary_instants_count_as_closed() {
        assert!(!is_open_at(berlin(2026, 8, 25, 11, 30)));
        assert!(!is_open_at(berlin(2026, 8, 25, 14, 30)));
        assert!(is_open_at(berlin(2026, 8, 25, 11, 31)));
    }

    #[test]
    fn test_closed_on_monday() {
        // 2026-08-24 is a Monday.
        assert!(!is_open_at(berlin(2026, 8, 24, 12, 0)));
    }

    #[test]
    fn test_closed_between_lunch_and_dinner() {
        assert!(!is_open_at(berlin(2026, 8, 25, 16, 0)));
        assert!(is_open_at(berlin(2026, 8, 25, 18, 0)));
    }

    #[test]
    fn test_saturday_has_no_afternoon_gap() {
        // 2026-08-29 is a Saturday.
        assert!(is_open_at(berlin(2026, 8, 29, 16, 0)));
        assert!(is_open_at(berlin(2026, 8, 29, 22, 0)));
        assert!(!is_open_at(berlin(2026, 8, 29, 22, 30)));
    }

    #[test]
    fn test_next_opening_skips_monday() {
        // Sunday night after close jumps over Monday to Tuesday lunch.
        let next = next_opening_after(berlin(2026, 8, 23, 22, 0)).unwrap();
        assert_eq!(next, berlin(2026, 8, 25, 11, 30));
    }

    #[test]
    fn test_next_opening_same_day_dinner() {
        let next = next_opening_after(berlin(2026, 8, 25, 15, 0)).unwrap();
        assert_eq!(next, berlin(2026, 8, 25, 17, 30));
    }

    #[test]
    fn test_schedule_wire_shape() {
        let hours = opening_hours(berlin(2026, 8, 25, 12, 0));
        assert!(hours.is_open);
        let json = serde_json::to_value(&hours).unwrap();
        assert_eq!(json["schedule"][0]["day"], "Monday");
        assert_eq!(json["schedule"][0]["windows"], serde_json::json!([]));
        assert_eq!(json["schedule"][1]["windows"][0][0], "11:30");
    }
}
