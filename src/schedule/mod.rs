//! Schedule engine: opening hours per city and day, and pickup slots.
//!
//! Everything here is a pure function of the schedule config and the
//! date/time passed in. [`ScheduleBook`] adds loading the config from storage.

pub mod book;

pub use book::ScheduleBook;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::domain::{format_hhmm, parse_hhmm, OpenHours, ScheduleConfig, DEFAULT_STEP_MIN};

/// Opening hours for `city` on `date`.
///
/// `None` when no city is given, or when the resolved weekday entry is closed,
/// missing or unparseable. A config whose default table does not have seven
/// entries is ignored in favour of the built-in week (Mon–Sat 11:00–14:00).
pub fn open_hours_for_city(
    config: Option<&ScheduleConfig>,
    city: Option<&str>,
    date: NaiveDate,
) -> Option<OpenHours> {
    let city = city?;
    let built_in;
    let config = match config {
        Some(config) if config.has_complete_default() => config,
        _ => {
            built_in = ScheduleConfig::default();
            &built_in
        }
    };
    let weekday = date.weekday().num_days_from_sunday() as usize;
    config.table_for(city).get(weekday)?.hours()
}

/// Every "HH:MM" from `hours.start` to `hours.end` inclusive, `step_min` apart.
///
/// No slot past `hours.end` is produced when the step does not divide the
/// interval. A zero step is treated as one minute.
pub fn generate_slots(date: NaiveDate, hours: &OpenHours, step_min: u32) -> Vec<String> {
    let step = Duration::minutes(i64::from(step_min.max(1)));
    let end = date.and_time(hours.end);
    let mut current = date.and_time(hours.start);
    let mut slots = Vec::new();
    while current <= end {
        slots.push(format_hhmm(current.time()));
        current += step;
    }
    slots
}

/// Persisted step, or 15 minutes when nothing is configured.
pub fn resolve_step_min(config: Option<&ScheduleConfig>) -> u32 {
    config.map_or(DEFAULT_STEP_MIN, |c| c.step_min)
}

/// Whether a truck is serving right now, and the next pickup slot today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenInfo {
    pub open_now: bool,
    pub hours: Option<OpenHours>,
    pub next_slot: Option<String>,
}

pub fn open_info(config: Option<&ScheduleConfig>, city: Option<&str>, now: NaiveDateTime) -> OpenInfo {
    let Some(hours) = open_hours_for_city(config, city, now.date()) else {
        return OpenInfo { open_now: false, hours: None, next_slot: None };
    };
    // Minute precision, as displayed.
    let now_minute = now.time().format("%H:%M").to_string();
    let open_now = parse_hhmm(&now_minute).is_some_and(|t| hours.contains(t));
    let next_slot = generate_slots(now.date(), &hours, resolve_step_min(config))
        .into_iter()
        .find(|slot| *slot > now_minute);
    OpenInfo { open_now, hours: Some(hours), next_slot }
}

/// Timestamp stored for a slot picked on `date`, interpreted in `tz`.
pub fn pickup_timestamp<Tz: TimeZone>(date: NaiveDate, slot: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let local = date.and_time(parse_hhmm(slot)?);
    let picked = tz.from_local_datetime(&local).earliest()?;
    Some(picked.with_timezone(&Utc))
}

/// "HH:MM" of a stored pickup timestamp, in `tz`.
pub fn slot_label<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String {
    format_hhmm(timestamp.with_timezone(tz).time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayConfig, DAYS_PER_WEEK};
    use chrono::{FixedOffset, NaiveTime};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 11).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_orange_on_monday_has_thirteen_slots() {
        let hours = open_hours_for_city(None, Some("Orange"), monday()).unwrap();
        assert_eq!(hours, OpenHours::new(hm(11, 0), hm(14, 0)));

        let slots = generate_slots(monday(), &hours, resolve_step_min(None));
        assert_eq!(slots.len(), 13);
        assert_eq!(slots.first().map(String::as_str), Some("11:00"));
        assert_eq!(slots[1], "11:15");
        assert_eq!(slots.last().map(String::as_str), Some("14:00"));
    }

    #[test]
    fn test_even_step_count_formula() {
        let hours = OpenHours::new(hm(9, 30), hm(12, 30));
        for step in [5u32, 10, 15, 20, 30, 60] {
            let slots = generate_slots(monday(), &hours, step);
            assert_eq!(slots.len() as u32, 180 / step + 1, "step {step}");
            assert_eq!(slots[0], "09:30");
            assert_eq!(slots.last().unwrap(), "12:30");
        }
    }

    #[test]
    fn test_uneven_step_never_overflows_end() {
        let hours = OpenHours::new(hm(11, 0), hm(12, 0));
        let slots = generate_slots(monday(), &hours, 25);
        assert_eq!(slots, vec!["11:00", "11:25", "11:50"]);
    }

    #[test]
    fn test_start_equals_end_yields_single_slot() {
        let hours = OpenHours::new(hm(12, 0), hm(12, 0));
        assert_eq!(generate_slots(monday(), &hours, 15), vec!["12:00"]);
    }

    #[test]
    fn test_late_closing_does_not_wrap_past_midnight() {
        let hours = OpenHours::new(hm(23, 30), hm(23, 59));
        assert_eq!(generate_slots(monday(), &hours, 20), vec!["23:30", "23:50"]);
    }

    #[test]
    fn test_no_city_or_closed_day_has_no_hours() {
        assert_eq!(open_hours_for_city(None, None, monday()), None);
        assert_eq!(open_hours_for_city(None, Some("Orange"), sunday()), None);

        let mut config = ScheduleConfig::default();
        config.default[1].closed = true;
        assert_eq!(open_hours_for_city(Some(&config), Some("Orange"), monday()), None);
    }

    #[test]
    fn test_city_override_applies_only_when_complete() {
        let mut config = ScheduleConfig::default();
        let late = vec![DayConfig::open("18:00", "22:00"); DAYS_PER_WEEK];
        config.city_overrides.insert("Tavel".into(), late);
        config.city_overrides.insert("Uzès".into(), vec![DayConfig::open("18:00", "22:00"); 3]);

        let tavel = open_hours_for_city(Some(&config), Some("Tavel"), sunday()).unwrap();
        assert_eq!(tavel.start, hm(18, 0));

        let uzes = open_hours_for_city(Some(&config), Some("Uzès"), monday()).unwrap();
        assert_eq!(uzes.start, hm(11, 0));
    }

    #[test]
    fn test_incomplete_default_falls_back_to_built_in_week() {
        let config = ScheduleConfig {
            default: vec![DayConfig::open("06:00", "07:00")],
            step_min: 30,
            city_overrides: Default::default(),
        };
        let hours = open_hours_for_city(Some(&config), Some("Orange"), monday()).unwrap();
        assert_eq!(hours.start, hm(11, 0));
        assert_eq!(resolve_step_min(Some(&config)), 30);
    }

    #[test]
    fn test_open_info_reports_next_slot() {
        let now = monday().and_time(hm(12, 7));
        let info = open_info(None, Some("Orange"), now);
        assert!(info.open_now);
        assert_eq!(info.next_slot.as_deref(), Some("12:15"));

        let after_close = open_info(None, Some("Orange"), monday().and_time(hm(14, 1)));
        assert!(!after_close.open_now);
        assert_eq!(after_close.next_slot, None);
        assert!(after_close.hours.is_some());

        let closing_minute = open_info(None, Some("Orange"), monday().and_hms_opt(14, 0, 30).unwrap());
        assert!(closing_minute.open_now);
    }

    #[test]
    fn test_pickup_timestamp_round_trips_through_label() {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = pickup_timestamp(monday(), "11:45", &paris).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-12T09:45:00+00:00");
        assert_eq!(slot_label(&ts, &paris), "11:45");
        assert_eq!(pickup_timestamp(monday(), "late", &paris), None);
    }
}
