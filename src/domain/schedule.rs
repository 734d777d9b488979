use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STEP_MIN: u32 = 15;
pub const MIN_STEP_MIN: u32 = 5;
pub const MAX_STEP_MIN: u32 = 60;
pub const DAYS_PER_WEEK: usize = 7;

/// Opening hours for one weekday, as stored ("HH:MM" strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub closed: bool,
}

impl DayConfig {
    pub fn open(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into(), closed: false }
    }

    pub fn closed(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into(), closed: true }
    }

    /// `None` when the day is closed or a time does not parse.
    pub fn hours(&self) -> Option<OpenHours> {
        if self.closed {
            return None;
        }
        Some(OpenHours {
            start: parse_hhmm(&self.start)?,
            end: parse_hhmm(&self.end)?,
        })
    }
}

/// Partial edit of a [`DayConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayPatch {
    pub start: Option<String>,
    pub end: Option<String>,
    pub closed: Option<bool>,
}

/// Weekly opening table, indexed 0 = Sunday .. 6 = Saturday, with per-city overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub default: Vec<DayConfig>,
    #[serde(default = "default_step_min")]
    pub step_min: u32,
    #[serde(default)]
    pub city_overrides: BTreeMap<String, Vec<DayConfig>>,
}

fn default_step_min() -> u32 {
    DEFAULT_STEP_MIN
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default: built_in_week(),
            step_min: DEFAULT_STEP_MIN,
            city_overrides: BTreeMap::new(),
        }
    }
}

/// Mon–Sat 11:00–14:00, closed on Sunday.
pub fn built_in_week() -> Vec<DayConfig> {
    let mut week = vec![DayConfig::closed("11:00", "14:00")];
    week.extend((1..DAYS_PER_WEEK).map(|_| DayConfig::open("11:00", "14:00")));
    week
}

impl ScheduleConfig {
    pub fn has_complete_default(&self) -> bool {
        self.default.len() == DAYS_PER_WEEK
    }

    /// The city's override when it has exactly seven entries, the default table otherwise.
    pub fn table_for(&self, city: &str) -> &[DayConfig] {
        match self.city_overrides.get(city) {
            Some(table) if table.len() == DAYS_PER_WEEK => table,
            _ => &self.default,
        }
    }

    /// Edits one weekday of the default table, or of a city's table. Editing a city
    /// without a complete override starts from a copy of the default table.
    pub fn set_day(&mut self, city: Option<&str>, weekday: usize, patch: DayPatch) {
        let mut table = match city {
            Some(city) => self.table_for(city).to_vec(),
            None => self.default.clone(),
        };
        let Some(day) = table.get_mut(weekday) else {
            return;
        };
        if let Some(start) = patch.start {
            day.start = start;
        }
        if let Some(end) = patch.end {
            day.end = end;
        }
        if let Some(closed) = patch.closed {
            day.closed = closed;
        }
        match city {
            Some(city) => {
                self.city_overrides.insert(city.to_string(), table);
            }
            None => self.default = table,
        }
    }

    /// Applies a step typed by an operator. Unparseable input is ignored,
    /// anything else is clamped to 5–60 minutes. Returns whether the value was applied.
    pub fn set_step(&mut self, text: &str) -> bool {
        match text.trim().parse::<i64>() {
            Ok(n) => {
                self.step_min = clamp_step_min(n);
                true
            }
            Err(_) => false,
        }
    }

    pub fn remove_override(&mut self, city: &str) -> bool {
        self.city_overrides.remove(city).is_some()
    }
}

pub fn clamp_step_min(n: i64) -> u32 {
    n.clamp(i64::from(MIN_STEP_MIN), i64::from(MAX_STEP_MIN)) as u32
}

/// Resolved opening hours for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OpenHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

impl fmt::Display for OpenHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

pub fn parse_hhmm(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_override_falls_back_to_default() {
        let mut config = ScheduleConfig::default();
        config.city_overrides.insert("Uzès".into(), vec![DayConfig::open("08:00", "09:00")]);
        assert_eq!(config.table_for("Uzès"), config.default.as_slice());
    }

    #[test]
    fn test_set_day_for_city_copies_default() {
        let mut config = ScheduleConfig::default();
        config.set_day(Some("Tavel"), 2, DayPatch { end: Some("15:30".into()), ..Default::default() });

        let table = config.table_for("Tavel");
        assert_eq!(table.len(), DAYS_PER_WEEK);
        assert_eq!(table[2], DayConfig::open("11:00", "15:30"));
        assert_eq!(config.default[2], DayConfig::open("11:00", "14:00"));

        assert!(config.remove_override("Tavel"));
        assert!(!config.remove_override("Tavel"));
    }

    #[test]
    fn test_set_step_clamps_and_ignores_garbage() {
        let mut config = ScheduleConfig::default();
        assert!(!config.set_step("quinze"));
        assert_eq!(config.step_min, DEFAULT_STEP_MIN);
        assert!(config.set_step("2"));
        assert_eq!(config.step_min, MIN_STEP_MIN);
        assert!(config.set_step("90"));
        assert_eq!(config.step_min, MAX_STEP_MIN);
    }

    #[test]
    fn test_closed_or_malformed_day_has_no_hours() {
        assert_eq!(DayConfig::closed("11:00", "14:00").hours(), None);
        assert_eq!(DayConfig::open("11h", "14:00").hours(), None);
        let hours = DayConfig::open("11:00", "14:00").hours().unwrap();
        assert_eq!(hours.to_string(), "11:00–14:00");
    }

    #[test]
    fn test_config_json_uses_stored_field_names() {
        let json = r#"{"default":[],"stepMin":20,"cityOverrides":{"Orange":[]}}"#;
        let config: ScheduleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.step_min, 20);
        assert!(config.city_overrides.contains_key("Orange"));
        assert!(!config.has_complete_default());
    }
}
