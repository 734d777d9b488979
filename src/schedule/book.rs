use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, instrument};

use super::{generate_slots, open_hours_for_city, open_info, resolve_step_min, OpenInfo};
use crate::domain::{DayPatch, OpenHours, ScheduleConfig};
use crate::persistence::{keys, Persistence};

/// Schedule config backed by storage. Every read goes to storage so edits made
/// through another handle are picked up.
#[derive(Clone)]
pub struct ScheduleBook {
    persistence: Persistence,
}

impl ScheduleBook {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }

    /// The persisted config, `None` when absent or unreadable.
    pub fn stored(&self) -> Option<ScheduleConfig> {
        self.persistence.load(keys::SCHEDULE)
    }

    /// The persisted config, or the built-in week when nothing usable is stored.
    pub fn effective(&self) -> ScheduleConfig {
        match self.stored() {
            Some(config) if config.has_complete_default() => config,
            Some(config) => {
                debug!(days = config.default.len(), "Stored schedule incomplete, using built-in week");
                ScheduleConfig { default: ScheduleConfig::default().default, ..config }
            }
            None => ScheduleConfig::default(),
        }
    }

    pub fn save(&self, config: &ScheduleConfig) {
        self.persistence.save(keys::SCHEDULE, config);
    }

    pub fn step_min(&self) -> u32 {
        resolve_step_min(self.stored().as_ref())
    }

    pub fn open_hours(&self, city: Option<&str>, date: NaiveDate) -> Option<OpenHours> {
        open_hours_for_city(self.stored().as_ref(), city, date)
    }

    /// Pickup slots for `city` on `date`; empty when closed or no city is chosen.
    #[instrument(skip(self))]
    pub fn slots(&self, city: Option<&str>, date: NaiveDate) -> Vec<String> {
        let config = self.stored();
        let Some(hours) = open_hours_for_city(config.as_ref(), city, date) else {
            return Vec::new();
        };
        let slots = generate_slots(date, &hours, resolve_step_min(config.as_ref()));
        debug!(count = slots.len(), "Generated pickup slots");
        slots
    }

    pub fn open_info(&self, city: Option<&str>, now: NaiveDateTime) -> OpenInfo {
        open_info(self.stored().as_ref(), city, now)
    }

    /// Edits one weekday and persists the result.
    #[instrument(skip(self, patch))]
    pub fn set_day(&self, city: Option<&str>, weekday: usize, patch: DayPatch) {
        let mut config = self.effective();
        config.set_day(city, weekday, patch);
        self.save(&config);
        info!("Schedule day updated");
    }

    /// Parses and clamps an operator-entered step; garbage leaves the config untouched.
    #[instrument(skip(self))]
    pub fn set_step(&self, text: &str) -> bool {
        let mut config = self.effective();
        if !config.set_step(text) {
            return false;
        }
        self.save(&config);
        info!(step_min = config.step_min, "Slot step updated");
        true
    }

    #[instrument(skip(self))]
    pub fn remove_override(&self, city: &str) -> bool {
        let mut config = self.effective();
        if !config.remove_override(city) {
            return false;
        }
        self.save(&config);
        info!("City schedule override removed");
        true
    }
}
