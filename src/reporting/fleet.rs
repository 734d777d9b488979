use chrono::{DateTime, TimeZone};

use super::rollups::{best_seller_by_city, today_stats_by_city, totals, BestSeller, CityDayStats};
use crate::domain::{Order, OpenHours, ScheduleConfig, Truck, UNKNOWN_CITY};
use crate::schedule::open_info;

/// Avignon, used when no truck has a position.
pub const FALLBACK_CENTER: (f64, f64) = (43.9493, 4.8055);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Inactive,
    Open,
    Closed,
}

/// Everything shown for one truck on the fleet map.
#[derive(Debug, Clone, PartialEq)]
pub struct TruckMarker {
    pub truck: Truck,
    pub position: (f64, f64),
    pub state: MarkerState,
    pub hours: Option<OpenHours>,
    pub next_slot: Option<String>,
    pub today: CityDayStats,
    pub best_seller: Option<BestSeller>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FleetOverview {
    pub center: (f64, f64),
    pub markers: Vec<TruckMarker>,
    /// Today's activity across every city.
    pub totals: CityDayStats,
}

/// Map view of the fleet at `now`. Trucks without both coordinates are left off.
pub fn fleet_overview<Tz: TimeZone>(
    trucks: &[Truck],
    orders: &[Order],
    config: Option<&ScheduleConfig>,
    now: &DateTime<Tz>,
) -> FleetOverview {
    let stats = today_stats_by_city(orders, now);
    let best = best_seller_by_city(orders, now);
    let local_now = now.naive_local();

    let markers: Vec<TruckMarker> = trucks
        .iter()
        .filter_map(|truck| {
            let position = truck.coordinates()?;
            let info = open_info(config, truck.city.as_deref(), local_now);
            let state = match (truck.active, info.open_now) {
                (false, _) => MarkerState::Inactive,
                (true, true) => MarkerState::Open,
                (true, false) => MarkerState::Closed,
            };
            let city = truck.city.as_deref().filter(|c| !c.is_empty()).unwrap_or(UNKNOWN_CITY);
            Some(TruckMarker {
                truck: truck.clone(),
                position,
                state,
                hours: info.hours,
                next_slot: info.next_slot,
                today: stats.get(city).copied().unwrap_or_default(),
                best_seller: best.get(city).cloned(),
            })
        })
        .collect();

    FleetOverview {
        center: markers.first().map_or(FALLBACK_CENTER, |m| m.position),
        totals: totals(&stats),
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::test_support::{at, order_on};

    fn truck(id: &str, city: Option<&str>, active: bool, position: Option<(f64, f64)>) -> Truck {
        Truck {
            id: id.into(),
            name: format!("Camion {id}"),
            city: city.map(str::to_string),
            active,
            note: None,
            lat: position.map(|p| p.0),
            lng: position.map(|p| p.1),
        }
    }

    #[test]
    fn test_markers_reflect_activity_and_hours() {
        // Monday 12:07
        let now = at(2026, 10, 12, 12) + chrono::Duration::minutes(7);
        let trucks = vec![
            truck("T1", Some("Orange"), true, Some((44.138, 4.807))),
            truck("T2", Some("Tavel"), false, Some((43.98, 4.70))),
            truck("T3", Some("Uzès"), true, None),
        ];
        let orders = vec![order_on(at(2026, 10, 12, 11), 18.0, Some("Orange"))];

        let overview = fleet_overview(&trucks, &orders, None, &now);
        assert_eq!(overview.markers.len(), 2);
        assert_eq!(overview.center, (44.138, 4.807));

        let orange = &overview.markers[0];
        assert_eq!(orange.state, MarkerState::Open);
        assert_eq!(orange.next_slot.as_deref(), Some("12:15"));
        assert_eq!(orange.today.revenue, 18.0);
        assert_eq!(overview.markers[1].state, MarkerState::Inactive);
        assert_eq!(overview.totals.in_progress, 1);
    }

    #[test]
    fn test_closed_day_and_empty_fleet() {
        // Sunday
        let now = at(2026, 10, 11, 12);
        let trucks = vec![truck("T1", Some("Orange"), true, Some((44.1, 4.8)))];
        let overview = fleet_overview(&trucks, &[], None, &now);
        assert_eq!(overview.markers[0].state, MarkerState::Closed);
        assert_eq!(overview.markers[0].hours, None);

        let empty = fleet_overview(&[], &[], None, &now);
        assert_eq!(empty.center, FALLBACK_CENTER);
        assert!(empty.markers.is_empty());
    }
}
