//! Read-only projections over the order history.
//!
//! Every function takes the reference time explicitly; calendar days and
//! months are those of `now`'s time zone.

pub mod fleet;
pub mod money;
pub mod rollups;
pub mod series;

pub use fleet::*;
pub use money::format_euro;
pub use rollups::*;
pub use series::*;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::domain::{Order, OrderStatus};

/// Calendar date of the order in `now`'s time zone.
pub(crate) fn local_date<Tz: TimeZone>(order: &Order, now: &DateTime<Tz>) -> NaiveDate {
    order.date.with_timezone(&now.timezone()).date_naive()
}

/// Everything on the statistics page.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub today: TodayKpis,
    pub last_7_days: Window,
    pub last_30_days: Vec<DayPoint>,
    pub last_12_months: Vec<MonthPoint>,
    pub by_city: Vec<CityRevenue>,
    pub by_status: Vec<(OrderStatus, usize)>,
    pub alerts: Vec<Alert>,
}

pub fn stats_report<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> StatsReport {
    let week = last_7_days(orders, now);
    StatsReport {
        today: today_kpis(orders, now),
        alerts: alerts(&week),
        last_7_days: week,
        last_30_days: last_30_days(orders, now),
        last_12_months: last_12_months(orders, now),
        by_city: by_city(orders),
        by_status: by_status(orders),
    }
}
