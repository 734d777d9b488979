use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};

use super::local_date;
use crate::domain::{orders_by_status, Order, OrderStatus, UNKNOWN_CITY};

/// Cities shown in the revenue ranking.
pub const TOP_CITIES: usize = 8;
/// Orders listed on the dashboard.
pub const LATEST_ORDERS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct CityRevenue {
    pub city: String,
    pub revenue: f64,
    pub orders: usize,
}

fn city_key(order: &Order) -> &str {
    match order.city.as_deref() {
        Some(city) if !city.is_empty() => city,
        _ => UNKNOWN_CITY,
    }
}

/// All-time revenue per city, best first, limited to [`TOP_CITIES`].
pub fn by_city(orders: &[Order]) -> Vec<CityRevenue> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for order in orders {
        let entry = acc.entry(city_key(order)).or_default();
        entry.0 += order.total;
        entry.1 += 1;
    }
    let mut ranking: Vec<CityRevenue> = acc
        .into_iter()
        .map(|(city, (revenue, orders))| CityRevenue { city: city.to_string(), revenue, orders })
        .collect();
    ranking.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    ranking.truncate(TOP_CITIES);
    ranking
}

/// Order count per status, in lifecycle order. Absent statuses are omitted.
pub fn by_status(orders: &[Order]) -> Vec<(OrderStatus, usize)> {
    OrderStatus::ALL
        .iter()
        .map(|status| (*status, orders.iter().filter(|o| o.status == *status).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Today's activity for one city.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CityDayStats {
    pub in_progress: usize,
    pub processed: usize,
    pub revenue: f64,
}

impl CityDayStats {
    /// Revenue per order, when there is at least one.
    pub fn average_basket(&self) -> Option<f64> {
        let count = self.in_progress + self.processed;
        (count > 0).then(|| self.revenue / count as f64)
    }

    fn absorb(&mut self, other: &CityDayStats) {
        self.in_progress += other.in_progress;
        self.processed += other.processed;
        self.revenue += other.revenue;
    }
}

pub fn today_stats_by_city<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> BTreeMap<String, CityDayStats> {
    let today = now.date_naive();
    let mut acc: BTreeMap<String, CityDayStats> = BTreeMap::new();
    for order in orders.iter().filter(|o| local_date(o, now) == today) {
        let stats = acc.entry(city_key(order).to_string()).or_default();
        if order.status.is_in_progress() {
            stats.in_progress += 1;
        }
        if order.status.is_processed() {
            stats.processed += 1;
        }
        stats.revenue += order.total;
    }
    acc
}

pub fn totals(stats: &BTreeMap<String, CityDayStats>) -> CityDayStats {
    let mut total = CityDayStats::default();
    for city in stats.values() {
        total.absorb(city);
    }
    total
}

#[derive(Debug, Clone, PartialEq)]
pub struct BestSeller {
    pub title: String,
    pub qty: i64,
}

/// Most ordered product per city today, by units. Ties go to the
/// alphabetically first title.
pub fn best_seller_by_city<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> BTreeMap<String, BestSeller> {
    let today = now.date_naive();
    let mut units: BTreeMap<&str, BTreeMap<&str, i64>> = BTreeMap::new();
    for order in orders.iter().filter(|o| local_date(o, now) == today) {
        let per_title = units.entry(city_key(order)).or_default();
        for item in &order.items {
            *per_title.entry(item.product.title.as_str()).or_default() += i64::from(item.qty);
        }
    }

    let mut best = BTreeMap::new();
    for (city, per_title) in units {
        let mut top: Option<BestSeller> = None;
        for (title, qty) in per_title {
            if top.as_ref().map_or(true, |t| qty > t.qty) {
                top = Some(BestSeller { title: title.to_string(), qty });
            }
        }
        if let Some(top) = top {
            best.insert(city.to_string(), top);
        }
    }
    best
}

/// Headline figures of the admin home page.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Pending or accepted.
    pub in_progress: usize,
    pub revenue: f64,
    pub product_count: usize,
    /// Newest first.
    pub latest: Vec<Order>,
}

pub fn dashboard(orders: &[Order], product_count: usize) -> DashboardSummary {
    DashboardSummary {
        in_progress: orders.iter().filter(|o| o.status.is_in_progress()).count(),
        revenue: orders.iter().map(|o| o.total).sum(),
        product_count,
        latest: orders_by_status(orders, None)
            .into_iter()
            .take(LATEST_ORDERS)
            .cloned()
            .collect(),
    }
}
