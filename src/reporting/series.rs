use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

use super::local_date;
use crate::domain::Order;

/// Revenue and order count for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub orders: usize,
}

impl DayPoint {
    /// "MM-DD"
    pub fn label(&self) -> String {
        self.date.format("%m-%d").to_string()
    }
}

/// Revenue and order count for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthPoint {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    pub orders: usize,
}

impl MonthPoint {
    /// "YYYY-MM"
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TodayKpis {
    pub revenue: f64,
    pub orders: usize,
}

/// Rolling window ending today.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub total: f64,
    pub orders: usize,
    /// Oldest day first, today last.
    pub series: Vec<DayPoint>,
}

impl Window {
    pub fn average_daily_revenue(&self) -> f64 {
        if self.series.is_empty() {
            return 0.0;
        }
        self.total / self.series.len() as f64
    }

    pub fn today_revenue(&self) -> f64 {
        self.series.last().map_or(0.0, |p| p.revenue)
    }
}

pub fn today_kpis<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> TodayKpis {
    let today = now.date_naive();
    let todays = orders.iter().filter(|o| local_date(o, now) == today);
    let (revenue, count) = todays.fold((0.0, 0), |(r, c), o| (r + o.total, c + 1));
    TodayKpis { revenue, orders: count }
}

/// One zero-filled point per day for the `days` days ending today.
pub fn daily_series<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>, days: u32) -> Vec<DayPoint> {
    let today = now.date_naive();
    let mut series: Vec<DayPoint> = (0..i64::from(days))
        .rev()
        .map(|back| DayPoint { date: today - Duration::days(back), revenue: 0.0, orders: 0 })
        .collect();
    let Some(first) = series.first().map(|p| p.date) else {
        return series;
    };
    for order in orders {
        let date = local_date(order, now);
        if date < first || date > today {
            continue;
        }
        let index = (date - first).num_days() as usize;
        if let Some(point) = series.get_mut(index) {
            point.revenue += order.total;
            point.orders += 1;
        }
    }
    series
}

pub fn last_7_days<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> Window {
    let series = daily_series(orders, now, 7);
    Window {
        total: series.iter().map(|p| p.revenue).sum(),
        orders: series.iter().map(|p| p.orders).sum(),
        series,
    }
}

pub fn last_30_days<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> Vec<DayPoint> {
    daily_series(orders, now, 30)
}

/// One zero-filled point per month for the 12 months ending with the current one.
pub fn last_12_months<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> Vec<MonthPoint> {
    let today = now.date_naive();
    let current = month_index(today.year(), today.month());
    let first = current - 11;
    let mut series: Vec<MonthPoint> = (first..=current)
        .map(|index| MonthPoint {
            year: index.div_euclid(12),
            month: (index.rem_euclid(12) + 1) as u32,
            revenue: 0.0,
            orders: 0,
        })
        .collect();
    for order in orders {
        let date = local_date(order, now);
        let index = month_index(date.year(), date.month());
        if index < first || index > current {
            continue;
        }
        if let Some(point) = series.get_mut((index - first) as usize) {
            point.revenue += order.total;
            point.orders += 1;
        }
    }
    series
}

fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

/// Day-over-week revenue anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// Today is under half the 7-day average.
    RevenueDrop,
    /// Today is over one and a half times the 7-day average.
    RevenueSpike,
}

impl Alert {
    pub fn message(&self) -> &'static str {
        match self {
            Alert::RevenueDrop => "Baisse significative du CA aujourd'hui par rapport à la moyenne 7j",
            Alert::RevenueSpike => "Pic de CA aujourd'hui par rapport à la moyenne 7j",
        }
    }
}

/// Nothing is reported until the week has some revenue.
pub fn alerts(week: &Window) -> Vec<Alert> {
    let average = week.average_daily_revenue();
    if average <= 0.0 {
        return Vec::new();
    }
    let today = week.today_revenue();
    let mut alerts = Vec::new();
    if today < 0.5 * average {
        alerts.push(Alert::RevenueDrop);
    }
    if today > 1.5 * average {
        alerts.push(Alert::RevenueSpike);
    }
    alerts
}
