use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Duration, Local, Weekday};
use tracing::{error, info, warn, Instrument};

use truck_orders::app_system::{setup_tracing, TruckSystem};
use truck_orders::config::AppConfig;
use truck_orders::domain::UserCreate;
use truck_orders::notifier::{ConsoleAlert, SystemNotifier};
use truck_orders::reporting::{dashboard, format_euro, stats_report};
use truck_orders::schedule::pickup_timestamp;

#[tokio::main]
async fn main() -> Result<(), String> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).map_err(|e| e.to_string())?;

    setup_tracing(&config.log_filter);
    info!("Starting food-truck ordering system");

    let notifier = Arc::new(SystemNotifier::alert_only(Arc::new(ConsoleAlert)));
    let system = TruckSystem::new(&config, notifier);

    let user = UserCreate {
        name: "Camille".into(),
        email: Some("camille@example.com".into()),
        phone: None,
        role: Default::default(),
    };
    match system.staff.create_user(user).await {
        Ok(id) => info!(user_id = %id, "Staff user created"),
        Err(e) => warn!(error = %e, "Staff user rejected"),
    }

    // Next day that is not a Sunday, so the default week has opening hours
    let mut date = Local::now().date_naive() + Duration::days(1);
    while date.weekday() == Weekday::Sun {
        date += Duration::days(1);
    }
    let city = "Orange";
    let slots = system.schedule.slots(Some(city), date);
    info!(%date, city, count = slots.len(), "Pickup slots computed");

    let span = tracing::info_span!("order_placement");
    let placed = async {
        let products = system.store.list_products().await.map_err(|e| e.to_string())?;
        for product in products.into_iter().take(2) {
            system.store.add_to_cart(product, 2).await.map_err(|e| e.to_string())?;
        }
        system.store.set_city(Some(city.to_string())).await.map_err(|e| e.to_string())?;
        let slot = slots.first().and_then(|s| pickup_timestamp(date, s, &Local));
        system.store.set_slot(slot).await.map_err(|e| e.to_string())?;
        system.store.place_order().await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await;

    match placed {
        Ok(Some(order_id)) => info!(order_id = %order_id, "Order placed"),
        Ok(None) => warn!("Cart was empty, nothing placed"),
        Err(e) => error!(error = %e, "Order placement failed"),
    }

    let orders = system.store.list_orders(None).await.map_err(|e| e.to_string())?;
    let products = system.store.list_products().await.map_err(|e| e.to_string())?;
    let summary = dashboard(&orders, products.len());
    let report = stats_report(&orders, &Local::now());
    info!(
        in_progress = summary.in_progress,
        revenue = %format_euro(summary.revenue),
        today = %format_euro(report.today.revenue),
        "Dashboard"
    );
    for alert in &report.alerts {
        info!(alert = alert.message(), "Revenue alert");
    }

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
